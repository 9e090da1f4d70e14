mod app;
mod domain;
mod input;
mod logging;
mod persistence;
mod ticker;
mod ui;

use anyhow::{bail, Context, Result};
use app::AppState;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use domain::format_time;
use persistence::{ensure_data_dir, init_local_data_dir, log_file, FileStore};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "innermonk")]
#[command(
    about = "A terminal task manager with focus modes and a work/break timer",
    long_about = None
)]
struct Cli {
    /// Data directory (defaults to the nearest .innermonk, then ~/.innermonk)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// More log output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Less log output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    quiet: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .innermonk directory in the current directory
    Init,
    /// Print today's progress and the timer state
    Summary,
    /// Set the work and break lengths in minutes
    Timer {
        /// Work phase length in minutes
        #[arg(long)]
        work: u32,
        /// Break phase length in minutes
        #[arg(long = "break")]
        break_minutes: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            logging::init_tracing(cli.verbose, cli.quiet, None)?;
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            let data_dir = init_local_data_dir(&cwd)?;
            println!("Initialized data directory: {}", data_dir.display());
            println!();
            println!("InnerMonk will now keep tasks and timer settings here.");
            println!("Run 'innermonk' to start.");
            Ok(())
        }
        Some(Commands::Summary) => {
            logging::init_tracing(cli.verbose, cli.quiet, None)?;
            let app = load_session(cli.data_dir.as_deref())?;
            print_summary(&app);
            Ok(())
        }
        Some(Commands::Timer { work, break_minutes }) => {
            logging::init_tracing(cli.verbose, cli.quiet, None)?;
            if work == 0 || break_minutes == 0 {
                bail!("Durations must be at least one minute");
            }
            let mut app = load_session(cli.data_dir.as_deref())?;
            app.set_durations(work * 60, break_minutes * 60, Instant::now());
            app.save()?;
            println!("Work {}m, break {}m", work, break_minutes);
            Ok(())
        }
        None => run_tui(cli.data_dir.as_deref(), cli.verbose, cli.quiet),
    }
}

fn load_session(data_dir: Option<&Path>) -> Result<AppState> {
    let dir = ensure_data_dir(data_dir)?;
    info!(dir = %dir.display(), "using data directory");
    AppState::load(Box::new(FileStore::new(&dir)))
}

fn print_summary(app: &AppState) {
    let progress = app.daily_progress();
    let settings = app.timer_settings();
    println!("{}", progress.summary_line());
    println!("{} tasks remaining today", progress.remaining_today);
    println!("{} incomplete tasks", app.store.incomplete_count());
    println!(
        "{}: {} ({})",
        settings.phase().title(),
        format_time(settings.time_remaining),
        settings.toggle_label()
    );
}

fn run_tui(data_dir: Option<&Path>, verbose: u8, quiet: u8) -> Result<()> {
    // Ensure data directory exists
    let dir = ensure_data_dir(data_dir)?;
    logging::init_tracing(verbose, quiet, Some(&log_file(&dir)))?;
    eprintln!("Using data directory: {}", dir.display());

    let mut app = AppState::load(Box::new(FileStore::new(&dir)))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Save on exit
    if let Err(e) = app.save() {
        error!(error = %e, "final save failed");
        eprintln!("Error saving state: {:#}", e);
    }

    // Print any errors
    if let Err(err) = result {
        eprintln!("Error: {:#}", err);
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    let tick_rate = ticker::tick_duration();
    let mut title = String::new();

    loop {
        // Keep the window title badge in step with the incomplete count
        let wanted = app.window_title();
        if wanted != title {
            execute!(terminal.backend_mut(), SetTitle(&wanted))?;
            title = wanted;
        }

        // Render
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key) {
                    return Ok(());
                }
            }
        }

        // Service the countdown
        app.on_tick(Instant::now());
    }
}
