use super::enums::{Phase, TimerState};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Default work phase length in seconds
pub const DEFAULT_WORK_SECS: u32 = 25 * 60;
/// Default break phase length in seconds
pub const DEFAULT_BREAK_SECS: u32 = 5 * 60;

/// Interval timer state as stored under the `timerSettings` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSettings {
    pub work_duration: u32,
    pub break_duration: u32,
    pub is_running: bool,
    pub is_paused: bool,
    pub time_remaining: u32,
    pub is_break: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_duration: DEFAULT_WORK_SECS,
            break_duration: DEFAULT_BREAK_SECS,
            is_running: false,
            is_paused: false,
            time_remaining: DEFAULT_WORK_SECS,
            is_break: false,
        }
    }
}

impl TimerSettings {
    pub fn phase(&self) -> Phase {
        Phase::from_is_break(self.is_break)
    }

    pub fn state(&self) -> TimerState {
        match (self.is_running, self.is_paused) {
            (false, _) => TimerState::Idle,
            (true, false) => TimerState::Running,
            (true, true) => TimerState::Paused,
        }
    }

    /// Configured length of a phase in seconds
    pub fn duration_of(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_duration,
            Phase::Break => self.break_duration,
        }
    }

    /// Whether the countdown should be ticking right now
    pub fn is_counting(&self) -> bool {
        self.is_running && !self.is_paused && self.time_remaining > 0
    }

    /// Percent of the current phase already elapsed. A zero-length phase reports 0.
    pub fn progress(&self) -> f64 {
        let total = self.duration_of(self.phase());
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.time_remaining) as f64;
        elapsed / total as f64 * 100.0
    }

    /// Label for the start/pause control
    pub fn toggle_label(&self) -> &'static str {
        match self.state() {
            TimerState::Idle => "Start",
            TimerState::Running => "Pause",
            TimerState::Paused => "Resume",
        }
    }
}

/// Format seconds as "m:ss" (e.g., "25:00", "4:07")
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Owns `TimerSettings` and is the only thing that mutates it
#[derive(Debug, Clone)]
pub struct TimerEngine {
    settings: TimerSettings,
    /// Whether zero has already been handled, so expiry fires once per crossing
    zero_seen: bool,
}

impl TimerEngine {
    pub fn new(settings: TimerSettings) -> Self {
        Self {
            settings,
            zero_seen: false,
        }
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    /// The single start/pause/resume control. Running and unpaused: pause,
    /// keeping `is_running` set. Otherwise: run with the pause flag cleared.
    /// Nothing here returns the timer to Idle.
    pub fn toggle_start_pause(&mut self) {
        if self.settings.is_running && !self.settings.is_paused {
            self.settings.is_paused = true;
        } else {
            self.settings.is_running = true;
            self.settings.is_paused = false;
        }
    }

    /// One elapsed second. Returns whether the countdown moved.
    pub fn tick(&mut self) -> bool {
        if !self.settings.is_counting() {
            return false;
        }
        self.settings.time_remaining -= 1;
        true
    }

    /// Edge-triggered expiry check. When the countdown has just reached zero,
    /// flip the phase, load the new phase's duration and stop. Returns the
    /// phase that was entered.
    pub fn check_expiry(&mut self) -> Option<Phase> {
        if self.settings.time_remaining != 0 {
            self.zero_seen = false;
            return None;
        }
        if self.zero_seen {
            return None;
        }

        let next = self.settings.phase().opposite();
        self.enter_phase(next);
        info!(
            phase = next.title(),
            remaining = self.settings.time_remaining,
            "timer phase expired"
        );
        self.zero_seen = self.settings.time_remaining == 0;
        Some(next)
    }

    /// Jump to the opposite phase at any time, stopped and at full length
    pub fn switch_phase(&mut self) -> Phase {
        let next = self.settings.phase().opposite();
        self.enter_phase(next);
        self.zero_seen = self.settings.time_remaining == 0;
        info!(phase = next.title(), "timer phase switched");
        next
    }

    /// Change phase lengths. Takes effect on the next phase reset; the current
    /// `time_remaining` is not rescaled.
    pub fn set_durations(&mut self, work_secs: u32, break_secs: u32) {
        self.settings.work_duration = work_secs;
        self.settings.break_duration = break_secs;
    }

    fn enter_phase(&mut self, phase: Phase) {
        self.settings.is_break = phase == Phase::Break;
        self.settings.time_remaining = self.settings.duration_of(phase);
        self.settings.is_running = false;
        self.settings.is_paused = false;
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn engine_with(remaining: u32, is_break: bool) -> TimerEngine {
        TimerEngine::new(TimerSettings {
            time_remaining: remaining,
            is_break,
            is_running: true,
            ..TimerSettings::default()
        })
    }

    #[test]
    fn test_defaults() {
        let settings = TimerSettings::default();
        assert_eq!(settings.work_duration, 1500);
        assert_eq!(settings.break_duration, 300);
        assert_eq!(settings.time_remaining, 1500);
        assert_eq!(settings.state(), TimerState::Idle);
        assert_eq!(settings.phase(), Phase::Work);
    }

    #[test]
    fn test_start_pause_sequence_never_returns_to_idle() {
        let mut engine = TimerEngine::default();

        engine.toggle_start_pause();
        assert!(engine.settings().is_running);
        assert!(!engine.settings().is_paused);

        engine.toggle_start_pause();
        assert!(engine.settings().is_running);
        assert!(engine.settings().is_paused);
        assert_eq!(engine.settings().state(), TimerState::Paused);

        engine.toggle_start_pause();
        assert!(engine.settings().is_running);
        assert!(!engine.settings().is_paused);

        engine.toggle_start_pause();
        assert_eq!(engine.settings().state(), TimerState::Paused);
    }

    #[test]
    fn test_start_clears_stale_pause_flag() {
        let mut engine = TimerEngine::new(TimerSettings {
            is_paused: true,
            ..TimerSettings::default()
        });
        engine.toggle_start_pause();
        assert_eq!(engine.settings().state(), TimerState::Running);
    }

    #[test]
    fn test_tick_only_while_counting() {
        let mut engine = TimerEngine::default();
        assert!(!engine.tick());
        assert_eq!(engine.settings().time_remaining, 1500);

        engine.toggle_start_pause();
        assert!(engine.tick());
        assert_eq!(engine.settings().time_remaining, 1499);

        engine.toggle_start_pause();
        assert!(!engine.tick());
        assert_eq!(engine.settings().time_remaining, 1499);
    }

    #[test]
    fn test_tick_then_expiry_enters_break() {
        let mut engine = engine_with(1, false);

        assert!(engine.tick());
        assert_eq!(engine.settings().time_remaining, 0);
        assert!(!engine.tick());

        assert_eq!(engine.check_expiry(), Some(Phase::Break));
        let settings = engine.settings();
        assert!(settings.is_break);
        assert_eq!(settings.time_remaining, 300);
        assert!(!settings.is_running);
        assert!(!settings.is_paused);
    }

    #[test]
    fn test_break_expiry_returns_to_work() {
        let mut engine = engine_with(0, true);
        assert_eq!(engine.check_expiry(), Some(Phase::Work));
        assert_eq!(engine.settings().time_remaining, 1500);
        assert!(!engine.settings().is_break);
    }

    #[test]
    fn test_expiry_fires_once_per_crossing() {
        let mut engine = TimerEngine::new(TimerSettings {
            break_duration: 0,
            time_remaining: 0,
            is_running: true,
            ..TimerSettings::default()
        });

        // Break has zero length, so the reset lands on zero again
        assert_eq!(engine.check_expiry(), Some(Phase::Break));
        assert_eq!(engine.settings().time_remaining, 0);
        assert_eq!(engine.check_expiry(), None);
        assert_eq!(engine.check_expiry(), None);
        assert!(engine.settings().is_break);
    }

    #[test]
    fn test_expiry_rearms_after_leaving_zero() {
        let mut engine = engine_with(0, false);
        assert!(engine.check_expiry().is_some());
        assert_eq!(engine.check_expiry(), None);

        engine.set_durations(1, 1);
        engine.switch_phase();
        engine.toggle_start_pause();
        engine.tick();
        assert_eq!(engine.check_expiry(), Some(Phase::Break));
    }

    #[test]
    fn test_manual_switch_resets_and_stops() {
        let mut engine = TimerEngine::default();
        engine.toggle_start_pause();
        engine.tick();

        assert_eq!(engine.switch_phase(), Phase::Break);
        assert_eq!(engine.settings().time_remaining, 300);
        assert_eq!(engine.settings().state(), TimerState::Idle);

        assert_eq!(engine.switch_phase(), Phase::Work);
        assert_eq!(engine.settings().time_remaining, 1500);
    }

    #[test]
    fn test_set_durations_does_not_rescale_remaining() {
        let mut engine = engine_with(1200, false);
        engine.set_durations(3000, 600);
        assert_eq!(engine.settings().time_remaining, 1200);

        engine.switch_phase();
        assert_eq!(engine.settings().time_remaining, 600);
        engine.switch_phase();
        assert_eq!(engine.settings().time_remaining, 3000);
    }

    #[test]
    fn test_progress() {
        let settings = TimerSettings {
            time_remaining: 750,
            ..TimerSettings::default()
        };
        assert_eq!(settings.progress(), 50.0);

        let fresh = TimerSettings::default();
        assert_eq!(fresh.progress(), 0.0);

        let zero_break = TimerSettings {
            break_duration: 0,
            time_remaining: 0,
            is_break: true,
            ..TimerSettings::default()
        };
        assert_eq!(zero_break.progress(), 0.0);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(1500), "25:00");
        assert_eq!(format_time(247), "4:07");
        assert_eq!(format_time(0), "0:00");
    }

    #[test]
    fn test_settings_json_layout() {
        let json = serde_json::to_value(TimerSettings::default()).unwrap();
        assert_eq!(json["workDuration"], 1500);
        assert_eq!(json["breakDuration"], 300);
        assert_eq!(json["timeRemaining"], 1500);
        assert_eq!(json["isBreak"], false);
        assert_eq!(json["isRunning"], false);
        assert_eq!(json["isPaused"], false);
    }
}
