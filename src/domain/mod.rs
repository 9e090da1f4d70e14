pub mod enums;
pub mod store;
pub mod task;
pub mod timer;
pub mod views;

pub use enums::{
    Energy, ExecutiveFunction, FocusMode, Phase, Priority, TaskStatus, TimerState, UiMode,
};
pub use store::TaskStore;
pub use task::{Subtask, Task, TaskDraft};
pub use timer::{format_time, TimerEngine, TimerSettings};
pub use views::{
    daily_progress, incomplete_tasks, tab_tasks, window_title, DailyProgress, IsolationCursor,
    IsolationFrame, SequentialCursor, SequentialRow,
};
