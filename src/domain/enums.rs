use serde::{Deserialize, Serialize};

/// Bucket a task is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Today,
    Upcoming,
    Completed,
}

impl TaskStatus {
    /// Tab label for the default view
    pub fn label(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Upcoming => "Upcoming",
            Self::Completed => "Completed",
        }
    }

    /// All buckets in tab order
    pub fn all() -> &'static [TaskStatus] {
        &[TaskStatus::Today, TaskStatus::Upcoming, TaskStatus::Completed]
    }

    /// Position of this bucket in tab order
    pub fn index(&self) -> usize {
        match self {
            Self::Today => 0,
            Self::Upcoming => 1,
            Self::Completed => 2,
        }
    }

    /// Next tab, wrapping around
    pub fn next(&self) -> Self {
        match self {
            Self::Today => Self::Upcoming,
            Self::Upcoming => Self::Completed,
            Self::Completed => Self::Today,
        }
    }

    /// Next status the edit form offers (the form never offers Completed)
    pub fn next_editable(&self) -> Self {
        match self {
            Self::Today => Self::Upcoming,
            Self::Upcoming | Self::Completed => Self::Today,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }
}

/// Energy a task is expected to take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Energy {
    Low,
    Medium,
    High,
}

impl Energy {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }
}

/// Executive-function skill a task exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutiveFunction {
    Planning,
    Organization,
    TimeManagement,
    EmotionalControl,
    Focus,
    Memory,
}

impl ExecutiveFunction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Organization => "organization",
            Self::TimeManagement => "time-management",
            Self::EmotionalControl => "emotional-control",
            Self::Focus => "focus",
            Self::Memory => "memory",
        }
    }

    /// Cycle through the skills; `None` means unset and sits between Memory and Planning
    pub fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(Self::Planning),
            Some(Self::Planning) => Some(Self::Organization),
            Some(Self::Organization) => Some(Self::TimeManagement),
            Some(Self::TimeManagement) => Some(Self::EmotionalControl),
            Some(Self::EmotionalControl) => Some(Self::Focus),
            Some(Self::Focus) => Some(Self::Memory),
            Some(Self::Memory) => None,
        }
    }
}

/// Interval timer phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    pub fn from_is_break(is_break: bool) -> Self {
        if is_break {
            Self::Break
        } else {
            Self::Work
        }
    }

    /// Heading shown above the countdown
    pub fn title(&self) -> &'static str {
        match self {
            Self::Work => "Focus Session",
            Self::Break => "Break Time",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Self::Work => Self::Break,
            Self::Break => Self::Work,
        }
    }

    /// Short name used on the phase-switch control
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Work => "Focus",
            Self::Break => "Break",
        }
    }
}

/// Run state of the interval timer, derived from the persisted flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// `isRunning` is false
    Idle,
    /// Running and not paused
    Running,
    /// Running but paused
    Paused,
}

/// Which navigation flow the task set is shown through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    Default,
    Isolation,
    Sequential,
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingTask,
    EditingTask,
    AddingSubtask,
    ConfirmDelete,
}
