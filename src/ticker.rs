use std::time::{Duration, Instant};

/// Default input poll interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 250;

/// Period of the countdown tick
pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// Get input poll duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// The single countdown tick source. Holds at most one pending deadline;
/// re-arming replaces it, disarming drops it.
#[derive(Debug, Clone, Default)]
pub struct Ticker {
    deadline: Option<Instant>,
}

impl Ticker {
    /// Restart from `now` when `active`, otherwise cancel
    pub fn rearm(&mut self, active: bool, now: Instant) {
        self.deadline = active.then(|| now + COUNTDOWN_PERIOD);
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the deadline if it has passed. The caller re-arms after
    /// applying the tick.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
