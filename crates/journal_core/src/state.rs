use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Lifecycle of one batch run. Written only by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    /// Cancellation requested; the in-flight date finishes first.
    Stopping,
    /// Loop exited after a cancellation request.
    Stopped,
    /// Loop exhausted the date range.
    Completed,
}

impl RunState {
    /// Idle -> Running. Any other state is unchanged.
    pub fn start(self) -> Self {
        match self {
            RunState::Idle => RunState::Running,
            other => other,
        }
    }

    /// Running -> Stopping. Any other state is unchanged.
    pub fn request_stop(self) -> Self {
        match self {
            RunState::Running => RunState::Stopping,
            other => other,
        }
    }

    /// Loop exit: Running -> Completed, Stopping -> Stopped.
    pub fn finish(self) -> Self {
        match self {
            RunState::Running => RunState::Completed,
            RunState::Stopping => RunState::Stopped,
            other => other,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Stopped | RunState::Completed)
    }
}

/// Cooperative cancellation flag: single writer (the caller), single
/// reader (the driver, polled once per date).
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
