use std::fmt;
use std::time::Duration;

use journal_core::{BatchResult, Credentials, DateRange};

use crate::browser::DriverError;

/// A fault raised by one {locate, verify, act} step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepError {
    pub kind: FaultKind,
    pub message: String,
}

impl StepError {
    pub(crate) fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for StepError {}

impl From<DriverError> for StepError {
    fn from(err: DriverError) -> Self {
        let kind = match err {
            DriverError::Unreachable(_) | DriverError::SessionNotCreated(_) => {
                FaultKind::Environment
            }
            _ => FaultKind::Driver,
        };
        StepError::new(kind, err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultKind {
    /// A required field or control never appeared within its bound.
    ResolutionTimeout { role: String },
    /// Credential submission did not yield a recognized authenticated
    /// state. Batch-fatal, zero days processed.
    AuthFailure,
    /// The entry form was unreachable by every strategy.
    NavigationFailure,
    /// The browser-driving capability is unusable (endpoint down,
    /// session refused). Aborts startup before any date is processed.
    Environment,
    /// A wire-level fault from the browser capability. Inside a day it
    /// downgrades to that day's explicit failure.
    Driver,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::ResolutionTimeout { role } => {
                write!(f, "resolution timeout for {role}")
            }
            FaultKind::AuthFailure => write!(f, "authentication failure"),
            FaultKind::NavigationFailure => write!(f, "navigation failure"),
            FaultKind::Environment => write!(f, "environment fault"),
            FaultKind::Driver => write!(f, "driver fault"),
        }
    }
}

/// Bounded waits for the controller. All waits in the pipeline come from
/// here; there is no unbounded blocking operation.
#[derive(Debug, Clone)]
pub struct BatchSettings {
    /// Per-candidate bound when resolving a required field.
    pub resolve_timeout: Duration,
    /// Per-candidate bound for optional controls and links.
    pub control_timeout: Duration,
    /// Poll step while waiting for an element to appear.
    pub poll_interval: Duration,
    /// Pause between keystroke bursts, mimicking form entry pacing.
    pub typing_pause: Duration,
    /// Settle delay after navigation or submission.
    pub page_settle: Duration,
    /// Shorter settle after an in-page link click.
    pub nav_settle: Duration,
    /// Last-resort window allowing manual progression to the form.
    pub manual_window: Duration,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            resolve_timeout: Duration::from_secs(10),
            control_timeout: Duration::from_secs(3),
            poll_interval: Duration::from_millis(250),
            typing_pause: Duration::from_millis(500),
            page_settle: Duration::from_secs(3),
            nav_settle: Duration::from_secs(2),
            manual_window: Duration::from_secs(10),
        }
    }
}

/// Fully resolved inputs for one batch run, handed over by the caller.
#[derive(Debug, Clone)]
pub struct BatchInputs {
    pub credentials: Credentials,
    pub category: String,
    pub range: DateRange,
    pub base_content: String,
    /// Wait between one submission and the next day's navigation.
    pub inter_submission_delay: Duration,
}

/// Progress snapshot emitted after each processed day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub processed: usize,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    Progress(BatchProgress),
    /// A batch-fatal fault; a `Completed` event still follows.
    Fault { message: String },
    Completed { result: BatchResult },
}
