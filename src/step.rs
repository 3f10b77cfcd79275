use crate::ctx::Ctx;
use std::time::Duration;
use thiserror::Error;

/// The result of running a step: the updated state plus what to do next.
pub type StepResult<S> = Result<(S, Outcome), StepError>;

/// One stage of a turn.
///
/// Implement this on your own structs and append them to a
/// [`crate::Workflow`] with `.then()`.
pub trait Step<S>: Send + 'static {
    /// Name used in logs and runner events.
    fn name(&self) -> &'static str;

    /// Run the step once. Returns the updated state and an [`Outcome`] that
    /// tells the runner what to do next.
    fn run(&mut self, state: S, ctx: &mut Ctx) -> StepResult<S>;
}

/// Control flow for the runner.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Move on to the next stage. After the last one the run is complete.
    Continue,
    /// Re-run the current step (counted against `max_retries`).
    Retry(RetryHint),
}

/// Why a step wants to be re-run, and how long to back off first.
#[derive(Debug, Clone)]
pub struct RetryHint {
    /// Human-readable reason for the retry.
    pub reason: String,
    /// Pause before the next attempt.
    pub after: Duration,
}

impl RetryHint {
    /// Retry immediately for the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            after: Duration::ZERO,
        }
    }

    /// Back off for `after` before retrying.
    pub fn after(mut self, after: Duration) -> Self {
        self.after = after;
        self
    }
}

/// Error type for steps and the execution service, with variants designed
/// around what the caller can do about them.
#[derive(Debug, Error)]
pub enum StepError {
    /// Bad request, rejected credential or malformed reply. Retrying won't help.
    #[error("invalid: {0}")]
    Invalid(String),
    /// Network failure, timeout or rate limit. Retrying might help.
    #[error("transient: {0}")]
    Transient(String),
    /// Everything else. Inspect the message for details.
    #[error("{0}")]
    Other(String),
}

impl From<ureq::Error> for StepError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(code) => StepError::from_status(code, ""),
            other => StepError::Transient(other.to_string()),
        }
    }
}

impl From<std::io::Error> for StepError {
    fn from(e: std::io::Error) -> Self {
        StepError::Other(e.to_string())
    }
}

impl StepError {
    /// Create an [`Invalid`](StepError::Invalid) error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        StepError::Invalid(msg.into())
    }

    /// Create an [`Other`](StepError::Other) error.
    pub fn other(msg: impl Into<String>) -> Self {
        StepError::Other(msg.into())
    }

    /// Create a [`Transient`](StepError::Transient) error.
    pub fn transient(msg: impl Into<String>) -> Self {
        StepError::Transient(msg.into())
    }

    /// Classify an HTTP error status. Timeouts, rate limits and server
    /// errors are transient; every other 4xx is the caller's fault.
    /// `detail` is whatever the backend said about it, possibly empty.
    pub fn from_status(code: u16, detail: &str) -> Self {
        let detail = detail.trim();
        let msg = if detail.is_empty() {
            format!("backend answered HTTP {code}")
        } else {
            format!("backend answered HTTP {code}: {detail}")
        };
        match code {
            408 | 429 | 500.. => StepError::Transient(msg),
            _ => StepError::Invalid(msg),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, StepError::Transient(_))
    }
}
