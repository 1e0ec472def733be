use alloc::string::String;
use thiserror::Error;

/// Failure reported by a notification listener.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// The listener's target was busy, e.g. already borrowed further up the
    /// call stack.
    #[error("listener target is busy")]
    Busy,

    /// The listener failed for its own reasons.
    #[error("listener failed: {0}")]
    Failed(String),
}
