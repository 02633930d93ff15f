// Error handling framework

use thiserror::Error;

/// Work specification validation errors, raised by the store before a spec
/// reaches the translation layer
#[derive(Error, Debug)]
pub enum WorkSpecError {
    #[error("Work spec id cannot be empty")]
    EmptyId,

    #[error("Backoff delay {actual_ms}ms outside accepted range [{min_ms}ms, {max_ms}ms]")]
    BackoffDelayOutOfRange {
        actual_ms: u64,
        min_ms: u64,
        max_ms: u64,
    },

    #[error("Trigger content update delay {update_ms}ms exceeds max content delay {max_ms}ms")]
    TriggerDelayWindowInverted { update_ms: u64, max_ms: u64 },
}
