//! Error types for queue construction and task outcomes.

use thiserror::Error;

/// Errors produced while building or driving a [`TaskQueue`](crate::core::TaskQueue).
#[derive(Debug, Error)]
pub enum QueueError {
    /// Configuration rejected at construction time.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// No async runtime is available to host worker slots.
    #[error("no async runtime available to spawn workers")]
    NoRuntime,
}

/// Failure delivered to the caller of a single task.
///
/// Errors are local to the task that produced them; the queue keeps running.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError<E> {
    /// The task's action returned an error.
    #[error("task failed: {0}")]
    Failed(E),
    /// The task's action panicked. Carries the panic message when it was a string.
    #[error("task panicked: {0}")]
    Panicked(String),
    /// The task was removed by `clear()` or dropped with its queue before it ran.
    #[error("task discarded before it ran")]
    Discarded,
}

impl<E> TaskError<E> {
    /// Borrow the action's own error, if that is what this is.
    pub const fn failure(&self) -> Option<&E> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Consume into the action's own error, if that is what this is.
    pub fn into_failure(self) -> Option<E> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// True when the task never ran.
    pub const fn is_discarded(&self) -> bool {
        matches!(self, Self::Discarded)
    }
}
