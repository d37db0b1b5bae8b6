//! Tokio runtime spawner implementation.

use std::future::Future;
use std::sync::Arc;

use crate::core::{QueueError, Spawn};

/// Tokio-based spawner that hosts worker slots on a tokio runtime.
#[derive(Clone, Debug)]
pub struct TokioSpawner {
    handle: Arc<tokio::runtime::Handle>,
}

impl TokioSpawner {
    /// Create a `TokioSpawner` from a tokio runtime handle.
    #[must_use]
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self {
            handle: Arc::new(handle),
        }
    }

    /// Create a `TokioSpawner` bound to the runtime this call is made from.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::NoRuntime` outside a tokio runtime context.
    pub fn current() -> Result<Self, QueueError> {
        tokio::runtime::Handle::try_current()
            .map(Self::new)
            .map_err(|_| QueueError::NoRuntime)
    }
}

impl Spawn for TokioSpawner {
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // Worker slots are detached; they report through their task handles.
        drop(self.handle.spawn(fut));
    }
}
