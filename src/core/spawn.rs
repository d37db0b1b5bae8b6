//! Runtime seam for hosting worker slots.

use std::future::Future;

/// Abstraction for spawning worker slots on a runtime.
///
/// Implementations must not poll `fut` inline: a worker's first iteration
/// runs on a later scheduling turn, after `submit`/`start` have returned.
pub trait Spawn {
    /// Spawn a detached unit future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}
