//! Task entries held by the queue and the handle returned to the submitter.
//!
//! Each entry owns the sending half of a oneshot slot created at submission
//! time; the [`TaskHandle`] owns the receiving half. Routing an outcome back to
//! its caller therefore needs no lookup by id.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::core::error::TaskError;

/// Identifier minted for every submitted task, in submission order.
pub type TaskId = u64;

/// How a task's action settled, as seen by the worker that ran it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The action returned `Ok`.
    Succeeded,
    /// The action returned `Err`.
    Failed,
    /// The action panicked.
    Panicked,
}

type Job = Box<dyn FnOnce() -> BoxFuture<'static, TaskOutcome> + Send>;

/// A queued unit of work. Immutable once built; run at most once.
pub(crate) struct TaskEntry {
    id: TaskId,
    job: Job,
}

impl TaskEntry {
    /// Wrap `action` so that running the entry delivers its outcome to the
    /// returned handle.
    pub(crate) fn new<F, Fut, T, E>(id: TaskId, action: F) -> (Self, TaskHandle<T, E>)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job: Job = Box::new(move || {
            async move {
                // `action()` runs inside the guard too, so a panic before the
                // first await is caught as well.
                let settled = AssertUnwindSafe(async move { action().await })
                    .catch_unwind()
                    .await;
                let (outcome, delivered) = match settled {
                    Ok(Ok(value)) => (TaskOutcome::Succeeded, Ok(value)),
                    Ok(Err(err)) => (TaskOutcome::Failed, Err(TaskError::Failed(err))),
                    Err(payload) => (
                        TaskOutcome::Panicked,
                        Err(TaskError::Panicked(panic_message(payload.as_ref()))),
                    ),
                };
                // Nobody to tell if the caller dropped its handle.
                let _ = tx.send(delivered);
                outcome
            }
            .boxed()
        });
        (Self { id, job }, TaskHandle { id, rx })
    }

    pub(crate) const fn id(&self) -> TaskId {
        self.id
    }

    /// Execute the action and deliver its outcome.
    pub(crate) async fn run(self) -> TaskOutcome {
        (self.job)().await
    }
}

impl fmt::Debug for TaskEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskEntry").field("id", &self.id).finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Future resolving to the outcome of one submitted task.
///
/// Settles exactly once: with the action's value, with
/// [`TaskError::Failed`] carrying the action's error, with
/// [`TaskError::Panicked`], or with [`TaskError::Discarded`] when the entry is
/// cleared or dropped before running. Dropping the handle does not cancel the
/// task.
pub struct TaskHandle<T, E> {
    id: TaskId,
    rx: oneshot::Receiver<Result<T, TaskError<E>>>,
}

impl<T, E> TaskHandle<T, E> {
    /// Id assigned to this task at submission.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }
}

impl<T, E> Future for TaskHandle<T, E> {
    type Output = Result<T, TaskError<E>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.rx.poll_unpin(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(TaskError::Discarded)),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T, E> fmt::Debug for TaskHandle<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle").field("id", &self.id).finish_non_exhaustive()
    }
}
