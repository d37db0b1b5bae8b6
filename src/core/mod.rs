//! Core scheduling: the task queue, its entries, events, and counters.

pub mod error;
pub mod events;
pub mod queue;
pub mod spawn;
pub mod stats;
pub mod task;

pub use error::{QueueError, TaskError};
pub use events::{ListenerId, QueueEvent};
pub use queue::TaskQueue;
pub use spawn::Spawn;
pub use stats::QueueStats;
pub use task::{TaskHandle, TaskId, TaskOutcome};
