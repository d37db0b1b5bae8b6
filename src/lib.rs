//! # Prometheus Promise Queue
//!
//! A bounded-concurrency FIFO task queue for async workloads.
//!
//! Callers submit asynchronous units of work; the queue runs at most
//! `concurrency` of them at once, in submission order, and resolves each
//! caller's outcome independently through its own [`TaskHandle`].
//!
//! ## Key Features
//!
//! - **Bounded Worker Slots**: At most `concurrency` slots pull from the buffer
//! - **FIFO Admission**: Entries are pulled strictly in submission order
//! - **Start/Pause Lifecycle**: Pausing lets in-flight tasks finish and stops further pulls
//! - **Per-Task Outcomes**: Failures and panics stay local to the task that produced them
//! - **Lifecycle Events**: `start`, `pause`, `empty` and `done` notifications
//! - **Runtime Seam**: Workers are hosted through the [`Spawn`](crate::core::Spawn) trait (tokio by default)
//!
//! ## Example
//!
//! ```rust,ignore
//! use prometheus_promise_queue::config::QueueConfig;
//! use prometheus_promise_queue::core::{QueueEvent, TaskQueue};
//!
//! let queue = TaskQueue::new(QueueConfig::new().with_concurrency(2))?;
//! queue.on(QueueEvent::Empty, || tracing::debug!("buffer drained"));
//!
//! let handles: Vec<_> = (0..5u64)
//!     .map(|i| queue.submit(move || async move { Ok::<_, std::io::Error>(i * 2) }))
//!     .collect();
//!
//! queue.wait_until_idle().await;
//! for handle in handles {
//!     println!("{}", handle.await?);
//! }
//! ```
//!
//! For complete scenarios, see `tests/task_queue_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling: task queue, entries, events, and counters.
pub mod core;
/// Configuration models for task queues.
pub mod config;
/// Runtime adapters for hosting worker slots.
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use crate::config::{AdmissionPolicy, QueueConfig};
pub use crate::core::{QueueError, QueueEvent, TaskError, TaskHandle, TaskId, TaskQueue};
