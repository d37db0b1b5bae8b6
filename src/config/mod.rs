//! Configuration models for task queues.

pub mod queue;

pub use queue::{AdmissionPolicy, QueueConfig};
