//! Tests for error types

use prometheus_promise_queue::core::{QueueError, TaskError};

#[test]
fn test_invalid_config_error() {
    let err = QueueError::InvalidConfig("concurrency must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: concurrency must be greater than 0"
    );
}

#[test]
fn test_no_runtime_error() {
    let err = QueueError::NoRuntime;
    assert_eq!(format!("{}", err), "no async runtime available to spawn workers");
}

#[test]
fn test_task_failed_error() {
    let err: TaskError<String> = TaskError::Failed("disk full".to_string());
    assert_eq!(format!("{}", err), "task failed: disk full");
}

#[test]
fn test_task_panicked_error() {
    let err: TaskError<String> = TaskError::Panicked("index out of bounds".to_string());
    assert_eq!(format!("{}", err), "task panicked: index out of bounds");
}

#[test]
fn test_task_discarded_error() {
    let err: TaskError<String> = TaskError::Discarded;
    assert_eq!(format!("{}", err), "task discarded before it ran");
    assert!(err.is_discarded());
}

#[test]
fn test_task_error_is_std_error() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>(_: &E) {}
    let err: TaskError<std::io::Error> =
        TaskError::Failed(std::io::Error::other("connection reset"));
    assert_error(&err);
    assert_error(&QueueError::NoRuntime);
}
