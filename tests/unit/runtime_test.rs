//! Tests for runtime adapters

use prometheus_promise_queue::core::{QueueError, Spawn};
use prometheus_promise_queue::runtime::TokioSpawner;

#[tokio::test]
async fn test_tokio_spawner_runs_future() {
    let spawner = TokioSpawner::current().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel();
    spawner.spawn(async move {
        let _ = tx.send(42);
    });
    assert_eq!(rx.await.unwrap(), 42);
}

#[test]
fn test_tokio_spawner_from_handle() {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let spawner = TokioSpawner::new(rt.handle().clone());
    let (tx, rx) = tokio::sync::oneshot::channel();
    spawner.spawn(async move {
        let _ = tx.send("spawned");
    });
    assert_eq!(rt.block_on(rx).unwrap(), "spawned");
}

#[test]
fn test_tokio_spawner_outside_runtime() {
    assert!(matches!(TokioSpawner::current(), Err(QueueError::NoRuntime)));
}
