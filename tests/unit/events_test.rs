//! Tests for queue event names

use prometheus_promise_queue::core::QueueEvent;

#[test]
fn test_event_display() {
    assert_eq!(QueueEvent::Start.to_string(), "start");
    assert_eq!(QueueEvent::Pause.to_string(), "pause");
    assert_eq!(QueueEvent::Empty.to_string(), "empty");
    assert_eq!(QueueEvent::Done.to_string(), "done");
}

#[test]
fn test_event_deserialize() {
    let event: QueueEvent = serde_json::from_str("\"empty\"").unwrap();
    assert_eq!(event, QueueEvent::Empty);
    assert!(serde_json::from_str::<QueueEvent>("\"finished\"").is_err());
}
