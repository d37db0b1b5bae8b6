//! Tests for configuration validation

use prometheus_promise_queue::config::{AdmissionPolicy, QueueConfig};

#[test]
fn test_queue_config_validation() {
    let valid = QueueConfig {
        concurrency: 4,
        auto_start: true,
        admission: AdmissionPolicy::Strict,
    };
    assert!(valid.validate().is_ok());
}

#[test]
fn test_queue_config_invalid_concurrency() {
    let invalid = QueueConfig {
        concurrency: 0,
        auto_start: false,
        admission: AdmissionPolicy::Lenient,
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_queue_config_from_json() {
    let json = r#"{
        "concurrency": 16,
        "auto_start": false
    }"#;

    let config = QueueConfig::from_json_str(json).unwrap();
    assert_eq!(config.concurrency, 16);
    assert!(!config.auto_start);
    assert_eq!(config.admission, AdmissionPolicy::Strict);
}

#[test]
fn test_queue_config_empty_json_uses_defaults() {
    let config = QueueConfig::from_json_str("{}").unwrap();
    assert_eq!(config, QueueConfig::default());
}

#[test]
fn test_queue_config_invalid_json() {
    let result = QueueConfig::from_json_str(r#"{"concurrency": "many"}"#);
    assert!(result.is_err());
}

#[test]
fn test_queue_config_roundtrip_names() {
    let json = serde_json::to_value(
        QueueConfig::new().with_admission(AdmissionPolicy::Lenient),
    )
    .unwrap();
    assert_eq!(json["admission"], "lenient");
    assert_eq!(json["concurrency"], 1);
    assert_eq!(json["auto_start"], true);
}
