//! Tests for utility functions

use prometheus_promise_queue::util::{init_tracing, init_tracing_with};

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    init_tracing_with("debug");
    tracing::debug!("tracing initialized twice without panicking");
}
