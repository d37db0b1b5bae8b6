//! Task queue configuration structures.

use serde::{Deserialize, Serialize};

/// How strictly worker activation enforces the concurrency limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionPolicy {
    /// Spawn a worker only while `active_workers < concurrency`.
    #[default]
    Strict,
    /// Refuse a spawn only once `active_workers > concurrency`. A `start()`
    /// issued while workers are already active can then admit
    /// `concurrency + 1` slots.
    Lenient,
}

/// Task queue configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Maximum number of worker slots running tasks at once.
    pub concurrency: usize,
    /// Start the queue as part of construction.
    pub auto_start: bool,
    /// Admission bound used when activating workers.
    pub admission: AdmissionPolicy,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            auto_start: true,
            admission: AdmissionPolicy::Strict,
        }
    }
}

impl QueueConfig {
    /// Configuration with defaults: one worker, auto-start, strict admission.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency limit.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set whether construction starts the queue.
    #[must_use]
    pub const fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    /// Set the admission policy.
    #[must_use]
    pub const fn with_admission(mut self, admission: AdmissionPolicy) -> Self {
        self.admission = admission;
        self
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.concurrency == 0 {
            return Err("concurrency must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse queue configuration from a JSON string and validate.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns a description of the parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
