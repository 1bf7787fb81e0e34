//! Viewer configuration
//!
//! This module provides `ViewerConfig` for configuring the interactive loop.

use crate::envelope::DEFAULT_PREVIEW_LIMIT;
use core_config::KafkaConfig;
use std::time::Duration;

/// Key attached to every replayed message
pub const RETRY_KEY: &str = "retry";

/// Configuration for the DLQ viewer loop
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// DLQ topic being inspected
    pub dlq_topic: String,

    /// Topic replayed payloads are published to
    pub original_topic: String,

    /// Consumer group committing DLQ offsets
    pub consumer_group: String,

    /// Message key for replayed payloads
    pub retry_key: String,

    /// Maximum raw bytes shown for malformed records
    pub preview_limit: usize,

    /// How long a replay waits for delivery confirmation
    pub publish_timeout: Duration,

    /// Attach x-dlq-* tracing headers to replayed messages
    pub replay_headers: bool,

    /// Question shown before each decision
    pub prompt: String,

    /// Pause after a broker error while waiting for records
    pub recv_error_backoff: Duration,
}

impl ViewerConfig {
    /// Create a new ViewerConfig with explicit topics
    pub fn new(
        dlq_topic: impl Into<String>,
        original_topic: impl Into<String>,
        consumer_group: impl Into<String>,
    ) -> Self {
        Self {
            dlq_topic: dlq_topic.into(),
            original_topic: original_topic.into(),
            consumer_group: consumer_group.into(),
            retry_key: RETRY_KEY.to_string(),
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            publish_timeout: Duration::from_secs(5),
            replay_headers: true,
            prompt: "Type 'r' + ENTER to retry, any other key to skip: ".to_string(),
            recv_error_backoff: Duration::from_secs(1),
        }
    }

    /// Create a ViewerConfig from the Kafka connection settings
    pub fn from_kafka_config(config: &KafkaConfig) -> Self {
        Self::new(
            config.dlq_topic.clone(),
            config.original_topic.clone(),
            config.consumer_group.clone(),
        )
        .with_publish_timeout(Duration::from_millis(config.publish_timeout_ms))
    }

    /// Set the replay message key
    pub fn with_retry_key(mut self, key: impl Into<String>) -> Self {
        self.retry_key = key.into();
        self
    }

    /// Set the malformed-record preview limit
    pub fn with_preview_limit(mut self, limit: usize) -> Self {
        self.preview_limit = limit;
        self
    }

    /// Set the publish delivery timeout
    pub fn with_publish_timeout(mut self, timeout: Duration) -> Self {
        self.publish_timeout = timeout;
        self
    }

    /// Enable or disable replay tracing headers
    pub fn with_replay_headers(mut self, enable: bool) -> Self {
        self.replay_headers = enable;
        self
    }

    /// Set the operator prompt text
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Set the backoff after a receive error
    pub fn with_recv_error_backoff(mut self, backoff: Duration) -> Self {
        self.recv_error_backoff = backoff;
        self
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::from_kafka_config(&KafkaConfig::default())
    }
}
