//! DLQ viewer error types
//!
//! Errors fall into two groups:
//! - **Per-record**: malformed envelopes, undecodable payloads and failed replays.
//!   These are contained within one record's cycle and never stop the loop.
//! - **Fatal**: broker connectivity at startup, configuration and console I/O.
//!   These end the session after resources are released.

use core_config::ConfigError;
use rdkafka::error::KafkaError;
use thiserror::Error;

/// DLQ inspection and replay errors
#[derive(Error, Debug)]
pub enum DlqError {
    /// Record bytes are not a UTF-8 JSON envelope
    #[error("Malformed envelope: {cause}")]
    MalformedEnvelope {
        /// Escaped, truncated view of the raw record bytes
        preview: String,
        cause: String,
    },

    /// Envelope parsed but `payload` is absent or not valid base64
    #[error("Missing or invalid payload: {0}")]
    MissingOrInvalidPayload(String),

    /// Replay publish was not confirmed by the broker
    #[error("Publish failed: {0}")]
    PublishFailure(String),

    /// Broker could not be reached
    #[error("Connection failed: {0}")]
    ConnectionFailure(String),

    /// Kafka client error
    #[error("Kafka error: {0}")]
    Kafka(#[from] KafkaError),

    /// Console I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl DlqError {
    /// Build a malformed-envelope error
    pub fn malformed(preview: impl Into<String>, cause: impl ToString) -> Self {
        DlqError::MalformedEnvelope {
            preview: preview.into(),
            cause: cause.to_string(),
        }
    }

    /// Whether this error ends the session instead of a single record's cycle
    pub fn is_fatal(&self) -> bool {
        match self {
            DlqError::MalformedEnvelope { .. }
            | DlqError::MissingOrInvalidPayload(_)
            | DlqError::PublishFailure(_)
            | DlqError::Kafka(_) => false,
            DlqError::ConnectionFailure(_)
            | DlqError::Io(_)
            | DlqError::Config(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_record_errors_are_recoverable() {
        assert!(!DlqError::malformed("not-json", "expected value").is_fatal());
        assert!(!DlqError::MissingOrInvalidPayload("absent".into()).is_fatal());
        assert!(!DlqError::PublishFailure("timed out".into()).is_fatal());
    }

    #[test]
    fn test_startup_errors_are_fatal() {
        assert!(DlqError::ConnectionFailure("kafka:9092 unreachable".into()).is_fatal());

        let config = DlqError::from(ConfigError::MissingEnvVar("KAFKA_BROKERS".into()));
        assert!(config.is_fatal());
        assert!(config.to_string().contains("KAFKA_BROKERS"));
    }

    #[test]
    fn test_malformed_display_includes_cause() {
        let err = DlqError::malformed("not-json-at-all", "expected ident at line 1 column 2");
        assert_eq!(
            err.to_string(),
            "Malformed envelope: expected ident at line 1 column 2"
        );
    }
}
