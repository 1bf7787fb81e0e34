use crate::{env_optional, env_or_default, env_parse_or, ConfigError, FromEnv};
use std::fmt;
use std::str::FromStr;

/// Where a consumer group without committed offsets starts reading
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OffsetReset {
    #[default]
    Earliest,
    Latest,
}

impl OffsetReset {
    pub fn as_str(&self) -> &'static str {
        match self {
            OffsetReset::Earliest => "earliest",
            OffsetReset::Latest => "latest",
        }
    }
}

impl fmt::Display for OffsetReset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OffsetReset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "earliest" | "smallest" | "beginning" => Ok(OffsetReset::Earliest),
            "latest" | "largest" | "end" => Ok(OffsetReset::Latest),
            other => Err(format!("expected 'earliest' or 'latest', got '{}'", other)),
        }
    }
}

/// Kafka connection and topic configuration for the DLQ viewer
#[derive(Clone, Debug)]
pub struct KafkaConfig {
    /// Comma-separated bootstrap servers (e.g. "kafka1:9092,kafka2:9092")
    pub brokers: String,
    /// Dead-letter topic to inspect
    pub dlq_topic: String,
    /// Topic that replayed payloads are published to
    pub original_topic: String,
    /// Consumer group used for DLQ offset commits
    pub consumer_group: String,
    pub auto_offset_reset: OffsetReset,
    /// Metadata probe timeout used to detect an unreachable broker at startup
    pub connect_timeout_ms: u64,
    /// How long a replay publish waits for delivery confirmation
    pub publish_timeout_ms: u64,
    pub ssl_enabled: bool,
    /// Path to CA certificate file (for self-signed certificates)
    pub ssl_ca_location: Option<String>,
    /// SASL mechanism (e.g. "SCRAM-SHA-256", "PLAIN")
    pub sasl_mechanism: Option<String>,
    pub sasl_username: Option<String>,
    pub sasl_password: Option<String>,
}

impl KafkaConfig {
    pub fn new(
        brokers: impl Into<String>,
        dlq_topic: impl Into<String>,
        original_topic: impl Into<String>,
        consumer_group: impl Into<String>,
    ) -> Self {
        Self {
            brokers: brokers.into(),
            dlq_topic: dlq_topic.into(),
            original_topic: original_topic.into(),
            consumer_group: consumer_group.into(),
            ..Self::default()
        }
    }

    /// SASL credentials, only when all three parts are configured
    pub fn sasl(&self) -> Option<(&str, &str, &str)> {
        match (&self.sasl_mechanism, &self.sasl_username, &self.sasl_password) {
            (Some(mechanism), Some(username), Some(password)) => {
                Some((mechanism.as_str(), username.as_str(), password.as_str()))
            }
            _ => None,
        }
    }
}

impl FromEnv for KafkaConfig {
    /// Reads from environment variables with defaults matching the local docker setup:
    /// - KAFKA_BROKERS: defaults to kafka:9092
    /// - DLQ_TOPIC: defaults to orders-dlq
    /// - ORIGINAL_TOPIC: defaults to orders
    /// - DLQ_CONSUMER_GROUP: defaults to dlq-viewer
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            brokers: env_or_default("KAFKA_BROKERS", &defaults.brokers),
            dlq_topic: env_or_default("DLQ_TOPIC", &defaults.dlq_topic),
            original_topic: env_or_default("ORIGINAL_TOPIC", &defaults.original_topic),
            consumer_group: env_or_default("DLQ_CONSUMER_GROUP", &defaults.consumer_group),
            auto_offset_reset: env_parse_or("KAFKA_AUTO_OFFSET_RESET", defaults.auto_offset_reset)?,
            connect_timeout_ms: env_parse_or("KAFKA_CONNECT_TIMEOUT_MS", defaults.connect_timeout_ms)?,
            publish_timeout_ms: env_parse_or("KAFKA_PUBLISH_TIMEOUT_MS", defaults.publish_timeout_ms)?,
            ssl_enabled: env_parse_or("KAFKA_SSL_ENABLED", defaults.ssl_enabled)?,
            ssl_ca_location: env_optional("KAFKA_SSL_CA_LOCATION"),
            sasl_mechanism: env_optional("KAFKA_SASL_MECHANISM"),
            sasl_username: env_optional("KAFKA_SASL_USERNAME"),
            sasl_password: env_optional("KAFKA_SASL_PASSWORD"),
        })
    }
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            brokers: "kafka:9092".to_string(),
            dlq_topic: "orders-dlq".to_string(),
            original_topic: "orders".to_string(),
            consumer_group: "dlq-viewer".to_string(),
            auto_offset_reset: OffsetReset::Earliest,
            connect_timeout_ms: 10_000,
            publish_timeout_ms: 5_000,
            ssl_enabled: false,
            ssl_ca_location: None,
            sasl_mechanism: None,
            sasl_username: None,
            sasl_password: None,
        }
    }
}
