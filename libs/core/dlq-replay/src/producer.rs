//! Replay producer
//!
//! Publishes decoded payloads back to the original topic and waits for the
//! broker's delivery confirmation before returning.

use crate::client::create_client_config;
use crate::error::DlqError;
use async_trait::async_trait;
use core_config::KafkaConfig;
use rdkafka::message::{Header, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Header carrying the envelope's error class
pub const HEADER_ERROR: &str = "x-dlq-error";
/// Header carrying the envelope's failure timestamp (epoch millis)
pub const HEADER_FAILED_AT: &str = "x-dlq-failed-at";
/// Header carrying the DLQ record coordinates (topic/partition@offset)
pub const HEADER_DLQ_OFFSET: &str = "x-dlq-offset";

/// A decoded payload on its way back to the original topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayMessage {
    pub topic: String,
    pub key: String,
    /// Raw base64-decoded bytes from the envelope
    pub payload: Vec<u8>,
    pub headers: Vec<(String, String)>,
}

impl ReplayMessage {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Where a replayed message landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub partition: i32,
    pub offset: i64,
}

/// Destination for replayed payloads
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReplaySink: Send {
    /// Publish and wait up to `timeout` for delivery confirmation
    async fn publish(&mut self, message: &ReplayMessage, timeout: Duration) -> Result<Delivery, DlqError>;

    /// Flush outstanding messages and release the connection
    async fn close(&mut self);
}

/// Kafka-backed replay producer
///
/// This producer is configured for:
/// - Acknowledgement from all in-sync replicas
/// - Idempotent writes
/// - No batching delay (one message per operator decision)
pub struct KafkaReplayProducer {
    producer: FutureProducer,
    closed: bool,
}

impl KafkaReplayProducer {
    /// Create the producer and verify the broker is reachable
    pub fn connect(config: &KafkaConfig) -> Result<Self, DlqError> {
        info!(brokers = %config.brokers, "Initializing replay producer...");

        let producer: FutureProducer = create_client_config(config)
            .set("acks", "all")
            .set("enable.idempotence", "true")
            .set("linger.ms", "0")
            .set("message.timeout.ms", config.publish_timeout_ms.to_string())
            .create()
            .map_err(|e| DlqError::ConnectionFailure(format!("failed to create producer: {}", e)))?;

        producer
            .client()
            .fetch_metadata(
                Some(config.original_topic.as_str()),
                Duration::from_millis(config.connect_timeout_ms),
            )
            .map_err(|e| {
                DlqError::ConnectionFailure(format!(
                    "cannot reach brokers '{}': {}",
                    config.brokers, e
                ))
            })?;

        info!(topic = %config.original_topic, "Replay producer initialized");

        Ok(Self {
            producer,
            closed: false,
        })
    }
}

#[async_trait]
impl ReplaySink for KafkaReplayProducer {
    async fn publish(&mut self, message: &ReplayMessage, timeout: Duration) -> Result<Delivery, DlqError> {
        let mut record = FutureRecord::to(&message.topic)
            .key(message.key.as_bytes())
            .payload(&message.payload);

        if !message.headers.is_empty() {
            let headers = message
                .headers
                .iter()
                .fold(OwnedHeaders::new(), |headers, (key, value)| {
                    headers.insert(Header {
                        key: key.as_str(),
                        value: Some(value.as_bytes()),
                    })
                });
            record = record.headers(headers);
        }

        let start = Instant::now();

        match self.producer.send(record, Timeout::After(timeout)).await {
            Ok((partition, offset)) => {
                info!(
                    topic = %message.topic,
                    partition = partition,
                    offset = offset,
                    bytes = message.payload.len(),
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Replayed payload persisted"
                );
                Ok(Delivery { partition, offset })
            }
            Err((kafka_err, _)) => {
                error!(
                    error = %kafka_err,
                    topic = %message.topic,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Failed to replay payload"
                );
                Err(DlqError::PublishFailure(kafka_err.to_string()))
            }
        }
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.producer.flush(Timeout::After(Duration::from_secs(5))) {
            warn!(error = %e, "Replay producer flush did not complete");
        }
        self.closed = true;
        info!("Replay producer closed");
    }
}
