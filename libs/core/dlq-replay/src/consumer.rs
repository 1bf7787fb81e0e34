//! DLQ consumer
//!
//! Reads raw records from the DLQ topic as a consumer group with manual
//! offset commits. Records are handed out in delivery order, one at a time.

use crate::client::create_client_config;
use crate::error::DlqError;
use crate::record::RawRecord;
use async_trait::async_trait;
use core_config::KafkaConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::{Message, Offset, TopicPartitionList};
use std::time::Duration;
use tracing::{debug, info};

/// Source of DLQ records.
///
/// Implementations own their broker connection; `close` releases it and is
/// called exactly once by the viewer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DlqSource: Send {
    /// Wait for the next record
    async fn recv(&mut self) -> Result<RawRecord, DlqError>;

    /// Mark the record as consumed for the consumer group
    async fn commit(&mut self, record: &RawRecord) -> Result<(), DlqError>;

    /// Release the connection
    async fn close(&mut self);
}

/// Kafka-backed DLQ source
///
/// This consumer is configured for:
/// - Manual offset commits (after the operator's decision)
/// - A single consumer group shared by all viewer sessions
/// - Long gaps between polls while the operator thinks
pub struct KafkaDlqConsumer {
    consumer: StreamConsumer,
    topic: String,
    closed: bool,
}

impl KafkaDlqConsumer {
    /// Create the consumer, verify the broker is reachable and subscribe.
    ///
    /// # Configuration
    /// - `enable.auto.commit=false`: offsets are committed per record.
    /// - `auto.offset.reset`: from `KafkaConfig`, earliest by default.
    /// - `max.poll.interval.ms=86400000`: a prompt may stay open for hours.
    pub fn connect(config: &KafkaConfig) -> Result<Self, DlqError> {
        info!(brokers = %config.brokers, "Initializing DLQ consumer...");

        let consumer: StreamConsumer = create_client_config(config)
            .set("group.id", &config.consumer_group)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", config.auto_offset_reset.as_str())
            .set("session.timeout.ms", "30000")
            .set("heartbeat.interval.ms", "3000")
            .set("max.poll.interval.ms", "86400000")
            .create()
            .map_err(|e| DlqError::ConnectionFailure(format!("failed to create consumer: {}", e)))?;

        consumer
            .fetch_metadata(
                Some(config.dlq_topic.as_str()),
                Duration::from_millis(config.connect_timeout_ms),
            )
            .map_err(|e| {
                DlqError::ConnectionFailure(format!(
                    "cannot reach brokers '{}': {}",
                    config.brokers, e
                ))
            })?;

        consumer.subscribe(&[config.dlq_topic.as_str()]).map_err(|e| {
            DlqError::ConnectionFailure(format!(
                "failed to subscribe to '{}': {}",
                config.dlq_topic, e
            ))
        })?;

        info!(
            topic = %config.dlq_topic,
            group = %config.consumer_group,
            offset_reset = %config.auto_offset_reset,
            "DLQ consumer subscribed"
        );

        Ok(Self {
            consumer,
            topic: config.dlq_topic.clone(),
            closed: false,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[async_trait]
impl DlqSource for KafkaDlqConsumer {
    async fn recv(&mut self) -> Result<RawRecord, DlqError> {
        let message = self.consumer.recv().await?;

        let record = RawRecord {
            topic: message.topic().to_string(),
            partition: message.partition(),
            offset: message.offset(),
            key: message.key().map(<[u8]>::to_vec),
            payload: message.payload().map(<[u8]>::to_vec).unwrap_or_default(),
        };

        debug!(record = %record, bytes = record.payload.len(), "Received DLQ record");
        Ok(record)
    }

    async fn commit(&mut self, record: &RawRecord) -> Result<(), DlqError> {
        let mut offsets = TopicPartitionList::new();
        offsets.add_partition_offset(
            &record.topic,
            record.partition,
            Offset::Offset(record.next_offset()),
        )?;

        self.consumer.commit(&offsets, CommitMode::Sync)?;

        debug!(record = %record, "Committed DLQ offset");
        Ok(())
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.consumer.unsubscribe();
        self.closed = true;
        info!(topic = %self.topic, "DLQ consumer closed");
    }
}
