//! DLQ Replay
//!
//! Interactive inspection and replay of Kafka dead-letter queue records.
//!
//! ## Features
//!
//! - **Envelope decoding**: `{source_topic, error, payload, ts}` JSON with a base64 payload
//! - **Operator decisions**: retry (`r`) or skip, one record at a time
//! - **Replay**: decoded bytes re-published to the original topic under the `retry` key
//! - **At-least-once review**: each record is committed after its decision, never before
//! - **Graceful shutdown**: interrupt stops the loop and both connections are released
//!
//! ## Example
//!
//! ```ignore
//! use core_config::{FromEnv, KafkaConfig};
//! use dlq_replay::{DlqViewer, KafkaDlqConsumer, KafkaReplayProducer, StdinPrompt, ViewerConfig};
//!
//! let kafka = KafkaConfig::from_env()?;
//! let source = KafkaDlqConsumer::connect(&kafka)?;
//! let sink = KafkaReplayProducer::connect(&kafka)?;
//!
//! let mut viewer = DlqViewer::new(source, sink, StdinPrompt::new(), ViewerConfig::from_kafka_config(&kafka));
//! let result = viewer.run(shutdown_rx).await;
//! viewer.close().await;
//! ```

mod client;
mod config;
mod consumer;
mod decision;
mod envelope;
mod error;
mod producer;
mod prompt;
mod record;
pub mod render;
mod viewer;

// Re-export main types
pub use client::create_client_config;
pub use config::{ViewerConfig, RETRY_KEY};
pub use consumer::{DlqSource, KafkaDlqConsumer};
pub use decision::Decision;
pub use envelope::{decode_payload, encode_payload, preview, DlqEnvelope, PayloadView, DEFAULT_PREVIEW_LIMIT};
pub use error::DlqError;
pub use producer::{
    Delivery, KafkaReplayProducer, ReplayMessage, ReplaySink, HEADER_DLQ_OFFSET, HEADER_ERROR, HEADER_FAILED_AT,
};
pub use prompt::{OperatorPrompt, StdinPrompt};
pub use record::RawRecord;
pub use viewer::{DlqViewer, RecordOutcome, ViewerStats};
