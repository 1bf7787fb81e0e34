//! DLQ record wrapper
//!
//! Carries the raw record bytes together with their broker coordinates.

use std::fmt;

/// A record read from the DLQ topic, before envelope decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub key: Option<Vec<u8>>,
    /// Record value; empty for tombstones
    pub payload: Vec<u8>,
}

impl RawRecord {
    pub fn new(topic: impl Into<String>, partition: i32, offset: i64, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            partition,
            offset,
            key: None,
            payload: payload.into(),
        }
    }

    pub fn with_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Offset to commit once this record is done (Kafka commits the next offset to read)
    pub fn next_offset(&self) -> i64 {
        self.offset + 1
    }
}

impl fmt::Display for RawRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.topic, self.partition, self.offset)
    }
}
