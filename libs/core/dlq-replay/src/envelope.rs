//! DLQ envelope codec
//!
//! The processor that fails a message wraps it as:
//!
//! ```json
//! {
//!   "source_topic": "orders",
//!   "error":        "json_unmarshal",
//!   "payload":      "<base64 raw bytes>",
//!   "ts":           1715200000000
//! }
//! ```
//!
//! Decoding happens in two stages. The record bytes are parsed into a
//! [`DlqEnvelope`]; the embedded payload is then base64-decoded and classified
//! into a [`PayloadView`] for display. Replay always uses the raw decoded bytes.

use crate::error::DlqError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::engine::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of raw bytes shown for records that cannot be decoded
pub const DEFAULT_PREVIEW_LIMIT: usize = 200;

/// Error envelope placed on the DLQ topic by the upstream processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DlqEnvelope {
    /// Topic the failed message was originally read from
    pub source_topic: String,

    /// Short failure classification (e.g. "json_unmarshal")
    pub error: String,

    /// Base64-encoded original message bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,

    /// Epoch milliseconds when the failure was recorded
    pub ts: i64,
}

impl DlqEnvelope {
    /// Wrap original message bytes the same way the upstream processor does
    pub fn wrap(
        source_topic: impl Into<String>,
        error: impl Into<String>,
        payload: &[u8],
        ts: i64,
    ) -> Self {
        Self {
            source_topic: source_topic.into(),
            error: error.into(),
            payload: Some(encode_payload(payload)),
            ts,
        }
    }

    /// Decode a raw DLQ record.
    ///
    /// Returns `MalformedEnvelope` with an escaped preview of at most
    /// `preview_limit` bytes when the record is not UTF-8 JSON of the expected shape.
    pub fn decode(raw: &[u8], preview_limit: usize) -> Result<Self, DlqError> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| DlqError::malformed(preview(raw, preview_limit), e))?;

        serde_json::from_str(text).map_err(|e| DlqError::malformed(preview(raw, preview_limit), e))
    }

    /// Serialize to the wire format
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Base64-decode the embedded payload
    pub fn payload_bytes(&self) -> Result<Vec<u8>, DlqError> {
        match self.payload.as_deref() {
            Some(encoded) => decode_payload(encoded),
            None => Err(DlqError::MissingOrInvalidPayload(
                "envelope has no payload field".to_string(),
            )),
        }
    }

    /// Classify the payload for display
    pub fn payload_view(&self) -> PayloadView {
        match self.payload_bytes() {
            Ok(bytes) => PayloadView::classify(bytes),
            Err(e) => PayloadView::Missing(e.to_string()),
        }
    }

    /// Failure time, when `ts` is a representable instant
    pub fn failed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.ts)
    }
}

/// Display form of a decoded payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadView {
    /// Payload bytes are JSON; holds the pretty-printed text
    Json(String),
    /// Payload bytes are not JSON (binary, Avro, plain text, ...)
    Raw(Vec<u8>),
    /// Payload absent or not base64; holds the reason
    Missing(String),
}

impl PayloadView {
    /// Try the decoded bytes as JSON, falling back to raw bytes
    pub fn classify(bytes: Vec<u8>) -> Self {
        match serde_json::from_slice::<serde_json::Value>(&bytes)
            .and_then(|value| serde_json::to_string_pretty(&value))
        {
            Ok(pretty) => PayloadView::Json(pretty),
            Err(_) => PayloadView::Raw(bytes),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, PayloadView::Missing(_))
    }
}

/// Base64-encode payload bytes for embedding in an envelope
pub fn encode_payload(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Base64-decode an embedded payload
pub fn decode_payload(encoded: &str) -> Result<Vec<u8>, DlqError> {
    BASE64
        .decode(encoded.trim())
        .map_err(|e| DlqError::MissingOrInvalidPayload(format!("payload is not valid base64: {}", e)))
}

/// Escaped view of the first `limit` bytes, suffixed with "..." when truncated
pub fn preview(raw: &[u8], limit: usize) -> String {
    let shown = &raw[..raw.len().min(limit)];
    let mut out = shown.escape_ascii().to_string();
    if raw.len() > limit {
        out.push_str("...");
    }
    out
}
