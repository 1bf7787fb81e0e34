//! Console rendering
//!
//! Pure formatting of records and session messages; the viewer decides where
//! the text goes.

use crate::envelope::{DlqEnvelope, PayloadView};
use crate::record::RawRecord;
use crate::viewer::ViewerStats;
use chrono::SecondsFormat;

const RULE: &str = "---------------------------------------------------";

/// Placeholder shown when an envelope carries no usable payload
pub const NO_PAYLOAD: &str = "<no payload>";

/// Bordered block for a well-formed record
pub fn record_block(record: &RawRecord, envelope: &DlqEnvelope, view: &PayloadView) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n=== DLQ RECORD {} ===\n", record));
    out.push_str(&format!("  error : {}\n", envelope.error));
    out.push_str(&format!("  source: {}\n", envelope.source_topic));
    out.push_str(&format!("  ts    : {}\n", timestamp(envelope)));
    out.push_str("  payload (decoded):\n");
    out.push_str(&payload(view));
    out.push('\n');
    out.push_str(RULE);
    out
}

/// Payload section: pretty JSON, escaped raw bytes, or the placeholder
pub fn payload(view: &PayloadView) -> String {
    match view {
        PayloadView::Json(pretty) => pretty.clone(),
        PayloadView::Raw(bytes) => format!("  raw ({} bytes): {}", bytes.len(), bytes.escape_ascii()),
        PayloadView::Missing(_) => format!("  {}", NO_PAYLOAD),
    }
}

/// RFC 3339 rendering of `ts` with the raw millis alongside
pub fn timestamp(envelope: &DlqEnvelope) -> String {
    match envelope.failed_at() {
        Some(at) => format!(
            "{} ({})",
            at.to_rfc3339_opts(SecondsFormat::Millis, true),
            envelope.ts
        ),
        None => envelope.ts.to_string(),
    }
}

/// Warning for a record that is not a decodable envelope
pub fn malformed(record: &RawRecord, cause: &str, preview: &str) -> String {
    format!(
        "\n!! Could not parse envelope at {}: {}\nRaw: {}",
        record, cause, preview
    )
}

pub fn banner(dlq_topic: &str, original_topic: &str, consumer_group: &str) -> String {
    format!(
        "DLQ viewer started: reading '{}' as group '{}', retries go to '{}'. Press Ctrl-C to quit.",
        dlq_topic, consumer_group, original_topic
    )
}

pub fn replayed(topic: &str, partition: i32, offset: i64) -> String {
    format!("Re-published to {} (partition {}, offset {})", topic, partition, offset)
}

pub fn replay_failed(reason: &str) -> String {
    format!("Re-publish failed: {}", reason)
}

pub fn skipped() -> &'static str {
    "Skipped."
}

pub fn farewell() -> &'static str {
    "\nExiting viewer."
}

pub fn summary(stats: &ViewerStats) -> String {
    format!("Session: {}", stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders_envelope() -> DlqEnvelope {
        DlqEnvelope::wrap("orders", "json_unmarshal", br#"{"id":1}"#, 1_715_200_000_000)
    }

    #[test]
    fn test_record_block_with_json_payload() {
        let envelope = orders_envelope();
        let record = RawRecord::new("orders-dlq", 0, 7, Vec::new());
        let block = record_block(&record, &envelope, &envelope.payload_view());

        assert!(block.contains("DLQ RECORD orders-dlq/0@7"));
        assert!(block.contains("  error : json_unmarshal\n"));
        assert!(block.contains("  source: orders\n"));
        assert!(block.contains("  ts    : 2024-05-08T20:26:40.000Z (1715200000000)\n"));
        assert!(block.contains("{\n  \"id\": 1\n}"));
        assert!(block.ends_with(RULE));
    }

    #[test]
    fn test_missing_payload_placeholder() {
        let view = PayloadView::Missing("envelope has no payload field".into());
        assert_eq!(payload(&view), "  <no payload>");
    }

    #[test]
    fn test_raw_payload_is_escaped() {
        let view = PayloadView::Raw(vec![b'o', b'k', 0x00, b'\n']);
        assert_eq!(payload(&view), "  raw (4 bytes): ok\\x00\\n");
    }

    #[test]
    fn test_out_of_range_timestamp_shows_millis() {
        let envelope = DlqEnvelope { ts: i64::MIN, ..orders_envelope() };
        assert_eq!(timestamp(&envelope), i64::MIN.to_string());
    }

    #[test]
    fn test_summary() {
        let stats = ViewerStats { received: 2, skipped: 2, ..ViewerStats::default() };
        assert!(summary(&stats).starts_with("Session: 2 received, 0 malformed, 2 skipped"));
    }

    #[test]
    fn test_malformed_warning() {
        let record = RawRecord::new("orders-dlq", 1, 3, b"not-json-at-all".to_vec());
        let text = malformed(&record, "expected value at line 1 column 1", "not-json-at-all");

        assert!(text.contains("orders-dlq/1@3"));
        assert!(text.contains("expected value at line 1 column 1"));
        assert!(text.ends_with("Raw: not-json-at-all"));
    }
}
