//! Interactive DLQ viewer loop.
//!
//! This module provides:
//! - `DlqViewer`, which owns the DLQ source, the replay sink and the operator prompt
//! - `RecordOutcome`, the terminal state of each record
//! - `ViewerStats`, the per-session summary
//!
//! Each record goes through
//! `Received → {Malformed: commit, WellFormed → {Retry: publish + commit, Skip: commit}}`.
//! The commit happens whatever the decision or publish result, so every
//! delivered record is committed exactly once. The only exception is a shutdown
//! while the operator is being prompted: that record is left uncommitted and
//! is redelivered to the next session.

use crate::config::ViewerConfig;
use crate::consumer::DlqSource;
use crate::decision::Decision;
use crate::envelope::{DlqEnvelope, PayloadView};
use crate::error::DlqError;
use crate::producer::{Delivery, ReplayMessage, ReplaySink, HEADER_DLQ_OFFSET, HEADER_ERROR, HEADER_FAILED_AT};
use crate::prompt::OperatorPrompt;
use crate::record::RawRecord;
use crate::render;
use std::fmt;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Terminal state of a single record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Not a decodable envelope; committed without prompting
    Malformed,
    /// Operator skipped; committed
    Skipped,
    /// Payload re-published; committed
    Replayed(Delivery),
    /// Re-publish failed; committed anyway
    ReplayFailed(String),
    /// Shutdown or closed input while prompting; not committed
    Interrupted,
}

/// Counters for one viewer session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewerStats {
    pub received: u64,
    pub malformed: u64,
    pub skipped: u64,
    pub replayed: u64,
    pub replay_failures: u64,
    pub commit_failures: u64,
}

impl ViewerStats {
    fn record(&mut self, outcome: &RecordOutcome) {
        match outcome {
            RecordOutcome::Malformed => self.malformed += 1,
            RecordOutcome::Skipped => self.skipped += 1,
            RecordOutcome::Replayed(_) => self.replayed += 1,
            RecordOutcome::ReplayFailed(_) => self.replay_failures += 1,
            RecordOutcome::Interrupted => {}
        }
    }
}

impl fmt::Display for ViewerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} received, {} malformed, {} skipped, {} replayed, {} replay failures, {} commit failures",
            self.received,
            self.malformed,
            self.skipped,
            self.replayed,
            self.replay_failures,
            self.commit_failures
        )
    }
}

/// DLQ viewer session.
///
/// Owns both broker handles for its whole lifetime. Call [`DlqViewer::close`]
/// after [`DlqViewer::run`] returns, on success and on error alike.
pub struct DlqViewer<S, R, O>
where
    S: DlqSource,
    R: ReplaySink,
    O: OperatorPrompt,
{
    source: S,
    sink: R,
    prompt: O,
    config: ViewerConfig,
    stats: ViewerStats,
    closed: bool,
}

impl<S, R, O> DlqViewer<S, R, O>
where
    S: DlqSource,
    R: ReplaySink,
    O: OperatorPrompt,
{
    pub fn new(source: S, sink: R, prompt: O, config: ViewerConfig) -> Self {
        Self {
            source,
            sink,
            prompt,
            config,
            stats: ViewerStats::default(),
            closed: false,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn stats(&self) -> &ViewerStats {
        &self.stats
    }

    /// Run the viewer loop until shutdown, closed input or a fatal error.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<ViewerStats, DlqError> {
        println!(
            "{}",
            render::banner(
                &self.config.dlq_topic,
                &self.config.original_topic,
                &self.config.consumer_group
            )
        );
        info!(
            dlq_topic = %self.config.dlq_topic,
            original_topic = %self.config.original_topic,
            group = %self.config.consumer_group,
            "Starting DLQ viewer"
        );

        loop {
            if *shutdown.borrow() {
                info!("Received shutdown signal, stopping viewer");
                break;
            }

            let received = tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => {
                    info!("Received shutdown signal while waiting for records");
                    break;
                }
                received = self.source.recv() => received,
            };

            let record = match received {
                Ok(record) => record,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(
                        error = %e,
                        backoff_ms = self.config.recv_error_backoff.as_millis() as u64,
                        "Error waiting for DLQ record, backing off"
                    );
                    tokio::select! {
                        biased;
                        _ = shutdown_requested(&mut shutdown) => break,
                        _ = tokio::time::sleep(self.config.recv_error_backoff) => {}
                    }
                    continue;
                }
            };

            if self.process_record(record, &mut shutdown).await? == RecordOutcome::Interrupted {
                break;
            }
        }

        println!("{}", render::farewell());
        println!("{}", render::summary(&self.stats));
        info!(
            received = self.stats.received,
            malformed = self.stats.malformed,
            skipped = self.stats.skipped,
            replayed = self.stats.replayed,
            replay_failures = self.stats.replay_failures,
            commit_failures = self.stats.commit_failures,
            "DLQ viewer stopped"
        );

        Ok(self.stats.clone())
    }

    /// Take one record through decode, display, decision and commit.
    pub async fn process_record(
        &mut self,
        record: RawRecord,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<RecordOutcome, DlqError> {
        self.stats.received += 1;

        let envelope = match DlqEnvelope::decode(&record.payload, self.config.preview_limit) {
            Ok(envelope) => envelope,
            Err(DlqError::MalformedEnvelope { preview, cause }) => {
                warn!(record = %record, error = %cause, "Could not parse envelope");
                println!("{}", render::malformed(&record, &cause, &preview));
                return Ok(self.finish(&record, RecordOutcome::Malformed).await);
            }
            Err(e) => return Err(e),
        };

        let view = envelope.payload_view();
        if let PayloadView::Missing(reason) = &view {
            debug!(record = %record, reason = %reason, "Envelope has no usable payload");
        }
        println!("{}", render::record_block(&record, &envelope, &view));

        if *shutdown.borrow() {
            info!(record = %record, "Shutdown before prompting, record left uncommitted");
            return Ok(RecordOutcome::Interrupted);
        }

        let answer = tokio::select! {
            biased;
            _ = shutdown_requested(shutdown) => {
                info!(record = %record, "Shutdown while prompting, record left uncommitted");
                return Ok(RecordOutcome::Interrupted);
            }
            answer = self.prompt.ask(&self.config.prompt) => answer?,
        };

        let Some(answer) = answer else {
            info!(record = %record, "Operator input closed, record left uncommitted");
            return Ok(RecordOutcome::Interrupted);
        };

        let outcome = match Decision::parse(&answer) {
            Decision::Retry => match self.replay(&record, &envelope).await {
                Ok(delivery) => {
                    println!(
                        "{}",
                        render::replayed(&self.config.original_topic, delivery.partition, delivery.offset)
                    );
                    RecordOutcome::Replayed(delivery)
                }
                Err(e) => {
                    error!(record = %record, error = %e, "Re-publish failed");
                    println!("{}", render::replay_failed(&e.to_string()));
                    RecordOutcome::ReplayFailed(e.to_string())
                }
            },
            Decision::Skip => {
                println!("{}", render::skipped());
                RecordOutcome::Skipped
            }
        };

        Ok(self.finish(&record, outcome).await)
    }

    /// Release both broker connections. Idempotent.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.source.close().await;
        self.sink.close().await;
        self.closed = true;
        debug!("Viewer connections released");
    }

    /// Decode the payload again and publish the raw bytes to the original topic
    async fn replay(&mut self, record: &RawRecord, envelope: &DlqEnvelope) -> Result<Delivery, DlqError> {
        let payload = envelope.payload_bytes()?;
        let message = ReplayMessage {
            topic: self.config.original_topic.clone(),
            key: self.config.retry_key.clone(),
            payload,
            headers: self.replay_headers(record, envelope),
        };

        self.sink.publish(&message, self.config.publish_timeout).await
    }

    fn replay_headers(&self, record: &RawRecord, envelope: &DlqEnvelope) -> Vec<(String, String)> {
        if !self.config.replay_headers {
            return Vec::new();
        }
        vec![
            (HEADER_ERROR.to_string(), envelope.error.clone()),
            (HEADER_FAILED_AT.to_string(), envelope.ts.to_string()),
            (HEADER_DLQ_OFFSET.to_string(), record.to_string()),
        ]
    }

    /// Commit the record and count the outcome
    async fn finish(&mut self, record: &RawRecord, outcome: RecordOutcome) -> RecordOutcome {
        if let Err(e) = self.source.commit(record).await {
            self.stats.commit_failures += 1;
            error!(record = %record, error = %e, "Failed to commit DLQ offset");
        }
        self.stats.record(&outcome);
        outcome
    }
}

/// Resolves once shutdown has been requested or the sender is gone
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
