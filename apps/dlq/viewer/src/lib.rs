//! DLQ Viewer
//!
//! An operator console for a Kafka dead-letter queue.
//!
//! ## Architecture
//!
//! ```text
//! Kafka (orders-dlq)
//!   ↓ (Consumer Group: dlq-viewer, manual commit)
//! DlqViewer<KafkaDlqConsumer, KafkaReplayProducer, StdinPrompt>
//!   ↓ decode envelope, print, ask r/skip
//!   ├─ r    → Kafka (orders), key "retry", decoded payload bytes
//!   └─ else → skip
//!   ↓
//! commit DLQ offset
//! ```
//!
//! ## Features
//!
//! - Environment configuration with command-line overrides
//! - Startup broker probe for both connections
//! - Graceful shutdown on Ctrl+C / SIGTERM with both connections released

mod cli;

pub use cli::Args;

use clap::Parser;
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv, KafkaConfig};
use dlq_replay::{DlqSource, DlqViewer, KafkaDlqConsumer, KafkaReplayProducer, StdinPrompt, ViewerConfig};
use eyre::{Result, WrapErr};
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

/// Default log filter when `RUST_LOG` is unset
const DEFAULT_LOG_DIRECTIVE: &str = "warn,dlq_viewer=info,dlq_replay=info";

/// Run the DLQ viewer
///
/// This is the main entry point. It:
/// 1. Sets up error reports and logging (stderr, env-aware)
/// 2. Loads Kafka configuration from the environment and command line
/// 3. Connects the DLQ consumer and the replay producer
/// 4. Runs the interactive loop until interrupted
/// 5. Releases both connections
///
/// # Errors
///
/// Returns an error if:
/// - Kafka configuration is invalid
/// - The broker cannot be reached
/// - Console I/O fails
pub async fn run() -> Result<()> {
    install_color_eyre();

    let environment = Environment::from_env();
    init_tracing(&environment, DEFAULT_LOG_DIRECTIVE);

    let args = Args::parse();

    let kafka_config = args.apply(KafkaConfig::from_env().wrap_err("Failed to load Kafka configuration")?);
    info!(
        brokers = %kafka_config.brokers,
        dlq_topic = %kafka_config.dlq_topic,
        original_topic = %kafka_config.original_topic,
        group = %kafka_config.consumer_group,
        "Kafka configuration loaded"
    );

    let mut source = KafkaDlqConsumer::connect(&kafka_config).wrap_err("Failed to connect DLQ consumer")?;

    let sink = match KafkaReplayProducer::connect(&kafka_config) {
        Ok(sink) => sink,
        Err(e) => {
            source.close().await;
            return Err(e).wrap_err("Failed to connect replay producer");
        }
    };

    let viewer_config = ViewerConfig::from_kafka_config(&kafka_config).with_replay_headers(!args.no_replay_headers);

    // Set up a shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Spawn shutdown signal handler
    tokio::spawn(async move {
        if let Err(e) = shutdown_signal().await {
            error!("Error waiting for shutdown signal: {}", e);
        }
        let _ = shutdown_tx.send(true);
    });

    let mut viewer = DlqViewer::new(source, sink, StdinPrompt::new(), viewer_config);
    let result = viewer.run(shutdown_rx).await;
    viewer.close().await;

    let stats = result.wrap_err("DLQ viewer stopped with an error")?;
    info!(%stats, "DLQ viewer finished");

    // stdin may still be blocked in a read; end the process explicitly
    std::process::exit(0)
}

/// Wait for a shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())
        .wrap_err("Failed to install SIGTERM handler")?;

    #[cfg(unix)]
    let terminate = terminate.recv();

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Option<()>>();

    tokio::select! {
        res = signal::ctrl_c() => {
            res.wrap_err("Failed to install Ctrl+C handler")?;
            info!("Received Ctrl+C, initiating shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        },
    }

    Ok(())
}
