//! DLQ Viewer - Entry Point
//!
//! Interactive console for inspecting and replaying dead-letter records.

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dlq_viewer::run().await
}
