//! Runtime entry points
//!
//! Opens the audit log once at startup and hands it to whatever needs it.

use anyhow::{Context, Result};
use tracing::info;

use crate::config::ServerConfig;
use crate::probability::{AuditRecorder, ProbabilityApiServer};

async fn open_recorder(config: &ServerConfig) -> Result<AuditRecorder> {
    AuditRecorder::open(&config.database_path, config.chapter.clone())
        .await
        .with_context(|| {
            format!(
                "Failed to open audit log at {}",
                config.database_path.display()
            )
        })
}

/// Run the HTTP API until shutdown
pub async fn serve(config: ServerConfig) -> Result<()> {
    config.validate()?;

    let recorder = open_recorder(&config).await?;
    info!(
        "Recording computations under \"{}\" in {}",
        recorder.chapter(),
        config.database_path.display()
    );

    ProbabilityApiServer::new(recorder, config).start().await
}

/// Print the most recent records as pretty JSON
pub async fn print_history(config: &ServerConfig, limit: u32) -> Result<()> {
    let recorder = open_recorder(config).await?;
    let records = recorder
        .recent(limit)
        .await
        .context("Failed to read history")?;
    recorder.close().await;

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
