// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feishu Bitable sync runner.
//!
//! Pushes one daily export into the configured user's bitable. The export
//! path may be given as the first argument; otherwise yesterday's file in
//! `OUTPUT_DIR` is used.

use anyhow::Context;
use feishu_bitable_sync::{
    config::Config,
    db::StateStore,
    services::{BitableClient, HttpTransport, SyncOutcome, SyncService},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;

    let input = match std::env::args_os().nth(1) {
        Some(path) => PathBuf::from(path),
        None => default_input(&config),
    };
    tracing::info!(
        input = %input.display(),
        recipient = %config.user_id,
        include_filtered = config.include_filtered,
        "Starting bitable sync"
    );

    let state = StateStore::load(&config.state_file).context("Failed to load state file")?;
    tracing::info!(path = %config.state_file.display(), "State loaded");

    let transport = HttpTransport::new(&config.base_url, config.http_timeout)
        .context("Failed to build HTTP client")?;
    let client = BitableClient::new(
        Arc::new(transport),
        config.app_id.clone(),
        config.app_secret.clone(),
        config.max_attempts,
    );

    let mut service = SyncService::from_config(&config, client, state);

    match service
        .sync_file(&input, &config.user_id, config.include_filtered)
        .await
    {
        Ok(SyncOutcome::NothingToPush) => {
            tracing::info!("Nothing to push");
            Ok(())
        }
        Ok(SyncOutcome::Pushed {
            table_id, records, ..
        }) => {
            tracing::info!(table_id = %table_id, records, "Push to Feishu succeeded");
            Ok(())
        }
        Err(e) => {
            let step = e.operation().unwrap_or("sync");
            Err(e).with_context(|| format!("Push to Feishu failed at {}", step))
        }
    }
}

/// Yesterday's export, named `YYYY-MM-DD.csv`.
fn default_input(config: &Config) -> PathBuf {
    let yesterday = chrono::Local::now().date_naive() - chrono::Duration::days(1);
    config
        .output_dir
        .join(format!("{}.csv", yesterday.format("%Y-%m-%d")))
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("feishu_bitable_sync=debug,info")),
        )
        .with(format)
        .init();
}
