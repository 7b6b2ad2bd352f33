// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use daemonset_updated::config::Config;
use daemonset_updated::kubernetes::create_client;
use daemonset_updated::reconcile::{LoopOutcome, Reconciler};
use daemonset_updated::shutdown::cancel_on_signal;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting daemonset-updated node decommissioner");

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: poll_interval={:?}, max_backoff={:?}, taint_value={}",
        config.poll_interval, config.max_backoff, config.taint_value
    );

    let client = create_client().await?;
    info!("Connected to Kubernetes cluster");

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    match Reconciler::new(client, config).run(shutdown).await {
        LoopOutcome::Completed => info!("All nodes run up-to-date daemonset pods"),
        LoopOutcome::Cancelled => warn!("Stopped before all outdated nodes were handled"),
    }

    Ok(())
}
