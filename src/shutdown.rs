// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Translating process signals into loop cancellation

use std::future::Future;
use std::io;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cancel `token` on SIGINT or SIGTERM
pub async fn cancel_on_signal(token: CancellationToken) {
    cancel_when(token, shutdown_signal()).await
}

/// Cancel `token` once `signal` fires.
///
/// If the signal listener fails, the token is never cancelled and the loop
/// runs until it completes on its own.
pub async fn cancel_when<F>(token: CancellationToken, signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            info!("Received shutdown signal");
            token.cancel();
        }
        Err(e) => {
            warn!("Failed to listen for shutdown signals, running until done: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res,
        _ = sigterm.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> io::Result<()> {
    tokio::signal::ctrl_c().await
}
