// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Polling loop that repeats snapshot, selection and decommissioning until
//! no node runs outdated DaemonSet pods anymore.

use crate::config::Config;
use crate::error::Result;
use crate::kubernetes::collect_snapshot;
use crate::reconcile::candidates::{select_candidates, Candidate};
use crate::reconcile::decommission::{decommission_node, DecommissionOutcome};
use kube::Client;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Counters for one completed iteration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IterationReport {
    pub candidates: usize,
    pub marked: usize,
    pub already_decommissioning: usize,
    pub failed: usize,
}

impl IterationReport {
    pub fn is_done(&self) -> bool {
        self.candidates == 0
    }
}

/// How [`Reconciler::run`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopOutcome {
    /// An iteration found no candidate nodes
    Completed,
    /// Shutdown was requested before that happened
    Cancelled,
}

pub struct Reconciler {
    client: Client,
    config: Config,
}

impl Reconciler {
    pub fn new(client: Client, config: Config) -> Self {
        Self { client, config }
    }

    /// Run iterations until no candidates remain or `shutdown` is cancelled.
    ///
    /// Cancellation is checked before every snapshot and while waiting; a node
    /// update that is already in flight is allowed to finish.
    pub async fn run(&self, shutdown: CancellationToken) -> LoopOutcome {
        let mut consecutive_failures: u32 = 0;

        loop {
            if shutdown.is_cancelled() {
                info!("Shutdown requested, stopping");
                return LoopOutcome::Cancelled;
            }

            match self.run_iteration().await {
                Ok(report) if report.is_done() => {
                    info!("No nodes with old daemonset pods found, exiting");
                    return LoopOutcome::Completed;
                }
                Ok(report) => {
                    consecutive_failures = 0;
                    info!(
                        "Waiting for {} nodes with old daemonset pods to decommission ({} newly marked, {} already decommissioning, {} failed)",
                        report.candidates, report.marked, report.already_decommissioning, report.failed
                    );
                }
                Err(e) => {
                    consecutive_failures = consecutive_failures.saturating_add(1);
                    warn!(
                        "Failed to get candidate nodes ({} consecutive failures): {}",
                        consecutive_failures, e
                    );
                }
            }

            let delay = next_delay(
                self.config.poll_interval,
                self.config.max_backoff,
                consecutive_failures,
            );
            debug!("Next iteration in {:?}", delay);

            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Shutdown requested, stopping");
                    return LoopOutcome::Cancelled;
                }
                _ = sleep(delay) => {}
            }
        }
    }

    /// Collect a snapshot, select candidates and decommission the ready ones.
    ///
    /// A snapshot failure is returned before any node is touched. Node update
    /// failures are counted in the report instead.
    #[instrument(skip(self))]
    pub async fn run_iteration(&self) -> Result<IterationReport> {
        let snapshot = collect_snapshot(&self.client).await?;
        let candidates = select_candidates(&snapshot);

        info!(
            "Found {} candidate nodes out of {} ({} active pods, {} on-delete daemonsets)",
            candidates.len(),
            snapshot.nodes.len(),
            snapshot.pod_count(),
            snapshot.generations.len()
        );

        if candidates.is_empty() {
            return Ok(IterationReport::default());
        }

        Ok(self.act(&candidates).await)
    }

    async fn act(&self, candidates: &[Candidate]) -> IterationReport {
        let mut report = IterationReport {
            candidates: candidates.len(),
            ..Default::default()
        };

        for candidate in candidates {
            match decommission_node(&self.client, candidate, &self.config.taint_value).await {
                Ok(DecommissionOutcome::Marked) => report.marked += 1,
                Ok(DecommissionOutcome::AlreadyDecommissioning { .. }) => {
                    report.already_decommissioning += 1
                }
                Err(e) => {
                    error!("Failed to decommission node {}: {}", candidate.name(), e);
                    report.failed += 1;
                }
            }
        }

        report
    }
}

/// Delay before the next iteration.
///
/// Stays at `interval` while snapshots succeed and on the first failure, then
/// doubles per consecutive failure up to `max_backoff`.
pub fn next_delay(interval: Duration, max_backoff: Duration, consecutive_failures: u32) -> Duration {
    let exponent = consecutive_failures.saturating_sub(1).min(16);
    interval
        .saturating_mul(1 << exponent)
        .min(max_backoff.max(interval))
}
