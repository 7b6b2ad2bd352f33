// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Listing nodes, pods and DaemonSets into a [`ClusterSnapshot`]

use crate::error::{DecommissionerError, Result};
use crate::types::ClusterSnapshot;
use k8s_openapi::api::apps::v1::DaemonSet;
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::{api::ListParams, Api, Client};
use tracing::{debug, instrument};

/// Read the current cluster state.
///
/// The three lists are not read atomically. Any failing list aborts the whole
/// snapshot so that no decision is made on partial data.
#[instrument(skip(client))]
pub async fn collect_snapshot(client: &Client) -> Result<ClusterSnapshot> {
    let lp = ListParams::default();

    let nodes: Api<Node> = Api::all(client.clone());
    let node_list = nodes.list(&lp).await.map_err(|e| list_failed("nodes", e))?;

    let pods: Api<Pod> = Api::all(client.clone());
    let pod_list = pods.list(&lp).await.map_err(|e| list_failed("pods", e))?;

    let daemonsets: Api<DaemonSet> = Api::all(client.clone());
    let daemonset_list = daemonsets
        .list(&lp)
        .await
        .map_err(|e| list_failed("daemonsets", e))?;

    debug!(
        "Listed {} nodes, {} pods, {} daemonsets",
        node_list.items.len(),
        pod_list.items.len(),
        daemonset_list.items.len()
    );

    Ok(ClusterSnapshot::from_parts(
        node_list.items,
        pod_list.items,
        daemonset_list.items,
    ))
}

fn list_failed(resource: &str, err: kube::Error) -> DecommissionerError {
    DecommissionerError::SnapshotError(format!("failed to list {}: {}", resource, err))
}
