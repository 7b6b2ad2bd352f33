// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Marking nodes for decommissioning through a label and a NoSchedule taint

use crate::constants::{labels, taints};
use crate::error::Result;
use crate::reconcile::candidates::Candidate;
use k8s_openapi::api::core::v1::{Node, NodeSpec, Taint};
use kube::{api::PostParams, Api, Client, ResourceExt};
use tracing::{debug, info, instrument};

/// Result of handling a single candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecommissionOutcome {
    /// The node was labelled and tainted in this iteration
    Marked,
    /// The node is not `ready` and was left untouched
    AlreadyDecommissioning { status: Option<String> },
}

/// Return the updated node, or `None` when its lifecycle status is not `ready`.
///
/// The taint is only added if no `decommission-pending` NoSchedule taint exists yet.
pub fn mark_for_decommission(node: &Node, taint_value: &str) -> Option<Node> {
    let status = node.labels().get(labels::LIFECYCLE_STATUS);
    if status.map(String::as_str) != Some(labels::STATUS_READY) {
        return None;
    }

    let mut updated = node.clone();
    updated.labels_mut().insert(
        labels::LIFECYCLE_STATUS.to_string(),
        labels::STATUS_DECOMMISSION_PENDING.to_string(),
    );

    let node_taints = updated
        .spec
        .get_or_insert_with(NodeSpec::default)
        .taints
        .get_or_insert_with(Vec::new);
    let already_tainted = node_taints.iter().any(|t| {
        t.key == taints::DECOMMISSION_PENDING_KEY && t.effect == taints::EFFECT_NO_SCHEDULE
    });
    if !already_tainted {
        node_taints.push(Taint {
            key: taints::DECOMMISSION_PENDING_KEY.to_string(),
            value: Some(taint_value.to_string()),
            effect: taints::EFFECT_NO_SCHEDULE.to_string(),
            time_added: None,
        });
    }

    Some(updated)
}

/// Decommission a candidate node unless it is already on its way out.
///
/// Running pods are left alone; eviction is up to whoever watches the label.
#[instrument(skip(client, candidate, taint_value), fields(node = %candidate.name()))]
pub async fn decommission_node(
    client: &Client,
    candidate: &Candidate,
    taint_value: &str,
) -> Result<DecommissionOutcome> {
    let Some(updated) = mark_for_decommission(&candidate.node, taint_value) else {
        let status = candidate
            .node
            .labels()
            .get(labels::LIFECYCLE_STATUS)
            .cloned();
        debug!("Node is not ready (status {:?}), skipping", status);
        return Ok(DecommissionOutcome::AlreadyDecommissioning { status });
    };

    let nodes: Api<Node> = Api::all(client.clone());
    nodes
        .replace(&candidate.name(), &PostParams::default(), &updated)
        .await?;

    info!("Marked node {} for decommissioning", candidate.name());
    Ok(DecommissionOutcome::Marked)
}
