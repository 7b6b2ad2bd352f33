// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::reconcile::staleness::is_stale;
use crate::types::{ClusterSnapshot, NodeState};
use k8s_openapi::api::core::v1::Node;
use kube::ResourceExt;
use tracing::debug;

/// A node hosting at least one outdated DaemonSet pod
#[derive(Debug, Clone)]
pub struct Candidate {
    pub node: Node,
    /// `namespace/name` of every stale pod found on the node
    pub stale_pods: Vec<String>,
}

impl Candidate {
    pub fn name(&self) -> String {
        self.node.name_any()
    }
}

/// Nodes of the snapshot that run at least one stale pod, ordered by node name
pub fn select_candidates(snapshot: &ClusterSnapshot) -> Vec<Candidate> {
    snapshot
        .nodes
        .values()
        .filter(|state| !state.pods.is_empty())
        .filter_map(|state| candidate_for(state, snapshot))
        .collect()
}

fn candidate_for(state: &NodeState, snapshot: &ClusterSnapshot) -> Option<Candidate> {
    let stale_pods: Vec<String> = state
        .pods
        .iter()
        .filter(|pod| is_stale(pod, &snapshot.generations))
        .map(|pod| format!("{}/{}", pod.namespace().unwrap_or_default(), pod.name_any()))
        .collect();

    if stale_pods.is_empty() {
        return None;
    }

    debug!(
        "Node {} runs outdated daemonset pods: {}",
        state.name(),
        stale_pods.join(", ")
    );

    Some(Candidate {
        node: state.node.clone(),
        stale_pods,
    })
}
