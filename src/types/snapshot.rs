// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{labels, ON_DELETE_STRATEGY, TERMINAL_POD_PHASES};
use k8s_openapi::api::apps::v1::DaemonSet;
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::ResourceExt;
use std::collections::{BTreeMap, HashMap};

/// Identity of a DaemonSet as seen from a pod's owner reference.
///
/// The UID distinguishes a recreated DaemonSet from the one that created
/// older pods under the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DaemonSetKey {
    pub name: String,
    pub namespace: String,
    pub uid: String,
}

impl DaemonSetKey {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            uid: uid.into(),
        }
    }
}

/// Current template generation of every OnDelete DaemonSet
pub type GenerationMap = HashMap<DaemonSetKey, i64>;

/// A node together with the pods currently occupying it
#[derive(Debug, Clone)]
pub struct NodeState {
    pub node: Node,
    pub pods: Vec<Pod>,
}

impl NodeState {
    pub fn name(&self) -> String {
        self.node.name_any()
    }

    pub fn lifecycle_status(&self) -> Option<&str> {
        self.node
            .labels()
            .get(labels::LIFECYCLE_STATUS)
            .map(String::as_str)
    }
}

/// Immutable view of the cluster, rebuilt from scratch every iteration
#[derive(Debug, Clone, Default)]
pub struct ClusterSnapshot {
    pub nodes: BTreeMap<String, NodeState>,
    pub generations: GenerationMap,
}

impl ClusterSnapshot {
    /// Assemble a snapshot from already listed objects.
    ///
    /// Pods in a terminal phase and pods bound to unknown nodes are dropped,
    /// and only DaemonSets using the OnDelete strategy are kept.
    pub fn from_parts(nodes: Vec<Node>, pods: Vec<Pod>, daemonsets: Vec<DaemonSet>) -> Self {
        let mut node_states: BTreeMap<String, NodeState> = nodes
            .into_iter()
            .map(|node| {
                (
                    node.name_any(),
                    NodeState {
                        node,
                        pods: Vec::new(),
                    },
                )
            })
            .collect();

        for pod in pods.into_iter().filter(is_pod_active) {
            let Some(node_name) = pod.spec.as_ref().and_then(|s| s.node_name.clone()) else {
                continue;
            };
            if let Some(state) = node_states.get_mut(&node_name) {
                state.pods.push(pod);
            }
        }

        let generations = daemonsets.iter().filter_map(on_delete_generation).collect();

        Self {
            nodes: node_states,
            generations,
        }
    }

    pub fn pod_count(&self) -> usize {
        self.nodes.values().map(|n| n.pods.len()).sum()
    }
}

/// Whether the pod still occupies its node (not Succeeded or Failed)
pub fn is_pod_active(pod: &Pod) -> bool {
    let phase = pod.status.as_ref().and_then(|s| s.phase.as_deref());
    !phase.is_some_and(|p| TERMINAL_POD_PHASES.contains(&p))
}

/// Key and generation of an OnDelete DaemonSet, `None` for any other strategy
pub fn on_delete_generation(ds: &DaemonSet) -> Option<(DaemonSetKey, i64)> {
    let strategy = ds
        .spec
        .as_ref()
        .and_then(|s| s.update_strategy.as_ref())
        .and_then(|u| u.type_.as_deref());
    if strategy != Some(ON_DELETE_STRATEGY) {
        return None;
    }

    let uid = ds.uid()?;
    let generation = ds.metadata.generation?;
    let key = DaemonSetKey::new(ds.name_any(), ds.namespace().unwrap_or_default(), uid);

    Some((key, generation))
}
