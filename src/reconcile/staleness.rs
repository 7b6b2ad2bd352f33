// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{labels, DAEMONSET_KIND};
use crate::types::{DaemonSetKey, GenerationMap};
use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;

/// Check whether a pod was created from an older template of an OnDelete DaemonSet.
///
/// Owners missing from `generations` and pods without a numeric
/// `pod-template-generation` label never count as stale.
pub fn is_stale(pod: &Pod, generations: &GenerationMap) -> bool {
    let namespace = pod.namespace().unwrap_or_default();

    pod.owner_references()
        .iter()
        .filter(|owner| owner.kind == DAEMONSET_KIND)
        .any(|owner| {
            let key = DaemonSetKey::new(&owner.name, &namespace, &owner.uid);
            let Some(&current) = generations.get(&key) else {
                return false;
            };
            pod_template_generation(pod).is_some_and(|generation| generation != current)
        })
}

/// Generation recorded on the pod by the DaemonSet controller
pub fn pod_template_generation(pod: &Pod) -> Option<i64> {
    pod.labels()
        .get(labels::POD_TEMPLATE_GENERATION)
        .and_then(|v| v.parse().ok())
}
