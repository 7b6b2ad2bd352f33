// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Node label keys and values driving the decommission flow
pub mod labels {
    /// Lifecycle marker watched by the external node lifecycle manager
    pub const LIFECYCLE_STATUS: &str = "lifecycle-status";
    /// Only nodes in this state are transitioned
    pub const STATUS_READY: &str = "ready";
    pub const STATUS_DECOMMISSION_PENDING: &str = "decommission-pending";
    /// Set by the DaemonSet controller on every pod it creates
    pub const POD_TEMPLATE_GENERATION: &str = "pod-template-generation";
}

/// Scheduling taint added to nodes marked for decommissioning
pub mod taints {
    pub const DECOMMISSION_PENDING_KEY: &str = "decommission-pending";
    pub const DEFAULT_VALUE: &str = "daemonset-updated";
    pub const EFFECT_NO_SCHEDULE: &str = "NoSchedule";
}

/// Owner reference kind of pods created by a DaemonSet
pub const DAEMONSET_KIND: &str = "DaemonSet";

/// Update strategy that leaves pod replacement to manual deletion
pub const ON_DELETE_STRATEGY: &str = "OnDelete";

/// Pod phases that no longer occupy a node
pub const TERMINAL_POD_PHASES: [&str; 2] = ["Succeeded", "Failed"];

/// Polling configuration
pub mod poll {
    /// Fixed delay between iterations
    pub const DEFAULT_INTERVAL_SECS: u64 = 30;
    /// Upper bound for the delay after repeated snapshot failures
    pub const DEFAULT_MAX_BACKOFF_SECS: u64 = 300;
}
