// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-iteration view of the cluster state.

pub mod snapshot;

pub use snapshot::{ClusterSnapshot, DaemonSetKey, GenerationMap, NodeState};
