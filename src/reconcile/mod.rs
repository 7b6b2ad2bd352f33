// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Detection of outdated DaemonSet pods and decommissioning of their nodes.

pub mod candidates;
pub mod decommission;
pub mod runner;
pub mod staleness;

pub use candidates::{select_candidates, Candidate};
pub use decommission::{decommission_node, mark_for_decommission, DecommissionOutcome};
pub use runner::{IterationReport, LoopOutcome, Reconciler};
pub use staleness::is_stale;
