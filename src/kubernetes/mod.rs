// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation and reading cluster state.

pub mod client;
pub mod snapshot;

pub use client::create_client;
pub use snapshot::collect_snapshot;
