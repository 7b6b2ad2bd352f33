// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{poll, taints};
use crate::error::{DecommissionerError, Result};
use std::env;
use std::time::Duration;

/// Controller configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Delay between two reconciliation iterations
    pub poll_interval: Duration,
    /// Cap for the delay after consecutive snapshot failures
    pub max_backoff: Duration,
    /// Value of the `decommission-pending` taint
    pub taint_value: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            poll_interval: Duration::from_secs(poll::DEFAULT_INTERVAL_SECS),
            max_backoff: Duration::from_secs(poll::DEFAULT_MAX_BACKOFF_SECS),
            taint_value: taints::DEFAULT_VALUE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let interval_secs = parse_secs(
            "POLL_INTERVAL_SECS",
            lookup("POLL_INTERVAL_SECS"),
            poll::DEFAULT_INTERVAL_SECS,
        )?;
        let max_backoff_secs = parse_secs(
            "MAX_BACKOFF_SECS",
            lookup("MAX_BACKOFF_SECS"),
            poll::DEFAULT_MAX_BACKOFF_SECS.max(interval_secs),
        )?;

        if interval_secs == 0 {
            return Err(DecommissionerError::ConfigError(
                "POLL_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }
        if max_backoff_secs < interval_secs {
            return Err(DecommissionerError::ConfigError(format!(
                "MAX_BACKOFF_SECS ({}) must not be lower than POLL_INTERVAL_SECS ({})",
                max_backoff_secs, interval_secs
            )));
        }

        let taint_value = lookup("DECOMMISSION_TAINT_VALUE")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| taints::DEFAULT_VALUE.to_string());

        Ok(Config {
            poll_interval: Duration::from_secs(interval_secs),
            max_backoff: Duration::from_secs(max_backoff_secs),
            taint_value,
        })
    }
}

fn parse_secs(key: &str, value: Option<String>, default: u64) -> Result<u64> {
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|e| {
            DecommissionerError::ConfigError(format!("{} has invalid value '{}': {}", key, v, e))
        }),
    }
}
