// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client creation from kubeconfig or in-cluster credentials

use crate::error::{DecommissionerError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config as KConfig};
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Create a Kubernetes client.
///
/// Uses the file named by `$KUBECONFIG`, then `$HOME/.kube/config`, and falls
/// back to the in-cluster service account when neither file exists.
pub async fn create_client() -> Result<Client> {
    let kubeconfig_path = resolve_kubeconfig_path(
        env::var_os("KUBECONFIG").map(PathBuf::from),
        env::var_os("HOME").map(PathBuf::from),
        kubeconfig_exists,
    )?;

    match kubeconfig_path {
        Some(path) => create_client_from_kubeconfig_file(&path).await,
        None => {
            info!("No kubeconfig file found, using in-cluster configuration");
            let config = KConfig::incluster().map_err(|e| {
                DecommissionerError::KubeconfigError(format!(
                    "Failed to load in-cluster config: {}",
                    e
                ))
            })?;
            Client::try_from(config).map_err(|e| {
                DecommissionerError::KubeconfigError(format!("Failed to create client: {}", e))
            })
        }
    }
}

/// Pick the first existing kubeconfig file among `$KUBECONFIG` and `$HOME/.kube/config`.
///
/// Only a missing file moves on to the next location; any other error while
/// checking a path is returned.
pub fn resolve_kubeconfig_path(
    env_path: Option<PathBuf>,
    home: Option<PathBuf>,
    exists: impl Fn(&Path) -> io::Result<bool>,
) -> Result<Option<PathBuf>> {
    let env_path = env_path.filter(|p| !p.as_os_str().is_empty());
    let home_path = home.map(|h| h.join(".kube").join("config"));

    for path in env_path.into_iter().chain(home_path) {
        match exists(&path) {
            Ok(true) => return Ok(Some(path)),
            Ok(false) => continue,
            Err(e) => {
                return Err(DecommissionerError::KubeconfigError(format!(
                    "Failed to access {}: {}",
                    path.display(),
                    e
                )))
            }
        }
    }

    Ok(None)
}

/// `Ok(false)` only when nothing exists at `path`
fn kubeconfig_exists(path: &Path) -> io::Result<bool> {
    match std::fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Create a Kubernetes client from a kubeconfig file on disk
#[instrument(skip(path), fields(path = %path.display()))]
async fn create_client_from_kubeconfig_file(path: &Path) -> Result<Client> {
    info!("Loading kubeconfig from {}", path.display());

    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        DecommissionerError::KubeconfigError(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))
    })?;

    let kubeconfig: Kubeconfig = serde_yaml::from_str(&contents).map_err(|e| {
        DecommissionerError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e))
    })?;

    let client_config = KConfig::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(|e| {
            DecommissionerError::KubeconfigError(format!("Failed to create config: {}", e))
        })?;

    Client::try_from(client_config)
        .map_err(|e| DecommissionerError::KubeconfigError(format!("Failed to create client: {}", e)))
}
