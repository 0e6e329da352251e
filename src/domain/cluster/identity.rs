// Copyright 2025 Symbiosis Team.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Kubeconfig materialization for a platform cluster

use crate::infrastructure::constants::{
    DEFAULT_KUBECONFIG_DIR, DEFAULT_KUBECONFIG_FILE, KUBECONFIG_FILE_PREFIX,
};
use crate::infrastructure::platform::{ClusterCredentials, PlatformApi};
use crate::shared::error::{Result, SymError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use kube::config::Kubeconfig;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Location of a kubeconfig granting access to one cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterIdentity {
    kube_config_path: PathBuf,
    temporary: bool,
}

impl ClusterIdentity {
    /// Wraps an existing kubeconfig file. It is never removed by [`remove`](Self::remove).
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            kube_config_path: path.into(),
            temporary: false,
        }
    }

    /// Fetches the cluster endpoint and credentials and writes a kubeconfig
    /// to `output`, or to a fresh temporary file when no output is given.
    pub async fn materialize(
        platform: &dyn PlatformApi,
        cluster_name: &str,
        output: Option<&Path>,
    ) -> Result<Self> {
        let cluster = platform.describe_cluster(cluster_name).await?;
        let credentials = platform.cluster_credentials(cluster_name).await?;

        let content = render_kubeconfig(cluster_name, &cluster.api_server_endpoint, &credentials)?;

        let identity = match output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &content)?;
                Self::from_path(path)
            }
            None => {
                let file = tempfile::Builder::new()
                    .prefix(KUBECONFIG_FILE_PREFIX)
                    .tempfile()?;
                let (_, path) = file.keep().map_err(|e| SymError::Io(e.error))?;
                std::fs::write(&path, &content)?;
                Self {
                    kube_config_path: path,
                    temporary: true,
                }
            }
        };

        debug!(
            "Wrote kubeconfig for cluster {} to {}",
            cluster_name,
            identity.kube_config_path.display()
        );
        Ok(identity)
    }

    pub fn kube_config_path(&self) -> &Path {
        &self.kube_config_path
    }

    /// Deletes the kubeconfig if this identity created it as a temporary file.
    pub fn remove(&self) -> Result<()> {
        if self.temporary {
            std::fs::remove_file(&self.kube_config_path)?;
        }
        Ok(())
    }

    /// Merges this kubeconfig into `target`. Entries already present in
    /// `target` keep their values.
    pub fn merge_into(&self, target: &Path) -> Result<()> {
        let ours = read_kubeconfig(&self.kube_config_path)?;

        let merged = if target.exists() {
            read_kubeconfig(target)?
                .merge(ours)
                .map_err(|e| SymError::KubeError(format!("Failed to merge kubeconfig: {}", e)))?
        } else {
            ours
        };

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(target, serde_yaml::to_string(&merged)?)?;

        info!("Merged kubeconfig into {}", target.display());
        Ok(())
    }

    pub fn default_kubeconfig_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(DEFAULT_KUBECONFIG_DIR)
                .join(DEFAULT_KUBECONFIG_FILE)
        })
    }
}

fn read_kubeconfig(path: &Path) -> Result<Kubeconfig> {
    Kubeconfig::read_from(path).map_err(|e| {
        SymError::KubeError(format!(
            "Failed to load kubeconfig {}: {}",
            path.display(),
            e
        ))
    })
}

#[derive(Serialize)]
struct KubeConfigFile {
    #[serde(rename = "apiVersion")]
    api_version: &'static str,
    kind: &'static str,
    clusters: Vec<NamedEntry<ClusterEntry>>,
    contexts: Vec<NamedEntry<ContextEntry>>,
    users: Vec<NamedEntry<UserEntry>>,
    #[serde(rename = "current-context")]
    current_context: String,
}

#[derive(Serialize)]
struct NamedEntry<T> {
    name: String,
    #[serde(flatten)]
    entry: T,
}

#[derive(Serialize)]
struct ClusterEntry {
    cluster: ClusterData,
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct ClusterData {
    server: String,
    certificate_authority_data: String,
}

#[derive(Serialize)]
struct ContextEntry {
    context: ContextData,
}

#[derive(Serialize)]
struct ContextData {
    cluster: String,
    user: String,
}

#[derive(Serialize)]
struct UserEntry {
    user: UserData,
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct UserData {
    client_certificate_data: String,
    client_key_data: String,
}

fn render_kubeconfig(
    cluster_name: &str,
    endpoint: &str,
    credentials: &ClusterCredentials,
) -> Result<String> {
    let user_name = format!("{}-admin", cluster_name);
    let context_name = format!("{}@{}", user_name, cluster_name);

    let file = KubeConfigFile {
        api_version: "v1",
        kind: "Config",
        clusters: vec![NamedEntry {
            name: cluster_name.to_string(),
            entry: ClusterEntry {
                cluster: ClusterData {
                    server: format!("https://{}", endpoint.trim_start_matches("https://")),
                    certificate_authority_data: STANDARD
                        .encode(&credentials.cluster_certificate_authority_pem),
                },
            },
        }],
        contexts: vec![NamedEntry {
            name: context_name.clone(),
            entry: ContextEntry {
                context: ContextData {
                    cluster: cluster_name.to_string(),
                    user: user_name.clone(),
                },
            },
        }],
        users: vec![NamedEntry {
            name: user_name,
            entry: UserEntry {
                user: UserData {
                    client_certificate_data: STANDARD.encode(&credentials.certificate_pem),
                    client_key_data: STANDARD.encode(&credentials.private_key_pem),
                },
            },
        }],
        current_context: context_name,
    };

    Ok(serde_yaml::to_string(&file)?)
}
