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

use crate::shared::error::{Result, SymError};
use futures::AsyncReadExt;
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::api::{DeleteParams, ListParams, LogParams, PostParams};
use kube::{Api, Client};
use std::path::Path;

/// Pod operations needed by the test runner.
///
/// Implementations are scoped to a single namespace.
#[async_trait::async_trait]
pub trait PodApi: Send + Sync {
    fn namespace(&self) -> &str;

    async fn create_pod(&self, pod: &Pod) -> Result<Pod>;

    async fn get_pod(&self, name: &str) -> Result<Pod>;

    async fn pod_logs(&self, name: &str) -> Result<String>;

    async fn delete_pod(&self, name: &str) -> Result<()>;
}

pub struct KubeWorkloadClient {
    client: Client,
    namespace: String,
}

impl KubeWorkloadClient {
    pub async fn new_with_config(namespace: String, kubeconfig_path: &Path) -> Result<Self> {
        use kube::config::{KubeConfigOptions, Kubeconfig};

        let kubeconfig = Kubeconfig::read_from(kubeconfig_path)
            .map_err(|e| SymError::KubeError(format!("Failed to load kubeconfig: {}", e)))?;

        let config = kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .map_err(|e| {
                SymError::KubeError(format!("Failed to create Kubernetes config: {}", e))
            })?;

        let client = Client::try_from(config).map_err(|e| {
            SymError::KubeError(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self { client, namespace })
    }

    /// Number of nodes reporting the `Ready` condition as `True`.
    pub async fn count_ready_nodes(&self) -> Result<usize> {
        let api: Api<Node> = Api::all(self.client.clone());
        let nodes = api.list(&ListParams::default()).await?;

        let ready = nodes
            .items
            .iter()
            .filter(|node| {
                node.status
                    .as_ref()
                    .and_then(|s| s.conditions.as_ref())
                    .map(|conditions| {
                        conditions
                            .iter()
                            .any(|c| c.type_ == "Ready" && c.status == "True")
                    })
                    .unwrap_or(false)
            })
            .count();

        Ok(ready)
    }

    fn pods(&self) -> Api<Pod> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }
}

#[async_trait::async_trait]
impl PodApi for KubeWorkloadClient {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn create_pod(&self, pod: &Pod) -> Result<Pod> {
        let pp = PostParams::default();
        Ok(self.pods().create(&pp, pod).await?)
    }

    async fn get_pod(&self, name: &str) -> Result<Pod> {
        self.pods().get(name).await.map_err(|e| {
            if let kube::Error::Api(ae) = e {
                if ae.code == 404 {
                    SymError::not_found("Pod", name, &self.namespace)
                } else {
                    SymError::KubeError(ae.message)
                }
            } else {
                SymError::KubeError(e.to_string())
            }
        })
    }

    /// Buffers the whole log stream. Bytes that are not valid UTF-8 are
    /// replaced rather than failing the fetch.
    async fn pod_logs(&self, name: &str) -> Result<String> {
        let stream = self.pods().log_stream(name, &LogParams::default()).await?;
        let mut stream = Box::pin(stream);

        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    async fn delete_pod(&self, name: &str) -> Result<()> {
        let dp = DeleteParams::default();

        self.pods().delete(name, &dp).await?;
        Ok(())
    }
}
