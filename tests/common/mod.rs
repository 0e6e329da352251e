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

//! In-memory stand-ins for the platform API, the helm binary and the
//! Kubernetes pod API.

#![allow(dead_code)]

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{
    ContainerState, ContainerStateRunning, ContainerStateTerminated, ContainerStatus, Pod,
    PodStatus,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use sym_cli::infrastructure::platform::{
    Cluster, ClusterCredentials, ClusterInput, Project, Secret, SecretCollection,
};
use sym_cli::{HelmCli, HelmOutput, PlatformApi, PodApi, Result, SymError};

pub fn project(name: &str) -> Project {
    Project {
        id: Some(format!("{}-id", name)),
        name: name.to_string(),
    }
}

#[derive(Default)]
pub struct FakePlatform {
    pub secrets: SecretCollection,
    pub clusters: HashMap<String, Cluster>,
    pub secret_calls: Mutex<Vec<String>>,
}

impl FakePlatform {
    pub fn with_secret(mut self, name: &str, value: &str) -> Self {
        self.secrets.insert(
            name.to_string(),
            Secret {
                value: value.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl PlatformApi for FakePlatform {
    async fn describe_cluster(&self, name: &str) -> Result<Cluster> {
        self.clusters
            .get(name)
            .cloned()
            .ok_or_else(|| SymError::ApiError {
                status: 404,
                message: format!("cluster {} not found", name),
            })
    }

    async fn cluster_credentials(&self, name: &str) -> Result<ClusterCredentials> {
        self.describe_cluster(name).await?;
        Ok(ClusterCredentials {
            private_key_pem: "key".to_string(),
            certificate_pem: "cert".to_string(),
            cluster_certificate_authority_pem: "ca".to_string(),
        })
    }

    async fn create_cluster(&self, input: &ClusterInput) -> Result<Cluster> {
        Ok(Cluster {
            name: input.name.clone(),
            api_server_endpoint: format!("{}.example.test", input.name),
            state: Some("PENDING".to_string()),
            kube_version: Some(input.kube_version.clone()),
            is_highly_available: input.is_highly_available,
        })
    }

    async fn describe_project(&self, name: &str) -> Result<Project> {
        Ok(project(name))
    }

    async fn secrets_by_project(&self, project: &str) -> Result<SecretCollection> {
        self.secret_calls
            .lock()
            .unwrap()
            .push(project.to_string());
        Ok(self.secrets.clone())
    }
}

/// Records every helm invocation and keeps a set of installed releases.
#[derive(Default)]
pub struct RecordingHelm {
    pub calls: Mutex<Vec<Vec<String>>>,
    pub releases: Mutex<HashSet<String>>,
    /// Release whose install or upgrade fails.
    pub failing_release: Option<String>,
    /// Output returned by every `status` call instead of a lookup.
    pub status_error: Option<String>,
    /// Repository whose `repo add` fails.
    pub failing_repo: Option<String>,
    /// Reported executable; `helm` when unset.
    pub binary: Option<String>,
}

impl RecordingHelm {
    pub fn with_release(self, name: &str) -> Self {
        self.releases.lock().unwrap().insert(name.to_string());
        self
    }

    /// Reports an executable that exists on every test host.
    pub fn on_path(mut self) -> Self {
        self.binary = Some("sh".to_string());
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, verb: &str) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|args| args.first().map(|a| a == verb).unwrap_or(false))
            .collect()
    }
}

#[async_trait]
impl HelmCli for RecordingHelm {
    fn binary(&self) -> &str {
        self.binary.as_deref().unwrap_or("helm")
    }

    async fn run(&self, args: &[String]) -> Result<HelmOutput> {
        self.calls.lock().unwrap().push(args.to_vec());

        match args.first().map(String::as_str) {
            Some("status") => {
                if let Some(output) = &self.status_error {
                    return Ok(HelmOutput::failed(output.clone()));
                }
                let release = &args[3];
                if self.releases.lock().unwrap().contains(release) {
                    Ok(HelmOutput::ok(format!("NAME: {}\nSTATUS: deployed", release)))
                } else {
                    Ok(HelmOutput::failed("Error: release: not found"))
                }
            }
            Some("install") | Some("upgrade") => {
                let release = args[args.len() - 2].clone();
                if self.failing_release.as_ref() == Some(&release) {
                    return Ok(HelmOutput::failed(format!(
                        "Error: INSTALLATION FAILED: {} exploded",
                        release
                    )));
                }
                self.releases.lock().unwrap().insert(release);
                Ok(HelmOutput::ok("STATUS: deployed"))
            }
            Some("repo") if args.get(1).map(String::as_str) == Some("add") => {
                if self.failing_repo.as_ref() == args.get(2) {
                    return Ok(HelmOutput::failed(format!(
                        "Error: looks like \"{}\" is not a valid chart repository",
                        args[3]
                    )));
                }
                Ok(HelmOutput::ok(format!("\"{}\" has been added", args[2])))
            }
            _ => Ok(HelmOutput::ok("")),
        }
    }
}

/// How the container of a given image ends. Images without an outcome keep
/// running forever.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub reason: String,
    pub exit_code: i32,
}

pub struct FakePods {
    pub namespace: String,
    pub outcomes: HashMap<String, Outcome>,
    pub failing_gets: HashSet<String>,
    pub failing_deletes: HashSet<String>,
    pub created: Mutex<Vec<Pod>>,
    pub deleted: Mutex<Vec<String>>,
}

impl FakePods {
    pub fn new() -> Self {
        Self {
            namespace: "default".to_string(),
            outcomes: HashMap::new(),
            failing_gets: HashSet::new(),
            failing_deletes: HashSet::new(),
            created: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    pub fn finishing(mut self, image: &str, reason: &str, exit_code: i32) -> Self {
        self.outcomes.insert(
            image.to_string(),
            Outcome {
                reason: reason.to_string(),
                exit_code,
            },
        );
        self
    }

    pub fn failing_get(mut self, pod: &str) -> Self {
        self.failing_gets.insert(pod.to_string());
        self
    }

    pub fn failing_delete(mut self, pod: &str) -> Self {
        self.failing_deletes.insert(pod.to_string());
        self
    }

    pub fn created_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .created
            .lock()
            .unwrap()
            .iter()
            .filter_map(|p| p.metadata.name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    fn image_of(pod: &Pod) -> Option<String> {
        pod.spec.as_ref()?.containers.first()?.image.clone()
    }
}

#[async_trait]
impl PodApi for FakePods {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn create_pod(&self, pod: &Pod) -> Result<Pod> {
        self.created.lock().unwrap().push(pod.clone());
        Ok(pod.clone())
    }

    async fn get_pod(&self, name: &str) -> Result<Pod> {
        if self.failing_gets.contains(name) {
            return Err(SymError::KubeError(format!("connection reset reading {}", name)));
        }

        let mut pod = self
            .created
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.metadata.name.as_deref() == Some(name))
            .cloned()
            .ok_or_else(|| SymError::not_found("Pod", name, &self.namespace))?;

        let outcome = Self::image_of(&pod).and_then(|image| self.outcomes.get(&image).cloned());
        let state = match outcome {
            Some(outcome) => ContainerState {
                terminated: Some(ContainerStateTerminated {
                    exit_code: outcome.exit_code,
                    reason: Some(outcome.reason),
                    ..Default::default()
                }),
                ..Default::default()
            },
            None => ContainerState {
                running: Some(ContainerStateRunning::default()),
                ..Default::default()
            },
        };

        pod.status = Some(PodStatus {
            container_statuses: Some(vec![ContainerStatus {
                name: "test-container".to_string(),
                state: Some(state),
                ..Default::default()
            }]),
            ..Default::default()
        });
        Ok(pod)
    }

    async fn pod_logs(&self, name: &str) -> Result<String> {
        Ok(format!("logs of {}\n", name))
    }

    async fn delete_pod(&self, name: &str) -> Result<()> {
        if self.failing_deletes.contains(name) {
            return Err(SymError::KubeError(format!("cannot delete {}", name)));
        }
        self.deleted.lock().unwrap().push(name.to_string());
        Ok(())
    }
}
