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

use crate::domain::builder::requirements::{
    file_exists, meets_requirements, CommandRequirement, FileRequirement, Requirement,
};
use crate::domain::builder::Builder;
use crate::domain::cluster::ClusterIdentity;
use crate::infrastructure::constants::{
    HELM_CHART_FILE, HELM_RELEASE_NOT_FOUND, LOCAL_PATH_PREFIX,
};
use crate::infrastructure::helm::HelmCli;
use crate::shared::error::{Result, SymError};
use crate::shared::fan_in::join_fail_fast;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HelmRepository {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// A chart release declared under `deploy.helm`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HelmDeployment {
    pub name: String,
    pub chart: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values_file: Option<String>,
    #[serde(default, deserialize_with = "scalar_values")]
    pub values: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<HelmRepository>,
}

/// Accepts `replicas: 2` and `enabled: true` alongside quoted strings.
fn scalar_values<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let raw: Option<BTreeMap<String, Value>> = Option::deserialize(deserializer)?;
    let mut values = BTreeMap::new();

    for (key, value) in raw.unwrap_or_default() {
        let value = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
            _ => {
                return Err(D::Error::custom(format!(
                    "helm value {} must be a scalar",
                    key
                )))
            }
        };
        values.insert(key, value);
    }

    Ok(values)
}

/// Replaces a leading `./` with `<dir>/`. Other references are unchanged.
pub fn expand_path(dir: &Path, reference: &str) -> String {
    match reference.strip_prefix(LOCAL_PATH_PREFIX) {
        Some(rest) => format!("{}/{}", dir.display(), rest),
        None => reference.to_string(),
    }
}

fn local_chart_file(dir: &Path, deployment: &HelmDeployment) -> PathBuf {
    Path::new(&expand_path(dir, &deployment.chart)).join(HELM_CHART_FILE)
}

/// The repository to use for a deployment: declared, and not shadowed by a
/// local chart directory.
fn effective_repository<'a>(dir: &Path, deployment: &'a HelmDeployment) -> Option<&'a HelmRepository> {
    deployment
        .repository
        .as_ref()
        .filter(|_| !file_exists(&local_chart_file(dir, deployment)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelmAction {
    Install,
    Upgrade,
}

impl HelmAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HelmAction::Install => "install",
            HelmAction::Upgrade => "upgrade",
        }
    }
}

/// Installs or upgrades one release. Cheap to clone into a spawned task.
#[derive(Clone)]
pub struct HelmInstaller {
    helm: Arc<dyn HelmCli>,
    dir: PathBuf,
    namespace: String,
    kube_config: PathBuf,
}

impl HelmInstaller {
    pub fn new(
        helm: Arc<dyn HelmCli>,
        dir: PathBuf,
        namespace: String,
        kube_config: PathBuf,
    ) -> Self {
        Self {
            helm,
            dir,
            namespace,
            kube_config,
        }
    }

    pub async fn release_exists(&self, release: &str) -> Result<bool> {
        let args = vec![
            "status".to_string(),
            "--kubeconfig".to_string(),
            self.kube_config.display().to_string(),
            release.to_string(),
            "--namespace".to_string(),
            self.namespace.clone(),
        ];

        let status = self.helm.run(&args).await?;
        debug!("helm status {}: {}", release, status.output.trim());

        if status.success {
            Ok(true)
        } else if status.output.contains(HELM_RELEASE_NOT_FOUND) {
            Ok(false)
        } else {
            Err(SymError::helm_failed(status.output))
        }
    }

    pub fn install_args(&self, action: HelmAction, deployment: &HelmDeployment) -> Vec<String> {
        let chart = match effective_repository(&self.dir, deployment) {
            Some(_) => deployment.chart.clone(),
            None => expand_path(&self.dir, &deployment.chart),
        };

        let mut args = vec![
            action.as_str().to_string(),
            "--kubeconfig".to_string(),
            self.kube_config.display().to_string(),
            "--namespace".to_string(),
            self.namespace.clone(),
        ];

        for (key, value) in &deployment.values {
            args.push("--set".to_string());
            args.push(format!("{}={}", key, value));
        }

        if let Some(values_file) = deployment.values_file.as_deref().filter(|f| !f.is_empty()) {
            args.push("-f".to_string());
            args.push(expand_path(&self.dir, values_file));
        }

        args.push(deployment.name.clone());
        args.push(chart);
        args
    }

    pub async fn install(&self, deployment: &HelmDeployment) -> Result<HelmAction> {
        info!("Installing Helm chart {}", deployment.name);

        let action = if self.release_exists(&deployment.name).await? {
            info!("Release {} already exists, upgrading...", deployment.name);
            HelmAction::Upgrade
        } else {
            HelmAction::Install
        };

        let args = self.install_args(action, deployment);
        debug!("Running helm {}", args.join(" "));

        let output = self.helm.run(&args).await?;
        if !output.success {
            return Err(SymError::helm_failed(output.output));
        }

        debug!("{}", output.output);
        Ok(action)
    }
}

pub struct HelmBuilder {
    deployments: Vec<HelmDeployment>,
    dir: PathBuf,
    namespace: String,
    helm: Arc<dyn HelmCli>,
    identity: Option<ClusterIdentity>,
}

impl HelmBuilder {
    pub fn new(
        deployments: Vec<HelmDeployment>,
        dir: PathBuf,
        namespace: String,
        helm: Arc<dyn HelmCli>,
    ) -> Self {
        info!("Using Helm for deployment");
        Self {
            deployments,
            dir,
            namespace,
            helm,
            identity: None,
        }
    }

    fn installer(&self) -> Result<HelmInstaller> {
        let identity = self.identity.as_ref().ok_or_else(|| {
            SymError::config_error("No cluster identity set, cannot deploy Helm charts")
        })?;

        Ok(HelmInstaller::new(
            self.helm.clone(),
            self.dir.clone(),
            self.namespace.clone(),
            identity.kube_config_path().to_path_buf(),
        ))
    }

    async fn run_checked(&self, args: Vec<String>) -> Result<()> {
        let output = self.helm.run(&args).await?;
        if !output.success {
            return Err(SymError::helm_failed(output.output));
        }
        debug!("{}", output.output);
        Ok(())
    }
}

#[async_trait::async_trait]
impl Builder for HelmBuilder {
    fn name(&self) -> &'static str {
        "helm"
    }

    async fn build(&self) -> Result<()> {
        meets_requirements(self)?;

        for deployment in &self.deployments {
            if let Some(repo) = effective_repository(&self.dir, deployment) {
                info!("Adding repository {}", repo.name);
                self.run_checked(vec![
                    "repo".to_string(),
                    "add".to_string(),
                    repo.name.clone(),
                    repo.url.clone(),
                ])
                .await?;
                self.run_checked(vec!["repo".to_string(), "update".to_string()])
                    .await?;
            }
        }

        Ok(())
    }

    async fn deploy(&self) -> Result<()> {
        let installer = self.installer()?;

        let handles = self
            .deployments
            .iter()
            .cloned()
            .map(|deployment| {
                let installer = installer.clone();
                tokio::spawn(async move { installer.install(&deployment).await })
            })
            .collect();

        join_fail_fast(handles).await?;
        Ok(())
    }

    fn identity(&self) -> Option<&ClusterIdentity> {
        self.identity.as_ref()
    }

    fn set_identity(&mut self, identity: ClusterIdentity) {
        self.identity = Some(identity);
    }

    fn requirements(&self) -> Result<Vec<Box<dyn Requirement>>> {
        let mut requirements: Vec<Box<dyn Requirement>> =
            vec![Box::new(CommandRequirement::new(self.helm.binary()))];

        for deployment in &self.deployments {
            if let Some(repo) = &deployment.repository {
                if repo.name.is_empty() || repo.url.is_empty() {
                    return Err(SymError::config_error(format!(
                        "Invalid repository configuration for Helm chart {}",
                        deployment.name
                    )));
                }
            }

            if let Some(values_file) = deployment.values_file.as_deref().filter(|f| !f.is_empty()) {
                debug!("Using values file {}", values_file);
                requirements.push(Box::new(FileRequirement::new(expand_path(
                    &self.dir,
                    values_file,
                ))));
            }

            let chart_file = local_chart_file(&self.dir, deployment);
            match (&deployment.repository, file_exists(&chart_file)) {
                (None, _) => requirements.push(Box::new(FileRequirement::new(chart_file))),
                (Some(_), true) => warn!(
                    "Supplied a local chart and a repository for {}, ignoring repository",
                    deployment.name
                ),
                (Some(_), false) => {}
            }
        }

        Ok(requirements)
    }
}
