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

use crate::domain::builder::{Builder, HelmBuilder, KustomizeBuilder};
use crate::domain::cluster::ClusterIdentity;
use crate::domain::config::CommandOpts;
use crate::domain::project::descriptor::ProjectDescriptor;
use crate::domain::project::template::render_secrets;
use crate::domain::testing::{TestJob, TestResult, TestRunner};
use crate::infrastructure::helm::{HelmCli, SystemHelm};
use crate::infrastructure::kubernetes::PodApi;
use crate::infrastructure::platform::{PlatformApi, Project};
use crate::shared::error::{Result, SymError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Resolves `file` against the current directory.
pub fn absolute_path(file: &Path) -> Result<PathBuf> {
    if file.is_absolute() {
        Ok(file.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(file))
    }
}

/// A project descriptor and the plan built from it.
pub struct ProjectConfig {
    path: PathBuf,
    project: Project,
    opts: CommandOpts,
    platform: Arc<dyn PlatformApi>,
    helm: Arc<dyn HelmCli>,
    pods: Option<Arc<dyn PodApi>>,
    identity: Option<ClusterIdentity>,
    descriptor: Option<ProjectDescriptor>,
    builders: Vec<Box<dyn Builder>>,
    test_runner: Option<TestRunner>,
    raw_config: Vec<u8>,
}

impl ProjectConfig {
    pub fn new(
        file: &Path,
        project: Project,
        opts: CommandOpts,
        platform: Arc<dyn PlatformApi>,
    ) -> Result<Self> {
        Ok(Self {
            path: absolute_path(file)?,
            project,
            opts,
            platform,
            helm: Arc::new(SystemHelm::new()),
            pods: None,
            identity: None,
            descriptor: None,
            builders: Vec::new(),
            test_runner: None,
            raw_config: Vec::new(),
        })
    }

    /// Identity handed to every builder created by [`parse`](Self::parse).
    pub fn with_identity(mut self, identity: ClusterIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Pod client for test jobs. Required when the descriptor declares tests.
    pub fn with_pods(mut self, pods: Arc<dyn PodApi>) -> Self {
        self.pods = Some(pods);
        self
    }

    pub fn with_helm(mut self, helm: Arc<dyn HelmCli>) -> Self {
        self.helm = helm;
        self
    }

    /// Reads, expands and validates the descriptor, then builds the
    /// builders and the test runner from it.
    ///
    /// Previous builders and test runner are dropped first, so a failed
    /// parse leaves none behind.
    pub async fn parse(&mut self) -> Result<()> {
        self.builders.clear();
        self.test_runner = None;
        self.descriptor = None;

        let raw = std::fs::read(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SymError::FileNotFound(self.path.clone())
            } else {
                SymError::Io(e)
            }
        })?;

        let secrets = self.platform.secrets_by_project(&self.project.name).await?;
        debug!(
            "Fetched {} secrets for project {}",
            secrets.len(),
            self.project.name
        );

        let text = String::from_utf8(raw.clone()).map_err(|e| {
            SymError::config_error(format!("{} is not valid UTF-8: {}", self.path.display(), e))
        })?;
        let rendered = render_secrets(&text, &secrets, &self.project.name)?;

        let descriptor: ProjectDescriptor = serde_yaml::from_str(&rendered)?;

        let deploy = descriptor
            .deploy
            .as_ref()
            .ok_or_else(|| SymError::config_error("No deployments configured... cannot continue"))?;
        if deploy.is_empty() {
            return Err(SymError::config_error(
                "No helm or kustomize deployments configured... cannot continue",
            ));
        }

        let mut builders: Vec<Box<dyn Builder>> = Vec::new();
        if !deploy.helm.is_empty() {
            builders.push(Box::new(HelmBuilder::new(
                deploy.helm.clone(),
                self.dir().to_path_buf(),
                self.opts.namespace.clone(),
                self.helm.clone(),
            )));
        }
        if !deploy.kustomize.is_empty() {
            builders.push(Box::new(KustomizeBuilder::new(deploy.kustomize.clone())));
        }

        let test_runner = match &descriptor.test {
            None => None,
            Some(tests) if tests.is_empty() => {
                return Err(SymError::config_error("No tests given"));
            }
            Some(tests) => {
                let pods = self.pods.clone().ok_or_else(|| {
                    SymError::config_error("Tests are declared but no cluster connection is set")
                })?;
                let jobs = tests
                    .iter()
                    .map(|t| TestJob::new(t.image.clone(), t.commands()))
                    .collect();
                Some(TestRunner::new(jobs, pods))
            }
        };

        self.builders = builders;
        self.test_runner = test_runner;
        self.descriptor = Some(descriptor);
        self.raw_config = raw;

        if let Some(identity) = self.identity.clone() {
            self.set_identity(identity);
        }

        Ok(())
    }

    pub async fn run_builders(&self) -> Result<()> {
        for builder in &self.builders {
            debug!("Building {}", builder.name());
            builder.build().await?;
        }
        Ok(())
    }

    pub async fn run_deploy(&self) -> Result<()> {
        for builder in &self.builders {
            debug!("Deploying {}", builder.name());
            builder.deploy().await?;
        }
        Ok(())
    }

    pub async fn run_tests(&mut self, output_dir: &Path) -> Result<Vec<TestResult>> {
        match self.test_runner.as_mut() {
            Some(runner) => runner.run(output_dir).await,
            None => {
                info!("No tests to run");
                Ok(Vec::new())
            }
        }
    }

    pub fn set_identity(&mut self, identity: ClusterIdentity) {
        for builder in self.builders.iter_mut() {
            builder.set_identity(identity.clone());
        }
        self.identity = Some(identity);
    }

    pub fn identity(&self) -> Option<&ClusterIdentity> {
        self.identity.as_ref()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("/"))
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn descriptor(&self) -> Option<&ProjectDescriptor> {
        self.descriptor.as_ref()
    }

    pub fn has_tests(&self) -> bool {
        self.test_runner.is_some()
    }

    pub fn builders(&self) -> &[Box<dyn Builder>] {
        &self.builders
    }

    pub fn raw_config(&self) -> &[u8] {
        &self.raw_config
    }
}
