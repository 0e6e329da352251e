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

use crate::domain::builder::requirements::{CommandRequirement, Requirement};
use crate::domain::builder::Builder;
use crate::domain::cluster::ClusterIdentity;
use crate::infrastructure::constants::KUBECTL_BINARY;
use crate::shared::error::{Result, SymError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KustomizeDeployment {
    pub path: String,
}

/// Accepted by the descriptor schema; building or deploying fails.
pub struct KustomizeBuilder {
    deployments: Vec<KustomizeDeployment>,
    identity: Option<ClusterIdentity>,
}

impl KustomizeBuilder {
    pub fn new(deployments: Vec<KustomizeDeployment>) -> Self {
        Self {
            deployments,
            identity: None,
        }
    }

    fn unsupported(&self) -> SymError {
        let paths: Vec<&str> = self.deployments.iter().map(|d| d.path.as_str()).collect();
        SymError::Unsupported(format!(
            "kustomize deployments are not supported yet ({})",
            paths.join(", ")
        ))
    }
}

#[async_trait::async_trait]
impl Builder for KustomizeBuilder {
    fn name(&self) -> &'static str {
        "kustomize"
    }

    async fn build(&self) -> Result<()> {
        Err(self.unsupported())
    }

    async fn deploy(&self) -> Result<()> {
        Err(self.unsupported())
    }

    fn identity(&self) -> Option<&ClusterIdentity> {
        self.identity.as_ref()
    }

    fn set_identity(&mut self, identity: ClusterIdentity) {
        self.identity = Some(identity);
    }

    fn requirements(&self) -> Result<Vec<Box<dyn Requirement>>> {
        Ok(vec![Box::new(CommandRequirement::new(KUBECTL_BINARY))])
    }
}
