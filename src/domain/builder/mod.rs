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

//! Deployment executors

pub mod helm;
pub mod kustomize;
pub mod requirements;

pub use self::helm::{HelmAction, HelmBuilder, HelmDeployment, HelmInstaller, HelmRepository};
pub use self::kustomize::{KustomizeBuilder, KustomizeDeployment};
pub use self::requirements::{
    file_exists, meets_requirements, CommandRequirement, FileRequirement, Requirement,
};

use crate::domain::cluster::ClusterIdentity;
use crate::shared::error::Result;

/// One deployment mechanism declared in the project descriptor.
///
/// `build` prepares local state (tooling checks, repositories) and runs
/// before any cluster is touched. `deploy` needs an identity.
#[async_trait::async_trait]
pub trait Builder: Send + Sync {
    fn name(&self) -> &'static str;

    async fn build(&self) -> Result<()>;

    async fn deploy(&self) -> Result<()>;

    fn identity(&self) -> Option<&ClusterIdentity>;

    fn set_identity(&mut self, identity: ClusterIdentity);

    /// Ordered preconditions, cheapest to fix first.
    fn requirements(&self) -> Result<Vec<Box<dyn Requirement>>>;
}
