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

// Core modules
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export commonly used types
pub use domain::builder::{Builder, HelmBuilder, HelmDeployment, KustomizeBuilder, Requirement};
pub use domain::cluster::ClusterIdentity;
pub use domain::config::{CliConfig, CommandOpts, OutputFormat};
pub use domain::project::{ProjectConfig, ProjectDescriptor};
pub use domain::testing::{TestJob, TestResult, TestRunner, TestState};
pub use infrastructure::helm::{HelmCli, HelmOutput, SystemHelm};
pub use infrastructure::kubernetes::{KubeWorkloadClient, PodApi};
pub use infrastructure::platform::{PlatformApi, SymbiosisClient};
pub use shared::{Result, SymError};
