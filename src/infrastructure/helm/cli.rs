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

use crate::infrastructure::constants::HELM_BINARY;
use crate::shared::error::Result;
use tokio::process::Command;
use tracing::debug;

/// Exit status and combined stdout/stderr of one helm invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelmOutput {
    pub success: bool,
    pub output: String,
}

impl HelmOutput {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }
}

/// Runs the helm binary.
///
/// A non-zero exit is not an error at this level; callers inspect
/// [`HelmOutput::success`] and the output text.
#[async_trait::async_trait]
pub trait HelmCli: Send + Sync {
    /// Executable name or path, checked as a requirement before building.
    fn binary(&self) -> &str;

    async fn run(&self, args: &[String]) -> Result<HelmOutput>;
}

#[derive(Debug, Clone)]
pub struct SystemHelm {
    binary: String,
}

impl SystemHelm {
    pub fn new() -> Self {
        Self {
            binary: HELM_BINARY.to_string(),
        }
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for SystemHelm {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl HelmCli for SystemHelm {
    fn binary(&self) -> &str {
        &self.binary
    }

    async fn run(&self, args: &[String]) -> Result<HelmOutput> {
        debug!("Running {} {}", self.binary, args.join(" "));

        let output = Command::new(&self.binary).args(args).output().await?;

        let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(HelmOutput {
            success: output.status.success(),
            output: combined,
        })
    }
}
