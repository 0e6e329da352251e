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

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SymError>;

#[derive(Error, Debug)]
pub enum SymError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Run config file {} not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("Template error: {0}")]
    TemplateError(String),

    #[error("Requirement not met. {0}")]
    RequirementNotMet(String),

    #[error("Unsupported deployment: {0}")]
    Unsupported(String),

    #[error("Helm failed. Full output: {output}")]
    HelmFailed { output: String },

    #[error("Kubernetes API error: {0}")]
    KubeError(String),

    #[error("Resource not found: {resource_type} '{name}' in namespace '{namespace}'")]
    NotFound {
        resource_type: String,
        name: String,
        namespace: String,
    },

    #[error("Platform API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Task failed: {0}")]
    TaskFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<kube::Error> for SymError {
    fn from(err: kube::Error) -> Self {
        SymError::KubeError(err.to_string())
    }
}

impl SymError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn not_found(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn helm_failed(output: impl Into<String>) -> Self {
        Self::HelmFailed {
            output: output.into(),
        }
    }

    /// True for a missing Kubernetes object or a 404 from the platform API.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SymError::NotFound { .. } | SymError::ApiError { status: 404, .. }
        )
    }
}
