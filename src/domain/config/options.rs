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

use crate::infrastructure::constants::DEFAULT_NAMESPACE;
use crate::shared::error::SymError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = SymError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(SymError::ConfigError(format!(
                "Invalid output format: {}",
                s
            ))),
        }
    }
}

/// Per-invocation options passed explicitly to every component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOpts {
    pub verbose: bool,
    pub namespace: String,
    pub project: Option<String>,
    pub output: OutputFormat,
}

impl Default for CommandOpts {
    fn default() -> Self {
        Self {
            verbose: false,
            namespace: DEFAULT_NAMESPACE.to_string(),
            project: None,
            output: OutputFormat::Table,
        }
    }
}
