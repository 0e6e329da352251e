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

use crate::domain::builder::{HelmDeployment, KustomizeDeployment};
use serde::{Deserialize, Serialize};

/// Schema of `sym.yaml` after secret expansion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy: Option<Deployment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<Vec<Test>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Deployment {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub helm: Vec<HelmDeployment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kustomize: Vec<KustomizeDeployment>,
}

impl Deployment {
    pub fn is_empty(&self) -> bool {
        self.helm.is_empty() && self.kustomize.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Test {
    pub image: String,
    #[serde(default)]
    pub command: String,
}

impl Test {
    /// Whitespace-separated arguments. Quotes are not interpreted.
    pub fn commands(&self) -> Vec<String> {
        self.command.split_whitespace().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_split_on_whitespace_only() {
        let test = Test {
            image: "alpine".to_string(),
            command: "sh -c  \"echo hello\"".to_string(),
        };
        assert_eq!(test.commands(), vec!["sh", "-c", "\"echo", "hello\""]);
    }

    #[test]
    fn test_absent_and_empty_test_lists_differ() {
        let absent: ProjectDescriptor = serde_yaml::from_str("deploy: {}\n").unwrap();
        assert!(absent.test.is_none());

        let empty: ProjectDescriptor = serde_yaml::from_str("deploy: {}\ntest: []\n").unwrap();
        assert_eq!(empty.test, Some(vec![]));
    }

    #[test]
    fn test_deploy_without_mechanisms_is_empty() {
        let descriptor: ProjectDescriptor =
            serde_yaml::from_str("deploy:\n  helm: []\n").unwrap();
        assert!(descriptor.deploy.unwrap().is_empty());
    }
}
