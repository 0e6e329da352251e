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

use crate::infrastructure::constants::{
    LABEL_APP_MANAGED_BY, LABEL_MANAGED_BY_VALUE, RESTART_POLICY_NEVER, TEST_CONTAINER_PREFIX,
    TEST_POD_PREFIX,
};
use k8s_openapi::api::core::v1::{Container, Pod, PodSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// Builds the single-container, never-restarting pod that runs one test job.
pub struct TestPodBuilder {
    index: usize,
    namespace: String,
    image: String,
    commands: Vec<String>,
}

impl TestPodBuilder {
    pub fn new(index: usize, namespace: String, image: String, commands: Vec<String>) -> Self {
        Self {
            index,
            namespace,
            image,
            commands,
        }
    }

    pub fn pod_name(index: usize) -> String {
        format!("{}{}", TEST_POD_PREFIX, index)
    }

    pub fn container_name(index: usize) -> String {
        format!("{}{}", TEST_CONTAINER_PREFIX, index)
    }

    pub fn build(&self) -> Pod {
        let metadata = ObjectMeta {
            name: Some(Self::pod_name(self.index)),
            namespace: Some(self.namespace.clone()),
            labels: Some(self.get_labels()),
            ..Default::default()
        };

        let container = Container {
            name: Self::container_name(self.index),
            image: Some(self.image.clone()),
            command: if self.commands.is_empty() {
                None
            } else {
                Some(self.commands.clone())
            },
            ..Default::default()
        };

        Pod {
            metadata,
            spec: Some(PodSpec {
                containers: vec![container],
                restart_policy: Some(RESTART_POLICY_NEVER.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn get_labels(&self) -> BTreeMap<String, String> {
        let mut labels = BTreeMap::new();
        labels.insert(
            LABEL_APP_MANAGED_BY.to_string(),
            LABEL_MANAGED_BY_VALUE.to_string(),
        );
        labels
    }
}
