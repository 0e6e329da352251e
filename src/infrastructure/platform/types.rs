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

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub name: String,
    #[serde(default)]
    pub api_server_endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kube_version: Option<String>,
    #[serde(default)]
    pub is_highly_available: bool,
}

/// PEM material for authenticating against a cluster's API server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterCredentials {
    pub private_key_pem: String,
    pub certificate_pem: String,
    pub cluster_certificate_authority_pem: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Secret {
    pub value: String,
}

/// Project secrets keyed by secret name.
pub type SecretCollection = HashMap<String, Secret>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterInput {
    pub name: String,
    pub kube_version: String,
    pub region_name: String,
    pub nodes: Vec<NodePoolInput>,
    pub is_highly_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodePoolInput {
    pub name: String,
    pub node_type_name: String,
    pub quantity: u32,
    pub node_labels: Vec<NodeLabel>,
    pub taints: Vec<NodeTaint>,
    pub autoscaling: AutoscalingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AutoscalingSettings {
    pub enabled: bool,
    pub min_size: u32,
    pub max_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeLabel {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeTaint {
    pub key: String,
    pub value: String,
    pub effect: SchedulerEffect,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SchedulerEffect {
    NoSchedule,
    NoExecute,
    PreferNoSchedule,
}

impl fmt::Display for SchedulerEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerEffect::NoSchedule => write!(f, "NoSchedule"),
            SchedulerEffect::NoExecute => write!(f, "NoExecute"),
            SchedulerEffect::PreferNoSchedule => write!(f, "PreferNoSchedule"),
        }
    }
}

impl FromStr for SchedulerEffect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NoSchedule" => Ok(SchedulerEffect::NoSchedule),
            "NoExecute" => Ok(SchedulerEffect::NoExecute),
            "PreferNoSchedule" => Ok(SchedulerEffect::PreferNoSchedule),
            _ => Err(format!(
                "Invalid taint effect: {}. Valid values: NoSchedule, NoExecute, PreferNoSchedule",
                s
            )),
        }
    }
}
