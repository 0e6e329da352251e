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

use crate::infrastructure::constants::API_KEY_HEADER;
use crate::infrastructure::platform::types::{
    Cluster, ClusterCredentials, ClusterInput, Project, SecretCollection,
};
use crate::shared::error::{Result, SymError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Calls made against the Symbiosis platform REST API.
#[async_trait::async_trait]
pub trait PlatformApi: Send + Sync {
    async fn describe_cluster(&self, name: &str) -> Result<Cluster>;

    async fn cluster_credentials(&self, name: &str) -> Result<ClusterCredentials>;

    async fn create_cluster(&self, input: &ClusterInput) -> Result<Cluster>;

    async fn describe_project(&self, name: &str) -> Result<Project>;

    async fn secrets_by_project(&self, project: &str) -> Result<SecretCollection>;
}

pub struct SymbiosisClient {
    http: reqwest::Client,
    base_url: String,
}

impl SymbiosisClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|e| SymError::config_error(format!("Invalid API key: {}", e)))?;
        let name = HeaderName::from_bytes(API_KEY_HEADER.as_bytes())
            .map_err(|e| SymError::config_error(format!("Invalid API key header: {}", e)))?;
        headers.insert(name, key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            return Err(SymError::ApiError {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&bytes).to_string(),
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!("GET {}", url);
        let resp = self.http.get(&url).send().await?;
        Self::decode(resp).await
    }
}

#[async_trait::async_trait]
impl PlatformApi for SymbiosisClient {
    async fn describe_cluster(&self, name: &str) -> Result<Cluster> {
        self.get(&format!("cluster/{}", name)).await
    }

    async fn cluster_credentials(&self, name: &str) -> Result<ClusterCredentials> {
        self.get(&format!("cluster/{}/identity", name)).await
    }

    async fn create_cluster(&self, input: &ClusterInput) -> Result<Cluster> {
        let url = self.url("cluster");
        debug!("POST {}", url);
        let resp = self.http.post(&url).json(input).send().await?;
        Self::decode(resp).await
    }

    async fn describe_project(&self, name: &str) -> Result<Project> {
        self.get(&format!("project/{}", name)).await
    }

    async fn secrets_by_project(&self, project: &str) -> Result<SecretCollection> {
        self.get(&format!("project/{}/secret", project)).await
    }
}
