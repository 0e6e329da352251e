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

use crate::infrastructure::constants::PROJECT_CACHE_FILE;
use crate::infrastructure::platform::{PlatformApi, Project};
use crate::shared::error::{Result, SymError};
use std::path::Path;
use tracing::info;

/// Resolves the platform project the descriptor belongs to.
///
/// An explicit name is looked up through the API and cached in
/// `<dir>/.symbiosis.project`; otherwise the cached project is used.
pub async fn resolve_project(
    name: Option<&str>,
    dir: &Path,
    platform: &dyn PlatformApi,
) -> Result<Project> {
    let cache = dir.join(PROJECT_CACHE_FILE);

    if let Some(name) = name {
        let project = platform.describe_project(name).await?;
        std::fs::write(&cache, serde_json::to_vec(&project)?)?;
        info!("Project selected: {}", project.name);
        return Ok(project);
    }

    match std::fs::read(&cache) {
        Ok(data) => Ok(serde_json::from_slice(&data)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SymError::config_error(
            "No project selected. Pass --project <name> to choose one",
        )),
        Err(e) => Err(e.into()),
    }
}
