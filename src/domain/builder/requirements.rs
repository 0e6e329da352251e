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

use crate::domain::builder::Builder;
use crate::shared::error::{Result, SymError};
use std::path::{Path, PathBuf};

/// A local precondition a builder needs before it can run.
pub trait Requirement: Send + Sync {
    fn value(&self) -> String;

    fn check(&self) -> bool;

    fn failed(&self) -> SymError;
}

/// An executable that must be resolvable through `PATH`.
#[derive(Debug, Clone)]
pub struct CommandRequirement {
    command: String,
}

impl CommandRequirement {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Requirement for CommandRequirement {
    fn value(&self) -> String {
        self.command.clone()
    }

    fn check(&self) -> bool {
        look_path(&self.command).is_some()
    }

    fn failed(&self) -> SymError {
        SymError::RequirementNotMet(format!(
            "Command {} not present on this system",
            self.command
        ))
    }
}

#[derive(Debug, Clone)]
pub struct FileRequirement {
    path: PathBuf,
}

impl FileRequirement {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Requirement for FileRequirement {
    fn value(&self) -> String {
        self.path.display().to_string()
    }

    fn check(&self) -> bool {
        file_exists(&self.path)
    }

    fn failed(&self) -> SymError {
        SymError::RequirementNotMet(format!("File {} not found", self.path.display()))
    }
}

/// Returns the first unmet requirement of `builder` as an error.
pub fn meets_requirements(builder: &dyn Builder) -> Result<()> {
    for requirement in builder.requirements()? {
        if !requirement.check() {
            return Err(requirement.failed());
        }
    }
    Ok(())
}

/// A path counts as present unless stat reports it missing.
pub fn file_exists(path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(_) => true,
        Err(e) => e.kind() != std::io::ErrorKind::NotFound,
    }
}

fn look_path(command: &str) -> Option<PathBuf> {
    if command.contains(std::path::MAIN_SEPARATOR) {
        let path = PathBuf::from(command);
        return is_executable(&path).then_some(path);
    }

    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(command))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
