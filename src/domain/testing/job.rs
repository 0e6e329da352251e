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

use crate::infrastructure::constants::TEST_RESULT_PREFIX;
use crate::shared::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestState {
    Pending,
    Success,
    Failed,
}

impl fmt::Display for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestState::Pending => write!(f, "PENDING"),
            TestState::Success => write!(f, "SUCCESS"),
            TestState::Failed => write!(f, "FAILED"),
        }
    }
}

/// A declared test, ready to run as a pod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestJob {
    pub image: String,
    pub commands: Vec<String>,
    pub state: TestState,
}

impl TestJob {
    pub fn new(image: impl Into<String>, commands: Vec<String>) -> Self {
        Self {
            image: image.into(),
            commands,
            state: TestState::Pending,
        }
    }
}

/// Outcome of one test job, persisted as `<output_dir>/<name>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub name: String,
    pub image: String,
    pub commands: Vec<String>,
    pub state: TestState,
    pub exit_code: i32,
    pub logs: String,
    #[serde(rename = "duration_s", with = "duration_seconds")]
    pub duration: Duration,
    #[serde(skip)]
    pub output_dir: PathBuf,
}

impl TestResult {
    pub fn pending(index: usize, job: &TestJob, output_dir: &Path) -> Self {
        Self {
            name: format!("{}{}", TEST_RESULT_PREFIX, index),
            image: job.image.clone(),
            commands: job.commands.clone(),
            state: TestState::Pending,
            exit_code: 0,
            logs: String::new(),
            duration: Duration::ZERO,
            output_dir: output_dir.to_path_buf(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.json", self.name))
    }

    pub fn write(&self) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(self.path(), data)?;
        Ok(())
    }
}

mod duration_seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let job = TestJob::new("busybox", vec!["echo".to_string(), "hi".to_string()]);
        let mut result = TestResult::pending(2, &job, dir.path());
        result.state = TestState::Success;
        result.exit_code = 0;
        result.logs = "hi\n".to_string();
        result.duration = Duration::from_millis(2500);
        result.write().unwrap();

        let path = dir.path().join("test-2.json");
        let raw = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(json["name"], "test-2");
        assert_eq!(json["state"], "SUCCESS");
        assert_eq!(json["exitCode"], 0);
        assert_eq!(json["duration_s"], 2.5);
        assert_eq!(json["commands"][1], "hi");
        assert!(json.get("outputDir").is_none());
        assert!(raw.contains("\n  \"name\""));
    }

    #[test]
    fn test_pending_result_is_written_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let job = TestJob::new("alpine", vec![]);
        let result = TestResult::pending(0, &job, dir.path());
        result.write().unwrap();

        let raw = std::fs::read_to_string(result.path()).unwrap();
        let back: TestResult = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.state, TestState::Pending);
        assert_eq!(back.duration, Duration::ZERO);
    }
}
