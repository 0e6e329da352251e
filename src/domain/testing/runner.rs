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

use crate::domain::testing::job::{TestJob, TestResult, TestState};
use crate::infrastructure::constants::{
    TERMINATED_REASON_COMPLETED, TEST_BATCH_TIMEOUT, TEST_JOB_TIMEOUT, TEST_POLL_INTERVAL,
};
use crate::infrastructure::kubernetes::resources::TestPodBuilder;
use crate::infrastructure::kubernetes::PodApi;
use crate::shared::error::{Result, SymError};
use crate::shared::fan_in::join_fail_fast;
use k8s_openapi::api::core::v1::{ContainerStateTerminated, Pod};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Runs every test job as a pod and collects the results.
pub struct TestRunner {
    jobs: Vec<TestJob>,
    pods: Arc<dyn PodApi>,
    batch_timeout: Duration,
    job_timeout: Duration,
    poll_interval: Duration,
}

impl TestRunner {
    pub fn new(jobs: Vec<TestJob>, pods: Arc<dyn PodApi>) -> Self {
        Self {
            jobs,
            pods,
            batch_timeout: TEST_BATCH_TIMEOUT,
            job_timeout: TEST_JOB_TIMEOUT,
            poll_interval: TEST_POLL_INTERVAL,
        }
    }

    pub fn with_timings(
        mut self,
        batch_timeout: Duration,
        job_timeout: Duration,
        poll_interval: Duration,
    ) -> Self {
        self.batch_timeout = batch_timeout;
        self.job_timeout = job_timeout;
        self.poll_interval = poll_interval;
        self
    }

    pub fn jobs(&self) -> &[TestJob] {
        &self.jobs
    }

    /// Launches all jobs concurrently and waits for them.
    ///
    /// The first failing job ends the wait and its error is returned as is;
    /// pods of the other jobs are left in place. Pods are deleted only after
    /// every job finished, and the first failed delete stops the cleanup.
    pub async fn run(&mut self, output_dir: &Path) -> Result<Vec<TestResult>> {
        std::fs::create_dir_all(output_dir)?;

        info!("Running {} tests...", self.jobs.len());
        info!("Results are being written to {}", output_dir.display());

        let deadline = Instant::now() + self.batch_timeout;
        let mut pod_names = Vec::with_capacity(self.jobs.len());
        let mut handles = Vec::with_capacity(self.jobs.len());

        for (index, job) in self.jobs.iter().enumerate() {
            let result = TestResult::pending(index, job, output_dir);
            result.write()?;

            pod_names.push(TestPodBuilder::pod_name(index));

            let execution = JobExecution {
                index,
                pods: self.pods.clone(),
                result,
                timeout: self.job_timeout,
                poll_interval: self.poll_interval,
            };
            handles.push(tokio::spawn(execution.execute()));
        }

        let results = tokio::time::timeout_at(deadline, join_fail_fast(handles))
            .await
            .map_err(|_| {
                SymError::Timeout(format!(
                    "test batch did not finish within {}s",
                    self.batch_timeout.as_secs()
                ))
            })??;

        for name in &pod_names {
            self.pods.delete_pod(name).await?;
            debug!("Cleaned up pod {}", name);
        }

        for (job, result) in self.jobs.iter_mut().zip(&results) {
            job.state = result.state;
        }

        Ok(results)
    }
}

/// One job's pod lifecycle, owned by its spawned task.
struct JobExecution {
    index: usize,
    pods: Arc<dyn PodApi>,
    result: TestResult,
    timeout: Duration,
    poll_interval: Duration,
}

impl JobExecution {
    async fn execute(mut self) -> Result<TestResult> {
        let pod_name = TestPodBuilder::pod_name(self.index);
        let pod = TestPodBuilder::new(
            self.index,
            self.pods.namespace().to_string(),
            self.result.image.clone(),
            self.result.commands.clone(),
        )
        .build();

        let started = Instant::now();
        self.pods.create_pod(&pod).await.map_err(|e| {
            SymError::KubeError(format!("Failed to create pod for test {}: {}", self.index, e))
        })?;

        let timeout = self.timeout;
        tokio::time::timeout(timeout, self.poll(&pod_name, started))
            .await
            .map_err(|_| {
                SymError::Timeout(format!(
                    "test {} did not finish within {}s",
                    self.index,
                    timeout.as_secs()
                ))
            })??;

        Ok(self.result)
    }

    async fn poll(&mut self, pod_name: &str, started: Instant) -> Result<()> {
        loop {
            let pod = self.pods.get_pod(pod_name).await?;

            if let Some(terminated) = terminated_state(&pod) {
                let reason = terminated.reason.as_deref().unwrap_or_default();
                let logs = self.pods.pod_logs(pod_name).await?;
                debug!("Container logs for {}: {}", pod_name, logs);

                self.result.state = if reason == TERMINATED_REASON_COMPLETED {
                    TestState::Success
                } else {
                    TestState::Failed
                };
                self.result.exit_code = terminated.exit_code;
                self.result.logs = logs;
                self.result.duration = started.elapsed();
                self.result.write()?;

                return Ok(());
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// First container that terminated with a reason.
fn terminated_state(pod: &Pod) -> Option<ContainerStateTerminated> {
    pod.status
        .as_ref()?
        .container_statuses
        .as_ref()?
        .iter()
        .filter_map(|status| status.state.as_ref()?.terminated.clone())
        .find(|terminated| {
            terminated
                .reason
                .as_deref()
                .map(|r| !r.is_empty())
                .unwrap_or(false)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{ContainerState, ContainerStatus, PodStatus};

    fn pod_with(terminated: Option<ContainerStateTerminated>) -> Pod {
        Pod {
            status: Some(PodStatus {
                container_statuses: Some(vec![ContainerStatus {
                    name: "test-container-0".to_string(),
                    state: Some(ContainerState {
                        terminated,
                        ..Default::default()
                    }),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_terminated_state_requires_reason() {
        assert!(terminated_state(&Pod::default()).is_none());
        assert!(terminated_state(&pod_with(None)).is_none());

        let no_reason = ContainerStateTerminated {
            exit_code: 1,
            reason: Some(String::new()),
            ..Default::default()
        };
        assert!(terminated_state(&pod_with(Some(no_reason))).is_none());

        let completed = ContainerStateTerminated {
            exit_code: 0,
            reason: Some("Completed".to_string()),
            ..Default::default()
        };
        let found = terminated_state(&pod_with(Some(completed))).unwrap();
        assert_eq!(found.exit_code, 0);
    }
}
