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

use std::time::Duration;

/// Project descriptor
pub const DEFAULT_PROJECT_FILE: &str = "sym.yaml";
pub const PROJECT_CACHE_FILE: &str = ".symbiosis.project";
pub const LOCAL_PATH_PREFIX: &str = "./";

/// CLI configuration
pub const CONFIG_DIR_NAME: &str = ".sym";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const ENV_API_KEY: &str = "SYMBIOSIS_API_KEY";
pub const ENV_API_URL: &str = "SYMBIOSIS_API_URL";

/// Platform API
pub const DEFAULT_API_URL: &str = "https://api.symbiosis.host";
pub const API_KEY_HEADER: &str = "X-Auth-ApiKey";

/// Helm
pub const HELM_BINARY: &str = "helm";
pub const HELM_CHART_FILE: &str = "Chart.yaml";
pub const HELM_RELEASE_NOT_FOUND: &str = "not found";

/// Kustomize
pub const KUBECTL_BINARY: &str = "kubectl";

/// Kubernetes
pub const DEFAULT_NAMESPACE: &str = "default";
pub const KUBECONFIG_FILE_PREFIX: &str = "symbiosis";
pub const DEFAULT_KUBECONFIG_DIR: &str = ".kube";
pub const DEFAULT_KUBECONFIG_FILE: &str = "config";

/// Test jobs
pub const TEST_POD_PREFIX: &str = "test-job-";
pub const TEST_RESULT_PREFIX: &str = "test-";
pub const TEST_CONTAINER_PREFIX: &str = "test-container-";
pub const TERMINATED_REASON_COMPLETED: &str = "Completed";
pub const RESTART_POLICY_NEVER: &str = "Never";
pub const DEFAULT_TEST_OUTPUT_DIR: &str = "sym-test-results";

/// Test timing
pub const TEST_BATCH_TIMEOUT: Duration = Duration::from_secs(30 * 60);
pub const TEST_JOB_TIMEOUT: Duration = Duration::from_secs(30 * 60);
pub const TEST_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Resource labels
pub const LABEL_MANAGED_BY: &str = "managed-by";
pub const LABEL_MANAGED_BY_VALUE: &str = "sym-cli";
pub const LABEL_APP_MANAGED_BY: &str = "app.kubernetes.io/managed-by";

/// Cluster creation for `sym run`
pub const DEFAULT_REGION: &str = "germany-1";
pub const DEFAULT_NODE_TYPE: &str = "general-1";
pub const DEFAULT_NODE_COUNT: u32 = 2;
pub const AUTOSCALING_MIN_NODES: u32 = 2;
pub const AUTOSCALING_MAX_NODES: u32 = 10;
pub const DEFAULT_KUBE_VERSION: &str = "latest";
pub const RUN_CLUSTER_PREFIX: &str = "run-";
pub const NODE_POOL_SUFFIX: &str = "-autopool";

/// Node readiness polling
pub const NODE_READY_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const NODE_READY_MAX_POLLS: u32 = 60;
