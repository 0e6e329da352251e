//! Deployment and test commands

use super::commands::GlobalArgs;
use super::display::{Output, TableRenderer};
use crate::domain::cluster::{parse_taints_and_labels, ClusterIdentity};
use crate::domain::config::{CliConfig, CommandOpts};
use crate::domain::project::{absolute_path, resolve_project, ProjectConfig};
use crate::domain::testing::TestResult;
use crate::infrastructure::constants::{
    AUTOSCALING_MAX_NODES, AUTOSCALING_MIN_NODES, DEFAULT_KUBE_VERSION, DEFAULT_NODE_COUNT,
    DEFAULT_NODE_TYPE, DEFAULT_PROJECT_FILE, DEFAULT_REGION, DEFAULT_TEST_OUTPUT_DIR,
    LABEL_MANAGED_BY, LABEL_MANAGED_BY_VALUE, NODE_POOL_SUFFIX, NODE_READY_MAX_POLLS,
    NODE_READY_POLL_INTERVAL, RUN_CLUSTER_PREFIX,
};
use crate::infrastructure::kubernetes::{KubeWorkloadClient, PodApi};
use crate::infrastructure::platform::{
    AutoscalingSettings, ClusterInput, NodeLabel, NodePoolInput, PlatformApi, SymbiosisClient,
};
use crate::shared::error::SymError;
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Flags shared by every command that deploys to or tests against a cluster.
#[derive(clap::Args, Debug, Clone)]
pub struct DeploymentFlags {
    /// Kubernetes namespace to deploy and run tests in
    #[arg(long, short = 'n', default_value = "default")]
    pub namespace: String,

    /// Write the generated kubeconfig file to this location
    #[arg(long, value_name = "PATH")]
    pub identity_output_path: Option<PathBuf>,

    /// Project descriptor to use
    #[arg(long, short = 'f', default_value = DEFAULT_PROJECT_FILE)]
    pub file: PathBuf,

    /// Merge the generated kubeconfig into ~/.kube/config
    #[arg(long)]
    pub merge: bool,
}

/// Everything a command needs from the global flags and config file.
pub struct CommandContext {
    pub opts: CommandOpts,
    pub platform: Arc<dyn PlatformApi>,
}

impl CommandContext {
    pub fn new(global: &GlobalArgs, flags: &DeploymentFlags) -> anyhow::Result<Self> {
        let config = CliConfig::load(global.config.as_deref())?;
        let platform = SymbiosisClient::new(&config.api_url, config.require_api_key()?)?;

        let opts = CommandOpts {
            verbose: global.verbose,
            namespace: flags.namespace.clone(),
            project: global.project.clone().or(config.project),
            output: global.output,
        };

        Ok(Self {
            opts,
            platform: Arc::new(platform),
        })
    }

    /// Writes the kubeconfig for `cluster` and optionally merges it into
    /// the user's kubeconfig.
    async fn identity(
        &self,
        cluster: &str,
        flags: &DeploymentFlags,
    ) -> anyhow::Result<ClusterIdentity> {
        let identity = ClusterIdentity::materialize(
            self.platform.as_ref(),
            cluster,
            flags.identity_output_path.as_deref(),
        )
        .await?;
        println!(
            "✓ Written identity to {}",
            identity.kube_config_path().display()
        );

        if flags.merge {
            let target = ClusterIdentity::default_kubeconfig_path()
                .ok_or_else(|| anyhow::anyhow!("Cannot locate ~/.kube/config, HOME is not set"))?;
            identity.merge_into(&target)?;
        }

        Ok(identity)
    }

    /// Resolves the project and parses the descriptor with the cluster
    /// connection already attached.
    async fn project(
        &self,
        flags: &DeploymentFlags,
        identity: &ClusterIdentity,
        pods: Arc<dyn PodApi>,
    ) -> anyhow::Result<ProjectConfig> {
        let path = absolute_path(&flags.file)?;
        let dir = path.parent().unwrap_or_else(|| Path::new("/"));
        let project =
            resolve_project(self.opts.project.as_deref(), dir, self.platform.as_ref()).await?;

        let mut config =
            ProjectConfig::new(&path, project, self.opts.clone(), self.platform.clone())?
                .with_identity(identity.clone())
                .with_pods(pods);

        config.parse().await?;
        Ok(config)
    }

    fn report(&self, results: &[TestResult]) -> anyhow::Result<()> {
        if results.is_empty() {
            return Ok(());
        }
        let table = TableRenderer::new().test_report(results);
        println!("{}", Output::new(table, &results).render(self.opts.output)?);
        Ok(())
    }
}

async fn pod_client(
    namespace: &str,
    identity: &ClusterIdentity,
) -> anyhow::Result<Arc<KubeWorkloadClient>> {
    let client =
        KubeWorkloadClient::new_with_config(namespace.to_string(), identity.kube_config_path())
            .await?;
    Ok(Arc::new(client))
}

/// Removes a temporary kubeconfig once the command is done with it.
fn release_identity(identity: &ClusterIdentity) {
    if let Err(e) = identity.remove() {
        warn!(
            "Failed to remove kubeconfig {}: {}",
            identity.kube_config_path().display(),
            e
        );
    }
}

#[derive(Parser, Debug, Clone)]
pub struct ApplyCommand {
    /// Name of an existing cluster
    pub cluster: String,

    #[command(flatten)]
    pub flags: DeploymentFlags,
}

impl ApplyCommand {
    pub async fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let ctx = CommandContext::new(global, &self.flags)?;

        ctx.platform
            .describe_cluster(&self.cluster)
            .await
            .map_err(|e| anyhow::anyhow!("Cluster {} does not exist: {}", self.cluster, e))?;

        let identity = ctx.identity(&self.cluster, &self.flags).await?;
        let result = self.apply(&ctx, &identity).await;
        release_identity(&identity);
        result?;

        println!("{}", "Apply finished.".green());
        Ok(())
    }

    async fn apply(&self, ctx: &CommandContext, identity: &ClusterIdentity) -> anyhow::Result<()> {
        let pods = pod_client(&ctx.opts.namespace, identity).await?;
        let config = ctx.project(&self.flags, identity, pods).await?;

        config.run_builders().await?;
        info!("Deploying to cluster {}", self.cluster);
        config.run_deploy().await?;
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct TestCommand {
    /// Name of the cluster to run the tests on
    pub cluster: String,

    #[command(flatten)]
    pub flags: DeploymentFlags,

    /// Directory the per-test JSON results are written to
    #[arg(long, value_name = "DIR", default_value = DEFAULT_TEST_OUTPUT_DIR)]
    pub test_output_dir: PathBuf,
}

impl TestCommand {
    pub async fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let ctx = CommandContext::new(global, &self.flags)?;

        ctx.platform.describe_cluster(&self.cluster).await?;

        let identity = ctx.identity(&self.cluster, &self.flags).await?;
        let result = self.test(&ctx, &identity).await;
        release_identity(&identity);

        ctx.report(&result?)
    }

    async fn test(
        &self,
        ctx: &CommandContext,
        identity: &ClusterIdentity,
    ) -> anyhow::Result<Vec<TestResult>> {
        let pods = pod_client(&ctx.opts.namespace, identity).await?;
        let mut config = ctx.project(&self.flags, identity, pods).await?;

        Ok(config.run_tests(&self.test_output_dir).await?)
    }
}

#[derive(Parser, Debug, Clone)]
pub struct RunCommand {
    /// Name of the cluster to use or create (default: run-<random>)
    #[arg(long)]
    pub cluster_name: Option<String>,

    /// Region for a newly created cluster
    #[arg(long, default_value = DEFAULT_REGION)]
    pub region: String,

    /// Node label for a newly created cluster (key=value)
    #[arg(long = "node-label", value_name = "KEY=VALUE")]
    pub node_labels: Vec<String>,

    /// Node taint for a newly created cluster (key=value=Effect)
    #[arg(long = "node-taint", value_name = "KEY=VALUE=EFFECT")]
    pub node_taints: Vec<String>,

    #[command(flatten)]
    pub flags: DeploymentFlags,

    /// Directory the per-test JSON results are written to
    #[arg(long, value_name = "DIR", default_value = DEFAULT_TEST_OUTPUT_DIR)]
    pub test_output_dir: PathBuf,
}

impl RunCommand {
    pub async fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let ctx = CommandContext::new(global, &self.flags)?;
        let cluster = self
            .cluster_name
            .clone()
            .unwrap_or_else(generate_cluster_name);

        let created = match ctx.platform.describe_cluster(&cluster).await {
            Ok(_) => {
                println!("Using existing cluster: {}", cluster);
                false
            }
            Err(e) if e.is_not_found() => {
                self.create_cluster(ctx.platform.as_ref(), &cluster).await?;
                true
            }
            Err(e) => return Err(e.into()),
        };

        let identity = ctx.identity(&cluster, &self.flags).await?;
        let result = self.run(&ctx, &identity, created).await;
        release_identity(&identity);

        ctx.report(&result?)?;
        println!("{}", "Run finished.".green());
        Ok(())
    }

    async fn create_cluster(&self, platform: &dyn PlatformApi, name: &str) -> anyhow::Result<()> {
        let (taints, mut labels) = parse_taints_and_labels(&self.node_taints, &self.node_labels)?;
        labels.push(NodeLabel {
            key: LABEL_MANAGED_BY.to_string(),
            value: LABEL_MANAGED_BY_VALUE.to_string(),
        });

        println!("Creating cluster: {}", name);
        platform
            .create_cluster(&ClusterInput {
                name: name.to_string(),
                kube_version: DEFAULT_KUBE_VERSION.to_string(),
                region_name: self.region.clone(),
                nodes: vec![NodePoolInput {
                    name: format!("{}{}", name, NODE_POOL_SUFFIX),
                    node_type_name: DEFAULT_NODE_TYPE.to_string(),
                    quantity: DEFAULT_NODE_COUNT,
                    node_labels: labels,
                    taints,
                    autoscaling: AutoscalingSettings {
                        enabled: true,
                        min_size: AUTOSCALING_MIN_NODES,
                        max_size: AUTOSCALING_MAX_NODES,
                    },
                }],
                is_highly_available: false,
            })
            .await?;

        println!("✓ Cluster {} created", name);
        Ok(())
    }

    async fn run(
        &self,
        ctx: &CommandContext,
        identity: &ClusterIdentity,
        created: bool,
    ) -> anyhow::Result<Vec<TestResult>> {
        let pods = pod_client(&ctx.opts.namespace, identity).await?;

        if created {
            println!("Waiting for node pools to become active...");
            wait_for_ready_node(&pods).await?;
            println!("✓ Cluster ready for use");
        }

        let mut config = ctx.project(&self.flags, identity, pods).await?;

        config.run_builders().await?;
        info!("Installing helm charts...");
        config.run_deploy().await?;

        if config.has_tests() {
            Ok(config.run_tests(&self.test_output_dir).await?)
        } else {
            Ok(Vec::new())
        }
    }
}

fn generate_cluster_name() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("{}{}", RUN_CLUSTER_PREFIX, &id[..8])
}

async fn wait_for_ready_node(client: &KubeWorkloadClient) -> Result<(), SymError> {
    for attempt in 0..=NODE_READY_MAX_POLLS {
        match client.count_ready_nodes().await {
            Ok(ready) if ready > 0 => return Ok(()),
            Ok(_) => debug!("No ready nodes yet (attempt {})", attempt),
            Err(e) => debug!("Listing nodes failed (attempt {}): {}", attempt, e),
        }

        if attempt < NODE_READY_MAX_POLLS {
            tokio::time::sleep(NODE_READY_POLL_INTERVAL).await;
        }
    }

    Err(SymError::Timeout(
        "Timeout trying to check if new cluster is ready".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_cluster_name() {
        let name = generate_cluster_name();
        assert!(name.starts_with("run-"));
        assert_eq!(name.len(), 12);
        assert!(name[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }
}
