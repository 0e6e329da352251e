use super::deploy::{ApplyCommand, RunCommand, TestCommand};
use crate::domain::config::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sym",
    version,
    about = "Deploy and test workloads on Symbiosis managed Kubernetes",
    long_about = "Deploys the Helm charts declared in sym.yaml to a Symbiosis cluster and runs the declared test pods against it"
)]
pub struct CliArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to the CLI config file (default: ~/.sym/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Platform project used to resolve secrets
    #[arg(long, global = true)]
    pub project: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Output format: table, json or yaml
    #[arg(long, short = 'o', global = true, default_value = "table")]
    pub output: OutputFormat,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Deploy the steps defined in sym.yaml to an existing cluster
    Apply(ApplyCommand),

    /// Run the test steps defined in sym.yaml against a cluster
    Test(TestCommand),

    /// Create a cluster if needed, then deploy and test sym.yaml on it
    Run(RunCommand),
}
