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

mod common;

use common::RecordingHelm;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sym_cli::domain::builder::{
    meets_requirements, HelmAction, HelmInstaller, HelmRepository,
};
use sym_cli::{Builder, ClusterIdentity, HelmBuilder, HelmDeployment, SymError};
use tempfile::TempDir;

fn deployment(name: &str, chart: &str) -> HelmDeployment {
    HelmDeployment {
        name: name.to_string(),
        chart: chart.to_string(),
        values_file: None,
        values: BTreeMap::new(),
        repository: None,
    }
}

fn bitnami() -> Option<HelmRepository> {
    Some(HelmRepository {
        name: "bitnami".to_string(),
        url: "https://charts.bitnami.com/bitnami".to_string(),
    })
}

fn installer(helm: &Arc<RecordingHelm>, dir: &Path) -> HelmInstaller {
    HelmInstaller::new(
        helm.clone(),
        dir.to_path_buf(),
        "web".to_string(),
        PathBuf::from("/tmp/kubeconfig"),
    )
}

fn builder(helm: &Arc<RecordingHelm>, dir: &Path, deployments: Vec<HelmDeployment>) -> HelmBuilder {
    HelmBuilder::new(deployments, dir.to_path_buf(), "web".to_string(), helm.clone())
}

#[tokio::test]
async fn test_install_then_upgrade() {
    let dir = TempDir::new().unwrap();
    let helm = Arc::new(RecordingHelm::default());
    let installer = installer(&helm, dir.path());
    let web = deployment("web", "./chart");

    assert_eq!(installer.install(&web).await.unwrap(), HelmAction::Install);
    assert_eq!(installer.install(&web).await.unwrap(), HelmAction::Upgrade);

    let verbs: Vec<String> = helm.calls().iter().map(|c| c[0].clone()).collect();
    assert_eq!(verbs, vec!["status", "install", "status", "upgrade"]);
}

#[tokio::test]
async fn test_existing_release_is_upgraded() {
    let dir = TempDir::new().unwrap();
    let helm = Arc::new(RecordingHelm::default().with_release("web"));

    let action = installer(&helm, dir.path())
        .install(&deployment("web", "./chart"))
        .await
        .unwrap();

    assert_eq!(action, HelmAction::Upgrade);
    assert!(helm.calls_to("install").is_empty());
    assert_eq!(
        helm.calls_to("status")[0],
        vec!["status", "--kubeconfig", "/tmp/kubeconfig", "web", "--namespace", "web"]
    );
}

#[tokio::test]
async fn test_install_arguments() {
    let dir = TempDir::new().unwrap();
    let helm = Arc::new(RecordingHelm::default());
    let mut web = deployment("web", "./chart");
    web.values.insert("replicas".to_string(), "2".to_string());
    web.values.insert("image.tag".to_string(), "1.4".to_string());
    web.values_file = Some("./values/prod.yaml".to_string());

    installer(&helm, dir.path()).install(&web).await.unwrap();

    let base = dir.path().display();
    assert_eq!(
        helm.calls_to("install")[0],
        vec![
            "install".to_string(),
            "--kubeconfig".to_string(),
            "/tmp/kubeconfig".to_string(),
            "--namespace".to_string(),
            "web".to_string(),
            "--set".to_string(),
            "image.tag=1.4".to_string(),
            "--set".to_string(),
            "replicas=2".to_string(),
            "-f".to_string(),
            format!("{}/values/prod.yaml", base),
            "web".to_string(),
            format!("{}/chart", base),
        ]
    );
}

#[tokio::test]
async fn test_repository_chart_is_passed_through() {
    let dir = TempDir::new().unwrap();
    let helm = Arc::new(RecordingHelm::default());
    let mut redis = deployment("cache", "bitnami/redis");
    redis.repository = bitnami();

    installer(&helm, dir.path()).install(&redis).await.unwrap();

    let install = &helm.calls_to("install")[0];
    assert_eq!(install.last().unwrap(), "bitnami/redis");
}

#[tokio::test]
async fn test_local_chart_shadows_repository() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("chart")).unwrap();
    std::fs::write(dir.path().join("chart/Chart.yaml"), "name: web\n").unwrap();

    let helm = Arc::new(RecordingHelm::default());
    let mut web = deployment("web", "./chart");
    web.repository = bitnami();

    installer(&helm, dir.path()).install(&web).await.unwrap();
    let install = &helm.calls_to("install")[0];
    assert_eq!(install.last().unwrap(), &format!("{}/chart", dir.path().display()));

    let values: Vec<String> = builder(&helm, dir.path(), vec![web])
        .requirements()
        .unwrap()
        .iter()
        .map(|r| r.value())
        .collect();
    assert_eq!(values, vec!["helm".to_string()]);
}

#[tokio::test]
async fn test_status_failure_is_not_treated_as_missing_release() {
    let dir = TempDir::new().unwrap();
    let helm = Arc::new(RecordingHelm {
        status_error: Some("Error: Kubernetes cluster unreachable".to_string()),
        ..Default::default()
    });

    let err = installer(&helm, dir.path())
        .install(&deployment("web", "./chart"))
        .await
        .unwrap_err();

    assert!(matches!(err, SymError::HelmFailed { ref output } if output.contains("unreachable")));
    assert!(helm.calls_to("install").is_empty());
}

#[tokio::test]
async fn test_deploy_installs_every_release() {
    let dir = TempDir::new().unwrap();
    let helm = Arc::new(RecordingHelm::default().with_release("api"));
    let mut builder = builder(
        &helm,
        dir.path(),
        vec![deployment("web", "./web"), deployment("api", "./api")],
    );
    builder.set_identity(ClusterIdentity::from_path("/tmp/kubeconfig"));

    builder.deploy().await.unwrap();

    let installed: Vec<String> = helm
        .calls_to("install")
        .iter()
        .map(|c| c[c.len() - 2].clone())
        .collect();
    let upgraded: Vec<String> = helm
        .calls_to("upgrade")
        .iter()
        .map(|c| c[c.len() - 2].clone())
        .collect();
    assert_eq!(installed, vec!["web"]);
    assert_eq!(upgraded, vec!["api"]);
}

#[tokio::test]
async fn test_deploy_surfaces_helm_output_on_failure() {
    let dir = TempDir::new().unwrap();
    let helm = Arc::new(RecordingHelm {
        failing_release: Some("api".to_string()),
        ..Default::default()
    });
    let mut builder = builder(
        &helm,
        dir.path(),
        vec![deployment("web", "./web"), deployment("api", "./api")],
    );
    builder.set_identity(ClusterIdentity::from_path("/tmp/kubeconfig"));

    let err = builder.deploy().await.unwrap_err();

    assert!(matches!(err, SymError::HelmFailed { ref output } if output.contains("api exploded")));
    assert!(err.to_string().starts_with("Helm failed. Full output:"));
}

#[tokio::test]
async fn test_deploy_requires_identity() {
    let dir = TempDir::new().unwrap();
    let helm = Arc::new(RecordingHelm::default());
    let builder = builder(&helm, dir.path(), vec![deployment("web", "./chart")]);

    assert!(builder.identity().is_none());
    let err = builder.deploy().await.unwrap_err();

    assert!(matches!(err, SymError::ConfigError(_)));
    assert!(helm.calls().is_empty());
}

#[test]
fn test_requirements_order() {
    let dir = TempDir::new().unwrap();
    let helm = Arc::new(RecordingHelm::default());
    let mut web = deployment("web", "./chart");
    web.values_file = Some("./values.yaml".to_string());
    let mut cache = deployment("cache", "bitnami/redis");
    cache.repository = bitnami();

    let values: Vec<String> = builder(&helm, dir.path(), vec![web, cache])
        .requirements()
        .unwrap()
        .iter()
        .map(|r| r.value())
        .collect();

    let base = dir.path().display();
    assert_eq!(
        values,
        vec![
            "helm".to_string(),
            format!("{}/values.yaml", base),
            format!("{}/chart/Chart.yaml", base),
        ]
    );
}

#[test]
fn test_missing_chart_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let helm = Arc::new(RecordingHelm::default());
    let builder = builder(&helm, dir.path(), vec![deployment("web", "./chart")]);

    let unmet: Vec<String> = builder
        .requirements()
        .unwrap()
        .iter()
        .filter(|r| !r.check())
        .map(|r| r.failed().to_string())
        .collect();

    assert!(unmet.contains(&format!(
        "Requirement not met. File {}/chart/Chart.yaml not found",
        dir.path().display()
    )));
}

#[test]
fn test_incomplete_repository_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let helm = Arc::new(RecordingHelm::default());
    let mut cache = deployment("cache", "bitnami/redis");
    cache.repository = Some(HelmRepository {
        name: "bitnami".to_string(),
        url: String::new(),
    });
    let builder = builder(&helm, dir.path(), vec![cache]);

    assert!(matches!(builder.requirements(), Err(SymError::ConfigError(_))));
    assert!(matches!(
        meets_requirements(&builder),
        Err(SymError::ConfigError(_))
    ));
}

fn repo(name: &str, url: &str) -> Option<HelmRepository> {
    Some(HelmRepository {
        name: name.to_string(),
        url: url.to_string(),
    })
}

#[tokio::test]
async fn test_build_adds_and_updates_each_repository() {
    let dir = TempDir::new().unwrap();
    let helm = Arc::new(RecordingHelm::default().on_path());
    let mut cache = deployment("cache", "bitnami/redis");
    cache.repository = bitnami();
    let mut ingress = deployment("ingress", "nginx/ingress-nginx");
    ingress.repository = repo("nginx", "https://kubernetes.github.io/ingress-nginx");

    builder(&helm, dir.path(), vec![cache, ingress])
        .build()
        .await
        .unwrap();

    assert_eq!(
        helm.calls(),
        vec![
            vec!["repo", "add", "bitnami", "https://charts.bitnami.com/bitnami"],
            vec!["repo", "update"],
            vec!["repo", "add", "nginx", "https://kubernetes.github.io/ingress-nginx"],
            vec!["repo", "update"],
        ]
    );
}

#[tokio::test]
async fn test_build_skips_repository_shadowed_by_local_chart() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("chart")).unwrap();
    std::fs::write(dir.path().join("chart/Chart.yaml"), "name: web\n").unwrap();

    let helm = Arc::new(RecordingHelm::default().on_path());
    let mut web = deployment("web", "./chart");
    web.repository = bitnami();

    builder(&helm, dir.path(), vec![web]).build().await.unwrap();

    assert!(helm.calls().is_empty());
}

#[tokio::test]
async fn test_build_stops_at_failed_repo_add() {
    let dir = TempDir::new().unwrap();
    let helm = Arc::new(RecordingHelm {
        failing_repo: Some("bitnami".to_string()),
        ..Default::default()
    }
    .on_path());
    let mut cache = deployment("cache", "bitnami/redis");
    cache.repository = bitnami();
    let mut ingress = deployment("ingress", "nginx/ingress-nginx");
    ingress.repository = repo("nginx", "https://kubernetes.github.io/ingress-nginx");

    let err = builder(&helm, dir.path(), vec![cache, ingress])
        .build()
        .await
        .unwrap_err();

    assert!(matches!(err, SymError::HelmFailed { ref output } if output.contains("not a valid chart repository")));
    assert_eq!(
        helm.calls(),
        vec![vec!["repo", "add", "bitnami", "https://charts.bitnami.com/bitnami"]]
    );
}

#[tokio::test]
async fn test_build_checks_requirements_before_running_helm() {
    let dir = TempDir::new().unwrap();
    let helm = Arc::new(RecordingHelm {
        binary: Some("sym-no-such-helm".to_string()),
        ..Default::default()
    });
    let mut cache = deployment("cache", "bitnami/redis");
    cache.repository = bitnami();

    let err = builder(&helm, dir.path(), vec![cache]).build().await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Requirement not met. Command sym-no-such-helm not present on this system"
    );
    assert!(helm.calls().is_empty());
}

#[test]
fn test_first_unmet_requirement_is_returned() {
    let dir = TempDir::new().unwrap();
    let helm = Arc::new(RecordingHelm::default().on_path());
    let mut web = deployment("web", "./chart");
    web.values_file = Some("./values.yaml".to_string());
    let builder = builder(&helm, dir.path(), vec![web]);

    let err = meets_requirements(&builder).unwrap_err();

    assert!(matches!(err, SymError::RequirementNotMet(_)));
    assert_eq!(
        err.to_string(),
        format!(
            "Requirement not met. File {}/values.yaml not found",
            dir.path().display()
        )
    );
}
