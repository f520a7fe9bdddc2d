use crate::cli::CommonArgs;
use crate::config::ScopeConfig;
use crate::git::{CommitSource, GixCommitSource};
use crate::model::Repo;
use crate::pool::RepoPool;
use crate::workspace::{discover_repos, normalize_workspace_path};
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Everything a view command needs: the resolved workspace, the effective
/// configuration, the repositories found there and the worker pool.
pub struct Session {
    pub root: PathBuf,
    pub config: ScopeConfig,
    pub repos: Vec<Repo>,
    pub pool: RepoPool,
}

impl Session {
    pub fn open(common: &CommonArgs) -> anyhow::Result<Self> {
        let config = resolve_config(common)?;
        let root = normalize_workspace_path(common.root.as_deref().unwrap_or("."))
            .context("Failed to resolve workspace path")?;
        let repos = discover_repos(&root, &config).context("Failed to scan workspace")?;
        let pool = RepoPool::new(&config).context("Failed to start worker pool")?;

        info!(root = %root.display(), repos = repos.len(), workers = config.worker_count(), "workspace loaded");
        Ok(Self {
            root,
            config,
            repos,
            pool,
        })
    }

    pub fn source(&self) -> Arc<dyn CommitSource> {
        Arc::new(GixCommitSource)
    }
}

pub fn resolve_config(common: &CommonArgs) -> anyhow::Result<ScopeConfig> {
    let mut config = match &common.config {
        Some(path) => ScopeConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ScopeConfig::default(),
    };

    if let Some(depth) = common.depth {
        config.scan_depth = depth;
    }
    if let Some(workers) = common.workers {
        config.workers = workers;
    }
    if let Some(timeout) = common.timeout {
        config.repo_timeout = Some(timeout);
    }
    if common.no_timeout {
        config.repo_timeout = None;
    }
    if let Some(dir) = &common.dependency_dir {
        config.dependency_dir = dir.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Spinner shown while repositories are processed. Hidden for machine output.
pub fn spinner(show: bool, message: &'static str) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
