use super::walk::{dir_size, DirSize};
use crate::config::ScopeConfig;
use crate::model::{DiskUsageData, Repo, RepoDiskUsage, RepoFailure, Report};
use crate::pool::RepoPool;
use std::path::Path;
use tracing::{debug, info};

struct Measured {
    usage: RepoDiskUsage,
    has_dependencies: bool,
    problems: Vec<String>,
}

fn measure_into(path: &Path, label: &str, problems: &mut Vec<String>) -> Option<u64> {
    match dir_size(path) {
        Ok(DirSize { bytes, unreadable }) => {
            if unreadable > 0 {
                problems.push(format!("{label}: {unreadable} unreadable entries counted as zero"));
            }
            Some(bytes)
        }
        Err(e) => {
            problems.push(format!("{label}: {e}"));
            None
        }
    }
}

fn measure(repo: &Repo, dependency_dir: &str) -> Measured {
    let mut problems = Vec::new();
    let mut usage = RepoDiskUsage {
        name: repo.name.clone(),
        path: repo.path.clone(),
        git_size: 0,
        node_modules_size: 0,
        total_size: 0,
    };

    if let Some(bytes) = measure_into(&repo.path.join(".git"), ".git", &mut problems) {
        usage.git_size = bytes;
    }

    let mut has_dependencies = false;
    let dep_path = repo.path.join(dependency_dir);
    let is_dir = std::fs::metadata(&dep_path).map(|m| m.is_dir()).unwrap_or(false);
    if is_dir {
        if let Some(bytes) = measure_into(&dep_path, dependency_dir, &mut problems) {
            usage.node_modules_size = bytes;
            has_dependencies = true;
        }
    }

    usage.total_size = usage.git_size + usage.node_modules_size;
    debug!(repo = %repo.name, git = usage.git_size, deps = usage.node_modules_size, "measured repository");

    Measured {
        usage,
        has_dependencies,
        problems,
    }
}

/// Measure metadata and dependency directories of every repository and rank
/// them by combined size, largest first.
pub fn aggregate(repos: &[Repo], pool: &RepoPool, config: &ScopeConfig) -> Report<DiskUsageData> {
    let dependency_dir = config.dependency_dir.clone();
    let outcomes = pool.run(repos, move |repo| Ok(measure(repo, &dependency_dir)));

    let mut data = DiskUsageData {
        repos: Vec::with_capacity(repos.len()),
        repo_count: repos.len(),
        ..DiskUsageData::default()
    };
    let mut failures = Vec::new();

    for (repo, outcome) in repos.iter().zip(outcomes) {
        let measured = match outcome.into_result(repo) {
            Ok(measured) => measured,
            Err(failure) => {
                failures.push(failure);
                continue;
            }
        };

        failures.extend(measured.problems.into_iter().map(|p| RepoFailure::new(repo, p)));

        let usage = measured.usage;
        data.total_git_size += usage.git_size;
        data.total_node_size += usage.node_modules_size;
        data.total_size += usage.total_size;
        data.has_node_modules |= measured.has_dependencies;

        if usage.total_size > 0 {
            data.repos.push(usage);
        }
    }

    // stable, so equal sizes keep input order
    data.repos.sort_by(|a, b| b.total_size.cmp(&a.total_size));
    data.max_size = data.repos.first().map(|r| r.total_size).unwrap_or(0);

    info!(
        total = data.total_size,
        ranked = data.repos.len(),
        problems = failures.len(),
        "disk usage aggregated"
    );

    Report { data, failures }
}
