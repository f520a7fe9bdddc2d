use crate::config::ScopeConfig;
use crate::error::{Result, ScopeError};
use crate::git::GitRepo;
use crate::model::{Repo, RepoStatus};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Turn user input into an absolute, existing directory: expands `~`,
/// resolves relative paths against the current directory and follows
/// symlinks when they resolve.
pub fn normalize_workspace_path(input: &str) -> Result<PathBuf> {
    if input.is_empty() {
        return Err(ScopeError::Workspace("path cannot be empty".to_string()));
    }

    let mut path = if input == "~" {
        home_dir()?
    } else if let Some(rest) = input.strip_prefix("~/") {
        home_dir()?.join(rest)
    } else {
        PathBuf::from(input)
    };

    if !path.is_absolute() {
        path = std::env::current_dir()?.join(path);
    }

    let meta = match std::fs::metadata(&path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ScopeError::NotFound(PathBuf::from(input)));
        }
        Err(e) => return Err(e.into()),
    };
    if !meta.is_dir() {
        return Err(ScopeError::NotADirectory(PathBuf::from(input)));
    }

    match std::fs::canonicalize(&path) {
        Ok(resolved) => Ok(resolved),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "symlink resolution failed, keeping path");
            Ok(path)
        }
    }
}

fn home_dir() -> Result<PathBuf> {
    home::home_dir().ok_or_else(|| ScopeError::Workspace("cannot expand ~: no home directory".to_string()))
}

fn is_skipped_dir(name: &OsStr, config: &ScopeConfig) -> bool {
    let name = name.to_string_lossy();
    name.starts_with('.') || name == config.dependency_dir
}

/// Find git repositories under `root`, at most `config.scan_depth` levels
/// deep. Discovered repositories are not searched for nested ones.
pub fn discover_repos(root: &Path, config: &ScopeConfig) -> Result<Vec<Repo>> {
    let mut repos = Vec::new();
    let mut walker = WalkDir::new(root)
        .max_depth(config.scan_depth)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                debug!(error = %e, "unreadable entry while scanning workspace");
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }
        if entry.depth() > 0 && is_skipped_dir(entry.file_name(), config) {
            walker.skip_current_dir();
            continue;
        }
        if !entry.path().join(".git").exists() {
            continue;
        }

        match load_repo(entry.path()) {
            Ok(repo) => repos.push(repo),
            Err(e) => warn!(path = %entry.path().display(), error = %e, "ignoring unreadable repository"),
        }
        walker.skip_current_dir();
    }

    debug!(root = %root.display(), count = repos.len(), "workspace scanned");
    Ok(repos)
}

/// Build the `Repo` record for a single checkout.
pub fn load_repo(path: &Path) -> Result<Repo> {
    let git = GitRepo::open(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    Ok(Repo {
        name,
        path: path.to_path_buf(),
        status: RepoStatus {
            branch: git.branch()?,
            last_commit: git.last_commit_time()?,
        },
    })
}
