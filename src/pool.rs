use crate::config::ScopeConfig;
use crate::error::{Result, ScopeError};
use crate::model::{Repo, RepoFailure};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Result of one repository's job.
#[derive(Debug, Clone, PartialEq)]
pub enum RepoOutcome<T> {
    Ok(T),
    Skipped(String),
}

impl<T> RepoOutcome<T> {
    pub fn into_result(self, repo: &Repo) -> std::result::Result<T, RepoFailure> {
        match self {
            RepoOutcome::Ok(value) => Ok(value),
            RepoOutcome::Skipped(reason) => Err(RepoFailure::new(repo, reason)),
        }
    }
}

/// Bounded pool that runs one job per repository. Results come back in input
/// order so the caller can merge them on a single thread.
pub struct RepoPool {
    pool: ThreadPool,
    timeout: Option<Duration>,
}

impl RepoPool {
    pub fn new(config: &ScopeConfig) -> Result<Self> {
        Self::with_limits(config.worker_count(), config.repo_timeout)
    }

    pub fn with_limits(workers: usize, timeout: Option<Duration>) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("gscope-worker-{i}"))
            .build()
            .map_err(|e| ScopeError::Pool(e.to_string()))?;
        Ok(Self { pool, timeout })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn run<T, F>(&self, repos: &[Repo], job: F) -> Vec<RepoOutcome<T>>
    where
        T: Send + 'static,
        F: Fn(&Repo) -> Result<T> + Send + Sync + 'static,
    {
        let job = Arc::new(job);
        self.pool.install(|| {
            repos
                .par_iter()
                .map(|repo| self.run_one(repo, Arc::clone(&job)))
                .collect()
        })
    }

    fn run_one<T, F>(&self, repo: &Repo, job: Arc<F>) -> RepoOutcome<T>
    where
        T: Send + 'static,
        F: Fn(&Repo) -> Result<T> + Send + Sync + 'static,
    {
        let result = match self.timeout {
            Some(limit) => run_with_timeout(limit, repo.clone(), job),
            None => job(repo),
        };

        match result {
            Ok(value) => {
                debug!(repo = %repo.name, "repository job finished");
                RepoOutcome::Ok(value)
            }
            Err(e) => {
                warn!(repo = %repo.name, path = %repo.path.display(), error = %e, "repository skipped");
                RepoOutcome::Skipped(e.to_string())
            }
        }
    }
}

// The job runs on its own thread so a hung collaborator cannot hold the pool
// worker past the deadline. A timed out thread is left detached.
fn run_with_timeout<T, F>(limit: Duration, repo: Repo, job: Arc<F>) -> Result<T>
where
    T: Send + 'static,
    F: Fn(&Repo) -> Result<T> + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::channel();
    std::thread::Builder::new()
        .name(format!("gscope-job-{}", repo.name))
        .spawn(move || {
            let _ = tx.send(job(&repo));
        })?;

    match rx.recv_timeout(limit) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(ScopeError::Timeout(limit)),
        Err(RecvTimeoutError::Disconnected) => Err(ScopeError::Pool(
            "job exited without producing a result".to_string(),
        )),
    }
}
