use super::GitRepo;
use crate::error::Result;
use chrono::NaiveDate;
use std::path::Path;

/// Where commit facts come from. Implementations must be shareable across
/// worker threads; every call gets the repository path it should read.
pub trait CommitSource: Send + Sync {
    /// Dates of commits made on or after `since`, one entry per commit.
    fn commit_dates(&self, repo_path: &Path, since: NaiveDate) -> Result<Vec<NaiveDate>>;

    /// Subject line of the most recent commit.
    fn last_commit_subject(&self, repo_path: &Path) -> Result<String>;
}

/// Reads history straight from the object database with `gix`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GixCommitSource;

impl CommitSource for GixCommitSource {
    fn commit_dates(&self, repo_path: &Path, since: NaiveDate) -> Result<Vec<NaiveDate>> {
        GitRepo::open(repo_path)?.commit_dates_since(since)
    }

    fn last_commit_subject(&self, repo_path: &Path) -> Result<String> {
        GitRepo::open(repo_path)?.last_commit_subject()
    }
}
