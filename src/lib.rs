pub mod cli;
pub mod config;
pub mod contrib;
pub mod disk;
pub mod error;
pub mod git;
pub mod model;
pub mod pool;
pub mod session;
pub mod timeline;
pub mod util;
pub mod workspace;

pub use config::ScopeConfig;
pub use error::{Result, ScopeError};
pub use git::{CommitSource, GixCommitSource};
pub use model::{
    ContributionData, DiskUsageData, Repo, RepoDiskUsage, RepoFailure, RepoStatus, Report,
    TimelineData, TimelineEntry,
};
pub use pool::{RepoOutcome, RepoPool};
