use crate::config::ScopeConfig;
use crate::git::CommitSource;
use crate::model::{Repo, Report, TimelineData, TimelineEntry};
use crate::pool::RepoPool;
use crate::util::{day_label, time_ago, truncate_message};
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::sync::Arc;
use tracing::info;

/// Build the recent-activity feed, most recent commit first.
pub fn aggregate(
    repos: &[Repo],
    source: Arc<dyn CommitSource>,
    pool: &RepoPool,
    config: &ScopeConfig,
) -> Report<TimelineData> {
    aggregate_at(repos, source, pool, config, Local::now())
}

pub fn aggregate_at<Tz: TimeZone>(
    repos: &[Repo],
    source: Arc<dyn CommitSource>,
    pool: &RepoPool,
    config: &ScopeConfig,
    now: DateTime<Tz>,
) -> Report<TimelineData>
where
    Tz::Offset: Display,
{
    let active: Vec<Repo> = repos
        .iter()
        .filter(|r| r.status.last_commit.is_some())
        .cloned()
        .collect();

    let outcomes = pool.run(&active, move |repo| source.last_commit_subject(&repo.path));

    let mut entries = Vec::with_capacity(active.len());
    let mut failures = Vec::new();
    let tz = now.timezone();

    for (repo, outcome) in active.into_iter().zip(outcomes) {
        let Some(last_commit) = repo.status.last_commit else {
            continue;
        };

        // a missing subject only blanks the message
        let message = match outcome.into_result(&repo) {
            Ok(subject) => truncate_message(&subject, config.message_limit),
            Err(failure) => {
                failures.push(failure);
                String::new()
            }
        };

        let local = last_commit.with_timezone(&tz);
        entries.push(TimelineEntry {
            time_ago: time_ago(&local, &now),
            day_label: day_label(&local, &now),
            name: repo.name,
            path: repo.path,
            branch: repo.status.branch,
            last_commit,
            message,
        });
    }

    entries.sort_by(|a, b| b.last_commit.cmp(&a.last_commit));

    info!(entries = entries.len(), total = repos.len(), "timeline aggregated");

    Report {
        data: TimelineData {
            entries,
            total_repos: repos.len(),
        },
        failures,
    }
}
