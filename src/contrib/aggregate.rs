use crate::config::ScopeConfig;
use crate::error::Result;
use crate::git::CommitSource;
use crate::model::{ContributionData, Repo, Report};
use crate::pool::RepoPool;
use chrono::{DateTime, Local, TimeZone};
use std::sync::Arc;
use tracing::{debug, info};

/// Merge commit dates from every repository into one calendar histogram
/// covering the last `config.weeks` weeks up to today.
pub fn aggregate(
    repos: &[Repo],
    source: Arc<dyn CommitSource>,
    pool: &RepoPool,
    config: &ScopeConfig,
) -> Result<Report<ContributionData>> {
    aggregate_at(repos, source, pool, config, Local::now())
}

pub fn aggregate_at<Tz: TimeZone>(
    repos: &[Repo],
    source: Arc<dyn CommitSource>,
    pool: &RepoPool,
    config: &ScopeConfig,
    now: DateTime<Tz>,
) -> Result<Report<ContributionData>> {
    let mut data = ContributionData::new(now.date_naive(), config.weeks, config.intensity)?;
    let since = data.start_date;
    debug!(%since, weeks = config.weeks, repos = repos.len(), "collecting contributions");

    let outcomes = pool.run(repos, move |repo| source.commit_dates(&repo.path, since));

    let mut failures = Vec::new();
    for (repo, outcome) in repos.iter().zip(outcomes) {
        match outcome.into_result(repo) {
            Ok(dates) => {
                for date in dates {
                    data.record(date);
                }
            }
            Err(failure) => failures.push(failure),
        }
    }

    info!(
        total_commits = data.total_commits,
        active_days = data.days.len(),
        skipped = failures.len(),
        "contributions aggregated"
    );

    Ok(Report { data, failures })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fake::FakeCommitSource;
    use crate::model::RepoStatus;
    use chrono::{NaiveDate, Utc};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn repo(name: &str) -> Repo {
        Repo {
            name: name.to_string(),
            path: PathBuf::from(format!("/work/{name}")),
            status: RepoStatus {
                branch: "main".to_string(),
                last_commit: None,
            },
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 15, 0, 0).unwrap()
    }

    fn config(weeks: u32) -> ScopeConfig {
        ScopeConfig {
            weeks,
            ..ScopeConfig::default()
        }
    }

    fn pool() -> RepoPool {
        RepoPool::with_limits(2, Some(Duration::from_secs(5))).unwrap()
    }

    #[test]
    fn merges_days_across_repositories() {
        let source = FakeCommitSource::default()
            .with_dates("/work/a", &["2024-01-01", "2024-01-01", "2024-01-01", "2024-01-02"])
            .with_dates("/work/b", &["2024-01-01"]);
        let repos = vec![repo("a"), repo("b")];

        let report = aggregate_at(&repos, Arc::new(source), &pool(), &config(4), now()).unwrap();
        let data = &report.data;

        let expected: BTreeMap<NaiveDate, u32> =
            [(date("2024-01-01"), 4), (date("2024-01-02"), 1)].into_iter().collect();
        assert_eq!(data.days, expected);
        assert_eq!(data.max_daily, 4);
        assert_eq!(data.total_commits, 5);
        assert_eq!(data.intensity_level(date("2024-01-01")), 4);
        assert_eq!(data.intensity_level(date("2024-01-02")), 2);
        assert!(report.is_complete());
    }

    #[test]
    fn failing_repository_is_skipped_and_reported() {
        let source = FakeCommitSource::default().with_dates("/work/a", &["2024-01-05"]);
        let repos = vec![repo("missing"), repo("a")];

        let report = aggregate_at(&repos, Arc::new(source), &pool(), &config(4), now()).unwrap();

        assert_eq!(report.data.total_commits, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "missing");
    }

    #[test]
    fn timed_out_repository_counts_as_empty() {
        let source = FakeCommitSource::default()
            .with_dates("/work/slow", &["2024-01-05"])
            .with_delay("/work/slow", Duration::from_secs(2))
            .with_dates("/work/fast", &["2024-01-06"]);
        let repos = vec![repo("slow"), repo("fast")];
        let pool = RepoPool::with_limits(2, Some(Duration::from_millis(50))).unwrap();

        let report = aggregate_at(&repos, Arc::new(source), &pool, &config(4), now()).unwrap();

        assert_eq!(report.data.total_commits, 1);
        assert_eq!(report.data.day_count(date("2024-01-06")), 1);
        assert_eq!(report.failures[0].name, "slow");
    }

    #[test]
    fn window_is_anchored_on_today() {
        let source = FakeCommitSource::default()
            .with_dates("/work/a", &["2023-12-01", "2024-01-03", "2024-01-10"]);
        let repos = vec![repo("a")];

        let report = aggregate_at(&repos, Arc::new(source), &pool(), &config(1), now()).unwrap();
        let data = &report.data;

        assert_eq!(data.end_date, date("2024-01-10"));
        assert_eq!(data.start_date, date("2024-01-03"));
        assert_eq!(data.total_commits, 2);
        assert_eq!(data.day_count(date("2023-12-01")), 0);
    }

    #[test]
    fn no_repositories_yields_empty_histogram() {
        let report = aggregate_at(&[], Arc::new(FakeCommitSource::default()), &pool(), &config(52), now()).unwrap();
        assert!(report.data.days.is_empty());
        assert_eq!(report.data.total_commits, 0);
        assert_eq!(report.data.max_daily, 0);
        assert_eq!(report.data.intensity_level(date("2024-01-10")), 0);
    }

    #[test]
    fn unrepresentable_window_is_an_error() {
        let result = aggregate_at(&[], Arc::new(FakeCommitSource::default()), &pool(), &config(u32::MAX), now());
        assert!(result.is_err());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let build = || {
            FakeCommitSource::default()
                .with_dates("/work/a", &["2024-01-01", "2024-01-02"])
                .with_dates("/work/b", &["2024-01-02"])
        };
        let repos = vec![repo("a"), repo("b")];

        let first = aggregate_at(&repos, Arc::new(build()), &pool(), &config(4), now()).unwrap();
        let second = aggregate_at(&repos, Arc::new(build()), &pool(), &config(4), now()).unwrap();
        assert_eq!(first, second);
    }
}
