use crate::config::IntensityScale;
use crate::error::{Result, ScopeError};
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoStatus {
    pub branch: String,
    /// `None` when the repository has no commits yet.
    pub last_commit: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repo {
    pub name: String,
    pub path: PathBuf,
    pub status: RepoStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoFailure {
    pub name: String,
    pub path: PathBuf,
    pub reason: String,
}

impl RepoFailure {
    pub fn new(repo: &Repo, reason: impl Into<String>) -> Self {
        Self {
            name: repo.name.clone(),
            path: repo.path.clone(),
            reason: reason.into(),
        }
    }
}

/// An aggregation result plus the repositories that were skipped or degraded
/// while producing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report<T> {
    pub data: T,
    pub failures: Vec<RepoFailure>,
}

impl<T> Report<T> {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionData {
    pub days: BTreeMap<NaiveDate, u32>,
    pub total_commits: u64,
    pub weeks_count: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub max_daily: u32,
    #[serde(skip)]
    pub scale: IntensityScale,
}

impl ContributionData {
    /// Empty histogram for the `weeks` weeks ending at `end_date`. Fails when
    /// the window starts before the earliest representable date.
    pub fn new(end_date: NaiveDate, weeks: u32, scale: IntensityScale) -> Result<Self> {
        let start_date = end_date
            .checked_sub_days(Days::new(7 * u64::from(weeks)))
            .ok_or_else(|| {
                ScopeError::InvalidDate(format!("{weeks} weeks before {end_date} is out of range"))
            })?;
        Ok(Self {
            days: BTreeMap::new(),
            total_commits: 0,
            weeks_count: weeks,
            start_date,
            end_date,
            max_daily: 0,
            scale,
        })
    }

    pub fn record(&mut self, date: NaiveDate) {
        let count = self.days.entry(date).or_insert(0);
        *count += 1;
        self.total_commits += 1;
        if *count > self.max_daily {
            self.max_daily = *count;
        }
    }

    pub fn day_count(&self, date: NaiveDate) -> u32 {
        self.days.get(&date).copied().unwrap_or(0)
    }

    /// Bucket a day's commit count into 0-4 relative to the busiest day.
    pub fn intensity_level(&self, date: NaiveDate) -> u8 {
        self.scale.level(self.day_count(date), self.max_daily)
    }

    /// Sunday-aligned rows of seven dates covering the whole window. The first
    /// and last rows may hold dates outside `start_date..=end_date`.
    pub fn weeks_data(&self) -> Vec<[NaiveDate; 7]> {
        let mut weeks = Vec::with_capacity(self.weeks_count as usize + 1);

        let mut current = self.start_date;
        while current.weekday() != Weekday::Sun {
            match current.pred_opt() {
                Some(prev) => current = prev,
                None => break,
            }
        }

        while current <= self.end_date {
            let mut week = [current; 7];
            for slot in week.iter_mut() {
                *slot = current;
                current = match current.succ_opt() {
                    Some(next) => next,
                    None => return weeks,
                };
            }
            weeks.push(week);
        }

        weeks
    }

    /// One abbreviation per month transition, sampled once a week from
    /// `start_date`. Not one label per grid column.
    pub fn month_labels(&self) -> Vec<String> {
        let mut months = Vec::with_capacity(12);
        let mut current = self.start_date;
        let mut last_month = String::new();

        while current <= self.end_date {
            let label = current.format("%b").to_string();
            if label != last_month {
                months.push(label.clone());
                last_month = label;
            }
            current = match current.checked_add_days(Days::new(7)) {
                Some(next) => next,
                None => break,
            };
        }

        months
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoDiskUsage {
    pub name: String,
    pub path: PathBuf,
    pub git_size: u64,
    pub node_modules_size: u64,
    pub total_size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskUsageData {
    pub repos: Vec<RepoDiskUsage>,
    pub total_git_size: u64,
    pub total_node_size: u64,
    pub total_size: u64,
    pub max_size: u64,
    pub repo_count: usize,
    pub has_node_modules: bool,
}

impl DiskUsageData {
    /// Width of a bar proportional to the largest repository.
    pub fn bar_width(&self, size: u64, max_width: usize) -> usize {
        if self.max_size == 0 {
            return 0;
        }
        let ratio = size as f64 / self.max_size as f64;
        (ratio * max_width as f64) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub name: String,
    pub path: PathBuf,
    pub branch: String,
    pub last_commit: DateTime<Utc>,
    pub message: String,
    pub time_ago: String,
    pub day_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineData {
    pub entries: Vec<TimelineEntry>,
    pub total_repos: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContribOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub workspace_path: String,
    pub contributions: ContributionData,
    pub month_labels: Vec<String>,
    pub failures: Vec<RepoFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub workspace_path: String,
    pub disk_usage: DiskUsageData,
    pub failures: Vec<RepoFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub workspace_path: String,
    pub timeline: TimelineData,
    pub failures: Vec<RepoFailure>,
}

/// One line of `contrib --ndjson`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub commit_count: u32,
    pub level: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn contributions(end: &str, weeks: u32) -> ContributionData {
        ContributionData::new(date(end), weeks, IntensityScale::default()).unwrap()
    }

    #[test]
    fn window_spans_whole_weeks() {
        let data = contributions("2024-03-15", 4);
        assert_eq!(data.start_date, date("2024-02-16"));
        assert_eq!(data.end_date - data.start_date, chrono::Duration::days(28));
    }

    #[test]
    fn record_tracks_totals_and_max() {
        let mut data = contributions("2024-01-10", 2);
        for d in ["2024-01-01", "2024-01-01", "2024-01-01", "2024-01-02", "2024-01-01"] {
            data.record(date(d));
        }
        assert_eq!(data.total_commits, 5);
        assert_eq!(data.max_daily, 4);
        assert_eq!(data.days.values().map(|&c| c as u64).sum::<u64>(), data.total_commits);
        assert_eq!(data.intensity_level(date("2024-01-01")), 4);
        assert_eq!(data.intensity_level(date("2024-01-02")), 2);
        assert_eq!(data.intensity_level(date("2024-01-03")), 0);
    }

    #[test]
    fn window_before_earliest_date_is_rejected() {
        let end = date("2024-01-10");
        assert!(ContributionData::new(end, u32::MAX, IntensityScale::default()).is_err());

        let wide = ContributionData::new(end, crate::config::MAX_WEEKS, IntensityScale::default()).unwrap();
        assert_eq!(
            (wide.end_date - wide.start_date).num_days(),
            7 * i64::from(crate::config::MAX_WEEKS)
        );
    }

    #[test]
    fn empty_window_has_zero_intensity() {
        let data = contributions("2024-01-10", 2);
        assert_eq!(data.max_daily, 0);
        assert_eq!(data.intensity_level(date("2024-01-05")), 0);
    }

    #[test]
    fn weeks_start_on_sunday_and_cover_end() {
        // 2024-03-15 is a Friday
        let data = contributions("2024-03-15", 4);
        let weeks = data.weeks_data();

        assert_eq!(weeks[0][0].weekday(), Weekday::Sun);
        assert!(weeks[0][0] <= data.start_date);
        assert!(weeks.iter().all(|w| w.len() == 7));
        let last = weeks.last().unwrap();
        assert!(last[0] <= data.end_date && data.end_date <= last[6]);
        for pair in weeks.windows(2) {
            assert_eq!(pair[1][0] - pair[0][0], chrono::Duration::days(7));
        }
    }

    #[test]
    fn zero_weeks_is_a_single_row() {
        let data = contributions("2024-03-13", 0);
        assert_eq!(data.start_date, data.end_date);
        let weeks = data.weeks_data();
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0][0], date("2024-03-10"));
        assert_eq!(weeks[0][6], date("2024-03-16"));
    }

    #[test]
    fn sunday_end_date_gets_its_own_row() {
        // 2024-03-17 is a Sunday, so the window ends on the first day of a row
        let data = contributions("2024-03-17", 1);
        let weeks = data.weeks_data();
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[1][0], date("2024-03-17"));
    }

    #[test]
    fn month_labels_mark_transitions_only() {
        let data = contributions("2024-03-15", 8);
        let labels = data.month_labels();
        assert_eq!(labels, vec!["Jan", "Feb", "Mar"]);
        assert!(labels.len() < data.weeks_data().len());
    }

    #[test]
    fn bar_width_scales_linearly() {
        let usage = DiskUsageData {
            max_size: 1000,
            ..DiskUsageData::default()
        };
        assert_eq!(usage.bar_width(1000, 40), 40);
        assert_eq!(usage.bar_width(500, 40), 20);
        assert_eq!(usage.bar_width(10, 40), 0);
        assert_eq!(DiskUsageData::default().bar_width(500, 40), 0);
    }
}
