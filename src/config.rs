use crate::error::{Result, ScopeError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_WEEKS: u32 = 52;
/// A century of weeks keeps every window well inside chrono's date range.
pub const MAX_WEEKS: u32 = 5200;
pub const DEFAULT_DEPENDENCY_DIR: &str = "node_modules";
pub const DEFAULT_MESSAGE_LIMIT: usize = 50;
pub const DEFAULT_SCAN_DEPTH: usize = 3;
pub const DEFAULT_REPO_TIMEOUT: Duration = Duration::from_secs(30);

/// Quartile cut points used to bucket a day's commit count into levels 1-4.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntensityScale {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl Default for IntensityScale {
    fn default() -> Self {
        Self {
            low: 0.25,
            medium: 0.5,
            high: 0.75,
        }
    }
}

impl IntensityScale {
    pub fn level(&self, count: u32, max: u32) -> u8 {
        if count == 0 {
            return 0;
        }
        if max == 0 {
            return 1;
        }

        let ratio = count as f64 / max as f64;
        if ratio >= self.high {
            4
        } else if ratio >= self.medium {
            3
        } else if ratio >= self.low {
            2
        } else {
            1
        }
    }
}

/// Everything the aggregators treat as tunable. Built from defaults, then
/// an optional JSON file, then command line overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    pub weeks: u32,
    pub intensity: IntensityScale,
    pub dependency_dir: String,
    pub message_limit: usize,
    pub scan_depth: usize,
    /// Worker threads for per-repository jobs; 0 means one per available core.
    pub workers: usize,
    /// Per-repository deadline, e.g. "30s". `None` disables the deadline.
    #[serde(with = "humantime_opt")]
    pub repo_timeout: Option<Duration>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            weeks: DEFAULT_WEEKS,
            intensity: IntensityScale::default(),
            dependency_dir: DEFAULT_DEPENDENCY_DIR.to_string(),
            message_limit: DEFAULT_MESSAGE_LIMIT,
            scan_depth: DEFAULT_SCAN_DEPTH,
            workers: 0,
            repo_timeout: Some(DEFAULT_REPO_TIMEOUT),
        }
    }
}

impl ScopeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: ScopeConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let IntensityScale { low, medium, high } = self.intensity;
        if !(0.0 < low && low <= medium && medium <= high && high <= 1.0) {
            return Err(ScopeError::Config(format!(
                "intensity cut points must satisfy 0 < low <= medium <= high <= 1, got {low}/{medium}/{high}"
            )));
        }
        if self.weeks > MAX_WEEKS {
            return Err(ScopeError::Config(format!(
                "weeks must be at most {MAX_WEEKS}, got {}",
                self.weeks
            )));
        }
        if self.message_limit < 4 {
            return Err(ScopeError::Config(format!(
                "message_limit must be at least 4, got {}",
                self.message_limit
            )));
        }
        if self.dependency_dir.is_empty() {
            return Err(ScopeError::Config("dependency_dir cannot be empty".to_string()));
        }
        Ok(())
    }

    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

pub fn parse_duration(input: &str) -> std::result::Result<Duration, String> {
    humantime::parse_duration(input).map_err(|e| format!("invalid duration '{input}': {e}"))
}

mod humantime_opt {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, ser: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => ser.serialize_str(&humantime::format_duration(*d).to_string()),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Duration>, D::Error> {
        let raw: Option<String> = Option::deserialize(de)?;
        raw.map(|s| humantime::parse_duration(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn intensity_buckets_by_quartile() {
        let scale = IntensityScale::default();
        assert_eq!(scale.level(0, 8), 0);
        assert_eq!(scale.level(1, 8), 1);
        assert_eq!(scale.level(2, 8), 2);
        assert_eq!(scale.level(4, 8), 3);
        assert_eq!(scale.level(6, 8), 4);
        assert_eq!(scale.level(8, 8), 4);
        assert_eq!(scale.level(3, 0), 1);
    }

    #[test]
    fn cut_points_are_inclusive() {
        let scale = IntensityScale::default();
        assert_eq!(scale.level(24, 100), 1);
        assert_eq!(scale.level(25, 100), 2);
        assert_eq!(scale.level(49, 100), 2);
        assert_eq!(scale.level(50, 100), 3);
        assert_eq!(scale.level(74, 100), 3);
        assert_eq!(scale.level(75, 100), 4);
        // one commit against a busiest day of four sits exactly on `low`
        assert_eq!(scale.level(1, 4), 2);
    }

    #[test]
    fn rejects_oversized_window() {
        let config = ScopeConfig {
            weeks: MAX_WEEKS + 1,
            ..ScopeConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ScopeConfig {
            weeks: MAX_WEEKS,
            ..ScopeConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "weeks": 12, "repo_timeout": "5s" }}"#).unwrap();

        let config = ScopeConfig::load(file.path()).unwrap();
        assert_eq!(config.weeks, 12);
        assert_eq!(config.repo_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.dependency_dir, "node_modules");
        assert_eq!(config.intensity, IntensityScale::default());
    }

    #[test]
    fn null_timeout_disables_deadline() {
        let config: ScopeConfig = serde_json::from_str(r#"{ "repo_timeout": null }"#).unwrap();
        assert_eq!(config.repo_timeout, None);
    }

    #[test]
    fn rejects_unordered_cut_points() {
        let config = ScopeConfig {
            intensity: IntensityScale {
                low: 0.5,
                medium: 0.25,
                high: 0.75,
            },
            ..ScopeConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
