use chrono::{DateTime, NaiveDate, TimeZone};
use std::fmt::Display;

pub const KB: u64 = 1024;
pub const MB: u64 = KB * 1024;
pub const GB: u64 = MB * 1024;

const MINUTE_SECS: i64 = 60;
const HOUR_SECS: i64 = 60 * MINUTE_SECS;
const DAY_SECS: i64 = 24 * HOUR_SECS;
const WEEK_SECS: i64 = 7 * DAY_SECS;
const MONTH_SECS: i64 = 30 * DAY_SECS;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";
const SHORT_DATE_FORMAT: &str = "%b %-d";

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes >= GB {
        format!("{} GB", format_scaled(bytes as f64 / GB as f64))
    } else if bytes >= MB {
        format!("{} MB", format_scaled(bytes as f64 / MB as f64))
    } else if bytes >= KB {
        format!("{} KB", format_scaled(bytes as f64 / KB as f64))
    } else {
        format!("{bytes} B")
    }
}

// Digits are truncated, never rounded: 1.99 KB prints as "1.9".
fn format_scaled(value: f64) -> String {
    if value >= 100.0 {
        return format!("{}", value as u64);
    }
    let tenths = (value * 10.0) as u64;
    if value >= 10.0 {
        return format!("{}.{}", tenths / 10, tenths % 10);
    }
    let hundredths = (value * 100.0) as u64;
    format!("{}.{}", tenths / 10, hundredths % 100 / 10)
}

pub fn format_count(n: u64) -> String {
    n.to_string()
}

/// Keep a subject line within `limit` characters, ending in "..." when cut.
pub fn truncate_message(message: &str, limit: usize) -> String {
    let message = message.trim();
    if message.chars().count() <= limit {
        return message.to_string();
    }
    let keep = limit.saturating_sub(3);
    let mut out: String = message.chars().take(keep).collect();
    out.push_str("...");
    out
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// Elapsed-duration label: "just now", "5 mins ago", ... falling back to an
/// absolute "Mon D" after thirty days.
pub fn time_ago<Tz: TimeZone>(t: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    let secs = now.clone().signed_duration_since(t.clone()).num_seconds();

    if secs < MINUTE_SECS {
        "just now".to_string()
    } else if secs < HOUR_SECS {
        plural(secs / MINUTE_SECS, "min")
    } else if secs < DAY_SECS {
        plural(secs / HOUR_SECS, "hour")
    } else if secs < WEEK_SECS {
        plural(secs / DAY_SECS, "day")
    } else if secs < MONTH_SECS {
        plural(secs / WEEK_SECS, "week")
    } else {
        t.format(SHORT_DATE_FORMAT).to_string()
    }
}

/// Calendar label relative to the midnight that starts `now`'s day.
pub fn day_label<Tz: TimeZone>(t: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    let days = (now.date_naive() - t.date_naive()).num_days();
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => t.format("%A").to_string(),
        _ => t.format(SHORT_DATE_FORMAT).to_string(),
    }
}
