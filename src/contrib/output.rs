use crate::model::{ContribOutput, ContributionData, DayRecord, RepoFailure, SCHEMA_VERSION};
use crate::util::{date_key, format_count};
use anyhow::Result;
use chrono::Utc;
use console::style;
use std::path::Path;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn output_json(data: &ContributionData, failures: &[RepoFailure], root: &Path) -> Result<()> {
    let output = ContribOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        workspace_path: root.to_string_lossy().to_string(),
        contributions: data.clone(),
        month_labels: data.month_labels(),
        failures: failures.to_vec(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_ndjson(data: &ContributionData) -> Result<()> {
    for (&date, &commit_count) in &data.days {
        if date < data.start_date || date > data.end_date {
            continue;
        }
        let record = DayRecord {
            date,
            commit_count,
            level: data.intensity_level(date),
        };
        println!("{}", serde_json::to_string(&record)?);
    }
    Ok(())
}

fn cell(level: u8) -> console::StyledObject<&'static str> {
    match level {
        0 => style("·").dim(),
        1 => style("▪").green().dim(),
        2 => style("▪").green(),
        3 => style("■").green(),
        _ => style("■").green().bold(),
    }
}

// Labels mark month changes across the window; they are not column headers.
fn month_line(data: &ContributionData) -> String {
    format!("Months: {}", data.month_labels().join(" → "))
}

pub fn output_heatmap(data: &ContributionData, failures: &[RepoFailure]) -> Result<()> {
    println!("{}", style("Contribution Heatmap").bold());
    println!("{}", "─".repeat(50));
    println!(
        "{} to {}  ({} weeks)",
        style(date_key(data.start_date)).dim(),
        style(date_key(data.end_date)).dim(),
        data.weeks_count
    );
    println!("{}", month_line(data));

    let weeks = data.weeks_data();
    for (row, name) in DAY_NAMES.iter().enumerate() {
        let cells: Vec<String> = weeks
            .iter()
            .map(|week| {
                let date = week[row];
                if date < data.start_date || date > data.end_date {
                    " ".to_string()
                } else {
                    cell(data.intensity_level(date)).to_string()
                }
            })
            .collect();
        println!("{name}  {}", cells.join(""));
    }

    println!(
        "\n{} commits, busiest day {} commits",
        style(format_count(data.total_commits)).cyan(),
        style(format_count(data.max_daily as u64)).cyan()
    );
    print!("Less ");
    for level in 0..=4 {
        print!("{}", cell(level));
    }
    println!(" More");

    if !failures.is_empty() {
        println!(
            "\n{} {} repositories skipped",
            style("!").yellow(),
            failures.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IntensityScale;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn month_line_is_labelled_sequence() {
        let end = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let data = ContributionData::new(end, 8, IntensityScale::default()).unwrap();
        assert_eq!(month_line(&data), "Months: Jan → Feb → Mar");
    }
}
