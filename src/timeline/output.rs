use crate::model::{RepoFailure, TimelineData, TimelineOutput, SCHEMA_VERSION};
use anyhow::Result;
use chrono::Utc;
use console::style;
use std::path::Path;

pub fn output_json(data: &TimelineData, failures: &[RepoFailure], root: &Path) -> Result<()> {
    let output = TimelineOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        workspace_path: root.to_string_lossy().to_string(),
        timeline: data.clone(),
        failures: failures.to_vec(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_ndjson(data: &TimelineData) -> Result<()> {
    for entry in &data.entries {
        println!("{}", serde_json::to_string(entry)?);
    }
    Ok(())
}

pub fn output_timeline(data: &TimelineData, failures: &[RepoFailure]) -> Result<()> {
    if data.entries.is_empty() {
        println!("No data to display");
        return Ok(());
    }

    println!("{}", style("Recent Activity").bold());
    println!("{}", "─".repeat(50));

    let mut current_day = "";
    for entry in &data.entries {
        if entry.day_label != current_day {
            current_day = entry.day_label.as_str();
            println!("\n{}", style(current_day).yellow().bold());
        }
        println!(
            "  {:<24} {:<16} {:>14}  {}",
            style(&entry.name).cyan(),
            style(&entry.branch).magenta(),
            style(&entry.time_ago).dim(),
            entry.message
        );
    }

    println!(
        "\n{} of {} repositories have commits",
        style(data.entries.len()).cyan(),
        data.total_repos
    );
    if !failures.is_empty() {
        println!("{} {} commit messages unavailable", style("!").yellow(), failures.len());
    }
    Ok(())
}
