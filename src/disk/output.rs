use crate::model::{DiskOutput, DiskUsageData, RepoFailure, SCHEMA_VERSION};
use crate::util::format_bytes;
use anyhow::Result;
use chrono::Utc;
use console::style;
use std::path::Path;

pub fn output_json(data: &DiskUsageData, failures: &[RepoFailure], root: &Path) -> Result<()> {
    let output = DiskOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        workspace_path: root.to_string_lossy().to_string(),
        disk_usage: data.clone(),
        failures: failures.to_vec(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_ndjson(data: &DiskUsageData) -> Result<()> {
    for repo in &data.repos {
        println!("{}", serde_json::to_string(repo)?);
    }
    Ok(())
}

pub fn output_table(data: &DiskUsageData, failures: &[RepoFailure], width: usize) -> Result<()> {
    if data.repos.is_empty() {
        println!("No data to display");
        return Ok(());
    }

    println!("{}", style("Disk Usage").bold());
    println!("{}", "─".repeat(50));
    println!(
        "{:<28} {:>10} {:>10} {:>10}  {}",
        style("Repository").bold(),
        style(".git").bold(),
        style("deps").bold(),
        style("Total").bold(),
        style("Share").bold()
    );

    for repo in &data.repos {
        let bar = "█".repeat(data.bar_width(repo.total_size, width));
        println!(
            "{:<28} {:>10} {:>10} {:>10}  {}",
            repo.name,
            format_bytes(repo.git_size),
            if repo.node_modules_size > 0 { format_bytes(repo.node_modules_size) } else { "-".to_string() },
            format_bytes(repo.total_size),
            style(bar).cyan()
        );
    }

    println!(
        "\n{} repositories, {} in .git",
        style(data.repo_count).cyan(),
        style(format_bytes(data.total_git_size)).green()
    );
    if data.has_node_modules {
        println!("{} in dependency directories", style(format_bytes(data.total_node_size)).yellow());
    }
    println!("{} total", style(format_bytes(data.total_size)).bold());

    if !failures.is_empty() {
        println!("\n{} {} measurement problems", style("!").yellow(), failures.len());
    }
    Ok(())
}
