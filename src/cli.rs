use crate::config::parse_duration;
use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "gscope")]
#[command(about = "Contribution heatmap, disk usage and activity timeline across a workspace of git repositories")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Default)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Workspace directory to scan (defaults to the current directory)")]
    pub root: Option<String>,

    #[arg(long, global = true, help = "Path to a JSON config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "How many directory levels to search for repositories")]
    pub depth: Option<usize>,

    #[arg(long, global = true, help = "Worker threads for per-repository jobs")]
    pub workers: Option<usize>,

    #[arg(long, global = true, value_parser = parse_duration, help = "Per-repository deadline (e.g. 30s, 2m)")]
    pub timeout: Option<Duration>,

    #[arg(long, global = true, help = "Disable the per-repository deadline")]
    pub no_timeout: bool,

    #[arg(long, global = true, help = "Dependency directory measured next to .git")]
    pub dependency_dir: Option<String>,

    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase log verbosity (-v, -vv)")]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Commits per day across all repositories
    Contrib {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,

        #[arg(long, help = "Number of weeks to look back")]
        weeks: Option<u32>,
    },
    /// Repositories ranked by .git and dependency directory size
    Disk {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,

        #[arg(long, default_value_t = 30, help = "Width of the largest bar")]
        width: usize,
    },
    /// Repositories ordered by their latest commit
    Timeline {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,

        #[arg(long, help = "Show at most this many entries")]
        limit: Option<usize>,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Contrib { json, ndjson, weeks } => {
                crate::contrib::exec(self.common, json, ndjson, weeks)
            }
            Commands::Disk { json, ndjson, width } => {
                crate::disk::exec(self.common, json, ndjson, width)
            }
            Commands::Timeline { json, ndjson, limit } => {
                crate::timeline::exec(self.common, json, ndjson, limit)
            }
        }
    }
}
