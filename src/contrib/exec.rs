use super::{aggregate, output_heatmap, output_json, output_ndjson};
use crate::cli::CommonArgs;
use crate::session::{spinner, Session};
use anyhow::Context;

pub fn exec(common: CommonArgs, json: bool, ndjson: bool, weeks: Option<u32>) -> anyhow::Result<()> {
    let mut session = Session::open(&common)?;
    if let Some(weeks) = weeks {
        session.config.weeks = weeks;
        session.config.validate().context("Invalid --weeks")?;
    }

    let pb = spinner(!json && !ndjson, "Collecting commits...");
    let report = aggregate(&session.repos, session.source(), &session.pool, &session.config);
    pb.finish_and_clear();
    let report = report.context("Failed to aggregate contributions")?;

    if json {
        output_json(&report.data, &report.failures, &session.root)?;
    } else if ndjson {
        output_ndjson(&report.data)?;
    } else {
        output_heatmap(&report.data, &report.failures)?;
    }

    Ok(())
}
