use super::{aggregate, output_json, output_ndjson, output_timeline};
use crate::cli::CommonArgs;
use crate::session::{spinner, Session};

pub fn exec(common: CommonArgs, json: bool, ndjson: bool, limit: Option<usize>) -> anyhow::Result<()> {
    let session = Session::open(&common)?;

    let pb = spinner(!json && !ndjson, "Reading latest commits...");
    let mut report = aggregate(&session.repos, session.source(), &session.pool, &session.config);
    pb.finish_and_clear();

    if let Some(limit) = limit {
        report.data.entries.truncate(limit);
    }

    if json {
        output_json(&report.data, &report.failures, &session.root)?;
    } else if ndjson {
        output_ndjson(&report.data)?;
    } else {
        output_timeline(&report.data, &report.failures)?;
    }

    Ok(())
}
