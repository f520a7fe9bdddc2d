use super::{aggregate, output_json, output_ndjson, output_table};
use crate::cli::CommonArgs;
use crate::session::{spinner, Session};

pub fn exec(common: CommonArgs, json: bool, ndjson: bool, width: usize) -> anyhow::Result<()> {
    let session = Session::open(&common)?;

    let pb = spinner(!json && !ndjson, "Measuring repositories...");
    let report = aggregate(&session.repos, &session.pool, &session.config);
    pb.finish_and_clear();

    if json {
        output_json(&report.data, &report.failures, &session.root)?;
    } else if ndjson {
        output_ndjson(&report.data)?;
    } else {
        output_table(&report.data, &report.failures, width)?;
    }

    Ok(())
}
