//! Single pass from dataset to GPX file

use std::path::PathBuf;
use tracing::{info, instrument};

use crate::config::KravinkaConfig;
use crate::dataset::DatasetSource;
use crate::gpx;
use crate::ranking::{PoiRanker, RankingStats};
use crate::Result;

/// Outcome of one export run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub stats: RankingStats,
    /// Waypoints actually written, after the output limit
    pub written: usize,
    pub output_path: PathBuf,
}

/// Fetch the listing, rank it and write the GPX file
#[instrument(name = "export", level = "debug", skip_all)]
pub fn run(config: &KravinkaConfig, source: &dyn DatasetSource) -> Result<RunSummary> {
    let records = source.fetch()?;

    let ranker = PoiRanker::from_config(config);
    let (ranked, stats) = ranker.rank(records);
    info!(
        "Accepted {} of {} records ({} malformed, {} out of range, {} rejected by icon)",
        stats.accepted, stats.seen, stats.malformed, stats.out_of_range, stats.icon_rejected
    );

    let written = gpx::write_file(&ranked, &config.output)?;
    if written < ranked.len() {
        info!(
            "Output limit of {} dropped {} farther waypoints",
            config.output.limit,
            ranked.len() - written
        );
    }

    Ok(RunSummary {
        stats,
        written,
        output_path: config.output.path.clone(),
    })
}
