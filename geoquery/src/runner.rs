//! The end-to-end query run.

use crate::bounding_box::BoundingBox;
use crate::config::RunConfig;
use crate::errors::SpatialResult;
use crate::feature_source::{FeatureSource, WktDataset};
use crate::indexer::{build_index, IndexingReport};
use crate::ordering::sort_by_id;
use crate::rect_io::{read_query_rect, write_ids};
use crate::rtree::RTreeStats;

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub indexing: IndexingReport,
    /// Number of ids written to the output
    pub matched: usize,
    pub query: BoundingBox,
    pub tree: RTreeStats,
}

/// Opens the dataset, indexes it, answers the query and writes the ids.
///
/// The dataset is opened before anything else, so an unavailable source fails
/// the run without touching the query or output files. The output is written
/// only once the full result is known.
pub fn run(config: &RunConfig) -> SpatialResult<RunReport> {
    let dataset = WktDataset::open(config.dataset_path())?;
    log::info!("Opened dataset {:?}", dataset.root());
    run_with_source(dataset, config)
}

/// Same as [`run`], with features taken from `source` instead of the dataset path.
pub fn run_with_source<S: FeatureSource>(source: S, config: &RunConfig) -> SpatialResult<RunReport> {
    let query = read_query_rect(config.query_path())?;
    let (tree, indexing) = build_index(source, *config.rtree(), config.parallel_threshold())?;

    let results = sort_by_id(tree.query(&query));
    write_ids(config.output_path(), &results)?;

    let report = RunReport {
        indexing,
        matched: results.len(),
        query,
        tree: tree.stats(),
    };
    log::info!(
        "{} of {} indexed features intersect {}",
        report.matched,
        report.indexing.indexed,
        report.query
    );
    Ok(report)
}
