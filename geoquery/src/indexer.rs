//! Building an R-Tree from a feature source.
//!
//! Features are pulled from the source in batches. Each batch has its
//! envelopes computed (in parallel for large batches), then the resulting
//! entries are inserted one by one in source order. Features that cannot be
//! indexed are skipped and counted:
//!
//! - unsupported geometry kinds (points, lines, ...) are logged at debug level
//! - degenerate geometry (empty rings, multipolygons without parts) and
//!   malformed source records are logged as warnings
//!
//! Any other error from the source aborts indexing.

use crate::envelope::{build_entries, EntryOutcome};
use crate::errors::SpatialResult;
use crate::feature_source::{Feature, FeatureSource};
use crate::rtree::{RTree, RTreeConfig};
use std::fmt;

/// Number of features pulled from the source before envelopes are computed
pub const INDEX_BATCH_SIZE: usize = 8192;

/// What happened to each feature during index construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexingReport {
    /// Features inserted into the tree
    pub indexed: usize,
    /// Features skipped because their geometry kind is not indexed
    pub unsupported: usize,
    /// Features skipped because their geometry has no valid envelope
    pub degenerate: usize,
    /// Source records skipped because they could not be read as a feature
    pub malformed: usize,
}

impl IndexingReport {
    /// Total number of features and records seen.
    pub fn seen(&self) -> usize {
        self.indexed + self.skipped()
    }

    pub fn skipped(&self) -> usize {
        self.unsupported + self.degenerate + self.malformed
    }
}

impl fmt::Display for IndexingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} indexed, {} unsupported, {} degenerate, {} malformed",
            self.indexed, self.unsupported, self.degenerate, self.malformed
        )
    }
}

/// Accumulates features into an [`RTree`].
#[derive(Debug)]
pub struct SpatialIndexer {
    tree: RTree,
    report: IndexingReport,
    parallel_threshold: usize,
}

impl SpatialIndexer {
    /// Creates a new indexer over an empty tree.
    pub fn new(config: RTreeConfig, parallel_threshold: usize) -> Self {
        Self {
            tree: RTree::with_config(config),
            report: IndexingReport::default(),
            parallel_threshold,
        }
    }

    /// Drains `source` into the tree.
    ///
    /// Stops at the first fatal source error; what was indexed so far stays in
    /// the tree.
    pub fn index_source<S: FeatureSource>(&mut self, source: S) -> SpatialResult<()> {
        let mut batch: Vec<Feature> = Vec::with_capacity(INDEX_BATCH_SIZE);
        for item in source {
            match item {
                Ok(feature) => {
                    batch.push(feature);
                    if batch.len() == INDEX_BATCH_SIZE {
                        self.index_batch(&batch);
                        batch.clear();
                    }
                }
                Err(e) if e.is_fatal() => {
                    log::error!("Feature source failed: {}", e);
                    return Err(e);
                }
                Err(e) => {
                    log::warn!("Skipping record: {}", e);
                    self.report.malformed += 1;
                }
            }
        }
        self.index_batch(&batch);
        Ok(())
    }

    /// Computes envelopes for `features` and inserts them in order.
    pub fn index_batch(&mut self, features: &[Feature]) {
        if features.is_empty() {
            return;
        }
        for outcome in build_entries(features, self.parallel_threshold) {
            match outcome {
                EntryOutcome::Entry(entry) => {
                    self.tree.insert(entry);
                    self.report.indexed += 1;
                }
                EntryOutcome::Unsupported { id, kind } => {
                    log::debug!("Skipping feature {}: {} is not indexed", id, kind);
                    self.report.unsupported += 1;
                }
                EntryOutcome::Degenerate { id, error } => {
                    log::warn!("Skipping feature {}: {}", id, error);
                    self.report.degenerate += 1;
                }
            }
        }
    }

    pub fn tree(&self) -> &RTree {
        &self.tree
    }

    pub fn report(&self) -> &IndexingReport {
        &self.report
    }

    /// Finishes indexing, handing over the tree and the report.
    pub fn finish(self) -> (RTree, IndexingReport) {
        log::info!("Indexing done: {}", self.report);
        (self.tree, self.report)
    }
}

/// Builds a tree from every feature of `source`.
pub fn build_index<S: FeatureSource>(
    source: S,
    config: RTreeConfig,
    parallel_threshold: usize,
) -> SpatialResult<(RTree, IndexingReport)> {
    let mut indexer = SpatialIndexer::new(config, parallel_threshold);
    indexer.index_source(source)?;
    Ok(indexer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounding_box::BoundingBox;
    use crate::errors::SpatialError;
    use crate::feature_source::{VecFeatureSource, WktDataset};
    use crate::geometry::{Geometry, Polygon};
    use crate::ordering::{ids, sort_by_id};
    use std::fs;
    use std::io;
    use tempfile::tempdir;

    fn polygon(id: i64, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Feature {
        Feature::new(
            id,
            Geometry::Polygon(Polygon::rectangle(min_x, min_y, max_x, max_y)),
        )
    }

    #[test]
    fn test_three_polygon_run() {
        let source = VecFeatureSource::new(vec![
            polygon(7, 0.0, 0.0, 2.0, 2.0),
            polygon(3, 5.0, 5.0, 6.0, 6.0),
            polygon(5, 1.0, 1.0, 3.0, 3.0),
        ]);
        let (tree, report) = build_index(source, RTreeConfig::default(), 1024).unwrap();
        assert_eq!(report.indexed, 3);
        assert_eq!(report.skipped(), 0);

        let hits = sort_by_id(tree.query(&BoundingBox::new(1.5, 1.5, 5.5, 5.5)));
        assert_eq!(ids(&hits), vec![3, 5, 7]);
    }

    #[test]
    fn test_skips_are_counted() {
        let features = vec![
            polygon(1, 0.0, 0.0, 1.0, 1.0),
            Feature::new(2, Geometry::Point((0.5, 0.5).into())),
            Feature::new(3, Geometry::Polygon(Polygon::default())),
            Feature::new(4, Geometry::MultiPolygon(vec![])),
            Feature::new(
                5,
                Geometry::MultiPolygon(vec![
                    Polygon::rectangle(0.0, 0.0, 1.0, 1.0),
                    Polygon::rectangle(5.0, 5.0, 6.0, 6.0),
                ]),
            ),
        ];
        let malformed = SpatialError::MalformedFeature {
            layer: "layer.wkt".into(),
            line: 9,
            reason: "bad id".into(),
        };
        let source = features.into_iter().map(Ok).chain(std::iter::once(Err(malformed)));

        let (tree, report) = build_index(source, RTreeConfig::default(), 1024).unwrap();
        assert_eq!(
            report,
            IndexingReport {
                indexed: 2,
                unsupported: 1,
                degenerate: 2,
                malformed: 1,
            }
        );
        assert_eq!(report.seen(), 6);
        assert_eq!(report.to_string(), "2 indexed, 1 unsupported, 2 degenerate, 1 malformed");

        // The multipolygon covers the gap between its parts
        let hits = sort_by_id(tree.query(&BoundingBox::point(3.0, 3.0)));
        assert_eq!(ids(&hits), vec![5]);
    }

    #[test]
    fn test_fatal_source_error_aborts() {
        let source = vec![
            Ok(polygon(1, 0.0, 0.0, 1.0, 1.0)),
            Err(SpatialError::io("layer.wkt", io::Error::other("disk gone"))),
            Ok(polygon(2, 0.0, 0.0, 1.0, 1.0)),
        ];
        let result = build_index(source.into_iter(), RTreeConfig::default(), 1024);
        assert!(matches!(result, Err(SpatialError::Io { .. })));
    }

    #[test]
    fn test_unreadable_record_does_not_abort() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("parcels.wkt");
        let mut bytes = b"1\tPOLYGON((0 0, 2 0, 2 2, 0 0))\n".to_vec();
        bytes.extend_from_slice(b"2\tPOLYGON((0 0, 2 0, 2 2, 0 0)) \xff\n");
        bytes.extend_from_slice(b"3\tPOLYGON((1 1, 3 1, 3 3, 1 1))\n");
        fs::write(&path, bytes).unwrap();

        let dataset = WktDataset::open(&path).unwrap();
        let (tree, report) = build_index(dataset, RTreeConfig::default(), 1024).unwrap();
        assert_eq!(report.indexed, 2);
        assert_eq!(report.malformed, 1);

        let hits = sort_by_id(tree.query(&BoundingBox::new(0.0, 0.0, 3.0, 3.0)));
        assert_eq!(ids(&hits), vec![1, 3]);
    }

    #[test]
    fn test_large_source_spans_batches() {
        let features: Vec<Feature> = (0..(INDEX_BATCH_SIZE as i64 + 100))
            .map(|i| {
                let x = (i % 200) as f64;
                let y = (i / 200) as f64;
                polygon(i, x, y, x + 0.5, y + 0.5)
            })
            .collect();
        let total = features.len();

        let mut indexer = SpatialIndexer::new(RTreeConfig::default(), 256);
        indexer.index_source(VecFeatureSource::new(features)).unwrap();
        assert_eq!(indexer.report().indexed, total);
        assert_eq!(indexer.tree().len(), total);

        let (tree, _) = indexer.finish();
        assert!(tree.check_integrity().is_valid);
    }
}
