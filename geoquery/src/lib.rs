//! # geoquery - Rectangle Queries over Polygon Features
//!
//! This crate answers one question: which polygon features touch a given
//! rectangle? It reads features from a dataset, indexes the bounding box of
//! every polygon and multipolygon in an in-memory R-Tree, and returns the ids
//! of every feature whose box intersects the query rectangle, sorted.
//!
//! ## Features
//!
//! - **R-Tree**: arena-backed, quadratic split, fan-out 8 / 4 by default
//! - **Lazy Search**: pruned intersection iterator, no intermediate vectors
//! - **Closed Boxes**: touching edges and corners count as intersecting
//! - **Envelopes**: polygon exterior ring, union of parts for multipolygons
//! - **WKT Datasets**: a layer file or a directory of `.wkt` layers
//! - **Parallel Envelopes**: large batches are processed on scoped threads
//!
//! ## Quick Start
//!
//! ```rust
//! use geoquery::{sort_by_id, BoundingBox, Entry, RTree};
//!
//! let mut tree = RTree::new();
//! tree.insert(Entry::new(BoundingBox::new(0.0, 0.0, 2.0, 2.0), 7));
//! tree.insert(Entry::new(BoundingBox::new(5.0, 5.0, 6.0, 6.0), 3));
//! tree.insert(Entry::new(BoundingBox::new(1.0, 1.0, 3.0, 3.0), 5));
//!
//! let hits = sort_by_id(tree.query(&BoundingBox::new(1.5, 1.5, 5.5, 5.5)));
//! let ids: Vec<i64> = hits.iter().map(|e| e.id()).collect();
//! assert_eq!(ids, vec![3, 5, 7]);
//! ```
//!
//! ## Running a Query
//!
//! ```rust,no_run
//! use geoquery::{run, RunConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RunConfig::builder()
//!     .dataset_path("data")
//!     .query_path("rect.txt")
//!     .output_path("ids.txt")
//!     .build()?;
//! let report = run(&config)?;
//! println!("{} matches, {}", report.matched, report.indexing);
//! # Ok(())
//! # }
//! ```

// Core R-Tree modules
pub mod bounding_box;
pub mod rtree;
pub mod spatial_index;

// Geometry and input
pub mod envelope;
pub mod feature_source;
pub mod geometry;
pub mod wkt;

// Running queries
pub mod config;
pub mod errors;
pub mod indexer;
pub mod ordering;
pub mod rect_io;
pub mod runner;

pub use bounding_box::BoundingBox;
pub use config::{RunConfig, RunConfigBuilder};
pub use envelope::{envelope_of, Envelope};
pub use errors::{SpatialError, SpatialResult};
pub use feature_source::{Feature, FeatureSource, VecFeatureSource, WktDataset};
pub use geometry::{Coordinate, Geometry, GeometryKind, Polygon};
pub use indexer::{build_index, IndexingReport, SpatialIndexer};
pub use ordering::sort_by_id;
pub use rect_io::{read_query_rect, write_ids};
pub use rtree::{Entry, FeatureId, IntegrityReport, RTree, RTreeConfig, RTreeStats};
pub use runner::{run, run_with_source, RunReport};
pub use spatial_index::{LinearIndex, SharedIndex, SpatialIndex};
