//! Run configuration.

use crate::errors::{SpatialError, SpatialResult};
use crate::rtree::RTreeConfig;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Dataset used when the first argument is empty
pub const DEFAULT_DATASET_PATH: &str = "data";

/// Batches larger than this compute envelopes on several threads
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

/// Usage line reported when the process arguments are incomplete
pub const USAGE: &str = "usage: geoquery <dataset> <query-rect-file> <output-file>";

/// Everything one query run needs.
///
/// # Examples
///
/// ```rust
/// use geoquery::RunConfig;
///
/// let config = RunConfig::builder()
///     .dataset_path("data")
///     .query_path("rect.txt")
///     .output_path("ids.txt")
///     .build()
///     .unwrap();
/// assert_eq!(config.rtree().max_entries(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct RunConfig {
    dataset_path: PathBuf,
    query_path: PathBuf,
    output_path: PathBuf,
    rtree: RTreeConfig,
    parallel_threshold: usize,
}

impl RunConfig {
    /// Creates a new builder with default settings.
    #[inline]
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::new()
    }

    /// Maps positional process arguments: program, dataset, query rectangle, output.
    ///
    /// Extra arguments are ignored.
    pub fn from_args<I, S>(args: I) -> SpatialResult<RunConfig>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        if args.len() < 4 {
            return Err(SpatialError::InvalidConfig(USAGE.to_string()));
        }
        if args.len() > 4 {
            log::debug!("Ignoring {} extra arguments", args.len() - 4);
        }

        let mut builder = RunConfig::builder()
            .query_path(&args[2])
            .output_path(&args[3]);
        if !args[1].is_empty() {
            builder = builder.dataset_path(&args[1]);
        }
        builder.build()
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    pub fn query_path(&self) -> &Path {
        &self.query_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn rtree(&self) -> &RTreeConfig {
        &self.rtree
    }

    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }
}

/// Fluent builder for [`RunConfig`].
#[derive(Debug, Clone)]
pub struct RunConfigBuilder {
    dataset_path: PathBuf,
    query_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    rtree: RTreeConfig,
    parallel_threshold: usize,
}

impl Default for RunConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RunConfigBuilder {
    #[inline]
    pub fn new() -> RunConfigBuilder {
        RunConfigBuilder {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            query_path: None,
            output_path: None,
            rtree: RTreeConfig::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    #[inline]
    pub fn dataset_path(mut self, path: impl AsRef<Path>) -> Self {
        self.dataset_path = path.as_ref().to_path_buf();
        self
    }

    #[inline]
    pub fn query_path(mut self, path: impl AsRef<Path>) -> Self {
        self.query_path = Some(path.as_ref().to_path_buf());
        self
    }

    #[inline]
    pub fn output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output_path = Some(path.as_ref().to_path_buf());
        self
    }

    #[inline]
    pub fn rtree(mut self, rtree: RTreeConfig) -> Self {
        self.rtree = rtree;
        self
    }

    /// Sets the R-Tree fan-out, validated when the config is built.
    pub fn fanout(self, max_entries: usize, min_entries: usize) -> SpatialResult<Self> {
        Ok(self.rtree(RTreeConfig::new(max_entries, min_entries)?))
    }

    #[inline]
    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Builds the config; the query and output paths are required.
    pub fn build(self) -> SpatialResult<RunConfig> {
        let query_path = self
            .query_path
            .ok_or_else(|| SpatialError::InvalidConfig("query rectangle path is required".into()))?;
        let output_path = self
            .output_path
            .ok_or_else(|| SpatialError::InvalidConfig("output path is required".into()))?;

        Ok(RunConfig {
            dataset_path: self.dataset_path,
            query_path,
            output_path,
            rtree: self.rtree,
            parallel_threshold: self.parallel_threshold,
        })
    }
}
