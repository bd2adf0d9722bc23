//! Feature sources: where (id, geometry) pairs come from.
//!
//! A [`FeatureSource`] is any iterator of `SpatialResult<Feature>`. Items that
//! fail with [`SpatialError::MalformedFeature`] are skipped by the indexer;
//! any other error aborts indexing.
//!
//! [`WktDataset`] reads the on-disk format: a single layer file, or a
//! directory whose `*.wkt` files are the layers, visited in file-name order.
//! Each non-blank line of a layer is `<id> <WKT geometry>`, separated by a tab
//! or any whitespace; lines starting with `#` are comments. A line that is not
//! valid UTF-8 is a malformed record, not a read failure.

use crate::errors::{SpatialError, SpatialResult};
use crate::geometry::Geometry;
use crate::rtree::FeatureId;
use crate::wkt::parse_wkt;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Split};
use std::path::{Path, PathBuf};

/// File extension of a layer inside a dataset directory
pub const LAYER_EXTENSION: &str = "wkt";

/// One feature as handed over by a source.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: FeatureId,
    pub geometry: Geometry,
}

impl Feature {
    pub fn new(id: FeatureId, geometry: Geometry) -> Self {
        Self { id, geometry }
    }
}

/// A sequential, finite supply of features.
pub trait FeatureSource: Iterator<Item = SpatialResult<Feature>> {}

impl<I> FeatureSource for I where I: Iterator<Item = SpatialResult<Feature>> {}

/// An in-memory source, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct VecFeatureSource {
    features: std::vec::IntoIter<Feature>,
}

impl VecFeatureSource {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features: features.into_iter(),
        }
    }
}

impl From<Vec<Feature>> for VecFeatureSource {
    fn from(features: Vec<Feature>) -> Self {
        Self::new(features)
    }
}

impl Iterator for VecFeatureSource {
    type Item = SpatialResult<Feature>;

    fn next(&mut self) -> Option<Self::Item> {
        self.features.next().map(Ok)
    }
}

struct Layer {
    name: String,
    path: PathBuf,
    lines: Split<BufReader<File>>,
    line_no: usize,
}

/// A dataset of WKT layer files.
///
/// Every layer is opened by [`WktDataset::open`], so an unreadable dataset is
/// reported before any feature is produced.
pub struct WktDataset {
    root: PathBuf,
    layers: std::vec::IntoIter<Layer>,
    current: Option<Layer>,
}

impl WktDataset {
    /// Opens a layer file or a directory of layer files.
    pub fn open(path: impl AsRef<Path>) -> SpatialResult<Self> {
        let root = path.as_ref().to_path_buf();
        let unavailable = |source: io::Error| SpatialError::SourceUnavailable {
            path: root.clone(),
            source,
        };

        let metadata = fs::metadata(&root).map_err(unavailable)?;
        let paths = if metadata.is_dir() {
            let mut paths = Vec::new();
            for dir_entry in fs::read_dir(&root).map_err(unavailable)? {
                let path = dir_entry.map_err(unavailable)?.path();
                let is_layer = path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case(LAYER_EXTENSION));
                if is_layer {
                    paths.push(path);
                }
            }
            paths.sort();
            if paths.is_empty() {
                log::warn!("Dataset {:?} contains no .{} layers", root, LAYER_EXTENSION);
            }
            paths
        } else {
            vec![root.clone()]
        };

        let mut layers = Vec::with_capacity(paths.len());
        for path in paths {
            let file = File::open(&path).map_err(|source| SpatialError::SourceUnavailable {
                path: path.clone(),
                source,
            })?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            log::debug!("Opened layer {} ({:?})", name, path);
            layers.push(Layer {
                name,
                path,
                lines: BufReader::new(file).split(b'\n'),
                line_no: 0,
            });
        }

        Ok(Self {
            root,
            layers: layers.into_iter(),
            current: None,
        })
    }

    /// Path the dataset was opened from.
    pub fn root(&self) -> &Path {
        &self.root
    }

}

impl Iterator for WktDataset {
    type Item = SpatialResult<Feature>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current.is_none() {
                self.current = Some(self.layers.next()?);
            }
            let layer = self.current.as_mut()?;

            match layer.lines.next() {
                None => {
                    log::debug!("Finished layer {} after {} lines", layer.name, layer.line_no);
                    self.current = None;
                }
                Some(Err(e)) => {
                    let path = layer.path.clone();
                    self.current = None;
                    return Some(Err(SpatialError::io(path, e)));
                }
                Some(Ok(bytes)) => {
                    layer.line_no += 1;
                    let parsed = String::from_utf8(bytes)
                        .map_err(|e| format!("line is not valid UTF-8: {}", e.utf8_error()))
                        .and_then(|line| {
                            let text = line.trim();
                            if text.is_empty() || text.starts_with('#') {
                                Ok(None)
                            } else {
                                parse_feature_line(text).map(Some)
                            }
                        });
                    match parsed {
                        Ok(None) => continue,
                        Ok(Some(feature)) => return Some(Ok(feature)),
                        Err(reason) => {
                            return Some(Err(SpatialError::MalformedFeature {
                                layer: layer.name.clone(),
                                line: layer.line_no,
                                reason,
                            }))
                        }
                    }
                }
            }
        }
    }
}

/// Parses `<id> <WKT>`; the error is the reason the line is malformed.
pub fn parse_feature_line(line: &str) -> Result<Feature, String> {
    let (id, wkt) = line
        .split_once(|c: char| c.is_whitespace())
        .ok_or_else(|| "expected an id followed by a WKT geometry".to_string())?;
    let id: FeatureId = id
        .parse()
        .map_err(|e| format!("invalid feature id {:?}: {}", id, e))?;
    let geometry = parse_wkt(wkt).map_err(|e| e.to_string())?;
    Ok(Feature::new(id, geometry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GeometryKind, Polygon};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_feature_line() {
        let feature = parse_feature_line("7\tPOLYGON((0 0, 2 0, 2 2, 0 0))").unwrap();
        assert_eq!(feature.id, 7);
        assert_eq!(feature.geometry.kind(), GeometryKind::Polygon);

        let feature = parse_feature_line("-3 POINT(1 1)").unwrap();
        assert_eq!(feature.id, -3);

        let feature = parse_feature_line("4\tPOINT EMPTY").unwrap();
        assert_eq!(feature.geometry.kind(), GeometryKind::MultiPoint);
    }

    #[test]
    fn test_parse_feature_line_errors() {
        assert!(parse_feature_line("POLYGON((0 0, 1 1, 0 0))").is_err());
        assert!(parse_feature_line("abc\tPOINT(1 1)").is_err());
        assert!(parse_feature_line("12").is_err());
        assert!(parse_feature_line("12\tPOINT(1)").is_err());
    }

    #[test]
    fn test_vec_source() {
        let source = VecFeatureSource::new(vec![
            Feature::new(1, Geometry::Polygon(Polygon::rectangle(0.0, 0.0, 1.0, 1.0))),
            Feature::new(2, Geometry::Point((0.0, 0.0).into())),
        ]);
        let ids: Vec<i64> = source.map(|f| f.unwrap().id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_single_layer_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("parcels.wkt");
        fs::write(
            &path,
            "# parcels\n7\tPOLYGON((0 0, 2 0, 2 2, 0 2, 0 0))\n\n3\tPOLYGON((5 5, 6 5, 6 6, 5 5))\n",
        )
        .unwrap();

        let features: Vec<Feature> = WktDataset::open(&path)
            .unwrap()
            .collect::<SpatialResult<_>>()
            .unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].id, 7);
        assert_eq!(features[1].id, 3);
    }

    #[test]
    fn test_directory_layers_in_name_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b_roads.wkt"), "2\tLINESTRING(0 0, 1 1)\n").unwrap();
        fs::write(dir.path().join("a_parcels.wkt"), "1\tPOLYGON((0 0, 1 0, 1 1, 0 0))\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a layer\n").unwrap();

        let dataset = WktDataset::open(dir.path()).unwrap();
        assert_eq!(dataset.root(), dir.path());

        let ids: Vec<i64> = dataset.map(|f| f.unwrap().id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_malformed_line_is_reported_with_location() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layer.wkt");
        fs::write(&path, "1\tPOLYGON((0 0, 1 0, 1 1, 0 0))\nx\tPOINT(1 1)\n2\tPOINT(3 3)\n").unwrap();

        let items: Vec<SpatialResult<Feature>> = WktDataset::open(&path).unwrap().collect();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok());
        match &items[1] {
            Err(SpatialError::MalformedFeature { layer, line, .. }) => {
                assert_eq!(layer, "layer.wkt");
                assert_eq!(*line, 2);
            }
            other => panic!("expected malformed feature, got {:?}", other),
        }
        assert!(items[2].is_ok());
    }

    #[test]
    fn test_invalid_utf8_line_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layer.wkt");
        let mut bytes = b"1\tPOLYGON((0 0, 1 0, 1 1, 0 0))\n".to_vec();
        bytes.extend_from_slice(b"2\tPOLYGON((0 0, 1 0, 1 1, 0 0)) \xff\n");
        bytes.extend_from_slice(b"3\tPOLYGON((2 2, 3 2, 3 3, 2 2))\r\n");
        fs::write(&path, bytes).unwrap();

        let items: Vec<SpatialResult<Feature>> = WktDataset::open(&path).unwrap().collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap().id, 1);
        match &items[1] {
            Err(SpatialError::MalformedFeature { line, reason, .. }) => {
                assert_eq!(*line, 2);
                assert!(reason.contains("UTF-8"), "reason: {}", reason);
            }
            other => panic!("expected malformed feature, got {:?}", other),
        }
        assert_eq!(items[2].as_ref().unwrap().id, 3);
    }

    #[test]
    fn test_missing_dataset() {
        let dir = tempdir().unwrap();
        let result = WktDataset::open(dir.path().join("nope"));
        assert!(matches!(
            result,
            Err(SpatialError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempdir().unwrap();
        let mut dataset = WktDataset::open(dir.path()).unwrap();
        assert!(dataset.next().is_none());
    }
}
