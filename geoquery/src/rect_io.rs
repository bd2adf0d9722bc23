//! Reading the query rectangle and writing result ids.

use crate::bounding_box::BoundingBox;
use crate::errors::{SpatialError, SpatialResult};
use crate::rtree::Entry;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Reads `xMin yMin xMax yMax` from a file.
pub fn read_query_rect(path: impl AsRef<Path>) -> SpatialResult<BoundingBox> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| SpatialError::io(path, e))?;
    let rect = parse_query_rect(&text)?;
    log::debug!("Query rectangle from {:?}: {}", path, rect);
    Ok(rect)
}

/// Parses the first four whitespace-separated numbers as `xMin yMin xMax yMax`.
///
/// Anything after the fourth number is ignored. The rectangle must not be
/// inverted and every value must be finite.
pub fn parse_query_rect(text: &str) -> SpatialResult<BoundingBox> {
    let tokens: Vec<&str> = text.split_whitespace().take(4).collect();
    if tokens.len() < 4 {
        return Err(SpatialError::Parse(format!(
            "query rectangle needs four numbers (xMin yMin xMax yMax), found {}",
            tokens.len()
        )));
    }

    let mut values = [0.0f64; 4];
    for (value, token) in values.iter_mut().zip(&tokens) {
        *value = token
            .parse()
            .map_err(|e| SpatialError::Parse(format!("invalid number {:?}: {}", token, e)))?;
    }
    let [min_x, min_y, max_x, max_y] = values;
    BoundingBox::try_new(min_x, min_y, max_x, max_y)
}

/// Writes one id per line, in the order given. An empty slice writes an empty file.
///
/// The whole file is written in one call, after the content is complete.
pub fn write_ids(path: impl AsRef<Path>, entries: &[Entry]) -> SpatialResult<()> {
    let path = path.as_ref();
    let mut out = String::with_capacity(entries.len() * 8);
    for entry in entries {
        // Writing to a String cannot fail
        let _ = writeln!(out, "{}", entry.id());
    }
    fs::write(path, out).map_err(|e| SpatialError::io(path, e))?;
    log::debug!("Wrote {} ids to {:?}", entries.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_query_rect() {
        let rect = parse_query_rect("1.5 1.5\n5.5\t5.5\n").unwrap();
        assert_eq!(rect, BoundingBox::new(1.5, 1.5, 5.5, 5.5));

        let rect = parse_query_rect("-1e2 0 3 4 extra tokens").unwrap();
        assert_eq!(rect, BoundingBox::new(-100.0, 0.0, 3.0, 4.0));
    }

    #[test]
    fn test_parse_query_rect_errors() {
        assert!(matches!(
            parse_query_rect("1 2 3"),
            Err(SpatialError::Parse(_))
        ));
        assert!(parse_query_rect("").is_err());
        assert!(parse_query_rect("1 2 x 4").is_err());
        assert!(parse_query_rect("5 0 1 1").is_err());
        assert!(parse_query_rect("0 0 NaN 1").is_err());
    }

    #[test]
    fn test_read_query_rect_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_query_rect(dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, SpatialError::Io { .. }));
    }

    #[test]
    fn test_write_ids() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ids.txt");
        let entries = vec![
            Entry::new(BoundingBox::point(0.0, 0.0), 3),
            Entry::new(BoundingBox::point(0.0, 0.0), 5),
            Entry::new(BoundingBox::point(0.0, 0.0), 7),
        ];
        write_ids(&path, &entries).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "3\n5\n7\n");

        write_ids(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_read_write_files() {
        let dir = tempdir().unwrap();
        let rect_path = dir.path().join("rect.txt");
        fs::write(&rect_path, "0 0 10 10").unwrap();
        assert_eq!(
            read_query_rect(&rect_path).unwrap(),
            BoundingBox::new(0.0, 0.0, 10.0, 10.0)
        );

        let err = write_ids(dir.path().join("no/such/dir/ids.txt"), &[]).unwrap_err();
        assert!(err.is_fatal());
    }
}
