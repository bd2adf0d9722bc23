//! Error and result types shared by every geoquery module.

use std::io;
use std::num::{ParseFloatError, ParseIntError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or querying a spatial index.
///
/// Fatal kinds ([`SourceUnavailable`](SpatialError::SourceUnavailable),
/// [`Io`](SpatialError::Io), [`Parse`](SpatialError::Parse) and
/// [`InvalidConfig`](SpatialError::InvalidConfig)) abort a run. The per-feature
/// kinds ([`Geometry`](SpatialError::Geometry) and
/// [`MalformedFeature`](SpatialError::MalformedFeature)) are reported and the
/// offending feature is skipped.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("Cannot open feature source {path:?}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Malformed feature at {layer}:{line}: {reason}")]
    MalformedFeature {
        layer: String,
        line: usize,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SpatialError {
    /// Wraps an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SpatialError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error should stop the whole run.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            SpatialError::Geometry(_) | SpatialError::MalformedFeature { .. }
        )
    }
}

impl From<io::Error> for SpatialError {
    fn from(err: io::Error) -> Self {
        SpatialError::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<ParseFloatError> for SpatialError {
    fn from(err: ParseFloatError) -> Self {
        SpatialError::Parse(format!("invalid number: {}", err))
    }
}

impl From<ParseIntError> for SpatialError {
    fn from(err: ParseIntError) -> Self {
        SpatialError::Parse(format!("invalid integer: {}", err))
    }
}

/// Result type for spatial operations
pub type SpatialResult<T> = Result<T, SpatialError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_kinds() {
        let err = SpatialError::SourceUnavailable {
            path: PathBuf::from("data"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.is_fatal());
        assert!(SpatialError::Parse("bad".into()).is_fatal());
        assert!(SpatialError::InvalidConfig("bad".into()).is_fatal());
        assert!(SpatialError::io("out.txt", io::Error::other("denied")).is_fatal());
    }

    #[test]
    fn test_recoverable_kinds() {
        assert!(!SpatialError::Geometry("empty ring".into()).is_fatal());
        let err = SpatialError::MalformedFeature {
            layer: "roads.wkt".into(),
            line: 3,
            reason: "bad id".into(),
        };
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_display_messages() {
        let err = SpatialError::MalformedFeature {
            layer: "roads.wkt".into(),
            line: 3,
            reason: "bad id".into(),
        };
        assert_eq!(err.to_string(), "Malformed feature at roads.wkt:3: bad id");

        let err = SpatialError::Geometry("empty ring".into());
        assert_eq!(err.to_string(), "Geometry error: empty ring");
    }

    #[test]
    fn test_from_parse_float_error() {
        let err: SpatialError = "abc".parse::<f64>().unwrap_err().into();
        assert!(matches!(err, SpatialError::Parse(_)));
    }

    #[test]
    fn test_from_parse_int_error() {
        let err: SpatialError = "1.5".parse::<i64>().unwrap_err().into();
        assert!(matches!(err, SpatialError::Parse(_)));
    }

    #[test]
    fn test_from_io_error() {
        fn fails() -> SpatialResult<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(SpatialError::Io { .. })));
    }
}
