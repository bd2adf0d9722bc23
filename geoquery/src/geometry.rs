//! Geometry types handed over by a feature source.
//!
//! Only [`Geometry::Polygon`] and [`Geometry::MultiPolygon`] are indexed; the
//! other variants exist so that a source can report what it actually found and
//! the indexer can skip it explicitly.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A 2D coordinate (x, y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Coordinate::new(x, y)
    }
}

/// A polygon made of an exterior ring and zero or more interior rings (holes).
///
/// Rings are kept exactly as the source delivered them. An empty exterior ring
/// is representable so that the envelope builder can reject it with a
/// geometry error instead of the source inventing a box.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    exterior: Vec<Coordinate>,
    holes: Vec<Vec<Coordinate>>,
}

impl Polygon {
    /// Creates a polygon from an exterior ring and interior rings.
    pub fn new(exterior: Vec<Coordinate>, holes: Vec<Vec<Coordinate>>) -> Self {
        Self { exterior, holes }
    }

    /// Creates a polygon without holes.
    pub fn simple(exterior: Vec<Coordinate>) -> Self {
        Self::new(exterior, Vec::new())
    }

    /// Creates the closed rectangular polygon covering `[min_x, max_x] x [min_y, max_y]`.
    pub fn rectangle(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::simple(vec![
            Coordinate::new(min_x, min_y),
            Coordinate::new(max_x, min_y),
            Coordinate::new(max_x, max_y),
            Coordinate::new(min_x, max_y),
            Coordinate::new(min_x, min_y),
        ])
    }

    /// Gets the exterior ring coordinates.
    pub fn exterior(&self) -> &[Coordinate] {
        &self.exterior
    }

    /// Gets the interior holes.
    pub fn holes(&self) -> &[Vec<Coordinate>] {
        &self.holes
    }

    /// Whether the exterior ring has no points.
    pub fn is_empty(&self) -> bool {
        self.exterior.is_empty()
    }
}

/// The kind of a [`Geometry`], used when reporting skipped features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

impl Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeometryKind::Point => "POINT",
            GeometryKind::LineString => "LINESTRING",
            GeometryKind::Polygon => "POLYGON",
            GeometryKind::MultiPoint => "MULTIPOINT",
            GeometryKind::MultiLineString => "MULTILINESTRING",
            GeometryKind::MultiPolygon => "MULTIPOLYGON",
        };
        f.write_str(name)
    }
}

/// A geometry value read from a feature source.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A single point
    Point(Coordinate),
    /// An open or closed line
    LineString(Vec<Coordinate>),
    /// A polygon with possible holes
    Polygon(Polygon),
    /// Several points
    MultiPoint(Vec<Coordinate>),
    /// Several lines
    MultiLineString(Vec<Vec<Coordinate>>),
    /// Several polygons forming one feature
    MultiPolygon(Vec<Polygon>),
}

impl Geometry {
    /// Returns the kind of this geometry.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }
}

fn write_ring(f: &mut fmt::Formatter<'_>, ring: &[Coordinate]) -> fmt::Result {
    write!(f, "(")?;
    for (i, coord) in ring.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{} {}", coord.x, coord.y)?;
    }
    write!(f, ")")
}

fn write_polygon_body(f: &mut fmt::Formatter<'_>, polygon: &Polygon) -> fmt::Result {
    write!(f, "(")?;
    write_ring(f, &polygon.exterior)?;
    for hole in &polygon.holes {
        write!(f, ", ")?;
        write_ring(f, hole)?;
    }
    write!(f, ")")
}

impl Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "POLYGON EMPTY");
        }
        write!(f, "POLYGON")?;
        write_polygon_body(f, self)
    }
}

impl Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Geometry::Point(coord) => write!(f, "POINT({} {})", coord.x, coord.y),
            Geometry::LineString(coords) => {
                write!(f, "LINESTRING")?;
                write_ring(f, coords)
            }
            Geometry::Polygon(polygon) => write!(f, "{}", polygon),
            Geometry::MultiPoint(points) => {
                write!(f, "MULTIPOINT")?;
                write_ring(f, points)
            }
            Geometry::MultiLineString(lines) => {
                write!(f, "MULTILINESTRING(")?;
                for (i, line) in lines.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_ring(f, line)?;
                }
                write!(f, ")")
            }
            Geometry::MultiPolygon(polygons) => {
                write!(f, "MULTIPOLYGON(")?;
                for (i, polygon) in polygons.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_polygon_body(f, polygon)?;
                }
                write!(f, ")")
            }
        }
    }
}
