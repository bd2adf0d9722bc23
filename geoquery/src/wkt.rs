//! WKT (Well-Known Text) parsing for feature geometry.
//!
//! Supports:
//! - `POINT (x y)`
//! - `LINESTRING (x y, x y, ...)`
//! - `POLYGON ((x y, ..., x y), (hole), ...)`
//! - `MULTIPOINT ((x y), (x y), ...)` or `MULTIPOINT (x y, x y, ...)`
//! - `MULTILINESTRING ((x y, x y, ...), ...)`
//! - `MULTIPOLYGON (((x y, ..., x y)), ((x y, ..., x y)), ...)`
//!
//! Keywords are case-insensitive, the `EMPTY` form is accepted for every
//! type, and a third or fourth ordinate (Z / M) is read and dropped. A point
//! has no empty value, so `POINT EMPTY` reads as an empty multipoint.

use crate::errors::{SpatialError, SpatialResult};
use crate::geometry::{Coordinate, Geometry, Polygon};

/// Parses a WKT string into a [`Geometry`].
///
/// # Example
///
/// ```rust
/// use geoquery::wkt::parse_wkt;
/// use geoquery::GeometryKind;
///
/// let geometry = parse_wkt("POLYGON((0 0, 4 0, 4 4, 0 0))").unwrap();
/// assert_eq!(geometry.kind(), GeometryKind::Polygon);
/// ```
pub fn parse_wkt(wkt: &str) -> SpatialResult<Geometry> {
    let wkt = wkt.trim();
    let split = wkt
        .find(|c: char| c == '(' || c.is_whitespace())
        .unwrap_or(wkt.len());
    let (keyword, body) = wkt.split_at(split);
    let keyword = keyword.to_ascii_uppercase();
    let body = strip_dimension_tag(body.trim());

    match keyword.as_str() {
        "POINT" => parse_point(body),
        "LINESTRING" => Ok(Geometry::LineString(parse_coordinate_list(body)?)),
        "POLYGON" => Ok(Geometry::Polygon(parse_polygon(body)?)),
        "MULTIPOINT" => parse_multipoint(body),
        "MULTILINESTRING" => {
            let lines = split_top_level(body)?
                .into_iter()
                .map(parse_coordinate_list)
                .collect::<SpatialResult<Vec<_>>>()?;
            Ok(Geometry::MultiLineString(lines))
        }
        "MULTIPOLYGON" => {
            let polygons = split_top_level(body)?
                .into_iter()
                .map(parse_polygon)
                .collect::<SpatialResult<Vec<_>>>()?;
            Ok(Geometry::MultiPolygon(polygons))
        }
        "" => Err(SpatialError::Parse("Empty WKT geometry".to_string())),
        _ => Err(SpatialError::Parse(format!("Unknown WKT geometry type: {}", keyword))),
    }
}

/// Drops a `Z`, `M` or `ZM` tag between the keyword and the body.
fn strip_dimension_tag(body: &str) -> &str {
    for tag in ["ZM", "Z", "M"] {
        if let Some(rest) = body.strip_prefix(tag) {
            if rest.trim_start().starts_with('(') {
                return rest.trim_start();
            }
        }
    }
    body
}

fn is_empty_marker(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case("EMPTY")
}

fn parse_point(body: &str) -> SpatialResult<Geometry> {
    if is_empty_marker(body) {
        return Ok(Geometry::MultiPoint(Vec::new()));
    }
    let coords = parse_coordinate_list(body)?;
    if coords.len() != 1 {
        return Err(SpatialError::Parse(
            "POINT must have exactly one coordinate".to_string(),
        ));
    }
    Ok(Geometry::Point(coords[0]))
}

fn parse_polygon(body: &str) -> SpatialResult<Polygon> {
    let mut rings = split_top_level(body)?
        .into_iter()
        .map(parse_coordinate_list)
        .collect::<SpatialResult<Vec<_>>>()?;
    if rings.is_empty() {
        return Ok(Polygon::default());
    }
    let exterior = rings.remove(0);
    Ok(Polygon::new(exterior, rings))
}

fn parse_multipoint(body: &str) -> SpatialResult<Geometry> {
    let mut points = Vec::new();
    for part in split_top_level(body)? {
        let part = part.trim();
        if part.starts_with('(') {
            points.extend(parse_coordinate_list(part)?);
        } else {
            points.push(parse_coordinate(part)?);
        }
    }
    Ok(Geometry::MultiPoint(points))
}

/// Parses `(x y, x y, ...)` or `EMPTY`.
fn parse_coordinate_list(s: &str) -> SpatialResult<Vec<Coordinate>> {
    split_top_level(s)?
        .into_iter()
        .map(parse_coordinate)
        .collect()
}

fn parse_coordinate(pair: &str) -> SpatialResult<Coordinate> {
    let parts: Vec<&str> = pair.split_whitespace().collect();
    if !(2..=4).contains(&parts.len()) {
        return Err(SpatialError::Parse(format!("Invalid coordinate pair: {}", pair.trim())));
    }
    let x: f64 = parts[0]
        .parse()
        .map_err(|_| SpatialError::Parse(format!("Invalid x coordinate: {}", parts[0])))?;
    let y: f64 = parts[1]
        .parse()
        .map_err(|_| SpatialError::Parse(format!("Invalid y coordinate: {}", parts[1])))?;
    Ok(Coordinate::new(x, y))
}

/// Strips one level of parentheses and splits the inside on top-level commas.
///
/// `EMPTY` yields no parts. Unbalanced or missing parentheses are parse errors.
fn split_top_level(s: &str) -> SpatialResult<Vec<&str>> {
    let s = s.trim();
    if is_empty_marker(s) {
        return Ok(Vec::new());
    }
    let inner = s
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| SpatialError::Parse(format!("Expected parenthesised list: {}", s)))?;

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, ch) in inner.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    SpatialError::Parse(format!("Unbalanced parentheses: {}", s))
                })?;
            }
            ',' if depth == 0 => {
                parts.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(SpatialError::Parse(format!("Unbalanced parentheses: {}", s)));
    }
    let last = inner[start..].trim();
    if !last.is_empty() || !parts.is_empty() {
        parts.push(last);
    }
    if parts.iter().any(|part| part.is_empty()) {
        return Err(SpatialError::Parse(format!("Empty list element: {}", s)));
    }
    Ok(parts)
}
