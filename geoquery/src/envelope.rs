//! Turning feature geometry into index entries.
//!
//! A polygon's envelope is the tight box of its exterior ring; holes never
//! reach outside the exterior and are ignored. A multipolygon's envelope is
//! the union of its parts' envelopes. Any other geometry kind is reported as
//! [`Envelope::Unsupported`] so the caller can skip it.

use crate::bounding_box::BoundingBox;
use crate::errors::{SpatialError, SpatialResult};
use crate::feature_source::Feature;
use crate::geometry::{Coordinate, Geometry, GeometryKind, Polygon};
use crate::rtree::{Entry, FeatureId};
use std::thread;

/// Outcome of computing the envelope of one geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Envelope {
    /// The geometry is indexable and this is its tight box
    Indexed(BoundingBox),
    /// The geometry kind is not indexed
    Unsupported(GeometryKind),
}

/// Tight box of a ring of coordinates.
pub fn ring_envelope(ring: &[Coordinate]) -> SpatialResult<BoundingBox> {
    let (first, rest) = ring
        .split_first()
        .ok_or_else(|| SpatialError::Geometry("empty ring".to_string()))?;

    if let Some(bad) = ring.iter().find(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(SpatialError::Geometry(format!(
            "ring has a non-finite coordinate {}",
            bad
        )));
    }

    let mut bbox = BoundingBox::point(first.x, first.y);
    for coord in rest {
        bbox.expand(&BoundingBox::point(coord.x, coord.y));
    }
    Ok(bbox)
}

/// Envelope of a polygon's exterior ring.
pub fn polygon_envelope(polygon: &Polygon) -> SpatialResult<BoundingBox> {
    ring_envelope(polygon.exterior())
}

/// Union of the envelopes of every part.
pub fn multi_polygon_envelope(parts: &[Polygon]) -> SpatialResult<BoundingBox> {
    let mut envelope: Option<BoundingBox> = None;
    for (i, part) in parts.iter().enumerate() {
        let bbox = polygon_envelope(part)
            .map_err(|e| SpatialError::Geometry(format!("part {}: {}", i, e)))?;
        envelope = Some(match envelope {
            Some(current) => current.union(&bbox),
            None => bbox,
        });
    }
    envelope.ok_or_else(|| SpatialError::Geometry("multipolygon has no parts".to_string()))
}

/// Computes the envelope of any geometry.
///
/// Errors are [`SpatialError::Geometry`] and concern only this geometry.
pub fn envelope_of(geometry: &Geometry) -> SpatialResult<Envelope> {
    match geometry {
        Geometry::Polygon(polygon) => polygon_envelope(polygon).map(Envelope::Indexed),
        Geometry::MultiPolygon(parts) => multi_polygon_envelope(parts).map(Envelope::Indexed),
        other => Ok(Envelope::Unsupported(other.kind())),
    }
}

/// Result of preparing one feature for insertion.
#[derive(Debug)]
pub enum EntryOutcome {
    Entry(Entry),
    Unsupported { id: FeatureId, kind: GeometryKind },
    Degenerate { id: FeatureId, error: SpatialError },
}

fn entry_outcome(feature: &Feature) -> EntryOutcome {
    match envelope_of(&feature.geometry) {
        Ok(Envelope::Indexed(bbox)) => EntryOutcome::Entry(Entry::new(bbox, feature.id)),
        Ok(Envelope::Unsupported(kind)) => EntryOutcome::Unsupported {
            id: feature.id,
            kind,
        },
        Err(error) => EntryOutcome::Degenerate {
            id: feature.id,
            error,
        },
    }
}

/// Computes the outcome of every feature, in input order.
///
/// Batches larger than `parallel_threshold` are split into chunks processed on
/// scoped threads; results are concatenated in chunk order, so the output
/// always lines up with `features`.
pub fn build_entries(features: &[Feature], parallel_threshold: usize) -> Vec<EntryOutcome> {
    let workers = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    if features.len() <= parallel_threshold.max(1) || workers < 2 {
        return features.iter().map(entry_outcome).collect();
    }

    let chunk_size = features.len().div_ceil(workers);
    log::debug!(
        "Computing {} envelopes on {} threads",
        features.len(),
        features.len().div_ceil(chunk_size)
    );

    thread::scope(|scope| {
        let handles: Vec<_> = features
            .chunks(chunk_size)
            .map(|chunk| scope.spawn(move || chunk.iter().map(entry_outcome).collect::<Vec<_>>()))
            .collect();

        let mut outcomes = Vec::with_capacity(features.len());
        for handle in handles {
            match handle.join() {
                Ok(part) => outcomes.extend(part),
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }
        outcomes
    })
}
