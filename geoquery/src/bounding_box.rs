use crate::errors::{SpatialError, SpatialResult};

/// A 2D axis-aligned bounding box represented by minimum and maximum coordinates.
///
/// `BoundingBox` is both the key stored in the R-Tree and the predicate used to
/// query it. Boxes are closed: the edge belongs to the box, so two boxes that
/// only share an edge or a corner intersect. Zero-area boxes (a point or a
/// segment) are valid.
///
/// # Examples
///
/// ```rust
/// use geoquery::BoundingBox;
///
/// let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
/// let b = BoundingBox::new(10.0, 0.0, 20.0, 10.0);
/// assert!(a.intersects(&b));
/// assert_eq!(a.union(&b), BoundingBox::new(0.0, 0.0, 20.0, 10.0));
/// ```
#[derive(Clone, Copy, PartialEq, Default, Debug, serde::Deserialize, serde::Serialize)]
pub struct BoundingBox {
    /// Minimum X coordinate
    pub min_x: f64,
    /// Minimum Y coordinate
    pub min_y: f64,
    /// Maximum X coordinate
    pub max_x: f64,
    /// Maximum Y coordinate
    pub max_y: f64,
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoundingBox({}, {}, {}, {})", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

impl BoundingBox {
    /// Creates a new bounding box with the specified coordinates.
    ///
    /// No validation is performed; use [`BoundingBox::try_new`] for untrusted input.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> BoundingBox {
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates a bounding box, rejecting non-finite or inverted coordinates.
    pub fn try_new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> SpatialResult<BoundingBox> {
        let bbox = BoundingBox::new(min_x, min_y, max_x, max_y);
        if ![min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite()) {
            return Err(SpatialError::Parse(format!("{} has a non-finite coordinate", bbox)));
        }
        if !bbox.is_valid() {
            return Err(SpatialError::Parse(format!(
                "{} is inverted (min must not exceed max)",
                bbox
            )));
        }
        Ok(bbox)
    }

    /// Creates a zero-area bounding box at a point.
    pub fn point(x: f64, y: f64) -> BoundingBox {
        BoundingBox::new(x, y, x, y)
    }

    /// Returns the width of the bounding box.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounding box.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns the area of the bounding box.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Checks if this bounding box intersects another bounding box.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x && self.max_x >= other.min_x
            && self.min_y <= other.max_y && self.max_y >= other.min_y
    }

    /// Returns the union of this bounding box with another.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Grows this bounding box in place so that it also covers `other`.
    pub fn expand(&mut self, other: &BoundingBox) {
        *self = self.union(other);
    }

    /// Area that would be added to this box by growing it to cover `other`.
    pub fn enlargement(&self, other: &BoundingBox) -> f64 {
        self.union(other).area() - self.area()
    }

    /// Checks if this bounding box is valid (min <= max).
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    /// Tight envelope of a sequence of boxes, or `None` if the sequence is empty.
    pub fn enclosing<'a, I>(boxes: I) -> Option<BoundingBox>
    where
        I: IntoIterator<Item = &'a BoundingBox>,
    {
        let mut iter = boxes.into_iter();
        let mut envelope = *iter.next()?;
        for bbox in iter {
            envelope.expand(bbox);
        }
        Some(envelope)
    }
}
