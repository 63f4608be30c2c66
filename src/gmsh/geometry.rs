use crate::StrError;
use serde::{Deserialize, Serialize};

/// Defines the sides of an axis-aligned region
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub enum Side {
    /// Minimum x
    Left,

    /// Maximum x
    Right,

    /// Maximum y
    Top,

    /// Minimum y
    Bottom,
}

impl Side {
    /// Returns all sides
    pub fn all() -> [Side; 4] {
        [Side::Top, Side::Bottom, Side::Left, Side::Right]
    }
}

/// Holds an axis-aligned rectangle in the z = 0 plane
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Rectangle {
    /// x-coordinate of the lower-left corner
    pub x: f64,

    /// y-coordinate of the lower-left corner
    pub y: f64,

    /// Extent along x
    pub width: f64,

    /// Extent along y
    pub height: f64,
}

impl Rectangle {
    /// Allocates a new instance given the lower-left corner and the extents
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self, StrError> {
        if width <= 0.0 || height <= 0.0 {
            return Err("rectangle width and height must be > 0.0");
        }
        Ok(Rectangle { x, y, width, height })
    }

    /// Returns the bounding box
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            min: [self.x, self.y],
            max: [self.x + self.width, self.y + self.height],
        }
    }
}

/// Holds an axis-aligned bounding box in the z = 0 plane
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl BoundingBox {
    /// Returns the smallest box containing all rectangles
    pub fn enclosing(rectangles: &[Rectangle]) -> Option<Self> {
        let mut iter = rectangles.iter();
        let mut bbox = iter.next()?.bounding_box();
        for rect in iter {
            let other = rect.bounding_box();
            for i in 0..2 {
                bbox.min[i] = f64::min(bbox.min[i], other.min[i]);
                bbox.max[i] = f64::max(bbox.max[i], other.max[i]);
            }
        }
        Some(bbox)
    }

    /// Returns the degenerate box (a segment) along one side
    pub fn side(&self, side: Side) -> BoundingBox {
        let (min, max) = (self.min, self.max);
        match side {
            Side::Left => BoundingBox {
                min,
                max: [min[0], max[1]],
            },
            Side::Right => BoundingBox {
                min: [max[0], min[1]],
                max,
            },
            Side::Top => BoundingBox {
                min: [min[0], max[1]],
                max,
            },
            Side::Bottom => BoundingBox {
                min,
                max: [max[0], min[1]],
            },
        }
    }

    /// Indicates whether this box contains the other box (within a tolerance)
    pub fn contains(&self, other: &BoundingBox, tolerance: f64) -> bool {
        (0..2).all(|i| other.min[i] >= self.min[i] - tolerance && other.max[i] <= self.max[i] + tolerance)
    }

    /// Returns the box enlarged by `eps` in all directions (including z)
    ///
    /// The result is the argument list of gmsh's `In BoundingBox{xmin, ymin, zmin, xmax, ymax, zmax}`.
    pub fn inflated(&self, eps: f64) -> [f64; 6] {
        [
            self.min[0] - eps,
            self.min[1] - eps,
            -eps,
            self.max[0] + eps,
            self.max[1] + eps,
            eps,
        ]
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
