//! Collision shapes and the queries they answer.

use crate::math::{self as m, Unit};

mod error;
pub use error::ShapeError;

pub mod polygon;

pub mod distance_grid;
pub use distance_grid::DistanceGrid;

pub mod shape;
pub use shape::{Shape, ShapeCapabilities, ShapeMatrix, ShapeState};

pub mod multi_part;
pub use multi_part::{MultiPartPolygon, MultiPartPolygonParams};

#[cfg(feature = "serde-types")]
pub mod recipe;
#[cfg(feature = "serde-types")]
pub use recipe::MultiPartPolygonRecipe;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AABB {
    pub min: m::Vec2,
    pub max: m::Vec2,
}

impl AABB {
    pub fn zero() -> Self {
        Self {
            min: m::Vec2::zero(),
            max: m::Vec2::zero(),
        }
    }

    /// Smallest AABB containing all the given points,
    /// or None if there are no points.
    pub fn from_points(points: impl IntoIterator<Item = m::Vec2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(
            AABB {
                min: first,
                max: first,
            },
            |acc, p| AABB {
                min: acc.min.min_by_component(p),
                max: acc.max.max_by_component(p),
            },
        ))
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> m::Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Check whether a point is inside or on the boundary of the AABB.
    #[inline]
    pub fn contains_point(&self, p: m::Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

impl Default for AABB {
    fn default() -> Self {
        AABB::zero()
    }
}

/// Result of a successful point intersection query.
#[derive(Clone, Copy, Debug)]
pub struct IntersectionInfo {
    /// The queried point. Shapes report the query point itself
    /// rather than the closest point on their boundary.
    pub position: m::Vec2,
    /// Surface normal at or near the point.
    pub normal: Unit<m::Vec2>,
    /// Signed distance to the surface at the point, negative inside,
    /// measured in the shape's local space.
    pub distance: f64,
}
