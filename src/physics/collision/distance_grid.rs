//! A grid of precomputed signed distances for fast point queries against a shape.

use super::{IntersectionInfo, ShapeError, AABB};
use crate::math::{self as m, Unit};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Upper limit on the number of nodes in one grid.
pub const MAX_NODE_COUNT: usize = 1 << 24;

/// Signed distances to a shape's surface, sampled at regular intervals
/// over the shape's local bounding box.
///
/// Queries interpolate bilinearly between the four nodes around the query point,
/// so the surface is only as accurate as the spacing allows.
/// Points outside the bounding box never intersect.
#[derive(Clone, Debug)]
pub struct DistanceGrid {
    bounds: AABB,
    spacing: f64,
    spacing_inv: f64,
    column_count: usize,
    row_count: usize,
    // column-major, index = column * row_count + row
    nodes: Vec<f64>,
}

impl DistanceGrid {
    /// Sample the signed distance function `sample` on a grid starting at `bounds.min`.
    ///
    /// The grid extends one node past the top right of `bounds`
    /// so that every point inside the bounds has four surrounding nodes.
    pub fn new(
        bounds: AABB,
        spacing: f64,
        sample: impl Fn(m::Vec2) -> f64 + Sync,
    ) -> Result<Self, ShapeError> {
        if !(spacing > 0.0 && spacing.is_finite()) {
            return Err(ShapeError::invalid_range(
                "grid_spacing",
                "must be positive and finite",
            ));
        }
        if !(m::is_finite(bounds.min) && m::is_finite(bounds.max)) {
            return Err(ShapeError::invalid_argument(
                "bounds",
                "must have finite coordinates",
            ));
        }

        let _span = crate::tracy_span!("build distance grid", "DistanceGrid::new");

        let spacing_inv = 1.0 / spacing;
        let column_count_f = (bounds.width() * spacing_inv).ceil() + 2.0;
        let row_count_f = (bounds.height() * spacing_inv).ceil() + 2.0;
        // NaN and infinity also fail this
        if !(column_count_f * row_count_f <= MAX_NODE_COUNT as f64) {
            log::warn!(
                "distance grid of {}x{} nodes exceeds the limit of {}",
                column_count_f,
                row_count_f,
                MAX_NODE_COUNT
            );
            return Err(ShapeError::invalid_range(
                "grid_spacing",
                "too small for the shape's size",
            ));
        }
        let column_count = column_count_f as usize;
        let row_count = row_count_f as usize;
        let node_pos = |idx: usize| {
            let (col, row) = (idx / row_count, idx % row_count);
            bounds.min + spacing * m::Vec2::new(col as f64, row as f64)
        };

        #[cfg(feature = "parallel")]
        let nodes: Vec<f64> = (0..column_count * row_count)
            .into_par_iter()
            .map(|idx| sample(node_pos(idx)))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let nodes: Vec<f64> = (0..column_count * row_count)
            .map(|idx| sample(node_pos(idx)))
            .collect();

        log::debug!(
            "built distance grid of {}x{} nodes with spacing {}",
            column_count,
            row_count,
            spacing
        );

        Ok(Self {
            bounds,
            spacing,
            spacing_inv,
            column_count,
            row_count,
            nodes,
        })
    }

    #[inline]
    pub fn bounds(&self) -> AABB {
        self.bounds
    }

    #[inline]
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Number of nodes along the x and y axes.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.column_count, self.row_count)
    }

    /// Stored distance at the node in the given column and row.
    #[inline]
    pub fn node(&self, column: usize, row: usize) -> Option<f64> {
        if column < self.column_count && row < self.row_count {
            Some(self.nodes[column * self.row_count + row])
        } else {
            None
        }
    }

    /// Check whether a point in the shape's local space touches or is inside the shape.
    pub fn intersection(&self, point: m::Vec2) -> Option<IntersectionInfo> {
        let cell = self.cell(point)?;
        let distance = cell.distance();
        if distance > 0.0 {
            return None;
        }
        Some(self.hit(point, &cell, distance))
    }

    /// Like [`intersection`][Self::intersection], but when the interpolated distance
    /// says the point is outside a cell that touches the surface,
    /// ask `exact` for the true signed distance instead.
    ///
    /// Points within `tolerance` of the surface count as hits.
    pub fn intersection_refined(
        &self,
        point: m::Vec2,
        tolerance: f64,
        exact: impl FnOnce(m::Vec2) -> f64,
    ) -> Option<IntersectionInfo> {
        let cell = self.cell(point)?;
        let mut distance = cell.distance();
        if distance > 0.0 {
            let exact_dist = exact(point);
            if !(exact_dist <= tolerance) {
                return None;
            }
            log::trace!(
                "grid missed surface point {:?}, exact distance {}",
                point,
                exact_dist
            );
            distance = exact_dist.min(0.0);
        }
        Some(self.hit(point, &cell, distance))
    }

    /// The cell around a point, if the point is in bounds
    /// and at least one corner of the cell is on or inside the surface.
    fn cell(&self, point: m::Vec2) -> Option<Cell> {
        if !self.bounds.contains_point(point) {
            return None;
        }

        let rel = (point - self.bounds.min) * self.spacing_inv;
        let col = (rel.x.floor() as usize).min(self.column_count - 2);
        let row = (rel.y.floor() as usize).min(self.row_count - 2);

        let cell = Cell {
            bottom_left: self.nodes[col * self.row_count + row],
            top_left: self.nodes[col * self.row_count + row + 1],
            bottom_right: self.nodes[(col + 1) * self.row_count + row],
            top_right: self.nodes[(col + 1) * self.row_count + row + 1],
            x_t: rel.x - col as f64,
            y_t: rel.y - row as f64,
        };

        // no corner is inside, so nothing in between can be either
        if cell.bottom_left > 0.0
            && cell.top_left > 0.0
            && cell.bottom_right > 0.0
            && cell.top_right > 0.0
        {
            return None;
        }
        Some(cell)
    }

    fn hit(&self, point: m::Vec2, cell: &Cell, distance: f64) -> IntersectionInfo {
        // a flat cell has no gradient, and at the exact center of a flat grid
        // there is no better guess than an arbitrary direction
        let normal = Unit::try_new_normalize(cell.gradient())
            .or_else(|| Unit::try_new_normalize(point - self.bounds.center()))
            .unwrap_or_else(Unit::unit_x);
        IntersectionInfo {
            position: point,
            normal,
            distance,
        }
    }
}

/// Distances at the corners of one grid cell
/// and the position of a query point inside it, from 0 to 1 on both axes.
struct Cell {
    bottom_left: f64,
    top_left: f64,
    bottom_right: f64,
    top_right: f64,
    x_t: f64,
    y_t: f64,
}

impl Cell {
    fn distance(&self) -> f64 {
        let bottom = lerp(self.bottom_left, self.bottom_right, self.x_t);
        let top = lerp(self.top_left, self.top_right, self.x_t);
        lerp(bottom, top, self.y_t)
    }

    fn gradient(&self) -> m::Vec2 {
        m::Vec2::new(
            lerp(
                self.bottom_right - self.bottom_left,
                self.top_right - self.top_left,
                self.y_t,
            ),
            lerp(
                self.top_left - self.bottom_left,
                self.top_right - self.bottom_right,
                self.x_t,
            ),
        )
    }
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle_grid(spacing: f64) -> DistanceGrid {
        let bounds = AABB {
            min: m::Vec2::new(-1.0, -1.0),
            max: m::Vec2::new(1.0, 1.0),
        };
        DistanceGrid::new(bounds, spacing, |p| p.mag() - 1.0).unwrap()
    }

    #[test]
    fn rejects_bad_spacing() {
        let bounds = AABB::zero();
        for spacing in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                DistanceGrid::new(bounds, spacing, |_| 0.0),
                Err(ShapeError::InvalidRange {
                    param: "grid_spacing",
                    ..
                })
            ));
        }
    }

    #[test]
    fn rejects_spacing_too_small_for_bounds() {
        let bounds = AABB {
            min: m::Vec2::new(-3.0, -1.0),
            max: m::Vec2::new(3.0, 1.0),
        };
        for spacing in [1e-300, 1e-5, f64::MIN_POSITIVE] {
            assert!(matches!(
                DistanceGrid::new(bounds, spacing, |_| 0.0),
                Err(ShapeError::InvalidRange {
                    param: "grid_spacing",
                    ..
                })
            ));
        }
        // subnormal spacing has an infinite inverse
        assert!(DistanceGrid::new(AABB::zero(), 1e-320, |_| 0.0).is_err());
        assert!(DistanceGrid::new(bounds, 0.01, |_| 0.0).is_ok());
    }

    #[test]
    fn node_layout() {
        let grid = circle_grid(0.5);
        // 2 / 0.5 = 4 cells, + 2 nodes
        assert_eq!(grid.dimensions(), (6, 6));
        assert_eq!(grid.node(0, 0), Some(2.0f64.sqrt() - 1.0));
        assert_eq!(grid.node(2, 2), Some(-1.0));
        assert_eq!(grid.node(4, 2), Some(0.0));
        assert_eq!(grid.node(6, 0), None);
    }

    #[test]
    fn point_queries() {
        let grid = circle_grid(0.1);

        let center = grid.intersection(m::Vec2::zero()).unwrap();
        assert!((center.distance + 1.0).abs() < 1e-9);

        let near_edge = grid.intersection(m::Vec2::new(0.0, 0.95)).unwrap();
        assert!(near_edge.distance < 0.0);
        assert!((near_edge.normal.y - 1.0).abs() < 0.01);
        assert_eq!(near_edge.position, m::Vec2::new(0.0, 0.95));

        // inside bounds but outside the circle
        assert!(grid.intersection(m::Vec2::new(0.9, 0.9)).is_none());
        // outside bounds entirely
        assert!(grid.intersection(m::Vec2::new(5.0, 0.0)).is_none());
        assert!(grid
            .intersection(m::Vec2::new(f64::NAN, 0.0))
            .is_none());
    }

    #[test]
    fn max_corner_is_queryable() {
        let bounds = AABB {
            min: m::Vec2::new(0.0, 0.0),
            max: m::Vec2::new(1.0, 1.0),
        };
        // everything is inside
        let grid = DistanceGrid::new(bounds, 0.3, |_| -1.0).unwrap();
        assert!(grid.intersection(bounds.max).is_some());
        assert!(grid.intersection(bounds.min).is_some());
    }

    #[test]
    fn flat_grid_normals() {
        let bounds = AABB {
            min: m::Vec2::new(0.0, 0.0),
            max: m::Vec2::new(2.0, 2.0),
        };
        let grid = DistanceGrid::new(bounds, 0.5, |_| -1.0).unwrap();
        // no gradient, so the normal points away from the center
        let off_center = grid.intersection(m::Vec2::new(1.0, 1.5)).unwrap();
        assert!((*off_center.normal - m::Vec2::unit_y()).mag() < 1e-12);
        // nothing to go on at all
        let center = grid.intersection(bounds.center()).unwrap();
        assert_eq!(center.normal, Unit::unit_x());
    }

    #[test]
    fn refined_query_falls_back_to_exact_distance() {
        let bounds = AABB {
            min: m::Vec2::new(0.0, 0.0),
            max: m::Vec2::new(2.0, 2.0),
        };
        // half-plane x <= 1.2, which falls between nodes at spacing 0.5
        let sdf = |p: m::Vec2| p.x - 1.2;
        let grid = DistanceGrid::new(bounds, 0.5, sdf).unwrap();
        assert!(grid.intersection(m::Vec2::new(1.1, 0.3)).is_some());

        let beyond = m::Vec2::new(1.3, 0.3);
        assert!(grid.intersection(beyond).is_none());
        assert!(grid.intersection_refined(beyond, 0.0, sdf).is_none());
        let info = grid.intersection_refined(beyond, 0.0, |_| -0.05).unwrap();
        assert_eq!(info.distance, -0.05);
        assert!(grid.intersection_refined(beyond, 1e-9, |_| 1e-12).is_some());
        // cells entirely outside never call the exact function
        let far = m::Vec2::new(1.9, 1.9);
        assert!(grid
            .intersection_refined(far, 0.0, |_| panic!("exact distance was needed"))
            .is_none());
    }
}
