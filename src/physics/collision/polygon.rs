//! Helpers for a single closed polygon given as a slice of vertices.
//! The last vertex is implicitly connected to the first.

use crate::math::{self as m, Vec2};

use itertools::Itertools;

/// The direction a polygon's vertices go around its interior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winding {
    CounterClockwise,
    Clockwise,
    /// Zero signed area, e.g. all vertices on one line.
    Degenerate,
}

/// Iterate over the edges of a polygon as `(start, end)` pairs,
/// including the edge from the last vertex back to the first.
#[inline]
pub fn edges(vertices: &[Vec2]) -> impl '_ + Iterator<Item = (Vec2, Vec2)> {
    vertices.iter().copied().circular_tuple_windows::<(Vec2, Vec2)>()
}

/// Area of the polygon, positive if its vertices are in counterclockwise order.
pub fn signed_area(vertices: &[Vec2]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }
    edges(vertices).map(|(v1, v2)| m::cross(v1, v2)).sum::<f64>() / 2.0
}

#[inline]
pub fn area(vertices: &[Vec2]) -> f64 {
    signed_area(vertices).abs()
}

pub fn winding(vertices: &[Vec2]) -> Winding {
    let a = signed_area(vertices);
    if a > 0.0 {
        Winding::CounterClockwise
    } else if a < 0.0 {
        Winding::Clockwise
    } else {
        Winding::Degenerate
    }
}

/// Even-odd test for whether a point is inside the polygon.
/// Points exactly on an edge may be reported either way.
pub fn contains_point(vertices: &[Vec2], point: Vec2) -> bool {
    let mut inside = false;
    for (v1, v2) in edges(vertices) {
        if (v1.y > point.y) != (v2.y > point.y) {
            let t = (point.y - v1.y) / (v2.y - v1.y);
            if point.x < v1.x + t * (v2.x - v1.x) {
                inside = !inside;
            }
        }
    }
    inside
}

/// Squared distance from a point to the line segment between `start` and `end`.
pub fn segment_distance_sq(start: Vec2, end: Vec2, point: Vec2) -> f64 {
    let edge = end - start;
    let len_sq = edge.mag_sq();
    let t = if len_sq > 0.0 {
        ((point - start).dot(edge) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (start + t * edge - point).mag_sq()
}

/// Distance from a point to the boundary of the polygon,
/// negative if the point is inside.
pub fn distance(vertices: &[Vec2], point: Vec2) -> f64 {
    let dist_sq = if vertices.len() == 1 {
        (vertices[0] - point).mag_sq()
    } else {
        edges(vertices)
            .map(|(v1, v2)| segment_distance_sq(v1, v2, point))
            .fold(f64::INFINITY, f64::min)
    };
    let dist = dist_sq.sqrt();
    if vertices.len() >= 3 && contains_point(vertices, point) {
        -dist
    } else {
        dist
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Axis-aligned rectangle in counterclockwise order.
    pub(crate) fn rect(min: [f64; 2], max: [f64; 2]) -> Vec<Vec2> {
        vec![
            Vec2::new(min[0], min[1]),
            Vec2::new(max[0], min[1]),
            Vec2::new(max[0], max[1]),
            Vec2::new(min[0], max[1]),
        ]
    }

    #[test]
    fn edges_wrap_around() {
        let tri = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        itertools::assert_equal(
            edges(&tri),
            [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])],
        );
    }

    #[test]
    fn area_and_winding() {
        let mut square = rect([-1.0, -1.0], [1.0, 1.0]);
        assert_eq!(signed_area(&square), 4.0);
        assert_eq!(winding(&square), Winding::CounterClockwise);
        square.reverse();
        assert_eq!(signed_area(&square), -4.0);
        assert_eq!(area(&square), 4.0);
        assert_eq!(winding(&square), Winding::Clockwise);

        let line = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)];
        assert_eq!(winding(&line), Winding::Degenerate);
    }

    #[test]
    fn containment() {
        // L shape to have a concave corner
        let l = [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        assert!(contains_point(&l, Vec2::new(0.5, 0.5)));
        assert!(contains_point(&l, Vec2::new(0.5, 1.5)));
        assert!(!contains_point(&l, Vec2::new(1.5, 1.5)));
        assert!(!contains_point(&l, Vec2::new(-0.5, 0.5)));
    }

    #[test]
    fn signed_distance() {
        let square = rect([-1.0, -1.0], [1.0, 1.0]);
        assert_eq!(distance(&square, Vec2::new(0.0, 0.0)), -1.0);
        assert_eq!(distance(&square, Vec2::new(0.5, 0.0)), -0.5);
        assert_eq!(distance(&square, Vec2::new(3.0, 0.0)), 2.0);
        assert_eq!(distance(&square, Vec2::new(1.0, 0.25)), 0.0);
        // closest feature is a corner
        let d = distance(&square, Vec2::new(4.0, 5.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_segments() {
        let p = Vec2::new(1.0, 1.0);
        assert_eq!(segment_distance_sq(p, p, Vec2::new(4.0, 5.0)), 25.0);
        assert_eq!(distance(&[p], Vec2::new(4.0, 5.0)), 5.0);
    }
}
