//! A collision shape made out of several separate polygons.

use super::{
    polygon::{self, Winding},
    DistanceGrid, IntersectionInfo, Shape, ShapeCapabilities, ShapeError, ShapeState,
    AABB,
};
use crate::math::{self as m, Vec2};

use std::{any::Any, sync::Arc};

//
// aggregate geometry
//

fn check_not_empty<P>(polygons: &[P]) -> Result<(), ShapeError> {
    if polygons.is_empty() {
        Err(ShapeError::invalid_range(
            "polygons",
            "there must be at least one polygon",
        ))
    } else {
        Ok(())
    }
}

fn check_area_defined(vertices: &[Vec2]) -> Result<(), ShapeError> {
    if vertices.len() < 3 {
        Err(ShapeError::invalid_range(
            "polygons",
            "there must be at least 3 vertices in every polygon",
        ))
    } else {
        Ok(())
    }
}

/// Concatenate the vertices of all polygons into one list.
///
/// Fails if there are no polygons or any vertex is not finite.
pub fn concat_vertices<P: AsRef<[Vec2]>>(polygons: &[P]) -> Result<Vec<Vec2>, ShapeError> {
    check_not_empty(polygons)?;
    let total_len = polygons.iter().map(|p| p.as_ref().len()).sum();
    let mut vertices = Vec::with_capacity(total_len);
    for poly in polygons {
        let poly = poly.as_ref();
        if !poly.iter().all(|v| m::is_finite(*v)) {
            return Err(ShapeError::invalid_argument(
                "polygons",
                "vertex coordinates must be finite",
            ));
        }
        vertices.extend_from_slice(poly);
    }
    Ok(vertices)
}

/// Total area of a set of polygons.
///
/// Areas of the parts are simply added together.
/// Overlapping parts are not merged, so the overlap gets counted twice.
pub fn area<P: AsRef<[Vec2]>>(polygons: &[P]) -> Result<f64, ShapeError> {
    check_not_empty(polygons)?;
    let mut total = 0.0;
    for poly in polygons {
        let poly = poly.as_ref();
        check_area_defined(poly)?;
        total += polygon::area(poly);
    }
    Ok(total)
}

/// Center of mass of a set of polygons with uniform density.
///
/// Each part's contribution is weighted by its area regardless of
/// which way its vertices wind, so clockwise and counterclockwise parts can be mixed.
pub fn centroid<P: AsRef<[Vec2]>>(polygons: &[P]) -> Result<Vec2, ShapeError> {
    check_not_empty(polygons)?;
    let mut weighted_sum = Vec2::zero();
    let mut area_total = 0.0;
    for poly in polygons {
        let poly = poly.as_ref();
        check_area_defined(poly)?;
        let mut part_sum = Vec2::zero();
        let mut part_area = 0.0;
        for (v1, v2) in polygon::edges(poly) {
            let weight = m::cross(v1, v2);
            part_area += weight;
            part_sum += (v1 + v2) * weight;
        }
        // flip clockwise parts so they add mass instead of removing it
        if polygon::winding(poly) == Winding::Clockwise {
            part_sum = -part_sum;
        }
        weighted_sum += part_sum;
        area_total += part_area.abs();
    }
    if !(area_total > 0.0) {
        return Err(ShapeError::invalid_range(
            "polygons",
            "centroid is undefined for polygons with zero total area",
        ));
    }
    Ok(weighted_sum / (3.0 * area_total))
}

/// Ratio between the moment of inertia and the mass of a set of polygons,
/// measured around the local origin.
///
/// Single-vertex parts have no area and are skipped.
/// If nothing has any area, the ratio is defined to be 1.
pub fn inertia_multiplier<P: AsRef<[Vec2]>>(polygons: &[P]) -> Result<f64, ShapeError> {
    check_not_empty(polygons)?;
    let mut numer = 0.0;
    let mut denom = 0.0;
    for (poly_idx, poly) in polygons.iter().enumerate() {
        let poly = poly.as_ref();
        match poly.len() {
            0 => {
                return Err(ShapeError::invalid_range(
                    "polygons",
                    "polygons must not be empty",
                ))
            }
            1 => {
                log::trace!("skipping single-vertex polygon {} in inertia", poly_idx);
                continue;
            }
            _ => (),
        }
        for (v1, v2) in polygon::edges(poly) {
            let a = v2.dot(v2);
            let b = v2.dot(v1);
            let c = v1.dot(v1);
            let d = m::cross(v1, v2).abs();
            numer += d;
            denom += (a + b + c) * d;
        }
    }
    if numer == 0.0 {
        log::warn!("polygons have no area, using inertia multiplier 1");
        return Ok(1.0);
    }
    Ok(denom / (6.0 * numer))
}

/// Move a set of polygons so that their centroid is at the origin.
///
/// Rigid bodies rotate around their local origin,
/// so this should usually be done before creating a shape.
pub fn center_on_centroid<P: AsRef<[Vec2]>>(
    polygons: &[P],
) -> Result<Vec<Vec<Vec2>>, ShapeError> {
    let center = centroid(polygons)?;
    Ok(polygons
        .iter()
        .map(|poly| poly.as_ref().iter().map(|v| *v - center).collect())
        .collect())
}

//
// the shape itself
//

/// Local-space distance from the surface within which a point still counts as touching it.
const SURFACE_TOLERANCE: f64 = 1e-9;

/// Parameters for the creation of a [`MultiPartPolygon`][self::MultiPartPolygon].
#[derive(Clone, Copy, Debug)]
#[cfg_attr(
    feature = "serde-types",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct MultiPartPolygonParams {
    /// Distance between the sample points of the shape's distance grid.
    /// Smaller spacing gives more accurate intersection tests but uses more memory
    /// and takes longer to build.
    ///
    /// A good value is a fraction of the smallest feature of the shape.
    pub grid_spacing: f64,
    /// Moment of inertia multiplier to use instead of computing it from the geometry.
    pub inertia_multiplier: Option<f64>,
}

impl Default for MultiPartPolygonParams {
    fn default() -> Self {
        Self {
            grid_spacing: 0.1,
            inertia_multiplier: None,
        }
    }
}

/// Everything about the shape that never changes after construction.
/// Shared between a shape and all its duplicates.
#[derive(Debug)]
struct Geometry {
    polygons: Vec<Vec<Vec2>>,
    vertices: Vec<Vec2>,
    local_aabb: AABB,
    area: f64,
    centroid: Vec2,
    inertia_multiplier: f64,
    grid: DistanceGrid,
}

/// A shape consisting of multiple polygons that move together as one rigid body.
///
/// Intersection tests go through a [`DistanceGrid`][super::DistanceGrid]
/// computed when the shape is created.
/// Duplicates share the polygons and the grid with the original.
#[derive(Debug)]
pub struct MultiPartPolygon {
    state: ShapeState,
    geometry: Arc<Geometry>,
}

impl MultiPartPolygon {
    /// Create a shape, computing its moment of inertia from the polygons.
    ///
    /// Every polygon needs at least 3 vertices.
    /// Parts should not overlap, since their areas are added together.
    pub fn new(polygons: Vec<Vec<Vec2>>, grid_spacing: f64) -> Result<Self, ShapeError> {
        Self::from_params(
            polygons,
            &MultiPartPolygonParams {
                grid_spacing,
                inertia_multiplier: None,
            },
        )
    }

    /// Create a shape with a manually set moment of inertia multiplier.
    pub fn with_inertia_multiplier(
        polygons: Vec<Vec<Vec2>>,
        grid_spacing: f64,
        inertia_multiplier: f64,
    ) -> Result<Self, ShapeError> {
        Self::from_params(
            polygons,
            &MultiPartPolygonParams {
                grid_spacing,
                inertia_multiplier: Some(inertia_multiplier),
            },
        )
    }

    pub fn from_params(
        polygons: Vec<Vec<Vec2>>,
        params: &MultiPartPolygonParams,
    ) -> Result<Self, ShapeError> {
        let _span = crate::tracy_span!("create multi-part polygon", "MultiPartPolygon::new");

        let vertices = concat_vertices(&polygons)?;
        if !(params.grid_spacing > 0.0 && params.grid_spacing.is_finite()) {
            return Err(ShapeError::invalid_range(
                "grid_spacing",
                "must be positive and finite",
            ));
        }
        let area = area(&polygons)?;
        let centroid = centroid(&polygons)?;
        let inertia_multiplier = match params.inertia_multiplier {
            Some(mult) if mult > 0.0 && mult.is_finite() => mult,
            Some(_) => {
                return Err(ShapeError::invalid_range(
                    "inertia_multiplier",
                    "must be positive and finite",
                ))
            }
            None => inertia_multiplier(&polygons)?,
        };

        // at least 3 vertices per polygon were checked above
        let local_aabb = AABB::from_points(vertices.iter().copied()).unwrap_or_default();
        let grid = DistanceGrid::new(local_aabb, params.grid_spacing, |p| {
            polygons_distance(&polygons, p)
        })?;

        log::debug!(
            "created multi-part polygon with {} parts, {} vertices, area {}",
            polygons.len(),
            vertices.len(),
            area
        );

        let geometry = Arc::new(Geometry {
            polygons,
            vertices,
            local_aabb,
            area,
            centroid,
            inertia_multiplier,
            grid,
        });
        Ok(Self {
            state: ShapeState {
                aabb: local_aabb,
                ..Default::default()
            },
            geometry,
        })
    }

    /// The polygons this shape consists of, in local space.
    #[inline]
    pub fn polygons(&self) -> &[Vec<Vec2>] {
        &self.geometry.polygons
    }

    /// All vertices of all polygons in one list.
    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.geometry.vertices
    }

    #[inline]
    pub fn centroid(&self) -> Vec2 {
        self.geometry.centroid
    }

    #[inline]
    pub fn grid(&self) -> &DistanceGrid {
        &self.geometry.grid
    }

    /// Bounding box of the untransformed shape.
    #[inline]
    pub fn local_aabb(&self) -> AABB {
        self.geometry.local_aabb
    }

    /// Check whether this shape and another one were duplicated from the same original.
    #[inline]
    pub fn shares_geometry_with(&self, other: &MultiPartPolygon) -> bool {
        Arc::ptr_eq(&self.geometry, &other.geometry)
    }
}

fn polygons_distance(polygons: &[Vec<Vec2>], point: Vec2) -> f64 {
    polygons
        .iter()
        .map(|poly| polygon::distance(poly, point))
        .fold(f64::INFINITY, f64::min)
}

impl Shape for MultiPartPolygon {
    #[inline]
    fn state(&self) -> &ShapeState {
        &self.state
    }

    #[inline]
    fn state_mut(&mut self) -> &mut ShapeState {
        &mut self.state
    }

    #[inline]
    fn area(&self) -> f64 {
        self.geometry.area
    }

    #[inline]
    fn inertia_multiplier(&self) -> f64 {
        self.geometry.inertia_multiplier
    }

    fn capabilities(&self) -> ShapeCapabilities {
        ShapeCapabilities {
            intersection: true,
            distance: true,
            custom_intersection: false,
            broad_phase_only: false,
        }
    }

    fn calc_bounding_rect(&self) -> AABB {
        let matrix = &self.state.matrix;
        AABB::from_points(self.geometry.vertices.iter().map(|v| matrix.transform_point(*v)))
            .unwrap_or_default()
    }

    fn intersection(&self, point: Vec2) -> Option<IntersectionInfo> {
        let local = self.state.to_local(point);
        // bilinear interpolation cuts corners off slanted edges,
        // so near the surface the grid's miss is confirmed against the polygons
        let info = self.geometry.grid.intersection_refined(local, SURFACE_TOLERANCE, |p| {
            polygons_distance(&self.geometry.polygons, p)
        })?;
        Some(IntersectionInfo {
            position: point,
            normal: self.state.matrix.transform_normal(info.normal),
            distance: info.distance,
        })
    }

    /// Brute force minimum over the distances to every polygon.
    fn distance(&self, point: Vec2) -> f64 {
        polygons_distance(&self.geometry.polygons, point)
    }

    fn custom_intersection(&self, _other: &dyn Shape) -> Result<Box<dyn Any>, ShapeError> {
        Err(ShapeError::Unsupported {
            operation: "custom_intersection",
            shape: "MultiPartPolygon",
        })
    }

    fn duplicate(&self) -> Box<dyn Shape> {
        Box::new(MultiPartPolygon {
            state: self.state,
            geometry: Arc::clone(&self.geometry),
        })
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}
