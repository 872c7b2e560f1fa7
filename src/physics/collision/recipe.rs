//! Describing multi-part shapes in data files.

use super::{multi_part, MultiPartPolygon, MultiPartPolygonParams, ShapeError};
use crate::math::Vec2;

/// Deserializable description of a [`MultiPartPolygon`][super::MultiPartPolygon].
///
/// Example in RON:
/// ```ron
/// (
///     polygons: [
///         [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)],
///         [(2.0, 0.0), (3.0, 0.0), (3.0, 1.0), (2.0, 1.0)],
///     ],
///     params: (grid_spacing: 0.05),
///     center: true,
/// )
/// ```
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MultiPartPolygonRecipe {
    pub polygons: Vec<Vec<[f64; 2]>>,
    #[serde(default)]
    pub params: MultiPartPolygonParams,
    /// Move the polygons so that their centroid is at the origin before creating the shape.
    #[serde(default)]
    pub center: bool,
}

impl MultiPartPolygonRecipe {
    pub fn build(&self) -> Result<MultiPartPolygon, ShapeError> {
        let polygons: Vec<Vec<Vec2>> = self
            .polygons
            .iter()
            .map(|poly| poly.iter().map(|&[x, y]| Vec2::new(x, y)).collect())
            .collect();
        let polygons = if self.center {
            multi_part::center_on_centroid(&polygons)?
        } else {
            polygons
        };
        MultiPartPolygon::from_params(polygons, &self.params)
    }
}
