//! The interface shared by all collision shapes, and the transform state they carry.

use super::{IntersectionInfo, ShapeError, AABB};
use crate::math::{self as m, Pose, Unit};

use std::any::Any;

/// A transform for both the vertices and the normals of a shape.
///
/// Normals don't transform like positions under scaling and shearing,
/// so they get their own matrix: the inverse transpose of the linear part.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeMatrix {
    pub vertex: m::Mat3,
    pub normal: m::Mat2,
}

impl Default for ShapeMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl ShapeMatrix {
    pub fn identity() -> Self {
        Self {
            vertex: m::Mat3::identity(),
            normal: m::Mat2::identity(),
        }
    }

    /// Get the matrix for a pose and its inverse.
    ///
    /// Poses are rotations plus translations, so their normal matrix
    /// is the rotation itself.
    pub fn from_pose(pose: &Pose) -> (Self, Self) {
        let rigid = |p: Pose| {
            let vertex = p.into_homogeneous_matrix();
            Self {
                vertex,
                normal: m::linear_part(&vertex),
            }
        };
        (rigid(*pose), rigid(pose.inversed()))
    }

    /// Create a matrix and its inverse from a general affine transform.
    pub fn from_affine(vertex: m::Mat3) -> Result<(Self, Self), ShapeError> {
        let finite = vertex
            .cols
            .iter()
            .all(|c| c.x.is_finite() && c.y.is_finite() && c.z.is_finite());
        let linear = m::linear_part(&vertex);
        let det = linear.determinant();
        if !finite || det == 0.0 || !det.is_finite() {
            return Err(ShapeError::invalid_argument(
                "matrix",
                "must be finite and invertible",
            ));
        }
        let inverse = vertex.inversed();
        let matrix = Self {
            vertex,
            normal: linear.inversed().transposed(),
        };
        let matrix_inv = Self {
            vertex: inverse,
            normal: linear.transposed(),
        };
        Ok((matrix, matrix_inv))
    }

    #[inline]
    pub fn transform_point(&self, p: m::Vec2) -> m::Vec2 {
        self.vertex.transform_point2(p)
    }

    /// Transform a normal vector and renormalize it.
    #[inline]
    pub fn transform_normal(&self, n: Unit<m::Vec2>) -> Unit<m::Vec2> {
        Unit::try_new_normalize(self.normal * *n).unwrap_or(n)
    }
}

/// The transform and bounding box every shape carries.
///
/// This belongs to one specific shape instance
/// and is never shared between duplicates.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShapeState {
    pub(crate) matrix: ShapeMatrix,
    pub(crate) matrix_inv: ShapeMatrix,
    pub(crate) aabb: AABB,
}

impl ShapeState {
    #[inline]
    pub fn matrix(&self) -> &ShapeMatrix {
        &self.matrix
    }

    /// Transform a point from world space to the shape's local space.
    #[inline]
    pub fn to_local(&self, world_point: m::Vec2) -> m::Vec2 {
        self.matrix_inv.transform_point(world_point)
    }
}

/// Which kinds of queries a shape can answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeCapabilities {
    pub intersection: bool,
    pub distance: bool,
    pub custom_intersection: bool,
    /// Shape is only used to find pairs in the broad phase
    /// and never generates contacts.
    pub broad_phase_only: bool,
}

/// A collision shape attached to a rigid body.
pub trait Shape: std::fmt::Debug + Send + Sync {
    fn state(&self) -> &ShapeState;
    fn state_mut(&mut self) -> &mut ShapeState;

    /// Area used to derive mass from density.
    fn area(&self) -> f64;
    /// Multiply a body's mass by this to get its moment of inertia.
    fn inertia_multiplier(&self) -> f64;
    fn capabilities(&self) -> ShapeCapabilities;

    /// Compute the world-space bounding box for the current transform.
    fn calc_bounding_rect(&self) -> AABB;

    /// Check whether a world-space point touches the shape.
    fn intersection(&self, point: m::Vec2) -> Option<IntersectionInfo>;

    /// Signed distance from a point in the shape's local space to its surface.
    fn distance(&self, point: m::Vec2) -> f64;

    /// Shape-specific intersection test against another shape,
    /// for shapes that don't work with point queries.
    fn custom_intersection(&self, other: &dyn Shape) -> Result<Box<dyn Any>, ShapeError>;

    /// Create a new shape instance that can be attached to another body.
    fn duplicate(&self) -> Box<dyn Shape>;

    /// Access the concrete shape type behind a `dyn Shape`.
    fn as_any(&self) -> &dyn Any;

    //
    // provided
    //

    fn set_pose(&mut self, pose: &Pose) {
        let (matrix, matrix_inv) = ShapeMatrix::from_pose(pose);
        self.set_matrices(matrix, matrix_inv);
    }

    fn set_matrix(&mut self, vertex: m::Mat3) -> Result<(), ShapeError> {
        let (matrix, matrix_inv) = ShapeMatrix::from_affine(vertex)?;
        self.set_matrices(matrix, matrix_inv);
        Ok(())
    }

    /// Replace the transform and recompute the bounding box.
    fn set_matrices(&mut self, matrix: ShapeMatrix, matrix_inv: ShapeMatrix) {
        let state = self.state_mut();
        state.matrix = matrix;
        state.matrix_inv = matrix_inv;
        let aabb = self.calc_bounding_rect();
        self.state_mut().aabb = aabb;
    }

    #[inline]
    fn aabb(&self) -> AABB {
        self.state().aabb
    }

    #[inline]
    fn matrix(&self) -> &ShapeMatrix {
        &self.state().matrix
    }
}
