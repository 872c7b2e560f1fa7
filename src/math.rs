//! Types, aliases and helper operations for doing math with `ultraviolet`.
use std::f64::consts::PI;
pub use ultraviolet as uv;

/// A Pose has a rotation and a translation, no scaling.
///
/// Rigid bodies are positioned with Poses.
/// Shapes can additionally be given a general affine [`Mat3`][self::Mat3].
pub type Pose = uv::DIsometry2;
pub type Vec2 = uv::DVec2;
pub type Rotor2 = uv::DRotor2;
/// Linear part of a 2D transform, used for transforming normals.
pub type Mat2 = uv::DMat2;
/// Homogeneous 2D affine transform, used for transforming vertices.
pub type Mat3 = uv::DMat3;

/// An angle in either degrees or radians.
/// Default conversion from f64 is in degrees.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
pub enum Angle {
    Rad(f64),
    Deg(f64),
}
impl Angle {
    /// Get the angle as degrees.
    #[inline]
    pub fn deg(&self) -> f64 {
        match self {
            Angle::Rad(rad) => rad * 180.0 / PI,
            Angle::Deg(deg) => *deg,
        }
    }

    /// Get the angle as radians.
    #[inline]
    pub fn rad(&self) -> f64 {
        match self {
            Angle::Rad(rad) => *rad,
            Angle::Deg(deg) => deg * PI / 180.0,
        }
    }
}
impl Default for Angle {
    fn default() -> Self {
        Angle::Rad(0.0)
    }
}
impl From<Angle> for Rotor2 {
    #[inline]
    fn from(ang: Angle) -> Rotor2 {
        Rotor2::from_angle(ang.rad())
    }
}

/// A wrapper type to indicate a vector should always be normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Unit<T>(T);

impl Unit<Vec2> {
    pub fn new_normalize(v: Vec2) -> Self {
        Unit(v.normalized())
    }

    pub fn unit_x() -> Self {
        Unit(Vec2::unit_x())
    }

    /// Normalize the vector, or return None if it has zero or non-finite length.
    pub fn try_new_normalize(v: Vec2) -> Option<Self> {
        let mag = v.mag();
        if mag > 0.0 && mag.is_finite() {
            Some(Unit(v / mag))
        } else {
            None
        }
    }
}

impl<T> std::ops::Deref for Unit<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A builder to create [`Pose`][self::Pose]s.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(
    feature = "serde-types",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PoseBuilder {
    position: [f64; 2],
    rotation: Angle,
}
impl PoseBuilder {
    pub fn new() -> Self {
        PoseBuilder {
            position: [0.0, 0.0],
            rotation: Angle::default(),
        }
    }
    #[inline]
    pub fn with_position(mut self, pos: impl Into<[f64; 2]>) -> Self {
        self.position = pos.into();
        self
    }
    #[inline]
    pub fn with_rotation(mut self, angle: Angle) -> Self {
        self.rotation = angle;
        self
    }
    #[inline]
    pub fn build(self) -> Pose {
        Pose::new(
            Vec2::new(self.position[0], self.position[1]),
            self.rotation.into(),
        )
    }
}
impl Default for PoseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
impl From<PoseBuilder> for Pose {
    fn from(iso: PoseBuilder) -> Pose {
        iso.build()
    }
}

// Vec2 utils

/// The z component of the 3D cross product of two vectors on the xy plane.
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

#[inline]
pub fn is_finite(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

// matrix utils

/// Extract the linear (rotation/scale/shear) part of a homogeneous 2D transform.
#[inline]
pub fn linear_part(m: &Mat3) -> Mat2 {
    Mat2::new(
        Vec2::new(m.cols[0].x, m.cols[0].y),
        Vec2::new(m.cols[1].x, m.cols[1].y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_sign_follows_winding() {
        assert_eq!(cross(Vec2::unit_x(), Vec2::unit_y()), 1.0);
        assert_eq!(cross(Vec2::unit_y(), Vec2::unit_x()), -1.0);
        assert_eq!(cross(Vec2::new(2.0, 0.0), Vec2::new(4.0, 0.0)), 0.0);
    }

    #[test]
    fn linear_part_drops_translation() {
        let pose = PoseBuilder::new()
            .with_position([3.0, -2.0])
            .with_rotation(Angle::Deg(180.0))
            .build();
        let lin = linear_part(&pose.into_homogeneous_matrix());
        let v = lin * Vec2::unit_x();
        assert!((v + Vec2::unit_x()).mag() < 1e-12);
    }

    #[test]
    fn zero_vector_does_not_normalize() {
        assert!(Unit::try_new_normalize(Vec2::zero()).is_none());
        let u = Unit::try_new_normalize(Vec2::new(3.0, 4.0)).unwrap();
        assert!((u.mag() - 1.0).abs() < 1e-12);
    }
}
