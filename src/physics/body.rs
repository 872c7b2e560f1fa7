use super::collision::{IntersectionInfo, Shape};
use crate::math as m;

/// A rigid body with a collision shape.
///
/// The body owns the pose. Whenever the pose changes,
/// it's pushed into the shape so that the shape's queries happen in world space.
#[derive(Debug)]
pub struct Body {
    pose: m::Pose,
    pub mass: Mass,
    pub moment_of_inertia: Mass,
    shape: Box<dyn Shape>,
}

impl Body {
    /// Dynamic bodies respond to external forces and are allowed to rotate.
    /// This constructor calculates mass and moment of inertia from the given density and
    /// the shape's area and inertia multiplier.
    pub fn new_dynamic(shape: Box<dyn Shape>, density: f64) -> Self {
        let mass = shape.area() * density;
        Self::new_dynamic_const_mass(shape, mass)
    }

    /// Create a dynamic body with the given mass instead of using density.
    /// The shape is still required in order to compute moment of inertia.
    pub fn new_dynamic_const_mass(shape: Box<dyn Shape>, mass: f64) -> Self {
        let moment_of_inertia = mass * shape.inertia_multiplier();
        Self::with_mass(shape, Mass::from(mass), Mass::from(moment_of_inertia))
    }

    /// Static bodies are not affected by forces.
    pub fn new_static(shape: Box<dyn Shape>) -> Self {
        Self::with_mass(shape, Mass::Infinite, Mass::Infinite)
    }

    fn with_mass(mut shape: Box<dyn Shape>, mass: Mass, moment_of_inertia: Mass) -> Self {
        let pose = m::Pose::identity();
        shape.set_pose(&pose);
        Self {
            pose,
            mass,
            moment_of_inertia,
            shape,
        }
    }

    /// Set the pose of the body in a builder-like chain.
    pub fn with_pose(mut self, pose: impl Into<m::Pose>) -> Self {
        self.set_pose(pose.into());
        self
    }

    #[inline]
    pub fn pose(&self) -> &m::Pose {
        &self.pose
    }

    pub fn set_pose(&mut self, pose: m::Pose) {
        self.pose = pose;
        self.shape.set_pose(&pose);
    }

    #[inline]
    pub fn shape(&self) -> &dyn Shape {
        self.shape.as_ref()
    }

    /// Check whether a world-space point touches this body's shape.
    #[inline]
    pub fn intersection(&self, point: m::Vec2) -> Option<IntersectionInfo> {
        self.shape.intersection(point)
    }

    /// Create another body with the same mass and a duplicate of this body's shape.
    ///
    /// The shape's geometry is shared, the pose is copied.
    pub fn duplicate(&self) -> Self {
        Self {
            pose: self.pose,
            mass: self.mass,
            moment_of_inertia: self.moment_of_inertia,
            shape: self.shape.duplicate(),
        }
    }

    /// Check whether the body has finite mass or moment of inertia, allowing forces to have an
    /// effect on it.
    #[inline]
    pub fn sees_forces(&self) -> bool {
        !matches!(
            (self.mass, self.moment_of_inertia),
            (Mass::Infinite, Mass::Infinite)
        )
    }
}

/// Mass or moment of inertia of a body, which can be infinite.
///
/// This stores both a mass value and its inverse, because calculating inverse mass
/// is expensive and needed a lot in physics calculations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mass {
    Finite { mass: f64, inverse: f64 },
    Infinite,
}

impl From<f64> for Mass {
    #[inline]
    fn from(mass: f64) -> Self {
        Mass::Finite {
            mass,
            inverse: 1.0 / mass,
        }
    }
}

impl Mass {
    /// Get the inverse of the mass, which is zero if the mass is infinite.
    #[inline]
    pub fn inv(&self) -> f64 {
        match self {
            Mass::Finite { inverse, .. } => *inverse,
            Mass::Infinite => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::PoseBuilder;
    use crate::physics::collision::{polygon::tests::rect, MultiPartPolygon};

    fn shape() -> Box<dyn Shape> {
        Box::new(
            MultiPartPolygon::new(
                vec![rect([-2.0, -1.0], [-1.0, 1.0]), rect([1.0, -1.0], [2.0, 1.0])],
                0.1,
            )
            .unwrap(),
        )
    }

    #[test]
    fn mass_from_density() {
        let body = Body::new_dynamic(shape(), 2.0);
        let mult = body.shape().inertia_multiplier();
        assert_eq!(body.mass, Mass::from(8.0));
        assert_eq!(body.moment_of_inertia, Mass::from(8.0 * mult));
        assert!(body.sees_forces());

        let wall = Body::new_static(shape());
        assert_eq!(wall.mass.inv(), 0.0);
        assert!(!wall.sees_forces());
    }

    #[test]
    fn pose_moves_the_shape() {
        let mut body = Body::new_dynamic_const_mass(shape(), 1.0)
            .with_pose(PoseBuilder::new().with_position([0.0, 5.0]));
        assert!(body.intersection(m::Vec2::new(1.5, 5.0)).is_some());
        assert!(body.intersection(m::Vec2::new(1.5, 0.0)).is_none());

        body.set_pose(PoseBuilder::new().with_position([-10.0, 0.0]).build());
        assert!(body.intersection(m::Vec2::new(-8.5, 0.0)).is_some());
        assert!((body.shape().aabb().min - m::Vec2::new(-12.0, -1.0)).mag() < 1e-9);
    }

    #[test]
    fn duplicate_moves_independently() {
        let mut original = Body::new_dynamic(shape(), 1.0);
        let mut copy = original.duplicate();
        copy.set_pose(PoseBuilder::new().with_position([20.0, 0.0]).build());

        assert!(original.intersection(m::Vec2::new(1.5, 0.0)).is_some());
        assert!(copy.intersection(m::Vec2::new(1.5, 0.0)).is_none());
        assert!(copy.intersection(m::Vec2::new(21.5, 0.0)).is_some());

        original.set_pose(PoseBuilder::new().with_position([0.0, -20.0]).build());
        assert_eq!(copy.pose().translation, m::Vec2::new(20.0, 0.0));
        assert_eq!(copy.mass, original.mass);
        assert_eq!(
            copy.shape().inertia_multiplier().to_bits(),
            original.shape().inertia_multiplier().to_bits()
        );
    }
}
