/// Open a tracy profiling span when the `tracy` feature is enabled, otherwise do nothing.
macro_rules! tracy_span {
    ($name:literal, $fn_name:literal) => {{
        #[cfg(feature = "tracy")]
        let span = tracy_client::span!($name);
        #[cfg(not(feature = "tracy"))]
        let span = ();
        span
    }};
}
pub(crate) use tracy_span;

pub mod math;
pub use math::{uv, Angle, Pose, PoseBuilder, Unit, Vec2};

pub mod physics;
pub use physics::{
    body::{Body, Mass},
    collision::{
        self, multi_part, polygon, DistanceGrid, IntersectionInfo, MultiPartPolygon,
        MultiPartPolygonParams, Shape, ShapeCapabilities, ShapeError, ShapeMatrix, ShapeState,
        AABB,
    },
};
#[cfg(feature = "serde-types")]
pub use physics::collision::MultiPartPolygonRecipe;
