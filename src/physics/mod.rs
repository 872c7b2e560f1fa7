//! Rigid bodies and their collision shapes.

pub mod body;
pub use body::{Body, Mass};

pub mod collision;
pub use collision::{
    IntersectionInfo, MultiPartPolygon, MultiPartPolygonParams, Shape, ShapeCapabilities,
    ShapeError, AABB,
};
