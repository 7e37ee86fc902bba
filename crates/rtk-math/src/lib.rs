pub mod aabb;
pub mod fuse;
pub mod predicates;
pub mod ray;

pub use glam::{dvec2, dvec3, DMat3, DVec2, DVec3, DVec4};
pub use aabb::{Aabb2, Aabb3};
pub use fuse::VertexFuse;
pub use ray::Ray;

pub type Point2 = DVec2;
pub type Point3 = DVec3;
pub type Vector2 = DVec2;
pub type Vector3 = DVec3;

/// 2-D cross product (z component of the 3-D cross).
#[inline]
pub fn cross2(a: Vector2, b: Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}
