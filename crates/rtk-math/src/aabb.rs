//! Axis-aligned boxes for solid extents and trimming-loop culling.

use crate::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb3 {
    pub min: Point3,
    pub max: Point3,
}

impl Aabb3 {
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Smallest box holding every point; `None` for an empty slice.
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        let (&first, rest) = points.split_first()?;
        Some(rest.iter().fold(Self::new(first, first), |b, p| b.include(*p)))
    }

    pub fn include(self, p: Point3) -> Self {
        Self::new(self.min.min(p), self.max.max(p))
    }

    pub fn center(&self) -> Point3 {
        self.min.lerp(self.max, 0.5)
    }

    pub fn extents(&self) -> Vector3 {
        self.max - self.min
    }

    /// Radius of the sphere about [`center`](Self::center) through the corners.
    pub fn half_diagonal(&self) -> f64 {
        self.extents().length() * 0.5
    }

    pub fn contains_point(&self, p: Point3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Box in the (u, v) parameter plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb2 {
    pub min: Point2,
    pub max: Point2,
}

impl Aabb2 {
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: &[Point2]) -> Option<Self> {
        let (&first, rest) = points.split_first()?;
        Some(rest.iter().fold(Self::new(first, first), |b, p| b.include(*p)))
    }

    pub fn include(self, p: Point2) -> Self {
        Self::new(self.min.min(p), self.max.max(p))
    }

    pub fn contains_point(&self, p: Point2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    pub fn merge(&self, other: &Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Grown by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Self {
        let m = Point2::splat(margin);
        Self::new(self.min - m, self.max + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{dvec2, dvec3};

    #[test]
    fn test_box_of_rec_corners() {
        let corners = [
            dvec3(2.0, 1.0, 0.0),
            dvec3(-2.0, -1.0, 0.0),
            dvec3(2.0, -1.0, 5.0),
            dvec3(-2.0, 1.0, 5.0),
        ];
        let b = Aabb3::from_points(&corners).unwrap();
        assert_eq!(b.min, dvec3(-2.0, -1.0, 0.0));
        assert_eq!(b.max, dvec3(2.0, 1.0, 5.0));
        assert_eq!(b.center(), dvec3(0.0, 0.0, 2.5));
        assert!((b.half_diagonal() - (16.0_f64 + 4.0 + 25.0).sqrt() * 0.5).abs() < 1e-12);
        assert!(b.contains_point(dvec3(0.0, 0.5, 4.0)));
        assert!(!b.contains_point(dvec3(0.0, 0.5, 5.5)));
        assert!(Aabb3::from_points(&[]).is_none());
    }

    #[test]
    fn test_uv_box_cull() {
        let a = Aabb2::from_points(&[dvec2(0.0, 0.0), dvec2(1.0, 1.0)]).unwrap();
        let b = Aabb2::new(dvec2(2.0, -1.0), dvec2(3.0, 0.5));
        let m = a.merge(&b);
        assert_eq!(m.min, dvec2(0.0, -1.0));
        assert_eq!(m.max, dvec2(3.0, 1.0));

        let grown = a.expand(0.5);
        assert!(grown.contains_point(dvec2(-0.25, 1.25)));
        assert!(!a.contains_point(dvec2(-0.25, 1.25)));
        assert!(a.contains_point(dvec2(1.0, 0.0)));
    }
}
