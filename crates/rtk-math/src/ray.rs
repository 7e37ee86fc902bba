use crate::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Half-line `origin + t * direction` with a unit `direction`.
///
/// Intersectors report signed `t`, so hits behind the origin are possible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vector3,
}

impl Ray {
    /// Normalizes `direction`.
    pub fn new(origin: Point3, direction: Vector3) -> Self {
        Self::from_unit(origin, direction.normalize())
    }

    /// Trusts the caller that `direction` is unit length.
    pub fn from_unit(origin: Point3, direction: Vector3) -> Self {
        debug_assert!(
            (direction.length_squared() - 1.0).abs() < 1e-9,
            "ray direction must be unit length, |d|^2 = {}",
            direction.length_squared()
        );
        Self { origin, direction }
    }

    /// Ray from `from` aimed through `to`.
    pub fn through(from: Point3, to: Point3) -> Self {
        Self::new(from, to - from)
    }

    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// Same line, opposite direction, same origin.
    pub fn reversed(&self) -> Self {
        Self {
            origin: self.origin,
            direction: -self.direction,
        }
    }

    /// Signed distance along the ray to the foot of the perpendicular from `p`.
    #[inline]
    pub fn dist_to_foot(&self, p: Point3) -> f64 {
        (p - self.origin).dot(self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec3;

    #[test]
    fn test_new_normalizes() {
        let ray = Ray::new(dvec3(1.0, 0.0, 0.0), dvec3(0.0, 4.0, 0.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-12);
        assert!((ray.at(2.5) - dvec3(1.0, 2.5, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_through_and_reversed() {
        let ray = Ray::through(dvec3(0.0, 0.0, -10.0), dvec3(0.0, 0.0, 0.0));
        assert!((ray.dist_to_foot(dvec3(3.0, 0.0, 0.0)) - 10.0).abs() < 1e-12);
        let back = ray.reversed();
        assert!((back.dist_to_foot(dvec3(0.0, 0.0, -12.0)) - 2.0).abs() < 1e-12);
    }
}
