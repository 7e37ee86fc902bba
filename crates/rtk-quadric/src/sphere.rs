//! Ray-sphere intersection.

use rtk_core::{PrepError, Tolerance};
use rtk_math::{Aabb3, Point3, Ray, Vector3};
use serde::{Deserialize, Serialize};

use crate::hit::{Hit, HitPair, HitSurface};
use crate::prep::Ellipsoid;

/// Prepped sphere. Serialized as its [`Ellipsoid`] description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Ellipsoid", into = "Ellipsoid")]
pub struct SphereSolid {
    center: Point3,
    radius: f64,
    radsq: f64,
    inv_rad: f64,
    bounds: Aabb3,
}

impl SphereSolid {
    pub(crate) fn new(center: Point3, radius: f64) -> Self {
        let extent = Vector3::splat(radius);
        Self {
            center,
            radius,
            radsq: radius * radius,
            inv_rad: 1.0 / radius,
            bounds: Aabb3::new(center - extent, center + extent),
        }
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn bounds(&self) -> Aabb3 {
        self.bounds
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.center.is_finite() && self.radius.is_finite() && self.inv_rad.is_finite()
    }

    /// Entry and exit of `ray`, or `None` on a miss or a tangent graze.
    pub fn shoot(&self, ray: &Ray) -> Option<HitPair> {
        let ov = self.center - ray.origin;
        let b = ray.direction.dot(ov);
        let magsq_ov = ov.length_squared();

        // Origin outside and sphere behind: no need for the discriminant.
        if magsq_ov >= self.radsq && b < 0.0 {
            return None;
        }

        let root = b * b - magsq_ov + self.radsq;
        if root <= 0.0 {
            return None;
        }
        let root = root.sqrt();

        Some(HitPair::ordered(self.hit_at(ray, b - root), self.hit_at(ray, b + root)))
    }

    fn hit_at(&self, ray: &Ray, dist: f64) -> Hit {
        let point = ray.at(dist);
        let local = (point - self.center) * self.inv_rad;
        Hit {
            dist,
            point,
            normal: local,
            surface: HitSurface::Sphere,
            local,
        }
    }
}

impl From<SphereSolid> for Ellipsoid {
    fn from(sphere: SphereSolid) -> Self {
        Ellipsoid::sphere(sphere.center, sphere.radius)
    }
}

impl TryFrom<Ellipsoid> for SphereSolid {
    type Error = PrepError;

    fn try_from(ellipsoid: Ellipsoid) -> Result<Self, PrepError> {
        ellipsoid.prep(&Tolerance::loose())
    }
}
