//! Ray intersection with a right elliptical cylinder.
//!
//! The solid is mapped onto the unit cylinder `x^2 + y^2 = 1, 0 <= z <= 1`
//! by `sor` (scale after rotation). Ray distances survive the mapping
//! unchanged, so roots found in the unit frame are world distances.

use rtk_core::{PrepError, Result, RtkError, Tolerance};
use rtk_math::{Aabb3, DMat3, Point3, Ray, Vector3};
use serde::{Deserialize, Serialize};

use crate::hit::{Hit, HitPair, HitSurface};
use crate::prep::Tgc;

/// Squared length below which the mapped direction has no cross-section component.
const SMALL: f64 = 1.0e-20;

/// Distance along the ray, surface and unit-frame position of one crossing.
pub(crate) type Candidate = (f64, HitSurface, Point3);

/// Prepped right elliptical cylinder.
///
/// Serialized as its [`Tgc`] description and prepped again on the way in,
/// so the derived matrices and bounds can never go stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Tgc", into = "Tgc")]
pub struct RecSolid {
    v: Point3,
    h: Vector3,
    /// Unit height vector.
    axis: Vector3,
    /// World to unit-cylinder frame.
    sor: DMat3,
    /// Unit-cylinder frame back to world; columns are A, B, H.
    inv_ros: DMat3,
    /// Shortest of |A| and |B|.
    min_radius: f64,
    bounds: Aabb3,
}

impl RecSolid {
    pub(crate) fn new(v: Point3, h: Vector3, a: Vector3, b: Vector3) -> Self {
        let mag_a = a.length();
        let mag_b = b.length();
        let mag_h = h.length();

        // Rows of R are the unit semi-axes and the unit height.
        let rot = DMat3::from_cols(a / mag_a, b / mag_b, h / mag_h).transpose();
        let scale = DMat3::from_diagonal(Vector3::new(1.0 / mag_a, 1.0 / mag_b, 1.0 / mag_h));
        let sor = scale * rot;
        let inv_ros = DMat3::from_cols(a, b, h);

        let corners = [
            v + a + b,
            v + a - b,
            v - a + b,
            v - a - b,
            v + h + a + b,
            v + h + a - b,
            v + h - a + b,
            v + h - a - b,
        ];
        let bounds = Aabb3::from_points(&corners).unwrap_or(Aabb3::new(v, v));

        Self {
            v,
            h,
            axis: h / mag_h,
            sor,
            inv_ros,
            min_radius: mag_a.min(mag_b),
            bounds,
        }
    }

    pub fn vertex(&self) -> Point3 {
        self.v
    }

    pub fn axis(&self) -> Vector3 {
        self.axis
    }

    pub fn height(&self) -> f64 {
        self.h.length()
    }

    pub fn bounds(&self) -> Aabb3 {
        self.bounds
    }

    /// Map a world point into the unit-cylinder frame.
    pub fn to_local(&self, p: Point3) -> Point3 {
        self.sor * (p - self.v)
    }

    /// Map a unit-cylinder point back to world space.
    pub fn to_world(&self, local: Point3) -> Point3 {
        self.v + self.inv_ros * local
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.sor.is_finite() && self.inv_ros.is_finite() && self.v.is_finite()
    }

    /// Entry and exit of `ray`, `None` on a miss.
    ///
    /// Crossings are first kept only when they lie exactly on the finite
    /// surfaces. If that leaves an unpaired crossing (a ray through the rim,
    /// where rounding can push both rim crossings just off their surfaces),
    /// crossings within `tol.dist` of the surfaces are admitted as well.
    ///
    /// Fails with [`RtkError::HitCount`] when the crossings still do not pair
    /// up; a closed convex solid cannot produce that.
    pub fn shoot(&self, ray: &Ray, tol: &Tolerance) -> Result<Option<HitPair>> {
        let pprime = self.sor * (ray.origin - self.v);
        let dprime = self.sor * ray.direction;

        // Slack in the unit frame: tol.dist along H, and 2 tol.dist / r on r^2.
        let z_slack = tol.dist / self.height();
        let r2_slack = 2.0 * tol.dist / self.min_radius;

        let mut exact: Vec<Candidate> = Vec::with_capacity(4);
        let mut near: Vec<Candidate> = Vec::new();

        let a = dprime.x * dprime.x + dprime.y * dprime.y;
        if a > SMALL {
            // Half-b form of the quadratic.
            let b = dprime.x * pprime.x + dprime.y * pprime.y;
            let c = pprime.x * pprime.x + pprime.y * pprime.y - 1.0;
            let disc = b * b - a * c;
            if disc > 0.0 {
                let disc = disc.sqrt();
                for k in [(-b - disc) / a, (-b + disc) / a] {
                    let z = pprime.z + k * dprime.z;
                    let candidate = (k, HitSurface::RecBody, pprime + dprime * k);
                    if (0.0..=1.0).contains(&z) {
                        exact.push(candidate);
                    } else if (-z_slack..=1.0 + z_slack).contains(&z) {
                        near.push(candidate);
                    }
                }
            }
        }

        if dprime.z * dprime.z > SMALL {
            for (plane, surface) in [(0.0, HitSurface::RecBottom), (1.0, HitSurface::RecTop)] {
                let k = (plane - pprime.z) / dprime.z;
                let local = pprime + dprime * k;
                let r2 = local.x * local.x + local.y * local.y;
                let candidate = (k, surface, Point3::new(local.x, local.y, plane));
                if r2 <= 1.0 {
                    exact.push(candidate);
                } else if r2 <= 1.0 + r2_slack {
                    near.push(candidate);
                }
            }
        }

        let (mut candidates, mut raw_count) = merge_candidates(exact, tol);
        if candidates.len() == 1 && raw_count == 1 && !near.is_empty() {
            candidates.extend(near);
            (candidates, raw_count) = merge_candidates(candidates, tol);
        }
        self.pair_up(ray, &candidates, raw_count)
    }

    /// Turn merged crossings into a hit pair.
    ///
    /// `raw_count` is the number of crossings before merging; several
    /// crossings merged into one are a graze and count as a miss.
    pub(crate) fn pair_up(&self, ray: &Ray, candidates: &[Candidate], raw_count: usize) -> Result<Option<HitPair>> {
        match candidates {
            [] => Ok(None),
            [_] if raw_count >= 2 => Ok(None),
            [first, second] => Ok(Some(HitPair::ordered(
                self.hit_at(ray, *first),
                self.hit_at(ray, *second),
            ))),
            _ => Err(RtkError::HitCount {
                count: candidates.len(),
                distances: candidates.iter().map(|c| c.0).collect(),
            }),
        }
    }

    fn hit_at(&self, ray: &Ray, candidate: Candidate) -> Hit {
        let (dist, surface, local) = candidate;
        let normal = match surface {
            HitSurface::RecBottom => -self.axis,
            HitSurface::RecTop => self.axis,
            _ => self.sor.transpose() * Vector3::new(local.x, local.y, 0.0),
        };
        Hit {
            dist,
            point: ray.at(dist),
            normal,
            surface,
            local,
        }
    }
}

/// Sort by distance and merge crossings closer than `tol.dist`; a rim
/// crossing shows up on both the body and a plate. Also returns the count
/// before merging.
fn merge_candidates(mut candidates: Vec<Candidate>, tol: &Tolerance) -> (Vec<Candidate>, usize) {
    candidates.sort_by(|l, r| l.0.total_cmp(&r.0));
    let raw_count = candidates.len();
    candidates.dedup_by(|later, earlier| (later.0 - earlier.0).abs() < tol.dist);
    (candidates, raw_count)
}

impl From<RecSolid> for Tgc {
    fn from(rec: RecSolid) -> Self {
        Tgc::rec(rec.v, rec.h, rec.inv_ros.x_axis, rec.inv_ros.y_axis)
    }
}

impl TryFrom<Tgc> for RecSolid {
    type Error = PrepError;

    /// Preps with the loosest preset so any solid that was prepped once
    /// loads again.
    fn try_from(tgc: Tgc) -> std::result::Result<Self, PrepError> {
        tgc.prep(&Tolerance::loose())
    }
}
