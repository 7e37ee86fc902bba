//! General solid descriptions and their classification into fast-path solids.

use rtk_core::tolerance::rel_diff;
use rtk_core::{PrepError, Tolerance};
use rtk_math::predicates::{cos_angle, parallelism, Parallelism};
use rtk_math::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::rec::RecSolid;
use crate::sphere::SphereSolid;

/// Relative length difference under which two semi-axes count as equal.
const EQUAL_LENGTH_RELDIFF: f64 = 0.0001;

/// Ellipsoid with center `v` and semi-axis vectors `a`, `b`, `c`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    pub v: Point3,
    pub a: Vector3,
    pub b: Vector3,
    pub c: Vector3,
}

impl Ellipsoid {
    pub fn sphere(center: Point3, radius: f64) -> Self {
        Self {
            v: center,
            a: Vector3::X * radius,
            b: Vector3::Y * radius,
            c: Vector3::Z * radius,
        }
    }

    pub(crate) fn prep(&self, tol: &Tolerance) -> Result<SphereSolid, PrepError> {
        let mag_a = self.a.length();
        let mag_b = self.b.length();
        let mag_c = self.c.length();

        for (name, mag) in [("A", mag_a), ("B", mag_b), ("C", mag_c)] {
            if tol.is_zero(mag) {
                return Err(PrepError::DegenerateCrossSection(format!(
                    "ellipsoid vector {name} has zero length"
                )));
            }
        }

        check_perpendicular(self.a, self.b, "A", "B", tol)?;
        check_perpendicular(self.b, self.c, "B", "C", tol)?;
        check_perpendicular(self.a, self.c, "A", "C", tol)?;

        let magsq_a = mag_a * mag_a;
        if rel_diff(magsq_a, mag_b * mag_b) > EQUAL_LENGTH_RELDIFF
            || rel_diff(magsq_a, mag_c * mag_c) > EQUAL_LENGTH_RELDIFF
        {
            return Err(PrepError::TooGeneral(format!(
                "ellipsoid semi-axes differ: |A| = {mag_a}, |B| = {mag_b}, |C| = {mag_c}"
            )));
        }

        Ok(SphereSolid::new(self.v, mag_a))
    }
}

/// Truncated general cone: base vertex `v`, height vector `h`, base
/// cross-section semi-axes `a`, `b`, top cross-section semi-axes `c`, `d`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tgc {
    pub v: Point3,
    pub h: Vector3,
    pub a: Vector3,
    pub b: Vector3,
    pub c: Vector3,
    pub d: Vector3,
}

impl Tgc {
    /// Right elliptical cylinder with congruent ends.
    pub fn rec(v: Point3, h: Vector3, a: Vector3, b: Vector3) -> Self {
        Self { v, h, a, b, c: a, d: b }
    }

    /// Right circular cylinder along `h` with radius `radius`.
    pub fn rcc(v: Point3, h: Vector3, radius: f64) -> Self {
        let axis = h.try_normalize().unwrap_or(Vector3::Z);
        let a = axis.any_orthonormal_vector() * radius;
        let b = axis.cross(a);
        Self::rec(v, h, a, b)
    }

    pub(crate) fn prep(&self, tol: &Tolerance) -> Result<RecSolid, PrepError> {
        let mag_h = self.h.length();
        if tol.is_zero(mag_h) {
            return Err(PrepError::ZeroLengthAxis(mag_h));
        }

        let mag_a = self.a.length();
        let mag_b = self.b.length();
        let mag_c = self.c.length();
        let mag_d = self.d.length();
        for (name, mag) in [("A", mag_a), ("B", mag_b), ("C", mag_c), ("D", mag_d)] {
            if tol.is_zero(mag) {
                return Err(PrepError::DegenerateCrossSection(format!(
                    "vector {name} has zero length"
                )));
            }
        }

        check_perpendicular(self.a, self.b, "A", "B", tol)?;
        check_perpendicular(self.c, self.d, "C", "D", tol)?;

        // H must leave the A-B plane before congruence matters.
        let normal_ab = self.a.cross(self.b);
        match cos_angle(self.h, normal_ab, tol) {
            Some(cos) if !tol.is_perpendicular_cos(cos) => {}
            _ => return Err(PrepError::AxisInCrossSection),
        }

        if rel_diff(mag_a * mag_a, mag_c * mag_c) > EQUAL_LENGTH_RELDIFF
            || rel_diff(mag_b * mag_b, mag_d * mag_d) > EQUAL_LENGTH_RELDIFF
        {
            return Err(PrepError::TooGeneral(format!(
                "end cross-sections not congruent: |A| = {mag_a}, |C| = {mag_c}, |B| = {mag_b}, |D| = {mag_d}"
            )));
        }

        check_parallel(self.a, self.c, "A", "C", tol)?;
        check_parallel(self.b, self.d, "B", "D", tol)?;

        let perp_a = cos_angle(self.h, self.a, tol).is_some_and(|c| tol.is_perpendicular_cos(c));
        let perp_b = cos_angle(self.h, self.b, tol).is_some_and(|c| tol.is_perpendicular_cos(c));
        if !(perp_a && perp_b) {
            return Err(PrepError::TooGeneral(
                "H not perpendicular to the A-B plane (oblique cylinder)".into(),
            ));
        }

        Ok(RecSolid::new(self.v, self.h, self.a, self.b))
    }
}

fn check_perpendicular(
    u: Vector3,
    w: Vector3,
    first: &'static str,
    second: &'static str,
    tol: &Tolerance,
) -> Result<(), PrepError> {
    let cos = cos_angle(u, w, tol).unwrap_or(0.0);
    if tol.is_perpendicular_cos(cos) {
        Ok(())
    } else {
        Err(PrepError::NotPerpendicular { first, second, cos })
    }
}

fn check_parallel(
    u: Vector3,
    w: Vector3,
    first: &'static str,
    second: &'static str,
    tol: &Tolerance,
) -> Result<(), PrepError> {
    match parallelism(u, w, tol) {
        Parallelism::Parallel => Ok(()),
        _ => Err(PrepError::NotParallel {
            first,
            second,
            deviation: 1.0 - cos_angle(u, w, tol).unwrap_or(0.0),
        }),
    }
}

/// Any solid description prep understands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Ellipsoid(Ellipsoid),
    Tgc(Tgc),
}

impl Primitive {
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Ellipsoid(_) => "ell",
            Primitive::Tgc(_) => "tgc",
        }
    }
}
