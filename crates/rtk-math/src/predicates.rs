//! Tolerance-aware geometric predicates.
//!
//! Every predicate takes the caller's [`Tolerance`] and never keeps state.

use rtk_core::Tolerance;

use crate::{Point2, Vector3};

/// Relationship between two directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parallelism {
    Parallel,
    AntiParallel,
    NotParallel,
    /// One of the vectors is too short to have a direction.
    Degenerate,
}

pub fn pt2_equal(a: Point2, b: Point2, tol: &Tolerance) -> bool {
    (a - b).length_squared() < tol.dist_sq
}

/// Cosine of the angle between `a` and `b`, `None` if either is near zero length.
pub fn cos_angle(a: Vector3, b: Vector3, tol: &Tolerance) -> Option<f64> {
    let la = a.length_squared();
    let lb = b.length_squared();
    if tol.is_zero_sq(la) || tol.is_zero_sq(lb) {
        return None;
    }
    Some(a.dot(b) / (la * lb).sqrt())
}

pub fn parallelism(a: Vector3, b: Vector3, tol: &Tolerance) -> Parallelism {
    match cos_angle(a, b, tol) {
        None => Parallelism::Degenerate,
        Some(cos) if cos >= tol.para => Parallelism::Parallel,
        Some(cos) if cos <= -tol.para => Parallelism::AntiParallel,
        Some(_) => Parallelism::NotParallel,
    }
}

/// Distance from `p` to the closed segment `a`-`b`.
pub fn dist_pt2_segment(p: Point2, a: Point2, b: Point2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}
