//! Planar (optionally rational) Bézier curves.
//!
//! Control points are kept in Euclidean form; subdivision and evaluation run
//! on homogeneous `(w x, w y, w)` triples so rational curves split exactly.

use rtk_core::traits::BoundingBox;
use rtk_core::{Result, RtkError, Tolerance};
use rtk_math::predicates::pt2_equal;
use rtk_math::{Aabb2, DVec3, Point2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BezierParts")]
pub struct BezierCurve2 {
    points: Vec<Point2>,
    weights: Option<Vec<f64>>,
}

#[derive(Deserialize)]
struct BezierParts {
    points: Vec<Point2>,
    #[serde(default)]
    weights: Option<Vec<f64>>,
}

impl TryFrom<BezierParts> for BezierCurve2 {
    type Error = RtkError;

    fn try_from(parts: BezierParts) -> Result<Self> {
        match parts.weights {
            Some(w) => Self::rational(parts.points, w),
            None => Self::new(parts.points),
        }
    }
}

impl BezierCurve2 {
    /// Polynomial curve through `points`; degree is `points.len() - 1`.
    pub fn new(points: Vec<Point2>) -> Result<Self> {
        if points.is_empty() {
            return Err(RtkError::Geometry("Bezier curve needs at least one control point".into()));
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(RtkError::Geometry("non-finite Bezier control point".into()));
        }
        Ok(Self { points, weights: None })
    }

    /// Rational curve; one positive weight per control point.
    pub fn rational(points: Vec<Point2>, weights: Vec<f64>) -> Result<Self> {
        if weights.len() != points.len() {
            return Err(RtkError::Geometry(format!(
                "{} weights for {} control points",
                weights.len(),
                points.len()
            )));
        }
        if weights.iter().any(|w| !(w.is_finite() && *w > 0.0)) {
            return Err(RtkError::Geometry("Bezier weights must be positive and finite".into()));
        }
        let mut curve = Self::new(points)?;
        curve.weights = Some(weights);
        Ok(curve)
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn degree(&self) -> usize {
        self.points.len() - 1
    }

    pub fn is_rational(&self) -> bool {
        self.weights.is_some()
    }

    pub fn start(&self) -> Point2 {
        self.points[0]
    }

    pub fn end(&self) -> Point2 {
        self.points[self.points.len() - 1]
    }

    /// Evaluate at `t` in [0, 1].
    pub fn point_at(&self, t: f64) -> Point2 {
        let mut work = self.homogeneous();
        let n = work.len();
        for level in 1..n {
            for i in 0..n - level {
                work[i] = work[i].lerp(work[i + 1], t);
            }
        }
        dehomogenize(work[0])
    }

    /// Halves at t = 0.5.
    pub fn split(&self) -> (Self, Self) {
        self.split_at(0.5)
    }

    /// Halves at t = 0.5, reusing `self`'s storage for the left half.
    pub fn split_into(self) -> (Self, Self) {
        let (left, right) = de_casteljau(&self.homogeneous(), 0.5);
        let rational = self.is_rational();
        let mut reused = self;
        reused.set_homogeneous(&left, rational);
        (reused, Self::from_homogeneous(&right, rational))
    }

    /// Halves at an arbitrary `t`. The left half covers [0, t].
    pub fn split_at(&self, t: f64) -> (Self, Self) {
        let (left, right) = de_casteljau(&self.homogeneous(), t);
        let rational = self.is_rational();
        (
            Self::from_homogeneous(&left, rational),
            Self::from_homogeneous(&right, rational),
        )
    }

    /// Rebuild the curve that [`split`](Self::split) turned into `left` and
    /// `right`.
    ///
    /// Fails when the two halves do not come from one midpoint split within
    /// `tol.dist`.
    pub fn join(left: &Self, right: &Self, tol: &Tolerance) -> Result<Self> {
        if left.degree() != right.degree() || left.is_rational() != right.is_rational() {
            return Err(RtkError::InvalidOperation(
                "cannot join halves of different degree or rationality".into(),
            ));
        }
        if !pt2_equal(left.end(), right.start(), tol) {
            return Err(RtkError::InvalidOperation(format!(
                "halves do not meet: {:?} vs {:?}",
                left.end(),
                right.start()
            )));
        }

        // Invert the left column of the de Casteljau triangle:
        // L_j = 2^-j * sum_{i<=j} C(j, i) P_i.
        let l = left.homogeneous();
        let mut rebuilt: Vec<DVec3> = Vec::with_capacity(l.len());
        for (j, lj) in l.iter().enumerate() {
            let mut acc = *lj * 2f64.powi(j as i32);
            let mut binom = 1.0;
            for (i, pi) in rebuilt.iter().enumerate() {
                acc -= *pi * binom;
                binom = binom * (j - i) as f64 / (i + 1) as f64;
            }
            rebuilt.push(acc);
        }

        let joined = Self::from_homogeneous(&rebuilt, left.is_rational());
        let (_, check) = joined.split();
        let matches = check
            .points
            .iter()
            .zip(&right.points)
            .all(|(a, b)| pt2_equal(*a, *b, tol));
        if !matches {
            return Err(RtkError::Geometry(
                "right half does not match the curve rebuilt from the left half".into(),
            ));
        }
        Ok(joined)
    }

    /// Bounding box of the control polygon, which contains the curve.
    pub fn bounds(&self) -> Aabb2 {
        let first = self.start();
        Aabb2::from_points(&self.points).unwrap_or(Aabb2::new(first, first))
    }

    pub(crate) fn homogeneous(&self) -> Vec<DVec3> {
        match &self.weights {
            Some(weights) => self
                .points
                .iter()
                .zip(weights)
                .map(|(p, w)| DVec3::new(p.x * w, p.y * w, *w))
                .collect(),
            None => self.points.iter().map(|p| p.extend(1.0)).collect(),
        }
    }

    pub(crate) fn from_homogeneous(h: &[DVec3], rational: bool) -> Self {
        let mut curve = Self {
            points: Vec::with_capacity(h.len()),
            weights: None,
        };
        curve.set_homogeneous(h, rational);
        curve
    }

    fn set_homogeneous(&mut self, h: &[DVec3], rational: bool) {
        self.points.clear();
        self.points.extend(h.iter().map(|p| dehomogenize(*p)));
        self.weights = rational.then(|| h.iter().map(|p| p.z).collect());
    }
}

impl BoundingBox for BezierCurve2 {
    type Point = Point2;

    fn bounding_box(&self) -> (Point2, Point2) {
        let b = self.bounds();
        (b.min, b.max)
    }
}

fn dehomogenize(p: DVec3) -> Point2 {
    Point2::new(p.x / p.z, p.y / p.z)
}

/// Left and right control polygons of a split at `t`.
fn de_casteljau(h: &[DVec3], t: f64) -> (Vec<DVec3>, Vec<DVec3>) {
    let n = h.len();
    let mut work = h.to_vec();
    let mut left = Vec::with_capacity(n);
    let mut right = Vec::with_capacity(n);
    left.push(work[0]);
    right.push(work[n - 1]);
    for level in 1..n {
        for i in 0..n - level {
            work[i] = work[i].lerp(work[i + 1], t);
        }
        left.push(work[0]);
        right.push(work[n - 1 - level]);
    }
    right.reverse();
    (left, right)
}
