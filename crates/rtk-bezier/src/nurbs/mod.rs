//! Clamped (rational) B-spline curves in the parameter plane and their
//! decomposition into Bézier pieces.

pub mod knot;

use rtk_core::{Result, RtkError};
use rtk_math::{DVec3, Point2};
use serde::{Deserialize, Serialize};

use crate::curve::BezierCurve2;
use knot::{basis_functions, find_span, insert_knot, multiplicity};

/// A B-spline curve whose knot vector is clamped at both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BSplineParts")]
pub struct BSplineCurve2 {
    degree: usize,
    knots: Vec<f64>,
    points: Vec<Point2>,
    weights: Option<Vec<f64>>,
}

/// Unchecked serialized form; validated on the way in.
#[derive(Deserialize)]
struct BSplineParts {
    degree: usize,
    knots: Vec<f64>,
    points: Vec<Point2>,
    #[serde(default)]
    weights: Option<Vec<f64>>,
}

impl TryFrom<BSplineParts> for BSplineCurve2 {
    type Error = RtkError;

    fn try_from(parts: BSplineParts) -> Result<Self> {
        match parts.weights {
            Some(w) => Self::rational(parts.degree, parts.knots, parts.points, w),
            None => Self::new(parts.degree, parts.knots, parts.points),
        }
    }
}

impl BSplineCurve2 {
    pub fn new(degree: usize, knots: Vec<f64>, points: Vec<Point2>) -> Result<Self> {
        let curve = Self {
            degree,
            knots,
            points,
            weights: None,
        };
        curve.check()?;
        Ok(curve)
    }

    pub fn rational(
        degree: usize,
        knots: Vec<f64>,
        points: Vec<Point2>,
        weights: Vec<f64>,
    ) -> Result<Self> {
        if weights.len() != points.len() {
            return Err(RtkError::Geometry(format!(
                "{} weights for {} control points",
                weights.len(),
                points.len()
            )));
        }
        if weights.iter().any(|w| !(w.is_finite() && *w > 0.0)) {
            return Err(RtkError::Geometry("B-spline weights must be positive and finite".into()));
        }
        let curve = Self {
            degree,
            knots,
            points,
            weights: Some(weights),
        };
        curve.check()?;
        Ok(curve)
    }

    fn check(&self) -> Result<()> {
        let p = self.degree;
        if p == 0 || self.points.len() < p + 1 {
            return Err(RtkError::Geometry(format!(
                "degree {p} B-spline needs at least {} control points, got {}",
                p + 1,
                self.points.len()
            )));
        }
        if self.knots.len() != self.points.len() + p + 1 {
            return Err(RtkError::Geometry(format!(
                "knot vector length must be n + p + 1, got {} knots for {} control points with degree {p}",
                self.knots.len(),
                self.points.len()
            )));
        }
        if self.knots.windows(2).any(|w| !(w[0] <= w[1])) {
            return Err(RtkError::Geometry("knot vector must be non-decreasing".into()));
        }
        let m = self.knots.len();
        let (a, b) = (self.knots[0], self.knots[m - 1]);
        if a >= b {
            return Err(RtkError::Geometry("knot vector has an empty domain".into()));
        }
        if multiplicity(&self.knots, a) != p + 1 || multiplicity(&self.knots, b) != p + 1 {
            return Err(RtkError::Geometry(
                "knot vector must be clamped: end knots repeated degree + 1 times".into(),
            ));
        }
        let interior = &self.knots[p + 1..m - p - 1];
        if let Some(k) = interior.iter().find(|&&k| multiplicity(interior, k) > p) {
            return Err(RtkError::Geometry(format!(
                "interior knot {k} repeated more than degree {p} times"
            )));
        }
        Ok(())
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }

    pub fn start(&self) -> Point2 {
        self.points[0]
    }

    pub fn end(&self) -> Point2 {
        self.points[self.points.len() - 1]
    }

    /// Evaluate at `t` in the knot domain.
    pub fn point_at(&self, t: f64) -> Point2 {
        let h = self.homogeneous();
        let n = h.len() - 1;
        let span = find_span(self.degree, &self.knots, n, t);
        let basis = basis_functions(self.degree, &self.knots, span, t);
        let p = basis
            .iter()
            .enumerate()
            .fold(DVec3::ZERO, |acc, (i, b)| acc + h[span - self.degree + i] * *b);
        Point2::new(p.x / p.z, p.y / p.z)
    }

    /// Bézier pieces in parameter order, one per non-empty knot span.
    ///
    /// Every interior knot is raised to multiplicity `degree` by repeated
    /// insertion; consecutive groups of `degree + 1` control points are then
    /// the pieces.
    pub fn to_bezier(&self) -> Vec<BezierCurve2> {
        let p = self.degree;
        let mut knots = self.knots.clone();
        let mut points = self.homogeneous();

        let (a, b) = self.domain();
        let mut interior: Vec<f64> = self.knots.iter().copied().filter(|&u| u > a && u < b).collect();
        interior.dedup();

        for u in interior {
            let s = multiplicity(&knots, u);
            for _ in s..p {
                let (k, q) = insert_knot(p, &knots, &points, u);
                knots = k;
                points = q;
            }
        }

        let rational = self.weights.is_some();
        points
            .windows(p + 1)
            .step_by(p)
            .map(|w| BezierCurve2::from_homogeneous(w, rational))
            .collect()
    }

    fn homogeneous(&self) -> Vec<DVec3> {
        match &self.weights {
            Some(weights) => self
                .points
                .iter()
                .zip(weights)
                .map(|(pt, w)| DVec3::new(pt.x * w, pt.y * w, *w))
                .collect(),
            None => self.points.iter().map(|pt| pt.extend(1.0)).collect(),
        }
    }
}
