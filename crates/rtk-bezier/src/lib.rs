//! Planar Bézier curves for trimming-curve work: evaluation, subdivision,
//! intersection with a ray, and conversion of clamped B-splines into
//! Bézier pieces.

pub mod curve;
pub mod nurbs;
pub mod roots;

pub use curve::BezierCurve2;
pub use nurbs::BSplineCurve2;
pub use roots::{find_roots, Intercept, Ray2};
