//! Point classification against trimming loops by ray-crossing parity.

use std::ops::Add;

use rtk_bezier::roots::flat_enough;
use rtk_bezier::BezierCurve2;
use rtk_core::{DiagEvent, QueryContext};
use rtk_math::predicates::{dist_pt2_segment, pt2_equal};
use rtk_math::Point2;
use serde::{Deserialize, Serialize};

use crate::quadrant::{Quadrant, QuadrantMask, TrimCase};
use crate::segment::TrimSegment;
use crate::trim_loop::TrimLoop;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Containment {
    In,
    Out,
    On,
}

/// Crossings of the +u ray with a boundary, or `On` when the query point
/// lies on the boundary itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossings {
    On,
    Count(usize),
}

impl Crossings {
    pub const NONE: Self = Crossings::Count(0);

    /// Odd is inside, even is outside.
    pub fn containment(self) -> Containment {
        match self {
            Crossings::On => Containment::On,
            Crossings::Count(n) if n % 2 == 1 => Containment::In,
            Crossings::Count(_) => Containment::Out,
        }
    }
}

impl Add for Crossings {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Crossings::Count(a), Crossings::Count(b)) => Crossings::Count(a + b),
            _ => Crossings::On,
        }
    }
}

/// Crossings of the ray from `uv` in +u with every segment of `lp`.
pub fn crossings(lp: &TrimLoop, uv: Point2, ctx: &QueryContext<'_>) -> Crossings {
    let mut total = Crossings::NONE;
    for seg in lp.segments() {
        total = total + segment_crossings(seg, uv, ctx);
        if total == Crossings::On {
            break;
        }
    }
    total
}

/// Whether `uv` lies inside, outside, or on the boundary of `lp`.
pub fn point_in_loop(lp: &TrimLoop, uv: Point2, ctx: &QueryContext<'_>) -> Containment {
    debug_assert!(lp.is_closed(ctx.tol), "trimming loop is not closed");
    if !lp.bounds().expand(ctx.tol.dist).contains_point(uv) {
        return Containment::Out;
    }
    crossings(lp, uv, ctx).containment()
}

pub fn segment_crossings(seg: &TrimSegment, uv: Point2, ctx: &QueryContext<'_>) -> Crossings {
    if at_endpoint(seg.start(), seg.end(), uv, ctx) {
        return Crossings::On;
    }
    match seg {
        TrimSegment::Line { start, end } => {
            if dist_pt2_segment(uv, *start, *end) < ctx.tol.dist {
                Crossings::On
            } else {
                Crossings::Count(chord_crossing(*start, *end, uv))
            }
        }
        TrimSegment::Bezier(curve) => bezier_crossings(curve, uv, ctx, 0),
        TrimSegment::Nurbs(curve) => {
            let mut total = Crossings::NONE;
            for piece in curve.to_bezier() {
                total = total + bezier_crossings(&piece, uv, ctx, 0);
                if total == Crossings::On {
                    break;
                }
            }
            total
        }
    }
}

fn bezier_crossings(curve: &BezierCurve2, uv: Point2, ctx: &QueryContext<'_>, depth: usize) -> Crossings {
    let (start, end) = (curve.start(), curve.end());
    if at_endpoint(start, end, uv, ctx) {
        return Crossings::On;
    }
    // A curve within tolerance of its chord is on the boundary near the chord,
    // whichever case its control points fall in.
    if flat_enough(curve, ctx.tol.dist) && dist_pt2_segment(uv, start, end) < ctx.tol.dist {
        return Crossings::On;
    }

    match TrimCase::from_mask(QuadrantMask::from_points(curve.points(), uv)) {
        TrimCase::A => Crossings::NONE,
        TrimCase::B => {
            let differ = Quadrant::of(start, uv) != Quadrant::of(end, uv);
            Crossings::Count(usize::from(differ))
        }
        TrimCase::C => {
            if depth >= ctx.max_depth {
                ctx.record(DiagEvent::DepthExhausted { stage: "trim", depth });
                return Crossings::Count(chord_crossing(start, end, uv));
            }
            let (left, right) = curve.split();
            match bezier_crossings(&left, uv, ctx, depth + 1) {
                Crossings::On => Crossings::On,
                counted => counted + bezier_crossings(&right, uv, ctx, depth + 1),
            }
        }
    }
}

fn at_endpoint(start: Point2, end: Point2, uv: Point2, ctx: &QueryContext<'_>) -> bool {
    pt2_equal(start, uv, ctx.tol) || pt2_equal(end, uv, ctx.tol)
}

/// 1 when the straight segment `a`-`b` crosses the +u ray from `uv`, using
/// the same above/below convention as the quadrants.
fn chord_crossing(a: Point2, b: Point2, uv: Point2) -> usize {
    let a_above = a.y >= uv.y;
    let b_above = b.y >= uv.y;
    if a_above == b_above {
        return 0;
    }
    let t = (uv.y - a.y) / (b.y - a.y);
    let u = a.x + t * (b.x - a.x);
    usize::from(u > uv.x)
}

/// An outer loop with optional holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimRegion {
    outer: TrimLoop,
    holes: Vec<TrimLoop>,
}

impl TrimRegion {
    pub fn new(outer: TrimLoop) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    pub fn with_hole(mut self, hole: TrimLoop) -> Self {
        self.holes.push(hole);
        self
    }

    pub fn outer(&self) -> &TrimLoop {
        &self.outer
    }

    pub fn holes(&self) -> &[TrimLoop] {
        &self.holes
    }

    /// Parity of the crossings summed over every loop; `On` for any loop wins.
    pub fn classify(&self, uv: Point2, ctx: &QueryContext<'_>) -> Containment {
        if !self.outer.bounds().expand(ctx.tol.dist).contains_point(uv) {
            return Containment::Out;
        }
        let mut total = crossings(&self.outer, uv, ctx);
        for hole in &self.holes {
            if total == Crossings::On {
                break;
            }
            total = total + crossings(hole, uv, ctx);
        }
        total.containment()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtk_core::Tolerance;
    use rtk_math::dvec2;

    #[test]
    fn test_crossings_add() {
        assert_eq!(Crossings::Count(1) + Crossings::Count(2), Crossings::Count(3));
        assert_eq!(Crossings::Count(1) + Crossings::On, Crossings::On);
        assert_eq!(Crossings::Count(3).containment(), Containment::In);
        assert_eq!(Crossings::Count(2).containment(), Containment::Out);
    }

    #[test]
    fn test_chord_crossing_half_open() {
        let uv = dvec2(0.0, 0.0);
        assert_eq!(chord_crossing(dvec2(1.0, -1.0), dvec2(1.0, 1.0), uv), 1);
        assert_eq!(chord_crossing(dvec2(-1.0, -1.0), dvec2(-1.0, 1.0), uv), 0);
        // A vertex on the ray counts as above.
        assert_eq!(chord_crossing(dvec2(1.0, 0.0), dvec2(2.0, 1.0), uv), 0);
        assert_eq!(chord_crossing(dvec2(1.0, 0.0), dvec2(2.0, -1.0), uv), 1);
    }

    #[test]
    fn test_line_segment_on() {
        let tol = Tolerance::default();
        let ctx = QueryContext::new(&tol);
        let seg = TrimSegment::line(dvec2(0.0, 0.0), dvec2(2.0, 2.0));
        assert_eq!(segment_crossings(&seg, dvec2(1.0, 1.0), &ctx), Crossings::On);
        assert_eq!(segment_crossings(&seg, dvec2(0.0, 1.0), &ctx), Crossings::Count(1));
        assert_eq!(segment_crossings(&seg, dvec2(3.0, 1.0), &ctx), Crossings::Count(0));
    }

    #[test]
    fn test_bezier_case_b() {
        let tol = Tolerance::default();
        let ctx = QueryContext::new(&tol);
        let arc = BezierCurve2::new(vec![dvec2(1.0, -1.0), dvec2(2.0, 0.0), dvec2(1.0, 1.0)]).unwrap();
        assert_eq!(bezier_crossings(&arc, dvec2(0.0, 0.0), &ctx, 0), Crossings::Count(1));
        let cap = BezierCurve2::new(vec![dvec2(1.0, -1.0), dvec2(2.0, 2.0), dvec2(3.0, -1.0)]).unwrap();
        assert_eq!(bezier_crossings(&cap, dvec2(0.0, 0.0), &ctx, 0), Crossings::Count(0));
    }

    #[test]
    fn test_bezier_case_c_resolves() {
        let tol = Tolerance::default();
        let ctx = QueryContext::new(&tol);
        // Starts left and below, ends right and above: one crossing.
        let s = BezierCurve2::new(vec![dvec2(-1.0, -1.0), dvec2(3.0, -1.0), dvec2(3.0, 1.0)]).unwrap();
        assert_eq!(bezier_crossings(&s, dvec2(0.0, 0.0), &ctx, 0), Crossings::Count(1));
        // Same curve, query point right of where it crosses v = 0.
        assert_eq!(bezier_crossings(&s, dvec2(2.9, 0.0), &ctx, 0), Crossings::Count(0));
    }

    #[test]
    fn test_straight_bezier_on() {
        let tol = Tolerance::default();
        let ctx = QueryContext::new(&tol);
        let edge = BezierCurve2::new(vec![dvec2(0.0, 2.0), dvec2(0.0, 0.0)]).unwrap();
        assert_eq!(bezier_crossings(&edge, dvec2(0.0, 1.0), &ctx, 0), Crossings::On);
        // Collinear quadratic lying along v = 0, query point in its middle.
        let flat = BezierCurve2::new(vec![dvec2(0.0, 0.0), dvec2(1.0, 0.0), dvec2(2.0, 0.0)]).unwrap();
        assert_eq!(bezier_crossings(&flat, dvec2(1.5, 0.0), &ctx, 0), Crossings::On);
        assert_eq!(bezier_crossings(&flat, dvec2(1.5, 0.1), &ctx, 0), Crossings::NONE);
    }
}
