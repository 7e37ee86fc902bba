use rtk_bezier::{BSplineCurve2, BezierCurve2};
use rtk_math::{Aabb2, Point2};
use serde::{Deserialize, Serialize};

/// One piece of a trimming loop in the (u, v) parameter plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrimSegment {
    Line { start: Point2, end: Point2 },
    Bezier(BezierCurve2),
    Nurbs(BSplineCurve2),
}

impl TrimSegment {
    pub fn line(start: Point2, end: Point2) -> Self {
        TrimSegment::Line { start, end }
    }

    pub fn start(&self) -> Point2 {
        match self {
            TrimSegment::Line { start, .. } => *start,
            TrimSegment::Bezier(c) => c.start(),
            TrimSegment::Nurbs(c) => c.start(),
        }
    }

    pub fn end(&self) -> Point2 {
        match self {
            TrimSegment::Line { end, .. } => *end,
            TrimSegment::Bezier(c) => c.end(),
            TrimSegment::Nurbs(c) => c.end(),
        }
    }

    /// Bounding box of the control points, which contains the segment.
    pub fn bounds(&self) -> Aabb2 {
        match self {
            TrimSegment::Line { start, end } => Aabb2::new(start.min(*end), start.max(*end)),
            TrimSegment::Bezier(c) => c.bounds(),
            TrimSegment::Nurbs(c) => {
                let first = c.start();
                Aabb2::from_points(c.points()).unwrap_or(Aabb2::new(first, first))
            }
        }
    }

    /// Same segment traversed the other way.
    pub fn reversed(&self) -> Self {
        match self {
            TrimSegment::Line { start, end } => TrimSegment::line(*end, *start),
            TrimSegment::Bezier(c) => {
                let points: Vec<Point2> = c.points().iter().rev().copied().collect();
                let curve = match c.weights() {
                    Some(w) => BezierCurve2::rational(points, w.iter().rev().copied().collect()),
                    None => BezierCurve2::new(points),
                };
                // Reversing a valid curve keeps it valid.
                match curve {
                    Ok(curve) => TrimSegment::Bezier(curve),
                    Err(_) => self.clone(),
                }
            }
            TrimSegment::Nurbs(c) => {
                let (a, b) = c.domain();
                let knots: Vec<f64> = c.knots().iter().rev().map(|k| a + b - k).collect();
                let points: Vec<Point2> = c.points().iter().rev().copied().collect();
                let curve = match c.weights() {
                    Some(w) => BSplineCurve2::rational(
                        c.degree(),
                        knots,
                        points,
                        w.iter().rev().copied().collect(),
                    ),
                    None => BSplineCurve2::new(c.degree(), knots, points),
                };
                match curve {
                    Ok(curve) => TrimSegment::Nurbs(curve),
                    Err(_) => self.clone(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtk_math::dvec2;

    #[test]
    fn test_endpoints_and_bounds() {
        let arc = TrimSegment::Bezier(
            BezierCurve2::new(vec![dvec2(0.0, 0.0), dvec2(1.0, 2.0), dvec2(2.0, 0.0)]).unwrap(),
        );
        assert_eq!(arc.start(), dvec2(0.0, 0.0));
        assert_eq!(arc.end(), dvec2(2.0, 0.0));
        let b = arc.bounds();
        assert_eq!(b.max, dvec2(2.0, 2.0));

        let line = TrimSegment::line(dvec2(3.0, -1.0), dvec2(1.0, 4.0));
        let b = line.bounds();
        assert_eq!(b.min, dvec2(1.0, -1.0));
        assert_eq!(b.max, dvec2(3.0, 4.0));
    }

    #[test]
    fn test_reversed() {
        let spline = BSplineCurve2::new(
            2,
            vec![0.0, 0.0, 0.0, 1.0, 3.0, 3.0, 3.0],
            vec![dvec2(0.0, 0.0), dvec2(1.0, 2.0), dvec2(3.0, 2.0), dvec2(4.0, 0.0)],
        )
        .unwrap();
        let seg = TrimSegment::Nurbs(spline.clone());
        let rev = seg.reversed();
        assert_eq!(rev.start(), seg.end());
        assert_eq!(rev.end(), seg.start());
        if let TrimSegment::Nurbs(r) = &rev {
            assert_eq!(r.knots(), &[0.0, 0.0, 0.0, 2.0, 3.0, 3.0, 3.0]);
            let p = r.point_at(1.0);
            let q = spline.point_at(2.0);
            assert!((p - q).length() < 1e-12);
        } else {
            panic!("reversed NURBS changed kind");
        }
    }
}
