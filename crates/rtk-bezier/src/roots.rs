//! Intersections of a planar Bézier curve with a ray.
//!
//! The control polygon is classified against the ray's supporting line. A
//! polygon that crosses it exactly once and is flat enough is replaced by its
//! chord; anything else is split at t = 0.5 and both halves are revisited.
//! Halves live in a slotmap arena and are visited from an explicit stack, so
//! a pathological curve costs memory proportional to the depth bound rather
//! than native stack frames.

use rtk_core::{DiagEvent, QueryContext};
use rtk_math::{cross2, Point2, Vector2};
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::curve::BezierCurve2;

new_key_type! {
    struct PieceKey;
}

/// A 2-D ray with a precomputed normal to its direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Ray2Parts")]
pub struct Ray2 {
    pub origin: Point2,
    pub direction: Vector2,
    /// Perpendicular to `direction`; the sign of `dot(p - origin, perp)`
    /// tells which side of the ray's line `p` lies on.
    pub perp: Vector2,
}

#[derive(Deserialize)]
struct Ray2Parts {
    origin: Point2,
    direction: Vector2,
}

impl From<Ray2Parts> for Ray2 {
    fn from(parts: Ray2Parts) -> Self {
        Self::new(parts.origin, parts.direction)
    }
}

impl Ray2 {
    pub fn new(origin: Point2, direction: Vector2) -> Self {
        Self {
            origin,
            direction,
            perp: direction.perp(),
        }
    }

    /// Signed distance (scaled by `|perp|`) of `p` from the ray's line.
    #[inline]
    pub fn side(&self, p: Point2) -> f64 {
        (p - self.origin).dot(self.perp)
    }
}

/// One crossing of the curve with the ray's line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intercept {
    pub point: Point2,
    /// Right-hand perpendicular of the local tangent; not unit length.
    pub normal: Vector2,
}

struct Piece {
    curve: BezierCurve2,
    depth: usize,
}

/// All crossings of `curve` with the line through `ray`, in parameter order.
///
/// Flatness is judged against `ctx.tol.dist`. Subdivision stops at
/// `max_depth`; a piece still crossing there is reported at its chord
/// midpoint and a [`DiagEvent::DepthExhausted`] is recorded. Crossings
/// closer than `ctx.tol.dist` to the previous one are reported once.
pub fn find_roots(
    curve: &BezierCurve2,
    ray: &Ray2,
    ctx: &QueryContext<'_>,
    max_depth: usize,
) -> Vec<Intercept> {
    let mut arena: SlotMap<PieceKey, Piece> = SlotMap::with_key();
    let mut stack = vec![arena.insert(Piece {
        curve: curve.clone(),
        depth: 0,
    })];
    let mut found: Vec<Intercept> = Vec::new();

    while let Some(key) = stack.pop() {
        let Some(piece) = arena.remove(key) else {
            continue;
        };

        let sides: Vec<f64> = piece.curve.points().iter().map(|p| ray.side(*p)).collect();
        let crossings = crossing_count(&sides);
        if crossings == 0 {
            continue;
        }

        if piece.depth >= max_depth {
            ctx.record(DiagEvent::DepthExhausted {
                stage: "bezier roots",
                depth: piece.depth,
            });
            let point = (piece.curve.start() + piece.curve.end()) * 0.5;
            push_dedup(&mut found, Intercept { point, normal: end_normal(&piece.curve) }, ctx);
            continue;
        }

        if crossings == 1 && flat_enough(&piece.curve, ctx.tol.dist) {
            match chord_intercept(&piece.curve, ray) {
                Some(point) => {
                    push_dedup(&mut found, Intercept { point, normal: end_normal(&piece.curve) }, ctx)
                }
                None => ctx.record(DiagEvent::DegenerateIntercept {
                    stage: "bezier roots",
                }),
            }
            continue;
        }

        let depth = piece.depth + 1;
        let (left, right) = piece.curve.split_into();
        // Right goes on the stack first so the left half is visited first.
        stack.push(arena.insert(Piece { curve: right, depth }));
        stack.push(arena.insert(Piece { curve: left, depth }));
    }

    found
}

fn push_dedup(found: &mut Vec<Intercept>, hit: Intercept, ctx: &QueryContext<'_>) {
    if let Some(last) = found.last() {
        if last.point.distance_squared(hit.point) < ctx.tol.dist_sq {
            return;
        }
    }
    found.push(hit);
}

/// Sign changes along a sequence of signed distances. Zero counts as
/// positive.
pub fn crossing_count(sides: &[f64]) -> usize {
    sides
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count()
}

/// Whether replacing the curve by its chord moves it by less than `epsilon`.
///
/// Uses half the spread between the extreme signed distances of the
/// interior control points from the chord.
pub fn flat_enough(curve: &BezierCurve2, epsilon: f64) -> bool {
    let points = curve.points();
    if points.len() <= 2 {
        return true;
    }
    let start = curve.start();
    let chord = curve.end() - start;
    let len = chord.length();
    if len == 0.0 {
        // Closed polygon; only flat when every point sits on the endpoint.
        return points.iter().all(|p| p.distance(start) < epsilon);
    }

    let (mut above, mut below) = (0.0_f64, 0.0_f64);
    for p in &points[1..points.len() - 1] {
        let d = cross2(chord, *p - start) / len;
        above = above.max(d);
        below = below.min(d);
    }
    (above - below) * 0.5 < epsilon
}

/// Where the chord of `curve` meets the ray's line, clamped to the chord.
/// `None` when the two are parallel.
pub fn chord_intercept(curve: &BezierCurve2, ray: &Ray2) -> Option<Point2> {
    let start = curve.start();
    let chord = curve.end() - start;
    let denom = cross2(chord, ray.direction);
    let scale = chord.length() * ray.direction.length();
    if denom.abs() <= f64::EPSILON * scale {
        return None;
    }
    let s = (cross2(ray.origin - start, ray.direction) / denom).clamp(0.0, 1.0);
    Some(start + chord * s)
}

fn end_normal(curve: &BezierCurve2) -> Vector2 {
    let points = curve.points();
    let n = points.len();
    let mut tangent = if n >= 2 {
        points[n - 1] - points[n - 2]
    } else {
        Vector2::ZERO
    };
    if tangent.length_squared() == 0.0 {
        tangent = curve.end() - curve.start();
    }
    Vector2::new(tangent.y, -tangent.x)
}
