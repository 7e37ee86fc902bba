//! Closed trimming loops and their construction.

use rtk_core::{Result, RtkError, Tolerance};
use rtk_math::predicates::pt2_equal;
use rtk_math::{Aabb2, Point2, VertexFuse};
use serde::{Deserialize, Serialize};

use crate::segment::TrimSegment;

/// A closed chain of segments; each segment ends where the next starts and
/// the last ends where the first starts.
///
/// Frozen once built: no `&mut` access to the segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LoopParts")]
pub struct TrimLoop {
    segments: Vec<TrimSegment>,
    bounds: Aabb2,
}

/// Serialized form. Any stored `bounds` is ignored and recomputed.
#[derive(Deserialize)]
struct LoopParts {
    segments: Vec<TrimSegment>,
}

impl TryFrom<LoopParts> for TrimLoop {
    type Error = RtkError;

    fn try_from(parts: LoopParts) -> Result<Self> {
        Self::new(parts.segments, &Tolerance::default())
    }
}

impl TrimLoop {
    /// Build from segments already in traversal order.
    pub fn new(segments: Vec<TrimSegment>, tol: &Tolerance) -> Result<Self> {
        TrimLoopBuilder::from_segments(segments).build(tol)
    }

    /// Closed polyline through `points`; the closing edge is added.
    pub fn polygon(points: &[Point2], tol: &Tolerance) -> Result<Self> {
        if points.len() < 3 {
            return Err(RtkError::Geometry(format!(
                "polygon loop needs at least 3 points, got {}",
                points.len()
            )));
        }
        let mut builder = TrimLoopBuilder::new();
        for (i, p) in points.iter().enumerate() {
            builder = builder.line(*p, points[(i + 1) % points.len()]);
        }
        builder.build(tol)
    }

    pub fn segments(&self) -> &[TrimSegment] {
        &self.segments
    }

    pub fn bounds(&self) -> Aabb2 {
        self.bounds
    }

    pub fn is_closed(&self, tol: &Tolerance) -> bool {
        let n = self.segments.len();
        (0..n).all(|i| pt2_equal(self.segments[i].end(), self.segments[(i + 1) % n].start(), tol))
    }
}

/// Collects segments in any orientation and checks that they form one loop.
#[derive(Debug, Clone, Default)]
pub struct TrimLoopBuilder {
    segments: Vec<TrimSegment>,
}

impl TrimLoopBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<TrimSegment>) -> Self {
        Self { segments }
    }

    pub fn push(mut self, segment: TrimSegment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn line(self, start: Point2, end: Point2) -> Self {
        self.push(TrimSegment::line(start, end))
    }

    /// Orient and verify the chain.
    ///
    /// Endpoints within `tol.dist` of each other are fused. A segment whose
    /// end (rather than start) meets the previous segment is reversed. Fails
    /// when the chain is empty, breaks, or does not return to its start.
    pub fn build(self, tol: &Tolerance) -> Result<TrimLoop> {
        if self.segments.is_empty() {
            return Err(RtkError::Geometry("trimming loop has no segments".into()));
        }

        let endpoints: Vec<Point2> = self
            .segments
            .iter()
            .flat_map(|s| [s.start(), s.end()])
            .collect();
        let mut fuse = VertexFuse::from_points2(&endpoints, tol);

        let mut segments: Vec<TrimSegment> = Vec::with_capacity(self.segments.len());
        // Fused vertices the chain starts and currently ends at.
        let mut head = fuse.find(0);
        let mut tail = fuse.find(1);
        for (i, seg) in self.segments.into_iter().enumerate() {
            if i == 0 {
                segments.push(seg);
                continue;
            }
            let (s, e) = (fuse.find(2 * i), fuse.find(2 * i + 1));
            if i == 1 && s != tail && e != tail && (s == head || e == head) {
                // The first segment was given backwards.
                if let Some(front) = segments.pop() {
                    segments.push(front.reversed());
                }
                std::mem::swap(&mut head, &mut tail);
            }
            if s == tail {
                tail = e;
                segments.push(seg);
            } else if e == tail {
                tail = s;
                segments.push(seg.reversed());
            } else {
                return Err(RtkError::InvalidOperation(format!(
                    "trimming loop breaks before segment {i}"
                )));
            }
        }

        if tail != head {
            return Err(RtkError::InvalidOperation("trimming loop is not closed".into()));
        }

        let bounds = segments
            .iter()
            .map(TrimSegment::bounds)
            .reduce(|a, b| a.merge(&b))
            .unwrap_or(Aabb2::new(Point2::ZERO, Point2::ZERO));
        Ok(TrimLoop { segments, bounds })
    }
}
