//! Quadrant classification of control points around a query point.
//!
//! The test ray leaves the query point `(u, v)` in the +u direction and runs
//! along the border between Q1 and Q4. Points on the ray's line count as
//! above it.

use std::ops::{BitOr, BitOrAssign};

use rtk_math::Point2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// `u' > u, v' >= v`
    Q1,
    /// `u' <= u, v' >= v`
    Q2,
    /// `u' <= u, v' < v`
    Q3,
    /// `u' > u, v' < v`
    Q4,
}

impl Quadrant {
    pub fn of(p: Point2, uv: Point2) -> Self {
        match (p.x > uv.x, p.y >= uv.y) {
            (true, true) => Quadrant::Q1,
            (false, true) => Quadrant::Q2,
            (false, false) => Quadrant::Q3,
            (true, false) => Quadrant::Q4,
        }
    }

    pub const fn bit(self) -> u8 {
        match self {
            Quadrant::Q1 => 1,
            Quadrant::Q2 => 2,
            Quadrant::Q3 => 4,
            Quadrant::Q4 => 8,
        }
    }
}

/// Set of quadrants occupied by a control polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct QuadrantMask(u8);

impl QuadrantMask {
    pub const EMPTY: Self = Self(0);
    pub const Q1: Self = Self(Quadrant::Q1.bit());
    pub const Q2: Self = Self(Quadrant::Q2.bit());
    pub const Q3: Self = Self(Quadrant::Q3.bit());
    pub const Q4: Self = Self(Quadrant::Q4.bit());

    /// Masks outside `0..16` are truncated to the four quadrant bits.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x0f)
    }

    pub fn from_points(points: &[Point2], uv: Point2) -> Self {
        points
            .iter()
            .fold(Self::EMPTY, |mask, p| mask | Quadrant::of(*p, uv))
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, q: Quadrant) -> bool {
        self.0 & q.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for QuadrantMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<Quadrant> for QuadrantMask {
    type Output = Self;

    fn bitor(self, rhs: Quadrant) -> Self {
        Self(self.0 | rhs.bit())
    }
}

impl BitOrAssign<Quadrant> for QuadrantMask {
    fn bitor_assign(&mut self, rhs: Quadrant) {
        self.0 |= rhs.bit();
    }
}

/// How a segment with a given quadrant mask is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrimCase {
    /// The polygon cannot reach the ray: no crossing.
    A,
    /// Every point lies right of the query point: one crossing exactly when
    /// the endpoints sit on opposite sides of the ray.
    B,
    /// Ambiguous; split and look again.
    C,
}

impl TrimCase {
    pub fn from_mask(mask: QuadrantMask) -> Self {
        use Quadrant::*;
        let has = |q| mask.contains(q);
        let all_left = !has(Q1) && !has(Q4);
        let all_above = !has(Q3) && !has(Q4);
        let all_below = !has(Q1) && !has(Q2);

        if all_left || all_above || all_below {
            TrimCase::A
        } else if mask == QuadrantMask::Q1 | QuadrantMask::Q4 {
            TrimCase::B
        } else {
            TrimCase::C
        }
    }
}
