//! Trimming-curve classification.
//!
//! A point in a surface's (u, v) parameter plane is inside a trimming loop
//! when a ray from it in +u crosses the loop an odd number of times. Each
//! segment's control polygon is first sorted into quadrants around the point;
//! most segments are then settled without touching the curve, and the rest
//! are split until they are.

pub mod classify;
pub mod quadrant;
pub mod segment;
pub mod trim_loop;

pub use classify::{crossings, point_in_loop, segment_crossings, Containment, Crossings, TrimRegion};
pub use quadrant::{Quadrant, QuadrantMask, TrimCase};
pub use segment::TrimSegment;
pub use trim_loop::{TrimLoop, TrimLoopBuilder};
