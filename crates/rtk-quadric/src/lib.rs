//! Ray intersection with prepped quadric solids.
//!
//! A solid is prepped once from its general description ([`Ellipsoid`] or
//! [`Tgc`]) into a canonical [`QuadricSolid`]; prep refuses anything that has
//! no fast path. Prepped solids are immutable and shared by reference across
//! threads, and [`shoot`] keeps no state between calls.

mod hit;
mod prep;
mod rec;
mod solid;
mod sphere;

pub use hit::{Hit, HitPair, HitSurface};
pub use prep::{Ellipsoid, Primitive, Tgc};
pub use rec::RecSolid;
pub use solid::{shoot, shoot_many, QuadricSolid};
pub use sphere::SphereSolid;
