use std::f64::consts::PI;

use rtk_math::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Which part of a solid's boundary a hit lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitSurface {
    Sphere,
    RecBody,
    /// End plate at the base vertex (z = 0 in the unit cylinder).
    RecBottom,
    /// End plate at V + H (z = 1).
    RecTop,
}

/// One boundary crossing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Signed distance along the ray; negative when behind the origin.
    pub dist: f64,
    pub point: Point3,
    /// Outward normal. Not necessarily unit length; see [`Hit::unit_normal`].
    pub normal: Vector3,
    pub surface: HitSurface,
    /// Hit position in the solid's canonical frame (unit sphere or unit cylinder).
    pub local: Point3,
}

impl Hit {
    pub fn unit_normal(&self) -> Vector3 {
        self.normal.normalize_or_zero()
    }

    /// Surface parameters in [0, 1) x [0, 1].
    ///
    /// Sphere: longitude fraction and polar fraction measured from the south
    /// pole. Cylinder body: angle fraction and height. End plates: angle
    /// fraction and radial fraction.
    pub fn uv(&self) -> Point2 {
        let l = self.local;
        let u = angle_fraction(l.y, l.x);
        match self.surface {
            HitSurface::Sphere => Point2::new(u, (-l.z).clamp(-1.0, 1.0).acos() / PI),
            HitSurface::RecBody => Point2::new(u, l.z.clamp(0.0, 1.0)),
            HitSurface::RecBottom | HitSurface::RecTop => {
                Point2::new(u, (l.x * l.x + l.y * l.y).sqrt().min(1.0))
            }
        }
    }
}

/// `atan2(y, x)` mapped to [0, 1).
fn angle_fraction(y: f64, x: f64) -> f64 {
    let u = y.atan2(x) / (2.0 * PI);
    if u < 0.0 {
        u + 1.0
    } else {
        u
    }
}

/// Entry and exit crossings of a closed convex solid, `entry.dist <= exit.dist`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitPair {
    pub entry: Hit,
    pub exit: Hit,
}

impl HitPair {
    /// Order two crossings so the nearer one is the entry.
    pub fn ordered(a: Hit, b: Hit) -> Self {
        if a.dist <= b.dist {
            Self { entry: a, exit: b }
        } else {
            Self { entry: b, exit: a }
        }
    }

    /// Length of the ray segment inside the solid.
    pub fn thickness(&self) -> f64 {
        self.exit.dist - self.entry.dist
    }
}
