use crate::error::{Result, RtkError};
use crate::traits::Validate;

/// Distance and angular tolerances shared by every query.
///
/// `dist_sq` and `para` are derived from `dist` and `perp` by [`Tolerance::new`]
/// and are kept alongside so hot loops never recompute them.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Two points closer than this are the same point (model units).
    pub dist: f64,
    /// `dist * dist`.
    pub dist_sq: f64,
    /// `|cos|` at or below this means perpendicular.
    pub perp: f64,
    /// `|cos|` at or above this means parallel (`1 - perp`).
    pub para: f64,
}

impl Tolerance {
    pub const DEFAULT_DIST: f64 = 0.0005;
    pub const DEFAULT_PERP: f64 = 1e-6;

    pub fn new(dist: f64, perp: f64) -> Self {
        Self {
            dist,
            dist_sq: dist * dist,
            perp,
            para: 1.0 - perp,
        }
    }

    pub fn default_precision() -> Self {
        Self::new(Self::DEFAULT_DIST, Self::DEFAULT_PERP)
    }

    pub fn loose() -> Self {
        Self::new(1e-3, 1e-4)
    }

    pub fn tight() -> Self {
        Self::new(1e-10, 1e-12)
    }

    /// Check if a value is zero within distance tolerance
    pub fn is_zero(&self, v: f64) -> bool {
        near_zero(v, self.dist)
    }

    /// Check if two values are equal within distance tolerance
    pub fn dist_eq(&self, a: f64, b: f64) -> bool {
        near_equal(a, b, self.dist)
    }

    /// Check if a squared distance is below `dist_sq`.
    pub fn is_zero_sq(&self, magsq: f64) -> bool {
        magsq < self.dist_sq
    }

    /// Cosine of the angle between two vectors classifies them as perpendicular.
    pub fn is_perpendicular_cos(&self, cos: f64) -> bool {
        cos.abs() <= self.perp
    }

    /// Cosine of the angle between two vectors classifies them as parallel
    /// (or anti-parallel).
    pub fn is_parallel_cos(&self, cos: f64) -> bool {
        cos.abs() >= self.para
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::default_precision()
    }
}

impl Validate for Tolerance {
    fn validate(&self) -> Result<()> {
        if !(self.dist.is_finite() && self.dist > 0.0) {
            return Err(RtkError::Tolerance(format!(
                "dist must be positive, got {}",
                self.dist
            )));
        }
        if !near_equal(self.dist_sq, self.dist * self.dist, f64::EPSILON * self.dist_sq.max(1.0)) {
            return Err(RtkError::Tolerance(format!(
                "dist_sq {} does not match dist {}",
                self.dist_sq, self.dist
            )));
        }
        if !(self.perp > 0.0 && self.perp < 1.0) {
            return Err(RtkError::Tolerance(format!(
                "perp must lie in (0, 1), got {}",
                self.perp
            )));
        }
        if !near_equal(self.para, 1.0 - self.perp, f64::EPSILON * 4.0) {
            return Err(RtkError::Tolerance(format!(
                "para {} is not 1 - perp ({})",
                self.para, self.perp
            )));
        }
        Ok(())
    }
}

#[inline]
pub fn near_zero(v: f64, eps: f64) -> bool {
    v > -eps && v < eps
}

#[inline]
pub fn near_equal(a: f64, b: f64, eps: f64) -> bool {
    near_zero(a - b, eps)
}

/// Relative difference `|a - b| / max(|a|, |b|)`, zero when both are zero.
pub fn rel_diff(a: f64, b: f64) -> f64 {
    let scale = a.abs().max(b.abs());
    if scale == 0.0 {
        0.0
    } else {
        (a - b).abs() / scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_fields() {
        let tol = Tolerance::new(0.01, 1e-5);
        assert!((tol.dist_sq - 1e-4).abs() < 1e-18);
        assert!((tol.para - (1.0 - 1e-5)).abs() < 1e-15);
        tol.validate().unwrap();
    }

    #[test]
    fn test_presets_validate() {
        Tolerance::default_precision().validate().unwrap();
        Tolerance::loose().validate().unwrap();
        Tolerance::tight().validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(Tolerance::new(0.0, 1e-6).validate().is_err());
        assert!(Tolerance::new(1e-3, 1.5).validate().is_err());

        let mut tol = Tolerance::default();
        tol.dist_sq = 1.0;
        assert!(tol.validate().is_err());
    }

    #[test]
    fn test_near_zero_is_strict() {
        assert!(near_zero(0.0, 1e-6));
        assert!(near_zero(-9e-7, 1e-6));
        assert!(!near_zero(1e-6, 1e-6));
    }

    #[test]
    fn test_perp_para_classification() {
        let tol = Tolerance::new(1e-4, 1e-3);
        assert!(tol.is_perpendicular_cos(5e-4));
        assert!(!tol.is_perpendicular_cos(0.1));
        assert!(tol.is_parallel_cos(-0.9999));
        assert!(!tol.is_parallel_cos(0.9));
    }

    #[test]
    fn test_rel_diff() {
        assert_eq!(rel_diff(0.0, 0.0), 0.0);
        assert!((rel_diff(10.0, 9.0) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_serde_round_trip() {
        let tol = Tolerance::loose();
        let json = serde_json::to_string(&tol).unwrap();
        let back: Tolerance = serde_json::from_str(&json).unwrap();
        assert!(rel_diff(tol.dist, back.dist) < 1e-15);
        assert!(rel_diff(tol.perp, back.perp) < 1e-15);
        assert!(back.validate().is_ok());
    }
}
