use rtk_core::traits::BoundingBox;
use rtk_core::{DiagEvent, QueryContext, Result, RtkError};
use rtk_math::{Aabb3, Point3, Ray};
use serde::{Deserialize, Serialize};

use crate::hit::HitPair;
use crate::prep::{Ellipsoid, Primitive, Tgc};
use crate::rec::RecSolid;
use crate::sphere::SphereSolid;

/// A prepped solid with a closed-form intersector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuadricSolid {
    Sphere(SphereSolid),
    Rec(RecSolid),
}

impl QuadricSolid {
    /// Classify `primitive` and precompute everything the shot needs.
    ///
    /// Rejections are also reported to the context's diagnostics sink.
    pub fn prep(primitive: &Primitive, ctx: &QueryContext<'_>) -> Result<Self> {
        let prepped = match primitive {
            Primitive::Ellipsoid(e) => e.prep(ctx.tol).map(QuadricSolid::Sphere),
            Primitive::Tgc(t) => t.prep(ctx.tol).map(QuadricSolid::Rec),
        };
        prepped.map_err(|err| {
            ctx.record(DiagEvent::PrepRejected {
                solid: primitive.kind(),
                reason: err.to_string(),
            });
            RtkError::from(err)
        })
    }

    pub fn prep_ellipsoid(ellipsoid: Ellipsoid, ctx: &QueryContext<'_>) -> Result<Self> {
        Self::prep(&Primitive::Ellipsoid(ellipsoid), ctx)
    }

    pub fn prep_tgc(tgc: Tgc, ctx: &QueryContext<'_>) -> Result<Self> {
        Self::prep(&Primitive::Tgc(tgc), ctx)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            QuadricSolid::Sphere(_) => "sph",
            QuadricSolid::Rec(_) => "rec",
        }
    }

    pub fn bounds(&self) -> Aabb3 {
        match self {
            QuadricSolid::Sphere(s) => s.bounds(),
            QuadricSolid::Rec(r) => r.bounds(),
        }
    }

    /// Radius of a sphere about the box center enclosing the solid.
    pub fn bounding_radius(&self) -> f64 {
        match self {
            QuadricSolid::Sphere(s) => s.radius(),
            QuadricSolid::Rec(r) => r.bounds().half_diagonal(),
        }
    }

    pub fn center(&self) -> Point3 {
        match self {
            QuadricSolid::Sphere(s) => s.center(),
            QuadricSolid::Rec(r) => r.bounds().center(),
        }
    }

    fn is_finite(&self) -> bool {
        match self {
            QuadricSolid::Sphere(s) => s.is_finite(),
            QuadricSolid::Rec(r) => r.is_finite(),
        }
    }
}

impl BoundingBox for QuadricSolid {
    type Point = Point3;

    fn bounding_box(&self) -> (Point3, Point3) {
        let b = self.bounds();
        (b.min, b.max)
    }
}

/// Shoot one ray at a prepped solid.
///
/// Returns the entry/exit pair, `None` on a miss. Distances are signed, so
/// a ray starting inside the solid reports a negative entry.
pub fn shoot(ray: &Ray, solid: &QuadricSolid, ctx: &QueryContext<'_>) -> Result<Option<HitPair>> {
    debug_assert!(solid.is_finite(), "prepped solid has non-finite fields");
    match solid {
        QuadricSolid::Sphere(s) => Ok(s.shoot(ray)),
        QuadricSolid::Rec(r) => report_failure(solid, r.shoot(ray, ctx.tol), ctx),
    }
}

/// Pass `result` through, recording a hit-count failure to the sink.
fn report_failure(
    solid: &QuadricSolid,
    result: Result<Option<HitPair>>,
    ctx: &QueryContext<'_>,
) -> Result<Option<HitPair>> {
    result.map_err(|err| {
        if let RtkError::HitCount { distances, .. } = &err {
            ctx.record(DiagEvent::HitCount {
                solid: solid.kind(),
                distances: distances.clone(),
            });
        }
        err
    })
}

/// Shoot a bundle of rays at one solid, one result per ray in input order.
pub fn shoot_many(
    rays: &[Ray],
    solid: &QuadricSolid,
    ctx: &QueryContext<'_>,
) -> Vec<Result<Option<HitPair>>> {
    rays.iter().map(|ray| shoot(ray, solid, ctx)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::HitSurface;
    use rtk_core::{CollectDiagnostics, PrepError, Tolerance};
    use rtk_math::dvec3;

    #[test]
    fn test_prep_dispatch() {
        let tol = Tolerance::default();
        let ctx = QueryContext::new(&tol);
        let sph = QuadricSolid::prep_ellipsoid(Ellipsoid::sphere(Point3::ZERO, 2.0), &ctx).unwrap();
        assert_eq!(sph.kind(), "sph");
        let rec = QuadricSolid::prep_tgc(Tgc::rcc(Point3::ZERO, dvec3(0.0, 0.0, 4.0), 1.0), &ctx).unwrap();
        assert_eq!(rec.kind(), "rec");
    }

    #[test]
    fn test_prep_rejection_is_reported() {
        let tol = Tolerance::default();
        let sink = CollectDiagnostics::new();
        let ctx = QueryContext::new(&tol).with_diagnostics(&sink);
        let flat = Tgc::rec(Point3::ZERO, rtk_math::Vector3::ZERO, dvec3(1.0, 0.0, 0.0), dvec3(0.0, 1.0, 0.0));
        let err = QuadricSolid::prep_tgc(flat, &ctx).unwrap_err();
        assert!(matches!(err, RtkError::Prep(PrepError::ZeroLengthAxis(_))));
        assert_eq!(
            sink.count_where(|e| matches!(e, DiagEvent::PrepRejected { solid: "tgc", .. })),
            1
        );
    }

    #[test]
    fn test_bounds() {
        let tol = Tolerance::default();
        let ctx = QueryContext::new(&tol);
        let rec = QuadricSolid::prep_tgc(
            Tgc::rec(
                dvec3(1.0, 1.0, 1.0),
                dvec3(0.0, 0.0, 3.0),
                dvec3(2.0, 0.0, 0.0),
                dvec3(0.0, 1.0, 0.0),
            ),
            &ctx,
        )
        .unwrap();
        let (min, max) = rec.bounding_box();
        assert!((min - dvec3(-1.0, 0.0, 1.0)).length() < 1e-12);
        assert!((max - dvec3(3.0, 2.0, 4.0)).length() < 1e-12);
        assert!((rec.center() - dvec3(1.0, 1.0, 2.5)).length() < 1e-12);

        let sph = QuadricSolid::prep_ellipsoid(Ellipsoid::sphere(dvec3(1.0, 0.0, 0.0), 3.0), &ctx).unwrap();
        assert!((sph.bounding_radius() - 3.0).abs() < 1e-12);
        let (min, _) = sph.bounding_box();
        assert!((min - dvec3(-2.0, -3.0, -3.0)).length() < 1e-12);
    }

    #[test]
    fn test_shoot_many_keeps_order() {
        let tol = Tolerance::default();
        let ctx = QueryContext::new(&tol);
        let sph = QuadricSolid::prep_ellipsoid(Ellipsoid::sphere(Point3::ZERO, 1.0), &ctx).unwrap();
        let rays = [
            Ray::new(dvec3(0.0, 0.0, -5.0), dvec3(0.0, 0.0, 1.0)),
            Ray::new(dvec3(3.0, 0.0, -5.0), dvec3(0.0, 0.0, 1.0)),
            Ray::new(dvec3(0.0, 0.0, -2.0), dvec3(0.0, 0.0, 1.0)),
        ];
        let results = shoot_many(&rays, &sph, &ctx);
        assert_eq!(results.len(), 3);
        let first = results[0].as_ref().unwrap().unwrap();
        assert!((first.entry.dist - 4.0).abs() < 1e-12);
        assert!(results[1].as_ref().unwrap().is_none());
        let third = results[2].as_ref().unwrap().unwrap();
        assert!((third.entry.dist - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_hit_count_failure_is_reported() {
        let tol = Tolerance::default();
        let sink = CollectDiagnostics::new();
        let ctx = QueryContext::new(&tol).with_diagnostics(&sink);
        let solid = QuadricSolid::prep_tgc(Tgc::rcc(Point3::ZERO, dvec3(0.0, 0.0, 4.0), 1.0), &ctx).unwrap();
        let QuadricSolid::Rec(rec) = &solid else {
            panic!("rcc did not prep to a REC");
        };

        let ray = Ray::new(dvec3(-5.0, 0.0, 2.0), dvec3(1.0, 0.0, 0.0));
        let three = [
            (4.0, HitSurface::RecBody, dvec3(-1.0, 0.0, 0.5)),
            (5.0, HitSurface::RecBody, dvec3(0.0, 0.0, 0.5)),
            (6.0, HitSurface::RecBody, dvec3(1.0, 0.0, 0.5)),
        ];
        let result = report_failure(&solid, rec.pair_up(&ray, &three, 3), &ctx);
        assert!(matches!(result, Err(RtkError::HitCount { count: 3, .. })));
        let events = sink.events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            DiagEvent::HitCount { solid, distances } => {
                assert_eq!(*solid, "rec");
                assert_eq!(distances, &vec![4.0, 5.0, 6.0]);
            }
            other => panic!("unexpected event {other:?}"),
        }

        // A well-formed shot leaves the sink alone.
        assert!(shoot(&ray, &solid, &ctx).unwrap().is_some());
        assert_eq!(sink.events().len(), 1);
    }
}
