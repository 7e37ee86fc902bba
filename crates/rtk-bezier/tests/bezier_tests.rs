use approx::assert_relative_eq;
use rtk_bezier::{find_roots, BSplineCurve2, BezierCurve2, Ray2};
use rtk_core::{CollectDiagnostics, DiagEvent, QueryContext, Tolerance, MAX_DEPTH};
use rtk_math::dvec2;

fn arch() -> BezierCurve2 {
    BezierCurve2::new(vec![dvec2(0.0, 0.0), dvec2(1.0, 2.0), dvec2(2.0, 0.0)]).unwrap()
}

#[test]
fn test_tangent_line_reports_one_intercept() {
    let tol = Tolerance::default();
    let ctx = QueryContext::new(&tol);
    let ray = Ray2::new(dvec2(-1.0, 1.0), dvec2(1.0, 0.0));

    let roots = find_roots(&arch(), &ray, &ctx, MAX_DEPTH);
    assert_eq!(roots.len(), 1);
    assert!((roots[0].point - dvec2(1.0, 1.0)).length() < 1e-3);
}

#[test]
fn test_miss_reports_nothing() {
    let tol = Tolerance::default();
    let ctx = QueryContext::new(&tol);
    let ray = Ray2::new(dvec2(-1.0, 1.5), dvec2(1.0, 0.0));
    assert!(find_roots(&arch(), &ray, &ctx, MAX_DEPTH).is_empty());
}

#[test]
fn test_slanted_ray() {
    let tol = Tolerance::default();
    let ctx = QueryContext::new(&tol);
    // y = x meets the arch at t = 0 and t = 1/2. The start point sits on
    // the line and counts as the positive side, so only (1, 1) is a crossing.
    let ray = Ray2::new(dvec2(-1.0, -1.0), dvec2(1.0, 1.0));
    let roots = find_roots(&arch(), &ray, &ctx, MAX_DEPTH);
    assert_eq!(roots.len(), 1);
    assert!((roots[0].point - dvec2(1.0, 1.0)).length() < 2e-3);
}

#[test]
fn test_never_flat_curve_terminates() {
    let tol = Tolerance::new(0.0, 1e-6);
    let sink = CollectDiagnostics::new();
    let ctx = QueryContext::new(&tol).with_diagnostics(&sink);
    let curve =
        BezierCurve2::new(vec![dvec2(0.0, -1.0), dvec2(1.0, 3.0), dvec2(2.0, 1.0)]).unwrap();
    let ray = Ray2::new(dvec2(-1.0, 0.0), dvec2(1.0, 0.0));

    let shallow = find_roots(&curve, &ray, &ctx, 20);
    assert!(!shallow.is_empty());
    assert!(shallow.iter().all(|r| r.point.y.abs() < 1e-4));
    assert!(sink.count_where(|e| matches!(e, DiagEvent::DepthExhausted { .. })) >= 1);

    let deep = find_roots(&curve, &ray, &ctx, MAX_DEPTH);
    assert!(deep.len() <= 2);
    assert!(deep.iter().all(|r| r.point.y.abs() < 1e-6));
}

#[test]
fn test_subdivide_then_join() {
    let tol = Tolerance::default();
    let curve = BezierCurve2::rational(
        vec![dvec2(0.0, 0.0), dvec2(1.0, 3.0), dvec2(2.0, -2.0), dvec2(3.0, 1.0)],
        vec![1.0, 0.5, 2.0, 1.0],
    )
    .unwrap();
    let (left, right) = curve.split();
    let joined = BezierCurve2::join(&left, &right, &tol).unwrap();
    for (a, b) in joined.points().iter().zip(curve.points()) {
        assert!((*a - *b).length() < 1e-10);
    }
    for (a, b) in joined.weights().unwrap().iter().zip(curve.weights().unwrap()) {
        assert_relative_eq!(a, b, epsilon = 1e-10);
    }
}

#[test]
fn test_roots_across_bspline_pieces() {
    let tol = Tolerance::default();
    let ctx = QueryContext::new(&tol);
    let spline = BSplineCurve2::new(
        2,
        vec![0.0, 0.0, 0.0, 1.0, 2.0, 2.0, 2.0],
        vec![dvec2(0.0, 0.0), dvec2(1.0, 2.0), dvec2(3.0, 2.0), dvec2(4.0, 0.0)],
    )
    .unwrap();
    let ray = Ray2::new(dvec2(-1.0, 0.5), dvec2(1.0, 0.0));

    let roots: Vec<_> = spline
        .to_bezier()
        .iter()
        .flat_map(|piece| find_roots(piece, &ray, &ctx, MAX_DEPTH))
        .collect();
    assert_eq!(roots.len(), 2);
    assert!(roots[0].point.x < 2.0 && roots[1].point.x > 2.0);
    for r in &roots {
        assert_relative_eq!(r.point.y, 0.5, epsilon = 1e-9);
    }
}

#[test]
fn test_curve_serde_round_trip() {
    let curve = BezierCurve2::rational(
        vec![dvec2(1.0, 0.0), dvec2(1.0, 1.0), dvec2(0.0, 1.0)],
        vec![1.0, std::f64::consts::FRAC_1_SQRT_2, 1.0],
    )
    .unwrap();
    let json = serde_json::to_string(&curve).unwrap();
    let back: BezierCurve2 = serde_json::from_str(&json).unwrap();
    assert_eq!(back.degree(), 2);
    assert!(back.is_rational());
    for i in 0..=4 {
        let t = i as f64 / 4.0;
        assert!((back.point_at(t) - curve.point_at(t)).length() < 1e-12);
    }
}
