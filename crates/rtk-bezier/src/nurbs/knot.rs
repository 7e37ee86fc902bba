//! Knot vector utilities: span search, basis functions, Boehm insertion.

use rtk_math::DVec3;

/// Span index `i` with `knots[i] <= t < knots[i + 1]`, held to
/// `degree..=n` so the ends of a clamped domain resolve to a real span.
/// `n` is the last control point index.
pub fn find_span(degree: usize, knots: &[f64], n: usize, t: f64) -> usize {
    degree + knots[degree + 1..=n].partition_point(|&k| k <= t)
}

/// Values of the `degree + 1` basis functions that can be nonzero on
/// `span`, lowest index first.
pub fn basis_functions(degree: usize, knots: &[f64], span: usize, t: f64) -> Vec<f64> {
    let mut basis = Vec::with_capacity(degree + 1);
    basis.push(1.0);
    for j in 1..=degree {
        // Raise the j live functions from degree j - 1 to j.
        let mut carry = 0.0;
        for (r, value) in basis.iter_mut().enumerate() {
            let lo = knots[span + r + 1 - j];
            let hi = knots[span + r + 1];
            let term = *value / (hi - lo);
            *value = carry + (hi - t) * term;
            carry = (t - lo) * term;
        }
        basis.push(carry);
    }
    basis
}

/// How many times `u` occurs in `knots`.
pub fn multiplicity(knots: &[f64], u: f64) -> usize {
    knots.iter().filter(|&&k| k == u).count()
}

/// Insert `u` once into a curve with homogeneous control points.
///
/// `u` must lie strictly inside the parameter domain. Returns the new knot
/// vector and control points; the curve shape is unchanged.
pub fn insert_knot(degree: usize, knots: &[f64], points: &[DVec3], u: f64) -> (Vec<f64>, Vec<DVec3>) {
    let n = points.len() - 1;
    let k = find_span(degree, knots, n, u);
    let s = multiplicity(knots, u);

    let mut inserted = Vec::with_capacity(points.len() + 1);
    for i in 0..=n + 1 {
        let q = if i + degree <= k {
            points[i]
        } else if i + s > k {
            points[i - 1]
        } else {
            let alpha = (u - knots[i]) / (knots[i + degree] - knots[i]);
            points[i] * alpha + points[i - 1] * (1.0 - alpha)
        };
        inserted.push(q);
    }

    let mut new_knots = Vec::with_capacity(knots.len() + 1);
    new_knots.extend_from_slice(&knots[..=k]);
    new_knots.push(u);
    new_knots.extend_from_slice(&knots[k + 1..]);
    (new_knots, inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_find_span() {
        let knots = [0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 3.0, 3.0];
        assert_eq!(find_span(2, &knots, 4, 0.0), 2);
        assert_eq!(find_span(2, &knots, 4, 0.5), 2);
        assert_eq!(find_span(2, &knots, 4, 1.0), 3);
        assert_eq!(find_span(2, &knots, 4, 2.5), 4);
        assert_eq!(find_span(2, &knots, 4, 3.0), 4);

        // Doubled interior knot: t on it selects the later span.
        let doubled = [0.0, 0.0, 0.0, 0.5, 0.5, 1.0, 1.0, 1.0];
        assert_eq!(find_span(2, &doubled, 4, 0.5), 4);
        assert_eq!(find_span(2, &doubled, 4, 0.25), 2);
    }

    #[test]
    fn test_partition_of_unity() {
        let knots = [0.0, 0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0, 1.0];
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let span = find_span(3, &knots, 4, t);
            let sum: f64 = basis_functions(3, &knots, span, t).iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_insert_into_bezier() {
        // Inserting 0.5 into a single quadratic span matches de Casteljau's
        // first level.
        let knots = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let pts = [
            DVec3::new(0.0, 0.0, 1.0),
            DVec3::new(1.0, 2.0, 1.0),
            DVec3::new(2.0, 0.0, 1.0),
        ];
        let (k, q) = insert_knot(2, &knots, &pts, 0.5);
        assert_eq!(k, vec![0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0]);
        assert_eq!(q.len(), 4);
        assert_eq!(q[0], pts[0]);
        assert!((q[1] - DVec3::new(0.5, 1.0, 1.0)).length() < 1e-12);
        assert!((q[2] - DVec3::new(1.5, 1.0, 1.0)).length() < 1e-12);
        assert_eq!(q[3], pts[2]);
        assert_eq!(multiplicity(&k, 0.5), 1);
    }
}
