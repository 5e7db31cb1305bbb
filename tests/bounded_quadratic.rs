use pwquad::prelude::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn shift_identity_holds_pointwise() {
    let f = BoundedQuadratic::new(-3.0, 4.0, 2.0, -1.0, 5.0);
    let delta = 2.25;
    let g = f.shift(delta);
    for x in [-3.0, -1.0, 0.5, 2.0, 4.0] {
        assert!(approx(g.eval(x + delta), f.eval(x)));
    }
}

#[test]
fn scale_identity_holds_pointwise() {
    let f = BoundedQuadratic::new(-3.0, 4.0, 2.0, -1.0, 5.0);
    for alpha in [3.0, -3.0, 0.25, -0.25] {
        let g = f.scale(alpha);
        for x in [-3.0, -1.0, 0.5, 2.0, 4.0] {
            assert!(approx(g.eval(x / alpha), f.eval(x)));
        }
    }
}

#[test]
fn perspective_identity_holds_pointwise() {
    let f = BoundedQuadratic::new(-3.0, 4.0, 2.0, -1.0, 5.0);
    for alpha in [3.0, -3.0] {
        let g = f.perspective(alpha);
        for x in [-3.0, -1.0, 0.5, 2.0, 4.0] {
            assert!(approx(g.eval(alpha * x), alpha * f.eval(x)));
        }
    }
}

#[test]
fn tilt_identity_holds_pointwise() {
    let f = BoundedQuadratic::new(-3.0, 4.0, 2.0, -1.0, 5.0);
    let alpha = -2.5;
    let g = f.tilt(alpha);
    for x in [-3.0, -1.0, 0.5, 2.0, 4.0] {
        assert!(approx(g.eval(x), f.eval(x) + alpha * x));
    }
}

#[test]
fn reverse_identity_holds_on_reflected_domain() {
    let f = BoundedQuadratic::new(-3.0, 4.0, 2.0, -1.0, 5.0);
    let g = f.reverse();
    assert_eq!(g.lb, -4.0);
    assert_eq!(g.ub, 3.0);
    for x in [-4.0, -1.0, 0.5, 3.0] {
        assert!(approx(g.eval(x), f.eval(-x)));
    }
}

#[test]
fn minimize_interior_vertex_branch() {
    let f = BoundedQuadratic::new(-100.0, 100.0, 4.0, -8.0, 1.0);
    let (x, v) = f.minimize();
    // vertex of 4x^2 - 8x + 1 is at x = 1.
    assert!(approx(x, 1.0));
    assert!(approx(v, f.eval(1.0)));
}

#[test]
fn minimize_affine_decreasing_branch() {
    let f = BoundedQuadratic::new(-2.0, 5.0, 0.0, -3.0, 0.0);
    let (x, v) = f.minimize();
    assert!(approx(x, 5.0));
    assert!(approx(v, f.eval(5.0)));
}

#[test]
fn minimize_affine_decreasing_unbounded_branch() {
    let f = BoundedQuadratic::new(-2.0, f64::INFINITY, 0.0, -3.0, 0.0);
    let (x, v) = f.minimize();
    assert!(x.is_nan());
    assert_eq!(v, f64::NEG_INFINITY);
}

#[test]
fn minimize_constant_branch_prefers_finite_lb() {
    let f = BoundedQuadratic::new(2.0, 9.0, 0.0, 0.0, 7.0);
    let (x, v) = f.minimize();
    assert_eq!(x, 2.0);
    assert_eq!(v, 7.0);
}

#[test]
fn tangent_matches_value_and_slope_at_basepoint() {
    let f = BoundedQuadratic::new(-10.0, 10.0, 3.0, -2.0, 1.0);
    for x0 in [-5.0, 0.0, 2.5] {
        let t = f.tangent(x0);
        assert!(approx(t.eval(x0), f.eval(x0)));
        let h = 1e-4;
        let slope_f = (f.eval(x0 + h) - f.eval(x0 - h)) / (2.0 * h);
        let slope_t = (t.eval(x0 + h) - t.eval(x0 - h)) / (2.0 * h);
        assert!((slope_f - slope_t).abs() < 1e-4);
    }
}

#[test]
fn get_line_passes_through_both_points() {
    let line = line_through(1.0, 2.0, 4.0, 8.0);
    assert!(approx(line.eval(1.0), 2.0));
    assert!(approx(line.eval(4.0), 8.0));
}

#[test]
fn derivative_matches_finite_difference() {
    let f = BoundedQuadratic::new(-10.0, 10.0, 2.0, 3.0, -1.0);
    let df = f.derivative();
    let h = 1e-4;
    for x in [-5.0, 0.0, 3.0] {
        let numeric = (f.eval(x + h) - f.eval(x - h)) / (2.0 * h);
        assert!((df.eval(x) - numeric).abs() < 1e-3);
    }
}

#[test]
fn intersect_three_bqs_scenario() {
    let f = BoundedQuadratic::new(0.0, 10.0, 1.0, 2.0, 4.0);
    let g = BoundedQuadratic::new(1.0, 9.0, 1.0, 2.0, 5.0);
    let h = BoundedQuadratic::new(2.0, 8.0, 1.0, 2.0, 5.0);

    let out = intersect(&[f, g, h]);
    assert!(out.valid);
    for p in &out.pieces {
        assert_eq!(p.lb, 2.0);
        assert_eq!(p.ub, 8.0);
    }

    let h2 = BoundedQuadratic::new(20.0, 30.0, 1.0, 2.0, 5.0);
    let out2 = intersect(&[f, g, h2]);
    assert!(!out2.valid);
}

#[test]
#[should_panic]
fn scale_by_zero_panics() {
    let f = BoundedQuadratic::new(-1.0, 1.0, 1.0, 0.0, 0.0);
    let _ = f.scale(0.0);
}

#[test]
#[should_panic]
fn perspective_by_zero_panics() {
    let f = BoundedQuadratic::new(-1.0, 1.0, 1.0, 0.0, 0.0);
    let _ = f.perspective(0.0);
}

#[test]
#[should_panic]
fn get_line_with_equal_x_panics() {
    let _ = line_through(3.0, 1.0, 3.0, 2.0);
}

#[test]
fn restrict_dom_shrinks_to_the_intersection() {
    let f = BoundedQuadratic::new(-5.0, 5.0, 1.0, 0.0, 0.0);
    let g = f.restrict_dom(Interval::new(-1.0, 2.0));
    assert_eq!(g.lb, -1.0);
    assert_eq!(g.ub, 2.0);
}

#[test]
#[should_panic]
fn restrict_dom_to_empty_panics() {
    let f = BoundedQuadratic::new(-5.0, 5.0, 1.0, 0.0, 0.0);
    let _ = f.restrict_dom(Interval::new(10.0, 20.0));
}
