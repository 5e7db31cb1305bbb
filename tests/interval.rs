use pwquad::prelude::*;

#[test]
fn singleton_membership_and_inclusion() {
    let point = Interval::new(2.0, 2.0);
    assert!(!point.is_empty());
    assert!(point.contains(2.0));
    assert!(!point.contains(2.0 + 1e-6));

    let wide = Interval::new(0.0, 10.0);
    assert!(wide.includes(&point));
}

#[test]
fn unbounded_intervals_contain_arbitrarily_large_points() {
    let right_ray = Interval::new(0.0, f64::INFINITY);
    assert!(right_ray.contains(1e308));
    assert!(!right_ray.contains(-1.0));

    let left_ray = Interval::new(f64::NEG_INFINITY, 0.0);
    assert!(left_ray.contains(-1e308));
    assert!(!left_ray.contains(1.0));

    assert!(Interval::whole().includes(&right_ray));
    assert!(Interval::whole().includes(&left_ray));
}

#[test]
fn disjoint_intervals_intersect_to_empty() {
    let a = Interval::new(-5.0, -1.0);
    let b = Interval::new(1.0, 5.0);
    let c = a.intersect(&b);
    assert!(c.is_empty());
}

#[test]
fn touching_at_a_point_intersects_to_a_singleton() {
    let a = Interval::new(0.0, 3.0);
    let b = Interval::new(3.0, 6.0);
    let c = a.intersect(&b);
    assert!(!c.is_empty());
    assert!(c.is_point());
    assert_eq!(c.lb, 3.0);
}

#[test]
fn strict_ordering_is_strict() {
    let a = Interval::new(0.0, 3.0);
    let b = Interval::new(3.0, 6.0);
    // touching, not strictly disjoint.
    assert!(!a.strictly_left_of(&b));
    assert!(!b.strictly_right_of(&a));

    let c = Interval::new(4.0, 6.0);
    assert!(a.strictly_left_of(&c));
    assert!(c.strictly_right_of(&a));
}

#[test]
fn approx_eq_treats_equal_infinities_as_exact() {
    let a = Interval::new(f64::NEG_INFINITY, f64::INFINITY);
    let b = Interval::new(f64::NEG_INFINITY, f64::INFINITY);
    assert!(a.approx_eq(&b));
}
