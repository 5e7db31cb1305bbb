//! Minimization and the proximal operator (§4.H).
//!
//! Both scan a [`PiecewiseQuadratic`]'s piece list directly rather than
//! going through [`PiecewiseQuadratic::eval`]: per §9's "first match wins"
//! vs "pointwise min" note, evaluation order alone never realizes a
//! pointwise minimum, so an argmin search has to inspect every piece.

use crate::bounded_quadratic::BoundedQuadratic;
use crate::piecewise_quadratic::PiecewiseQuadratic;
use crate::tolerance::approx_le;

/// Returns `(x*, v*)`, the global minimizer and minimum value of `f` over
/// all of its pieces.
///
/// Ties (pieces whose minimum value is equal within tolerance) are broken
/// in favor of whichever piece comes first in evaluation order. An `f`
/// with no pieces has no minimizer: `(NaN, +infinity)`.
pub fn minimize(f: &PiecewiseQuadratic) -> (f64, f64) {
    let mut best: Option<(f64, f64)> = None;
    for piece in f.pieces() {
        let (x, v) = piece.minimize();
        best = match best {
            None => Some((x, v)),
            Some((_, best_v)) if v < best_v => Some((x, v)),
            Some(prev) => Some(prev),
        };
    }
    best.unwrap_or((f64::NAN, f64::INFINITY))
}

/// The proximal operator of `f` at `u` with parameter `rho`: the argmin
/// over `x in dom(f)` of `f(x) + (rho/2)*(x - u)^2`.
///
/// # Panics
///
/// Panics if `rho <= 0.0`.
///
/// `f` is assumed convex; callers with a possibly-nonconvex `f` should
/// call `envelope(f)` (and `simplify` the result) first — this function
/// does not check convexity itself, since doing so would cost an
/// `is_convex` pass on every call for a precondition the caller already
/// knows the answer to.
///
/// # Algorithm
///
/// The derivative of the augmented objective on a single piece is affine
/// with slope `p_adj = 2*p + rho` and intercept `q`, so that piece's
/// "feasibility band" — the range of slopes `rho*x - rho*u` the optimality
/// condition can land in while the minimizer stays inside the piece — is
/// `[p_adj*lb + q, p_adj*ub + q]`. Sweeping pieces left to right:
/// - if `rho*u` falls strictly before the current piece's band (in the
///   gap after the previous piece's band), the minimizer is pinned to
///   this piece's lower edge;
/// - if `rho*u` falls inside the band, the minimizer solves
///   `p_adj*x + q = rho*u` directly;
/// - if every piece's band lies below `rho*u`, the minimizer is the last
///   piece's upper edge.
pub fn prox(f: &PiecewiseQuadratic, u: f64, rho: f64) -> f64 {
    assert!(rho > 0.0, "prox requires rho > 0");

    let target = rho * u;
    let mut last_piece: Option<&BoundedQuadratic> = None;

    for piece in f.pieces() {
        if piece.is_empty() {
            continue;
        }
        let p_adj = 2.0 * piece.p + rho;
        let lb_band = band_edge(p_adj, piece.lb, piece.q);
        let ub_band = band_edge(p_adj, piece.ub, piece.q);

        if target < lb_band && !approx_le(lb_band, target) {
            return piece.lb;
        }
        if approx_le(target, ub_band) {
            return (target - piece.q) / p_adj;
        }
        last_piece = Some(piece);
    }

    match last_piece {
        Some(piece) => piece.ub,
        None => f64::NAN,
    }
}

/// `p_adj * bound + q`, with the convention `0 * infinity = infinity` for
/// the degenerate affine case (`p_adj == 0`) on an unbounded edge — the
/// band is one-sided open in that direction regardless of `q`.
fn band_edge(p_adj: f64, bound: f64, q: f64) -> f64 {
    if p_adj == 0.0 {
        if bound == f64::NEG_INFINITY {
            return f64::NEG_INFINITY;
        }
        if bound == f64::INFINITY {
            return f64::INFINITY;
        }
    }
    p_adj * bound + q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounded_quadratic::BoundedQuadratic;
    use crate::tolerance::approx_eq;

    #[test]
    fn minimize_picks_global_min_across_pieces() {
        let f = PiecewiseQuadratic::new(
            vec![
                BoundedQuadratic::new(-5.0, 0.0, 1.0, 0.0, 3.0),
                BoundedQuadratic::new(0.0, 5.0, 1.0, 0.0, 0.0),
            ],
            false,
        );
        let (x, v) = minimize(&f);
        assert!(approx_eq(x, 0.0));
        assert!(approx_eq(v, 0.0));
    }

    #[test]
    fn minimize_empty_pwq_has_no_minimizer() {
        let f = PiecewiseQuadratic::new(vec![], false);
        let (x, v) = minimize(&f);
        assert!(x.is_nan());
        assert_eq!(v, f64::INFINITY);
    }

    #[test]
    fn prox_of_indicator_is_clip() {
        // Scenario-adjacent: prox(indicator(a,b), u, rho) == clip(u, a, b)
        // for all u, rho > 0.
        let ind = PiecewiseQuadratic::indicator(-2.0, 3.0);
        for (u, expected) in [(-5.0, -2.0), (0.0, 0.0), (10.0, 3.0)] {
            for rho in [0.5, 1.0, 10.0] {
                let x = prox(&ind, u, rho);
                assert!(approx_eq(x, expected), "u={} rho={} got {}", u, rho, x);
            }
        }
    }

    #[test]
    fn prox_of_huber_matches_scenario_six() {
        // Huber with mu = 1: quadratic bowl on [-1, 1], affine tails
        // outside, continuous and with matching slope at +-1.
        let huber = PiecewiseQuadratic::new(
            vec![
                BoundedQuadratic::new(f64::NEG_INFINITY, -1.0, 0.0, -1.0, -0.5),
                BoundedQuadratic::new(-1.0, 1.0, 0.5, 0.0, 0.0),
                BoundedQuadratic::new(1.0, f64::INFINITY, 0.0, 1.0, -0.5),
            ],
            false,
        );
        let x = prox(&huber, 3.0, 1.0);
        assert!(approx_eq(x, 2.0), "got {}", x);
    }

    #[test]
    fn prox_huber_general_identity() {
        // prox(huber, u, rho) = u - (u/rho) / max(|u|, 1/rho + 1)
        let huber = PiecewiseQuadratic::new(
            vec![
                BoundedQuadratic::new(f64::NEG_INFINITY, -1.0, 0.0, -1.0, -0.5),
                BoundedQuadratic::new(-1.0, 1.0, 0.5, 0.0, 0.0),
                BoundedQuadratic::new(1.0, f64::INFINITY, 0.0, 1.0, -0.5),
            ],
            false,
        );
        for u in [-5.0, -1.5, -0.3, 0.0, 0.7, 2.0, 6.0] {
            for rho in [0.25, 1.0, 4.0] {
                let expected = u - (u / rho) / (u.abs().max(1.0 / rho + 1.0));
                let got = prox(&huber, u, rho);
                assert!(
                    (got - expected).abs() < 1e-6,
                    "u={} rho={} got={} expected={}",
                    u,
                    rho,
                    got,
                    expected
                );
            }
        }
    }

    #[test]
    fn prox_multi_piece_gap_lands_on_lower_edge() {
        // A convex PWQ with a gap in the domain: u between two pieces
        // that would otherwise pull the minimizer to the left edge of
        // the right-hand piece.
        let f = PiecewiseQuadratic::new(
            vec![
                BoundedQuadratic::new(-10.0, -5.0, 1.0, 0.0, 0.0),
                BoundedQuadratic::new(5.0, 10.0, 1.0, 0.0, 0.0),
            ],
            false,
        );
        let x = prox(&f, 0.0, 1.0);
        assert!(approx_eq(x, 5.0), "got {}", x);
    }
}
