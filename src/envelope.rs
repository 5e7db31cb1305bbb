//! The convex-envelope engine: computes the greatest convex minorant of an
//! arbitrary piecewise quadratic by incrementally folding its pieces,
//! left to right, into a running envelope buffer.
//!
//! Appending a new piece `g` to the running envelope `h` pops `h`'s last
//! piece `f` and bridges the pair with [`bridge`]. Six geometric cases are
//! tried in order (§4.G): a tangent-tangent bridge when both pieces are
//! strictly convex, four tangent-to-endpoint variants when only one side
//! is, and a final endpoint-to-endpoint fallback (chord or terminating
//! ray) when neither side offers interior curvature. When the bridge
//! signals that the envelope still wants to reach deeper into `h`, the
//! driver pops again and retries — this back-pop can unwind arbitrarily
//! far, but each popped piece is never re-examined, so the whole fold is
//! amortized O(n).

use crate::bounded_quadratic::{self, BoundedQuadratic};
use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::interval::Interval;
use crate::piecewise_quadratic::PiecewiseQuadratic;
use crate::tolerance::{approx_eq, approx_ge, approx_le, clip, solve_quad, EPSILON};

/// The outcome of bridging one pair of adjacent pieces.
struct Bridge {
    /// The piece(s) that replace `f` and `g` in the running envelope, in
    /// left-to-right order.
    pieces: Vec<BoundedQuadratic>,
    /// Whether the envelope still wants to reach further left into the
    /// buffer (forces the driver to pop again).
    intersection_at_left: bool,
    /// Recorded for parity with the spec's "Return signal" paragraph; not
    /// currently consulted by the driver.
    #[allow(dead_code)]
    intersection_at_right: bool,
}

impl Bridge {
    fn settled(pieces: Vec<BoundedQuadratic>) -> Bridge {
        Bridge {
            pieces,
            intersection_at_left: false,
            intersection_at_right: false,
        }
    }
}

/// Computes the convex envelope of `f`: a convex piecewise quadratic `g`
/// with `g <= f` pointwise on `dom(f)`, pointwise maximal among such.
///
/// Callers typically call [`PiecewiseQuadratic::simplify`] on the result;
/// this is the documented "canonical form" (§4.G).
///
/// # Errors
///
/// Returns [`Error::EnvelopeInconsistency`] if the incremental fold ever
/// encounters a pair of pieces none of the six bridge cases can handle —
/// a fatal condition per §7, indicating miscalibrated tolerance or
/// corrupt input.
pub fn envelope(f: &PiecewiseQuadratic) -> Result<PiecewiseQuadratic> {
    let nonempty: Vec<BoundedQuadratic> = f.pieces().iter().copied().filter(|p| !p.is_empty()).collect();
    let mut buf = Buffer::with_capacity(2 * nonempty.len().max(1));
    for piece in nonempty {
        append_piece(&mut buf, piece)?;
    }
    Ok(PiecewiseQuadratic::new(buf.as_slice().to_vec(), false))
}

/// Folds `g` into the running envelope `h`, back-popping as long as the
/// bridge signals `intersection_at_left`.
fn append_piece(h: &mut Buffer, mut g: BoundedQuadratic) -> Result<()> {
    loop {
        if h.is_empty() {
            h.push(g);
            return Ok(());
        }
        let f = h.pop().unwrap();
        let result = bridge(&f, &g)?;
        if result.intersection_at_left {
            // The leftmost bridge piece still wants to reach deeper into
            // `h`; don't push it yet, make it the new `g` and pop again.
            // Any remaining bridge pieces (there are none in practice for
            // this signal, but handle the general case) go on first.
            if result.pieces.len() > 1 {
                h.append_from(&result.pieces[1..]);
            }
            g = result.pieces[0];
            continue;
        }
        h.append_from(&result.pieces);
        return Ok(());
    }
}

/// Computes `env({f, g})`: the pieces that replace `f` and `g` in the
/// running envelope, per the case table in §4.G.
fn bridge(f: &BoundedQuadratic, g: &BoundedQuadratic) -> Result<Bridge> {
    if approx_eq(f.ub, g.lb) {
        return Ok(bridge_touching(f, g));
    }

    if f.p > 0.0 && g.p > 0.0 {
        if let Some(b) = case_midpoint_midpoint(f, g) {
            return Ok(b);
        }
    }

    if f.p > 0.0 {
        if let Some(b) = case_midpoint_to_near_endpoint(f, g) {
            return Ok(b);
        }
        if g.ub.is_finite() {
            if let Some(b) = case_midpoint_to_far_endpoint(f, g) {
                return Ok(b);
            }
        } else if g.p == 0.0 {
            if let Some(b) = case_midpoint_to_infinite(f, g) {
                return Ok(b);
            }
        }
    }

    if g.p > 0.0 {
        if let Some(b) = case_midpoint_to_near_endpoint_mirrored(f, g) {
            return Ok(b);
        }
        if f.lb.is_finite() {
            if let Some(b) = case_midpoint_to_far_endpoint_mirrored(f, g) {
                return Ok(b);
            }
        } else if f.p == 0.0 {
            if let Some(b) = case_midpoint_to_infinite_mirrored(f, g) {
                return Ok(b);
            }
        }
    }

    if let Some(b) = case_endpoint_endpoint(f, g) {
        return Ok(b);
    }

    Err(Error::EnvelopeInconsistency {
        left: *f,
        right: *g,
    })
}

/// `f.ub ≈ g.lb`: the pieces already meet with no gap between them.
///
/// Implements case 6a (both survive when continuous with non-decreasing
/// slope) together with the degenerate point sub-cases it names, and the
/// back-pop signal for when the join is continuous but concave (slope
/// drops): the popped piece `f` is not needed at all and is dropped,
/// `g` becomes the new candidate to bridge against whatever lies beneath.
fn bridge_touching(f: &BoundedQuadratic, g: &BoundedQuadratic) -> Bridge {
    let vf = f.eval(f.ub);
    let vg = g.eval(g.lb);

    if f.is_point() && g.is_point() {
        return Bridge::settled(vec![if vf <= vg { *f } else { *g }]);
    }
    if f.is_point() {
        return if vf <= vg + EPSILON {
            Bridge::settled(vec![*f, *g])
        } else {
            Bridge::settled(vec![*g])
        };
    }
    if g.is_point() {
        return if vg <= vf + EPSILON {
            Bridge::settled(vec![*f, *g])
        } else {
            Bridge::settled(vec![*f])
        };
    }

    if approx_eq(vf, vg) {
        let left_slope = 2.0 * f.p * f.ub + f.q;
        let right_slope = 2.0 * g.p * g.lb + g.q;
        if left_slope <= right_slope + EPSILON {
            Bridge::settled(vec![*f, *g])
        } else {
            Bridge {
                pieces: vec![*g],
                intersection_at_left: true,
                intersection_at_right: false,
            }
        }
    } else {
        // Touching with disagreeing values: not a scenario the spec's
        // literal fixtures exercise. Keep both and let a later `simplify`
        // resolve the seam, rather than guess at a more aggressive merge.
        Bridge::settled(vec![*f, *g])
    }
}

/// Solves for the tangent point(s) `x*` of `mid` such that the tangent
/// line to `mid` at `x*` passes through `(x0, y0)`.
///
/// Derivation: the tangent line at `x*` is `y = mid'(x*)(x - x*) + mid(x*)`;
/// requiring it to pass through `(x0, y0)` and expanding in `x*` gives
/// `p*x*^2 - 2*p*x0*x* + (y0 - q*x0 - r) = 0`.
fn tangent_through_point(mid: &BoundedQuadratic, x0: f64, y0: f64) -> (f64, f64) {
    let a = mid.p;
    let b = -2.0 * mid.p * x0;
    let c = y0 - mid.q * x0 - mid.r;
    solve_quad(a, b, c)
}

/// Finds a tangent point of `mid` that lies in `mid`'s domain, strictly
/// on the `want_ge` side of `x0` (beyond the fixed point, not at it), and
/// whose tangent line passes through `(x0, y0)`.
fn tangent_point_beyond(mid: &BoundedQuadratic, x0: f64, y0: f64, want_ge: bool) -> Option<f64> {
    let (r1, r2) = tangent_through_point(mid, x0, y0);
    for x in [r1, r2] {
        if x.is_nan() {
            continue;
        }
        if (x - x0).abs() <= EPSILON {
            continue;
        }
        let right_side = if want_ge { x > x0 } else { x < x0 };
        if !right_side {
            continue;
        }
        if approx_ge(x, mid.lb) && approx_le(x, mid.ub) {
            return Some(clip(x, mid.lb, mid.ub));
        }
    }
    None
}

/// Case 1: midpoint-to-midpoint, when both `f.p > 0` and `g.p > 0`.
///
/// Solves for interior tangent points `x_f`, `x_g` with matching slopes,
/// using the explicit quadratic-in-`x_f` from §4.G case 1.
fn case_midpoint_midpoint(f: &BoundedQuadratic, g: &BoundedQuadratic) -> Option<Bridge> {
    let a = f.p * f.p / g.p - f.p;
    let b = (f.p / g.p) * (f.q - g.q);
    let c = f.r - g.r + (f.q - g.q) * (f.q - g.q) / (4.0 * g.p);
    let (r1, r2) = solve_quad(a, b, c);

    for x_f in [r1, r2] {
        if x_f.is_nan() {
            continue;
        }
        let x_g = (f.p / g.p) * x_f + (f.q - g.q) / (2.0 * g.p);
        if approx_ge(x_f, f.lb)
            && approx_le(x_f, f.ub)
            && approx_ge(x_g, g.lb)
            && approx_le(x_g, g.ub)
        {
            let x_f = clip(x_f, f.lb, f.ub);
            let x_g = clip(x_g, g.lb, g.ub);
            let left = f.restrict_dom(Interval::new(f.lb, x_f));
            let line = f.tangent(x_f).restrict_dom(Interval::new(x_f, x_g));
            let right = g.restrict_dom(Interval::new(x_g, g.ub));
            return Some(Bridge::settled(vec![left, line, right]));
        }
    }
    None
}

/// Case 2: midpoint of `f` to the lower (near) endpoint of `g`. `g`
/// survives unchanged.
fn case_midpoint_to_near_endpoint(f: &BoundedQuadratic, g: &BoundedQuadratic) -> Option<Bridge> {
    let x0 = g.lb;
    let y0 = g.eval(g.lb);
    let x_f = tangent_point_beyond(f, x0, y0, false)?;
    let left = f.restrict_dom(Interval::new(f.lb, x_f));
    let line = f.tangent(x_f).restrict_dom(Interval::new(x_f, x0));
    Some(Bridge::settled(vec![left, line, *g]))
}

/// Case 3: midpoint of `f` to the upper (far) endpoint of `g` (finite).
/// `g` is fully subsumed by the bridge.
fn case_midpoint_to_far_endpoint(f: &BoundedQuadratic, g: &BoundedQuadratic) -> Option<Bridge> {
    let x0 = g.ub;
    let y0 = g.eval(g.ub);
    let x_f = tangent_point_beyond(f, x0, y0, false)?;
    let left = f.restrict_dom(Interval::new(f.lb, x_f));
    let line = f.tangent(x_f).restrict_dom(Interval::new(x_f, x0));
    Some(Bridge::settled(vec![left, line]))
}

/// Case 4: midpoint of `f` to `g`'s infinite, ultimately-affine upper ray
/// (`g.ub == +infinity`, `g.p == 0`). `g` is fully subsumed.
fn case_midpoint_to_infinite(f: &BoundedQuadratic, g: &BoundedQuadratic) -> Option<Bridge> {
    if f.p == 0.0 {
        return None;
    }
    let x_f = (g.q - f.q) / (2.0 * f.p);
    if !(approx_ge(x_f, f.lb) && approx_le(x_f, f.ub)) {
        return None;
    }
    let x_f = clip(x_f, f.lb, f.ub);
    let line = f.tangent(x_f);
    if line.eval(g.lb) > g.eval(g.lb) + EPSILON {
        return None;
    }
    let left = f.restrict_dom(Interval::new(f.lb, x_f));
    let ray = line.restrict_dom(Interval::new(x_f, f64::INFINITY));
    Some(Bridge::settled(vec![left, ray]))
}

/// Case 5 (mirror of case 2): midpoint of `g` to the upper (near) endpoint
/// of `f`. `f` survives unchanged.
fn case_midpoint_to_near_endpoint_mirrored(
    f: &BoundedQuadratic,
    g: &BoundedQuadratic,
) -> Option<Bridge> {
    let x0 = f.ub;
    let y0 = f.eval(f.ub);
    let x_g = tangent_point_beyond(g, x0, y0, true)?;
    let line = g.tangent(x_g).restrict_dom(Interval::new(x0, x_g));
    let right = g.restrict_dom(Interval::new(x_g, g.ub));
    Some(Bridge::settled(vec![*f, line, right]))
}

/// Case 5 (mirror of case 3): midpoint of `g` to the lower (far) endpoint
/// of `f` (finite). `f` is fully subsumed.
fn case_midpoint_to_far_endpoint_mirrored(
    f: &BoundedQuadratic,
    g: &BoundedQuadratic,
) -> Option<Bridge> {
    let x0 = f.lb;
    let y0 = f.eval(f.lb);
    let x_g = tangent_point_beyond(g, x0, y0, true)?;
    let line = g.tangent(x_g).restrict_dom(Interval::new(x0, x_g));
    let right = g.restrict_dom(Interval::new(x_g, g.ub));
    Some(Bridge::settled(vec![line, right]))
}

/// Case 5 (mirror of case 4): midpoint of `g` to `f`'s infinite,
/// ultimately-affine lower ray (`f.lb == -infinity`, `f.p == 0`). `f` is
/// fully subsumed.
fn case_midpoint_to_infinite_mirrored(
    f: &BoundedQuadratic,
    g: &BoundedQuadratic,
) -> Option<Bridge> {
    if g.p == 0.0 {
        return None;
    }
    let x_g = (f.q - g.q) / (2.0 * g.p);
    if !(approx_ge(x_g, g.lb) && approx_le(x_g, g.ub)) {
        return None;
    }
    let x_g = clip(x_g, g.lb, g.ub);
    let line = g.tangent(x_g);
    if line.eval(f.ub) > f.eval(f.ub) + EPSILON {
        return None;
    }
    let ray = line.restrict_dom(Interval::new(f64::NEG_INFINITY, x_g));
    let right = g.restrict_dom(Interval::new(x_g, g.ub));
    Some(Bridge::settled(vec![ray, right]))
}

/// Case 6: endpoint-to-endpoint, tried when neither side offers a usable
/// interior tangent. Tries the forward orientation (f's near/far edge to
/// g's near/far edge), then the mirrored orientation (reversing both
/// pieces, reapplying, and reversing the result back), matching how the
/// spec describes mirroring for case 5.
fn case_endpoint_endpoint(f: &BoundedQuadratic, g: &BoundedQuadratic) -> Option<Bridge> {
    if let Some(b) = case_endpoint_endpoint_oriented(f, g) {
        return Some(b);
    }
    let f_rev = g.reverse();
    let g_rev = f.reverse();
    let mirrored = case_endpoint_endpoint_oriented(&f_rev, &g_rev)?;
    let mut pieces: Vec<BoundedQuadratic> = mirrored.pieces.iter().map(|p| p.reverse()).collect();
    pieces.reverse();
    Some(Bridge::settled(pieces))
}

/// The forward-oriented sub-cases 6b–6f: a gap between `f.ub` and `g.lb`,
/// with neither piece contributing interior curvature to the bridge.
fn case_endpoint_endpoint_oriented(f: &BoundedQuadratic, g: &BoundedQuadratic) -> Option<Bridge> {
    // 6b: chord between the near edges, valid only if it stays beneath
    // both pieces over their own domains.
    let near_chord = bounded_quadratic::line_through(f.ub, f.eval(f.ub), g.lb, g.eval(g.lb));
    if affine_below_on(&near_chord, f, f.domain()) && affine_below_on(&near_chord, g, g.domain()) {
        let bridge_piece = near_chord.restrict_dom(Interval::new(f.ub, g.lb));
        return Some(Bridge::settled(vec![*f, bridge_piece, *g]));
    }

    // 6c: chord between the far edges, replacing both pieces entirely.
    if f.lb.is_finite() && g.ub.is_finite() && !approx_eq(f.lb, g.ub) {
        let far_chord = bounded_quadratic::line_through(f.lb, f.eval(f.lb), g.ub, g.eval(g.ub));
        if affine_below_on(&far_chord, f, f.domain()) && affine_below_on(&far_chord, g, g.domain())
        {
            let bridge_piece = far_chord.restrict_dom(Interval::new(f.lb, g.ub));
            return Some(Bridge::settled(vec![bridge_piece]));
        }
    }

    // 6d: chord from f's near edge to g's far edge, replacing g entirely.
    if g.ub.is_finite() && !approx_eq(f.ub, g.ub) {
        let chord = bounded_quadratic::line_through(f.ub, f.eval(f.ub), g.ub, g.eval(g.ub));
        if affine_below_on(&chord, g, g.domain()) {
            let bridge_piece = chord.restrict_dom(Interval::new(f.ub, g.ub));
            return Some(Bridge::settled(vec![*f, bridge_piece]));
        }
    }

    // 6e: g is an infinite, ultimately-affine ray; terminate the envelope
    // with a ray through f's far (lower) endpoint, replacing both.
    if g.ub.is_infinite() && g.p == 0.0 && f.lb.is_finite() {
        let ray = BoundedQuadratic::new(
            f64::NEG_INFINITY,
            f64::INFINITY,
            0.0,
            g.q,
            f.eval(f.lb) - g.q * f.lb,
        );
        if affine_below_on(&ray, f, f.domain()) {
            let piece = ray.restrict_dom(Interval::new(f.lb, f64::INFINITY));
            return Some(Bridge::settled(vec![piece]));
        }
    }

    // 6f: same, but the extrapolation starts at f's near (upper) endpoint,
    // keeping f intact.
    if g.ub.is_infinite() && g.p == 0.0 {
        let ray = BoundedQuadratic::new(
            f64::NEG_INFINITY,
            f64::INFINITY,
            0.0,
            g.q,
            f.eval(f.ub) - g.q * f.ub,
        );
        let piece = ray.restrict_dom(Interval::new(f.ub, f64::INFINITY));
        return Some(Bridge::settled(vec![*f, piece]));
    }

    None
}

/// Returns true iff `affine` (`p == 0`) lies at or below `curve`'s
/// underlying quadratic, evaluated over `domain` (which need not be
/// `curve`'s actual domain — its coefficients are projected onto
/// `domain` via `extend_dom`).
fn affine_below_on(affine: &BoundedQuadratic, curve: &BoundedQuadratic, domain: Interval) -> bool {
    if domain.is_empty() {
        return true;
    }
    let affine_d = BoundedQuadratic::new(domain.lb, domain.ub, 0.0, affine.q, affine.r);
    let curve_ext = curve.extend_dom();
    let curve_d = BoundedQuadratic::new(domain.lb, domain.ub, curve_ext.p, curve_ext.q, curve_ext.r);
    bounded_quadratic::approx_le_bq(&affine_d, &curve_d)
}
