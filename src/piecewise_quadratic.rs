//! An ordered sequence of [`BoundedQuadratic`] pieces.
//!
//! Evaluation is "first match wins": the value at `x` is that of the
//! first piece (in order) whose domain contains `x`. Where two pieces
//! overlap and the pointwise minimum is wanted, callers must arrange
//! the minimum-first ordering themselves or call [`PiecewiseQuadratic::simplify`] —
//! evaluation order alone does not realize a pointwise minimum.

use std::fmt;

use crate::bounded_quadratic::BoundedQuadratic;
use crate::interval::Interval;
use crate::tolerance::{approx_eq, approx_le};

/// An ordered, finite sequence of bounded-quadratic pieces.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseQuadratic {
    pieces: Vec<BoundedQuadratic>,
}

impl PiecewiseQuadratic {
    /// Builds a piecewise quadratic from an ordered piece list, optionally
    /// running [`simplify`](PiecewiseQuadratic::simplify) immediately.
    pub fn new(pieces: Vec<BoundedQuadratic>, simplify_result: bool) -> PiecewiseQuadratic {
        let pwq = PiecewiseQuadratic { pieces };
        if simplify_result {
            pwq.simplify()
        } else {
            pwq
        }
    }

    /// The single-piece indicator function of `[lb, ub]`: zero on the
    /// domain, `+infinity` outside.
    pub fn indicator(lb: f64, ub: f64) -> PiecewiseQuadratic {
        PiecewiseQuadratic {
            pieces: vec![BoundedQuadratic::new(lb, ub, 0.0, 0.0, 0.0)],
        }
    }

    /// The zero function on the whole real line: `indicator(-infinity, +infinity)`.
    pub fn zero() -> PiecewiseQuadratic {
        PiecewiseQuadratic::indicator(f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Number of pieces (not the same as domain emptiness: a PWQ with one
    /// empty-domain piece has `len() == 1`).
    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Returns true iff this PWQ holds no pieces at all.
    #[inline]
    pub fn is_empty_pieces(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Read-only access to the piece list, in evaluation order.
    #[inline]
    pub fn pieces(&self) -> &[BoundedQuadratic] {
        &self.pieces
    }

    /// Iterator over the piece list, in evaluation order.
    pub fn iter(&self) -> std::slice::Iter<'_, BoundedQuadratic> {
        self.pieces.iter()
    }

    /// Appends `piece`, optionally re-running [`simplify`](PiecewiseQuadratic::simplify)
    /// afterward.
    pub fn append_piece(&mut self, piece: BoundedQuadratic, simplify_result: bool) {
        self.pieces.push(piece);
        if simplify_result {
            *self = self.simplify();
        }
    }

    /// Alias for [`append_piece`](PiecewiseQuadratic::append_piece).
    pub fn push(&mut self, piece: BoundedQuadratic, simplify_result: bool) {
        self.append_piece(piece, simplify_result);
    }

    /// Evaluates at `x`: the value of the first piece (in order) whose
    /// domain contains `x`, or `+infinity` if none does.
    pub fn eval(&self, x: f64) -> f64 {
        for piece in &self.pieces {
            if piece.domain().contains(x) {
                return piece.eval(x);
            }
        }
        f64::INFINITY
    }

    /// Returns true iff every piece is individually convex, every adjacent
    /// pair is continuous and touching, and the left derivative never
    /// exceeds the right derivative at any join (within tolerance).
    ///
    /// An empty PWQ (no pieces at all) is vacuously convex.
    pub fn is_convex(&self) -> bool {
        if self.pieces.is_empty() {
            return true;
        }
        if !self.pieces.iter().all(|p| p.is_convex()) {
            return false;
        }
        self.pieces.windows(2).all(|w| {
            let (left, right) = (&w[0], &w[1]);
            if !left.continuous_and_overlapping(right) {
                return false;
            }
            let x = left.ub;
            let left_deriv = 2.0 * left.p * x + left.q;
            let right_deriv = 2.0 * right.p * right.lb + right.q;
            left_deriv <= right_deriv + crate::tolerance::EPSILON
        })
    }

    /// Structural normalization: drops degenerate point-pieces, merges
    /// coefficient-equivalent adjacent pieces, and eliminates the
    /// redundancies left by merge-sum and envelope construction.
    ///
    /// Scans left to right with an accumulator whose last piece is
    /// `prev`, applying the first matching rule to each incoming `cur`:
    /// 1. Drop `cur` if its domain is empty.
    /// 2. If `prev` and `cur` are both points at the same `x` (within
    ///    tolerance), keep whichever has the smaller value.
    /// 3. If exactly one of `prev`/`cur` is a point and they are
    ///    continuous and touching, drop the point and keep the
    ///    non-point (restricted to `[prev.lb, cur.ub]`).
    /// 4. If `prev` and `cur` have identical extended coefficients and
    ///    `prev.ub ≈ cur.lb`, fuse them into one piece over
    ///    `[prev.lb, cur.ub]`.
    /// 5. If `prev.ub ≈ cur.lb` and exactly one of them is a point, the
    ///    point is redundant (its domain is already covered by the
    ///    non-point's closed boundary) and is dropped.
    /// 6. Otherwise append `cur` unchanged.
    pub fn simplify(&self) -> PiecewiseQuadratic {
        let mut out: Vec<BoundedQuadratic> = Vec::with_capacity(self.pieces.len());

        for cur in self.pieces.iter().copied() {
            // Rule 1.
            if cur.is_empty() {
                continue;
            }

            let prev = match out.last().copied() {
                Some(p) => p,
                None => {
                    out.push(cur);
                    continue;
                }
            };

            // Rule 2: both points at (approximately) the same x.
            if prev.is_point() && cur.is_point() && approx_eq(prev.lb, cur.lb) {
                if cur.eval(cur.lb) < prev.eval(prev.lb) {
                    *out.last_mut().unwrap() = cur;
                }
                continue;
            }

            // Rule 3: exactly one is a point, and they meet continuously.
            if (prev.is_point() ^ cur.is_point()) && prev.continuous_and_overlapping(&cur) {
                let nonpoint = if prev.is_point() { cur } else { prev };
                *out.last_mut().unwrap() =
                    BoundedQuadratic::new(prev.lb, cur.ub, nonpoint.p, nonpoint.q, nonpoint.r);
                continue;
            }

            // Rule 4: coefficient-identical (as whole-line functions) and touching.
            if approx_eq(prev.ub, cur.lb) && prev.extend_dom().approx_eq(&cur.extend_dom()) {
                *out.last_mut().unwrap() =
                    BoundedQuadratic::new(prev.lb, cur.ub, prev.p, prev.q, prev.r);
                continue;
            }

            // Rule 5: touching, exactly one is a point, and they disagree
            // at the boundary (Rule 3 already handled the agreeing case).
            // The point survives only if its value there is strictly
            // lower than the non-point's; otherwise it's redundant, since
            // the non-point's closed interval already covers that x.
            if approx_eq(prev.ub, cur.lb) && (prev.is_point() ^ cur.is_point()) {
                let meeting_x = prev.ub;
                if prev.is_point() {
                    if approx_le(cur.eval(meeting_x), prev.eval(meeting_x)) {
                        // the non-point matches or beats the point: drop it.
                        *out.last_mut().unwrap() = cur;
                        continue;
                    }
                    // else: the point already precedes cur in evaluation
                    // order and dominates there; fall through to Rule 6
                    // and append cur unchanged.
                } else {
                    if approx_le(prev.eval(meeting_x), cur.eval(meeting_x)) {
                        // the non-point already in `out` dominates or
                        // ties: the point is redundant.
                        continue;
                    }
                    // the point strictly beats the non-point that
                    // currently shadows it under first-match-wins:
                    // reorder the last two output pieces so the point is
                    // checked first, without touching either domain.
                    let shadowed = out.pop().unwrap();
                    out.push(cur);
                    out.push(shadowed);
                    continue;
                }
            }

            // Rule 6.
            out.push(cur);
        }

        PiecewiseQuadratic { pieces: out }
    }

    /// Distributes a scalar add across every piece.
    pub fn add_scalar(&self, a: f64) -> PiecewiseQuadratic {
        PiecewiseQuadratic {
            pieces: self.pieces.iter().map(|p| *p + a).collect(),
        }
    }

    /// Distributes a scalar multiply across every piece.
    pub fn scale_values(&self, alpha: f64) -> PiecewiseQuadratic {
        PiecewiseQuadratic {
            pieces: self.pieces.iter().map(|p| *p * alpha).collect(),
        }
    }

    /// Distributes [`BoundedQuadratic::shift`] across every piece.
    pub fn shift(&self, delta: f64) -> PiecewiseQuadratic {
        PiecewiseQuadratic {
            pieces: self.pieces.iter().map(|p| p.shift(delta)).collect(),
        }
    }

    /// Distributes [`BoundedQuadratic::tilt`] across every piece.
    pub fn tilt(&self, alpha: f64) -> PiecewiseQuadratic {
        PiecewiseQuadratic {
            pieces: self.pieces.iter().map(|p| p.tilt(alpha)).collect(),
        }
    }

    /// Distributes [`BoundedQuadratic::scale`] across every piece.
    pub fn scale(&self, alpha: f64) -> PiecewiseQuadratic {
        PiecewiseQuadratic {
            pieces: self.pieces.iter().map(|p| p.scale(alpha)).collect(),
        }
    }

    /// Distributes [`BoundedQuadratic::perspective`] across every piece.
    pub fn perspective(&self, alpha: f64) -> PiecewiseQuadratic {
        PiecewiseQuadratic {
            pieces: self.pieces.iter().map(|p| p.perspective(alpha)).collect(),
        }
    }

    /// Distributes [`BoundedQuadratic::reverse`] across every piece, and
    /// additionally reverses the piece ordering.
    pub fn reverse(&self) -> PiecewiseQuadratic {
        let mut pieces: Vec<BoundedQuadratic> =
            self.pieces.iter().map(|p| p.reverse()).collect();
        pieces.reverse();
        PiecewiseQuadratic { pieces }
    }

    /// Restricts every piece to its intersection with `dom`, dropping
    /// pieces whose restricted domain is empty.
    ///
    /// Unlike [`BoundedQuadratic::restrict_dom`], this never panics: an
    /// empty result for one piece is a representable (non-fatal) PWQ
    /// state, not a precondition violation.
    pub fn restrict_dom(&self, dom: Interval) -> PiecewiseQuadratic {
        let pieces = self
            .pieces
            .iter()
            .filter_map(|p| {
                let restricted = p.domain().intersect(&dom);
                if restricted.is_empty() {
                    None
                } else {
                    Some(BoundedQuadratic::new(
                        restricted.lb,
                        restricted.ub,
                        p.p,
                        p.q,
                        p.r,
                    ))
                }
            })
            .collect();
        PiecewiseQuadratic { pieces }
    }

    /// Extends every piece's domain to the whole real line.
    ///
    /// Distributing `extend_dom` piecewise means only the first piece in
    /// evaluation order is ever reachable afterward (first-match-wins
    /// shadows the rest); this mirrors the single-piece reshape literally
    /// and leaves avoiding the shadowing to the caller.
    pub fn extend_dom(&self) -> PiecewiseQuadratic {
        PiecewiseQuadratic {
            pieces: self.pieces.iter().map(|p| p.extend_dom()).collect(),
        }
    }
}

impl std::ops::Neg for PiecewiseQuadratic {
    type Output = PiecewiseQuadratic;

    /// Negates every piece; panics (via `BoundedQuadratic::neg`) if any
    /// piece is not affine.
    fn neg(self) -> PiecewiseQuadratic {
        PiecewiseQuadratic {
            pieces: self.pieces.into_iter().map(|p| -p).collect(),
        }
    }
}

impl std::ops::Mul<f64> for PiecewiseQuadratic {
    type Output = PiecewiseQuadratic;

    fn mul(self, alpha: f64) -> PiecewiseQuadratic {
        self.scale_values(alpha)
    }
}

impl std::ops::Add<BoundedQuadratic> for PiecewiseQuadratic {
    type Output = PiecewiseQuadratic;

    fn add(self, bq: BoundedQuadratic) -> PiecewiseQuadratic {
        let other = PiecewiseQuadratic {
            pieces: vec![bq],
        };
        crate::merge_sum::sum(&[self, other])
    }
}

impl std::ops::Add for PiecewiseQuadratic {
    type Output = PiecewiseQuadratic;

    fn add(self, other: PiecewiseQuadratic) -> PiecewiseQuadratic {
        crate::merge_sum::sum(&[self, other])
    }
}

impl fmt::Display for PiecewiseQuadratic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.pieces.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", lines.join("\n"))
    }
}
