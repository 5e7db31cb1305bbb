//! k-way merge-sum of piecewise quadratics: sweeps a shared breakpoint
//! schedule across all inputs, maintaining a per-input "active piece"
//! cursor, and emits one summed piece per maximal subinterval where every
//! input is simultaneously defined.

use crate::bounded_quadratic::BoundedQuadratic;
use crate::interval::Interval;
use crate::piecewise_quadratic::PiecewiseQuadratic;

/// Reusable cursor/predicate state for the merge-sum sweep, sized to the
/// number of inputs. Reusing one workspace across repeated `sum_into`
/// calls (with the same `k`) avoids reallocating the cursor buffers each
/// time.
pub struct MergeWorkspace {
    active_index: Vec<usize>,
    alive: Vec<bool>,
}

impl MergeWorkspace {
    /// Allocates a workspace sized for `k` inputs.
    pub fn new(k: usize) -> MergeWorkspace {
        MergeWorkspace {
            active_index: vec![0; k],
            alive: vec![true; k],
        }
    }

    /// Runs the merge-sum sweep over `inputs`, reusing this workspace's
    /// buffers (resized in place if `inputs.len()` has changed).
    ///
    /// # Panics
    ///
    /// Panics if the workspace was not sized for `inputs.len()` and the
    /// mismatch is surprising enough to indicate caller error (see
    /// `resize_for`).
    pub fn sum_into(&mut self, inputs: &[PiecewiseQuadratic]) -> PiecewiseQuadratic {
        self.resize_for(inputs.len());

        let k = inputs.len();
        if k == 0 {
            return PiecewiseQuadratic::new(vec![], false);
        }

        for i in 0..k {
            self.active_index[i] = 0;
            self.alive[i] = !inputs[i].pieces().is_empty();
        }

        let mut out: Vec<BoundedQuadratic> = Vec::new();

        loop {
            if self.alive.iter().all(|&a| a) {
                // Step 1: every input is alive, try to emit a candidate.
                let mut dom = Interval::whole();
                let mut p = 0.0;
                let mut q = 0.0;
                let mut r = 0.0;
                for i in 0..k {
                    let piece = inputs[i].pieces()[self.active_index[i]];
                    dom = dom.intersect(&piece.domain());
                    p += piece.p;
                    q += piece.q;
                    r += piece.r;
                }
                if !dom.is_empty() {
                    out.push(BoundedQuadratic::new(dom.lb, dom.ub, p, q, r));
                }
            }

            // Step 2: u* = min ub among still-alive inputs.
            let u_star = (0..k)
                .filter(|&i| self.alive[i])
                .map(|i| inputs[i].pieces()[self.active_index[i]].ub)
                .fold(f64::INFINITY, f64::min);

            if u_star == f64::INFINITY && self.alive.iter().all(|&a| !a) {
                break;
            }

            // Step 3: advance every input whose active piece's ub hits u*
            // exactly (intentional exact float equality: these inputs
            // must step together to preserve the sweep's invariants).
            let mut any_alive = false;
            for i in 0..k {
                if !self.alive[i] {
                    continue;
                }
                any_alive = true;
                if inputs[i].pieces()[self.active_index[i]].ub == u_star {
                    self.active_index[i] += 1;
                    if self.active_index[i] >= inputs[i].pieces().len() {
                        self.alive[i] = false;
                    }
                }
            }

            // Step 4: stop once every input is dead.
            if !any_alive || self.alive.iter().all(|&a| !a) {
                break;
            }
        }

        PiecewiseQuadratic::new(out, false)
    }

    fn resize_for(&mut self, k: usize) {
        if self.active_index.len() != k {
            self.active_index = vec![0; k];
            self.alive = vec![true; k];
        }
    }
}

/// Convenience entry point: sums `inputs` with a freshly allocated
/// workspace. The output is not re-simplified; callers invoke
/// [`PiecewiseQuadratic::simplify`] themselves if wanted.
pub fn sum(inputs: &[PiecewiseQuadratic]) -> PiecewiseQuadratic {
    MergeWorkspace::new(inputs.len()).sum_into(inputs)
}
