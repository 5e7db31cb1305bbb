//! Common types and functions for most user-end applications.

pub use crate::bounded_quadratic::{
    approx_le_bq, intersect, le, line_through, BoundedQuadratic, IntersectOutcome,
};
pub use crate::envelope::envelope;
pub use crate::error::{Error, Result};
pub use crate::interval::Interval;
pub use crate::merge_sum::{sum, MergeWorkspace};
pub use crate::piecewise_quadratic::PiecewiseQuadratic;
pub use crate::plot::sample;
pub use crate::prox::{minimize, prox};
pub use crate::tolerance::{approx_eq, approx_ge, approx_le, clip, solve_quad, EPSILON};
