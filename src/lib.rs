//! # Description
//!
//! `pwquad` is a library for symbolic manipulation of univariate
//! piecewise-quadratic functions, with a focus on convex analysis and
//! first-order optimization. A piecewise quadratic is a finite ordered
//! sequence of bounded quadratic pieces `f(x) = p*x^2 + q*x + r`, each
//! defined on a closed interval `[lb, ub]`; where pieces overlap, the
//! function value is the pointwise minimum (realized through
//! [`piecewise_quadratic::PiecewiseQuadratic::simplify`], not through
//! evaluation order — see that module's docs).
//!
//! The repository for `pwquad` can be found
//! [here](https://github.com/masonium/pwquad).
//!
//! # Usage
//!
//! pwquad is available as a crate through cargo. Add the following line
//! to your Cargo.toml, in the `dependencies` section:
//!
//! ```text
//! [dependencies]
//! pwquad = "0.1"
//! ```
//!
//! In your crate, use
//!
//! ```text
//! use pwquad::prelude::*;
//! ```
//!
//! The [`pwquad::prelude`](./prelude) module re-exports the most useful
//! functionality.
//!
//! # Organization
//!
//! Every algorithm in this crate is built out of two value types:
//! [`bounded_quadratic::BoundedQuadratic`], a single `p*x^2 + q*x + r`
//! piece on a closed domain, and
//! [`piecewise_quadratic::PiecewiseQuadratic`], the ordered piece list
//! built out of them. The three nontrivial subsystems are the k-way
//! breakpoint sweep in [`merge_sum`], the incremental convex-envelope
//! fold in [`envelope`] (backed by the fixed-capacity scratch in
//! [`buffer`]), and structural normalization via
//! [`piecewise_quadratic::PiecewiseQuadratic::simplify`].
//! [`prox`] implements minimization and the proximal operator on top of
//! those. Every approximate numerical comparison anywhere in the crate
//! routes through [`tolerance`].
//!
//! ```rust
//! use pwquad::prelude::*;
//!
//! let f = PiecewiseQuadratic::new(
//!     vec![
//!         BoundedQuadratic::new(0.0, 1.0, 1.0, 0.0, 0.0),
//!         BoundedQuadratic::new(1.0, 2.0, 1.0, 2.0, -2.0),
//!     ],
//!     false,
//! );
//! assert!(f.is_convex());
//!
//! let (x_star, v_star) = minimize(&f);
//! assert!((x_star - 0.0).abs() < 1e-9);
//! assert!(v_star.abs() < 1e-9);
//! ```

pub mod tolerance;

pub mod interval;

pub mod bounded_quadratic;

pub mod piecewise_quadratic;

pub mod merge_sum;

pub mod buffer;

pub mod envelope;

pub mod prox;

pub mod plot;

pub mod error;

pub mod prelude;
