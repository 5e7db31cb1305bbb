//! Crate-wide error type.
//!
//! Precondition violations (NaN in constructors, non-affine negation,
//! `scale`/`perspective` with `alpha == 0`, malformed `<=`/`≲` comparisons,
//! an empty `restrict_dom` result, workspace-size mismatches) are programmer
//! errors and panic directly at the call site rather than routing through
//! here — see the individual modules' `# Panics` sections. The only
//! recoverable failure mode the crate exposes is the envelope engine's
//! "no bridge case applies" fatal condition, which indicates either a
//! tolerance miscalibration or corrupt input rather than a bad argument a
//! caller can simply retry with.

use std::fmt;

use crate::bounded_quadratic::BoundedQuadratic;

/// The crate's umbrella error enum.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The envelope engine's incremental fold encountered a pair of pieces
    /// that none of the bridge cases in §4.G could handle.
    EnvelopeInconsistency {
        /// The piece already folded into the running envelope.
        left: BoundedQuadratic,
        /// The piece being appended when no bridge case matched.
        right: BoundedQuadratic,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EnvelopeInconsistency { left, right } => write!(
                f,
                "envelope construction found no bridge case for pieces {} and {}",
                left, right
            ),
        }
    }
}

impl std::error::Error for Error {}

/// Convenience alias for this crate's fallible results.
pub type Result<T> = std::result::Result<T, Error>;
