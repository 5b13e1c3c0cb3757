//! Error types for fdpricer.
//!
//! Every failure a pricing call can hit is one variant of [`Error`]. Callers
//! see exactly one error per failed `price()`; nothing is retried or
//! swallowed inside the engine.

use crate::{Real, Size};
use thiserror::Error;

/// The error type returned by every fallible operation in fdpricer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Contract or discretization parameters were rejected before any grid
    /// was allocated.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The grid diverged (non-finite or unbounded values), typically an
    /// explicit scheme run outside its stability region.
    #[error("numerical instability at price step {price_step}, time step {time_step}")]
    NumericalInstability {
        /// Time index of the first offending node.
        time_step: Size,
        /// Price index of the first offending node.
        price_step: Size,
    },

    /// A linear system could not be factorised.
    #[error("singular system: {0}")]
    SingularSystem(String),

    /// The projected SOR loop hit its iteration cap.
    #[error(
        "projected SOR did not converge at time step {time_step} \
         after {iterations} iterations (error {error:e})"
    )]
    NonConvergence {
        /// Time index being solved when the cap was reached.
        time_step: Size,
        /// Number of sweeps performed.
        iterations: Size,
        /// Norm of the last sweep's change.
        error: Real,
    },
}

/// Shorthand `Result` type used throughout fdpricer.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::InvalidParameters(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use fd_core::{ensure, errors::Error};
/// fn positive(x: f64) -> fd_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::InvalidParameters(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidParameters(
                format!($($msg)*)
            ));
        }
    };
}
