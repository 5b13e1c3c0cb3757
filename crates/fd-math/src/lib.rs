//! # fd-math
//!
//! Mathematical building blocks for the finite-difference engine:
//! floating comparisons, 1-D interpolation, the normal distribution (via statrs), and a
//! tridiagonal operator with a once-factored LU solver.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Floating-point comparisons.
pub mod comparison;

/// Probability distributions.
pub mod distributions;

/// 1D interpolation schemes.
pub mod interpolations;

/// Tridiagonal (banded) operators and their LU factorisation.
pub mod tridiagonal;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use comparison::close_enough;
pub use distributions::{normal_cdf, normal_pdf};
pub use interpolations::{Interpolation1D, LinearInterpolation};
pub use tridiagonal::{TridiagonalLu, TridiagonalOperator};
