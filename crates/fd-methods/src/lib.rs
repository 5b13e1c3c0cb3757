//! # fd-methods
//!
//! Finite-difference methods for the Black-Scholes PDE on a
//! (price × time) grid, solved backward from the terminal payoff.
//!
//! # Modules
//!
//! * [`finite_differences`]: grid, boundary conditions, stencil
//!   coefficients, explicit/implicit/Crank-Nicolson traversal, projected SOR
//!   for early exercise, and the [`FdBlackScholesSolver`] that sequences them

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Finite difference methods: grid, schemes, solvers.
pub mod finite_differences;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use finite_differences::{
    DiscretizationSpec, FdBlackScholesSolver, FdmScheme, Grid, PsorSettings,
};
