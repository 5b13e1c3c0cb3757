//! Finite difference methods for PDE-based option pricing.
//!
//! Prices a contract by discretising the Black-Scholes PDE
//! `∂V/∂t + ½σ²S²·∂²V/∂S² + rS·∂V/∂S − rV = 0` on a uniform
//! `(M+1) × (N+1)` grid in `(S, t)` and stepping backward from maturity.
//!
//! # Overview
//!
//! * [`Grid`] / [`DiscretizationSpec`]: price and time axes plus the value array
//! * [`BoundaryConditions`]: terminal payoff and Dirichlet edge rows
//! * [`SchemeCoefficients`]: per-scheme stencil weights and tridiagonal operators
//! * [`FdmScheme`]: explicit, implicit, Crank-Nicolson, down-and-out barrier,
//!   or American (Crank-Nicolson + projected SOR)
//! * [`ProjectedSor`]: the early-exercise constrained relaxation solver
//! * [`FdBlackScholesSolver`]: runs the steps above and interpolates the price
//!
//! One solver owns one grid; nothing is shared between pricings, so
//! independent pricings can run on separate threads.

mod boundary_conditions;
mod coefficients;
mod grid;
mod psor;
mod scheme;
mod solver;
mod traversal;

pub use boundary_conditions::BoundaryConditions;
pub use coefficients::{SchemeCoefficients, Stencil};
pub use grid::{DiscretizationSpec, Grid};
pub use psor::ProjectedSor;
pub use scheme::{FdmScheme, PsorSettings};
pub use solver::FdBlackScholesSolver;
