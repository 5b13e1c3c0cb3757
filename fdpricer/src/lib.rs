//! # fdpricer
//!
//! Finite-difference pricing of European, down-and-out barrier and American
//! vanilla options under Black-Scholes.
//!
//! This crate is a **façade** that re-exports all public items from the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `fd-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use fdpricer::instruments::{ContractSpec, OptionType};
//! use fdpricer::methods::{DiscretizationSpec, FdmScheme};
//! use fdpricer::pricingengines::price;
//!
//! let put = ContractSpec::new(50.0, 50.0, 0.1, 5.0 / 12.0, 0.4, OptionType::Put).unwrap();
//! let grid = DiscretizationSpec::new(100.0, 100, 42).unwrap();
//! let european = price(&put, &grid, &FdmScheme::CrankNicolson).unwrap();
//! let american = price(&put, &grid, &FdmScheme::american()).unwrap();
//! assert!(american >= european);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use fd_core as core;

/// Mathematical utilities: comparisons, interpolation, distributions,
/// tridiagonal solvers.
pub use fd_math as math;

/// Option contracts and the pricing-engine interface.
pub use fd_instruments as instruments;

/// Numerical methods: the finite-difference grid, schemes and solver.
pub use fd_methods as methods;

/// Pricing engines.
pub use fd_pricingengines as pricingengines;
