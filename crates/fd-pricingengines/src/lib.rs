//! # fd-pricingengines
//!
//! Pricing engines for [`ContractSpec`](fd_instruments::ContractSpec):
//!
//! * [`FdBlackScholesEngine`]: the finite-difference solver wrapped as a
//!   [`PricingEngine`](fd_instruments::PricingEngine), with grid Greeks
//! * [`AnalyticEuropeanEngine`]: the closed-form Black-Scholes price
//! * [`price`]: the one-call entry point returning only the price

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Closed-form Black-Scholes engine.
pub mod analytic_european_engine;

/// Finite-difference Black-Scholes engine.
pub mod fd_black_scholes_engine;

pub use analytic_european_engine::{black_scholes, black_scholes_price, AnalyticEuropeanEngine};
pub use fd_black_scholes_engine::{price, FdBlackScholesEngine};
