//! # fd-instruments
//!
//! Option contracts priced by the finite-difference engine, and the
//! [`PricingEngine`] interface engines implement.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod contract;
pub mod instrument;
pub mod payoff;

pub use contract::ContractSpec;
pub use instrument::{PricingEngine, PricingResults};
pub use payoff::{OptionType, PlainVanillaPayoff};
