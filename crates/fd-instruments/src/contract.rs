//! The option contract being priced.

use crate::payoff::{OptionType, PlainVanillaPayoff};
use fd_core::{ensure, errors::Result, Price, Rate, Real, Time, Volatility};

/// Contract and market inputs of a single pricing: spot, strike, rate,
/// maturity, volatility and call/put flag.
///
/// Market inputs are taken as given constants. Construct with
/// [`ContractSpec::new`], which validates the inputs; a deserialized value
/// is re-validated by the solver before any grid is allocated.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContractSpec {
    spot: Price,
    strike: Price,
    rate: Rate,
    maturity: Time,
    volatility: Volatility,
    option_type: OptionType,
}

impl ContractSpec {
    /// Create a validated contract.
    ///
    /// # Errors
    /// `InvalidParameters` unless `maturity > 0`, `volatility ≥ 0`,
    /// `strike > 0`, `spot ≥ 0` and every input is finite.
    pub fn new(
        spot: Price,
        strike: Price,
        rate: Rate,
        maturity: Time,
        volatility: Volatility,
        option_type: OptionType,
    ) -> Result<Self> {
        let spec = Self {
            spot,
            strike,
            rate,
            maturity,
            volatility,
            option_type,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check the contract invariants.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.spot.is_finite() && self.spot >= 0.0,
            "spot must be finite and non-negative, got {}",
            self.spot
        );
        ensure!(
            self.strike.is_finite() && self.strike > 0.0,
            "strike must be finite and positive, got {}",
            self.strike
        );
        ensure!(self.rate.is_finite(), "rate must be finite, got {}", self.rate);
        ensure!(
            self.maturity.is_finite() && self.maturity > 0.0,
            "maturity must be finite and positive, got {}",
            self.maturity
        );
        ensure!(
            self.volatility.is_finite() && self.volatility >= 0.0,
            "volatility must be finite and non-negative, got {}",
            self.volatility
        );
        Ok(())
    }

    /// Spot price of the underlying today.
    pub fn spot(&self) -> Price {
        self.spot
    }

    /// Strike price.
    pub fn strike(&self) -> Price {
        self.strike
    }

    /// Continuously compounded risk-free rate.
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// Time to maturity in years.
    pub fn maturity(&self) -> Time {
        self.maturity
    }

    /// Black-Scholes volatility.
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }

    /// Call or put.
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// `true` for a put.
    pub fn is_put(&self) -> bool {
        self.option_type == OptionType::Put
    }

    /// The contract's payoff.
    pub fn payoff(&self) -> PlainVanillaPayoff {
        PlainVanillaPayoff::new(self.option_type, self.strike)
    }

    /// The discount factor `exp(−r·τ)` over a residual time `tau`.
    pub fn discount(&self, tau: Time) -> Real {
        (-self.rate * tau).exp()
    }
}
