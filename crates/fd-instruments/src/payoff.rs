//! Option type and the plain-vanilla payoff.

use fd_core::Real;
use std::fmt;

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionType {
    /// A call option (right to buy).
    Call,
    /// A put option (right to sell).
    Put,
}

impl OptionType {
    /// +1 for Call, −1 for Put.
    pub fn sign(self) -> Real {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

/// Standard "plain vanilla" payoff.
///
/// `payoff = max(φ(S − K), 0)` where `φ = +1` for Call, `−1` for Put.
/// Serves both as the terminal condition and as the early-exercise floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlainVanillaPayoff {
    /// Option type.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: Real,
}

impl PlainVanillaPayoff {
    /// Create a new plain vanilla payoff.
    pub fn new(option_type: OptionType, strike: Real) -> Self {
        Self {
            option_type,
            strike,
        }
    }

    /// Intrinsic value at underlying price `price`.
    #[inline]
    pub fn value(&self, price: Real) -> Real {
        (self.option_type.sign() * (price - self.strike)).max(0.0)
    }
}

impl fmt::Display for PlainVanillaPayoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vanilla {} @ {}", self.option_type, self.strike)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn call_and_put_values() {
        let call = PlainVanillaPayoff::new(OptionType::Call, 50.0);
        let put = PlainVanillaPayoff::new(OptionType::Put, 50.0);
        assert_eq!(call.value(60.0), 10.0);
        assert_eq!(call.value(40.0), 0.0);
        assert_eq!(put.value(40.0), 10.0);
        assert_eq!(put.value(60.0), 0.0);
        assert_eq!(put.value(0.0), 50.0);
    }

    #[test]
    fn payoff_display() {
        assert_eq!(
            PlainVanillaPayoff::new(OptionType::Put, 42.0).to_string(),
            "Vanilla Put @ 42"
        );
    }

    proptest! {
        #[test]
        fn payoff_is_non_negative(s in 0.0f64..1_000.0, k in 0.01f64..500.0, is_put: bool) {
            let p = PlainVanillaPayoff::new(if is_put { OptionType::Put } else { OptionType::Call }, k);
            prop_assert!(p.value(s) >= 0.0);
        }
    }
}
