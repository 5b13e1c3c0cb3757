//! Analytic European option engine (Black-Scholes).
//!
//! Prices European vanilla options on a non-dividend-paying underlying with
//! the closed-form Black-Scholes formula. It is the reference the
//! finite-difference schemes converge to.

use fd_core::{errors::Result, Real};
use fd_instruments::{ContractSpec, OptionType, PricingEngine, PricingResults};
use fd_math::{normal_cdf, normal_pdf};

/// Analytic pricing engine for European vanilla options.
///
/// $$C = S N(d_1) - K e^{-rT} N(d_2)$$
/// $$P = K e^{-rT} N(-d_2) - S N(-d_1)$$
///
/// where $d_{1,2} = \frac{\ln(S/K) + (r \pm \sigma^2/2)T}{\sigma\sqrt{T}}$
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticEuropeanEngine;

impl AnalyticEuropeanEngine {
    /// Create a new engine.
    pub fn new() -> Self {
        Self
    }
}

/// Black-Scholes price and Greeks of a European option.
///
/// Returns `(price, delta, gamma, theta)`, with theta per year of calendar
/// time.
pub fn black_scholes(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    risk_free_rate: Real,
    volatility: Real,
    time_to_expiry: Real,
) -> (Real, Real, Real, Real) {
    let phi = option_type.sign();
    let t = time_to_expiry;

    if t <= 0.0 {
        let intrinsic = (phi * (spot - strike)).max(0.0);
        return (intrinsic, 0.0, 0.0, 0.0);
    }

    let r = risk_free_rate;
    let df = (-r * t).exp();

    // S = 0 is absorbing: the call is worthless, the put is the discounted strike.
    if spot <= 0.0 {
        return match option_type {
            OptionType::Call => (0.0, 0.0, 0.0, 0.0),
            OptionType::Put => (strike * df, -1.0, 0.0, r * strike * df),
        };
    }

    let sigma = volatility;
    let sqrt_t = t.sqrt();
    let std_dev = sigma * sqrt_t;

    if std_dev <= 1e-15 {
        // Deterministic forward: discounted intrinsic value of the forward.
        let forward_intrinsic = phi * (spot - strike * df);
        return if forward_intrinsic > 0.0 {
            (forward_intrinsic, phi, 0.0, -phi * r * strike * df)
        } else {
            (0.0, 0.0, 0.0, 0.0)
        };
    }

    let d1 = ((spot / strike).ln() + (r + 0.5 * sigma * sigma) * t) / std_dev;
    let d2 = d1 - std_dev;

    let nd1 = normal_cdf(phi * d1);
    let nd2 = normal_cdf(phi * d2);
    let npd1 = normal_pdf(d1);

    let price = phi * (spot * nd1 - strike * df * nd2);
    let delta = phi * nd1;
    let gamma = npd1 / (spot * std_dev);
    let theta = -(spot * npd1 * sigma) / (2.0 * sqrt_t) - phi * r * strike * df * nd2;

    (price, delta, gamma, theta)
}

/// Black-Scholes price of a European option.
pub fn black_scholes_price(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    risk_free_rate: Real,
    volatility: Real,
    time_to_expiry: Real,
) -> Real {
    black_scholes(
        option_type,
        spot,
        strike,
        risk_free_rate,
        volatility,
        time_to_expiry,
    )
    .0
}

impl PricingEngine<ContractSpec> for AnalyticEuropeanEngine {
    fn calculate(&self, args: &ContractSpec) -> Result<PricingResults> {
        args.validate()?;
        let (price, delta, gamma, theta) = black_scholes(
            args.option_type(),
            args.spot(),
            args.strike(),
            args.rate(),
            args.volatility(),
            args.maturity(),
        );
        Ok(PricingResults::from_npv(price)
            .with_result("delta", delta)
            .with_result("gamma", gamma)
            .with_result("theta", theta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    const T: Real = 5.0 / 12.0;

    #[test]
    fn reference_prices() {
        // S = K = 50, r = 10%, σ = 40%, five months
        let call = black_scholes_price(OptionType::Call, 50.0, 50.0, 0.1, 0.4, T);
        let put = black_scholes_price(OptionType::Put, 50.0, 50.0, 0.1, 0.4, T);
        assert_abs_diff_eq!(call, 6.116508, epsilon = 1e-5);
        assert_abs_diff_eq!(put, 4.075981, epsilon = 1e-5);
    }

    #[test]
    fn greeks_signs() {
        let (_, delta, gamma, theta) = black_scholes(OptionType::Put, 50.0, 50.0, 0.1, 0.4, T);
        assert!(delta > -1.0 && delta < 0.0, "delta = {delta}");
        assert!(gamma > 0.0, "gamma = {gamma}");
        assert!(theta < 0.0, "theta = {theta}");
        let (_, call_delta, call_gamma, _) =
            black_scholes(OptionType::Call, 50.0, 50.0, 0.1, 0.4, T);
        assert_abs_diff_eq!(call_delta - delta, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(call_gamma, gamma, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(black_scholes_price(OptionType::Put, 40.0, 50.0, 0.1, 0.4, 0.0), 10.0);
        assert_eq!(black_scholes_price(OptionType::Call, 0.0, 50.0, 0.1, 0.4, T), 0.0);
        assert_abs_diff_eq!(
            black_scholes_price(OptionType::Put, 0.0, 50.0, 0.1, 0.4, T),
            50.0 * (-0.1 * T).exp(),
            epsilon = 1e-12
        );
        // zero volatility: discounted forward intrinsic
        assert_abs_diff_eq!(
            black_scholes_price(OptionType::Call, 50.0, 50.0, 0.1, 0.0, T),
            50.0 - 50.0 * (-0.1 * T).exp(),
            epsilon = 1e-12
        );
        assert_eq!(black_scholes_price(OptionType::Put, 50.0, 50.0, 0.1, 0.0, T), 0.0);
    }

    #[test]
    fn engine_reports_greeks() {
        let c = ContractSpec::new(50.0, 50.0, 0.1, T, 0.4, OptionType::Call).unwrap();
        let r = AnalyticEuropeanEngine::new().calculate(&c).unwrap();
        assert_abs_diff_eq!(r.npv, 6.116508, epsilon = 1e-5);
        assert!(r.result("delta").is_some());
        assert!(r.result("gamma").is_some());
        assert!(r.result("theta").is_some());
    }

    proptest! {
        #[test]
        fn put_call_parity(
            spot in 1.0f64..200.0,
            strike in 1.0f64..200.0,
            r in -0.05f64..0.2,
            sigma in 0.01f64..1.0,
            t in 0.01f64..5.0,
        ) {
            let c = black_scholes_price(OptionType::Call, spot, strike, r, sigma, t);
            let p = black_scholes_price(OptionType::Put, spot, strike, r, sigma, t);
            let forward = spot - strike * (-r * t).exp();
            prop_assert!((c - p - forward).abs() < 1e-8 * (1.0 + spot + strike));
        }
    }
}
