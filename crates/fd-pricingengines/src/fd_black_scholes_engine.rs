//! Finite-difference Black-Scholes engine.
//!
//! Wraps [`FdBlackScholesSolver`] as a [`PricingEngine`] and reads Greeks off
//! the traversed grid:
//!
//! * delta and gamma by central differences on today's column around the
//!   node nearest the spot
//! * theta as `(V(S0, dt) − V(S0, 0)) / dt`, interpolated at the spot

use fd_core::{errors::Result, Real, Size};
use fd_instruments::{ContractSpec, PricingEngine, PricingResults};
use fd_math::close_enough;
use fd_methods::{DiscretizationSpec, FdBlackScholesSolver, FdmScheme, Grid};
use tracing::debug;

/// Finite-difference pricing engine for European, down-and-out and American
/// vanilla options.
///
/// # Example
/// ```
/// use fd_instruments::{ContractSpec, OptionType, PricingEngine};
/// use fd_methods::{DiscretizationSpec, FdmScheme};
/// use fd_pricingengines::FdBlackScholesEngine;
///
/// let engine = FdBlackScholesEngine::new(
///     DiscretizationSpec::new(100.0, 100, 100).unwrap(),
///     FdmScheme::CrankNicolson,
/// )
/// .unwrap();
/// let put = ContractSpec::new(50.0, 50.0, 0.1, 5.0 / 12.0, 0.4, OptionType::Put).unwrap();
/// let results = engine.calculate(&put).unwrap();
/// assert!((results.npv - 4.0760).abs() < 1e-2);
/// assert!(results.result("delta").unwrap() < 0.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FdBlackScholesEngine {
    discretization: DiscretizationSpec,
    scheme: FdmScheme,
}

impl FdBlackScholesEngine {
    /// Create an engine pricing every contract on the same grid resolution
    /// with the same scheme.
    pub fn new(discretization: DiscretizationSpec, scheme: FdmScheme) -> Result<Self> {
        discretization.validate()?;
        scheme.validate(&discretization)?;
        Ok(Self {
            discretization,
            scheme,
        })
    }

    /// The grid resolution.
    pub fn discretization(&self) -> &DiscretizationSpec {
        &self.discretization
    }

    /// The scheme variant.
    pub fn scheme(&self) -> &FdmScheme {
        &self.scheme
    }
}

/// Price `contract` with `scheme` on `discretization`.
///
/// # Errors
/// Any [`fd_core::Error`] raised while validating the inputs or traversing
/// the grid.
pub fn price(
    contract: &ContractSpec,
    discretization: &DiscretizationSpec,
    scheme: &FdmScheme,
) -> Result<Real> {
    FdBlackScholesSolver::new(*contract, *discretization, *scheme)?.price()
}

/// Interior node nearest `spot`, kept one node away from both edges so the
/// central differences stay on the grid.
fn nearest_interior_node(grid: &Grid, spot: Real) -> Size {
    let m = grid.price_steps();
    let offset = ((spot - grid.price(0)) / grid.ds()).round();
    (offset.max(1.0) as Size).min(m - 1)
}

fn grid_greeks(grid: &Grid, spot: Real) -> Result<(Real, Real, Real)> {
    let k = nearest_interior_node(grid, spot);
    let ds = grid.ds();
    let (down, mid, up) = (grid.value(k - 1, 0), grid.value(k, 0), grid.value(k + 1, 0));
    let delta = (up - down) / (2.0 * ds);
    let gamma = (up - 2.0 * mid + down) / (ds * ds);
    let theta = (grid.value_at(spot, 1)? - grid.value_at(spot, 0)?) / grid.dt();
    Ok((delta, gamma, theta))
}

impl PricingEngine<ContractSpec> for FdBlackScholesEngine {
    fn calculate(&self, args: &ContractSpec) -> Result<PricingResults> {
        let solver = FdBlackScholesSolver::new(*args, self.discretization, self.scheme)?;
        let spot = args.spot();

        if let Some(barrier) = self.scheme.barrier() {
            if spot < barrier || close_enough(spot, barrier, 4) {
                debug!(spot, barrier, "spot at or below barrier; option knocked out");
                return Ok(PricingResults::from_npv(0.0)
                    .with_result("delta", 0.0)
                    .with_result("gamma", 0.0)
                    .with_result("theta", 0.0));
            }
        }

        let grid = solver.solve()?;
        let npv = grid.value_at(spot, 0)?;
        let (delta, gamma, theta) = grid_greeks(&grid, spot)?;
        debug!(
            scheme = %self.scheme,
            npv,
            delta,
            gamma,
            theta,
            "finite-difference pricing complete"
        );

        Ok(PricingResults::from_npv(npv)
            .with_result("delta", delta)
            .with_result("gamma", gamma)
            .with_result("theta", theta))
    }
}
