//! The finite-difference pricing facade.

use super::boundary_conditions::BoundaryConditions;
use super::coefficients::SchemeCoefficients;
use super::grid::{DiscretizationSpec, Grid};
use super::psor::ProjectedSor;
use super::scheme::FdmScheme;
use super::traversal;
use fd_core::{errors::Error, errors::Result, Real};
use fd_instruments::ContractSpec;
use tracing::{debug, warn};

/// Values whose magnitude exceeds this multiple of the largest terminal or
/// edge value (or `K`, if larger) count as divergence.
const DIVERGENCE_FACTOR: Real = 10.0;

/// A 1-D finite difference solver for the Black-Scholes PDE.
///
/// Solves `∂V/∂t + ½σ²S²·∂²V/∂S² + rS·∂V/∂S − rV = 0` backward in time
/// from the terminal payoff on a uniform grid in `S`, in four fixed steps:
/// boundary/terminal conditions, stencil coefficients, grid traversal and
/// interpolation at the spot.
///
/// # Example
/// ```
/// use fd_instruments::{ContractSpec, OptionType};
/// use fd_methods::{DiscretizationSpec, FdBlackScholesSolver, FdmScheme};
///
/// let put = ContractSpec::new(50.0, 50.0, 0.1, 5.0 / 12.0, 0.4, OptionType::Put).unwrap();
/// let grid = DiscretizationSpec::new(100.0, 100, 42).unwrap();
/// let solver = FdBlackScholesSolver::new(put, grid, FdmScheme::american()).unwrap();
/// let price = solver.price().unwrap();
/// assert!(price > 4.0 && price < 4.6);
/// ```
#[derive(Debug, Clone)]
pub struct FdBlackScholesSolver {
    contract: ContractSpec,
    discretization: DiscretizationSpec,
    scheme: FdmScheme,
}

impl FdBlackScholesSolver {
    /// Create a solver, validating every input before any grid is allocated.
    ///
    /// # Errors
    /// `InvalidParameters` if the contract, the discretization or the
    /// scheme's own parameters are out of range, or `Smax ≤ max(K, S0)`.
    pub fn new(
        contract: ContractSpec,
        discretization: DiscretizationSpec,
        scheme: FdmScheme,
    ) -> Result<Self> {
        contract.validate()?;
        discretization.validate_for(&contract)?;
        scheme.validate(&discretization)?;
        Ok(Self {
            contract,
            discretization,
            scheme,
        })
    }

    /// The contract being priced.
    pub fn contract(&self) -> &ContractSpec {
        &self.contract
    }

    /// The grid resolution.
    pub fn discretization(&self) -> &DiscretizationSpec {
        &self.discretization
    }

    /// The scheme variant.
    pub fn scheme(&self) -> &FdmScheme {
        &self.scheme
    }

    /// Build and fully traverse the grid; column 0 then holds today's values.
    ///
    /// # Errors
    /// `SingularSystem` if an operator cannot be factorised,
    /// `NonConvergence` if projected SOR hits its cap, and
    /// `NumericalInstability` if the explicit scheme is outside its stability
    /// region or the traversed grid diverged.
    pub fn solve(&self) -> Result<Grid> {
        let s_lo = self.scheme.barrier().unwrap_or(0.0);
        let mut grid = Grid::new(s_lo, &self.discretization, self.contract.maturity());
        debug!(
            scheme = %self.scheme,
            option_type = %self.contract.option_type(),
            price_steps = grid.price_steps(),
            time_steps = grid.time_steps(),
            ds = grid.ds(),
            dt = grid.dt(),
            "solving Black-Scholes PDE"
        );

        let boundaries = BoundaryConditions::new(&self.contract, &self.scheme, &grid);
        boundaries.apply(&mut grid);

        let coefficients = SchemeCoefficients::build(&self.scheme, &grid, &self.contract)?;

        match (&coefficients, &self.scheme) {
            (SchemeCoefficients::Explicit(stencil), _) => {
                if let Some(price_step) = stencil.first_unstable_node() {
                    let ratio = stencil.explicit_stability_ratio();
                    warn!(ratio, price_step, "explicit scheme outside its stability region");
                    return Err(Error::NumericalInstability {
                        time_step: grid.time_steps() - 1,
                        price_step,
                    });
                }
                traversal::explicit(&mut grid, stencil);
            }
            (SchemeCoefficients::Implicit { stencil, operator }, _) => {
                traversal::implicit(&mut grid, stencil, operator)?;
            }
            (
                SchemeCoefficients::CrankNicolson { stencil, m2, .. },
                FdmScheme::CrankNicolsonAmerican(settings),
            ) => {
                let psor = ProjectedSor::new(stencil, *settings)?;
                let floor = boundaries.exercise_floor(&grid);
                traversal::crank_nicolson_american(&mut grid, stencil, m2, &psor, &floor)?;
            }
            (SchemeCoefficients::CrankNicolson { stencil, m1, m2 }, _) => {
                traversal::crank_nicolson(&mut grid, stencil, m1, m2)?;
            }
        }

        let bound = DIVERGENCE_FACTOR * grid.boundary_magnitude().max(self.contract.strike());
        if let Err(e) = grid.ensure_bounded(bound) {
            warn!(error = %e, scheme = %self.scheme, "grid diverged");
            return Err(e);
        }
        Ok(grid)
    }

    /// Price today at the contract's spot.
    pub fn price(&self) -> Result<Real> {
        let grid = self.solve()?;
        let price = grid.value_at(self.contract.spot(), 0)?;
        debug!(price, spot = self.contract.spot(), "interpolated price");
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finite_differences::PsorSettings;
    use approx::assert_abs_diff_eq;
    use fd_core::Error;
    use fd_instruments::OptionType;

    const T: Real = 5.0 / 12.0;

    fn contract(option_type: OptionType) -> ContractSpec {
        ContractSpec::new(50.0, 50.0, 0.1, T, 0.4, option_type).unwrap()
    }

    fn price(option_type: OptionType, m: usize, n: usize, scheme: FdmScheme) -> Result<Real> {
        let disc = DiscretizationSpec::new(100.0, m, n)?;
        FdBlackScholesSolver::new(contract(option_type), disc, scheme)?.price()
    }

    #[test]
    fn interpolation_is_exact_at_nodes() {
        let disc = DiscretizationSpec::new(100.0, 100, 42).unwrap();
        let solver =
            FdBlackScholesSolver::new(contract(OptionType::Put), disc, FdmScheme::CrankNicolson)
                .unwrap();
        let grid = solver.solve().unwrap();
        for i in [0, 1, 37, 50, 99, 100] {
            assert_eq!(grid.value_at(grid.price(i), 0).unwrap(), grid.value(i, 0));
        }
    }

    #[test]
    fn schemes_agree_at_the_money() {
        let cn = price(OptionType::Put, 100, 100, FdmScheme::CrankNicolson).unwrap();
        let im = price(OptionType::Put, 100, 100, FdmScheme::Implicit).unwrap();
        let ex = price(OptionType::Put, 40, 500, FdmScheme::Explicit).unwrap();
        assert_abs_diff_eq!(cn, 4.0723, epsilon = 5e-3);
        assert_abs_diff_eq!(im, cn, epsilon = 2e-2);
        assert_abs_diff_eq!(ex, cn, epsilon = 4e-2);
    }

    #[test]
    fn unstable_explicit_is_reported() {
        let result = price(OptionType::Put, 100, 42, FdmScheme::Explicit);
        assert!(
            matches!(result, Err(Error::NumericalInstability { .. })),
            "{result:?}"
        );
    }

    #[test]
    fn unstable_explicit_fails_before_traversal() {
        // ratio ≈ 50.7: the traversed grid would stay finite but go negative
        let result = price(OptionType::Put, 40, 2, FdmScheme::Explicit);
        assert_eq!(
            result,
            Err(Error::NumericalInstability {
                time_step: 1,
                price_step: 6
            })
        );
        // dt·(σ²i² + r) first exceeds 1 at i = 26
        let result = price(OptionType::Put, 100, 42, FdmScheme::Explicit);
        assert!(
            matches!(
                result,
                Err(Error::NumericalInstability {
                    time_step: 41,
                    price_step: 26
                })
            ),
            "{result:?}"
        );
    }

    #[test]
    fn large_edge_values_are_not_divergence() {
        // negative rate: the put's lower edge K·e^{−rτ} ≈ 1004 dwarfs Smax
        let c = ContractSpec::new(50.0, 50.0, -0.3, 10.0, 0.2, OptionType::Put).unwrap();
        let disc = DiscretizationSpec::new(100.0, 100, 200).unwrap();
        let cn = FdBlackScholesSolver::new(c, disc, FdmScheme::CrankNicolson)
            .unwrap()
            .price()
            .unwrap();
        assert_abs_diff_eq!(cn, 954.28, epsilon = 0.1);
        let im = FdBlackScholesSolver::new(c, disc, FdmScheme::Implicit)
            .unwrap()
            .price()
            .unwrap();
        assert!(im > 900.0 && im < 1000.0, "implicit = {im}");
    }

    #[test]
    fn spot_below_barrier_is_knocked_out() {
        let c = ContractSpec::new(35.0, 50.0, 0.1, T, 0.4, OptionType::Call).unwrap();
        let disc = DiscretizationSpec::new(100.0, 100, 42).unwrap();
        let p = FdBlackScholesSolver::new(c, disc, FdmScheme::down_and_out(40.0))
            .unwrap()
            .price()
            .unwrap();
        assert_eq!(p, 0.0);
    }

    #[test]
    fn smallest_grid_prices() {
        for scheme in [
            FdmScheme::Explicit,
            FdmScheme::Implicit,
            FdmScheme::CrankNicolson,
            FdmScheme::american(),
        ] {
            let p = price(OptionType::Put, 2, 1, scheme).unwrap();
            assert!(p.is_finite() && p > 0.0, "{scheme}: {p}");
        }
    }

    #[test]
    fn invalid_inputs_rejected_before_solving() {
        let disc = DiscretizationSpec::new(100.0, 10, 10).unwrap();
        let deep = ContractSpec::new(150.0, 50.0, 0.1, T, 0.4, OptionType::Call).unwrap();
        assert!(matches!(
            FdBlackScholesSolver::new(deep, disc, FdmScheme::CrankNicolson),
            Err(Error::InvalidParameters(_))
        ));
        assert!(matches!(
            FdBlackScholesSolver::new(
                contract(OptionType::Put),
                disc,
                FdmScheme::CrankNicolsonAmerican(PsorSettings::new(2.5, 1e-3))
            ),
            Err(Error::InvalidParameters(_))
        ));
    }
}
