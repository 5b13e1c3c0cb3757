//! Terminal payoff and Dirichlet edge values.
//!
//! Edge values come from the discounted intrinsic value at each end of the
//! price domain. With residual time `τ`:
//!
//! | variant | lower edge `S_lo` | upper edge `Smax` |
//! |---|---|---|
//! | European call | `0` | `Smax − K·e^{−rτ}` |
//! | European put | `K·e^{−rτ} − S_lo` | `0` |
//! | American | `max(European edge, intrinsic)` | `max(European edge, intrinsic)` |
//! | down-and-out | `0` (knocked out) | as European |

use super::grid::Grid;
use super::scheme::FdmScheme;
use fd_core::{Real, Time};
use fd_instruments::{ContractSpec, OptionType, PlainVanillaPayoff};

/// Boundary and terminal conditions of one pricing.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryConditions {
    contract: ContractSpec,
    s_lo: Real,
    s_max: Real,
    knock_out: bool,
    american: bool,
}

impl BoundaryConditions {
    /// Conditions for `contract` priced with `scheme` on `grid`.
    pub fn new(contract: &ContractSpec, scheme: &FdmScheme, grid: &Grid) -> Self {
        Self {
            contract: *contract,
            s_lo: grid.price(0),
            s_max: grid.price(grid.price_steps()),
            knock_out: scheme.barrier().is_some(),
            american: scheme.is_american(),
        }
    }

    fn payoff(&self) -> PlainVanillaPayoff {
        self.contract.payoff()
    }

    /// Value on the lower edge with `tau` years left.
    pub fn lower(&self, tau: Time) -> Real {
        if self.knock_out {
            return 0.0;
        }
        let european = match self.contract.option_type() {
            OptionType::Call => 0.0,
            OptionType::Put => self.contract.strike() * self.contract.discount(tau) - self.s_lo,
        };
        if self.american {
            european.max(self.payoff().value(self.s_lo))
        } else {
            european
        }
    }

    /// Value on the upper edge with `tau` years left.
    pub fn upper(&self, tau: Time) -> Real {
        let european = match self.contract.option_type() {
            OptionType::Call => self.s_max - self.contract.strike() * self.contract.discount(tau),
            OptionType::Put => 0.0,
        };
        if self.american {
            european.max(self.payoff().value(self.s_max))
        } else {
            european
        }
    }

    /// Fill the terminal column with the payoff and both edge rows for every
    /// time step. Interior nodes of earlier columns are left untouched.
    pub fn apply(&self, grid: &mut Grid) {
        let m = grid.price_steps();
        let n = grid.time_steps();
        let payoff = self.payoff();

        for i in 0..=m {
            grid.set_value(i, n, payoff.value(grid.price(i)));
        }
        for j in 0..=n {
            let tau = grid.time_to_maturity(j);
            grid.set_value(0, j, self.lower(tau));
            grid.set_value(m, j, self.upper(tau));
        }
    }

    /// The early-exercise floor at the interior nodes `1 … M−1`.
    pub fn exercise_floor(&self, grid: &Grid) -> Vec<Real> {
        let payoff = self.payoff();
        (1..grid.price_steps())
            .map(|i| payoff.value(grid.price(i)))
            .collect()
    }
}
