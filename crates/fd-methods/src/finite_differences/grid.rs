//! The (price × time) grid.

use fd_core::{ensure, errors::Error, errors::Result, Real, Size, Time};
use fd_instruments::ContractSpec;
use fd_math::{Interpolation1D, LinearInterpolation};
use nalgebra::DMatrix;

// ─── Discretization ───────────────────────────────────────────────────────────

/// Truncation and resolution of the grid: `Smax`, `M` price steps and
/// `N` time steps.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscretizationSpec {
    s_max: Real,
    price_steps: Size,
    time_steps: Size,
}

impl DiscretizationSpec {
    /// Create a discretization with `price_steps = M ≥ 2` and
    /// `time_steps = N ≥ 1`.
    pub fn new(s_max: Real, price_steps: Size, time_steps: Size) -> Result<Self> {
        let spec = Self {
            s_max,
            price_steps,
            time_steps,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check the contract-independent invariants.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.s_max.is_finite() && self.s_max > 0.0,
            "Smax must be finite and positive, got {}",
            self.s_max
        );
        ensure!(
            self.price_steps >= 2,
            "need at least 2 price steps, got {}",
            self.price_steps
        );
        ensure!(
            self.time_steps >= 1,
            "need at least 1 time step, got {}",
            self.time_steps
        );
        Ok(())
    }

    /// Check `Smax > max(K, S0)` for `contract`.
    pub fn validate_for(&self, contract: &ContractSpec) -> Result<()> {
        self.validate()?;
        ensure!(
            self.s_max > contract.strike().max(contract.spot()),
            "Smax {} must exceed both strike {} and spot {}",
            self.s_max,
            contract.strike(),
            contract.spot()
        );
        Ok(())
    }

    /// Upper truncation of the price domain.
    pub fn s_max(&self) -> Real {
        self.s_max
    }

    /// Number of price steps `M`.
    pub fn price_steps(&self) -> Size {
        self.price_steps
    }

    /// Number of time steps `N`.
    pub fn time_steps(&self) -> Size {
        self.time_steps
    }
}

// ─── Grid ─────────────────────────────────────────────────────────────────────

/// Option values on a uniform `(M+1) × (N+1)` grid.
///
/// Row `i` is the price node `S_i = S_lo + i·dS`, column `j` the time
/// `t_j = j·dt`. Column `N` holds the terminal payoff and, once traversed,
/// column 0 holds today's values. Rows 0 and `M` are the Dirichlet edges.
#[derive(Debug, Clone)]
pub struct Grid {
    prices: Vec<Real>,
    ds: Real,
    dt: Time,
    values: DMatrix<Real>,
}

impl Grid {
    /// Allocate a zero grid over `[s_lo, s_max]` with the given resolution
    /// and maturity.
    pub fn new(s_lo: Real, discretization: &DiscretizationSpec, maturity: Time) -> Self {
        let m = discretization.price_steps();
        let n = discretization.time_steps();
        let s_max = discretization.s_max();
        let ds = (s_max - s_lo) / m as Real;
        let mut prices: Vec<Real> = (0..=m).map(|i| s_lo + i as Real * ds).collect();
        prices[m] = s_max;
        Self {
            prices,
            ds,
            dt: maturity / n as Real,
            values: DMatrix::zeros(m + 1, n + 1),
        }
    }

    /// Number of price steps `M`.
    pub fn price_steps(&self) -> Size {
        self.values.nrows() - 1
    }

    /// Number of time steps `N`.
    pub fn time_steps(&self) -> Size {
        self.values.ncols() - 1
    }

    /// Price step `dS`.
    pub fn ds(&self) -> Real {
        self.ds
    }

    /// Time step `dt`.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// The price axis `S_0 … S_M`.
    pub fn prices(&self) -> &[Real] {
        &self.prices
    }

    /// Price at node `i`.
    pub fn price(&self, i: Size) -> Real {
        self.prices[i]
    }

    /// Residual time to maturity at column `j`, `dt·(N−j)`.
    pub fn time_to_maturity(&self, j: Size) -> Time {
        (self.time_steps() - j) as Real * self.dt
    }

    /// Stencil index `S_i / dS` of node `i`.
    ///
    /// Equals `i` on a grid anchored at zero; on a barrier grid it is offset
    /// by `barrier / dS`.
    pub fn stencil_index(&self, i: Size) -> Real {
        self.prices[i] / self.ds
    }

    /// Value at node `(i, j)`.
    #[inline]
    pub fn value(&self, i: Size, j: Size) -> Real {
        self.values[(i, j)]
    }

    /// Overwrite node `(i, j)`.
    #[inline]
    pub fn set_value(&mut self, i: Size, j: Size, value: Real) {
        self.values[(i, j)] = value;
    }

    /// All price nodes of column `j`.
    pub fn column(&self, j: Size) -> Vec<Real> {
        self.values.column(j).iter().copied().collect()
    }

    /// Interior nodes `1 … M−1` of column `j`.
    pub fn interior(&self, j: Size) -> Vec<Real> {
        (1..self.price_steps()).map(|i| self.value(i, j)).collect()
    }

    /// Overwrite the interior nodes of column `j`.
    pub fn set_interior(&mut self, j: Size, interior: &[Real]) {
        debug_assert_eq!(interior.len(), self.price_steps() - 1);
        for (k, &v) in interior.iter().enumerate() {
            self.values[(k + 1, j)] = v;
        }
    }

    /// Linearly interpolate column `j` at `spot`, flat outside the axis.
    pub fn value_at(&self, spot: Real, j: Size) -> Result<Real> {
        let column = self.column(j);
        Ok(LinearInterpolation::new(&self.prices, &column)?.value(spot))
    }

    /// Largest magnitude on the terminal column and the two edge rows.
    pub fn boundary_magnitude(&self) -> Real {
        let m = self.price_steps();
        let n = self.time_steps();
        let terminal = self.values.column(n).amax();
        let edges = self.values.row(0).amax().max(self.values.row(m).amax());
        terminal.max(edges)
    }

    /// Fail with [`Error::NumericalInstability`] at the first node (in
    /// traversal order) that is non-finite or whose magnitude exceeds `bound`.
    pub fn ensure_bounded(&self, bound: Real) -> Result<()> {
        for j in (0..=self.time_steps()).rev() {
            for i in 0..=self.price_steps() {
                let v = self.value(i, j);
                if !v.is_finite() || v.abs() > bound {
                    return Err(Error::NumericalInstability {
                        time_step: j,
                        price_step: i,
                    });
                }
            }
        }
        Ok(())
    }
}
