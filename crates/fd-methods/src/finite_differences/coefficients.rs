//! Finite-difference stencil coefficients.
//!
//! All weights are written in terms of the stencil index `x_i = S_i / dS`.
//! At `x = 0` diffusion and drift vanish, which is correct since `S = 0`
//! is absorbing.

use super::grid::Grid;
use super::scheme::FdmScheme;
use fd_core::{errors::Result, Real, Size};
use fd_instruments::ContractSpec;
use fd_math::TridiagonalOperator;

/// Three-point stencil weights indexed by price step `0 … M`.
///
/// `lower[i]`, `centre[i]` and `upper[i]` weight nodes `i−1`, `i` and `i+1`.
/// They hold `(a, b, c)` for the explicit and implicit schemes and
/// `(α, β, γ)` for Crank-Nicolson.
#[derive(Debug, Clone, PartialEq)]
pub struct Stencil {
    /// Weight of node `i − 1`.
    pub lower: Vec<Real>,
    /// Weight of node `i`.
    pub centre: Vec<Real>,
    /// Weight of node `i + 1`.
    pub upper: Vec<Real>,
}

impl Stencil {
    fn from_fn(grid: &Grid, weights: impl Fn(Real) -> (Real, Real, Real)) -> Self {
        let m = grid.price_steps();
        let mut lower = Vec::with_capacity(m + 1);
        let mut centre = Vec::with_capacity(m + 1);
        let mut upper = Vec::with_capacity(m + 1);
        for i in 0..=m {
            let (l, c, u) = weights(grid.stencil_index(i));
            lower.push(l);
            centre.push(c);
            upper.push(u);
        }
        Self {
            lower,
            centre,
            upper,
        }
    }

    /// Explicit weights relating `V(i, j)` to `V(·, j+1)`:
    ///
    /// * `a = ½·dt·(σ²x² − r·x)`
    /// * `b = 1 − dt·(σ²x² + r)`
    /// * `c = ½·dt·(σ²x² + r·x)`
    pub fn explicit(grid: &Grid, contract: &ContractSpec) -> Self {
        let (dt, r, s2) = params(grid, contract);
        Self::from_fn(grid, |x| {
            let diffusion = s2 * x * x;
            (
                0.5 * dt * (diffusion - r * x),
                1.0 - dt * (diffusion + r),
                0.5 * dt * (diffusion + r * x),
            )
        })
    }

    /// Implicit weights of `a·V(i−1, j) + b·V(i, j) + c·V(i+1, j) = V(i, j+1)`:
    ///
    /// * `a = ½·(r·dt·x − σ²·dt·x²)`
    /// * `b = 1 + σ²·dt·x² + r·dt`
    /// * `c = −½·(r·dt·x + σ²·dt·x²)`
    pub fn implicit(grid: &Grid, contract: &ContractSpec) -> Self {
        let (dt, r, s2) = params(grid, contract);
        Self::from_fn(grid, |x| {
            let diffusion = s2 * dt * x * x;
            (
                0.5 * (r * dt * x - diffusion),
                1.0 + diffusion + r * dt,
                -0.5 * (r * dt * x + diffusion),
            )
        })
    }

    /// Crank-Nicolson half-step weights:
    ///
    /// * `α = ¼·dt·(σ²x² − r·x)`
    /// * `β = −½·dt·(σ²x² + r)`
    /// * `γ = ¼·dt·(σ²x² + r·x)`
    pub fn crank_nicolson(grid: &Grid, contract: &ContractSpec) -> Self {
        let (dt, r, s2) = params(grid, contract);
        Self::from_fn(grid, |x| {
            let diffusion = s2 * x * x;
            (
                0.25 * dt * (diffusion - r * x),
                -0.5 * dt * (diffusion + r),
                0.25 * dt * (diffusion + r * x),
            )
        })
    }

    /// The stencil restricted to the interior nodes `1 … M−1`, as a
    /// tridiagonal operator of size `M−1`.
    pub fn interior_operator(&self) -> Result<TridiagonalOperator> {
        let m = self.centre.len() - 1;
        TridiagonalOperator::from_bands(
            self.lower[1..m].to_vec(),
            self.centre[1..m].to_vec(),
            self.upper[1..m].to_vec(),
        )
    }

    /// Largest `dt·(σ²x² + r)` over the interior, i.e. `1 − min b`.
    ///
    /// The explicit scheme is monotone only while this stays at or below 1.
    pub fn explicit_stability_ratio(&self) -> Real {
        let m = self.centre.len() - 1;
        self.centre[1..m]
            .iter()
            .map(|b| 1.0 - b)
            .fold(Real::NEG_INFINITY, Real::max)
    }

    /// First interior node whose explicit centre weight `b` is negative, i.e.
    /// where the stability ratio exceeds 1.
    pub fn first_unstable_node(&self) -> Option<Size> {
        let m = self.centre.len() - 1;
        (1..m).find(|&i| self.centre[i] < 0.0)
    }
}

fn params(grid: &Grid, contract: &ContractSpec) -> (Real, Real, Real) {
    let sigma = contract.volatility();
    (grid.dt(), contract.rate(), sigma * sigma)
}

/// Stencil weights and operators for one scheme, built once per pricing.
#[derive(Debug, Clone)]
pub enum SchemeCoefficients {
    /// `(a, b, c)` applied directly to column `j+1`.
    Explicit(Stencil),
    /// `(a, b, c)` and the interior operator solved at each step.
    Implicit {
        /// Implicit weights.
        stencil: Stencil,
        /// Interior tridiagonal operator with bands `(a, b, c)`.
        operator: TridiagonalOperator,
    },
    /// `(α, β, γ)` with `M1 = I − L` and `M2 = I + L`, where `L` is the
    /// interior half-step operator with bands `(α, β, γ)`.
    CrankNicolson {
        /// Half-step weights.
        stencil: Stencil,
        /// Left-hand operator, solved at each step.
        m1: TridiagonalOperator,
        /// Right-hand operator, applied to column `j+1`.
        m2: TridiagonalOperator,
    },
}

impl SchemeCoefficients {
    /// Build the coefficients `scheme` needs on `grid`.
    pub fn build(scheme: &FdmScheme, grid: &Grid, contract: &ContractSpec) -> Result<Self> {
        Ok(match scheme {
            FdmScheme::Explicit => SchemeCoefficients::Explicit(Stencil::explicit(grid, contract)),
            FdmScheme::Implicit => {
                let stencil = Stencil::implicit(grid, contract);
                let operator = stencil.interior_operator()?;
                SchemeCoefficients::Implicit { stencil, operator }
            }
            FdmScheme::CrankNicolson
            | FdmScheme::CrankNicolsonBarrier { .. }
            | FdmScheme::CrankNicolsonAmerican(_) => {
                let stencil = Stencil::crank_nicolson(grid, contract);
                let mut m2 = stencil.interior_operator()?;
                let mut m1 = m2.clone();
                m1.scale(-1.0);
                m1.add_identity(1.0);
                m2.add_identity(1.0);
                SchemeCoefficients::CrankNicolson { stencil, m1, m2 }
            }
        })
    }

    /// The stencil the operators were built from.
    pub fn stencil(&self) -> &Stencil {
        match self {
            SchemeCoefficients::Explicit(stencil)
            | SchemeCoefficients::Implicit { stencil, .. }
            | SchemeCoefficients::CrankNicolson { stencil, .. } => stencil,
        }
    }
}
