//! Projected successive over-relaxation.
//!
//! Solves the Crank-Nicolson system `M1·x = rhs` subject to `x ≥ floor`
//! node by node. A sweep runs over the interior in increasing price order;
//! node `k` sees the already-updated `x[k−1]` and the previous sweep's
//! `x[k+1]`:
//!
//! ```text
//! x[k] ← max(floor[k], x[k] + ω/(1−β) · (rhs[k] + α·x[k−1] − (1−β)·x[k] + γ·x[k+1]))
//! ```
//!
//! The first and last interior nodes drop the missing neighbour term; their
//! edge values are already folded into `rhs`.

use super::coefficients::Stencil;
use super::scheme::PsorSettings;
use fd_core::{errors::Error, errors::Result, Real, Size};

/// Projected SOR solver bound to one Crank-Nicolson stencil.
#[derive(Debug)]
pub struct ProjectedSor<'a> {
    stencil: &'a Stencil,
    diagonal: Vec<Real>,
    settings: PsorSettings,
}

impl<'a> ProjectedSor<'a> {
    /// Prepare the solver, checking the diagonal `1 − β_i` of every interior
    /// row.
    ///
    /// # Errors
    /// [`Error::SingularSystem`] if a diagonal entry is zero or not finite.
    pub fn new(stencil: &'a Stencil, settings: PsorSettings) -> Result<Self> {
        let m = stencil.centre.len() - 1;
        let diagonal: Vec<Real> = stencil.centre[1..m].iter().map(|beta| 1.0 - beta).collect();
        if let Some((k, d)) = diagonal
            .iter()
            .enumerate()
            .find(|(_, d)| !d.is_finite() || d.abs() < Real::MIN_POSITIVE)
        {
            return Err(Error::SingularSystem(format!(
                "zero or non-finite PSOR diagonal {d} at interior row {k}"
            )));
        }
        Ok(Self {
            stencil,
            diagonal,
            settings,
        })
    }

    /// Relax `values` (initially the starting guess) until a sweep changes
    /// it by at most the tolerance.
    ///
    /// Returns the number of sweeps and the final error.
    ///
    /// # Errors
    /// [`Error::NonConvergence`] after `max_iterations` sweeps; `time_step`
    /// only labels the error.
    pub fn solve(
        &self,
        rhs: &[Real],
        floor: &[Real],
        values: &mut [Real],
        time_step: Size,
    ) -> Result<(Size, Real)> {
        let n = self.diagonal.len();
        debug_assert_eq!(rhs.len(), n);
        debug_assert_eq!(floor.len(), n);
        debug_assert_eq!(values.len(), n);

        let omega = self.settings.omega;
        let alpha = &self.stencil.lower;
        let gamma = &self.stencil.upper;
        let mut old = values.to_vec();
        let mut error = Real::INFINITY;

        for iteration in 1..=self.settings.max_iterations {
            let mut squared = 0.0;
            for k in 0..n {
                let i = k + 1;
                let d = self.diagonal[k];
                let mut residual = rhs[k] - d * old[k];
                if k > 0 {
                    residual += alpha[i] * values[k - 1];
                }
                if k + 1 < n {
                    residual += gamma[i] * old[k + 1];
                }
                let relaxed = old[k] + omega / d * residual;
                values[k] = relaxed.max(floor[k]);
                let change = values[k] - old[k];
                squared += change * change;
            }
            error = squared.sqrt();
            if error <= self.settings.tolerance {
                return Ok((iteration, error));
            }
            old.copy_from_slice(values);
        }

        Err(Error::NonConvergence {
            time_step,
            iterations: self.settings.max_iterations,
            error,
        })
    }
}
