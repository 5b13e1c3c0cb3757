//! Tridiagonal operators.
//!
//! Finite-difference stencils on a 1-D grid couple each node only to its two
//! neighbours, so the operators are stored as three bands rather than a dense
//! matrix. An operator is factorised once ([`TridiagonalOperator::factorize`])
//! and the resulting [`TridiagonalLu`] is reused for every time step.

use fd_core::{errors::Error, errors::Result, Real};

/// A tridiagonal matrix operator.
///
/// Stores the lower, diagonal, and upper bands, all of length `n`.
#[derive(Debug, Clone, PartialEq)]
pub struct TridiagonalOperator {
    /// Lower diagonal (index 0 unused, starts from row 1).
    pub lower: Vec<Real>,
    /// Main diagonal.
    pub diag: Vec<Real>,
    /// Upper diagonal (last index unused, ends at row n−2).
    pub upper: Vec<Real>,
}

impl TridiagonalOperator {
    /// Create an operator from its three bands.
    ///
    /// `lower[0]` and `upper[n-1]` are ignored.
    pub fn from_bands(lower: Vec<Real>, diag: Vec<Real>, upper: Vec<Real>) -> Result<Self> {
        fd_core::ensure!(!diag.is_empty(), "tridiagonal operator must not be empty");
        fd_core::ensure!(
            lower.len() == diag.len() && upper.len() == diag.len(),
            "band lengths differ: lower {}, diag {}, upper {}",
            lower.len(),
            diag.len(),
            upper.len()
        );
        Ok(Self { lower, diag, upper })
    }

    /// Size (number of rows/columns).
    pub fn size(&self) -> usize {
        self.diag.len()
    }

    /// Apply the operator: `y = A · x`.
    pub fn apply(&self, x: &[Real]) -> Vec<Real> {
        let mut y = vec![0.0; self.size()];
        self.apply_into(x, &mut y);
        y
    }

    /// Apply the operator into a caller-owned buffer.
    pub fn apply_into(&self, x: &[Real], y: &mut [Real]) {
        let n = self.size();
        debug_assert_eq!(x.len(), n);
        debug_assert_eq!(y.len(), n);
        if n == 1 {
            y[0] = self.diag[0] * x[0];
            return;
        }
        y[0] = self.diag[0] * x[0] + self.upper[0] * x[1];
        for i in 1..n - 1 {
            y[i] = self.lower[i] * x[i - 1] + self.diag[i] * x[i] + self.upper[i] * x[i + 1];
        }
        y[n - 1] = self.lower[n - 1] * x[n - 2] + self.diag[n - 1] * x[n - 1];
    }

    /// Scale all entries by a scalar.
    pub fn scale(&mut self, factor: Real) {
        for v in &mut self.lower {
            *v *= factor;
        }
        for v in &mut self.diag {
            *v *= factor;
        }
        for v in &mut self.upper {
            *v *= factor;
        }
    }

    /// Add the identity matrix scaled by `factor`: `A ← A + factor · I`.
    pub fn add_identity(&mut self, factor: Real) {
        for d in &mut self.diag {
            *d += factor;
        }
    }

    /// LU-factorise the operator (Thomas algorithm without pivoting).
    ///
    /// # Errors
    /// [`Error::SingularSystem`] if a pivot vanishes or is not finite.
    pub fn factorize(&self) -> Result<TridiagonalLu> {
        let n = self.size();
        let mut pivots = vec![0.0; n];
        let mut c_prime = vec![0.0; n];

        for i in 0..n {
            let m = if i == 0 {
                self.diag[0]
            } else {
                self.diag[i] - self.lower[i] * c_prime[i - 1]
            };
            if !m.is_finite() || m.abs() < Real::MIN_POSITIVE {
                return Err(Error::SingularSystem(format!(
                    "zero or non-finite pivot {m} at row {i} of {n}"
                )));
            }
            pivots[i] = m;
            if i < n - 1 {
                c_prime[i] = self.upper[i] / m;
            }
        }

        Ok(TridiagonalLu {
            lower: self.lower.clone(),
            pivots,
            c_prime,
        })
    }

    /// Solve `A · x = rhs`, factorising on the fly.
    ///
    /// Prefer [`factorize`](Self::factorize) when the same operator is
    /// solved against many right-hand sides.
    pub fn solve(&self, rhs: &[Real]) -> Result<Vec<Real>> {
        Ok(self.factorize()?.solve(rhs))
    }
}

/// LU factors of a [`TridiagonalOperator`].
#[derive(Debug, Clone)]
pub struct TridiagonalLu {
    lower: Vec<Real>,
    pivots: Vec<Real>,
    c_prime: Vec<Real>,
}

impl TridiagonalLu {
    /// Size of the factorised system.
    pub fn size(&self) -> usize {
        self.pivots.len()
    }

    /// Solve `A · x = rhs`.
    pub fn solve(&self, rhs: &[Real]) -> Vec<Real> {
        let mut x = vec![0.0; self.size()];
        self.solve_into(rhs, &mut x);
        x
    }

    /// Solve `A · x = rhs` into a caller-owned buffer.
    pub fn solve_into(&self, rhs: &[Real], x: &mut [Real]) {
        let n = self.size();
        debug_assert_eq!(rhs.len(), n);
        debug_assert_eq!(x.len(), n);

        // Forward sweep, storing d' in x
        x[0] = rhs[0] / self.pivots[0];
        for i in 1..n {
            x[i] = (rhs[i] - self.lower[i] * x[i - 1]) / self.pivots[i];
        }

        // Back substitution
        for i in (0..n - 1).rev() {
            x[i] -= self.c_prime[i] * x[i + 1];
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
