//! 1D interpolation over a sorted set of nodes.

use fd_core::{errors::Result, Real};

/// A 1D interpolation function `f: R → R` defined by a set of known points.
pub trait Interpolation1D: std::fmt::Debug {
    /// Evaluate the interpolation at `x`.
    fn value(&self, x: Real) -> Real;

    /// Return the lower bound of the interpolation domain.
    fn x_min(&self) -> Real;

    /// Return the upper bound of the interpolation domain.
    fn x_max(&self) -> Real;

    /// Return `true` if `x` is within the interpolation range.
    fn is_in_range(&self, x: Real) -> bool {
        x >= self.x_min() && x <= self.x_max()
    }
}

// ── Linear ────────────────────────────────────────────────────────────────────

/// Piecewise-linear interpolation with flat extrapolation.
///
/// `f(x) = y[i] + (y[i+1] - y[i]) * (x - x[i]) / (x[i+1] - x[i])` inside the
/// nodes; outside them the nearest edge value is returned. At a node `x[i]`
/// the stored `y[i]` comes back exactly.
#[derive(Debug, Clone)]
pub struct LinearInterpolation<'a> {
    xs: &'a [Real],
    ys: &'a [Real],
}

impl<'a> LinearInterpolation<'a> {
    /// Construct a linear interpolation from strictly increasing `xs` and
    /// corresponding `ys`.
    ///
    /// # Errors
    /// Returns an error if the slices have different lengths, fewer than 2
    /// points, or `xs` is not strictly increasing.
    pub fn new(xs: &'a [Real], ys: &'a [Real]) -> Result<Self> {
        fd_core::ensure!(xs.len() >= 2, "need at least 2 points for interpolation");
        fd_core::ensure!(
            xs.len() == ys.len(),
            "xs and ys must have the same length ({} vs {})",
            xs.len(),
            ys.len()
        );
        fd_core::ensure!(
            xs.windows(2).all(|w| w[0] < w[1]),
            "interpolation nodes must be strictly increasing"
        );
        Ok(Self { xs, ys })
    }

    /// Index `i` of the interval `[x[i], x[i+1])` containing `x`.
    fn locate(&self, x: Real) -> usize {
        let n = self.xs.len();
        self.xs.partition_point(|&node| node <= x).clamp(1, n - 1) - 1
    }
}

impl Interpolation1D for LinearInterpolation<'_> {
    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }

    fn value(&self, x: Real) -> Real {
        let n = self.xs.len();
        if x <= self.xs[0] {
            return self.ys[0];
        }
        if x >= self.xs[n - 1] {
            return self.ys[n - 1];
        }
        let i = self.locate(x);
        let dx = self.xs[i + 1] - self.xs[i];
        self.ys[i] + (x - self.xs[i]) * (self.ys[i + 1] - self.ys[i]) / dx
    }
}
