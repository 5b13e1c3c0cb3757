//! Scheme selection and projected-SOR settings.

use super::grid::DiscretizationSpec;
use fd_core::{ensure, errors::Result, Real, Size};
use std::fmt;

// ─── PSOR settings ────────────────────────────────────────────────────────────

/// Parameters of the projected SOR loop used for American exercise.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PsorSettings {
    /// Relaxation factor ω, in `(0, 2)`.
    pub omega: Real,
    /// Convergence tolerance τ on the Euclidean norm of a sweep's change.
    pub tolerance: Real,
    /// Sweeps allowed per time step before giving up.
    pub max_iterations: Size,
}

impl PsorSettings {
    /// Settings with the given ω and τ and the default iteration cap.
    pub fn new(omega: Real, tolerance: Real) -> Self {
        Self {
            omega,
            tolerance,
            ..Self::default()
        }
    }

    /// Override the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: Size) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Check `0 < ω < 2`, `τ ≥ 0` and a non-zero iteration cap.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.omega > 0.0 && self.omega < 2.0,
            "relaxation factor must lie in (0, 2), got {}",
            self.omega
        );
        ensure!(
            self.tolerance.is_finite() && self.tolerance >= 0.0,
            "tolerance must be finite and non-negative, got {}",
            self.tolerance
        );
        ensure!(self.max_iterations >= 1, "max_iterations must be at least 1");
        Ok(())
    }
}

impl Default for PsorSettings {
    fn default() -> Self {
        Self {
            omega: 1.2,
            tolerance: 1e-3,
            max_iterations: 10_000,
        }
    }
}

// ─── FDM scheme selection ─────────────────────────────────────────────────────

/// Finite difference time-stepping scheme and contract variant.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FdmScheme {
    /// Explicit: `V^{j} = A · V^{j+1}` ; conditionally stable.
    Explicit,
    /// Fully implicit: `A · V^{j} = V^{j+1}` ; unconditionally stable.
    Implicit,
    /// Crank-Nicolson: `M1 · V^{j} = M2 · V^{j+1}` ; second order in time.
    CrankNicolson,
    /// Crank-Nicolson on `[barrier, Smax]` for a down-and-out option.
    CrankNicolsonBarrier {
        /// Knock-out level.
        barrier: Real,
    },
    /// Crank-Nicolson with the early-exercise floor enforced by projected SOR.
    CrankNicolsonAmerican(PsorSettings),
}

impl FdmScheme {
    /// American variant with default PSOR settings.
    pub fn american() -> Self {
        FdmScheme::CrankNicolsonAmerican(PsorSettings::default())
    }

    /// Down-and-out variant at `barrier`.
    pub fn down_and_out(barrier: Real) -> Self {
        FdmScheme::CrankNicolsonBarrier { barrier }
    }

    /// The knock-out level, if any.
    pub fn barrier(&self) -> Option<Real> {
        match self {
            FdmScheme::CrankNicolsonBarrier { barrier } => Some(*barrier),
            _ => None,
        }
    }

    /// PSOR settings for the American variant.
    pub fn psor_settings(&self) -> Option<&PsorSettings> {
        match self {
            FdmScheme::CrankNicolsonAmerican(settings) => Some(settings),
            _ => None,
        }
    }

    /// `true` when the early-exercise constraint applies.
    pub fn is_american(&self) -> bool {
        matches!(self, FdmScheme::CrankNicolsonAmerican(_))
    }

    /// Check variant-specific parameters against the discretization.
    pub fn validate(&self, discretization: &DiscretizationSpec) -> Result<()> {
        match self {
            FdmScheme::CrankNicolsonBarrier { barrier } => {
                ensure!(
                    barrier.is_finite() && *barrier >= 0.0,
                    "barrier must be finite and non-negative, got {barrier}"
                );
                ensure!(
                    *barrier < discretization.s_max(),
                    "barrier {barrier} must lie below Smax {}",
                    discretization.s_max()
                );
            }
            FdmScheme::CrankNicolsonAmerican(settings) => settings.validate()?,
            FdmScheme::Explicit | FdmScheme::Implicit | FdmScheme::CrankNicolson => {}
        }
        Ok(())
    }
}

impl fmt::Display for FdmScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FdmScheme::Explicit => write!(f, "explicit"),
            FdmScheme::Implicit => write!(f, "implicit"),
            FdmScheme::CrankNicolson => write!(f, "crank-nicolson"),
            FdmScheme::CrankNicolsonBarrier { barrier } => {
                write!(f, "crank-nicolson down-and-out @ {barrier}")
            }
            FdmScheme::CrankNicolsonAmerican(s) => {
                write!(f, "crank-nicolson american (ω={}, τ={})", s.omega, s.tolerance)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fd_core::Error;

    fn disc() -> DiscretizationSpec {
        DiscretizationSpec::new(100.0, 100, 42).unwrap()
    }

    #[test]
    fn default_psor_settings() {
        let s = PsorSettings::default();
        assert_eq!(s.omega, 1.2);
        assert_eq!(s.tolerance, 1e-3);
        assert!(s.validate().is_ok());
        assert_eq!(PsorSettings::new(1.0, 0.0).max_iterations, 10_000);
    }

    #[test]
    fn psor_settings_rejected() {
        for s in [
            PsorSettings::new(0.0, 1e-3),
            PsorSettings::new(2.0, 1e-3),
            PsorSettings::new(1.2, -1e-3),
            PsorSettings::new(1.2, f64::NAN),
            PsorSettings::new(1.2, 1e-3).with_max_iterations(0),
        ] {
            assert!(matches!(s.validate(), Err(Error::InvalidParameters(_))), "{s:?}");
        }
    }

    #[test]
    fn barrier_must_lie_below_smax() {
        assert!(FdmScheme::down_and_out(40.0).validate(&disc()).is_ok());
        assert!(FdmScheme::down_and_out(0.0).validate(&disc()).is_ok());
        assert!(FdmScheme::down_and_out(100.0).validate(&disc()).is_err());
        assert!(FdmScheme::down_and_out(-1.0).validate(&disc()).is_err());
    }

    #[test]
    fn variant_queries() {
        assert_eq!(FdmScheme::down_and_out(40.0).barrier(), Some(40.0));
        assert_eq!(FdmScheme::CrankNicolson.barrier(), None);
        assert!(FdmScheme::american().is_american());
        assert!(FdmScheme::american().psor_settings().is_some());
        assert!(!FdmScheme::Implicit.is_american());
        assert_eq!(FdmScheme::Explicit.to_string(), "explicit");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn scheme_from_json() {
        let s: FdmScheme = serde_json::from_str(r#"{"crank_nicolson_barrier":{"barrier":40.0}}"#)
            .unwrap();
        assert_eq!(s, FdmScheme::down_and_out(40.0));
        let s: FdmScheme =
            serde_json::from_str(r#"{"crank_nicolson_american":{"omega":1.5}}"#).unwrap();
        assert_eq!(s.psor_settings().map(|p| p.omega), Some(1.5));
        assert_eq!(s.psor_settings().map(|p| p.tolerance), Some(1e-3));
        let s: FdmScheme = serde_json::from_str(r#""implicit""#).unwrap();
        assert_eq!(s, FdmScheme::Implicit);
    }
}
