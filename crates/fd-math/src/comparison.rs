//! Floating-point comparison helpers.

use fd_core::Real;

/// `true` if `a` and `b` differ by at most `n` machine epsilons relative to
/// the larger magnitude.
#[inline]
pub fn close_enough(a: Real, b: Real, n: u32) -> bool {
    if a == b {
        return true;
    }
    let eps = a.abs().max(b.abs()) * Real::EPSILON * n as Real;
    (a - b).abs() <= eps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_tolerance() {
        assert!(close_enough(40.0, 40.0, 0));
        assert!(close_enough(1.0, 1.0 + Real::EPSILON * 5.0, 10));
        assert!(!close_enough(1.0, 1.0 + 1e-12, 10));
        // a grid node rebuilt as s_lo + i·dS
        assert!(close_enough(0.1 + 0.2, 0.3, 4));
    }
}
