//! Backward time-stepping over the grid.
//!
//! Each routine assumes the terminal column and both edge rows are already
//! filled, and overwrites the interior nodes of columns `N−1 … 0`. Column
//! `j` is only touched once column `j+1` is final.

use super::coefficients::Stencil;
use super::grid::Grid;
use super::psor::ProjectedSor;
use fd_core::{errors::Result, Real};
use fd_math::{TridiagonalLu, TridiagonalOperator};
use tracing::trace;

/// Explicit recursion
/// `V(i, j) = a_i·V(i−1, j+1) + b_i·V(i, j+1) + c_i·V(i+1, j+1)`.
///
/// No stability check happens here; an unstable `dt / dS²` produces a
/// divergent grid that the caller detects afterwards.
pub(crate) fn explicit(grid: &mut Grid, stencil: &Stencil) {
    let m = grid.price_steps();
    for j in (0..grid.time_steps()).rev() {
        for i in 1..m {
            let v = stencil.lower[i] * grid.value(i - 1, j + 1)
                + stencil.centre[i] * grid.value(i, j + 1)
                + stencil.upper[i] * grid.value(i + 1, j + 1);
            grid.set_value(i, j, v);
        }
    }
}

/// Implicit scheme: solve `A·V(j) = V(j+1) − edge terms` with `A` factorised
/// once up front.
pub(crate) fn implicit(
    grid: &mut Grid,
    stencil: &Stencil,
    operator: &TridiagonalOperator,
) -> Result<()> {
    let lu = operator.factorize()?;
    let m = grid.price_steps();
    let mut solution = vec![0.0; m - 1];

    for j in (0..grid.time_steps()).rev() {
        let mut rhs = grid.interior(j + 1);
        let last = rhs.len() - 1;
        rhs[0] -= stencil.lower[1] * grid.value(0, j);
        rhs[last] -= stencil.upper[m - 1] * grid.value(m, j);
        lu.solve_into(&rhs, &mut solution);
        grid.set_interior(j, &solution);
    }
    Ok(())
}

/// Crank-Nicolson right-hand side `M2·V(j+1)` plus both edge contributions,
/// averaged over columns `j` and `j+1`.
fn crank_nicolson_rhs(
    grid: &Grid,
    stencil: &Stencil,
    m2: &TridiagonalOperator,
    j: usize,
    rhs: &mut [Real],
) {
    let m = grid.price_steps();
    let previous = grid.interior(j + 1);
    m2.apply_into(&previous, rhs);
    let last = rhs.len() - 1;
    rhs[0] += stencil.lower[1] * (grid.value(0, j) + grid.value(0, j + 1));
    rhs[last] += stencil.upper[m - 1] * (grid.value(m, j) + grid.value(m, j + 1));
}

/// Crank-Nicolson scheme: solve `M1·V(j) = M2·V(j+1) + edge terms` with `M1`
/// factorised once up front.
pub(crate) fn crank_nicolson(
    grid: &mut Grid,
    stencil: &Stencil,
    m1: &TridiagonalOperator,
    m2: &TridiagonalOperator,
) -> Result<()> {
    let lu: TridiagonalLu = m1.factorize()?;
    let size = grid.price_steps() - 1;
    let mut rhs = vec![0.0; size];
    let mut solution = vec![0.0; size];

    for j in (0..grid.time_steps()).rev() {
        crank_nicolson_rhs(grid, stencil, m2, j, &mut rhs);
        lu.solve_into(&rhs, &mut solution);
        grid.set_interior(j, &solution);
    }
    Ok(())
}

/// Crank-Nicolson with the early-exercise floor: each step's linear system
/// is replaced by a projected SOR solve started from the previous step's
/// values.
pub(crate) fn crank_nicolson_american(
    grid: &mut Grid,
    stencil: &Stencil,
    m2: &TridiagonalOperator,
    psor: &ProjectedSor<'_>,
    floor: &[Real],
) -> Result<()> {
    let size = grid.price_steps() - 1;
    let mut rhs = vec![0.0; size];

    for j in (0..grid.time_steps()).rev() {
        crank_nicolson_rhs(grid, stencil, m2, j, &mut rhs);
        let mut values = grid.interior(j + 1);
        let (iterations, error) = psor.solve(&rhs, floor, &mut values, j)?;
        trace!(time_step = j, iterations, error, "projected SOR converged");
        grid.set_interior(j, &values);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finite_differences::{BoundaryConditions, DiscretizationSpec, FdmScheme};
    use approx::assert_abs_diff_eq;
    use fd_instruments::{ContractSpec, OptionType};

    const T: Real = 5.0 / 12.0;

    fn prepared(option_type: OptionType, m: usize, n: usize, scheme: FdmScheme) -> (Grid, ContractSpec) {
        let contract = ContractSpec::new(50.0, 50.0, 0.1, T, 0.4, option_type).unwrap();
        let disc = DiscretizationSpec::new(100.0, m, n).unwrap();
        let mut grid = Grid::new(scheme.barrier().unwrap_or(0.0), &disc, T);
        BoundaryConditions::new(&contract, &scheme, &grid).apply(&mut grid);
        (grid, contract)
    }

    #[test]
    fn explicit_step_matches_stencil() {
        let (mut grid, contract) = prepared(OptionType::Put, 20, 200, FdmScheme::Explicit);
        let stencil = Stencil::explicit(&grid, &contract);
        let terminal = grid.column(200);
        explicit(&mut grid, &stencil);
        let i = 9;
        let expected = stencil.lower[i] * terminal[i - 1]
            + stencil.centre[i] * terminal[i]
            + stencil.upper[i] * terminal[i + 1];
        assert_abs_diff_eq!(grid.value(i, 199), expected, epsilon = 1e-14);
        // node 1 is part of the interior
        assert!(grid.value(1, 0) > 40.0);
    }

    #[test]
    fn implicit_satisfies_linear_system() {
        let (mut grid, contract) = prepared(OptionType::Call, 10, 4, FdmScheme::Implicit);
        let stencil = Stencil::implicit(&grid, &contract);
        let op = stencil.interior_operator().unwrap();
        implicit(&mut grid, &stencil, &op).unwrap();
        for j in 0..4 {
            for i in 1..10 {
                let lhs = stencil.lower[i] * grid.value(i - 1, j)
                    + stencil.centre[i] * grid.value(i, j)
                    + stencil.upper[i] * grid.value(i + 1, j);
                assert_abs_diff_eq!(lhs, grid.value(i, j + 1), epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn crank_nicolson_satisfies_averaged_system() {
        let (mut grid, contract) = prepared(OptionType::Put, 10, 4, FdmScheme::CrankNicolson);
        let stencil = Stencil::crank_nicolson(&grid, &contract);
        let half = stencil.interior_operator().unwrap();
        let mut m1 = half.clone();
        m1.scale(-1.0);
        m1.add_identity(1.0);
        let mut m2 = half;
        m2.add_identity(1.0);
        crank_nicolson(&mut grid, &stencil, &m1, &m2).unwrap();
        let (a, b, c) = (&stencil.lower, &stencil.centre, &stencil.upper);
        for j in 0..4 {
            for i in 1..10 {
                let lhs = -a[i] * grid.value(i - 1, j) + (1.0 - b[i]) * grid.value(i, j)
                    - c[i] * grid.value(i + 1, j);
                let rhs = a[i] * grid.value(i - 1, j + 1)
                    + (1.0 + b[i]) * grid.value(i, j + 1)
                    + c[i] * grid.value(i + 1, j + 1);
                assert_abs_diff_eq!(lhs, rhs, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn single_interior_node() {
        let (mut grid, contract) = prepared(OptionType::Put, 2, 1, FdmScheme::Implicit);
        let stencil = Stencil::implicit(&grid, &contract);
        let op = stencil.interior_operator().unwrap();
        implicit(&mut grid, &stencil, &op).unwrap();
        let expected = (grid.value(1, 1)
            - stencil.lower[1] * grid.value(0, 0)
            - stencil.upper[1] * grid.value(2, 0))
            / stencil.centre[1];
        assert_abs_diff_eq!(grid.value(1, 0), expected, epsilon = 1e-12);
    }
}
