use pdf_core::hermite::{interpolate_cubic, node_slope};

use super::Interpolator;
use crate::knots::KnotGrid;

/// C1 surface from two passes of cubic Hermite blending in `(x, Q2)`.
///
/// The x pass blends the two x knots of the cell on a given Q2 row using
/// finite-difference slopes along the row. The Q2 pass blends the results of
/// the x pass on the two bounding rows; its derivatives are finite
/// differences of x-pass results on neighbouring rows, one-sided where the
/// cell touches the first or last row of the subgrid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bicubic;

/// x pass on row `iq2` of cell `ix`, at fractional position `tx` of a cell of width `dx`.
#[inline]
fn along_x(grid: &KnotGrid, iq2: usize, ix: usize, tx: f64, dx: f64) -> f64 {
    let xs = grid.xs();
    let row = grid.row(iq2);
    interpolate_cubic(
        tx,
        row[ix],
        node_slope(xs, row, ix) * dx,
        row[ix + 1],
        node_slope(xs, row, ix + 1) * dx,
    )
}

impl Interpolator for Bicubic {
    fn evaluate(&self, grid: &KnotGrid, x: f64, q2: f64, ix: usize, iq2: usize) -> f64 {
        let xs = grid.xs();
        let q2s = grid.q2s();
        let last = q2s.len() - 1;

        let dx = xs[ix + 1] - xs[ix];
        let tx = (x - xs[ix]) / dx;
        let dq = q2s[iq2 + 1] - q2s[iq2];
        let tq = (q2 - q2s[iq2]) / dq;

        let vl = along_x(grid, iq2, ix, tx, dx);
        let vh = along_x(grid, iq2 + 1, ix, tx, dx);
        let across = (vh - vl) / dq;

        let (vdl, vdh) = if last == 1 {
            (across, across)
        } else if iq2 == 0 {
            let vhh = along_x(grid, iq2 + 2, ix, tx, dx);
            let above = (vhh - vh) / (q2s[iq2 + 2] - q2s[iq2 + 1]);
            (across, 0.5 * (across + above))
        } else if iq2 + 1 == last {
            let vll = along_x(grid, iq2 - 1, ix, tx, dx);
            let below = (vl - vll) / (q2s[iq2] - q2s[iq2 - 1]);
            (0.5 * (across + below), across)
        } else {
            let vll = along_x(grid, iq2 - 1, ix, tx, dx);
            let vhh = along_x(grid, iq2 + 2, ix, tx, dx);
            let below = (vl - vll) / (q2s[iq2] - q2s[iq2 - 1]);
            let above = (vhh - vh) / (q2s[iq2 + 2] - q2s[iq2 + 1]);
            (0.5 * (across + below), 0.5 * (across + above))
        };

        interpolate_cubic(tq, vl, vdl * dq, vh, vdh * dq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quadratic_in_q2() -> KnotGrid {
        KnotGrid::from_fn(vec![0.1, 0.5, 1.0], vec![1.0, 2.0, 3.0, 4.0], |_, q2| q2 * q2).unwrap()
    }

    #[test]
    fn first_cell_uses_forward_then_averaged_difference() {
        let grid = quadratic_in_q2();
        let value = Bicubic.interpolate(&grid, 0.3, 1.5);
        assert!((value - 2.375).abs() < 1e-12, "{value}");
    }

    #[test]
    fn interior_cell_is_exact_for_quadratics() {
        let grid = quadratic_in_q2();
        let value = Bicubic.interpolate(&grid, 0.3, 2.5);
        assert!((value - 6.25).abs() < 1e-12, "{value}");
    }

    #[test]
    fn last_cell_uses_averaged_then_backward_difference() {
        let grid = quadratic_in_q2();
        let value = Bicubic.interpolate(&grid, 0.3, 3.5);
        assert!((value - 12.375).abs() < 1e-12, "{value}");
    }

    #[test]
    fn two_row_subgrid_is_linear_in_q2() {
        let grid = KnotGrid::from_fn(vec![0.1, 1.0], vec![10.0, 20.0], |_, q2| q2).unwrap();
        let value = Bicubic.interpolate(&grid, 0.4, 12.5);
        assert!((value - 12.5).abs() < 1e-12, "{value}");
    }
}
