//! Q2-stitched collection of per-flavor knot grids.

use std::collections::BTreeMap;

use pdf_core::errors::{ErrorInfo, PdfError};
use serde::{Deserialize, Serialize};

use crate::knots::KnotGrid;

fn stitch_error(code: &str, message: impl Into<String>) -> PdfError {
    PdfError::Contract(ErrorInfo::new(code, message))
}

/// One contiguous Q2 segment: a knot grid for every flavor of the set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<i32, KnotGrid>",
    into = "BTreeMap<i32, KnotGrid>"
)]
pub struct Subgrid {
    grids: BTreeMap<i32, KnotGrid>,
    q2_min: f64,
    q2_max: f64,
}

impl TryFrom<BTreeMap<i32, KnotGrid>> for Subgrid {
    type Error = PdfError;

    fn try_from(grids: BTreeMap<i32, KnotGrid>) -> Result<Self, Self::Error> {
        Subgrid::new(grids)
    }
}

impl From<Subgrid> for BTreeMap<i32, KnotGrid> {
    fn from(subgrid: Subgrid) -> Self {
        subgrid.grids
    }
}

impl Subgrid {
    /// Groups per-flavor grids covering the same Q2 range.
    pub fn new(grids: BTreeMap<i32, KnotGrid>) -> Result<Self, PdfError> {
        let mut iter = grids.values();
        let first = iter
            .next()
            .ok_or_else(|| stitch_error("subgrid-empty", "a subgrid needs at least one flavor"))?;
        let (lo, hi) = (first.q2_min(), first.q2_max());
        for (id, grid) in &grids {
            if grid.q2_min() != lo || grid.q2_max() != hi {
                return Err(PdfError::Contract(
                    ErrorInfo::new(
                        "subgrid-q2-mismatch",
                        "all flavors of a subgrid must span the same Q2 range",
                    )
                    .with_context("flavor", id),
                ));
            }
        }
        Ok(Self {
            grids,
            q2_min: lo,
            q2_max: hi,
        })
    }

    /// Grid for flavor `id`, if tabulated.
    pub fn grid(&self, id: i32) -> Option<&KnotGrid> {
        self.grids.get(&id)
    }

    /// Tabulated flavor ids in ascending order.
    pub fn flavors(&self) -> impl Iterator<Item = i32> + '_ {
        self.grids.keys().copied()
    }

    /// Lower Q2 edge.
    pub fn q2_min(&self) -> f64 {
        self.q2_min
    }

    /// Upper Q2 edge.
    pub fn q2_max(&self) -> f64 {
        self.q2_max
    }
}

/// Ordered stack of subgrids sharing boundary knots at each seam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Subgrid>", into = "Vec<Subgrid>")]
pub struct PdfGrid {
    subgrids: Vec<Subgrid>,
}

impl TryFrom<Vec<Subgrid>> for PdfGrid {
    type Error = PdfError;

    fn try_from(subgrids: Vec<Subgrid>) -> Result<Self, Self::Error> {
        PdfGrid::new(subgrids)
    }
}

impl From<PdfGrid> for Vec<Subgrid> {
    fn from(grid: PdfGrid) -> Self {
        grid.subgrids
    }
}

impl PdfGrid {
    /// Stitches subgrids given in ascending Q2 order.
    ///
    /// Consecutive subgrids must share their boundary knot exactly and define
    /// the same flavors.
    pub fn new(subgrids: Vec<Subgrid>) -> Result<Self, PdfError> {
        let first = subgrids
            .first()
            .ok_or_else(|| stitch_error("grid-empty", "a grid needs at least one subgrid"))?;
        let flavors: Vec<i32> = first.flavors().collect();
        for (idx, pair) in subgrids.windows(2).enumerate() {
            let (lower, upper) = (&pair[0], &pair[1]);
            if lower.q2_max() != upper.q2_min() {
                return Err(PdfError::Contract(
                    ErrorInfo::new(
                        "subgrid-seam",
                        "neighbouring subgrids must share their boundary Q2 knot",
                    )
                    .with_context("seam", idx)
                    .with_context("lower_max", lower.q2_max())
                    .with_context("upper_min", upper.q2_min()),
                ));
            }
            if !upper.flavors().eq(flavors.iter().copied()) {
                return Err(PdfError::Contract(
                    ErrorInfo::new("subgrid-flavors", "every subgrid must define the same flavors")
                        .with_context("subgrid", idx + 1),
                ));
            }
        }
        Ok(Self { subgrids })
    }

    /// Single-subgrid convenience constructor.
    pub fn single(grids: BTreeMap<i32, KnotGrid>) -> Result<Self, PdfError> {
        Self::new(vec![Subgrid::new(grids)?])
    }

    /// Subgrids in ascending Q2 order.
    pub fn subgrids(&self) -> &[Subgrid] {
        &self.subgrids
    }

    /// Index of the subgrid responsible for `q2`.
    ///
    /// A value sitting exactly on a seam belongs to the upper subgrid; the top
    /// edge of the last subgrid stays in the last subgrid. Values outside the
    /// stitched range clamp to the outermost subgrids.
    #[inline]
    pub fn subgrid_index(&self, q2: f64) -> usize {
        self.subgrids[1..].partition_point(|sub| sub.q2_min() <= q2)
    }

    /// Knot grid used to evaluate flavor `id` at `q2`.
    #[inline]
    pub fn knot_grid(&self, id: i32, q2: f64) -> Option<&KnotGrid> {
        self.subgrids[self.subgrid_index(q2)].grid(id)
    }

    /// Tabulated flavor ids in ascending order.
    pub fn flavors(&self) -> Vec<i32> {
        self.subgrids[0].flavors().collect()
    }

    /// Whether flavor `id` is tabulated.
    pub fn has_flavor(&self, id: i32) -> bool {
        self.subgrids[0].grid(id).is_some()
    }

    /// Smallest x knot over all flavors.
    pub fn x_min(&self) -> f64 {
        self.fold_grids(f64::INFINITY, |acc, grid| acc.min(grid.x_min()))
    }

    /// Largest x knot over all flavors.
    pub fn x_max(&self) -> f64 {
        self.fold_grids(f64::NEG_INFINITY, |acc, grid| acc.max(grid.x_max()))
    }

    /// Lowest Q2 edge of the stack.
    pub fn q2_min(&self) -> f64 {
        self.subgrids[0].q2_min()
    }

    /// Highest Q2 edge of the stack.
    pub fn q2_max(&self) -> f64 {
        self.subgrids[self.subgrids.len() - 1].q2_max()
    }

    fn fold_grids<F>(&self, init: f64, f: F) -> f64
    where
        F: Fn(f64, &KnotGrid) -> f64,
    {
        self.subgrids
            .iter()
            .flat_map(|sub| sub.grids.values())
            .fold(init, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(q2s: Vec<f64>, level: f64) -> BTreeMap<i32, KnotGrid> {
        let mut grids = BTreeMap::new();
        for id in [-1, 1, 21] {
            let grid = KnotGrid::from_fn(vec![0.01, 0.1, 1.0], q2s.clone(), |_, _| level).unwrap();
            grids.insert(id, grid);
        }
        grids
    }

    fn stacked() -> PdfGrid {
        PdfGrid::new(vec![
            Subgrid::new(flat(vec![1.0, 2.0, 4.0], 1.0)).unwrap(),
            Subgrid::new(flat(vec![4.0, 8.0, 16.0], 2.0)).unwrap(),
            Subgrid::new(flat(vec![16.0, 32.0], 3.0)).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn seams_select_the_upper_subgrid() {
        let grid = stacked();
        assert_eq!(grid.subgrid_index(1.0), 0);
        assert_eq!(grid.subgrid_index(3.9), 0);
        assert_eq!(grid.subgrid_index(4.0), 1);
        assert_eq!(grid.subgrid_index(16.0), 2);
        assert_eq!(grid.subgrid_index(32.0), 2);
    }

    #[test]
    fn ranges_cover_the_whole_stack() {
        let grid = stacked();
        assert_eq!(grid.q2_min(), 1.0);
        assert_eq!(grid.q2_max(), 32.0);
        assert_eq!(grid.x_min(), 0.01);
        assert_eq!(grid.x_max(), 1.0);
        assert_eq!(grid.flavors(), vec![-1, 1, 21]);
        assert!(grid.has_flavor(21));
        assert!(!grid.has_flavor(2));
    }

    #[test]
    fn gaps_between_subgrids_are_rejected() {
        let err = PdfGrid::new(vec![
            Subgrid::new(flat(vec![1.0, 2.0], 1.0)).unwrap(),
            Subgrid::new(flat(vec![3.0, 4.0], 1.0)).unwrap(),
        ])
        .unwrap_err();
        assert_eq!(err.info().code, "subgrid-seam");
    }

    #[test]
    fn flavor_sets_must_agree() {
        let mut upper = flat(vec![2.0, 4.0], 1.0);
        upper.remove(&-1);
        let err = PdfGrid::new(vec![
            Subgrid::new(flat(vec![1.0, 2.0], 1.0)).unwrap(),
            Subgrid::new(upper).unwrap(),
        ])
        .unwrap_err();
        assert_eq!(err.info().code, "subgrid-flavors");
    }
}
