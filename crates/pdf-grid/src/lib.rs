#![deny(missing_docs)]
#![doc = "Knot grids, Q2 subgrid stitching and grid interpolation for parton densities."]

/// Q2-stitched stacks of per-flavor knot grids.
pub mod grid;
/// Bilinear and bicubic interpolators.
pub mod interp;
/// Per-flavor knot tabulation.
pub mod knots;

pub use grid::{PdfGrid, Subgrid};
pub use interp::{Bicubic, Bilinear, Interpolator, InterpolatorKind};
pub use knots::KnotGrid;
