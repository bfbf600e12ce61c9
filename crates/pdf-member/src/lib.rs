#![deny(missing_docs)]
#![doc = "Grid-backed PDF members: range-checked xf queries, bulk flavor queries and lazily built alpha_s."]

/// The member facade.
pub mod member;
/// Physical range predicates.
pub mod range;

pub use member::GridPdf;
pub use range::{in_physical_range_q2, in_physical_range_x, in_physical_range_xq2};
