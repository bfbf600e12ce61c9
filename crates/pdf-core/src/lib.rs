#![deny(missing_docs)]
#![doc = "Core error, flavor, metadata and numeric kernel types shared by the PDF evaluation crates."]

pub mod errors;
pub mod flavor;
pub mod hermite;
pub mod metadata;
pub mod rng;

pub use errors::{ensure_len, ErrorInfo, PdfError};
pub use flavor::{canonical_id, standard_window_id, standard_window_index, GLUON, STANDARD_WINDOW};
pub use hermite::{interpolate_cubic, node_slope};
pub use metadata::{MetaValue, Metadata, MetadataMap};
pub use rng::{derive_substream_seed, RngHandle};

/// Locates the lower cell index for `value` in strictly increasing `nodes`.
///
/// Returns the largest `i` with `nodes[i] <= value < nodes[i + 1]`. A value
/// equal to the last node resolves to the second-to-last index so that a cell
/// is always selected. Values below the first node clamp to `0` and values
/// above the last node clamp to `nodes.len() - 2`; range checks belong to the
/// caller.
///
/// # Panics
/// Panics if `nodes` has fewer than two entries.
#[inline]
pub fn locate_lower(nodes: &[f64], value: f64) -> usize {
    assert!(nodes.len() >= 2, "cell lookup needs at least two nodes");
    let upper = nodes.partition_point(|node| *node <= value);
    upper.clamp(1, nodes.len() - 1) - 1
}

#[cfg(test)]
mod tests {
    use super::locate_lower;
    use proptest::prelude::*;

    #[test]
    fn lower_index_brackets_interior_values() {
        let nodes = [1.0, 2.0, 4.0, 8.0];
        assert_eq!(locate_lower(&nodes, 1.0), 0);
        assert_eq!(locate_lower(&nodes, 1.5), 0);
        assert_eq!(locate_lower(&nodes, 2.0), 1);
        assert_eq!(locate_lower(&nodes, 7.9), 2);
    }

    #[test]
    fn last_node_selects_last_cell() {
        let nodes = [1.0, 2.0, 4.0, 8.0];
        assert_eq!(locate_lower(&nodes, 8.0), 2);
        assert_eq!(locate_lower(&[0.0, 1.0], 1.0), 0);
    }

    proptest! {
        #[test]
        fn located_cell_contains_value(raw in proptest::collection::vec(0.01f64..10.0, 2..20), pick in 0.0f64..1.0) {
            let mut nodes = Vec::with_capacity(raw.len());
            let mut acc = 0.0;
            for step in raw {
                acc += step;
                nodes.push(acc);
            }
            let value = nodes[0] + pick * (nodes[nodes.len() - 1] - nodes[0]);
            let i = locate_lower(&nodes, value);
            prop_assert!(i + 1 < nodes.len());
            prop_assert!(nodes[i] <= value);
            prop_assert!(value <= nodes[i + 1]);
        }
    }
}
