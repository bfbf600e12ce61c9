#![allow(dead_code)]

use std::collections::BTreeMap;

use pdf_core::metadata::MetadataMap;
use pdf_grid::{KnotGrid, PdfGrid, Subgrid};
use pdf_member::GridPdf;

pub const XS: [f64; 6] = [1e-4, 1e-3, 1e-2, 0.1, 0.5, 1.0];

/// Smooth toy density, linear in Q2 so that stitched grids agree exactly.
pub fn toy(id: i32, x: f64, q2: f64) -> f64 {
    let weight = f64::from(id.abs() % 7 + 1);
    weight * (1.0 + x) * (2.0 + 0.01 * q2)
}

fn subgrid(ids: &[i32], q2s: &[f64]) -> Subgrid {
    let grids: BTreeMap<i32, KnotGrid> = ids
        .iter()
        .map(|&id| {
            let grid = KnotGrid::from_fn(XS.to_vec(), q2s.to_vec(), |x, q2| toy(id, x, q2)).unwrap();
            (id, grid)
        })
        .collect();
    Subgrid::new(grids).unwrap()
}

pub fn ids() -> Vec<i32> {
    vec![-3, -2, -1, 1, 2, 3, 21]
}

pub fn grid() -> PdfGrid {
    let ids = ids();
    PdfGrid::new(vec![
        subgrid(&ids, &[1.0, 2.0, 5.0, 10.0]),
        subgrid(&ids, &[10.0, 50.0, 100.0, 1000.0, 1e4]),
    ])
    .unwrap()
}

pub fn header() -> MetadataMap {
    MetadataMap::from_yaml_str(
        r#"
Flavors: [-3, -2, -1, 1, 2, 3, 21]
AlphaS_Type: analytic
AlphaS_OrderQCD: 2
Lambda4: 0.326
Lambda5: 0.226
"#,
    )
    .unwrap()
}

pub fn member() -> GridPdf {
    GridPdf::new(grid(), header()).unwrap()
}
