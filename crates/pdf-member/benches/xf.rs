use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pdf_core::metadata::MetadataMap;
use pdf_grid::{InterpolatorKind, KnotGrid, PdfGrid};
use pdf_member::GridPdf;

fn member() -> GridPdf {
    let xs: Vec<f64> = (0..100).map(|i| 10f64.powf(-6.0 + 6.0 * i as f64 / 99.0)).collect();
    let q2s: Vec<f64> = (0..40).map(|i| 10f64.powf(8.0 * i as f64 / 39.0) + 1.0).collect();
    let grids: BTreeMap<i32, KnotGrid> = [-5, -4, -3, -2, -1, 1, 2, 3, 4, 5, 21]
        .into_iter()
        .map(|id| {
            let grid = KnotGrid::from_fn(xs.clone(), q2s.clone(), |x, q2| {
                x.powf(0.2) * (1.0 - x).powi(3) * q2.ln() * f64::from(id.abs())
            })
            .expect("knot grid");
            (id, grid)
        })
        .collect();
    GridPdf::new(PdfGrid::single(grids).expect("grid"), MetadataMap::new()).expect("member")
}

fn bench_xf(c: &mut Criterion) {
    let bicubic = member();
    let bilinear = member().with_interpolator(InterpolatorKind::Bilinear);
    c.bench_function("xf_q2_bicubic", |b| {
        b.iter(|| bicubic.xf_q2(black_box(2), black_box(0.0123), black_box(456.7)).expect("xf"))
    });
    c.bench_function("xf_q2_bilinear", |b| {
        b.iter(|| bilinear.xf_q2(black_box(2), black_box(0.0123), black_box(456.7)).expect("xf"))
    });
    c.bench_function("xf_q2_standard", |b| {
        let mut out = [0.0; 13];
        b.iter(|| bicubic.xf_q2_standard(black_box(0.0123), black_box(456.7), &mut out).expect("xf"))
    });
}

criterion_group!(benches, bench_xf);
criterion_main!(benches);
