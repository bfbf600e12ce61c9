mod common;

use std::collections::BTreeMap;

use common::{member, toy};
use pdf_core::errors::PdfError;
use pdf_core::metadata::MetadataMap;
use pdf_grid::InterpolatorKind;
use pdf_member::GridPdf;
use proptest::prelude::*;

proptest! {
    #[test]
    fn linear_toy_is_reproduced_inside_the_grid(
        x in 1e-4f64..1.0,
        q2 in 1.0f64..1e4,
        pick in 0usize..7,
    ) {
        let pdf = member();
        let id = common::ids()[pick];
        let value = pdf.xf_q2(id, x, q2).unwrap();
        let expected = toy(id, x, q2);
        prop_assert!((value - expected).abs() < 1e-9 * expected, "{value} vs {expected}");
    }
}

#[test]
fn gluon_alias_and_q_variant_agree() {
    let pdf = member();
    let by_zero = pdf.xf_q2(0, 0.05, 30.0).unwrap();
    let by_pdg = pdf.xf_q2(21, 0.05, 30.0).unwrap();
    assert_eq!(by_zero, by_pdg);
    assert_eq!(pdf.xf_q(21, 0.05, 30f64.sqrt()).unwrap(), pdf.xf_q2(21, 0.05, 30f64.sqrt().powi(2)).unwrap());
}

#[test]
fn undefined_flavors_are_zero() {
    let pdf = member();
    assert!(!pdf.has_flavor(5));
    assert_eq!(pdf.xf_q2(5, 0.1, 10.0).unwrap(), 0.0);
    assert_eq!(pdf.xf_q2(22, 0.1, 10.0).unwrap(), 0.0);
}

#[test]
fn unphysical_arguments_are_range_errors() {
    let pdf = member();
    assert_eq!(pdf.xf_q2(1, 1.5, 10.0).unwrap_err().info().code, "x-unphysical");
    assert_eq!(pdf.xf_q2(1, 0.1, -2.0).unwrap_err().info().code, "q2-unphysical");
    // physical checks come before the flavor check
    assert!(matches!(pdf.xf_q2(5, -0.1, 10.0), Err(PdfError::Range(_))));
}

#[test]
fn points_off_the_grid_are_range_errors() {
    let pdf = member();
    assert!(!pdf.in_range_xq2(1e-5, 10.0));
    assert_eq!(pdf.xf_q2(1, 1e-5, 10.0).unwrap_err().info().code, "outside-grid");
    assert_eq!(pdf.xf_q2(1, 0.1, 0.5).unwrap_err().info().code, "outside-grid");
    assert_eq!(pdf.xf_q2(1, 0.1, 2e4).unwrap_err().info().code, "outside-grid");
    assert!(pdf.in_range_xq2(1.0, 1e4));
    assert!(pdf.xf_q2(1, 1.0, 1e4).is_ok());
}

#[test]
fn bulk_queries_cover_every_flavor() {
    let pdf = member();
    let mut map = BTreeMap::from([(99, 1.0)]);
    pdf.xf_q2_map(0.2, 40.0, &mut map).unwrap();
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![-3, -2, -1, 1, 2, 3, 21]);
    assert_eq!(map, pdf.xf_q2_all(0.2, 40.0).unwrap());

    let mut window = [f64::NAN; 13];
    pdf.xf_q2_standard(0.2, 40.0, &mut window).unwrap();
    assert_eq!(window[6], map[&21]);
    assert_eq!(window[5], map[&-1]);
    assert_eq!(window[9], map[&3]);
    assert_eq!(window[0], 0.0);
    assert_eq!(window[12], 0.0);
}

#[test]
fn edges_come_from_metadata_when_present() {
    let pdf = member();
    assert_eq!(pdf.x_min().unwrap(), 1e-4);
    assert_eq!(pdf.q2_max().unwrap(), 1e4);
    assert_eq!(pdf.q_max().unwrap(), 100.0);

    let meta = common::header().with_number("XMin", 1e-3).with_number("Q2Min", 4.0);
    let pdf = GridPdf::new(common::grid(), meta).unwrap();
    assert_eq!(pdf.x_min().unwrap(), 1e-3);
    assert_eq!(pdf.q_min().unwrap(), 2.0);
    // coverage checks still follow the knots
    assert!(pdf.in_range_x(5e-4));
}

#[test]
fn mistyped_edges_are_metadata_errors() {
    let meta = common::header().with_text("XMin", "tiny").with_text("Q2Max", "huge");
    let pdf = GridPdf::new(common::grid(), meta).unwrap();
    let err = pdf.x_min().unwrap_err();
    assert!(matches!(err, PdfError::Metadata(_)));
    assert_eq!(err.info().code, "metadata-type");
    assert!(matches!(pdf.q_max(), Err(PdfError::Metadata(_))));
    assert_eq!(pdf.x_max().unwrap(), 1.0);
}

#[test]
fn flavors_fall_back_to_the_grid() {
    let pdf = GridPdf::new(common::grid(), MetadataMap::new()).unwrap();
    assert_eq!(pdf.flavors(), &[-3, -2, -1, 1, 2, 3, 21]);
}

#[test]
fn listed_flavors_must_exist_in_the_grid() {
    let meta = MetadataMap::new().with_list("Flavors", &[1.0, 2.0, 5.0]);
    let err = GridPdf::new(common::grid(), meta).unwrap_err();
    assert_eq!(err.info().code, "flavor-without-grid");
}

#[test]
fn listed_subset_hides_other_flavors() {
    let meta = MetadataMap::new().with_list("Flavors", &[1.0, 2.0, 0.0]);
    let pdf = GridPdf::new(common::grid(), meta).unwrap();
    assert_eq!(pdf.flavors(), &[1, 2, 21]);
    assert_eq!(pdf.xf_q2(3, 0.1, 10.0).unwrap(), 0.0);
}

#[test]
fn interpolator_is_selectable() {
    let bicubic = member();
    let bilinear = member().with_interpolator(InterpolatorKind::Bilinear);
    assert_eq!(bicubic.interpolator(), InterpolatorKind::Bicubic);
    let (x, q2) = (0.3, 70.0);
    let exact = toy(2, x, q2);
    let cubic_err = (bicubic.xf_q2(2, x, q2).unwrap() - exact).abs();
    let linear_err = (bilinear.xf_q2(2, x, q2).unwrap() - exact).abs();
    assert!(cubic_err < linear_err, "{cubic_err} vs {linear_err}");
}
