use pdf_core::errors::{ErrorInfo, PdfError};

/// Whether `x` is a valid momentum fraction.
#[inline]
pub fn in_physical_range_x(x: f64) -> bool {
    (0.0..=1.0).contains(&x)
}

/// Whether `q2` is a valid squared scale.
#[inline]
pub fn in_physical_range_q2(q2: f64) -> bool {
    q2 >= 0.0
}

/// Both of the above.
#[inline]
pub fn in_physical_range_xq2(x: f64, q2: f64) -> bool {
    in_physical_range_x(x) && in_physical_range_q2(q2)
}

pub(crate) fn check_physical(x: f64, q2: f64) -> Result<(), PdfError> {
    if !in_physical_range_x(x) {
        return Err(PdfError::Range(
            ErrorInfo::new("x-unphysical", "x must lie in [0, 1]").with_context("x", x),
        ));
    }
    if !in_physical_range_q2(q2) {
        return Err(PdfError::Range(
            ErrorInfo::new("q2-unphysical", "Q2 must be non-negative").with_context("q2", q2),
        ));
    }
    Ok(())
}
