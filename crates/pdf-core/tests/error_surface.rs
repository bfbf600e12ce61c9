use pdf_core::errors::{ensure_len, ErrorInfo, PdfError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("id", 1)
        .with_context("reason", "example")
}

#[test]
fn range_error_surface() {
    let err = PdfError::Range(sample_info("x-unphysical", "x outside [0, 1]"));
    assert_eq!(err.info().code, "x-unphysical");
    assert!(err.info().context.contains_key("id"));
    assert!(err.to_string().starts_with("range error"));
}

#[test]
fn metadata_error_surface() {
    let err = PdfError::Metadata(sample_info("error-type", "unsupported error type"));
    assert_eq!(err.info().code, "error-type");
    assert!(err.info().context.contains_key("reason"));
}

#[test]
fn contract_error_surface() {
    let err = ensure_len("values-len", "values", 3, 5).unwrap_err();
    assert!(matches!(err, PdfError::Contract(_)));
    assert_eq!(err.info().context.get("expected").map(String::as_str), Some("5"));
    assert!(ensure_len("values-len", "values", 5, 5).is_ok());
}

#[test]
fn lookup_error_surface() {
    let err = PdfError::Lookup(sample_info("quark-id", "no such quark").with_hint("use 1..=6"));
    assert_eq!(err.info().hint.as_deref(), Some("use 1..=6"));
    assert!(err.to_string().contains("hint: use 1..=6"));
}

#[test]
fn errors_round_trip_json() {
    let err = PdfError::Contract(sample_info("draws-len", "wrong number of draws"));
    let json = serde_json::to_string(&err).expect("serialize");
    let decoded: PdfError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}
