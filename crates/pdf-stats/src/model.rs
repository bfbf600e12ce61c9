use pdf_core::errors::{ErrorInfo, PdfError};
use serde::{Deserialize, Serialize};

/// How ensemble members encode the uncertainty (`ErrorType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorModel {
    /// Monte Carlo replicas; member 0 is their average.
    Replicas,
    /// One member per eigenvector direction.
    SymmHessian,
    /// Members `2k - 1` and `2k` are the two directions of eigenvector `k`.
    Hessian,
}

impl ErrorModel {
    /// Parses an `ErrorType` tag, ignoring case.
    pub fn from_tag(tag: &str) -> Result<Self, PdfError> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "replicas" => Ok(Self::Replicas),
            "symmhessian" => Ok(Self::SymmHessian),
            "hessian" => Ok(Self::Hessian),
            _ => Err(PdfError::Metadata(
                ErrorInfo::new("error-type", "unsupported ErrorType")
                    .with_context("tag", tag)
                    .with_hint("expected one of replicas, symmhessian, hessian"),
            )),
        }
    }

    /// Canonical tag.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Replicas => "replicas",
            Self::SymmHessian => "symmhessian",
            Self::Hessian => "hessian",
        }
    }

    /// Eigenvector count for `members` non-central members, `None` for replicas.
    pub fn num_eigenvectors(self, members: usize) -> Option<usize> {
        match self {
            Self::Replicas => None,
            Self::SymmHessian => Some(members),
            Self::Hessian => Some(members / 2),
        }
    }
}
