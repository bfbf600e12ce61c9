use pdf_core::errors::{ErrorInfo, PdfError};
use pdf_core::metadata::Metadata;
use serde::{Deserialize, Serialize};

use crate::model::ErrorModel;
use crate::quantile::one_sigma_cl;

/// Shape of an ensemble: error model, member count and native confidence level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleConfig {
    /// How members encode the uncertainty.
    pub error_type: ErrorModel,
    /// Total member count, central member included.
    pub size: usize,
    /// Confidence level of the member variations, in percent.
    #[serde(default = "one_sigma_cl")]
    pub conf_level: f64,
}

impl EnsembleConfig {
    /// Configuration at the one-sigma confidence level.
    pub fn new(error_type: ErrorModel, size: usize) -> Self {
        Self {
            error_type,
            size,
            conf_level: one_sigma_cl(),
        }
    }

    /// Overrides the native confidence level.
    pub fn with_conf_level(mut self, conf_level: f64) -> Self {
        self.conf_level = conf_level;
        self
    }

    /// Reads `ErrorType`, `NumMembers` and the optional `ErrorConfLevel`.
    pub fn from_metadata(meta: &dyn Metadata) -> Result<Self, PdfError> {
        let error_type = ErrorModel::from_tag(&meta.get_string("ErrorType")?)?;
        let members = meta.get_i64("NumMembers")?;
        let size = usize::try_from(members).map_err(|_| {
            PdfError::Metadata(
                ErrorInfo::new("num-members", "NumMembers must be non-negative")
                    .with_context("members", members),
            )
        })?;
        let conf_level = meta.opt_f64("ErrorConfLevel")?.unwrap_or_else(one_sigma_cl);
        Ok(Self {
            error_type,
            size,
            conf_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_core::metadata::MetadataMap;

    #[test]
    fn metadata_fills_config() {
        let meta = MetadataMap::new()
            .with_text("ErrorType", "hessian")
            .with_number("NumMembers", 57.0)
            .with_number("ErrorConfLevel", 90.0);
        let config = EnsembleConfig::from_metadata(&meta).unwrap();
        assert_eq!(config.error_type, ErrorModel::Hessian);
        assert_eq!(config.size, 57);
        assert_eq!(config.conf_level, 90.0);
    }

    #[test]
    fn conf_level_defaults_to_one_sigma() {
        let config: EnsembleConfig =
            serde_json::from_str(r#"{"error_type": "replicas", "size": 101}"#).unwrap();
        assert!((config.conf_level - 68.2689492).abs() < 1e-6);
    }

    #[test]
    fn missing_error_type_is_a_metadata_error() {
        let meta = MetadataMap::new().with_number("NumMembers", 3.0);
        let err = EnsembleConfig::from_metadata(&meta).unwrap_err();
        assert!(matches!(err, PdfError::Metadata(_)));
    }
}
