#![deny(missing_docs)]
#![doc = "Uncertainties, correlations and random values over replica and Hessian ensembles."]

/// Ensemble shape and its metadata loader.
pub mod config;
/// The statistics engine.
pub mod ensemble;
/// Supported error models.
pub mod model;
pub mod quantile;

pub use config::EnsembleConfig;
pub use ensemble::{EnsembleStatistics, UncertaintyResult};
pub use model::ErrorModel;
pub use quantile::{chi2_1_quantile, cl_scale, one_sigma_cl};
