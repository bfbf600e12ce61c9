use pdf_core::errors::{ensure_len, ErrorInfo, PdfError};
use pdf_core::metadata::Metadata;
use pdf_core::rng::RngHandle;
use serde::{Deserialize, Serialize};

use crate::config::EnsembleConfig;
use crate::model::ErrorModel;
use crate::quantile::{cl_scale, one_sigma_cl};

/// Central value and uncertainties of one observable over an ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyResult {
    /// Central value (member 0, the replica mean, or the replica median).
    pub central: f64,
    /// Upward uncertainty.
    pub errplus: f64,
    /// Downward uncertainty.
    pub errminus: f64,
    /// Symmetrised uncertainty.
    pub errsymm: f64,
    /// Factor applied to convert from the native to the requested confidence level.
    pub scale: f64,
}

/// Uncertainty, correlation and sampling over the members of one ensemble.
///
/// Values are passed per call as a slice with one entry per member, member 0
/// being the central fit.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleStatistics {
    config: EnsembleConfig,
}

impl EnsembleStatistics {
    /// Validates `config`: at least one member besides the central one, and
    /// complete eigenvector pairs for `hessian`.
    pub fn new(config: EnsembleConfig) -> Result<Self, PdfError> {
        if config.size < 2 {
            return Err(PdfError::Contract(
                ErrorInfo::new("ensemble-size", "an ensemble needs members besides the central one")
                    .with_context("size", config.size),
            ));
        }
        if config.error_type == ErrorModel::Hessian && (config.size - 1) % 2 != 0 {
            return Err(PdfError::Contract(
                ErrorInfo::new("hessian-unpaired", "hessian members must come in eigenvector pairs")
                    .with_context("size", config.size),
            ));
        }
        Ok(Self { config })
    }

    /// Builds from `ErrorType`, `NumMembers` and `ErrorConfLevel`.
    pub fn from_metadata(meta: &dyn Metadata) -> Result<Self, PdfError> {
        Self::new(EnsembleConfig::from_metadata(meta)?)
    }

    /// The validated configuration.
    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    /// Number of non-central members.
    pub fn num_variations(&self) -> usize {
        self.config.size - 1
    }

    /// Gaussian draws expected by [`Self::random_value`].
    pub fn num_eigenvectors(&self) -> Result<usize, PdfError> {
        self.config
            .error_type
            .num_eigenvectors(self.num_variations())
            .ok_or_else(|| {
                PdfError::Contract(
                    ErrorInfo::new("not-hessian", "random values need an eigenvector ensemble")
                        .with_context("error_type", self.config.error_type.tag()),
                )
            })
    }

    fn check_values(&self, values: &[f64]) -> Result<(), PdfError> {
        ensure_len("ensemble-values", "member values", values.len(), self.config.size)
    }

    /// Uncertainty on `values` at `requested_cl` percent.
    ///
    /// `None` or a non-positive level means the ensemble's own level. With
    /// `use_median` a replica ensemble reports the median and the percentile
    /// bounds enclosing `requested_cl` instead of the mean and standard
    /// deviation. If either level lies outside the open interval `(0, 100)`
    /// the unscaled result is returned.
    pub fn uncertainty(
        &self,
        values: &[f64],
        requested_cl: Option<f64>,
        use_median: bool,
    ) -> Result<UncertaintyResult, PdfError> {
        self.check_values(values)?;
        let n = self.num_variations();
        let central = values[0];
        let members = &values[1..];

        let mut result = match self.config.error_type {
            ErrorModel::Replicas => {
                let count = n as f64;
                let mean = members.iter().sum::<f64>() / count;
                let mean_sq = members.iter().map(|v| v * v).sum::<f64>() / count;
                let variance = count / (count - 1.0) * (mean_sq - mean * mean);
                let sd = if variance > 0.0 && n > 1 { variance.sqrt() } else { 0.0 };
                symmetric(mean, sd)
            }
            ErrorModel::SymmHessian => {
                let sum: f64 = members.iter().map(|v| (v - central).powi(2)).sum();
                symmetric(central, sum.sqrt())
            }
            ErrorModel::Hessian => {
                let (mut plus, mut minus, mut symm) = (0.0, 0.0, 0.0);
                for pair in members.chunks_exact(2) {
                    let (up, down) = (pair[0] - central, pair[1] - central);
                    plus += up.max(down).max(0.0).powi(2);
                    minus += (-up).max(-down).max(0.0).powi(2);
                    symm += (pair[0] - pair[1]).powi(2);
                }
                UncertaintyResult {
                    central,
                    errplus: plus.sqrt(),
                    errminus: minus.sqrt(),
                    errsymm: 0.5 * symm.sqrt(),
                    scale: 1.0,
                }
            }
        };

        let set_cl = self.config.conf_level;
        let req_cl = match requested_cl {
            Some(cl) if cl > 0.0 => cl,
            _ => set_cl,
        };
        let valid = |cl: f64| cl > 0.0 && cl < 100.0;
        if !valid(req_cl) || !valid(set_cl) {
            return Ok(result);
        }

        if use_median && self.config.error_type == ErrorModel::Replicas {
            return Ok(median_result(members, req_cl / 100.0));
        }

        if req_cl != set_cl {
            let scale = cl_scale(set_cl, req_cl);
            result.errplus *= scale;
            result.errminus *= scale;
            result.errsymm *= scale;
            result.scale = scale;
        }
        Ok(result)
    }

    /// Correlation between two observables evaluated on every member.
    ///
    /// The result is not clamped to `[-1, 1]`.
    pub fn correlation(&self, a: &[f64], b: &[f64]) -> Result<f64, PdfError> {
        ensure_len("correlation-lengths", "second value vector", b.len(), a.len())?;
        let err_a = self.uncertainty(a, None, false)?;
        let err_b = self.uncertainty(b, None, false)?;
        let n = self.num_variations();
        let (a_members, b_members) = (&a[1..], &b[1..]);

        let cor = match self.config.error_type {
            ErrorModel::Replicas if n > 1 => {
                let count = n as f64;
                let mixed: f64 = a_members.iter().zip(b_members).map(|(x, y)| x * y).sum();
                (mixed / count - err_a.central * err_b.central) / (err_a.errsymm * err_b.errsymm) * count
                    / (count - 1.0)
            }
            ErrorModel::Replicas => 0.0,
            ErrorModel::SymmHessian => {
                let sum: f64 = a_members
                    .iter()
                    .zip(b_members)
                    .map(|(x, y)| (x - err_a.central) * (y - err_b.central))
                    .sum();
                sum / (err_a.errsymm * err_b.errsymm)
            }
            ErrorModel::Hessian => {
                let sum: f64 = a_members
                    .chunks_exact(2)
                    .zip(b_members.chunks_exact(2))
                    .map(|(x, y)| (x[0] - x[1]) * (y[0] - y[1]))
                    .sum();
                sum / (4.0 * err_a.errsymm * err_b.errsymm)
            }
        };
        Ok(cor)
    }

    /// Maps one Gaussian draw per eigenvector onto a value of the observable.
    ///
    /// Draws are in units of the one-sigma uncertainty. With `symmetrise` a
    /// `hessian` pair moves by half its spread; otherwise a positive draw
    /// follows the first member of the pair and a negative draw the second.
    pub fn random_value(&self, values: &[f64], draws: &[f64], symmetrise: bool) -> Result<f64, PdfError> {
        self.check_values(values)?;
        let eigenvectors = self.num_eigenvectors()?;
        ensure_len("random-draws", "gaussian draws", draws.len(), eigenvectors)?;
        let scale = self.uncertainty(values, Some(one_sigma_cl()), false)?.scale;
        let central = values[0];
        let members = &values[1..];

        let shift: f64 = match self.config.error_type {
            ErrorModel::SymmHessian => members
                .iter()
                .zip(draws)
                .map(|(v, r)| r * (v - central).abs())
                .sum(),
            ErrorModel::Hessian => members
                .chunks_exact(2)
                .zip(draws)
                .map(|(pair, r)| {
                    if symmetrise {
                        0.5 * r * (pair[0] - pair[1]).abs()
                    } else if *r < 0.0 {
                        -r * (pair[1] - central)
                    } else {
                        r * (pair[0] - central)
                    }
                })
                .sum(),
            ErrorModel::Replicas => 0.0,
        };
        Ok(central + shift * scale)
    }

    /// [`Self::random_value`] with draws taken from `rng`.
    pub fn sample(&self, values: &[f64], rng: &mut RngHandle, symmetrise: bool) -> Result<f64, PdfError> {
        let draws = rng.gaussian_draws(self.num_eigenvectors()?);
        self.random_value(values, &draws, symmetrise)
    }
}

fn symmetric(central: f64, err: f64) -> UncertaintyResult {
    UncertaintyResult {
        central,
        errplus: err,
        errminus: err,
        errsymm: err,
        scale: 1.0,
    }
}

/// Median and percentile bounds of the replicas at probability `cl` in `[0, 1]`.
fn median_result(members: &[f64], cl: f64) -> UncertaintyResult {
    let n = members.len();
    let mut sorted = members.to_vec();
    sorted.sort_by(f64::total_cmp);
    // 1-based positions into the sorted replicas
    let at = |position: usize| sorted[position.clamp(1, n) - 1];

    let central = if n % 2 == 1 {
        at(n / 2 + 1)
    } else {
        0.5 * (at(n / 2) + at(n / 2 + 1))
    };
    let upper = (0.5 * (1.0 + cl) * n as f64).round() as usize;
    let lower = 1 + (0.5 * (1.0 - cl) * n as f64).round() as usize;
    let errplus = at(upper) - central;
    let errminus = central - at(lower);
    UncertaintyResult {
        central,
        errplus,
        errminus,
        errsymm: 0.5 * (errplus + errminus),
        scale: 1.0,
    }
}
