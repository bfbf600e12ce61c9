//! Confidence-level conversions. Levels are given in percent.

use statrs::function::erf::{erf, erf_inv};

/// Probability content of one Gaussian standard deviation, in percent (about 68.27).
pub fn one_sigma_cl() -> f64 {
    100.0 * erf(std::f64::consts::FRAC_1_SQRT_2)
}

/// Quantile of the chi-squared distribution with one degree of freedom at
/// probability `p` in `[0, 1]`.
///
/// For one degree of freedom the quantile is the square of the two-sided
/// Gaussian bound, `2 erf_inv(p)^2`.
pub fn chi2_1_quantile(p: f64) -> f64 {
    let z = erf_inv(p);
    2.0 * z * z
}

/// Factor that maps an uncertainty at `from_cl` onto `to_cl`.
pub fn cl_scale(from_cl: f64, to_cl: f64) -> f64 {
    (chi2_1_quantile(to_cl / 100.0) / chi2_1_quantile(from_cl / 100.0)).sqrt()
}
