//! MS-bar beta function coefficients.
//!
//! Normalised so that `d alpha_s / d ln Q2 = -(b0 a^2 + b1 a^3 + b2 a^4 + b3 a^5)`.

use std::f64::consts::PI;

const ZETA3: f64 = 1.202_056_903_159_594_3;

/// Highest supported number of loops.
pub const MAX_LOOPS: u32 = 4;

/// Coefficient `b_i` for `nf` active flavors, `i` in `0..=3`.
///
/// # Panics
/// Panics for `i > 3`.
pub fn beta(i: usize, nf: u32) -> f64 {
    let nf = f64::from(nf);
    match i {
        0 => (33.0 - 2.0 * nf) / (12.0 * PI),
        1 => (153.0 - 19.0 * nf) / (24.0 * PI * PI),
        2 => (2857.0 - 5033.0 / 9.0 * nf + 325.0 / 27.0 * nf * nf) / (128.0 * PI.powi(3)),
        3 => {
            let c0 = 149_753.0 / 6.0 + 3564.0 * ZETA3;
            let c1 = 1_078_361.0 / 162.0 + 6508.0 / 27.0 * ZETA3;
            let c2 = 50_065.0 / 162.0 + 6472.0 / 81.0 * ZETA3;
            let c3 = 1093.0 / 729.0;
            (c0 - c1 * nf + c2 * nf * nf + c3 * nf.powi(3)) / (4.0 * PI).powi(4)
        }
        _ => panic!("beta coefficient {i} is not tabulated"),
    }
}

/// All four coefficients for `nf` active flavors.
pub fn betas(nf: u32) -> [f64; 4] {
    [beta(0, nf), beta(1, nf), beta(2, nf), beta(3, nf)]
}

/// Right-hand side of the RG equation in `ln Q2` truncated at `loops` loops.
#[inline]
pub fn rg_rhs(alpha: f64, betas: &[f64; 4], loops: u32) -> f64 {
    let mut power = alpha * alpha;
    let mut sum = 0.0;
    for coefficient in betas.iter().take(loops.min(MAX_LOOPS) as usize) {
        sum += coefficient * power;
        power *= alpha;
    }
    -sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coefficients_match_reference_numbers() {
        assert!((beta(0, 5) - (0.875352187 - 0.053051647 * 5.0)).abs() < 1e-8);
        assert!((beta(1, 4) - (0.6459225457 - 0.0802126037 * 4.0)).abs() < 1e-8);
        let b2 = 0.719864327 - 0.140904490 * 5.0 + 0.00303291339 * 25.0;
        assert!((beta(2, 5) - b2).abs() < 1e-7);
        let b3 = 1.172686 - 0.2785566 * 5.0 + 0.01624467 * 25.0 + 0.0000601247 * 125.0;
        assert!((beta(3, 5) - b3).abs() < 1e-5);
    }

    #[test]
    fn zero_loops_freeze_the_coupling() {
        assert_eq!(rg_rhs(0.118, &betas(5), 0), 0.0);
        let one_loop = rg_rhs(0.118, &betas(5), 1);
        assert!((one_loop + beta(0, 5) * 0.118 * 0.118).abs() < 1e-15);
    }
}
