use pdf_core::errors::{ErrorInfo, PdfError};

use crate::beta::{betas, MAX_LOOPS};
use crate::params::QcdParams;

/// Closed-form running coupling from the asymptotic expansion in
/// `L = ln(Q2 / Lambda_nf^2)`.
///
/// The active flavor count is clipped to the range of flavor numbers that
/// carry an explicit Lambda value.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticSolver {
    params: QcdParams,
}

impl AnalyticSolver {
    /// Wraps the given parameters.
    pub fn new(params: QcdParams) -> Self {
        Self { params }
    }

    /// Current parameters.
    pub fn params(&self) -> &QcdParams {
        &self.params
    }

    pub(crate) fn params_mut(&mut self) -> &mut QcdParams {
        &mut self.params
    }

    /// Smallest and largest flavor numbers with a Lambda value.
    pub fn flavor_span(&self) -> Option<(u32, u32)> {
        let mut set = (1..=6u32).filter(|nf| self.params.lambda(*nf).is_some());
        let low = set.next()?;
        let high = set.last().unwrap_or(low);
        Some((low, high))
    }

    /// Active flavors at `q2`, clipped to [`Self::flavor_span`].
    pub fn num_flavors_q2(&self, q2: f64) -> u32 {
        let nf = self.params.num_flavors_q2(q2);
        match self.flavor_span() {
            Some((low, high)) => nf.clamp(low, high),
            None => nf,
        }
    }

    /// alpha_s at `q2`. Order 0 freezes the coupling at alpha_s(M_Z).
    pub fn alpha_s_q2(&self, q2: f64) -> Result<f64, PdfError> {
        if self.params.order == 0 {
            return Ok(self.params.alphas_mz);
        }
        if self.flavor_span().is_none() {
            return Err(PdfError::Metadata(
                ErrorInfo::new("lambda-missing", "analytic alpha_s needs at least one Lambda value")
                    .with_hint("set Lambda4 or Lambda5 in the set metadata"),
            ));
        }
        let nf = self.num_flavors_q2(q2);
        let lambda = self.params.lambda(nf).ok_or_else(|| {
            PdfError::Metadata(
                ErrorInfo::new("lambda-missing", "no Lambda value for the active flavor count")
                    .with_context("nf", nf),
            )
        })?;
        let lambda2 = lambda * lambda;
        if q2 <= lambda2 {
            return Err(PdfError::Range(
                ErrorInfo::new("q2-below-lambda", "Q2 must lie above Lambda_QCD squared")
                    .with_context("q2", q2)
                    .with_context("lambda2", lambda2),
            ));
        }
        Ok(expansion(q2 / lambda2, nf, self.params.order.min(MAX_LOOPS)))
    }
}

fn expansion(ratio: f64, nf: u32, loops: u32) -> f64 {
    let [b0, b1, b2, b3] = betas(nf);
    let l = ratio.ln();
    let lnl = l.ln();

    let mut bracket = 1.0;
    if loops >= 2 {
        bracket -= b1 * lnl / (b0 * b0 * l);
    }
    if loops >= 3 {
        let lead = b1 * b1 * (lnl * lnl - lnl - 1.0) + b0 * b2;
        bracket += lead / (b0.powi(4) * l * l);
    }
    if loops >= 4 {
        let poly = lnl.powi(3) - 2.5 * lnl * lnl - 2.0 * lnl + 0.5;
        let lead = b1.powi(3) * poly + 3.0 * b0 * b1 * b2 * lnl - 0.5 * b0 * b0 * b3;
        bracket -= lead / (b0.powi(6) * l.powi(3));
    }
    bracket / (b0 * l)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beta::beta;

    fn solver(order: u32) -> AnalyticSolver {
        let mut params = QcdParams {
            order,
            ..QcdParams::default()
        };
        params.set_lambda(4, 0.326).unwrap();
        params.set_lambda(5, 0.226).unwrap();
        AnalyticSolver::new(params)
    }

    #[test]
    fn one_loop_is_the_leading_log() {
        let solver = solver(1);
        let q2 = 1000.0;
        let expected = 1.0 / (beta(0, 5) * (q2 / (0.226f64 * 0.226)).ln());
        assert!((solver.alpha_s_q2(q2).unwrap() - expected).abs() < 1e-14);
    }

    #[test]
    fn zero_loops_freeze_at_the_boundary_value() {
        let frozen = solver(0);
        for q2 in [2.0, 1000.0, 1e8] {
            assert_eq!(frozen.alpha_s_q2(q2).unwrap(), 0.118);
        }
        assert_eq!(AnalyticSolver::new(QcdParams { order: 0, ..QcdParams::default() }).alpha_s_q2(50.0).unwrap(), 0.118);
    }

    #[test]
    fn flavors_are_clipped_to_available_lambdas() {
        let solver = solver(2);
        assert_eq!(solver.flavor_span(), Some((4, 5)));
        assert_eq!(solver.num_flavors_q2(1.0), 4);
        assert_eq!(solver.num_flavors_q2(1e6), 5);
    }

    #[test]
    fn scales_at_or_below_lambda_are_range_errors() {
        let solver = solver(2);
        let err = solver.alpha_s_q2(0.326 * 0.326).unwrap_err();
        assert_eq!(err.info().code, "q2-below-lambda");
        assert!(matches!(solver.alpha_s_q2(0.01), Err(PdfError::Range(_))));
    }

    #[test]
    fn missing_lambdas_are_metadata_errors() {
        let solver = AnalyticSolver::new(QcdParams::default());
        assert!(matches!(solver.alpha_s_q2(100.0), Err(PdfError::Metadata(_))));
    }

    #[test]
    fn higher_orders_are_small_corrections_at_mz() {
        let mz2 = 91.1876f64 * 91.1876;
        let values: Vec<f64> = (1..=4).map(|order| solver(order).alpha_s_q2(mz2).unwrap()).collect();
        for value in &values {
            assert!((0.08..0.16).contains(value), "{values:?}");
        }
        assert!((values[3] - values[2]).abs() < (values[1] - values[0]).abs());
    }
}
