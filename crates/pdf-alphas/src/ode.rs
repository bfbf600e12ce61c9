use std::sync::OnceLock;

use pdf_core::errors::{ErrorInfo, PdfError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::beta::{betas, rg_rhs};
use crate::params::QcdParams;
use crate::tabulated::TabulatedSolver;

fn default_initial_step() -> f64 {
    0.1
}

fn default_relative_tolerance() -> f64 {
    1e-10
}

fn default_max_step() -> f64 {
    1.0
}

fn default_max_steps() -> usize {
    10_000
}

/// Step control for the adaptive RK4 integration. Step sizes are in `ln Q2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OdeOpts {
    /// First trial step.
    #[serde(default = "default_initial_step")]
    pub initial_step: f64,
    /// Accepted local error relative to `|alpha_s|`.
    #[serde(default = "default_relative_tolerance")]
    pub relative_tolerance: f64,
    /// Upper bound on any single step.
    #[serde(default = "default_max_step")]
    pub max_step: f64,
    /// Total number of attempted steps before the solve is abandoned.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

impl Default for OdeOpts {
    fn default() -> Self {
        Self {
            initial_step: default_initial_step(),
            relative_tolerance: default_relative_tolerance(),
            max_step: default_max_step(),
            max_steps: default_max_steps(),
        }
    }
}

/// 100 log-spaced scales between 1 and 10^4 GeV, as Q2.
pub fn default_anchors_q2() -> Vec<f64> {
    const COUNT: usize = 100;
    (0..COUNT)
        .map(|i| {
            let q = 10f64.powf(4.0 * i as f64 / (COUNT - 1) as f64);
            q * q
        })
        .collect()
}

/// alpha_s from numerically integrating the RG equation out of `(M_Z, alpha_s(M_Z))`.
///
/// The equation is solved once, on first use, at a set of anchor scales; the
/// anchors are then interpolated by a [`TabulatedSolver`]. Every setter that
/// changes the solution drops the solved table.
#[derive(Debug, Clone)]
pub struct OdeSolver {
    params: QcdParams,
    opts: OdeOpts,
    anchors_q2: Option<Vec<f64>>,
    table: OnceLock<TabulatedSolver>,
}

impl OdeSolver {
    /// Solver with default step control and default anchors.
    pub fn new(params: QcdParams) -> Self {
        Self::with_opts(params, OdeOpts::default())
    }

    /// Solver with explicit step control.
    pub fn with_opts(params: QcdParams, opts: OdeOpts) -> Self {
        Self {
            params,
            opts,
            anchors_q2: None,
            table: OnceLock::new(),
        }
    }

    /// Current parameters.
    pub fn params(&self) -> &QcdParams {
        &self.params
    }

    /// Current step control.
    pub fn opts(&self) -> &OdeOpts {
        &self.opts
    }

    /// Explicit anchors, if any were set.
    pub fn anchors_q2(&self) -> Option<&[f64]> {
        self.anchors_q2.as_deref()
    }

    /// Replaces the anchor scales (as Q2).
    pub fn set_anchors_q2(&mut self, anchors: Vec<f64>) -> Result<(), PdfError> {
        if anchors.iter().any(|q2| !(q2.is_finite() && *q2 > 0.0)) {
            return Err(PdfError::contract(
                "ode-anchors-domain",
                "alpha_s anchors must be finite and positive",
            ));
        }
        let mut distinct = anchors.clone();
        distinct.sort_by(f64::total_cmp);
        distinct.dedup();
        if distinct.len() < 2 {
            return Err(PdfError::Contract(
                ErrorInfo::new("ode-anchors-short", "alpha_s anchors need at least two distinct scales")
                    .with_context("distinct", distinct.len()),
            ));
        }
        self.anchors_q2 = Some(anchors);
        self.invalidate();
        Ok(())
    }

    /// Replaces the step control.
    pub fn set_opts(&mut self, opts: OdeOpts) {
        self.opts = opts;
        self.invalidate();
    }

    /// Sets the number of loops.
    pub fn set_order(&mut self, order: u32) {
        self.params.order = order;
        self.invalidate();
    }

    /// Sets the Z mass.
    pub fn set_mz(&mut self, mz: f64) {
        self.params.mz = mz;
        self.invalidate();
    }

    /// Sets the boundary value alpha_s(M_Z).
    pub fn set_alphas_mz(&mut self, alphas_mz: f64) {
        self.params.alphas_mz = alphas_mz;
        self.invalidate();
    }

    /// Sets the mass of quark `id`, which moves a flavor threshold.
    pub fn set_quark_mass(&mut self, id: i32, mass: f64) -> Result<(), PdfError> {
        self.params.set_quark_mass(id, mass)?;
        self.invalidate();
        Ok(())
    }

    /// Stores a Lambda value. The integration does not use it.
    pub fn set_lambda(&mut self, nf: u32, lambda: f64) -> Result<(), PdfError> {
        self.params.set_lambda(nf, lambda)
    }

    /// Drops the solved table.
    pub fn invalidate(&mut self) {
        if self.table.take().is_some() {
            debug!("invalidated alpha_s anchor table");
        }
    }

    /// Whether the anchor table is currently solved.
    pub fn is_solved(&self) -> bool {
        self.table.get().is_some()
    }

    /// Solves the anchor table if needed.
    pub fn warm(&self) -> Result<(), PdfError> {
        self.table().map(|_| ())
    }

    /// The solved anchor table.
    pub fn table(&self) -> Result<&TabulatedSolver, PdfError> {
        if let Some(table) = self.table.get() {
            return Ok(table);
        }
        let solved = self.solve()?;
        Ok(self.table.get_or_init(|| solved))
    }

    /// Active flavors at `q2` from the quark-mass thresholds.
    pub fn num_flavors_q2(&self, q2: f64) -> u32 {
        self.params.num_flavors_q2(q2)
    }

    /// alpha_s at `q2`.
    pub fn alpha_s_q2(&self, q2: f64) -> Result<f64, PdfError> {
        self.table()?.alpha_s_q2(q2)
    }

    /// Sorted anchors with every interior threshold listed twice.
    fn knots(&self) -> Vec<f64> {
        let mut knots = self.anchors_q2.clone().unwrap_or_else(default_anchors_q2);
        knots.sort_by(f64::total_cmp);
        knots.dedup();
        let (low, high) = (knots[0], knots[knots.len() - 1]);
        for threshold in self.params.thresholds_q2() {
            if threshold > low && threshold < high {
                knots.retain(|knot| *knot != threshold);
                knots.extend([threshold, threshold]);
            }
        }
        knots.sort_by(f64::total_cmp);
        knots
    }

    fn solve(&self) -> Result<TabulatedSolver, PdfError> {
        let knots = self.knots();
        let mz2 = self.params.mz * self.params.mz;
        let mut integrator = Integrator {
            params: &self.params,
            opts: &self.opts,
            thresholds: self
                .params
                .thresholds_q2()
                .into_iter()
                .filter(|q2| *q2 > 0.0)
                .map(f64::ln)
                .collect(),
            steps: 0,
        };

        let mut values = vec![0.0; knots.len()];
        let split = knots.partition_point(|q2| *q2 < mz2);

        let mut state = (mz2.ln(), self.params.alphas_mz, self.opts.initial_step);
        for i in (0..split).rev() {
            state = integrator.run(state, knots[i].ln())?;
            values[i] = state.1;
        }
        let mut state = (mz2.ln(), self.params.alphas_mz, self.opts.initial_step);
        for i in split..knots.len() {
            state = integrator.run(state, knots[i].ln())?;
            values[i] = state.1;
        }

        debug!(
            anchors = knots.len(),
            steps = integrator.steps,
            order = self.params.order,
            "solved alpha_s anchor table"
        );
        TabulatedSolver::new(self.params.clone(), knots, values)
    }
}

struct Integrator<'a> {
    params: &'a QcdParams,
    opts: &'a OdeOpts,
    thresholds: Vec<f64>,
    steps: usize,
}

impl Integrator<'_> {
    /// Advances `(ln Q2, alpha_s, step size)` to `target`.
    fn run(&mut self, state: (f64, f64, f64), target: f64) -> Result<(f64, f64, f64), PdfError> {
        let (mut t, mut alpha, mut size) = state;
        let dir = if target < t { -1.0 } else { 1.0 };
        while t != target {
            let stop = self.next_stop(t, target, dir);
            let remaining = (stop - t).abs();
            let lands = size >= remaining;
            let taken = if lands { remaining } else { size };
            let h = dir * taken;

            self.steps += 1;
            if self.steps > self.opts.max_steps {
                return Err(PdfError::Contract(
                    ErrorInfo::new("ode-step-budget", "alpha_s integration exceeded its step budget")
                        .with_context("max_steps", self.opts.max_steps)
                        .with_context("q2", t.exp()),
                ));
            }

            let nf = self.params.num_flavors_q2((t + 0.5 * h).exp());
            let coefficients = betas(nf);
            let loops = self.params.order;
            let full = rk4(alpha, h, &coefficients, loops);
            let half = rk4(rk4(alpha, 0.5 * h, &coefficients, loops), 0.5 * h, &coefficients, loops);

            let error = (half - full).abs();
            let tolerance = self.opts.relative_tolerance * half.abs();
            if error > tolerance {
                size = 0.5 * taken;
                continue;
            }

            alpha = half;
            t = if lands { stop } else { t + h };
            if !lands && error < tolerance / 32.0 {
                size = (2.0 * size).min(self.opts.max_step);
            }
        }
        Ok((t, alpha, size))
    }

    /// Nearest threshold strictly between `t` and `target`, else `target`.
    fn next_stop(&self, t: f64, target: f64, dir: f64) -> f64 {
        self.thresholds
            .iter()
            .copied()
            .filter(|th| (th - t) * dir > 0.0 && (target - th) * dir > 0.0)
            .fold(target, |best, th| if (best - th) * dir > 0.0 { th } else { best })
    }
}

#[inline]
fn rk4(alpha: f64, h: f64, coefficients: &[f64; 4], loops: u32) -> f64 {
    let f = |a: f64| rg_rhs(a, coefficients, loops);
    let k1 = f(alpha);
    let k2 = f(alpha + 0.5 * h * k1);
    let k3 = f(alpha + 0.5 * h * k2);
    let k4 = f(alpha + h * k3);
    alpha + h / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4)
}
