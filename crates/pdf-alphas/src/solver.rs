use pdf_core::errors::{ensure_len, ErrorInfo, PdfError};
use pdf_core::metadata::Metadata;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analytic::AnalyticSolver;
use crate::ode::OdeSolver;
use crate::params::QcdParams;
use crate::tabulated::TabulatedSolver;

/// Common query surface of the coupling solvers.
pub trait RunningCoupling {
    /// alpha_s at squared scale `q2`.
    fn alpha_s_q2(&self, q2: f64) -> Result<f64, PdfError>;

    /// alpha_s at scale `q`.
    fn alpha_s_q(&self, q: f64) -> Result<f64, PdfError> {
        self.alpha_s_q2(q * q)
    }

    /// Active flavors at squared scale `q2`.
    fn num_flavors_q2(&self, q2: f64) -> u32;

    /// Active flavors at scale `q`.
    fn num_flavors_q(&self, q: f64) -> u32 {
        self.num_flavors_q2(q * q)
    }
}

impl RunningCoupling for AnalyticSolver {
    fn alpha_s_q2(&self, q2: f64) -> Result<f64, PdfError> {
        AnalyticSolver::alpha_s_q2(self, q2)
    }

    fn num_flavors_q2(&self, q2: f64) -> u32 {
        AnalyticSolver::num_flavors_q2(self, q2)
    }
}

impl RunningCoupling for TabulatedSolver {
    fn alpha_s_q2(&self, q2: f64) -> Result<f64, PdfError> {
        TabulatedSolver::alpha_s_q2(self, q2)
    }

    fn num_flavors_q2(&self, q2: f64) -> u32 {
        TabulatedSolver::num_flavors_q2(self, q2)
    }
}

impl RunningCoupling for OdeSolver {
    fn alpha_s_q2(&self, q2: f64) -> Result<f64, PdfError> {
        OdeSolver::alpha_s_q2(self, q2)
    }

    fn num_flavors_q2(&self, q2: f64) -> u32 {
        OdeSolver::num_flavors_q2(self, q2)
    }
}

/// Tag naming a solver in set metadata (`AlphaS_Type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    /// Closed-form expansion in `ln(Q2 / Lambda^2)`.
    Analytic,
    /// Interpolated table.
    Ipol,
    /// Numerical RG evolution.
    Ode,
}

impl SolverKind {
    /// Parses a metadata tag, ignoring case.
    pub fn from_tag(tag: &str) -> Result<Self, PdfError> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "analytic" => Ok(Self::Analytic),
            "ipol" => Ok(Self::Ipol),
            "ode" => Ok(Self::Ode),
            _ => Err(PdfError::Metadata(
                ErrorInfo::new("alphas-type", "unsupported AlphaS_Type")
                    .with_context("tag", tag)
                    .with_hint("expected one of analytic, ipol, ode"),
            )),
        }
    }

    /// Canonical tag.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Analytic => "analytic",
            Self::Ipol => "ipol",
            Self::Ode => "ode",
        }
    }
}

/// The closed set of coupling solvers.
#[derive(Debug, Clone)]
pub enum CouplingSolver {
    /// See [`AnalyticSolver`].
    Analytic(AnalyticSolver),
    /// See [`TabulatedSolver`].
    Tabulated(TabulatedSolver),
    /// See [`OdeSolver`].
    Ode(OdeSolver),
}

fn squared(qs: Vec<f64>) -> Vec<f64> {
    qs.into_iter().map(|q| q * q).collect()
}

impl CouplingSolver {
    /// Builds the solver named by `AlphaS_Type`, configured from every parameter key present.
    ///
    /// `AlphaS_Qs` holds scales in GeV and is squared on load. It is required
    /// (together with `AlphaS_Vals`) for `ipol` and optional anchors for `ode`.
    pub fn from_metadata(meta: &dyn Metadata) -> Result<Self, PdfError> {
        let kind = SolverKind::from_tag(&meta.get_string("AlphaS_Type")?)?;
        let params = QcdParams::from_metadata(meta)?;
        let solver = match kind {
            SolverKind::Analytic => Self::Analytic(AnalyticSolver::new(params)),
            SolverKind::Ipol => {
                let qs = meta.get_f64_list("AlphaS_Qs")?;
                let values = meta.get_f64_list("AlphaS_Vals")?;
                ensure_len("alphas-table-shape", "AlphaS_Vals", values.len(), qs.len())?;
                Self::Tabulated(TabulatedSolver::new(params, squared(qs), values)?)
            }
            SolverKind::Ode => {
                let mut solver = OdeSolver::new(params);
                if meta.has_key("AlphaS_Qs") {
                    solver.set_anchors_q2(squared(meta.get_f64_list("AlphaS_Qs")?))?;
                }
                Self::Ode(solver)
            }
        };
        debug!(kind = kind.tag(), order = solver.params().order, "built alpha_s solver");
        Ok(solver)
    }

    /// Which variant this is.
    pub fn kind(&self) -> SolverKind {
        match self {
            Self::Analytic(_) => SolverKind::Analytic,
            Self::Tabulated(_) => SolverKind::Ipol,
            Self::Ode(_) => SolverKind::Ode,
        }
    }

    /// Current parameters.
    pub fn params(&self) -> &QcdParams {
        match self {
            Self::Analytic(solver) => solver.params(),
            Self::Tabulated(solver) => solver.params(),
            Self::Ode(solver) => solver.params(),
        }
    }

    /// Mass of quark `id`.
    pub fn quark_mass(&self, id: i32) -> Result<f64, PdfError> {
        self.params().quark_mass(id)
    }

    /// Sets the number of loops.
    pub fn set_order(&mut self, order: u32) {
        match self {
            Self::Analytic(solver) => solver.params_mut().order = order,
            Self::Tabulated(solver) => solver.params_mut().order = order,
            Self::Ode(solver) => solver.set_order(order),
        }
    }

    /// Sets the Z mass.
    pub fn set_mz(&mut self, mz: f64) {
        match self {
            Self::Analytic(solver) => solver.params_mut().mz = mz,
            Self::Tabulated(solver) => solver.params_mut().mz = mz,
            Self::Ode(solver) => solver.set_mz(mz),
        }
    }

    /// Sets alpha_s(M_Z).
    pub fn set_alphas_mz(&mut self, alphas_mz: f64) {
        match self {
            Self::Analytic(solver) => solver.params_mut().alphas_mz = alphas_mz,
            Self::Tabulated(solver) => solver.params_mut().alphas_mz = alphas_mz,
            Self::Ode(solver) => solver.set_alphas_mz(alphas_mz),
        }
    }

    /// Sets the mass of quark `id`.
    pub fn set_quark_mass(&mut self, id: i32, mass: f64) -> Result<(), PdfError> {
        match self {
            Self::Analytic(solver) => solver.params_mut().set_quark_mass(id, mass),
            Self::Tabulated(solver) => solver.params_mut().set_quark_mass(id, mass),
            Self::Ode(solver) => solver.set_quark_mass(id, mass),
        }
    }

    /// Sets Lambda_QCD for `nf` active flavors.
    pub fn set_lambda(&mut self, nf: u32, lambda: f64) -> Result<(), PdfError> {
        match self {
            Self::Analytic(solver) => solver.params_mut().set_lambda(nf, lambda),
            Self::Tabulated(solver) => solver.params_mut().set_lambda(nf, lambda),
            Self::Ode(solver) => solver.set_lambda(nf, lambda),
        }
    }

    /// Builds any lazily solved state now.
    pub fn warm(&self) -> Result<(), PdfError> {
        match self {
            Self::Ode(solver) => solver.warm(),
            Self::Analytic(_) | Self::Tabulated(_) => Ok(()),
        }
    }
}

impl RunningCoupling for CouplingSolver {
    fn alpha_s_q2(&self, q2: f64) -> Result<f64, PdfError> {
        match self {
            Self::Analytic(solver) => solver.alpha_s_q2(q2),
            Self::Tabulated(solver) => solver.alpha_s_q2(q2),
            Self::Ode(solver) => solver.alpha_s_q2(q2),
        }
    }

    fn num_flavors_q2(&self, q2: f64) -> u32 {
        match self {
            Self::Analytic(solver) => solver.num_flavors_q2(q2),
            Self::Tabulated(solver) => solver.num_flavors_q2(q2),
            Self::Ode(solver) => solver.num_flavors_q2(q2),
        }
    }
}

impl From<AnalyticSolver> for CouplingSolver {
    fn from(solver: AnalyticSolver) -> Self {
        Self::Analytic(solver)
    }
}

impl From<TabulatedSolver> for CouplingSolver {
    fn from(solver: TabulatedSolver) -> Self {
        Self::Tabulated(solver)
    }
}

impl From<OdeSolver> for CouplingSolver {
    fn from(solver: OdeSolver) -> Self {
        Self::Ode(solver)
    }
}
