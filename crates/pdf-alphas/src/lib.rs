#![deny(missing_docs)]
#![doc = "Running strong coupling: analytic expansion, interpolated tables and RK4 evolution."]

/// Closed-form solver.
pub mod analytic;
pub mod beta;
/// Adaptive RK4 solver with a lazily solved anchor table.
pub mod ode;
/// QCD inputs shared by all solvers.
pub mod params;
/// Solver enum, common trait and metadata factory.
pub mod solver;
/// Interpolated alpha_s tables.
pub mod tabulated;

pub use analytic::AnalyticSolver;
pub use ode::{default_anchors_q2, OdeOpts, OdeSolver};
pub use params::QcdParams;
pub use solver::{CouplingSolver, RunningCoupling, SolverKind};
pub use tabulated::TabulatedSolver;
