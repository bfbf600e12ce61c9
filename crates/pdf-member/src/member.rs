use std::collections::BTreeMap;
use std::sync::OnceLock;

use pdf_alphas::{CouplingSolver, RunningCoupling};
use pdf_core::errors::{ErrorInfo, PdfError};
use pdf_core::flavor::{canonical_id, standard_window_id, STANDARD_WINDOW};
use pdf_core::metadata::{Metadata, MetadataMap};
use pdf_grid::{Interpolator, InterpolatorKind, PdfGrid};
use tracing::debug;

use crate::range::check_physical;

/// One member of a grid-based PDF set.
///
/// Queries for a flavor the member does not define return `0.0`. Queries for
/// a defined flavor outside the tabulated `(x, Q2)` coverage fail with a
/// range error; there is no extrapolation.
///
/// The coupling solver is built from the metadata on first use and kept until
/// replaced or reset through `&mut self`.
#[derive(Debug, Clone)]
pub struct GridPdf<M = MetadataMap> {
    grid: PdfGrid,
    meta: M,
    interpolator: InterpolatorKind,
    flavors: OnceLock<Vec<i32>>,
    alpha_s: OnceLock<CouplingSolver>,
}

impl<M: Metadata> GridPdf<M> {
    /// Wraps a grid and its metadata.
    ///
    /// A `Flavors` entry, when present, must only name flavors tabulated in
    /// the grid.
    pub fn new(grid: PdfGrid, meta: M) -> Result<Self, PdfError> {
        if meta.has_key("Flavors") {
            for id in meta.get_i64_list("Flavors")? {
                let id = i32::try_from(id).map_err(|_| {
                    PdfError::Metadata(
                        ErrorInfo::new("flavor-id", "flavor id does not fit a PDG code")
                            .with_context("id", id),
                    )
                })?;
                if !grid.has_flavor(canonical_id(id)) {
                    return Err(PdfError::Contract(
                        ErrorInfo::new("flavor-without-grid", "metadata lists a flavor the grid lacks")
                            .with_context("id", id),
                    ));
                }
            }
        }
        Ok(Self {
            grid,
            meta,
            interpolator: InterpolatorKind::default(),
            flavors: OnceLock::new(),
            alpha_s: OnceLock::new(),
        })
    }

    /// Selects the interpolation scheme.
    pub fn with_interpolator(mut self, interpolator: InterpolatorKind) -> Self {
        self.interpolator = interpolator;
        self
    }

    /// The underlying grid.
    pub fn grid(&self) -> &PdfGrid {
        &self.grid
    }

    /// The member metadata.
    pub fn metadata(&self) -> &M {
        &self.meta
    }

    /// Active interpolation scheme.
    pub fn interpolator(&self) -> InterpolatorKind {
        self.interpolator
    }

    /// Sets the interpolation scheme.
    pub fn set_interpolator(&mut self, interpolator: InterpolatorKind) {
        self.interpolator = interpolator;
    }

    /// Defined flavors in ascending order, from `Flavors` or else the grid.
    pub fn flavors(&self) -> &[i32] {
        self.flavors.get_or_init(|| {
            let mut ids: Vec<i32> = match self.meta.get_i64_list("Flavors") {
                Ok(listed) => listed.into_iter().map(|id| canonical_id(id as i32)).collect(),
                Err(_) => self.grid.flavors(),
            };
            ids.sort_unstable();
            ids.dedup();
            debug!(count = ids.len(), "cached member flavor list");
            ids
        })
    }

    /// Whether flavor `id` is defined (`0` is the gluon).
    pub fn has_flavor(&self, id: i32) -> bool {
        self.flavors().binary_search(&canonical_id(id)).is_ok()
    }

    /// Lower x edge, from `XMin` or else the knots.
    pub fn x_min(&self) -> Result<f64, PdfError> {
        self.edge("XMin", self.grid.x_min())
    }

    /// Upper x edge, from `XMax` or else the knots.
    pub fn x_max(&self) -> Result<f64, PdfError> {
        self.edge("XMax", self.grid.x_max())
    }

    /// Lower Q2 edge, from `Q2Min` or else the knots.
    pub fn q2_min(&self) -> Result<f64, PdfError> {
        self.edge("Q2Min", self.grid.q2_min())
    }

    /// Upper Q2 edge, from `Q2Max` or else the knots.
    pub fn q2_max(&self) -> Result<f64, PdfError> {
        self.edge("Q2Max", self.grid.q2_max())
    }

    /// Square root of [`Self::q2_min`].
    pub fn q_min(&self) -> Result<f64, PdfError> {
        Ok(self.q2_min()?.sqrt())
    }

    /// Square root of [`Self::q2_max`].
    pub fn q_max(&self) -> Result<f64, PdfError> {
        Ok(self.q2_max()?.sqrt())
    }

    fn edge(&self, key: &str, knots: f64) -> Result<f64, PdfError> {
        Ok(self.meta.opt_f64(key)?.unwrap_or(knots))
    }

    /// Whether `x` lies inside the tabulated x coverage.
    pub fn in_range_x(&self, x: f64) -> bool {
        x >= self.grid.x_min() && x <= self.grid.x_max()
    }

    /// Whether `q2` lies inside the tabulated Q2 coverage.
    pub fn in_range_q2(&self, q2: f64) -> bool {
        q2 >= self.grid.q2_min() && q2 <= self.grid.q2_max()
    }

    /// Both of the above.
    pub fn in_range_xq2(&self, x: f64, q2: f64) -> bool {
        self.in_range_x(x) && self.in_range_q2(q2)
    }

    /// `x f(x, Q2)` for flavor `id`.
    pub fn xf_q2(&self, id: i32, x: f64, q2: f64) -> Result<f64, PdfError> {
        check_physical(x, q2)?;
        let id = canonical_id(id);
        if !self.has_flavor(id) {
            return Ok(0.0);
        }
        let knots = self.grid.knot_grid(id, q2).ok_or_else(|| {
            PdfError::Lookup(ErrorInfo::new("flavor-without-grid", "flavor has no knot grid").with_context("id", id))
        })?;
        let covered = x >= knots.x_min()
            && x <= knots.x_max()
            && q2 >= self.grid.q2_min()
            && q2 <= self.grid.q2_max();
        if !covered {
            return Err(PdfError::Range(
                ErrorInfo::new("outside-grid", "point lies outside the tabulated grid")
                    .with_context("x", x)
                    .with_context("q2", q2)
                    .with_hint("check in_range_xq2 before querying"),
            ));
        }
        Ok(self.interpolator.interpolate(knots, x, q2))
    }

    /// `x f(x, Q)` for flavor `id`.
    pub fn xf_q(&self, id: i32, x: f64, q: f64) -> Result<f64, PdfError> {
        self.xf_q2(id, x, q * q)
    }

    /// Fills `out` with every defined flavor, replacing its previous contents.
    pub fn xf_q2_map(&self, x: f64, q2: f64, out: &mut BTreeMap<i32, f64>) -> Result<(), PdfError> {
        out.clear();
        for &id in self.flavors() {
            out.insert(id, self.xf_q2(id, x, q2)?);
        }
        Ok(())
    }

    /// Fills the standard window: ids `-6..=6` with the gluon at index 6.
    pub fn xf_q2_standard(&self, x: f64, q2: f64, out: &mut [f64; STANDARD_WINDOW]) -> Result<(), PdfError> {
        for (index, slot) in out.iter_mut().enumerate() {
            *slot = self.xf_q2(standard_window_id(index), x, q2)?;
        }
        Ok(())
    }

    /// Every defined flavor in a fresh map.
    pub fn xf_q2_all(&self, x: f64, q2: f64) -> Result<BTreeMap<i32, f64>, PdfError> {
        let mut out = BTreeMap::new();
        self.xf_q2_map(x, q2, &mut out)?;
        Ok(out)
    }

    /// The coupling solver, built from the metadata on first use.
    pub fn alpha_s(&self) -> Result<&CouplingSolver, PdfError> {
        if let Some(solver) = self.alpha_s.get() {
            return Ok(solver);
        }
        let built = CouplingSolver::from_metadata(&self.meta)?;
        Ok(self.alpha_s.get_or_init(|| built))
    }

    /// Mutable access to the coupling solver, building it first if needed.
    pub fn alpha_s_mut(&mut self) -> Result<&mut CouplingSolver, PdfError> {
        if self.alpha_s.get().is_none() {
            let built = CouplingSolver::from_metadata(&self.meta)?;
            self.alpha_s = OnceLock::from(built);
        }
        self.alpha_s.get_mut().ok_or_else(|| {
            PdfError::contract("alpha-s-uninitialised", "coupling solver missing after construction")
        })
    }

    /// Replaces the coupling solver.
    pub fn set_alpha_s(&mut self, solver: CouplingSolver) {
        self.alpha_s = OnceLock::from(solver);
    }

    /// Drops the coupling solver; the next query rebuilds it from the metadata.
    pub fn reset_alpha_s(&mut self) {
        if self.alpha_s.take().is_some() {
            debug!("dropped member alpha_s solver");
        }
    }

    /// Builds the coupling solver and any table it solves lazily.
    pub fn warm_alpha_s(&self) -> Result<(), PdfError> {
        self.alpha_s()?.warm()
    }

    /// alpha_s at squared scale `q2`.
    pub fn alpha_s_q2(&self, q2: f64) -> Result<f64, PdfError> {
        self.alpha_s()?.alpha_s_q2(q2)
    }

    /// alpha_s at scale `q`.
    pub fn alpha_s_q(&self, q: f64) -> Result<f64, PdfError> {
        self.alpha_s()?.alpha_s_q(q)
    }
}
