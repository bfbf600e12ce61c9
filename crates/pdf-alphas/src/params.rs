use pdf_core::errors::{ErrorInfo, PdfError};
use pdf_core::metadata::Metadata;
use serde::{Deserialize, Serialize};

fn default_order() -> u32 {
    4
}

fn default_mz() -> f64 {
    91.1876
}

fn default_alphas_mz() -> f64 {
    0.118
}

fn default_quark_masses() -> [f64; 6] {
    // d, u, s, c, b, t in GeV
    [0.005, 0.002, 0.10, 1.29, 4.19, 172.9]
}

/// Perturbative QCD inputs shared by every coupling solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QcdParams {
    /// Number of loops in the beta function (0 freezes the coupling).
    #[serde(default = "default_order")]
    pub order: u32,
    /// Z boson mass in GeV.
    #[serde(default = "default_mz")]
    pub mz: f64,
    /// Value of alpha_s at the Z mass.
    #[serde(default = "default_alphas_mz")]
    pub alphas_mz: f64,
    /// Quark masses in GeV indexed by PDG id minus one.
    #[serde(default = "default_quark_masses")]
    pub quark_masses: [f64; 6],
    /// Lambda_QCD in GeV for `nf` active flavors, stored at index `nf - 1`.
    #[serde(default)]
    pub lambdas: [Option<f64>; 6],
}

impl Default for QcdParams {
    fn default() -> Self {
        Self {
            order: default_order(),
            mz: default_mz(),
            alphas_mz: default_alphas_mz(),
            quark_masses: default_quark_masses(),
            lambdas: [None; 6],
        }
    }
}

/// Metadata keys holding quark masses, by PDG id.
pub const MASS_KEYS: [(&str, i32); 6] = [
    ("MDown", 1),
    ("MUp", 2),
    ("MStrange", 3),
    ("MCharm", 4),
    ("MBottom", 5),
    ("MTop", 6),
];

fn quark_slot(id: i32) -> Result<usize, PdfError> {
    match id.unsigned_abs() {
        slot @ 1..=6 => Ok(slot as usize - 1),
        _ => Err(PdfError::Lookup(
            ErrorInfo::new("quark-id", "quark masses are defined for PDG ids 1 to 6")
                .with_context("id", id),
        )),
    }
}

fn flavor_slot(nf: u32) -> Result<usize, PdfError> {
    match nf {
        1..=6 => Ok(nf as usize - 1),
        _ => Err(PdfError::Lookup(
            ErrorInfo::new("lambda-nf", "Lambda_QCD is defined for 1 to 6 active flavors")
                .with_context("nf", nf),
        )),
    }
}

impl QcdParams {
    /// Defaults overridden by every parameter key present in `meta`.
    pub fn from_metadata(meta: &dyn Metadata) -> Result<Self, PdfError> {
        let mut params = Self::default();
        if let Some(order) = meta.opt_i64("AlphaS_OrderQCD")? {
            params.order = u32::try_from(order).map_err(|_| {
                PdfError::Metadata(
                    ErrorInfo::new("alphas-order", "AlphaS_OrderQCD must be non-negative")
                        .with_context("order", order),
                )
            })?;
        }
        if let Some(mz) = meta.opt_f64("MZ")? {
            params.mz = mz;
        }
        if let Some(alphas_mz) = meta.opt_f64("AlphaS_MZ")? {
            params.alphas_mz = alphas_mz;
        }
        for (key, id) in MASS_KEYS {
            if let Some(mass) = meta.opt_f64(key)? {
                params.set_quark_mass(id, mass)?;
            }
        }
        for nf in 1..=6u32 {
            if let Some(lambda) = meta.opt_f64(&format!("Lambda{nf}"))? {
                params.set_lambda(nf, lambda)?;
            }
        }
        Ok(params)
    }

    /// Mass of quark `id` (sign ignored).
    pub fn quark_mass(&self, id: i32) -> Result<f64, PdfError> {
        Ok(self.quark_masses[quark_slot(id)?])
    }

    /// Sets the mass of quark `id` (sign ignored).
    pub fn set_quark_mass(&mut self, id: i32, mass: f64) -> Result<(), PdfError> {
        self.quark_masses[quark_slot(id)?] = mass;
        Ok(())
    }

    /// Lambda_QCD for `nf` active flavors, if set.
    pub fn lambda(&self, nf: u32) -> Option<f64> {
        flavor_slot(nf).ok().and_then(|slot| self.lambdas[slot])
    }

    /// Sets Lambda_QCD for `nf` active flavors.
    pub fn set_lambda(&mut self, nf: u32, lambda: f64) -> Result<(), PdfError> {
        self.lambdas[flavor_slot(nf)?] = Some(lambda);
        Ok(())
    }

    /// Number of quarks lighter than `sqrt(q2)`.
    #[inline]
    pub fn num_flavors_q2(&self, q2: f64) -> u32 {
        self.quark_masses.iter().filter(|mass| *mass * *mass < q2).count() as u32
    }

    /// Squared quark masses in ascending order, without repeats.
    pub fn thresholds_q2(&self) -> Vec<f64> {
        let mut thresholds: Vec<f64> = self.quark_masses.iter().map(|mass| mass * mass).collect();
        thresholds.sort_by(f64::total_cmp);
        thresholds.dedup();
        thresholds
    }
}
