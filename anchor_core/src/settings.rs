//! # Design Settings
//!
//! Coefficient tables and evaluation policy. Every field has a default, so a
//! settings file only needs to name what it overrides:
//!
//! ```json
//! { "interaction_limit": "nzs3101", "embedment_tolerance": 0.10 }
//! ```
//!
//! The coefficient table is versioned by its `standard` label. The canonical
//! preset is [`CoefficientTable::etag_001`] (ETAG 001 Annex C with the
//! EOTA TR 045 seismic reductions).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::factors::SeismicTable;

/// Default relative tolerance for substituting a tabulated embedment depth
pub const DEFAULT_EMBEDMENT_TOLERANCE: f64 = 0.15;

/// Numeric constants entering the failure-mode formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoefficientTable {
    /// Standard and revision these values belong to
    pub standard: String,

    /// Partial safety factor, steel failure (γ_Ms)
    pub gamma_ms: f64,
    /// Partial safety factor, concrete failure (γ_Mc)
    pub gamma_mc: f64,
    /// Partial safety factor, pull-out failure (γ_Mp)
    pub gamma_mp: f64,

    /// k1 for concrete cone, cracked concrete
    pub k1_tension_cracked: f64,
    /// k1 for concrete cone, uncracked concrete
    pub k1_tension_uncracked: f64,
    /// k1 for concrete edge, cracked concrete
    pub k1_shear_cracked: f64,
    /// k1 for concrete edge, uncracked concrete
    pub k1_shear_uncracked: f64,

    /// Embedment depth at which the pry-out factor steps up (mm)
    pub pryout_threshold_mm: f64,
    /// Pry-out factor k below the threshold
    pub pryout_k_shallow: f64,
    /// Pry-out factor k at or above the threshold
    pub pryout_k_deep: f64,

    /// ψ_re,V with edge reinforcement and closely spaced stirrups
    pub edge_reinforcement_factor: f64,
    /// Upper bound on l_f as a multiple of the anchor diameter
    pub max_lf_over_d: f64,

    /// Side-face blowout coefficient (N, mm, MPa)
    pub blowout_coefficient: f64,
    /// Blowout applies when the edge distance is below this multiple of h_ef
    pub blowout_edge_ratio: f64,

    /// ψ_c for pull-out under seismic action
    pub pullout_seismic_psi_c: f64,

    /// Validated concrete strength range (cylinder, MPa)
    pub fck_min_mpa: f64,
    pub fck_max_mpa: f64,
    /// fck,cyl / fck,cube
    pub cylinder_to_cube_ratio: f64,

    /// Seismic reduction factors α_seis
    pub seismic: SeismicTable,
}

impl CoefficientTable {
    /// ETAG 001 Annex C (2013) with EOTA TR 045 Table 5.4
    pub fn etag_001() -> Self {
        CoefficientTable {
            standard: "ETAG 001 Annex C / EOTA TR 045".to_string(),
            gamma_ms: 1.5,
            gamma_mc: 1.5,
            gamma_mp: 1.5,
            k1_tension_cracked: 7.2,
            k1_tension_uncracked: 8.9,
            k1_shear_cracked: 1.7,
            k1_shear_uncracked: 2.4,
            pryout_threshold_mm: 60.0,
            pryout_k_shallow: 1.0,
            pryout_k_deep: 2.0,
            edge_reinforcement_factor: 1.4,
            max_lf_over_d: 8.0,
            blowout_coefficient: 13.3,
            blowout_edge_ratio: 0.4,
            pullout_seismic_psi_c: 1.0,
            fck_min_mpa: 20.0,
            fck_max_mpa: 50.0,
            cylinder_to_cube_ratio: 0.8,
            seismic: SeismicTable::tr_045(),
        }
    }

    /// Cube strength used by the concrete formulas
    pub fn cube_strength(&self, fck_mpa: f64) -> f64 {
        fck_mpa / self.cylinder_to_cube_ratio
    }

    /// Check that every divisor and factor is usable.
    pub fn validate(&self) -> CalcResult<()> {
        let positive = [
            ("gamma_ms", self.gamma_ms),
            ("gamma_mc", self.gamma_mc),
            ("gamma_mp", self.gamma_mp),
            ("k1_tension_cracked", self.k1_tension_cracked),
            ("k1_tension_uncracked", self.k1_tension_uncracked),
            ("k1_shear_cracked", self.k1_shear_cracked),
            ("k1_shear_uncracked", self.k1_shear_uncracked),
            ("pryout_k_shallow", self.pryout_k_shallow),
            ("pryout_k_deep", self.pryout_k_deep),
            ("edge_reinforcement_factor", self.edge_reinforcement_factor),
            ("max_lf_over_d", self.max_lf_over_d),
            ("blowout_coefficient", self.blowout_coefficient),
            ("cylinder_to_cube_ratio", self.cylinder_to_cube_ratio),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(CalcError::invalid_input(
                    format!("coefficients.{field}"),
                    value.to_string(),
                    "Coefficient must be a positive number",
                ));
            }
        }
        if self.fck_min_mpa > self.fck_max_mpa {
            return Err(CalcError::invalid_input(
                "coefficients.fck_min_mpa",
                self.fck_min_mpa.to_string(),
                "Validated range minimum exceeds maximum",
            ));
        }
        self.seismic.validate()
    }
}

impl Default for CoefficientTable {
    fn default() -> Self {
        CoefficientTable::etag_001()
    }
}

/// Limit on the combined utilization N/N_Rd + V/V_Rd.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InteractionLimit {
    /// Linear interaction, β_N + β_V ≤ 1.0
    #[default]
    #[serde(rename = "etag001")]
    Etag001,
    /// NZS 3101 chapter 17 trilinear bound, β_N + β_V ≤ 1.2
    #[serde(rename = "nzs3101")]
    Nzs3101,
    /// Project-specific limit
    Custom(f64),
}

impl InteractionLimit {
    pub fn value(&self) -> f64 {
        match self {
            InteractionLimit::Etag001 => 1.0,
            InteractionLimit::Nzs3101 => 1.2,
            InteractionLimit::Custom(limit) => *limit,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            InteractionLimit::Etag001 => "ETAG 001 (1.0)",
            InteractionLimit::Nzs3101 => "NZS 3101 (1.2)",
            InteractionLimit::Custom(_) => "Custom",
        }
    }
}

impl fmt::Display for InteractionLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionLimit::Custom(limit) => write!(f, "Custom ({limit})"),
            other => write!(f, "{}", other.display_name()),
        }
    }
}

/// How the catalog treats an embedment depth that is not tabulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmbedmentPolicy {
    /// Use the nearest tabulated depth within tolerance
    #[default]
    Nearest,
    /// Interpolate between tabulated depths and concrete strengths
    Interpolate,
}

/// Evaluation settings shared by any number of checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSettings {
    pub coefficients: CoefficientTable,
    pub interaction_limit: InteractionLimit,
    /// Allowed |requested - tabulated| / tabulated for embedment substitution
    pub embedment_tolerance: f64,
    pub embedment_policy: EmbedmentPolicy,
}

impl Default for DesignSettings {
    fn default() -> Self {
        DesignSettings {
            coefficients: CoefficientTable::etag_001(),
            interaction_limit: InteractionLimit::Etag001,
            embedment_tolerance: DEFAULT_EMBEDMENT_TOLERANCE,
            embedment_policy: EmbedmentPolicy::Nearest,
        }
    }
}

impl DesignSettings {
    pub fn with_interaction_limit(mut self, limit: InteractionLimit) -> Self {
        self.interaction_limit = limit;
        self
    }

    pub fn with_embedment_policy(mut self, policy: EmbedmentPolicy) -> Self {
        self.embedment_policy = policy;
        self
    }

    pub fn with_embedment_tolerance(mut self, tolerance: f64) -> Self {
        self.embedment_tolerance = tolerance;
        self
    }

    pub fn validate(&self) -> CalcResult<()> {
        if !(self.embedment_tolerance.is_finite() && self.embedment_tolerance >= 0.0) {
            return Err(CalcError::invalid_input(
                "embedment_tolerance",
                self.embedment_tolerance.to_string(),
                "Tolerance must be a non-negative fraction",
            ));
        }
        let limit = self.interaction_limit.value();
        if !(limit.is_finite() && limit > 0.0) {
            return Err(CalcError::invalid_input(
                "interaction_limit",
                limit.to_string(),
                "Interaction limit must be positive",
            ));
        }
        self.coefficients.validate()
    }
}
