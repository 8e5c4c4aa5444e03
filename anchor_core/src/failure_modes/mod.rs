//! # Failure-Mode Calculators
//!
//! One routine per physical failure mode. Each returns a [`ModeResult`]
//! holding the design resistance of the anchor or group in kN together with
//! the intermediate factors, so a reviewer can retrace the number.
//!
//! | Mode              | Direction | Clause (ETAG 001 Annex C) |
//! |-------------------|-----------|---------------------------|
//! | Steel             | Tension   | 5.2.2.2                   |
//! | Pull-out          | Tension   | 5.2.2.3                   |
//! | Concrete cone     | Tension   | 5.2.2.4                   |
//! | Side-face blowout | Tension   | NZS 3101 17.5.7.4         |
//! | Steel             | Shear     | 5.2.3.2                   |
//! | Pry-out           | Shear     | 5.2.3.3                   |
//! | Concrete edge     | Shear     | 5.2.3.4                   |
//!
//! Steel and pull-out values in the catalog are per anchor; their group
//! resistance is the per-anchor value times the anchor count. The concrete
//! modes already describe the whole group through the projected areas.

pub mod shear;
pub mod tension;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::CharacteristicValues;
use crate::configuration::{AnchorConfiguration, AnchorGroup};
use crate::factors::ModificationFactorSet;
use crate::settings::CoefficientTable;

pub use shear::{concrete_edge, pryout_factor, pry_out, steel_shear};
pub use tension::{concrete_cone, pull_out, side_face_blowout, steel_tension};

/// Standard clause references for each check.
pub mod etag_ref {
    /// Steel failure, tension
    pub const STEEL_TENSION: &str = "ETAG 001 Annex C 5.2.2.2";
    /// Pull-out failure
    pub const PULL_OUT: &str = "ETAG 001 Annex C 5.2.2.3";
    /// Concrete cone failure
    pub const CONCRETE_CONE: &str = "ETAG 001 Annex C 5.2.2.4";
    /// Side-face blowout of headed anchors
    pub const SIDE_FACE_BLOWOUT: &str = "NZS 3101 17.5.7.4";
    /// Steel failure, shear without lever arm
    pub const STEEL_SHEAR: &str = "ETAG 001 Annex C 5.2.3.2";
    /// Concrete pry-out failure
    pub const PRY_OUT: &str = "ETAG 001 Annex C 5.2.3.3";
    /// Concrete edge failure
    pub const CONCRETE_EDGE: &str = "ETAG 001 Annex C 5.2.3.4";
    /// Combined tension and shear
    pub const INTERACTION: &str = "ETAG 001 Annex C 5.2.4 / TR 045 Eq. 5.9";
    /// Seismic reductions
    pub const SEISMIC: &str = "EOTA TR 045 Table 5.4";
}

/// Direction of loading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadDirection {
    Tension,
    Shear,
}

impl fmt::Display for LoadDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadDirection::Tension => write!(f, "Tension"),
            LoadDirection::Shear => write!(f, "Shear"),
        }
    }
}

/// Physical failure modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    SteelTension,
    PullOut,
    ConcreteCone,
    SideFaceBlowout,
    SteelShear,
    ConcreteEdge,
    PryOut,
}

impl FailureMode {
    pub const ALL: [FailureMode; 7] = [
        FailureMode::SteelTension,
        FailureMode::PullOut,
        FailureMode::ConcreteCone,
        FailureMode::SideFaceBlowout,
        FailureMode::SteelShear,
        FailureMode::ConcreteEdge,
        FailureMode::PryOut,
    ];

    pub fn direction(&self) -> LoadDirection {
        match self {
            FailureMode::SteelTension
            | FailureMode::PullOut
            | FailureMode::ConcreteCone
            | FailureMode::SideFaceBlowout => LoadDirection::Tension,
            FailureMode::SteelShear | FailureMode::ConcreteEdge | FailureMode::PryOut => LoadDirection::Shear,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FailureMode::SteelTension => "Steel failure (tension)",
            FailureMode::PullOut => "Pull-out",
            FailureMode::ConcreteCone => "Concrete cone",
            FailureMode::SideFaceBlowout => "Side-face blowout",
            FailureMode::SteelShear => "Steel failure (shear)",
            FailureMode::ConcreteEdge => "Concrete edge",
            FailureMode::PryOut => "Pry-out",
        }
    }

    pub fn reference(&self) -> &'static str {
        match self {
            FailureMode::SteelTension => etag_ref::STEEL_TENSION,
            FailureMode::PullOut => etag_ref::PULL_OUT,
            FailureMode::ConcreteCone => etag_ref::CONCRETE_CONE,
            FailureMode::SideFaceBlowout => etag_ref::SIDE_FACE_BLOWOUT,
            FailureMode::SteelShear => etag_ref::STEEL_SHEAR,
            FailureMode::ConcreteEdge => etag_ref::CONCRETE_EDGE,
            FailureMode::PryOut => etag_ref::PRY_OUT,
        }
    }
}

impl fmt::Display for FailureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A named intermediate value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditFactor {
    pub symbol: String,
    pub value: f64,
}

/// Outcome of one failure-mode calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeResult {
    pub mode: FailureMode,
    /// Characteristic resistance of the anchor or group, after modification factors (kN)
    pub characteristic_kn: Option<f64>,
    /// Design resistance of the anchor or group (kN); `None` when the mode
    /// does not apply and so never limits capacity
    pub design_kn: Option<f64>,
    /// Design resistance of one anchor, for modes tabulated per anchor (kN)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_anchor_design_kn: Option<f64>,
    /// Intermediate factors in evaluation order
    pub factors: Vec<AuditFactor>,
    /// Why the mode was skipped, if it was
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ModeResult {
    pub(crate) fn computed(mode: FailureMode, characteristic_kn: f64, design_kn: f64) -> Self {
        ModeResult {
            mode,
            characteristic_kn: Some(characteristic_kn),
            design_kn: Some(design_kn),
            per_anchor_design_kn: None,
            factors: Vec::new(),
            note: None,
        }
    }

    pub(crate) fn skipped(mode: FailureMode, reason: impl Into<String>) -> Self {
        ModeResult {
            mode,
            characteristic_kn: None,
            design_kn: None,
            per_anchor_design_kn: None,
            factors: Vec::new(),
            note: Some(reason.into()),
        }
    }

    pub(crate) fn with_factor(mut self, symbol: &str, value: f64) -> Self {
        self.factors.push(AuditFactor {
            symbol: symbol.to_string(),
            value,
        });
        self
    }

    pub(crate) fn with_per_anchor(mut self, design_kn: f64) -> Self {
        self.per_anchor_design_kn = Some(design_kn);
        self
    }

    pub fn is_applicable(&self) -> bool {
        self.design_kn.is_some()
    }

    /// Look up an intermediate factor by symbol
    pub fn factor(&self, symbol: &str) -> Option<f64> {
        self.factors.iter().find(|f| f.symbol == symbol).map(|f| f.value)
    }
}

/// Everything a calculator reads.
#[derive(Debug, Clone, Copy)]
pub struct ModeInputs<'a> {
    pub config: &'a AnchorConfiguration,
    pub group: AnchorGroup,
    pub values: &'a CharacteristicValues,
    pub factors: &'a ModificationFactorSet,
    pub coefficients: &'a CoefficientTable,
    /// Effective embedment depth used by the concrete formulas (mm)
    pub embedment_mm: f64,
}

impl ModeInputs<'_> {
    pub(crate) fn anchor_count(&self) -> f64 {
        f64::from(self.group.count())
    }

    /// Cube strength for the concrete formulas (MPa)
    pub(crate) fn cube_strength_mpa(&self) -> f64 {
        self.coefficients.cube_strength(self.config.fck_mpa())
    }
}
