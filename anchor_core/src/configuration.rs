//! # Anchor Configuration
//!
//! The complete input for one capacity evaluation, plus the optional applied
//! demand used by the interaction check.
//!
//! ## Axes
//!
//! ```text
//!          edge (c1)
//!   ─────────────────────────  ← y runs along this edge
//!        │ c1
//!        ●───s_y───●           ← pair spacing also runs along y
//!        │
//!       s_x                    ← x points away from the edge
//!        │
//!        ●─────────●
//! ```
//!
//! `edge_distance_mm` (c1) is the distance to the edge loaded in shear.
//! `edge_distance_perp_mm` (c2) is the distance to the edge perpendicular to
//! it; `None` means no such edge. An edge distance of
//! [`UNBOUNDED_EDGE_MM`](crate::geometry::UNBOUNDED_EDGE_MM) or more is
//! treated as an infinite slab.
//!
//! ## Example
//!
//! ```rust
//! use anchor_core::concrete::ConcreteGrade;
//! use anchor_core::configuration::AnchorConfiguration;
//!
//! let config = AnchorConfiguration::new(12.0, 79.9, 200.0, ConcreteGrade::C20_25, 1.0)
//!     .with_edge_distance(100.0, None)
//!     .with_pair(150.0);
//! config.validate().unwrap();
//! assert_eq!(config.group().unwrap().count(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::concrete::{ConcreteCondition, ConcreteGrade};
use crate::errors::{CalcError, CalcResult, DesignWarning};
use crate::geometry::UNBOUNDED_EDGE_MM;
use crate::settings::CoefficientTable;

fn default_anchor_count() -> u32 {
    1
}

fn default_edge_distance() -> f64 {
    UNBOUNDED_EDGE_MM
}

/// Input parameters for one anchor capacity evaluation.
///
/// `gap_factor` has no serde default: a standard clearance hole roughly
/// halves steel shear capacity, so it must always be stated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorConfiguration {
    /// Nominal shaft diameter d (mm)
    pub diameter_mm: f64,

    /// Effective embedment depth h_ef (mm)
    pub embedment_depth_mm: f64,

    /// Edge distance c1 (mm), in the direction of shear
    #[serde(default = "default_edge_distance")]
    pub edge_distance_mm: f64,

    /// Perpendicular edge distance c2 (mm)
    #[serde(default)]
    pub edge_distance_perp_mm: Option<f64>,

    /// Member thickness h (mm)
    pub member_thickness_mm: f64,

    /// Concrete strength class
    pub concrete_grade: ConcreteGrade,

    #[serde(default)]
    pub condition: ConcreteCondition,

    /// Anchors in the group: 1, 2 or 4
    #[serde(default = "default_anchor_count")]
    pub number_of_anchors: u32,

    /// Spacing for a pair (mm)
    #[serde(default)]
    pub spacing_mm: Option<f64>,

    /// Spacing perpendicular to the edge for a group of four (mm)
    #[serde(default)]
    pub spacing_x_mm: Option<f64>,

    /// Spacing parallel to the edge for a group of four (mm)
    #[serde(default)]
    pub spacing_y_mm: Option<f64>,

    /// Tension load eccentricity along x (mm)
    #[serde(default)]
    pub tension_eccentricity_x_mm: f64,

    /// Tension load eccentricity along y (mm)
    #[serde(default)]
    pub tension_eccentricity_y_mm: f64,

    /// Shear load eccentricity (mm)
    #[serde(default)]
    pub shear_eccentricity_mm: f64,

    /// Hole clearance factor α_gap (1.0 for no gap, 0.5 for standard clearance holes)
    pub gap_factor: f64,

    #[serde(default)]
    pub seismic_design: bool,

    #[serde(default)]
    pub undercut_anchor: bool,

    /// Edge reinforcement with closely spaced stirrups
    #[serde(default)]
    pub edge_reinforcement: bool,

    /// Angle between the shear load and the normal to the edge (degrees)
    #[serde(default)]
    pub shear_load_angle_deg: f64,
}

/// Resolved anchor arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "arrangement", rename_all = "snake_case")]
pub enum AnchorGroup {
    Single,
    /// Two anchors spaced along the edge
    Pair { spacing_mm: f64 },
    /// Four anchors on a rectangular grid
    Quad { spacing_x_mm: f64, spacing_y_mm: f64 },
}

impl AnchorGroup {
    pub fn count(&self) -> u32 {
        match self {
            AnchorGroup::Single => 1,
            AnchorGroup::Pair { .. } => 2,
            AnchorGroup::Quad { .. } => 4,
        }
    }

    pub fn is_group(&self) -> bool {
        !matches!(self, AnchorGroup::Single)
    }

    /// Spacing perpendicular to the edge (0 when there is none)
    pub fn spacing_x_mm(&self) -> f64 {
        match self {
            AnchorGroup::Quad { spacing_x_mm, .. } => *spacing_x_mm,
            _ => 0.0,
        }
    }

    /// Spacing parallel to the edge (0 when there is none)
    pub fn spacing_y_mm(&self) -> f64 {
        match self {
            AnchorGroup::Single => 0.0,
            AnchorGroup::Pair { spacing_mm } => *spacing_mm,
            AnchorGroup::Quad { spacing_y_mm, .. } => *spacing_y_mm,
        }
    }

    /// Largest centre-to-centre spacing in the group
    pub fn max_spacing_mm(&self) -> f64 {
        self.spacing_x_mm().max(self.spacing_y_mm())
    }
}

impl AnchorConfiguration {
    /// Single anchor in an unbounded, cracked slab.
    pub fn new(
        diameter_mm: f64,
        embedment_depth_mm: f64,
        member_thickness_mm: f64,
        concrete_grade: ConcreteGrade,
        gap_factor: f64,
    ) -> Self {
        AnchorConfiguration {
            diameter_mm,
            embedment_depth_mm,
            edge_distance_mm: UNBOUNDED_EDGE_MM,
            edge_distance_perp_mm: None,
            member_thickness_mm,
            concrete_grade,
            condition: ConcreteCondition::Cracked,
            number_of_anchors: 1,
            spacing_mm: None,
            spacing_x_mm: None,
            spacing_y_mm: None,
            tension_eccentricity_x_mm: 0.0,
            tension_eccentricity_y_mm: 0.0,
            shear_eccentricity_mm: 0.0,
            gap_factor,
            seismic_design: false,
            undercut_anchor: false,
            edge_reinforcement: false,
            shear_load_angle_deg: 0.0,
        }
    }

    pub fn with_edge_distance(mut self, c1_mm: f64, c2_mm: Option<f64>) -> Self {
        self.edge_distance_mm = c1_mm;
        self.edge_distance_perp_mm = c2_mm;
        self
    }

    pub fn with_condition(mut self, condition: ConcreteCondition) -> Self {
        self.condition = condition;
        self
    }

    pub fn with_pair(mut self, spacing_mm: f64) -> Self {
        self.number_of_anchors = 2;
        self.spacing_mm = Some(spacing_mm);
        self
    }

    pub fn with_quad(mut self, spacing_x_mm: f64, spacing_y_mm: f64) -> Self {
        self.number_of_anchors = 4;
        self.spacing_x_mm = Some(spacing_x_mm);
        self.spacing_y_mm = Some(spacing_y_mm);
        self
    }

    pub fn with_tension_eccentricity(mut self, ex_mm: f64, ey_mm: f64) -> Self {
        self.tension_eccentricity_x_mm = ex_mm;
        self.tension_eccentricity_y_mm = ey_mm;
        self
    }

    pub fn with_shear_eccentricity(mut self, ev_mm: f64) -> Self {
        self.shear_eccentricity_mm = ev_mm;
        self
    }

    pub fn with_seismic(mut self, seismic_design: bool) -> Self {
        self.seismic_design = seismic_design;
        self
    }

    pub fn with_undercut(mut self, undercut_anchor: bool) -> Self {
        self.undercut_anchor = undercut_anchor;
        self
    }

    pub fn with_edge_reinforcement(mut self, edge_reinforcement: bool) -> Self {
        self.edge_reinforcement = edge_reinforcement;
        self
    }

    pub fn with_shear_load_angle(mut self, angle_deg: f64) -> Self {
        self.shear_load_angle_deg = angle_deg;
        self
    }

    /// Cylinder strength fck (MPa)
    pub fn fck_mpa(&self) -> f64 {
        self.concrete_grade.cylinder_strength_mpa()
    }

    /// Smallest edge distance, or `None` when both edges are unbounded
    pub fn min_edge_distance_mm(&self) -> Option<f64> {
        let c2 = self.edge_distance_perp_mm.unwrap_or(f64::INFINITY);
        let c_min = self.edge_distance_mm.min(c2);
        (c_min < UNBOUNDED_EDGE_MM).then_some(c_min)
    }

    /// Resolve the anchor arrangement, failing on a bad count, missing spacing,
    /// or spacing given for a single anchor.
    pub fn group(&self) -> CalcResult<AnchorGroup> {
        match self.number_of_anchors {
            1 => {
                let spacing = [
                    ("spacing_mm", self.spacing_mm),
                    ("spacing_x_mm", self.spacing_x_mm),
                    ("spacing_y_mm", self.spacing_y_mm),
                ];
                if let Some((field, Some(value))) = spacing.into_iter().find(|(_, v)| v.is_some()) {
                    return Err(CalcError::invalid_input(
                        field,
                        value.to_string(),
                        "Spacing given for a single anchor; set number_of_anchors to 2 or 4",
                    ));
                }
                Ok(AnchorGroup::Single)
            }
            2 => {
                let spacing_mm = require_spacing("spacing_mm", self.spacing_mm)?;
                Ok(AnchorGroup::Pair { spacing_mm })
            }
            4 => {
                let spacing_x_mm = require_spacing("spacing_x_mm", self.spacing_x_mm)?;
                let spacing_y_mm = require_spacing("spacing_y_mm", self.spacing_y_mm)?;
                Ok(AnchorGroup::Quad {
                    spacing_x_mm,
                    spacing_y_mm,
                })
            }
            other => Err(CalcError::invalid_input(
                "number_of_anchors",
                other.to_string(),
                "Anchor count must be 1, 2 or 4",
            )),
        }
    }

    /// Validate geometry, group layout and factors.
    pub fn validate(&self) -> CalcResult<()> {
        let positive = [
            ("diameter_mm", self.diameter_mm),
            ("embedment_depth_mm", self.embedment_depth_mm),
            ("edge_distance_mm", self.edge_distance_mm),
            ("member_thickness_mm", self.member_thickness_mm),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(CalcError::invalid_input(field, value.to_string(), "Must be positive"));
            }
        }
        if let Some(c2) = self.edge_distance_perp_mm {
            if !(c2 > 0.0) {
                return Err(CalcError::invalid_input(
                    "edge_distance_perp_mm",
                    c2.to_string(),
                    "Must be positive (omit for no perpendicular edge)",
                ));
            }
        }

        let finite = [
            ("tension_eccentricity_x_mm", self.tension_eccentricity_x_mm),
            ("tension_eccentricity_y_mm", self.tension_eccentricity_y_mm),
            ("shear_eccentricity_mm", self.shear_eccentricity_mm),
            ("shear_load_angle_deg", self.shear_load_angle_deg),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(CalcError::invalid_input(field, value.to_string(), "Must be a finite number"));
            }
        }

        if !(self.gap_factor > 0.0 && self.gap_factor <= 1.0) {
            return Err(CalcError::invalid_input(
                "gap_factor",
                self.gap_factor.to_string(),
                "Gap factor must be in (0, 1]",
            ));
        }

        self.group()?;
        Ok(())
    }

    /// Findings that do not stop the evaluation.
    pub fn range_warnings(&self, coefficients: &CoefficientTable) -> Vec<DesignWarning> {
        let fck = self.fck_mpa();
        if fck < coefficients.fck_min_mpa || fck > coefficients.fck_max_mpa {
            vec![DesignWarning::ConcreteStrengthOutOfRange {
                fck_mpa: fck,
                min_mpa: coefficients.fck_min_mpa,
                max_mpa: coefficients.fck_max_mpa,
            }]
        } else {
            Vec::new()
        }
    }
}

fn require_spacing(field: &str, value: Option<f64>) -> CalcResult<f64> {
    let spacing = value.ok_or_else(|| CalcError::missing_field(field))?;
    if !(spacing >= 0.0) || spacing.is_infinite() {
        return Err(CalcError::invalid_input(
            field,
            spacing.to_string(),
            "Spacing must be a non-negative number",
        ));
    }
    Ok(spacing)
}

/// Applied design actions on the anchor or group (kN).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct LoadDemand {
    #[serde(default)]
    pub tension_kn: f64,
    #[serde(default)]
    pub shear_kn: f64,
}

impl LoadDemand {
    pub fn new(tension_kn: f64, shear_kn: f64) -> Self {
        LoadDemand { tension_kn, shear_kn }
    }

    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [("tension_kn", self.tension_kn), ("shear_kn", self.shear_kn)] {
            if !(value >= 0.0) || value.is_infinite() {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Applied demand must be a non-negative number",
                ));
            }
        }
        Ok(())
    }
}
