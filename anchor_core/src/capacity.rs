//! # Capacity Resolver and Interaction Check
//!
//! The governing capacity in each direction is the minimum over every
//! applicable mode. Ties go to the first mode in evaluation order. Modes that
//! do not apply (no edge for concrete edge failure, no headed anchor for
//! blowout) are reported but never govern.
//!
//! The interaction check compares β_N + β_V against an explicit limit:
//!
//! ```text
//! β_N = N_Ed / N_Rd      β_V = V_Ed / V_Rd      β_N + β_V ≤ limit
//! ```

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogMatch;
use crate::configuration::{AnchorGroup, LoadDemand};
use crate::errors::{CalcResult, DesignWarning};
use crate::factors::ModificationFactorSet;
use crate::failure_modes::{FailureMode, LoadDirection, ModeResult};
use crate::geometry::{ConeGeometry, EdgeGeometry};
use crate::settings::InteractionLimit;

/// Minimum over the modes of one load direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoverningCapacity {
    pub direction: LoadDirection,
    /// Governing design resistance (kN); `None` only if no mode applies
    pub design_kn: Option<f64>,
    pub governing_mode: Option<FailureMode>,
    /// Every mode of this direction, in evaluation order
    pub modes: Vec<ModeResult>,
}

impl GoverningCapacity {
    pub fn mode(&self, mode: FailureMode) -> Option<&ModeResult> {
        self.modes.iter().find(|m| m.mode == mode)
    }
}

/// Pick the smallest applicable design resistance, first mode winning ties.
pub fn resolve_governing(direction: LoadDirection, modes: Vec<ModeResult>) -> GoverningCapacity {
    let governing = modes
        .iter()
        .filter_map(|m| m.design_kn.map(|kn| (m.mode, kn)))
        .fold(None, |best: Option<(FailureMode, f64)>, (mode, kn)| match best {
            Some((_, best_kn)) if best_kn <= kn => best,
            _ => Some((mode, kn)),
        });

    GoverningCapacity {
        direction,
        design_kn: governing.map(|(_, kn)| kn),
        governing_mode: governing.map(|(mode, _)| mode),
        modes,
    }
}

/// Combined tension and shear utilization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionCheck {
    pub demand: LoadDemand,
    /// β_N = N_Ed / N_Rd
    pub beta_n: f64,
    /// β_V = V_Ed / V_Rd
    pub beta_v: f64,
    /// β_N + β_V
    pub utilization: f64,
    pub limit: InteractionLimit,
    pub passes: bool,
}

/// Demand over capacity; zero demand contributes nothing, an unbounded
/// capacity contributes nothing, and positive demand on zero capacity fails.
fn utilization_ratio(demand_kn: f64, capacity_kn: Option<f64>) -> f64 {
    if demand_kn == 0.0 {
        return 0.0;
    }
    match capacity_kn {
        None => 0.0,
        Some(capacity) if capacity.is_infinite() => 0.0,
        Some(capacity) if capacity <= 0.0 => f64::INFINITY,
        Some(capacity) => demand_kn / capacity,
    }
}

/// Check β_N + β_V against `limit`.
pub fn check_interaction(
    demand: LoadDemand,
    tension_capacity_kn: Option<f64>,
    shear_capacity_kn: Option<f64>,
    limit: InteractionLimit,
) -> CalcResult<InteractionCheck> {
    demand.validate()?;
    let beta_n = utilization_ratio(demand.tension_kn, tension_capacity_kn);
    let beta_v = utilization_ratio(demand.shear_kn, shear_capacity_kn);
    let utilization = beta_n + beta_v;

    Ok(InteractionCheck {
        demand,
        beta_n,
        beta_v,
        utilization,
        limit,
        passes: utilization <= limit.value(),
    })
}

/// Complete outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityResult {
    /// Catalog row the characteristic values came from
    pub catalog: CatalogMatch,
    pub group: AnchorGroup,
    /// Embedment depth used by the concrete formulas (mm)
    pub effective_embedment_mm: f64,
    pub factors: ModificationFactorSet,
    pub cone: ConeGeometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge: Option<EdgeGeometry>,
    pub tension: GoverningCapacity,
    pub shear: GoverningCapacity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction: Option<InteractionCheck>,
    #[serde(default)]
    pub warnings: Vec<DesignWarning>,
}

impl CapacityResult {
    /// Governing design tension resistance (kN)
    pub fn tension_capacity_kn(&self) -> Option<f64> {
        self.tension.design_kn
    }

    /// Governing design shear resistance (kN)
    pub fn shear_capacity_kn(&self) -> Option<f64> {
        self.shear.design_kn
    }

    /// Any mode, tension or shear
    pub fn mode(&self, mode: FailureMode) -> Option<&ModeResult> {
        match mode.direction() {
            LoadDirection::Tension => self.tension.mode(mode),
            LoadDirection::Shear => self.shear.mode(mode),
        }
    }

    /// Interaction verdict; `None` when no demand was supplied
    pub fn passes(&self) -> Option<bool> {
        self.interaction.map(|check| check.passes)
    }

    /// Generate a formatted plain-text report.
    pub fn format_report(&self) -> String {
        let m = &self.catalog;
        let mut report = String::new();
        let _ = writeln!(
            report,
            "{} M{} h_ef = {} mm, {} {} ({})",
            m.product,
            m.diameter_mm,
            m.resolved_embedment_mm,
            m.grade,
            self.factors.condition.display_name(),
            m.approval,
        );
        let _ = writeln!(report, "================================================");

        for capacity in [&self.tension, &self.shear] {
            let _ = writeln!(report, "{}", capacity.direction);
            for mode in &capacity.modes {
                let marker = if capacity.governing_mode == Some(mode.mode) { "*" } else { " " };
                match mode.design_kn {
                    Some(kn) => {
                        let _ = writeln!(
                            report,
                            " {marker} {:<24} {:>9.2} kN   {}",
                            mode.mode.display_name(),
                            kn,
                            mode.mode.reference()
                        );
                    }
                    None => {
                        let _ = writeln!(
                            report,
                            "   {:<24} {:>12}   {}",
                            mode.mode.display_name(),
                            "n/a",
                            mode.note.as_deref().unwrap_or_default()
                        );
                    }
                }
            }
            match (capacity.design_kn, capacity.governing_mode) {
                (Some(kn), Some(mode)) => {
                    let _ = writeln!(report, "   Governing: {kn:.2} kN ({mode})");
                }
                _ => {
                    let _ = writeln!(report, "   Governing: unbounded");
                }
            }
        }

        if let Some(check) = &self.interaction {
            let _ = writeln!(
                report,
                "Interaction: {:.3} + {:.3} = {:.3} <= {:.2} [{}]",
                check.beta_n,
                check.beta_v,
                check.utilization,
                check.limit.value(),
                if check.passes { "PASS" } else { "FAIL" }
            );
        }

        for warning in &self.warnings {
            let _ = writeln!(report, "Warning [{}]: {}", warning.code(), warning);
        }
        report
    }
}
