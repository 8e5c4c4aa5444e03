//! # Modification Factors
//!
//! Partial safety factors, cracked/uncracked k1 constants, seismic reductions
//! and the hole-clearance factor applicable to one evaluation.
//!
//! ```text
//! N_Rd,s  = α_gap × α_seis,Ns × N_Rk,s / γ_Ms
//! N_Rd,p  = ψ_c × α_gap × α_seis,Np × N_Rk,p / γ_Mp
//! N_Rd,c  = α_gap × α_seis,Nc × N0_Rk,c × (A/A0) × ψ_s,N × ψ_re,N × ψ_ec,N / γ_Mc
//! V_Rd,s  = α_gap × α_seis,Vs × V_Rk,s / γ_Ms
//! V_Rd,c  = α_gap × α_seis,Vc × V0_Rk,c × (A/A0) × ψ_s,V × ψ_h,V × ψ_α,V × ψ_ec,V × ψ_re,V / γ_Mc
//! V_Rd,cp = k × α_gap × α_seis,Vcp × N_Rk,c / γ_Mc
//! ```
//!
//! ## Seismic reductions (EOTA TR 045 Table 5.4)
//!
//! | Mode              | Single | Group |
//! |-------------------|--------|-------|
//! | Steel, tension    | 1.00   | 1.00  |
//! | Pull-out          | 1.00   | 0.85  |
//! | Concrete cone (1) | 1.00   | 0.85  |
//! | Concrete cone (2) | 0.85   | 0.75  |
//! | Steel, shear      | 1.00   | 0.85  |
//! | Concrete edge     | 1.00   | 0.85  |
//! | Pry-out (1)       | 1.00   | 0.85  |
//! | Pry-out (2)       | 0.85   | 0.75  |
//!
//! (1) undercut anchors, (2) all other anchors. Without seismic design every
//! α_seis is 1.0.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::concrete::ConcreteCondition;
use crate::configuration::{AnchorConfiguration, AnchorGroup};
use crate::errors::{CalcError, CalcResult};
use crate::settings::CoefficientTable;

/// Single anchor or group, for seismic factor selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arrangement {
    Single,
    Group,
}

impl From<&AnchorGroup> for Arrangement {
    fn from(group: &AnchorGroup) -> Self {
        if group.is_group() {
            Arrangement::Group
        } else {
            Arrangement::Single
        }
    }
}

/// Failure modes carrying their own seismic reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeismicMode {
    SteelTension,
    PullOut,
    ConcreteTension,
    SteelShear,
    ConcreteEdge,
    PryOut,
}

impl SeismicMode {
    pub const ALL: [SeismicMode; 6] = [
        SeismicMode::SteelTension,
        SeismicMode::PullOut,
        SeismicMode::ConcreteTension,
        SeismicMode::SteelShear,
        SeismicMode::ConcreteEdge,
        SeismicMode::PryOut,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            SeismicMode::SteelTension => "Steel (tension)",
            SeismicMode::PullOut => "Pull-out",
            SeismicMode::ConcreteTension => "Concrete cone",
            SeismicMode::SteelShear => "Steel (shear)",
            SeismicMode::ConcreteEdge => "Concrete edge",
            SeismicMode::PryOut => "Pry-out",
        }
    }
}

impl fmt::Display for SeismicMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Seismic reductions for one arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeismicRow {
    pub steel_tension: f64,
    pub pull_out: f64,
    pub concrete_tension_undercut: f64,
    pub concrete_tension_other: f64,
    pub steel_shear: f64,
    pub concrete_edge: f64,
    pub pry_out_undercut: f64,
    pub pry_out_other: f64,
}

impl SeismicRow {
    fn factor(&self, undercut: bool, mode: SeismicMode) -> f64 {
        match (mode, undercut) {
            (SeismicMode::SteelTension, _) => self.steel_tension,
            (SeismicMode::PullOut, _) => self.pull_out,
            (SeismicMode::ConcreteTension, true) => self.concrete_tension_undercut,
            (SeismicMode::ConcreteTension, false) => self.concrete_tension_other,
            (SeismicMode::SteelShear, _) => self.steel_shear,
            (SeismicMode::ConcreteEdge, _) => self.concrete_edge,
            (SeismicMode::PryOut, true) => self.pry_out_undercut,
            (SeismicMode::PryOut, false) => self.pry_out_other,
        }
    }

    fn values(&self) -> [(&'static str, f64); 8] {
        [
            ("steel_tension", self.steel_tension),
            ("pull_out", self.pull_out),
            ("concrete_tension_undercut", self.concrete_tension_undercut),
            ("concrete_tension_other", self.concrete_tension_other),
            ("steel_shear", self.steel_shear),
            ("concrete_edge", self.concrete_edge),
            ("pry_out_undercut", self.pry_out_undercut),
            ("pry_out_other", self.pry_out_other),
        ]
    }
}

/// Seismic reduction lookup keyed by arrangement × anchor type × mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeismicTable {
    pub single: SeismicRow,
    pub group: SeismicRow,
}

impl SeismicTable {
    /// EOTA TR 045 Table 5.4
    pub fn tr_045() -> Self {
        SeismicTable {
            single: SeismicRow {
                steel_tension: 1.0,
                pull_out: 1.0,
                concrete_tension_undercut: 1.0,
                concrete_tension_other: 0.85,
                steel_shear: 1.0,
                concrete_edge: 1.0,
                pry_out_undercut: 1.0,
                pry_out_other: 0.85,
            },
            group: SeismicRow {
                steel_tension: 1.0,
                pull_out: 0.85,
                concrete_tension_undercut: 0.85,
                concrete_tension_other: 0.75,
                steel_shear: 0.85,
                concrete_edge: 0.85,
                pry_out_undercut: 0.85,
                pry_out_other: 0.75,
            },
        }
    }

    /// α_seis for a seismic design.
    pub fn factor(&self, arrangement: Arrangement, undercut: bool, mode: SeismicMode) -> f64 {
        match arrangement {
            Arrangement::Single => self.single.factor(undercut, mode),
            Arrangement::Group => self.group.factor(undercut, mode),
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        for (row_name, row) in [("single", &self.single), ("group", &self.group)] {
            for (name, value) in row.values() {
                if !(value > 0.0 && value <= 1.0) {
                    return Err(CalcError::invalid_input(
                        format!("coefficients.seismic.{row_name}.{name}"),
                        value.to_string(),
                        "Seismic reduction must be in (0, 1]",
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Default for SeismicTable {
    fn default() -> Self {
        SeismicTable::tr_045()
    }
}

/// α_seis resolved for each mode of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeismicFactors {
    pub steel_tension: f64,
    pub pull_out: f64,
    pub concrete_tension: f64,
    pub steel_shear: f64,
    pub concrete_edge: f64,
    pub pry_out: f64,
}

impl SeismicFactors {
    /// No seismic design: every factor is 1.0
    pub fn none() -> Self {
        SeismicFactors {
            steel_tension: 1.0,
            pull_out: 1.0,
            concrete_tension: 1.0,
            steel_shear: 1.0,
            concrete_edge: 1.0,
            pry_out: 1.0,
        }
    }

    fn from_table(table: &SeismicTable, arrangement: Arrangement, undercut: bool) -> Self {
        let f = |mode| table.factor(arrangement, undercut, mode);
        SeismicFactors {
            steel_tension: f(SeismicMode::SteelTension),
            pull_out: f(SeismicMode::PullOut),
            concrete_tension: f(SeismicMode::ConcreteTension),
            steel_shear: f(SeismicMode::SteelShear),
            concrete_edge: f(SeismicMode::ConcreteEdge),
            pry_out: f(SeismicMode::PryOut),
        }
    }

    pub fn get(&self, mode: SeismicMode) -> f64 {
        match mode {
            SeismicMode::SteelTension => self.steel_tension,
            SeismicMode::PullOut => self.pull_out,
            SeismicMode::ConcreteTension => self.concrete_tension,
            SeismicMode::SteelShear => self.steel_shear,
            SeismicMode::ConcreteEdge => self.concrete_edge,
            SeismicMode::PryOut => self.pry_out,
        }
    }
}

/// Factors applicable to one evaluation. Built fresh from the configuration
/// and never shared between evaluations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModificationFactorSet {
    /// γ_Ms
    pub gamma_ms: f64,
    /// γ_Mc
    pub gamma_mc: f64,
    /// γ_Mp
    pub gamma_mp: f64,

    pub condition: ConcreteCondition,
    /// k1 for the concrete cone
    pub k1_tension: f64,
    /// k1 for concrete edge failure
    pub k1_shear: f64,

    pub arrangement: Arrangement,
    pub seismic_design: bool,
    pub undercut_anchor: bool,
    pub seismic: SeismicFactors,
    /// ψ_c applied to pull-out
    pub psi_c: f64,

    /// α_gap, carried through from the configuration
    pub alpha_gap: f64,

    /// ψ_re,V
    pub psi_re_v: f64,
}

impl ModificationFactorSet {
    /// Select every factor for a configuration.
    pub fn resolve(config: &AnchorConfiguration, group: &AnchorGroup, coefficients: &CoefficientTable) -> Self {
        let arrangement = Arrangement::from(group);
        let cracked = config.condition.is_cracked();

        let (seismic, psi_c) = if config.seismic_design {
            (
                SeismicFactors::from_table(&coefficients.seismic, arrangement, config.undercut_anchor),
                coefficients.pullout_seismic_psi_c,
            )
        } else {
            (SeismicFactors::none(), 1.0)
        };

        let factors = ModificationFactorSet {
            gamma_ms: coefficients.gamma_ms,
            gamma_mc: coefficients.gamma_mc,
            gamma_mp: coefficients.gamma_mp,
            condition: config.condition,
            k1_tension: if cracked {
                coefficients.k1_tension_cracked
            } else {
                coefficients.k1_tension_uncracked
            },
            k1_shear: if cracked {
                coefficients.k1_shear_cracked
            } else {
                coefficients.k1_shear_uncracked
            },
            arrangement,
            seismic_design: config.seismic_design,
            undercut_anchor: config.undercut_anchor,
            seismic,
            psi_c,
            alpha_gap: config.gap_factor,
            psi_re_v: if config.edge_reinforcement {
                coefficients.edge_reinforcement_factor
            } else {
                1.0
            },
        };
        tracing::debug!(?factors, "modification factors resolved");
        factors
    }

    /// α_seis for one mode
    pub fn alpha_seis(&self, mode: SeismicMode) -> f64 {
        self.seismic.get(mode)
    }

    /// Generate a formatted summary of the factors.
    pub fn format_report(&self) -> String {
        let mut report = format!(
            "Modification Factors ({}, {}{})\n\
             ================================================\n\
             γ_Ms (steel)            = {:.2}\n\
             γ_Mc (concrete)         = {:.2}\n\
             γ_Mp (pull-out)         = {:.2}\n\
             k1   (tension)          = {:.2}\n\
             k1   (shear)            = {:.2}\n\
             α_gap                   = {:.2}\n\
             ψ_re,V                  = {:.2}\n\
             ψ_c  (pull-out)         = {:.2}\n\
             ------------------------------------------------\n",
            self.condition,
            match self.arrangement {
                Arrangement::Single => "single anchor",
                Arrangement::Group => "group",
            },
            if self.seismic_design { ", seismic" } else { "" },
            self.gamma_ms,
            self.gamma_mc,
            self.gamma_mp,
            self.k1_tension,
            self.k1_shear,
            self.alpha_gap,
            self.psi_re_v,
            self.psi_c,
        );
        for mode in SeismicMode::ALL {
            report.push_str(&format!("α_seis {:<16} = {:.2}\n", mode.display_name(), self.alpha_seis(mode)));
        }
        report
    }
}
