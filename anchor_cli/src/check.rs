//! `anchor check`: one configuration from command-line flags.

use anchor_core::{AnchorConfiguration, ConcreteCondition, ConcreteGrade, LoadDemand};

use crate::units::ForceUnit;

#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Compact product string, e.g. HUS4-H-12M-79.9 or HIT-HY200-16M-125
    pub designation: String,

    /// Hole clearance factor α_gap in (0, 1]; 1.0 without clearance, 0.5 for a standard clearance hole
    #[arg(long)]
    pub gap: f64,

    /// Member thickness h (mm)
    #[arg(long, default_value_t = 200.0)]
    pub thickness: f64,

    /// Concrete grade, e.g. C25/30
    #[arg(long, default_value = "C20/25")]
    pub grade: ConcreteGrade,

    /// Uncracked concrete (default cracked)
    #[arg(long)]
    pub uncracked: bool,

    /// Edge distance c1 in the direction of shear (mm); omit for no edge
    #[arg(long)]
    pub edge: Option<f64>,

    /// Perpendicular edge distance c2 (mm)
    #[arg(long)]
    pub edge_perp: Option<f64>,

    /// Anchors in the group: 1, 2 or 4
    #[arg(long, default_value_t = 1)]
    pub anchors: u32,

    /// Spacing of a pair, along the edge (mm)
    #[arg(long)]
    pub spacing: Option<f64>,

    /// Spacing of a 2x2 group perpendicular to the edge (mm)
    #[arg(long)]
    pub spacing_x: Option<f64>,

    /// Spacing of a 2x2 group along the edge (mm)
    #[arg(long)]
    pub spacing_y: Option<f64>,

    /// Tension eccentricity along x (mm)
    #[arg(long, default_value_t = 0.0)]
    pub ecc_x: f64,

    /// Tension eccentricity along y (mm)
    #[arg(long, default_value_t = 0.0)]
    pub ecc_y: f64,

    /// Shear eccentricity (mm)
    #[arg(long, default_value_t = 0.0)]
    pub ecc_v: f64,

    /// Angle between shear and the edge normal (degrees)
    #[arg(long, default_value_t = 0.0)]
    pub angle: f64,

    /// Apply seismic reductions
    #[arg(long)]
    pub seismic: bool,

    /// Undercut anchor (seismic table column)
    #[arg(long)]
    pub undercut: bool,

    /// Edge reinforcement present
    #[arg(long)]
    pub reinforced: bool,

    /// Applied tension, in the output unit
    #[arg(long)]
    pub tension: Option<f64>,

    /// Applied shear, in the output unit
    #[arg(long)]
    pub shear: Option<f64>,
}

impl CheckArgs {
    /// Configuration without diameter and embedment; the product string supplies those.
    pub fn configuration(&self) -> AnchorConfiguration {
        let condition = if self.uncracked {
            ConcreteCondition::Uncracked
        } else {
            ConcreteCondition::Cracked
        };
        let mut config = AnchorConfiguration::new(1.0, 1.0, self.thickness, self.grade, self.gap)
            .with_condition(condition)
            .with_tension_eccentricity(self.ecc_x, self.ecc_y)
            .with_shear_eccentricity(self.ecc_v)
            .with_shear_load_angle(self.angle)
            .with_seismic(self.seismic)
            .with_undercut(self.undercut)
            .with_edge_reinforcement(self.reinforced);

        if let Some(c1) = self.edge {
            config = config.with_edge_distance(c1, self.edge_perp);
        } else {
            config.edge_distance_perp_mm = self.edge_perp;
        }
        config.number_of_anchors = self.anchors;
        config.spacing_mm = self.spacing;
        config.spacing_x_mm = self.spacing_x;
        config.spacing_y_mm = self.spacing_y;
        config
    }

    /// Demand in kilonewtons, when either component was given.
    pub fn demand(&self, unit: ForceUnit) -> Option<LoadDemand> {
        if self.tension.is_none() && self.shear.is_none() {
            return None;
        }
        let tension = unit.to_kilonewtons(self.tension.unwrap_or(0.0));
        let shear = unit.to_kilonewtons(self.shear.unwrap_or(0.0));
        Some(LoadDemand::new(tension.0, shear.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        args: CheckArgs,
    }

    fn parse(args: &[&str]) -> CheckArgs {
        Harness::parse_from(std::iter::once("anchor").chain(args.iter().copied())).args
    }

    #[test]
    fn test_gap_is_required() {
        let result = Harness::try_parse_from(["anchor", "HUS4-H-12M-79.9"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_pair_configuration() {
        let args = parse(&[
            "HST3-10M-55",
            "--gap",
            "0.5",
            "--grade",
            "C25/30",
            "--edge",
            "80",
            "--anchors",
            "2",
            "--spacing",
            "100",
            "--uncracked",
        ]);
        let config = args.configuration();
        assert_eq!(config.concrete_grade, ConcreteGrade::C25_30);
        assert_eq!(config.edge_distance_mm, 80.0);
        assert_eq!(config.number_of_anchors, 2);
        assert_eq!(config.spacing_mm, Some(100.0));
        assert_eq!(config.condition, ConcreteCondition::Uncracked);
        assert_eq!(config.gap_factor, 0.5);
    }

    #[test]
    fn test_demand_converted_to_kilonewtons() {
        let args = parse(&["HDA-12M-60", "--gap", "1", "--tension", "2000"]);
        let demand = args.demand(ForceUnit::N).unwrap();
        assert_eq!(demand.tension_kn, 2.0);
        assert_eq!(demand.shear_kn, 0.0);
        assert!(parse(&["HDA-12M-60", "--gap", "1"]).demand(ForceUnit::Kn).is_none());
    }
}
