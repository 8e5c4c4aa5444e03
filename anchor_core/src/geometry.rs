//! # Geometry Resolver
//!
//! Projected failure areas and the geometry-driven ψ factors for the concrete
//! cone (tension) and concrete edge (shear) failure modes.
//!
//! ```text
//! Tension, A_c,N (plan view)            Shear, A_c,V (elevation of edge face)
//!
//!  ┌──────────────────────┐ ─┬─          ┌─────────────────────────┐ ─┬─
//!  │ side(c1) ◄─●──s_x──● │  │           │ min(c2,1.5c1) + s_y +   │  │ min(h, 1.5c1)
//!  │            │       │ │  L_y         │ 1.5c1                   │  │
//!  │            ●───────● │  │           └─────────────────────────┘ ─┴─
//!  └──────────────────────┘ ─┴─           A0_c,V = 4.5 c1²
//!   A0_c,N = s_cr,N²
//! ```
//!
//! Group spacing enters each area capped at the critical spacing (s_cr,N in
//! tension, 3 c1 in shear). Edge distances at or beyond
//! [`UNBOUNDED_EDGE_MM`] describe an infinite slab: the shear edge area is not
//! computed and the edge failure mode is skipped.

use serde::{Deserialize, Serialize};

use crate::configuration::{AnchorConfiguration, AnchorGroup};
use crate::errors::DesignWarning;

/// Edge distance sentinel for "no edge" (mm)
pub const UNBOUNDED_EDGE_MM: f64 = 9999.0;

/// True when an edge distance means "no edge".
pub fn is_unbounded_edge(c_mm: f64) -> bool {
    c_mm >= UNBOUNDED_EDGE_MM
}

/// Actual and single-anchor reference projected areas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedArea {
    /// Extent perpendicular to the c1 edge (tension) or along the edge (shear)
    pub length_a_mm: f64,
    /// Extent along the c1 edge (tension) or down the edge face (shear)
    pub length_b_mm: f64,
    pub actual_mm2: f64,
    pub reference_mm2: f64,
}

impl ProjectedArea {
    fn new(length_a_mm: f64, length_b_mm: f64, reference_mm2: f64) -> Self {
        ProjectedArea {
            length_a_mm,
            length_b_mm,
            actual_mm2: length_a_mm * length_b_mm,
            reference_mm2,
        }
    }

    /// A / A0, or `None` when the reference area is degenerate.
    pub fn ratio(&self) -> Option<f64> {
        (self.reference_mm2 > 0.0 && self.reference_mm2.is_finite()).then(|| self.actual_mm2 / self.reference_mm2)
    }
}

/// Replace a degenerate factor with 1.0 and record why.
pub(crate) fn neutral_if_degenerate(
    value: Option<f64>,
    factor: &str,
    reason: &str,
    warnings: &mut Vec<DesignWarning>,
) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => {
            tracing::warn!(factor, reason, "degenerate factor replaced by 1.0");
            warnings.push(DesignWarning::degenerate(factor, reason));
            1.0
        }
    }
}

// ============================================================================
// Tension (concrete cone)
// ============================================================================

/// Area and factors for the concrete cone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConeGeometry {
    pub area: ProjectedArea,
    /// A_c,N / A0_c,N
    pub area_ratio: f64,
    /// ψ_s,N, edge disturbance
    pub psi_s_n: f64,
    /// ψ_ec,N along x
    pub psi_ec_n_x: f64,
    /// ψ_ec,N along y
    pub psi_ec_n_y: f64,
}

/// Cone extent on one side of the group: c when an edge intrudes, s_cr/2 otherwise.
fn cone_side(edge_mm: Option<f64>, s_cr_mm: f64, c_cr_mm: f64) -> f64 {
    let half = s_cr_mm / 2.0;
    match edge_mm {
        Some(c) if c < c_cr_mm => c.min(half),
        _ => half,
    }
}

/// Projected cone area A_c,N and reference A0_c,N = s_cr².
pub fn tension_cone_area(
    c1_mm: f64,
    c2_mm: Option<f64>,
    group: &AnchorGroup,
    s_cr_mm: f64,
    c_cr_mm: f64,
) -> ProjectedArea {
    let half = s_cr_mm / 2.0;
    let sx = group.spacing_x_mm().min(s_cr_mm);
    let sy = group.spacing_y_mm().min(s_cr_mm);

    let length_x = cone_side(Some(c1_mm), s_cr_mm, c_cr_mm) + sx + half;
    let length_y = cone_side(c2_mm, s_cr_mm, c_cr_mm) + sy + half;

    ProjectedArea::new(length_x, length_y, s_cr_mm * s_cr_mm)
}

/// ψ_s,N = 0.7 + 0.3 c / c_cr,N ≤ 1.0
pub fn edge_factor_tension(c_min_mm: Option<f64>, c_cr_mm: f64) -> Option<f64> {
    let Some(c) = c_min_mm else {
        return Some(1.0);
    };
    if c_cr_mm <= 0.0 {
        return None;
    }
    Some((0.7 + 0.3 * c.min(c_cr_mm) / c_cr_mm).min(1.0))
}

/// ψ_ec,N = 1 / (1 + 2 e_N / s_cr,N) ≤ 1.0
pub fn eccentricity_factor_tension(eccentricity_mm: f64, s_cr_mm: f64) -> Option<f64> {
    if s_cr_mm <= 0.0 {
        return None;
    }
    Some((1.0 / (1.0 + 2.0 * eccentricity_mm.abs() / s_cr_mm)).min(1.0))
}

/// Resolve cone geometry for a configuration and critical distances.
pub fn resolve_cone(
    config: &AnchorConfiguration,
    group: &AnchorGroup,
    s_cr_mm: f64,
    c_cr_mm: f64,
    warnings: &mut Vec<DesignWarning>,
) -> ConeGeometry {
    let area = tension_cone_area(
        config.edge_distance_mm,
        config.edge_distance_perp_mm,
        group,
        s_cr_mm,
        c_cr_mm,
    );
    let area_ratio = neutral_if_degenerate(area.ratio(), "A_c,N/A0_c,N", "critical spacing s_cr,N is zero", warnings);
    let psi_s_n = neutral_if_degenerate(
        edge_factor_tension(config.min_edge_distance_mm(), c_cr_mm),
        "psi_s,N",
        "critical edge distance c_cr,N is zero",
        warnings,
    );
    let psi_ec_n_x = neutral_if_degenerate(
        eccentricity_factor_tension(config.tension_eccentricity_x_mm, s_cr_mm),
        "psi_ec,N (x)",
        "critical spacing s_cr,N is zero",
        warnings,
    );
    let psi_ec_n_y = neutral_if_degenerate(
        eccentricity_factor_tension(config.tension_eccentricity_y_mm, s_cr_mm),
        "psi_ec,N (y)",
        "critical spacing s_cr,N is zero",
        warnings,
    );

    ConeGeometry {
        area,
        area_ratio,
        psi_s_n,
        psi_ec_n_x,
        psi_ec_n_y,
    }
}

// ============================================================================
// Shear (concrete edge)
// ============================================================================

/// Area and factors for concrete edge failure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeGeometry {
    pub area: ProjectedArea,
    /// A_c,V / A0_c,V
    pub area_ratio: f64,
    /// ψ_s,V, perpendicular edge
    pub psi_s_v: f64,
    /// ψ_h,V, member thickness
    pub psi_h_v: f64,
    /// ψ_ec,V, shear eccentricity
    pub psi_ec_v: f64,
}

/// Projected edge area A_c,V and reference A0_c,V = 4.5 c1², or `None` for an
/// unbounded edge.
pub fn shear_edge_area(
    c1_mm: f64,
    c2_mm: Option<f64>,
    member_thickness_mm: f64,
    group: &AnchorGroup,
) -> Option<ProjectedArea> {
    if is_unbounded_edge(c1_mm) {
        return None;
    }
    let reach = 1.5 * c1_mm;
    let side = c2_mm.map_or(reach, |c2| c2.min(reach));
    let width = side + group.spacing_y_mm().min(3.0 * c1_mm) + reach;
    let height = member_thickness_mm.min(reach);

    Some(ProjectedArea::new(width, height, 4.5 * c1_mm * c1_mm))
}

/// ψ_s,V = 0.7 + 0.3 c2 / (1.5 c1) ≤ 1.0
pub fn edge_factor_shear(c1_mm: f64, c2_mm: Option<f64>) -> f64 {
    match c2_mm {
        Some(c2) if c1_mm > 0.0 => (0.7 + 0.3 * c2 / (1.5 * c1_mm)).min(1.0),
        _ => 1.0,
    }
}

/// ψ_h,V = (1.5 c1 / h)^0.5 ≥ 1.0
pub fn thickness_factor_shear(c1_mm: f64, member_thickness_mm: f64) -> f64 {
    if member_thickness_mm <= 0.0 {
        return 1.0;
    }
    (1.5 * c1_mm / member_thickness_mm).sqrt().max(1.0)
}

/// ψ_ec,V = 1 / (1 + 2 e_V / (3 c1)) ≤ 1.0
pub fn eccentricity_factor_shear(eccentricity_mm: f64, c1_mm: f64) -> Option<f64> {
    if c1_mm <= 0.0 {
        return None;
    }
    Some((1.0 / (1.0 + 2.0 * eccentricity_mm.abs() / (3.0 * c1_mm))).min(1.0))
}

/// Resolve edge geometry, or `None` when the edge is unbounded.
pub fn resolve_edge(
    config: &AnchorConfiguration,
    group: &AnchorGroup,
    warnings: &mut Vec<DesignWarning>,
) -> Option<EdgeGeometry> {
    let c1 = config.edge_distance_mm;
    let c2 = config.edge_distance_perp_mm.filter(|c| !is_unbounded_edge(*c));
    let area = shear_edge_area(c1, c2, config.member_thickness_mm, group)?;

    let area_ratio = neutral_if_degenerate(area.ratio(), "A_c,V/A0_c,V", "edge distance c1 is zero", warnings);
    let psi_ec_v = neutral_if_degenerate(
        eccentricity_factor_shear(config.shear_eccentricity_mm, c1),
        "psi_ec,V",
        "edge distance c1 is zero",
        warnings,
    );

    Some(EdgeGeometry {
        area,
        area_ratio,
        psi_s_v: edge_factor_shear(c1, c2),
        psi_h_v: thickness_factor_shear(c1, config.member_thickness_mm),
        psi_ec_v,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concrete::ConcreteGrade;

    const S_CR: f64 = 239.7;
    const C_CR: f64 = 119.9;

    #[test]
    fn test_single_anchor_beyond_critical_edge_is_exactly_one() {
        for c1 in [C_CR, 150.0, 500.0, UNBOUNDED_EDGE_MM] {
            for c2 in [None, Some(C_CR), Some(300.0)] {
                let area = tension_cone_area(c1, c2, &AnchorGroup::Single, S_CR, C_CR);
                assert_eq!(area.ratio(), Some(1.0), "c1={c1}, c2={c2:?}");
            }
        }
    }

    #[test]
    fn test_single_anchor_near_edge_reduces_area() {
        let area = tension_cone_area(60.0, None, &AnchorGroup::Single, 240.0, 120.0);
        assert!((area.ratio().unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_group_spacing_capped_at_critical() {
        let wide = AnchorGroup::Pair { spacing_mm: 1000.0 };
        let area = tension_cone_area(UNBOUNDED_EDGE_MM, None, &wide, 240.0, 120.0);
        assert!((area.ratio().unwrap() - 2.0).abs() < 1e-12);

        let tight = AnchorGroup::Pair { spacing_mm: 120.0 };
        let area = tension_cone_area(UNBOUNDED_EDGE_MM, None, &tight, 240.0, 120.0);
        assert!((area.ratio().unwrap() - 1.5).abs() < 1e-12);

        let quad = AnchorGroup::Quad {
            spacing_x_mm: 500.0,
            spacing_y_mm: 500.0,
        };
        let area = tension_cone_area(UNBOUNDED_EDGE_MM, None, &quad, 240.0, 120.0);
        assert!((area.ratio().unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_reference_area() {
        let area = tension_cone_area(100.0, None, &AnchorGroup::Single, 0.0, 0.0);
        assert_eq!(area.ratio(), None);
        assert_eq!(eccentricity_factor_tension(10.0, 0.0), None);
    }

    #[test]
    fn test_tension_factors_never_exceed_one() {
        for c in [1.0, 60.0, 119.9, 120.0, 5000.0] {
            let psi = edge_factor_tension(Some(c), 120.0).unwrap();
            assert!(psi <= 1.0 && psi >= 0.7);
        }
        assert_eq!(edge_factor_tension(Some(120.0), 120.0), Some(1.0));
        assert_eq!(edge_factor_tension(None, 120.0), Some(1.0));
        for e in [-50.0, 0.0, 10.0, 300.0] {
            assert!(eccentricity_factor_tension(e, 240.0).unwrap() <= 1.0);
        }
        assert_eq!(eccentricity_factor_tension(0.0, 240.0), Some(1.0));
    }

    #[test]
    fn test_shear_area_unbounded_edge_skipped() {
        assert!(shear_edge_area(UNBOUNDED_EDGE_MM, None, 200.0, &AnchorGroup::Single).is_none());
    }

    #[test]
    fn test_shear_area_single_anchor_thick_member() {
        let area = shear_edge_area(100.0, None, 300.0, &AnchorGroup::Single).unwrap();
        assert!((area.ratio().unwrap() - 1.0).abs() < 1e-12);

        // Thin member: height limited to h
        let area = shear_edge_area(100.0, None, 75.0, &AnchorGroup::Single).unwrap();
        assert!((area.ratio().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_shear_area_corner_and_pair() {
        let area = shear_edge_area(100.0, Some(75.0), 300.0, &AnchorGroup::Single).unwrap();
        assert!((area.length_a_mm - 225.0).abs() < 1e-12);

        let pair = AnchorGroup::Pair { spacing_mm: 1000.0 };
        let area = shear_edge_area(100.0, None, 300.0, &pair).unwrap();
        assert!((area.ratio().unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_shear_factor_bounds() {
        assert_eq!(edge_factor_shear(100.0, None), 1.0);
        assert_eq!(edge_factor_shear(100.0, Some(150.0)), 1.0);
        assert!((edge_factor_shear(100.0, Some(75.0)) - 0.85).abs() < 1e-12);

        assert_eq!(thickness_factor_shear(100.0, 300.0), 1.0);
        assert!((thickness_factor_shear(100.0, 75.0) - 2f64.sqrt()).abs() < 1e-12);

        assert_eq!(eccentricity_factor_shear(0.0, 100.0), Some(1.0));
        assert!(eccentricity_factor_shear(30.0, 100.0).unwrap() < 1.0);
    }

    #[test]
    fn test_resolve_cone_reports_degenerate() {
        let config = AnchorConfiguration::new(12.0, 80.0, 200.0, ConcreteGrade::C20_25, 1.0)
            .with_edge_distance(50.0, None);
        let mut warnings = Vec::new();
        let cone = resolve_cone(&config, &AnchorGroup::Single, 0.0, 0.0, &mut warnings);
        assert_eq!(cone.area_ratio, 1.0);
        assert_eq!(cone.psi_s_n, 1.0);
        assert!(!warnings.is_empty());
        assert!(warnings.iter().all(|w| w.code() == "COMPUTATION_DEGENERATE"));
    }

    #[test]
    fn test_resolve_edge_ignores_unbounded_perpendicular_edge() {
        let config = AnchorConfiguration::new(12.0, 80.0, 300.0, ConcreteGrade::C20_25, 1.0)
            .with_edge_distance(100.0, Some(UNBOUNDED_EDGE_MM));
        let mut warnings = Vec::new();
        let edge = resolve_edge(&config, &AnchorGroup::Single, &mut warnings).unwrap();
        assert_eq!(edge.psi_s_v, 1.0);
        assert!((edge.area_ratio - 1.0).abs() < 1e-12);
        assert!(warnings.is_empty());
    }
}
