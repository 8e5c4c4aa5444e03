//! # Tension Failure Modes
//!
//! Steel rupture, pull-out, concrete cone and side-face blowout.
//!
//! ## Concrete cone
//!
//! ```text
//! N0_Rk,c = k1 · √f_ck,cube · h_ef^1.5 / 1000                       [kN]
//! N_Rk,c  = α_gap · α_seis · N0_Rk,c · (A_c,N / A0_c,N)
//!           · ψ_s,N · ψ_re,N · ψ_ec,N(x) · ψ_ec,N(y)
//! N_Rd,c  = N_Rk,c / γ_Mc
//! ```

use crate::factors::SeismicMode;
use crate::geometry::{is_unbounded_edge, ConeGeometry};

use super::{FailureMode, ModeInputs, ModeResult};

/// N0_Rk,c = k1 √f_ck,cube h_ef^1.5, in kN
pub fn reference_cone_resistance(k1: f64, cube_strength_mpa: f64, embedment_mm: f64) -> f64 {
    k1 * cube_strength_mpa.sqrt() * embedment_mm.powf(1.5) / 1000.0
}

/// ψ_re,N = 0.5 + h_ef / 200 ≤ 1.0
pub fn shell_spalling_factor(embedment_mm: f64) -> f64 {
    (0.5 + embedment_mm / 200.0).min(1.0)
}

/// Cone resistance before α_gap and α_seis, shared with pry-out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ConeTerms {
    pub n0_kn: f64,
    pub psi_re_n: f64,
    /// N0 × area ratio × every ψ
    pub modified_kn: f64,
}

pub(crate) fn cone_terms(inputs: &ModeInputs<'_>, cone: &ConeGeometry) -> ConeTerms {
    let n0_kn = reference_cone_resistance(
        inputs.factors.k1_tension,
        inputs.cube_strength_mpa(),
        inputs.embedment_mm,
    );
    let psi_re_n = shell_spalling_factor(inputs.embedment_mm);
    let modified_kn = n0_kn * cone.area_ratio * cone.psi_s_n * psi_re_n * cone.psi_ec_n_x * cone.psi_ec_n_y;
    ConeTerms {
        n0_kn,
        psi_re_n,
        modified_kn,
    }
}

/// Steel failure: N_Rd,s = α_gap α_seis N_Rk,s / γ_Ms per anchor.
///
/// The group value is n times the per-anchor value, which assumes the load is
/// shared equally between anchors. Eccentric tension is not redistributed.
pub fn steel_tension(inputs: &ModeInputs<'_>) -> ModeResult {
    let f = inputs.factors;
    let alpha_seis = f.alpha_seis(SeismicMode::SteelTension);
    let n = inputs.anchor_count();

    let per_anchor_rk = f.alpha_gap * alpha_seis * inputs.values.n_rk_s_kn;
    let per_anchor_rd = per_anchor_rk / f.gamma_ms;

    let result = ModeResult::computed(FailureMode::SteelTension, per_anchor_rk * n, per_anchor_rd * n)
        .with_per_anchor(per_anchor_rd)
        .with_factor("N_Rk,s", inputs.values.n_rk_s_kn)
        .with_factor("alpha_gap", f.alpha_gap)
        .with_factor("alpha_seis", alpha_seis)
        .with_factor("gamma_Ms", f.gamma_ms)
        .with_factor("n", n);
    tracing::debug!(design_kn = per_anchor_rd * n, "steel tension");
    result
}

/// Pull-out: N_Rd,p = ψ_c α_gap α_seis N_Rk,p / γ_Mp per anchor.
///
/// Group value is n times the per-anchor value (load shared equally).
pub fn pull_out(inputs: &ModeInputs<'_>) -> ModeResult {
    let f = inputs.factors;
    let alpha_seis = f.alpha_seis(SeismicMode::PullOut);
    let n = inputs.anchor_count();

    let per_anchor_rk = f.psi_c * f.alpha_gap * alpha_seis * inputs.values.n_rk_p_kn;
    let per_anchor_rd = per_anchor_rk / f.gamma_mp;

    let result = ModeResult::computed(FailureMode::PullOut, per_anchor_rk * n, per_anchor_rd * n)
        .with_per_anchor(per_anchor_rd)
        .with_factor("N_Rk,p", inputs.values.n_rk_p_kn)
        .with_factor("psi_c", f.psi_c)
        .with_factor("alpha_gap", f.alpha_gap)
        .with_factor("alpha_seis", alpha_seis)
        .with_factor("gamma_Mp", f.gamma_mp)
        .with_factor("n", n);
    tracing::debug!(design_kn = per_anchor_rd * n, "pull-out");
    result
}

/// Concrete cone failure of the anchor or group.
pub fn concrete_cone(inputs: &ModeInputs<'_>, cone: &ConeGeometry) -> ModeResult {
    let f = inputs.factors;
    let alpha_seis = f.alpha_seis(SeismicMode::ConcreteTension);
    let terms = cone_terms(inputs, cone);

    let n_rk = f.alpha_gap * alpha_seis * terms.modified_kn;
    let n_rd = n_rk / f.gamma_mc;

    let result = ModeResult::computed(FailureMode::ConcreteCone, n_rk, n_rd)
        .with_factor("k1", f.k1_tension)
        .with_factor("f_ck,cube", inputs.cube_strength_mpa())
        .with_factor("h_ef", inputs.embedment_mm)
        .with_factor("N0_Rk,c", terms.n0_kn)
        .with_factor("A_c,N", cone.area.actual_mm2)
        .with_factor("A0_c,N", cone.area.reference_mm2)
        .with_factor("A_c,N/A0_c,N", cone.area_ratio)
        .with_factor("psi_s,N", cone.psi_s_n)
        .with_factor("psi_re,N", terms.psi_re_n)
        .with_factor("psi_ec,N (x)", cone.psi_ec_n_x)
        .with_factor("psi_ec,N (y)", cone.psi_ec_n_y)
        .with_factor("alpha_gap", f.alpha_gap)
        .with_factor("alpha_seis", alpha_seis)
        .with_factor("gamma_Mc", f.gamma_mc);
    tracing::debug!(design_kn = n_rd, "concrete cone");
    result
}

/// k1 for side-face blowout: 1.0 clear of a corner, else (1 + c2/c1) / 4
fn blowout_corner_factor(c1_mm: f64, c2_mm: Option<f64>) -> f64 {
    match c2_mm {
        Some(c2) if c2 < 3.0 * c1_mm => (1.0 + c2 / c1_mm) / 4.0,
        _ => 1.0,
    }
}

/// Increase for anchors sharing the blowout edge: 1 + s / (6 c1) for s < 6 c1,
/// otherwise each anchor in the edge row fails independently.
fn blowout_group_factor(spacing_along_edge_mm: f64, c1_mm: f64, anchors_along_edge: f64) -> f64 {
    if spacing_along_edge_mm <= 0.0 {
        1.0
    } else if spacing_along_edge_mm < 6.0 * c1_mm {
        1.0 + spacing_along_edge_mm / (6.0 * c1_mm)
    } else {
        anchors_along_edge
    }
}

/// Side-face blowout of headed anchors close to an edge.
///
/// Applies only when the product carries a head bearing area and the
/// smallest edge distance is below `blowout_edge_ratio · h_ef`.
pub fn side_face_blowout(inputs: &ModeInputs<'_>) -> ModeResult {
    let mode = FailureMode::SideFaceBlowout;
    let Some(bearing_area) = inputs.values.head_bearing_area_mm2 else {
        return ModeResult::skipped(mode, "no head bearing area; not a headed anchor");
    };
    let limit = inputs.coefficients.blowout_edge_ratio * inputs.embedment_mm;
    let Some(c_min) = inputs.config.min_edge_distance_mm() else {
        return ModeResult::skipped(mode, "no edge within reach");
    };
    if c_min >= limit {
        return ModeResult::skipped(mode, format!("edge distance {c_min:.1} mm >= {limit:.1} mm"));
    }

    // Blowout runs along whichever edge is closer; the other one is the corner.
    let config = inputs.config;
    let perp = config.edge_distance_perp_mm.filter(|c| !is_unbounded_edge(*c));
    let blowout_along_c1 = !matches!(perp, Some(c2) if c2 < config.edge_distance_mm);
    let (c1, c2, spacing) = if blowout_along_c1 {
        (config.edge_distance_mm, perp, inputs.group.spacing_y_mm())
    } else {
        let primary = Some(config.edge_distance_mm).filter(|c| !is_unbounded_edge(*c));
        (c_min, primary, inputs.group.spacing_x_mm())
    };
    let anchors_along_edge = if inputs.group.is_group() { 2.0 } else { 1.0 };

    let f = inputs.factors;
    let alpha_seis = f.alpha_seis(SeismicMode::ConcreteTension);
    let k1 = blowout_corner_factor(c1, c2);
    let group_factor = blowout_group_factor(spacing, c1, anchors_along_edge);

    let n0_sb = inputs.coefficients.blowout_coefficient
        * k1
        * c1
        * bearing_area.sqrt()
        * config.fck_mpa().sqrt()
        / 1000.0;
    let n_rk = f.alpha_gap * alpha_seis * group_factor * n0_sb;
    let n_rd = n_rk / f.gamma_mc;

    tracing::debug!(design_kn = n_rd, c1, "side-face blowout");
    ModeResult::computed(mode, n_rk, n_rd)
        .with_factor("c1", c1)
        .with_factor("A_brg", bearing_area)
        .with_factor("k1", k1)
        .with_factor("N0_Rk,sb", n0_sb)
        .with_factor("group", group_factor)
        .with_factor("alpha_gap", f.alpha_gap)
        .with_factor("alpha_seis", alpha_seis)
        .with_factor("gamma_Mc", f.gamma_mc)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{base_config, hus4_m12, with_inputs};
    use super::*;
    use crate::concrete::ConcreteGrade;
    use crate::configuration::AnchorConfiguration;
    use crate::geometry::resolve_cone;

    #[test]
    fn test_steel_tension_is_characteristic_over_gamma() {
        let config = base_config();
        let result = with_inputs(&config, &hus4_m12(), |inputs| steel_tension(&inputs));
        assert_eq!(result.design_kn, Some(79.0 / 1.5));
        assert_eq!(result.per_anchor_design_kn, Some(79.0 / 1.5));
    }

    #[test]
    fn test_steel_and_pullout_scale_with_anchor_count() {
        let config = base_config().with_quad(150.0, 150.0);
        let (steel, pull) = with_inputs(&config, &hus4_m12(), |inputs| (steel_tension(&inputs), pull_out(&inputs)));
        assert!((steel.design_kn.unwrap() - 4.0 * 79.0 / 1.5).abs() < 1e-9);
        assert!((pull.design_kn.unwrap() - 4.0 * 11.4 / 1.5).abs() < 1e-9);
        assert!((pull.per_anchor_design_kn.unwrap() - 11.4 / 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_pullout_seismic_group_reduction() {
        let config = base_config().with_pair(100.0).with_seismic(true);
        let pull = with_inputs(&config, &hus4_m12(), |inputs| pull_out(&inputs));
        assert!((pull.design_kn.unwrap() - 2.0 * 0.85 * 11.4 / 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_gap_factor_reduces_steel() {
        let config = AnchorConfiguration::new(12.0, 79.9, 200.0, ConcreteGrade::C20_25, 0.5);
        let result = with_inputs(&config, &hus4_m12(), |inputs| steel_tension(&inputs));
        assert!((result.design_kn.unwrap() - 0.5 * 79.0 / 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_reference_cone_resistance() {
        // 7.2 × √25 × 79.9^1.5 / 1000
        let n0 = reference_cone_resistance(7.2, 25.0, 79.9);
        assert!((n0 - 25.712).abs() < 0.01, "N0 = {n0}");
    }

    #[test]
    fn test_shell_spalling_clamped() {
        assert!((shell_spalling_factor(60.0) - 0.8).abs() < 1e-12);
        assert_eq!(shell_spalling_factor(100.0), 1.0);
        assert_eq!(shell_spalling_factor(250.0), 1.0);
    }

    #[test]
    fn test_cone_far_from_edges() {
        let config = base_config();
        let values = hus4_m12();
        let result = with_inputs(&config, &values, |inputs| {
            let mut warnings = Vec::new();
            let cone = resolve_cone(&config, &inputs.group, values.s_cr_n_mm, values.c_cr_n_mm, &mut warnings);
            assert!(warnings.is_empty());
            concrete_cone(&inputs, &cone)
        });
        let expected = reference_cone_resistance(7.2, 25.0, 79.9) * shell_spalling_factor(79.9) / 1.5;
        assert!((result.design_kn.unwrap() - expected).abs() < 1e-9);
        assert_eq!(result.factor("A_c,N/A0_c,N"), Some(1.0));
        assert_eq!(result.factor("psi_s,N"), Some(1.0));
    }

    #[test]
    fn test_cone_near_edge_is_reduced() {
        let values = hus4_m12();
        let far = base_config();
        let near = base_config().with_edge_distance(60.0, None);
        let cone = |config: &AnchorConfiguration| {
            with_inputs(config, &values, |inputs| {
                let mut warnings = Vec::new();
                let geometry = resolve_cone(config, &inputs.group, values.s_cr_n_mm, values.c_cr_n_mm, &mut warnings);
                concrete_cone(&inputs, &geometry).design_kn.unwrap()
            })
        };
        assert!(cone(&near) < cone(&far));
    }

    #[test]
    fn test_blowout_skipped_without_bearing_area() {
        let config = base_config().with_edge_distance(20.0, None);
        let result = with_inputs(&config, &hus4_m12(), |inputs| side_face_blowout(&inputs));
        assert!(!result.is_applicable());
        assert!(result.note.is_some());
    }

    #[test]
    fn test_blowout_applies_close_to_edge() {
        let mut values = hus4_m12();
        values.head_bearing_area_mm2 = Some(200.0);

        let far = base_config().with_edge_distance(100.0, None);
        let skipped = with_inputs(&far, &values, |inputs| side_face_blowout(&inputs));
        assert!(!skipped.is_applicable());

        let near = base_config().with_edge_distance(25.0, None);
        let result = with_inputs(&near, &values, |inputs| side_face_blowout(&inputs));
        // 13.3 × 1.0 × 25 × √200 × √20 / 1000 / 1.5
        let expected = 13.3 * 25.0 * 200.0_f64.sqrt() * 20.0_f64.sqrt() / 1000.0 / 1.5;
        assert!((result.design_kn.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_blowout_corner_and_group_factors() {
        assert_eq!(blowout_corner_factor(25.0, None), 1.0);
        assert_eq!(blowout_corner_factor(25.0, Some(100.0)), 1.0);
        assert!((blowout_corner_factor(25.0, Some(25.0)) - 0.5).abs() < 1e-12);

        assert_eq!(blowout_group_factor(0.0, 25.0, 1.0), 1.0);
        assert!((blowout_group_factor(75.0, 25.0, 2.0) - 1.5).abs() < 1e-12);
        assert_eq!(blowout_group_factor(200.0, 25.0, 2.0), 2.0);
    }
}
