//! # Shear Failure Modes
//!
//! Steel, concrete edge and pry-out.
//!
//! ## Concrete edge
//!
//! ```text
//! α       = 0.1 · (l_f / c1)^0.5          l_f ≤ 8d
//! β       = 0.1 · (d / c1)^0.2
//! V0_Rk,c = k1 · d^β · l_f^α · √f_ck,cube · c1^1.5 / 1000           [kN]
//! V_Rk,c  = α_gap · α_seis · V0_Rk,c · (A_c,V / A0_c,V)
//!           · ψ_s,V · ψ_h,V · ψ_α,V · ψ_ec,V · ψ_re,V
//! ```
//!
//! ## Pry-out
//!
//! ```text
//! V_Rk,cp = k · N_Rk,c      k = 1.0 for h_ef < 60 mm, 2.0 otherwise
//! ```
//! where N_Rk,c is the cone resistance recomputed with the pry-out α_seis.

use crate::factors::SeismicMode;
use crate::geometry::{ConeGeometry, EdgeGeometry};
use crate::settings::CoefficientTable;

use super::tension::cone_terms;
use super::{FailureMode, ModeInputs, ModeResult};

/// Pry-out multiplier k for an embedment depth.
pub fn pryout_factor(embedment_mm: f64, coefficients: &CoefficientTable) -> f64 {
    if embedment_mm < coefficients.pryout_threshold_mm {
        coefficients.pryout_k_shallow
    } else {
        coefficients.pryout_k_deep
    }
}

/// ψ_α,V = √(1 / (cos²α + (sin α / 2.5)²)) ≥ 1.0, α clamped to 0-90°
pub fn load_angle_factor(angle_deg: f64) -> f64 {
    let alpha = angle_deg.abs().clamp(0.0, 90.0).to_radians();
    let (sin, cos) = alpha.sin_cos();
    (1.0 / (cos * cos + (sin / 2.5).powi(2))).sqrt().max(1.0)
}

/// V0_Rk,c for edge distance c1, in kN.
pub fn reference_edge_resistance(
    k1: f64,
    diameter_mm: f64,
    influence_length_mm: f64,
    cube_strength_mpa: f64,
    c1_mm: f64,
) -> f64 {
    let alpha = 0.1 * (influence_length_mm / c1_mm).sqrt();
    let beta = 0.1 * (diameter_mm / c1_mm).powf(0.2);
    k1 * diameter_mm.powf(beta) * influence_length_mm.powf(alpha) * cube_strength_mpa.sqrt() * c1_mm.powf(1.5)
        / 1000.0
}

/// Steel failure without lever arm: V_Rd,s = α_gap α_seis V_Rk,s / γ_Ms per anchor.
///
/// Group value is n times the per-anchor value (load shared equally).
pub fn steel_shear(inputs: &ModeInputs<'_>) -> ModeResult {
    let f = inputs.factors;
    let alpha_seis = f.alpha_seis(SeismicMode::SteelShear);
    let n = inputs.anchor_count();

    let per_anchor_rk = f.alpha_gap * alpha_seis * inputs.values.v_rk_s_kn;
    let per_anchor_rd = per_anchor_rk / f.gamma_ms;

    tracing::debug!(design_kn = per_anchor_rd * n, "steel shear");
    ModeResult::computed(FailureMode::SteelShear, per_anchor_rk * n, per_anchor_rd * n)
        .with_per_anchor(per_anchor_rd)
        .with_factor("V_Rk,s", inputs.values.v_rk_s_kn)
        .with_factor("alpha_gap", f.alpha_gap)
        .with_factor("alpha_seis", alpha_seis)
        .with_factor("gamma_Ms", f.gamma_ms)
        .with_factor("n", n)
}

/// Concrete edge failure towards edge c1, or skipped when no edge bounds the member.
pub fn concrete_edge(inputs: &ModeInputs<'_>, edge: Option<&EdgeGeometry>) -> ModeResult {
    let Some(edge) = edge else {
        return ModeResult::skipped(FailureMode::ConcreteEdge, "no edge in the shear direction");
    };
    let f = inputs.factors;
    let config = inputs.config;
    let c1 = config.edge_distance_mm;
    let d = config.diameter_mm;
    let l_f = inputs.values.l_f_mm.min(inputs.coefficients.max_lf_over_d * d);

    let v0 = reference_edge_resistance(f.k1_shear, d, l_f, inputs.cube_strength_mpa(), c1);
    let psi_alpha_v = load_angle_factor(config.shear_load_angle_deg);
    let alpha_seis = f.alpha_seis(SeismicMode::ConcreteEdge);

    let v_rk = f.alpha_gap
        * alpha_seis
        * v0
        * edge.area_ratio
        * edge.psi_s_v
        * edge.psi_h_v
        * psi_alpha_v
        * edge.psi_ec_v
        * f.psi_re_v;
    let v_rd = v_rk / f.gamma_mc;

    tracing::debug!(design_kn = v_rd, c1, "concrete edge");
    ModeResult::computed(FailureMode::ConcreteEdge, v_rk, v_rd)
        .with_factor("k1", f.k1_shear)
        .with_factor("c1", c1)
        .with_factor("l_f", l_f)
        .with_factor("V0_Rk,c", v0)
        .with_factor("A_c,V", edge.area.actual_mm2)
        .with_factor("A0_c,V", edge.area.reference_mm2)
        .with_factor("A_c,V/A0_c,V", edge.area_ratio)
        .with_factor("psi_s,V", edge.psi_s_v)
        .with_factor("psi_h,V", edge.psi_h_v)
        .with_factor("psi_alpha,V", psi_alpha_v)
        .with_factor("psi_ec,V", edge.psi_ec_v)
        .with_factor("psi_re,V", f.psi_re_v)
        .with_factor("alpha_gap", f.alpha_gap)
        .with_factor("alpha_seis", alpha_seis)
        .with_factor("gamma_Mc", f.gamma_mc)
}

/// Pry-out: k times the cone resistance with the pry-out seismic factor.
pub fn pry_out(inputs: &ModeInputs<'_>, cone: &ConeGeometry) -> ModeResult {
    let f = inputs.factors;
    let k = pryout_factor(inputs.embedment_mm, inputs.coefficients);
    let alpha_seis = f.alpha_seis(SeismicMode::PryOut);
    let terms = cone_terms(inputs, cone);

    let n_rk_c = f.alpha_gap * alpha_seis * terms.modified_kn;
    let v_rk = k * n_rk_c;
    let v_rd = v_rk / f.gamma_mc;

    tracing::debug!(design_kn = v_rd, k, "pry-out");
    ModeResult::computed(FailureMode::PryOut, v_rk, v_rd)
        .with_factor("k", k)
        .with_factor("N_Rk,c", n_rk_c)
        .with_factor("alpha_gap", f.alpha_gap)
        .with_factor("alpha_seis", alpha_seis)
        .with_factor("gamma_Mc", f.gamma_mc)
}
