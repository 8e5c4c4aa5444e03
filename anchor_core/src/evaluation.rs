//! # Evaluation Entry Points
//!
//! [`evaluate`] runs one capacity evaluation: validate, look the product up,
//! resolve factors and geometry, compute every failure mode, pick the
//! governing values and optionally check interaction.
//! [`evaluate_product_string`] decodes `"<Product>-<Diameter>M-<Embedment>"`
//! first. [`evaluate_batch`] runs independent checks in parallel.
//!
//! ## Example
//!
//! ```rust
//! use anchor_core::catalog;
//! use anchor_core::concrete::ConcreteGrade;
//! use anchor_core::configuration::AnchorConfiguration;
//! use anchor_core::evaluation::evaluate;
//! use anchor_core::failure_modes::FailureMode;
//! use anchor_core::settings::DesignSettings;
//!
//! let config = AnchorConfiguration::new(12.0, 79.9, 200.0, ConcreteGrade::C20_25, 1.0);
//! let result = evaluate(catalog::builtin(), "HUS4-H", &config, None, &DesignSettings::default()).unwrap();
//!
//! assert_eq!(result.mode(FailureMode::SteelTension).unwrap().design_kn, Some(79.0 / 1.5));
//! assert_ne!(result.tension.governing_mode, Some(FailureMode::SteelTension));
//! ```

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::capacity::{check_interaction, resolve_governing, CapacityResult};
use crate::catalog::{LookupOptions, ProductCatalog, ProductDesignation};
use crate::configuration::{AnchorConfiguration, LoadDemand};
use crate::errors::{CalcError, CalcResult};
use crate::factors::ModificationFactorSet;
use crate::failure_modes::{
    concrete_cone, concrete_edge, pry_out, pull_out, side_face_blowout, steel_shear, steel_tension, LoadDirection,
    ModeInputs,
};
use crate::geometry::{resolve_cone, resolve_edge};
use crate::settings::DesignSettings;

/// Evaluate one anchor configuration against a catalog product.
///
/// Steel and pull-out use the catalog row; the concrete formulas use the
/// smaller of the requested and tabulated embedment depths.
///
/// # Errors
///
/// * configuration errors (`InvalidInput`, `MissingField`) for bad geometry,
///   anchor count, spacing, gap factor, demand or settings
/// * `CatalogLookup` when the product, diameter, grade or embedment cannot
///   be resolved
#[instrument(skip_all, fields(product = %product))]
pub fn evaluate(
    catalog: &ProductCatalog,
    product: &str,
    config: &AnchorConfiguration,
    demand: Option<LoadDemand>,
    settings: &DesignSettings,
) -> CalcResult<CapacityResult> {
    settings.validate()?;
    config.validate()?;
    if let Some(demand) = &demand {
        demand.validate()?;
    }
    let group = config.group()?;

    let mut warnings = config.range_warnings(&settings.coefficients);
    let catalog_match = catalog.lookup(
        product,
        config.diameter_mm,
        config.embedment_depth_mm,
        config.concrete_grade,
        &LookupOptions::from(settings),
    )?;
    warnings.extend(catalog_match.warning());
    for warning in &warnings {
        tracing::warn!(code = warning.code(), "{warning}");
    }

    let values = catalog_match.values;
    let effective_embedment_mm = config.embedment_depth_mm.min(catalog_match.resolved_embedment_mm);
    let factors = ModificationFactorSet::resolve(config, &group, &settings.coefficients);
    let cone = resolve_cone(config, &group, values.s_cr_n_mm, values.c_cr_n_mm, &mut warnings);
    let edge = resolve_edge(config, &group, &mut warnings);

    let inputs = ModeInputs {
        config,
        group,
        values: &values,
        factors: &factors,
        coefficients: &settings.coefficients,
        embedment_mm: effective_embedment_mm,
    };

    let tension = resolve_governing(
        LoadDirection::Tension,
        vec![
            steel_tension(&inputs),
            pull_out(&inputs),
            concrete_cone(&inputs, &cone),
            side_face_blowout(&inputs),
        ],
    );
    let shear = resolve_governing(
        LoadDirection::Shear,
        vec![
            steel_shear(&inputs),
            concrete_edge(&inputs, edge.as_ref()),
            pry_out(&inputs, &cone),
        ],
    );

    let interaction = demand
        .map(|demand| check_interaction(demand, tension.design_kn, shear.design_kn, settings.interaction_limit))
        .transpose()?;

    tracing::info!(
        tension_kn = ?tension.design_kn,
        tension_mode = ?tension.governing_mode,
        shear_kn = ?shear.design_kn,
        shear_mode = ?shear.governing_mode,
        utilization = ?interaction.map(|check| check.utilization),
        "evaluation complete"
    );

    Ok(CapacityResult {
        catalog: catalog_match,
        group,
        effective_embedment_mm,
        factors,
        cone,
        edge,
        tension,
        shear,
        interaction,
        warnings,
    })
}

/// Decode a compact product string, then [`evaluate`].
///
/// Diameter and embedment from the string replace those in `base`.
#[instrument(skip_all, fields(designation = %designation))]
pub fn evaluate_product_string(
    catalog: &ProductCatalog,
    designation: &str,
    base: &AnchorConfiguration,
    demand: Option<LoadDemand>,
    settings: &DesignSettings,
) -> CalcResult<CapacityResult> {
    let decoded: ProductDesignation = designation.parse()?;
    let config = AnchorConfiguration {
        diameter_mm: f64::from(decoded.diameter_mm),
        embedment_depth_mm: decoded.embedment_mm,
        ..base.clone()
    };
    evaluate(catalog, &decoded.product, &config, demand, settings)
}

/// One entry of a batch: a product and a configuration, optionally loaded.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "A1",
///   "product": "HUS4-H",
///   "diameter_mm": 12.0,
///   "embedment_depth_mm": 79.9,
///   "member_thickness_mm": 200.0,
///   "concrete_grade": "C20/25",
///   "gap_factor": 1.0,
///   "demand": { "tension_kn": 4.0, "shear_kn": 3.0 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorCheck {
    /// User label for this check (e.g. "A1", "Bracket north")
    #[serde(default)]
    pub label: String,

    /// Catalog product name
    pub product: String,

    #[serde(flatten)]
    pub configuration: AnchorConfiguration,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demand: Option<LoadDemand>,
}

impl AnchorCheck {
    pub fn new(label: impl Into<String>, product: impl Into<String>, configuration: AnchorConfiguration) -> Self {
        AnchorCheck {
            label: label.into(),
            product: product.into(),
            configuration,
            demand: None,
        }
    }

    pub fn with_demand(mut self, demand: LoadDemand) -> Self {
        self.demand = Some(demand);
        self
    }
}

/// Outcome of one batch entry; exactly one of `result` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub label: String,
    pub product: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<CapacityResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CalcError>,
}

impl CheckOutcome {
    fn from_result(check: &AnchorCheck, outcome: CalcResult<CapacityResult>) -> Self {
        let (result, error) = match outcome {
            Ok(result) => (Some(result), None),
            Err(error) => (None, Some(error)),
        };
        CheckOutcome {
            label: check.label.clone(),
            product: check.product.clone(),
            result,
            error,
        }
    }

    /// True when the check evaluated and, if loaded, passed interaction.
    pub fn is_ok(&self) -> bool {
        self.result
            .as_ref()
            .is_some_and(|result| result.passes().unwrap_or(true))
    }
}

/// Evaluate independent checks in parallel, preserving input order.
#[instrument(skip_all, fields(count = checks.len()))]
pub fn evaluate_batch(catalog: &ProductCatalog, checks: &[AnchorCheck], settings: &DesignSettings) -> Vec<CheckOutcome> {
    let outcomes: Vec<CheckOutcome> = checks
        .par_iter()
        .map(|check| {
            let outcome = evaluate(catalog, &check.product, &check.configuration, check.demand, settings);
            CheckOutcome::from_result(check, outcome)
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    tracing::info!(evaluated = outcomes.len(), failed, "batch complete");
    outcomes
}
