//! # Product Catalog
//!
//! Characteristic values from European Technical Assessments, keyed by
//! product, diameter, embedment depth and concrete grade.
//!
//! The catalog is read-only once built. The built-in data set is created on
//! first use and shared by every thread ([`builtin`]); catalogs loaded from
//! JSON are equally immutable once constructed.
//!
//! ## Embedment resolution
//!
//! With [`EmbedmentPolicy::Nearest`] an untabulated depth resolves to the
//! nearest tabulated depth when |requested − tabulated| ≤ tolerance ×
//! tabulated, and fails with `EmbedmentOutOfRange` otherwise. A substitution
//! is always reported through [`CatalogMatch::warning`].
//!
//! With [`EmbedmentPolicy::Interpolate`] characteristic values are
//! interpolated between tabulated depths (primary axis) and concrete
//! strengths (secondary axis). Depths outside the tabulated span must still
//! be within tolerance of the nearest end.
//!
//! ## Example
//!
//! ```rust
//! use anchor_core::catalog::{builtin, LookupOptions};
//! use anchor_core::concrete::ConcreteGrade;
//!
//! let found = builtin()
//!     .lookup("HUS4-H", 12.0, 85.0, ConcreteGrade::C20_25, &LookupOptions::default())
//!     .unwrap();
//! assert_eq!(found.resolved_embedment_mm, 79.9);
//! assert!(!found.exact);
//! ```

mod builtin;
pub mod designation;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::concrete::ConcreteGrade;
use crate::errors::{CalcError, CalcResult, CatalogLookupError, DesignWarning};
use crate::interpolation::Table2D;
use crate::settings::{DesignSettings, EmbedmentPolicy, DEFAULT_EMBEDMENT_TOLERANCE};

pub use builtin::builtin;
pub use designation::ProductDesignation;

/// Depths closer than this are the same tabulated depth (mm)
const DEPTH_EPSILON_MM: f64 = 1e-9;

/// Anchor working principle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorKind {
    Screw,
    Expansion,
    Undercut,
    Bonded,
}

impl AnchorKind {
    pub const ALL: [AnchorKind; 4] = [
        AnchorKind::Screw,
        AnchorKind::Expansion,
        AnchorKind::Undercut,
        AnchorKind::Bonded,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            AnchorKind::Screw => "Screw anchor",
            AnchorKind::Expansion => "Expansion anchor",
            AnchorKind::Undercut => "Undercut anchor",
            AnchorKind::Bonded => "Bonded anchor",
        }
    }
}

impl fmt::Display for AnchorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Characteristic values for one (product, diameter, depth, grade).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacteristicValues {
    /// N_Rk,s, steel tension (kN)
    pub n_rk_s_kn: f64,
    /// N_Rk,p, pull-out (kN)
    pub n_rk_p_kn: f64,
    /// V_Rk,s, steel shear (kN)
    pub v_rk_s_kn: f64,
    /// s_cr,N (mm)
    pub s_cr_n_mm: f64,
    /// c_cr,N (mm)
    pub c_cr_n_mm: f64,
    /// Effective shear length l_f (mm)
    pub l_f_mm: f64,
    /// Net bearing area of a head, for side-face blowout (mm²)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_bearing_area_mm2: Option<f64>,
}

/// All grades tabulated at one embedment depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedmentRow {
    pub embedment_mm: f64,
    pub grades: BTreeMap<ConcreteGrade, CharacteristicValues>,
}

/// All embedment depths tabulated for one diameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiameterTable {
    pub diameter_mm: u32,
    pub rows: Vec<EmbedmentRow>,
}

impl DiameterTable {
    pub fn embedments(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.embedment_mm).collect()
    }

    fn nearest_row(&self, embedment_mm: f64) -> Option<&EmbedmentRow> {
        self.rows.iter().fold(None, |best: Option<&EmbedmentRow>, row| match best {
            Some(b) if (b.embedment_mm - embedment_mm).abs() <= (row.embedment_mm - embedment_mm).abs() => Some(b),
            _ => Some(row),
        })
    }
}

/// One product family from a technical assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub kind: AnchorKind,
    /// Technical approval reference, e.g. "ETA-20/0867"
    pub approval: String,
    pub description: String,
    pub diameters: Vec<DiameterTable>,
}

impl Product {
    pub fn diameter(&self, diameter_mm: f64) -> Option<&DiameterTable> {
        self.diameters
            .iter()
            .find(|t| (f64::from(t.diameter_mm) - diameter_mm).abs() < DEPTH_EPSILON_MM)
    }
}

/// Summary of a product for listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub name: String,
    pub kind: AnchorKind,
    pub approval: String,
    pub description: String,
    pub diameters_mm: Vec<u32>,
    pub grades: Vec<ConcreteGrade>,
}

/// How a lookup treats untabulated depths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookupOptions {
    pub tolerance: f64,
    pub policy: EmbedmentPolicy,
}

impl Default for LookupOptions {
    fn default() -> Self {
        LookupOptions {
            tolerance: DEFAULT_EMBEDMENT_TOLERANCE,
            policy: EmbedmentPolicy::Nearest,
        }
    }
}

impl From<&DesignSettings> for LookupOptions {
    fn from(settings: &DesignSettings) -> Self {
        LookupOptions {
            tolerance: settings.embedment_tolerance,
            policy: settings.embedment_policy,
        }
    }
}

/// Result of a catalog lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMatch {
    pub product: String,
    pub kind: AnchorKind,
    pub approval: String,
    pub diameter_mm: u32,
    pub grade: ConcreteGrade,
    pub requested_embedment_mm: f64,
    /// Tabulated depth used, or the requested depth when interpolated
    pub resolved_embedment_mm: f64,
    /// True when depth and grade were both tabulated exactly
    pub exact: bool,
    pub interpolated: bool,
    pub values: CharacteristicValues,
}

impl CatalogMatch {
    /// Warning to surface when the match is not exact.
    pub fn warning(&self) -> Option<DesignWarning> {
        if self.interpolated {
            Some(DesignWarning::CatalogInterpolated {
                embedment_mm: self.requested_embedment_mm,
                fck_mpa: self.grade.cylinder_strength_mpa(),
            })
        } else if !self.exact {
            Some(DesignWarning::EmbedmentSubstituted {
                requested_mm: self.requested_embedment_mm,
                resolved_mm: self.resolved_embedment_mm,
            })
        } else {
            None
        }
    }
}

/// Read-only collection of products.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    products: Vec<Product>,
}

/// Case- and whitespace-insensitive product key, so "HIT-HY200" finds "HIT-HY 200"
fn product_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

impl ProductCatalog {
    /// Build a catalog, rejecting duplicate products and unusable rows.
    pub fn new(products: Vec<Product>) -> CalcResult<Self> {
        let catalog = ProductCatalog { products };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reject duplicate products and unusable rows.
    pub fn validate(&self) -> CalcResult<()> {
        let mut seen = std::collections::HashSet::new();
        for product in &self.products {
            if !seen.insert(product_key(&product.name)) {
                return Err(CalcError::invalid_input("catalog.products", &product.name, "Duplicate product"));
            }
            for table in &product.diameters {
                if table.rows.is_empty() {
                    return Err(CalcError::invalid_input(
                        format!("catalog.{}.M{}", product.name, table.diameter_mm),
                        "[]",
                        "Diameter has no embedment rows",
                    ));
                }
                for row in &table.rows {
                    if !(row.embedment_mm > 0.0) {
                        return Err(CalcError::invalid_input(
                            format!("catalog.{}.M{}", product.name, table.diameter_mm),
                            row.embedment_mm.to_string(),
                            "Embedment depth must be positive",
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn product(&self, name: &str) -> Option<&Product> {
        let key = product_key(name);
        self.products.iter().find(|p| product_key(&p.name) == key)
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Listing of every product with its diameters and grades.
    pub fn summaries(&self) -> Vec<ProductSummary> {
        self.products
            .iter()
            .map(|p| {
                let mut grades: Vec<ConcreteGrade> = p
                    .diameters
                    .iter()
                    .flat_map(|t| t.rows.iter())
                    .flat_map(|r| r.grades.keys().copied())
                    .collect();
                grades.sort();
                grades.dedup();
                ProductSummary {
                    name: p.name.clone(),
                    kind: p.kind,
                    approval: p.approval.clone(),
                    description: p.description.clone(),
                    diameters_mm: p.diameters.iter().map(|t| t.diameter_mm).collect(),
                    grades,
                }
            })
            .collect()
    }

    pub fn diameters(&self, product: &str) -> CalcResult<Vec<u32>> {
        Ok(self.require_product(product)?.diameters.iter().map(|t| t.diameter_mm).collect())
    }

    pub fn embedments(&self, product: &str, diameter_mm: f64) -> CalcResult<Vec<f64>> {
        let product = self.require_product(product)?;
        Ok(require_diameter(product, diameter_mm)?.embedments())
    }

    fn require_product(&self, name: &str) -> CalcResult<&Product> {
        self.product(name).ok_or_else(|| {
            CatalogLookupError::UnknownProduct {
                product: name.to_string(),
            }
            .into()
        })
    }

    /// Resolve characteristic values for a product, diameter, depth and grade.
    pub fn lookup(
        &self,
        product: &str,
        diameter_mm: f64,
        embedment_mm: f64,
        grade: ConcreteGrade,
        options: &LookupOptions,
    ) -> CalcResult<CatalogMatch> {
        let entry = self.require_product(product)?;
        let table = require_diameter(entry, diameter_mm)?;

        let nearest = table
            .nearest_row(embedment_mm)
            .ok_or_else(|| CalcError::from(unknown_diameter(entry, diameter_mm)))?;
        let exact_depth = (nearest.embedment_mm - embedment_mm).abs() < DEPTH_EPSILON_MM;

        let found = match options.policy {
            EmbedmentPolicy::Nearest => {
                if !exact_depth {
                    check_tolerance(entry, table, embedment_mm, nearest.embedment_mm, options.tolerance)?;
                }
                let values = nearest.grades.get(&grade).copied().ok_or_else(|| {
                    CalcError::from(CatalogLookupError::UnknownGrade {
                        product: entry.name.clone(),
                        diameter_mm,
                        embedment_mm: nearest.embedment_mm,
                        grade: grade.to_string(),
                    })
                })?;
                matched(entry, table, grade, embedment_mm, nearest.embedment_mm, exact_depth, false, values)
            }
            EmbedmentPolicy::Interpolate => match nearest.grades.get(&grade) {
                Some(values) if exact_depth => {
                    matched(entry, table, grade, embedment_mm, nearest.embedment_mm, true, false, *values)
                }
                _ => {
                    let (lo, hi) = span(table);
                    if embedment_mm < lo || embedment_mm > hi {
                        check_tolerance(entry, table, embedment_mm, nearest.embedment_mm, options.tolerance)?;
                    }
                    let values = interpolate_values(entry, table, nearest, embedment_mm, grade)?;
                    matched(entry, table, grade, embedment_mm, embedment_mm, false, true, values)
                }
            },
        };

        tracing::debug!(
            product = %found.product,
            diameter_mm = found.diameter_mm,
            requested_mm = found.requested_embedment_mm,
            resolved_mm = found.resolved_embedment_mm,
            exact = found.exact,
            "catalog lookup"
        );
        Ok(found)
    }
}

#[allow(clippy::too_many_arguments)]
fn matched(
    product: &Product,
    table: &DiameterTable,
    grade: ConcreteGrade,
    requested_mm: f64,
    resolved_mm: f64,
    exact: bool,
    interpolated: bool,
    values: CharacteristicValues,
) -> CatalogMatch {
    CatalogMatch {
        product: product.name.clone(),
        kind: product.kind,
        approval: product.approval.clone(),
        diameter_mm: table.diameter_mm,
        grade,
        requested_embedment_mm: requested_mm,
        resolved_embedment_mm: resolved_mm,
        exact,
        interpolated,
        values,
    }
}

fn unknown_diameter(product: &Product, diameter_mm: f64) -> CatalogLookupError {
    CatalogLookupError::UnknownDiameter {
        product: product.name.clone(),
        diameter_mm,
    }
}

fn require_diameter(product: &Product, diameter_mm: f64) -> CalcResult<&DiameterTable> {
    product
        .diameter(diameter_mm)
        .ok_or_else(|| unknown_diameter(product, diameter_mm).into())
}

fn span(table: &DiameterTable) -> (f64, f64) {
    table
        .rows
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.embedment_mm), hi.max(r.embedment_mm))
        })
}

fn check_tolerance(
    product: &Product,
    table: &DiameterTable,
    requested_mm: f64,
    nearest_mm: f64,
    tolerance: f64,
) -> CalcResult<()> {
    let relative = (requested_mm - nearest_mm).abs() / nearest_mm;
    if relative > tolerance {
        return Err(CatalogLookupError::EmbedmentOutOfRange {
            product: product.name.clone(),
            diameter_mm: f64::from(table.diameter_mm),
            requested_mm,
            nearest_mm,
            tolerance_pct: tolerance * 100.0,
        }
        .into());
    }
    Ok(())
}

/// Interpolate every characteristic value over depth × cylinder strength.
fn interpolate_values(
    product: &Product,
    table: &DiameterTable,
    nearest: &EmbedmentRow,
    embedment_mm: f64,
    grade: ConcreteGrade,
) -> CalcResult<CharacteristicValues> {
    if table.rows.iter().all(|r| r.grades.is_empty()) {
        return Err(CatalogLookupError::UnknownGrade {
            product: product.name.clone(),
            diameter_mm: f64::from(table.diameter_mm),
            embedment_mm,
            grade: grade.to_string(),
        }
        .into());
    }

    let fck = grade.cylinder_strength_mpa();
    let surface = |value: fn(&CharacteristicValues) -> f64| -> CalcResult<f64> {
        let rows = table.rows.iter().filter(|r| !r.grades.is_empty()).map(|r| {
            let points: Vec<(f64, f64)> = r
                .grades
                .iter()
                .map(|(g, v)| (g.cylinder_strength_mpa(), value(v)))
                .collect();
            (r.embedment_mm, points)
        });
        Ok(Table2D::new(rows)?.eval(embedment_mm, fck))
    };

    let head_bearing_area_mm2 = nearest.grades.values().find_map(|v| v.head_bearing_area_mm2);

    Ok(CharacteristicValues {
        n_rk_s_kn: surface(|v| v.n_rk_s_kn)?,
        n_rk_p_kn: surface(|v| v.n_rk_p_kn)?,
        v_rk_s_kn: surface(|v| v.v_rk_s_kn)?,
        s_cr_n_mm: surface(|v| v.s_cr_n_mm)?,
        c_cr_n_mm: surface(|v| v.c_cr_n_mm)?,
        l_f_mm: surface(|v| v.l_f_mm)?,
        head_bearing_area_mm2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nearest() -> LookupOptions {
        LookupOptions::default()
    }

    #[test]
    fn test_exact_lookup() {
        let found = builtin()
            .lookup("HUS4-H", 12.0, 79.9, ConcreteGrade::C20_25, &nearest())
            .unwrap();
        assert!(found.exact);
        assert_eq!(found.values.n_rk_s_kn, 79.0);
        assert_eq!(found.values.n_rk_p_kn, 11.4);
        assert_eq!(found.kind, AnchorKind::Screw);
        assert_eq!(found.warning(), None);
    }

    #[test]
    fn test_within_tolerance_substitutes_and_reports() {
        // 85 mm is 6.4% above 79.9 mm
        let found = builtin()
            .lookup("HUS4-H", 12.0, 85.0, ConcreteGrade::C20_25, &nearest())
            .unwrap();
        assert!(!found.exact);
        assert_eq!(found.resolved_embedment_mm, 79.9);
        assert_eq!(
            found.warning(),
            Some(DesignWarning::EmbedmentSubstituted {
                requested_mm: 85.0,
                resolved_mm: 79.9
            })
        );
    }

    #[test]
    fn test_outside_tolerance_fails() {
        // HUS3-H M12 only has 60 mm; 72 mm is 20% off
        let err = builtin()
            .lookup("HUS3-H", 12.0, 72.0, ConcreteGrade::C20_25, &nearest())
            .unwrap_err();
        assert_eq!(err.error_code(), "EMBEDMENT_OUT_OF_RANGE");
    }

    #[test]
    fn test_unknown_product_diameter_grade() {
        let catalog = builtin();
        let err = catalog
            .lookup("NOPE", 12.0, 80.0, ConcreteGrade::C20_25, &nearest())
            .unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_PRODUCT");

        let err = catalog
            .lookup("HUS4-H", 13.0, 80.0, ConcreteGrade::C20_25, &nearest())
            .unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_DIAMETER");

        let err = catalog
            .lookup("HUS4-H", 12.0, 79.9, ConcreteGrade::C40_50, &nearest())
            .unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_GRADE");
    }

    #[test]
    fn test_product_names_ignore_spacing_and_case() {
        let catalog = builtin();
        assert_eq!(catalog.product("HIT-HY200").unwrap().name, "HIT-HY 200");
        assert_eq!(catalog.product("hit-re 500").unwrap().name, "HIT-RE 500");
    }

    #[test]
    fn test_interpolated_depth_and_grade() {
        let options = LookupOptions {
            policy: EmbedmentPolicy::Interpolate,
            ..LookupOptions::default()
        };
        let catalog = builtin();

        let found = catalog
            .lookup("HUS4-H", 12.0, 90.0, ConcreteGrade::C20_25, &options)
            .unwrap();
        assert!(found.interpolated);
        assert!(found.values.n_rk_p_kn > 11.4 && found.values.n_rk_p_kn < 14.3);
        assert_eq!(found.values.n_rk_s_kn, 79.0);

        // Grade between tabulated columns
        let grade = ConcreteGrade::new(22, 28);
        let found = catalog.lookup("HUS4-H", 12.0, 100.0, grade, &options).unwrap();
        assert!(found.values.n_rk_p_kn > 14.3 && found.values.n_rk_p_kn < 16.0);
        assert!(matches!(found.warning(), Some(DesignWarning::CatalogInterpolated { .. })));

        // Exact hit is not interpolated
        let found = catalog
            .lookup("HUS4-H", 12.0, 100.0, ConcreteGrade::C25_30, &options)
            .unwrap();
        assert!(found.exact && !found.interpolated);

        // Still bounded outside the tabulated span
        assert!(catalog
            .lookup("HUS4-H", 12.0, 160.0, ConcreteGrade::C20_25, &options)
            .is_err());
    }

    #[test]
    fn test_listing() {
        let catalog = builtin();
        let summaries = catalog.summaries();
        assert_eq!(summaries.len(), 10);
        let hus4 = summaries.iter().find(|s| s.name == "HUS4-H").unwrap();
        assert_eq!(hus4.diameters_mm, vec![6, 8, 10, 12, 14, 16, 20, 24]);
        assert_eq!(hus4.grades.len(), 3);
        assert_eq!(catalog.embedments("HUS4-H", 12.0).unwrap(), vec![79.9, 100.0, 122.0]);
    }

    #[test]
    fn test_catalog_json_round_trip() {
        let json = serde_json::to_string(builtin()).unwrap();
        let back: ProductCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, builtin());
    }

    #[test]
    fn test_duplicate_products_rejected() {
        let product = builtin().product("HDA").unwrap().clone();
        let err = ProductCatalog::new(vec![product.clone(), product]).unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
    }
}