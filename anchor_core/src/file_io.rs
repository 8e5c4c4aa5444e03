//! # File I/O Module
//!
//! JSON files for settings, custom catalogs, batches of anchor checks and
//! evaluation results.
//!
//! - **Atomic saves**: write to `.tmp`, sync, rename, so an interrupted save
//!   never leaves a truncated file behind
//! - **Validation on load**: settings and catalogs are checked before use
//!
//! ## Example
//!
//! ```rust,no_run
//! use anchor_core::file_io::{load_checks, load_settings, save_results};
//! use anchor_core::{catalog, evaluation::evaluate_batch};
//! use std::path::Path;
//!
//! let settings = load_settings(Path::new("settings.json"))?;
//! let checks = load_checks(Path::new("checks.json"))?;
//! let outcomes = evaluate_batch(catalog::builtin(), &checks, &settings);
//! save_results(&outcomes, Path::new("results.json"))?;
//! # Ok::<(), anchor_core::errors::CalcError>(())
//! ```

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::catalog::ProductCatalog;
use crate::errors::{CalcError, CalcResult};
use crate::evaluation::{AnchorCheck, CheckOutcome};
use crate::settings::DesignSettings;

/// `results.json` -> `results.json.tmp`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Serialize `value` as pretty JSON with atomic write semantics.
///
/// 1. Serialize to JSON
/// 2. Write to a temporary file beside the target
/// 3. Sync to disk
/// 4. Rename over the target
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = tmp_path_for(path);
    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .sync_all()
        .map_err(|e| CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;
    tracing::debug!(path = %path.display(), bytes = json.len(), "saved");
    Ok(())
}

/// Read and deserialize a JSON file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> CalcResult<T> {
    let mut file =
        File::open(path).map_err(|e| CalcError::file_error("open", path.display().to_string(), e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

/// Load design settings; missing fields take their defaults.
pub fn load_settings(path: &Path) -> CalcResult<DesignSettings> {
    let settings: DesignSettings = load_json(path)?;
    settings.validate()?;
    Ok(settings)
}

/// Load a custom product catalog.
pub fn load_catalog(path: &Path) -> CalcResult<ProductCatalog> {
    let catalog: ProductCatalog = load_json(path)?;
    catalog.validate()?;
    tracing::debug!(path = %path.display(), products = catalog.products().count(), "catalog loaded");
    Ok(catalog)
}

/// Load a JSON array of anchor checks.
pub fn load_checks(path: &Path) -> CalcResult<Vec<AnchorCheck>> {
    load_json(path)
}

/// Save batch outcomes atomically.
pub fn save_results(outcomes: &[CheckOutcome], path: &Path) -> CalcResult<()> {
    save_json(outcomes, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::concrete::ConcreteGrade;
    use crate::configuration::{AnchorConfiguration, LoadDemand};
    use crate::evaluation::evaluate_batch;
    use crate::settings::InteractionLimit;

    #[test]
    fn test_tmp_path_keeps_extension() {
        assert_eq!(
            tmp_path_for(Path::new("/data/results.json")),
            Path::new("/data/results.json.tmp")
        );
    }

    #[test]
    fn test_settings_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = DesignSettings::default().with_interaction_limit(InteractionLimit::Nzs3101);

        save_json(&settings, &path).unwrap();
        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_settings_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "embedment_tolerance": 0.1 }"#).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded.embedment_tolerance, 0.1);
        assert_eq!(loaded.interaction_limit, InteractionLimit::Etag001);
        assert_eq!(loaded.coefficients.gamma_ms, 1.5);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "embedment_tolerance": -0.5 }"#).unwrap();
        assert!(load_settings(&path).unwrap_err().is_configuration_error());
    }

    #[test]
    fn test_catalog_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        save_json(catalog::builtin(), &path).unwrap();

        let loaded = load_catalog(&path).unwrap();
        assert_eq!(&loaded, catalog::builtin());
    }

    #[test]
    fn test_save_results_leaves_no_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        let config = AnchorConfiguration::new(12.0, 79.9, 200.0, ConcreteGrade::C20_25, 1.0);
        let checks = vec![AnchorCheck::new("A1", "HUS4-H", config).with_demand(LoadDemand::new(2.0, 1.0))];
        let outcomes = evaluate_batch(catalog::builtin(), &checks, &DesignSettings::default());

        save_results(&outcomes, &path).unwrap();
        assert!(path.exists());
        assert!(!tmp_path_for(&path).exists());

        let loaded: Vec<CheckOutcome> = load_json(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].label, "A1");
    }

    #[test]
    fn test_load_checks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checks.json");
        fs::write(
            &path,
            r#"[
                {
                    "label": "A1",
                    "product": "HST3",
                    "diameter_mm": 10.0,
                    "embedment_depth_mm": 60.0,
                    "member_thickness_mm": 160.0,
                    "concrete_grade": "C25/30",
                    "gap_factor": 0.5,
                    "number_of_anchors": 2,
                    "spacing_mm": 100.0
                }
            ]"#,
        )
        .unwrap();

        let checks = load_checks(&path).unwrap();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].configuration.gap_factor, 0.5);
        assert_eq!(checks[0].configuration.spacing_mm, Some(100.0));
    }

    #[test]
    fn test_missing_file_is_recoverable() {
        let err = load_settings(Path::new("/nonexistent/settings.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_bad_json_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checks.json");
        fs::write(&path, "not json").unwrap();
        let err = load_checks(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
