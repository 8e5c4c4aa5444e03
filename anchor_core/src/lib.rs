//! # anchor_core - Concrete Anchor Design Capacity Engine
//!
//! `anchor_core` evaluates the design resistance of post-installed anchors in
//! concrete to ETAG 001 Annex C, with the seismic reductions of EOTA TR 045.
//! Every failure mode is computed, the minimum governs, and an optional
//! tension-shear interaction check closes the evaluation. All inputs and
//! outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: pure functions over immutable inputs; the catalog is read-only
//! - **JSON-First**: all types implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, plus non-fatal warnings on the result
//! - **Auditable**: every mode carries its intermediate factors and clause reference
//!
//! ## Quick Start
//!
//! ```rust
//! use anchor_core::prelude::*;
//!
//! let config = AnchorConfiguration::new(12.0, 79.9, 200.0, ConcreteGrade::C20_25, 1.0)
//!     .with_edge_distance(100.0, None);
//! let result = evaluate(
//!     catalog::builtin(),
//!     "HUS4-H",
//!     &config,
//!     Some(LoadDemand::new(4.0, 2.0)),
//!     &DesignSettings::default(),
//! )
//! .unwrap();
//!
//! println!("{}", result.format_report());
//! assert_eq!(result.passes(), Some(true));
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Product catalog, tolerance matching and product strings
//! - [`interpolation`] - 1-D and 2-D table interpolation
//! - [`concrete`] - Concrete grades and cracked/uncracked state
//! - [`configuration`] - Anchor configuration and load demand
//! - [`geometry`] - Projected areas and geometry factors
//! - [`factors`] - Safety, cracking, seismic and gap factor selection
//! - [`failure_modes`] - Per-mode capacity calculators
//! - [`capacity`] - Governing capacity and interaction check
//! - [`evaluation`] - Entry points, single and batch
//! - [`settings`] - Coefficient tables and evaluation settings
//! - [`errors`] - Structured error and warning types
//! - [`file_io`] - JSON files with atomic saves

pub mod capacity;
pub mod catalog;
pub mod concrete;
pub mod configuration;
pub mod errors;
pub mod evaluation;
pub mod factors;
pub mod failure_modes;
pub mod file_io;
pub mod geometry;
pub mod interpolation;
pub mod settings;

// Re-export commonly used types at crate root for convenience
pub use capacity::{CapacityResult, GoverningCapacity, InteractionCheck};
pub use catalog::{ProductCatalog, ProductDesignation};
pub use concrete::{fck_to_grade, grade_to_fck, ConcreteCondition, ConcreteGrade};
pub use configuration::{AnchorConfiguration, AnchorGroup, LoadDemand};
pub use errors::{CalcError, CalcResult, CatalogLookupError, DesignWarning};
pub use evaluation::{evaluate, evaluate_batch, evaluate_product_string, AnchorCheck, CheckOutcome};
pub use failure_modes::{FailureMode, LoadDirection, ModeResult};
pub use settings::{CoefficientTable, DesignSettings, EmbedmentPolicy, InteractionLimit};

/// Everything needed for a typical evaluation.
pub mod prelude {
    pub use crate::catalog;
    pub use crate::{
        evaluate, evaluate_batch, evaluate_product_string, AnchorCheck, AnchorConfiguration, CalcError,
        CalcResult, CapacityResult, ConcreteCondition, ConcreteGrade, DesignSettings, FailureMode,
        InteractionLimit, LoadDemand,
    };
}
