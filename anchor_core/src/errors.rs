//! # Error Types
//!
//! Structured error and warning types for anchor_core.
//!
//! Errors stop an evaluation: configuration problems (`InvalidInput`,
//! `MissingField`), catalog misses (`CatalogLookup`) and malformed product
//! strings or grade labels. Warnings ([`DesignWarning`]) never stop an
//! evaluation; they are collected into the result so the caller can see that
//! concrete strength fell outside the validated range, that the catalog
//! substituted a neighbouring embedment depth, or that a degenerate factor
//! was replaced by 1.0.
//!
//! ## Example
//!
//! ```rust
//! use anchor_core::errors::{CalcError, CalcResult};
//!
//! fn validate_thickness(h_mm: f64) -> CalcResult<()> {
//!     if h_mm <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "member_thickness_mm",
//!             h_mm.to_string(),
//!             "Member thickness must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for anchor_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for capacity evaluation.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, non-positive geometry, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing (e.g. spacing for an anchor group)
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Product catalog lookup failed
    #[error(transparent)]
    CatalogLookup(#[from] CatalogLookupError),

    /// A compact product string could not be decoded
    #[error("Invalid product string '{input}': {reason}")]
    ProductString { input: String, reason: String },

    /// A concrete grade label could not be parsed
    #[error("Invalid concrete grade '{input}': {reason}")]
    ConcreteGrade { input: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a ProductString error
    pub fn product_string(input: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ProductString {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a ConcreteGrade error
    pub fn concrete_grade(input: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ConcreteGrade {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the anchor configuration itself
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, CalcError::InvalidInput { .. } | CalcError::MissingField { .. })
    }

    /// Check if this is a recoverable error (e.g., can retry).
    ///
    /// Evaluations are deterministic, so only file operations qualify.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileError { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::CatalogLookup(inner) => inner.error_code(),
            CalcError::ProductString { .. } => "INVALID_PRODUCT_STRING",
            CalcError::ConcreteGrade { .. } => "INVALID_CONCRETE_GRADE",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

/// Product catalog lookup failures.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind")]
pub enum CatalogLookupError {
    #[error("Unknown product: '{product}'")]
    UnknownProduct { product: String },

    #[error("Diameter {diameter_mm} mm is not tabulated for {product}")]
    UnknownDiameter { product: String, diameter_mm: f64 },

    #[error("Concrete grade {grade} is not tabulated for {product} M{diameter_mm} at h_ef = {embedment_mm} mm")]
    UnknownGrade {
        product: String,
        diameter_mm: f64,
        embedment_mm: f64,
        grade: String,
    },

    #[error(
        "Embedment {requested_mm} mm is outside the {tolerance_pct}% window of the nearest tabulated depth {nearest_mm} mm for {product} M{diameter_mm}"
    )]
    EmbedmentOutOfRange {
        product: String,
        diameter_mm: f64,
        requested_mm: f64,
        nearest_mm: f64,
        tolerance_pct: f64,
    },
}

impl CatalogLookupError {
    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CatalogLookupError::UnknownProduct { .. } => "UNKNOWN_PRODUCT",
            CatalogLookupError::UnknownDiameter { .. } => "UNKNOWN_DIAMETER",
            CatalogLookupError::UnknownGrade { .. } => "UNKNOWN_GRADE",
            CatalogLookupError::EmbedmentOutOfRange { .. } => "EMBEDMENT_OUT_OF_RANGE",
        }
    }
}

/// Non-fatal findings recorded during an evaluation.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum DesignWarning {
    /// Concrete strength outside the validated range of the standard
    #[error("Concrete strength {fck_mpa} MPa is outside the validated range {min_mpa}-{max_mpa} MPa")]
    ConcreteStrengthOutOfRange {
        fck_mpa: f64,
        min_mpa: f64,
        max_mpa: f64,
    },

    /// Catalog resolved a neighbouring tabulated embedment depth
    #[error("Embedment {requested_mm} mm not tabulated; using {resolved_mm} mm")]
    EmbedmentSubstituted { requested_mm: f64, resolved_mm: f64 },

    /// Catalog values were interpolated between tabulated rows
    #[error("Catalog values interpolated for h_ef = {embedment_mm} mm, fck = {fck_mpa} MPa")]
    CatalogInterpolated { embedment_mm: f64, fck_mpa: f64 },

    /// A guarded division was replaced by a neutral factor of 1.0
    #[error("Degenerate {factor}: {reason}; using 1.0")]
    DegenerateFactor { factor: String, reason: String },
}

impl DesignWarning {
    /// Create a DegenerateFactor warning
    pub fn degenerate(factor: impl Into<String>, reason: impl Into<String>) -> Self {
        DesignWarning::DegenerateFactor {
            factor: factor.into(),
            reason: reason.into(),
        }
    }

    /// Short code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            DesignWarning::ConcreteStrengthOutOfRange { .. } => "STANDARD_RANGE",
            DesignWarning::EmbedmentSubstituted { .. } => "EMBEDMENT_SUBSTITUTED",
            DesignWarning::CatalogInterpolated { .. } => "CATALOG_INTERPOLATED",
            DesignWarning::DegenerateFactor { .. } => "COMPUTATION_DEGENERATE",
        }
    }
}
