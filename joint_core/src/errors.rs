//! # Error Types
//!
//! Structured error types for joint_core. A joint evaluation fails in exactly
//! two ways: the requested bolt-row topology is not supported
//! ([`CalcError::InvalidConfiguration`]) or a value that ends up in a
//! denominator, length or stiffness is zero, negative or NaN
//! ([`CalcError::InvalidInput`]). Both abort the evaluation of that joint;
//! there are no partial results.
//!
//! ## Example
//!
//! ```rust
//! use joint_core::errors::{CalcError, CalcResult};
//!
//! fn validate_thickness(t_p: f64) -> CalcResult<()> {
//!     if !(t_p > 0.0) {
//!         return Err(CalcError::InvalidInput {
//!             field: "end_plate.thickness".to_string(),
//!             value: t_p.to_string(),
//!             reason: "Plate thickness must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for joint_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for joint evaluation.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// A numeric input is outside its valid domain (zero denominator,
    /// negative length, non-positive stiffness, ...)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Row index, case type or row count not supported by the joint topology
    #[error("Invalid configuration for {item}: {reason}")]
    InvalidConfiguration { item: String, reason: String },

    /// Section designation not found in a section table
    #[error("Section not found: {designation}")]
    SectionNotFound { designation: String },

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

    /// Create an InvalidConfiguration error
    pub fn invalid_configuration(item: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidConfiguration {
            item: item.into(),
            reason: reason.into(),
        }
    }

    /// Create a SectionNotFound error
    pub fn section_not_found(designation: impl Into<String>) -> Self {
        CalcError::SectionNotFound {
            designation: designation.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            CalcError::SectionNotFound { .. } => "SECTION_NOT_FOUND",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

/// Return `value` if it is strictly positive, otherwise an `InvalidInput`.
///
/// NaN fails the check as well, so a NaN never reaches a denominator.
pub fn require_positive(field: &str, value: f64) -> CalcResult<f64> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::invalid_input(field, value.to_string(), "must be a positive, finite number"))
    }
}

/// Return `value` if it is zero or positive, otherwise an `InvalidInput`.
pub fn require_non_negative(field: &str, value: f64) -> CalcResult<f64> {
    if value >= 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::invalid_input(field, value.to_string(), "must be zero or positive"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_configuration("bolt row 5", "at most 4 rows are supported");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("InvalidConfiguration"));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::invalid_input("gamma_m0", "0", "zero").error_code(), "INVALID_INPUT");
        assert_eq!(
            CalcError::invalid_configuration("row", "bad").error_code(),
            "INVALID_CONFIGURATION"
        );
        assert_eq!(CalcError::section_not_found("HEA999").error_code(), "SECTION_NOT_FOUND");
    }

    #[test]
    fn test_require_positive() {
        assert_eq!(require_positive("m", 12.5), Ok(12.5));
        assert!(require_positive("m", 0.0).is_err());
        assert!(require_positive("m", -1.0).is_err());
        assert!(require_positive("m", f64::NAN).is_err());
        assert!(require_positive("m", f64::INFINITY).is_err());
    }

    #[test]
    fn test_require_non_negative() {
        assert_eq!(require_non_negative("s", 0.0), Ok(0.0));
        assert!(require_non_negative("s", -0.1).is_err());
    }

    #[test]
    fn test_from_serde_error() {
        let err: CalcError = serde_json::from_str::<f64>("not json").unwrap_err().into();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
