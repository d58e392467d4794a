//! # Error Types
//!
//! Structured error types for seismic_core. Every variant here is a
//! configuration or lookup defect: an unknown enum value, a missing table
//! entry or an input outside the engine's contract. Code-eligibility
//! failures are *not* errors; they come back as
//! [`CoefficientOutcome::Ineligible`](crate::building::CoefficientOutcome).
//!
//! ## Example
//!
//! ```rust
//! use seismic_core::errors::{SeismicError, SeismicResult};
//!
//! fn validate_height(height_m: f64) -> SeismicResult<()> {
//!     if height_m <= 0.0 {
//!         return Err(SeismicError::invalid_input(
//!             "height_m",
//!             height_m.to_string(),
//!             "Height must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for seismic_core operations
pub type SeismicResult<T> = Result<T, SeismicError>;

/// Structured error type for seismic calculations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum SeismicError {
    /// An input value is invalid (out of range, not finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Risk level does not name one of the four hazard categories
    #[error("Unknown risk level: {value}")]
    UnknownRiskLevel { value: String },

    /// Importance factor is not one of the code values
    #[error("Unknown importance factor: {value}")]
    UnknownImportanceFactor { value: String },

    /// Soil class missing from the soil table
    #[error("Unknown soil type: {soil_type}")]
    UnknownSoilType { soil_type: String },

    /// Soil class exists but has no spectral shape for this acceleration
    #[error("No spectral parameters for soil type {soil_type} at acceleration ratio {acceleration}")]
    SoilAccelerationNotFound {
        soil_type: String,
        acceleration: f64,
    },

    /// (system type, lateral type) pair missing from the system table
    #[error("Structure system not found: '{system_type}' / '{lateral_type}'")]
    SystemNotFound {
        system_type: String,
        lateral_type: String,
    },

    /// A supplied code table is malformed
    #[error("Code table error: {reason}")]
    TableError { reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl SeismicError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SeismicError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownRiskLevel error
    pub fn unknown_risk_level(value: impl Into<String>) -> Self {
        SeismicError::UnknownRiskLevel { value: value.into() }
    }

    /// Create an UnknownImportanceFactor error
    pub fn unknown_importance_factor(value: impl Into<String>) -> Self {
        SeismicError::UnknownImportanceFactor { value: value.into() }
    }

    /// Create an UnknownSoilType error
    pub fn unknown_soil_type(soil_type: impl Into<String>) -> Self {
        SeismicError::UnknownSoilType {
            soil_type: soil_type.into(),
        }
    }

    /// Create a SystemNotFound error
    pub fn system_not_found(
        system_type: impl Into<String>,
        lateral_type: impl Into<String>,
    ) -> Self {
        SeismicError::SystemNotFound {
            system_type: system_type.into(),
            lateral_type: lateral_type.into(),
        }
    }

    /// Create a TableError
    pub fn table_error(reason: impl Into<String>) -> Self {
        SeismicError::TableError { reason: reason.into() }
    }

    /// True for out-of-range inputs and for lookup failures against enums
    /// or code tables.
    ///
    /// These indicate an input or data defect, never a design outcome, and
    /// are not worth retrying.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            SeismicError::InvalidInput { .. }
                | SeismicError::UnknownRiskLevel { .. }
                | SeismicError::UnknownImportanceFactor { .. }
                | SeismicError::UnknownSoilType { .. }
                | SeismicError::SoilAccelerationNotFound { .. }
                | SeismicError::SystemNotFound { .. }
                | SeismicError::TableError { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            SeismicError::InvalidInput { .. } => "INVALID_INPUT",
            SeismicError::UnknownRiskLevel { .. } => "UNKNOWN_RISK_LEVEL",
            SeismicError::UnknownImportanceFactor { .. } => "UNKNOWN_IMPORTANCE_FACTOR",
            SeismicError::UnknownSoilType { .. } => "UNKNOWN_SOIL_TYPE",
            SeismicError::SoilAccelerationNotFound { .. } => "SOIL_ACCELERATION_NOT_FOUND",
            SeismicError::SystemNotFound { .. } => "SYSTEM_NOT_FOUND",
            SeismicError::TableError { .. } => "TABLE_ERROR",
            SeismicError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for SeismicError {
    fn from(e: serde_json::Error) -> Self {
        SeismicError::SerializationError { reason: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = SeismicError::system_not_found("Moment frame", "Timber frame");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: SeismicError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(SeismicError::unknown_soil_type("V").error_code(), "UNKNOWN_SOIL_TYPE");
        assert_eq!(SeismicError::unknown_risk_level("extreme").error_code(), "UNKNOWN_RISK_LEVEL");
    }

    #[test]
    fn test_configuration_classification() {
        assert!(SeismicError::unknown_soil_type("V").is_configuration_error());
        assert!(SeismicError::system_not_found("a", "b").is_configuration_error());
        let height = SeismicError::invalid_input("height", "-1", "Height must be positive");
        assert!(height.is_configuration_error());
        let serialization = SeismicError::SerializationError {
            reason: "expected value".to_string(),
        };
        assert!(!serialization.is_configuration_error());
    }

    #[test]
    fn test_display_message() {
        let error = SeismicError::SoilAccelerationNotFound {
            soil_type: "IV".to_string(),
            acceleration: 0.4,
        };
        assert_eq!(
            error.to_string(),
            "No spectral parameters for soil type IV at acceleration ratio 0.4"
        );
    }
}
