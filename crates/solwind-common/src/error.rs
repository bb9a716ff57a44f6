//! Error types for the Solwind platform
//!
//! Provides a unified error type and the calculation error taxonomy

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias using SolwindError
pub type Result<T> = std::result::Result<T, SolwindError>;

/// Unified error type for Solwind operations
#[derive(Debug, Error)]
pub enum SolwindError {
    // Calculation errors
    #[error("Calculation error: {0}")]
    Calc(#[from] CalcError),

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Lookup errors
    #[error("Not found: {0}")]
    NotFound(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Calculation errors raised synchronously by the cost and profit engines.
///
/// No calculation returns a partial result alongside one of these.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalcError {
    #[error("Unrecognized unit label: {label:?}")]
    InvalidUnit { label: String },

    #[error("Project capacity is missing or not positive")]
    MissingCapacity,

    #[error("Invalid input for {field}: {value}")]
    InvalidInput { field: &'static str, value: String },

    #[error("Invalid cost catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid tier schedule: {0}")]
    InvalidTierSchedule(String),
}

impl CalcError {
    /// Build an `InvalidInput` for a decimal field
    pub fn invalid(field: &'static str, value: Decimal) -> Self {
        CalcError::InvalidInput {
            field,
            value: value.to_string(),
        }
    }

    /// Reject a negative amount for the named field
    pub fn ensure_non_negative(field: &'static str, value: Decimal) -> std::result::Result<(), Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(Self::invalid(field, value));
        }
        Ok(())
    }
}

// Implement From for common external error types
impl From<serde_json::Error> for SolwindError {
    fn from(err: serde_json::Error) -> Self {
        SolwindError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for SolwindError {
    fn from(err: std::io::Error) -> Self {
        SolwindError::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for SolwindError {
    fn from(err: anyhow::Error) -> Self {
        SolwindError::Internal(err.to_string())
    }
}
