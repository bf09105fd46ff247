//! Error types for the rules engine.
//!
//! Calculations themselves are total and never fail. These errors cover the
//! fallible edges around them: loading configuration, validating policy values
//! and rejecting duplicate submissions.

use thiserror::Error;

/// The main error type for the rules engine.
///
/// # Example
///
/// ```
/// use erp_rules_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/policy.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/policy.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A policy value parsed correctly but cannot be used.
    #[error("Invalid policy value '{field}': {message}")]
    InvalidPolicy {
        /// The policy field that was rejected.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// The same submission was already accepted inside its suppression window.
    #[error("Duplicate request suppressed: {reason}")]
    DuplicateRequest {
        /// Which window matched (content hash or idempotency key).
        reason: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
