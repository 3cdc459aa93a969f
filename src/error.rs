//! Error types for the CTC engine.
//!
//! The solver and the rule lookups never fail: unknown states fall back to
//! default policy and non-convergence is a best-effort result. These errors
//! cover the layers around them, namely loading the rule tables and validating
//! offer requests before a solve.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the CTC engine.
///
/// # Example
///
/// ```
/// use ctc_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/lwf.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/lwf.yaml");
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

    /// A rule table parsed but contains inconsistent data.
    #[error("Invalid {table} rules for '{state}': {message}")]
    InvalidConfig {
        /// The table containing the bad entry (e.g. "professional_tax").
        table: String,
        /// The state whose entry is invalid.
        state: String,
        /// A description of the problem.
        message: String,
    },

    /// An offer request field was missing or out of domain.
    #[error("Invalid request field '{field}': {message}")]
    InvalidRequest {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// PF was declined but Basic falls at or below the statutory wage ceiling.
    #[error("PF is mandatory for Basic Salary <= 15000 (computed basic: {basic})")]
    PfMandatory {
        /// The Basic salary computed with PF switched off.
        basic: Decimal,
    },

    /// A row of a batch failed.
    #[error("Row {row}: {source}")]
    InvalidRow {
        /// The 1-based row number.
        row: usize,
        /// The underlying failure.
        #[source]
        source: Box<EngineError>,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Builds an [`EngineError::InvalidRequest`].
    pub fn invalid_request(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            field: field.into(),
            message: message.into(),
        }
    }
}
