//! Error types for the workload engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Only conditions that must stop a batch run are errors. Malformed
//! configuration, rejected rows and unparseable numbers are recovered
//! locally and never reach this type.

use thiserror::Error;

/// The main error type for the workload engine.
///
/// # Example
///
/// ```
/// use workload_engine::error::EngineError;
///
/// let error = EngineError::UnsupportedAdjustmentMode {
///     mode: "average".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Unsupported co-convened adjustment mode 'average' (expected 'collapse' or 'split')"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file or directory was not found at the specified path.
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

    /// The co-convened adjustment mode is neither `collapse` nor `split`.
    #[error("Unsupported co-convened adjustment mode '{mode}' (expected 'collapse' or 'split')")]
    UnsupportedAdjustmentMode {
        /// The mode that was requested.
        mode: String,
    },

    /// A course load was mutated in an order its state does not allow.
    #[error("Invalid load transition for course '{course}': {message}")]
    InvalidLoadTransition {
        /// Label of the course whose load was being changed.
        course: String,
        /// A description of the rejected transition.
        message: String,
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
