//! Error Types
//!
//! Errors are surfaced to the caller and stop the run; they never leave
//! partially mutated learning state behind.

use thiserror::Error;

/// Simulation error taxonomy
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A tuning value fails validation (non-positive radius or grid size,
    /// negative learning rate or beta, empty action set, ...)
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Softmax normalization produced a non-finite or degenerate value
    #[error("numeric instability: {0}")]
    NumericInstability(String),

    /// Tuning file could not be read
    #[error("io error: {0}")]
    Io(String),

    /// Tuning file could not be parsed
    #[error("parse error: {0}")]
    Parse(String),
}
