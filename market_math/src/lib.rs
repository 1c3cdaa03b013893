//! # Market Math
//!
//! Numeric building blocks for sparse monthly series.
//! This crate provides the statistics, least-squares regression and
//! exponential smoothing used by the job market analytics engine.

use thiserror::Error;

pub mod moving_averages;
pub mod regression;
pub mod smoothing;
pub mod statistics;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Errors that can occur in numeric calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MathError::InsufficientData("need 2 points".to_string());
        assert_eq!(err.to_string(), "Insufficient data for calculation: need 2 points");
    }
}
