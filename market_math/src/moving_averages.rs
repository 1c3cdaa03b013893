//! Moving average calculation implementations
//!
//! Contains:
//! - Simple Moving Average (SMA) over a trailing window
//! - A whole-series variant that leaves the warm-up region unsmoothed

use crate::statistics::mean;
use crate::{MathError, Result};

/// Simple Moving Average (SMA) implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleMovingAverage {
    period: usize,
}

impl SimpleMovingAverage {
    /// Create a new Simple Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self { period })
    }

    /// Mean of the window ending at `index`, if the window is full
    pub fn value_at(&self, values: &[f64], index: usize) -> Result<f64> {
        if index >= values.len() {
            return Err(MathError::InvalidInput(format!(
                "Index {} out of range for {} values",
                index,
                values.len()
            )));
        }
        if index + 1 < self.period {
            return Err(MathError::InsufficientData(format!(
                "Not enough data for SMA calculation. Need {} values, have {}.",
                self.period,
                index + 1
            )));
        }

        // Each window is summed afresh so the result stays within the inputs' range
        mean(&values[index + 1 - self.period..=index])
    }

    /// Smooth a whole series.
    ///
    /// Positions before the window is full keep their raw value, so the
    /// output has the same length as the input and never contains NaN.
    pub fn apply(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| self.value_at(values, i).unwrap_or(v))
            .collect()
    }
}

/// Trailing simple moving average of `values` with the given period
pub fn trailing_moving_average(values: &[f64], period: usize) -> Result<Vec<f64>> {
    Ok(SimpleMovingAverage::new(period)?.apply(values))
}
