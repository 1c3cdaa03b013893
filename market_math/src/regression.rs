//! Ordinary least squares trend fitting
//!
//! Fits `y = intercept + slope * x` where `x` is the integer position of each
//! observation (0, 1, 2, ...), then extrapolates along that line.

use crate::{MathError, Result};
use serde::Serialize;

/// Linear Regression fitted against the observation index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearRegression {
    slope: f64,
    intercept: f64,
    observations: usize,
    r_squared: Option<f64>,
}

impl LinearRegression {
    /// Fit the regression to `values`, using each value's index as `x`
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.len() < 2 {
            return Err(MathError::InsufficientData(
                "Not enough data for linear regression. Need at least 2 points.".to_string(),
            ));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Linear regression requires finite values".to_string(),
            ));
        }

        let n = values.len() as f64;
        let x_mean = (0..values.len()).map(|i| i as f64).sum::<f64>() / n;
        let y_mean = values.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for (i, &y) in values.iter().enumerate() {
            let x = i as f64;
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        if denominator.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        let intercept = y_mean - slope * x_mean;

        let ss_total: f64 = values.iter().map(|y| (y - y_mean).powi(2)).sum();
        let ss_residual: f64 = values
            .iter()
            .enumerate()
            .map(|(i, y)| (y - (intercept + slope * i as f64)).powi(2))
            .sum();

        // Undefined for a constant series
        let r_squared = (ss_total > 1e-10).then(|| 1.0 - ss_residual / ss_total);

        Ok(Self {
            slope,
            intercept,
            observations: values.len(),
            r_squared,
        })
    }

    /// Value of the fitted line at index `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Fitted values for the `periods` indices following the training data
    pub fn forecast(&self, periods: usize) -> Vec<f64> {
        (self.observations..self.observations + periods)
            .map(|x| self.predict(x as f64))
            .collect()
    }

    /// Change in `y` per index step
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Value of the line at index 0
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Number of observations the line was fitted to
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Coefficient of determination, `None` for a constant series
    pub fn r_squared(&self) -> Option<f64> {
        self.r_squared
    }
}
