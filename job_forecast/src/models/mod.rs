//! Forecasting models for monthly posting counts

use crate::data::{MonthKey, MonthlySeries};
use crate::error::{ForecastError, Result};
use crate::utils::future_months;
use serde::Serialize;
use std::fmt::Debug;

/// One forecast month with its confidence band
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub month: MonthKey,
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Point forecasts for consecutive future months plus the history they came from.
///
/// Every point satisfies `0 <= lower <= value <= upper`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    points: Vec<ForecastPoint>,
    historical: MonthlySeries,
}

impl ForecastResult {
    /// Build a result whose first point is the month after the last historical month.
    ///
    /// Counts cannot be negative, so values are floored at zero before the
    /// symmetric `band_half_width` is applied and the lower band is clipped.
    pub fn new(historical: MonthlySeries, values: &[f64], band_half_width: f64) -> Result<Self> {
        let last = historical.last_month().ok_or_else(|| {
            ForecastError::DataError("Cannot forecast from an empty series".to_string())
        })?;
        if !(band_half_width >= 0.0 && band_half_width.is_finite()) {
            return Err(ForecastError::ValidationError(format!(
                "Band half-width must be a non-negative number, got {}",
                band_half_width
            )));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(ForecastError::ValidationError(format!(
                "Forecast value {} is not finite",
                bad
            )));
        }

        let points = future_months(last, values.len())
            .into_iter()
            .zip(values)
            .map(|(month, &raw)| {
                let value = raw.max(0.0);
                ForecastPoint {
                    month,
                    value,
                    lower: (value - band_half_width).max(0.0),
                    upper: value + band_half_width,
                }
            })
            .collect();

        Ok(Self { points, historical })
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    /// Number of periods forecasted
    pub fn horizons(&self) -> usize {
        self.points.len()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn lower_band(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.lower).collect()
    }

    pub fn upper_band(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.upper).collect()
    }

    /// The series the forecast was produced from
    pub fn historical(&self) -> &MonthlySeries {
        &self.historical
    }
}

/// What the smoothing forecaster produced for a series
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ForecastOutcome {
    /// The seasonal model fitted and produced a forecast
    Forecast(ForecastResult),
    /// Too little history to attempt a forecast
    InsufficientData { nonzero_points: usize, required: usize },
    /// The model could not be fitted; a flat forecast of the last value was used
    ModelFailureFallback { result: ForecastResult, reason: String },
}

impl ForecastOutcome {
    /// The forecast, whether modelled or fallback
    pub fn result(&self) -> Option<&ForecastResult> {
        match self {
            ForecastOutcome::Forecast(result) => Some(result),
            ForecastOutcome::ModelFailureFallback { result, .. } => Some(result),
            ForecastOutcome::InsufficientData { .. } => None,
        }
    }

    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, ForecastOutcome::InsufficientData { .. })
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ForecastOutcome::ModelFailureFallback { .. })
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Point forecasts for the next `horizons` periods
    fn forecast(&self, horizons: usize) -> Vec<f64>;

    /// In-sample one-step-ahead fitted values
    fn fitted_values(&self) -> &[f64];

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a monthly series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a monthly series
    fn train(&self, series: &MonthlySeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod holt_winters;
pub mod naive;
