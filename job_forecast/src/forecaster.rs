//! Posting volume forecasting with Holt-Winters smoothing
//!
//! The band around each point forecast is `z * sd(history)` where `sd` is the
//! sample standard deviation of the whole historical series, not of the model
//! residuals. That width is constant across the horizon.

use crate::config::{ForecastConfig, MIN_NONZERO_POINTS};
use crate::data::{CategoryFilter, JobPosting, MonthlySeries};
use crate::error::Result;
use crate::models::holt_winters::HoltWintersModel;
use crate::models::naive::LastValue;
use crate::models::{ForecastModel, ForecastOutcome, ForecastResult, TrainedForecastModel};
use market_math::statistics::sample_std_dev;
use tracing::{debug, warn};

/// Forecasts monthly posting counts
#[derive(Debug, Clone)]
pub struct VolumeForecaster {
    config: ForecastConfig,
    model: HoltWintersModel,
}

impl VolumeForecaster {
    /// Forecaster for `periods` months with default settings
    pub fn new(periods: usize) -> Result<Self> {
        Self::from_config(ForecastConfig {
            periods,
            ..ForecastConfig::default()
        })
    }

    pub fn from_config(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        let model = HoltWintersModel::new(config.season_length, config.grid_steps)?;
        Ok(Self { config, model })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Build the series for `filter` and forecast it
    pub fn forecast_postings(
        &self,
        postings: &[JobPosting],
        filter: &CategoryFilter,
    ) -> Result<ForecastOutcome> {
        let series = MonthlySeries::from_postings(postings, filter);
        self.forecast_series(&series)
    }

    /// Forecast an already built monthly series
    pub fn forecast_series(&self, series: &MonthlySeries) -> Result<ForecastOutcome> {
        let nonzero_points = series.nonzero_count();
        if nonzero_points < MIN_NONZERO_POINTS {
            debug!(nonzero_points, "not enough history to forecast");
            return Ok(ForecastOutcome::InsufficientData {
                nonzero_points,
                required: MIN_NONZERO_POINTS,
            });
        }

        let required = self.model.min_observations();
        if series.len() < required {
            let reason = format!(
                "{} needs {} months of history, have {}",
                self.model.name(),
                required,
                series.len()
            );
            return self.flat_fallback(series, reason);
        }

        match self.model.train(series) {
            Ok(trained) => {
                let values = trained.forecast(self.config.periods);
                let half_width = self.config.confidence_z * sample_std_dev(&series.values())?;
                let result = ForecastResult::new(series.clone(), &values, half_width)?;
                Ok(ForecastOutcome::Forecast(result))
            }
            Err(err) => self.flat_fallback(series, err.to_string()),
        }
    }

    fn flat_fallback(&self, series: &MonthlySeries, reason: String) -> Result<ForecastOutcome> {
        warn!(
            model = self.model.name(),
            reason = %reason,
            "seasonal model unavailable, using flat forecast"
        );
        let flat = LastValue.train(series)?.forecast(self.config.periods);
        let result = ForecastResult::new(series.clone(), &flat, 0.0)?;
        Ok(ForecastOutcome::ModelFailureFallback { result, reason })
    }
}
