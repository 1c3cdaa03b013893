//! Tunable constants and configuration for the analytics components

use crate::error::{ForecastError, Result};
use crate::health::HealthWeights;
use market_math::smoothing::DEFAULT_GRID_STEPS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Season length of the smoothing forecaster, in months.
///
/// Short cycles are assumed: posting histories rarely cover enough years for
/// an annual season to be estimable.
pub const SEASONAL_PERIODS: usize = 3;

/// Normal quantile for the 95% forecast band
pub const CONFIDENCE_Z: f64 = 1.96;

/// Default forecast horizon in months
pub const DEFAULT_FORECAST_PERIODS: usize = 6;

/// Non-zero months required before a series is forecast at all
pub const MIN_NONZERO_POINTS: usize = 2;

/// Trailing months averaged into a growth baseline
pub const GROWTH_BASELINE_WINDOW: usize = 3;

/// Default moving-average width for the health index
pub const DEFAULT_HEALTH_WINDOW: usize = 3;

/// Months of history needed before signals are z-scored instead of min-max scaled
pub const ZSCORE_MIN_MONTHS: usize = 3;

/// Absolute bound applied to health-signal z-scores
pub const ZSCORE_CLIP: f64 = 3.0;

/// Allowed deviation of the health weights from a sum of 1
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Smoothing forecaster settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub periods: usize,
    pub season_length: usize,
    pub confidence_z: f64,
    pub grid_steps: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            periods: DEFAULT_FORECAST_PERIODS,
            season_length: SEASONAL_PERIODS,
            confidence_z: CONFIDENCE_Z,
            grid_steps: DEFAULT_GRID_STEPS,
        }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> Result<()> {
        if self.periods == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast periods must be positive".to_string(),
            ));
        }
        if self.season_length < 2 {
            return Err(ForecastError::InvalidParameter(
                "Season length must be at least 2".to_string(),
            ));
        }
        if !(self.confidence_z > 0.0 && self.confidence_z.is_finite()) {
            return Err(ForecastError::InvalidParameter(
                "Confidence z-value must be positive".to_string(),
            ));
        }
        if self.grid_steps < 2 {
            return Err(ForecastError::InvalidParameter(
                "Grid search needs at least 2 steps".to_string(),
            ));
        }
        Ok(())
    }
}

/// Linear growth predictor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    pub periods: usize,
    pub baseline_window: usize,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            periods: DEFAULT_FORECAST_PERIODS,
            baseline_window: GROWTH_BASELINE_WINDOW,
        }
    }
}

impl GrowthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.periods == 0 {
            return Err(ForecastError::InvalidParameter(
                "Growth periods must be positive".to_string(),
            ));
        }
        if self.baseline_window == 0 {
            return Err(ForecastError::InvalidParameter(
                "Baseline window must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Composite health index settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthIndexConfig {
    pub window: usize,
    pub weights: HealthWeights,
    pub zscore_min_months: usize,
    pub zscore_clip: f64,
}

impl Default for HealthIndexConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_HEALTH_WINDOW,
            weights: HealthWeights::default(),
            zscore_min_months: ZSCORE_MIN_MONTHS,
            zscore_clip: ZSCORE_CLIP,
        }
    }
}

impl HealthIndexConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(ForecastError::InvalidParameter(
                "Moving-average window must be positive".to_string(),
            ));
        }
        if self.zscore_min_months < 2 {
            return Err(ForecastError::InvalidParameter(
                "Z-scores need at least 2 months of history".to_string(),
            ));
        }
        if !(self.zscore_clip > 0.0) {
            return Err(ForecastError::InvalidParameter(
                "Z-score clip must be positive".to_string(),
            ));
        }
        self.weights.validate()
    }
}

/// Settings for every analytics component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub forecast: ForecastConfig,
    pub growth: GrowthConfig,
    pub health: HealthIndexConfig,
}

impl AnalyticsConfig {
    /// Parse and validate a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.forecast.validate()?;
        self.growth.validate()?;
        self.health.validate()
    }
}
