//! Holt-Winters model with additive trend and additive season

use crate::data::MonthlySeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, TrainedForecastModel};
use market_math::smoothing::{FittedHoltWinters, HoltWinters, SmoothingParams};
use tracing::debug;

/// Additive Holt-Winters model whose weights are chosen by grid search
#[derive(Debug, Clone)]
pub struct HoltWintersModel {
    /// Name of the model
    name: String,
    /// Smoothing engine fixed to the season length
    engine: HoltWinters,
    /// Grid points per smoothing weight
    grid_steps: usize,
}

/// Trained Holt-Winters model
#[derive(Debug, Clone)]
pub struct TrainedHoltWinters {
    /// Name of the model
    name: String,
    /// Fitted states
    fitted: FittedHoltWinters,
}

impl HoltWintersModel {
    /// Create a new Holt-Winters model
    pub fn new(season_length: usize, grid_steps: usize) -> Result<Self> {
        if season_length < 2 {
            return Err(ForecastError::InvalidParameter(
                "Season length must be at least 2".to_string(),
            ));
        }
        if grid_steps < 2 {
            return Err(ForecastError::InvalidParameter(
                "Grid search needs at least 2 steps".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Holt-Winters (additive, season={})", season_length),
            engine: HoltWinters::new(season_length)?,
            grid_steps,
        })
    }

    /// Observations needed before the model can be trained
    pub fn min_observations(&self) -> usize {
        self.engine.min_observations()
    }
}

impl ForecastModel for HoltWintersModel {
    type Trained = TrainedHoltWinters;

    fn train(&self, series: &MonthlySeries) -> Result<Self::Trained> {
        let values = series.values();
        let fitted = self.engine.fit_optimized(&values, self.grid_steps)?;

        let SmoothingParams { alpha, beta, gamma } = fitted.params();
        debug!(alpha, beta, gamma, sse = fitted.sse(), "fitted holt-winters");

        Ok(TrainedHoltWinters {
            name: self.name.clone(),
            fitted,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedHoltWinters {
    /// Smoothing weights selected during training
    pub fn params(&self) -> SmoothingParams {
        self.fitted.params()
    }
}

impl TrainedForecastModel for TrainedHoltWinters {
    fn forecast(&self, horizons: usize) -> Vec<f64> {
        self.fitted.forecast(horizons)
    }

    fn fitted_values(&self) -> &[f64] {
        self.fitted.fitted_values()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MonthKey;
    use std::collections::BTreeMap;

    fn series(values: &[f64]) -> MonthlySeries {
        let mut month = MonthKey::new(2023, 1).unwrap();
        let mut counts = BTreeMap::new();
        for &v in values {
            counts.insert(month, v);
            month = month.succ();
        }
        MonthlySeries::from_counts(&counts)
    }

    #[test]
    fn test_holt_winters_trains_on_seasonal_counts() {
        let model = HoltWintersModel::new(3, 10).unwrap();
        let history = series(&[12.0, 8.0, 10.0, 15.0, 11.0, 13.0, 18.0, 14.0, 16.0]);

        let trained = model.train(&history).unwrap();
        let forecast = trained.forecast(3);

        assert_eq!(forecast.len(), 3);
        assert_eq!(trained.fitted_values().len(), 6);
        // Upward trend of ~3 per season carries into the next cycle
        assert!(forecast[0] > 16.0);
    }

    #[test]
    fn test_holt_winters_rejects_short_history() {
        let model = HoltWintersModel::new(3, 10).unwrap();
        assert!(model.train(&series(&[1.0, 2.0, 3.0])).is_err());
    }

    #[test]
    fn test_model_parameter_validation() {
        assert!(HoltWintersModel::new(1, 10).is_err());
        assert!(HoltWintersModel::new(3, 1).is_err());
        assert_eq!(HoltWintersModel::new(4, 10).unwrap().min_observations(), 8);
    }
}
