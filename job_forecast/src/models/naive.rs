//! Flat forecast repeating the last observation

use crate::data::MonthlySeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, TrainedForecastModel};

/// Last-value model used when the seasonal model cannot be fitted
#[derive(Debug, Clone, Default)]
pub struct LastValue;

/// Trained last-value model
#[derive(Debug, Clone)]
pub struct TrainedLastValue {
    last_value: f64,
    fitted: Vec<f64>,
}

impl ForecastModel for LastValue {
    type Trained = TrainedLastValue;

    fn train(&self, series: &MonthlySeries) -> Result<Self::Trained> {
        let values = series.values();
        let last_value = *values.last().ok_or_else(|| {
            ForecastError::DataError("Empty time series data".to_string())
        })?;

        // Each month is predicted by the month before it
        let fitted = values[..values.len() - 1].to_vec();

        Ok(TrainedLastValue { last_value, fitted })
    }

    fn name(&self) -> &str {
        "Last value"
    }
}

impl TrainedForecastModel for TrainedLastValue {
    fn forecast(&self, horizons: usize) -> Vec<f64> {
        vec![self.last_value; horizons]
    }

    fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    fn name(&self) -> &str {
        "Last value"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CategoryFilter, JobPosting};
    use chrono::NaiveDate;

    #[test]
    fn test_last_value_repeats_final_month() {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let postings = vec![
            JobPosting::new(d("2024-01-01"), "Dev", "Backend", "Acme", ""),
            JobPosting::new(d("2024-02-01"), "Dev", "Backend", "Acme", ""),
            JobPosting::new(d("2024-02-03"), "Dev", "Backend", "Beta", ""),
        ];
        let series = MonthlySeries::from_postings(&postings, &CategoryFilter::All);

        let trained = LastValue.train(&series).unwrap();
        assert_eq!(trained.forecast(3), vec![2.0, 2.0, 2.0]);
        assert_eq!(trained.fitted_values(), &[1.0]);
    }

    #[test]
    fn test_last_value_empty_series() {
        assert!(LastValue.train(&MonthlySeries::default()).is_err());
    }
}
