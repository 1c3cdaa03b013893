use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use job_forecast::config::{ForecastConfig, CONFIDENCE_Z};
use job_forecast::data::{CategoryFilter, JobPosting, MonthKey, MonthlySeries};
use job_forecast::{ForecastOutcome, VolumeForecaster};
use market_math::statistics::sample_std_dev;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

fn series(start: MonthKey, values: &[f64]) -> MonthlySeries {
    let mut counts = BTreeMap::new();
    let mut month = start;
    for &value in values {
        counts.insert(month, value);
        month = month.succ();
    }
    MonthlySeries::from_counts(&counts)
}

fn jan_2023() -> MonthKey {
    MonthKey::new(2023, 1).unwrap()
}

fn assert_band_ordering(outcome: &ForecastOutcome) {
    if let Some(result) = outcome.result() {
        for point in result.points() {
            assert!(point.lower >= 0.0, "negative lower band at {}", point.month);
            assert!(point.lower <= point.value, "lower above value at {}", point.month);
            assert!(point.value <= point.upper, "value above upper at {}", point.month);
        }
    }
}

#[test]
fn test_sparse_postings_are_insufficient() {
    let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
    let postings: Vec<JobPosting> = (0..12)
        .map(|i| JobPosting::new(date, "Engineer", "Engineering", format!("Co{}", i), "Remote"))
        .collect();

    let forecaster = VolumeForecaster::new(6).unwrap();
    let outcome = forecaster
        .forecast_postings(&postings, &CategoryFilter::All)
        .unwrap();

    assert_eq!(
        outcome,
        ForecastOutcome::InsufficientData {
            nonzero_points: 1,
            required: 2
        }
    );
    assert!(outcome.result().is_none());
}

#[test]
fn test_empty_postings_are_insufficient() {
    let forecaster = VolumeForecaster::new(3).unwrap();
    let outcome = forecaster.forecast_postings(&[], &CategoryFilter::All).unwrap();
    assert!(outcome.is_insufficient_data());
}

#[test]
fn test_short_history_falls_back_to_last_value() {
    let forecaster = VolumeForecaster::new(4).unwrap();
    let outcome = forecaster
        .forecast_series(&series(jan_2023(), &[5.0, 8.0, 7.0]))
        .unwrap();

    assert!(outcome.is_fallback());
    let result = outcome.result().unwrap();
    assert_eq!(result.values(), vec![7.0; 4]);
    assert_eq!(result.lower_band(), result.upper_band());
    assert_eq!(result.points()[0].month, MonthKey::new(2023, 4).unwrap());
}

#[test]
fn test_constant_history_falls_back() {
    let forecaster = VolumeForecaster::new(3).unwrap();
    let outcome = forecaster
        .forecast_series(&series(jan_2023(), &[4.0; 9]))
        .unwrap();

    match outcome {
        ForecastOutcome::ModelFailureFallback { result, reason } => {
            assert_eq!(result.values(), vec![4.0; 3]);
            assert!(!reason.is_empty());
        }
        other => panic!("Expected fallback, got {:?}", other),
    }
}

#[test]
fn test_seasonal_history_is_forecast() {
    let history = [
        10.0, 14.0, 12.0, 11.0, 15.0, 13.0, 12.0, 16.0, 14.0, 13.0, 17.0, 15.0,
    ];
    let forecaster = VolumeForecaster::new(6).unwrap();
    let outcome = forecaster
        .forecast_series(&series(MonthKey::new(2023, 3).unwrap(), &history))
        .unwrap();

    let ForecastOutcome::Forecast(result) = &outcome else {
        panic!("Expected a fitted forecast, got {:?}", outcome);
    };
    assert_eq!(result.horizons(), 6);
    assert_eq!(result.historical().len(), 12);

    // First forecast month follows the last observed month, across the year end
    let months: Vec<String> = result.points().iter().map(|p| p.month.to_string()).collect();
    assert_eq!(
        months,
        vec!["2024-03", "2024-04", "2024-05", "2024-06", "2024-07", "2024-08"]
    );

    let half_width = CONFIDENCE_Z * sample_std_dev(&history).unwrap();
    for point in result.points() {
        assert!(point.value > 0.0);
        assert_abs_diff_eq!(point.upper - point.value, half_width, epsilon = 1e-9);
    }
    assert_band_ordering(&outcome);
}

#[test]
fn test_band_ordering_on_random_histories() {
    let mut rng = StdRng::seed_from_u64(42);
    let forecaster = VolumeForecaster::new(6).unwrap();

    for _ in 0..25 {
        let len = rng.gen_range(1..=18);
        let values: Vec<f64> = (0..len).map(|_| rng.gen_range(0..20) as f64).collect();
        let outcome = forecaster
            .forecast_series(&series(jan_2023(), &values))
            .unwrap();
        assert_band_ordering(&outcome);
    }
}

#[test]
fn test_forecast_is_deterministic() {
    let history = [3.0, 9.0, 4.0, 5.0, 11.0, 6.0, 6.0, 12.0];
    let forecaster = VolumeForecaster::from_config(ForecastConfig {
        periods: 3,
        ..ForecastConfig::default()
    })
    .unwrap();

    let input = series(jan_2023(), &history);
    let first = forecaster.forecast_series(&input).unwrap();
    let second = forecaster.forecast_series(&input).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_invalid_forecaster_settings() {
    assert!(VolumeForecaster::new(0).is_err());
    assert!(VolumeForecaster::from_config(ForecastConfig {
        season_length: 1,
        ..ForecastConfig::default()
    })
    .is_err());
}

#[test]
fn test_outcome_serializes_with_status_tag() {
    let outcome = ForecastOutcome::InsufficientData {
        nonzero_points: 0,
        required: 2,
    };
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["status"], "insufficient_data");
    assert_eq!(json["required"], 2);
}
