//! Descriptive statistics and normalisation helpers
//!
//! Contains the batch calculations shared by the forecasting and
//! health-index code:
//! - Mean, population and sample standard deviation
//! - Population z-scores with optional clipping
//! - Min-max scaling onto an arbitrary target range
//! - Percentage change with the zero-baseline rule

use crate::{MathError, Result};
use statrs::statistics::Statistics;

/// Growth reported when a quantity appears from a zero baseline.
pub const NEW_GROWTH_PCT: f64 = 100.0;

/// Arithmetic mean of `values`
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot calculate mean of an empty series".to_string(),
        ));
    }

    Ok(values.iter().mean())
}

/// Population (ddof = 0) standard deviation of `values`
pub fn population_std_dev(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot calculate standard deviation of an empty series".to_string(),
        ));
    }
    if values.len() == 1 {
        return Ok(0.0);
    }

    Ok(values.iter().population_std_dev())
}

/// Sample (ddof = 1) standard deviation of `values`
pub fn sample_std_dev(values: &[f64]) -> Result<f64> {
    if values.len() < 2 {
        return Err(MathError::InsufficientData(
            "Sample standard deviation needs at least 2 values".to_string(),
        ));
    }

    Ok(values.iter().std_dev())
}

/// Mean of the last `min(window, len)` values
pub fn trailing_mean(values: &[f64], window: usize) -> Result<f64> {
    if window == 0 {
        return Err(MathError::InvalidInput(
            "Trailing window must be greater than zero".to_string(),
        ));
    }

    let take = window.min(values.len());
    mean(&values[values.len() - take..])
}

/// Smallest and largest value, or `None` for an empty slice
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Population z-scores, clipped to `[-clip, clip]` when `clip` is given.
///
/// A zero-variance input maps every element to 0.0.
pub fn z_scores(values: &[f64], clip: Option<f64>) -> Result<Vec<f64>> {
    let mu = mean(values)?;
    let sigma = population_std_dev(values)?;

    if sigma.abs() < f64::EPSILON {
        return Ok(vec![0.0; values.len()]);
    }

    Ok(values
        .iter()
        .map(|v| {
            let z = (v - mu) / sigma;
            match clip {
                Some(bound) => z.clamp(-bound, bound),
                None => z,
            }
        })
        .collect())
}

/// Linearly map `values` onto `[lower, upper]`.
///
/// When every value is identical the whole output is `flat`.
pub fn min_max_scale(values: &[f64], lower: f64, upper: f64, flat: f64) -> Result<Vec<f64>> {
    if upper <= lower {
        return Err(MathError::InvalidInput(format!(
            "Target range upper bound ({}) must exceed lower bound ({})",
            upper, lower
        )));
    }

    let Some((lo, hi)) = min_max(values) else {
        return Ok(Vec::new());
    };

    if hi <= lo {
        return Ok(vec![flat; values.len()]);
    }

    Ok(values
        .iter()
        .map(|v| lower + (v - lo) / (hi - lo) * (upper - lower))
        .collect())
}

/// Percentage change from `baseline` to `value`.
///
/// A zero baseline yields 0 when `value` is also zero and
/// [`NEW_GROWTH_PCT`] when it is positive.
pub fn percent_change(baseline: f64, value: f64) -> f64 {
    if baseline > 0.0 {
        (value - baseline) / baseline * 100.0
    } else if value > 0.0 {
        NEW_GROWTH_PCT
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[test]
    fn test_mean_and_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_abs_diff_eq!(mean(&values).unwrap(), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(population_std_dev(&values).unwrap(), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            sample_std_dev(&values).unwrap(),
            (32.0f64 / 7.0).sqrt(),
            epsilon = 1e-12
        );
        assert!(sample_std_dev(&[1.0]).is_err());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(mean(&[]).is_err());
        assert!(population_std_dev(&[]).is_err());
        assert!(z_scores(&[], None).is_err());
        assert!(min_max(&[]).is_none());
        assert!(min_max_scale(&[], -1.0, 1.0, 0.0).unwrap().is_empty());
    }

    #[test]
    fn test_trailing_mean() {
        let values = [1.0, 2.0, 3.0, 10.0, 20.0];
        assert_abs_diff_eq!(trailing_mean(&values, 3).unwrap(), 11.0, epsilon = 1e-12);
        assert_abs_diff_eq!(trailing_mean(&values[..2], 3).unwrap(), 1.5, epsilon = 1e-12);
        assert!(trailing_mean(&values, 0).is_err());
    }

    #[test]
    fn test_z_scores_clipped() {
        let mut values = vec![0.0; 99];
        values.push(1000.0);
        let z = z_scores(&values, Some(3.0)).unwrap();
        assert_abs_diff_eq!(z[99], 3.0, epsilon = 1e-12);
        assert!(z.iter().all(|v| (-3.0..=3.0).contains(v)));
    }

    #[test]
    fn test_z_scores_zero_variance() {
        let z = z_scores(&[5.0, 5.0, 5.0], Some(3.0)).unwrap();
        assert_eq!(z, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_min_max_scale() {
        let scaled = min_max_scale(&[10.0, 20.0], -1.0, 1.0, 0.0).unwrap();
        assert_eq!(scaled, vec![-1.0, 1.0]);

        let flat = min_max_scale(&[3.0, 3.0], -1.0, 1.0, 0.0).unwrap();
        assert_eq!(flat, vec![0.0, 0.0]);

        assert!(min_max_scale(&[1.0], 1.0, 1.0, 0.0).is_err());
    }

    #[rstest]
    #[case(100.0, 150.0, 50.0)]
    #[case(10.0, 10.0, 0.0)]
    #[case(0.0, 5.0, 100.0)]
    #[case(0.0, 0.0, 0.0)]
    #[case(20.0, 5.0, -75.0)]
    fn test_percent_change(#[case] baseline: f64, #[case] value: f64, #[case] expected: f64) {
        assert_abs_diff_eq!(percent_change(baseline, value), expected, epsilon = 1e-9);
    }
}
