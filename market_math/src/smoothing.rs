//! Additive Holt-Winters exponential smoothing
//!
//! Level, additive trend and additive seasonal component:
//!
//! ```text
//! l[t] = alpha * (y[t] - s[t-m]) + (1 - alpha) * (l[t-1] + b[t-1])
//! b[t] = beta  * (l[t] - l[t-1]) + (1 - beta)  * b[t-1]
//! s[t] = gamma * (y[t] - l[t-1] - b[t-1]) + (1 - gamma) * s[t-m]
//! ```
//!
//! Initial states come from the first two seasons, so a fit needs at least
//! `2 * season_length` observations.

use crate::statistics::{mean, population_std_dev};
use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Default number of grid points per parameter axis for [`HoltWinters::fit_optimized`]
pub const DEFAULT_GRID_STEPS: usize = 10;

/// Smoothing weights for level, trend and season
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingParams {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl SmoothingParams {
    /// Create a validated parameter set, each weight in `[0, 1]`
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Result<Self> {
        for (name, value) in [("alpha", alpha), ("beta", beta), ("gamma", gamma)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(MathError::InvalidInput(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }

        Ok(Self { alpha, beta, gamma })
    }
}

/// Additive Holt-Winters model definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoltWinters {
    season_length: usize,
}

/// Holt-Winters model after fitting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FittedHoltWinters {
    params: SmoothingParams,
    season_length: usize,
    level: f64,
    trend: f64,
    /// Seasonal states for every observation, oldest first
    seasonals: Vec<f64>,
    /// One-step-ahead fitted values from index `season_length` onward
    fitted: Vec<f64>,
    sse: f64,
}

impl HoltWinters {
    /// Create a model with the given season length
    pub fn new(season_length: usize) -> Result<Self> {
        if season_length < 2 {
            return Err(MathError::InvalidInput(
                "Season length must be at least 2".to_string(),
            ));
        }

        Ok(Self { season_length })
    }

    /// Minimum number of observations needed to initialise the states
    pub fn min_observations(&self) -> usize {
        2 * self.season_length
    }

    fn check_series(&self, values: &[f64]) -> Result<()> {
        if values.len() < self.min_observations() {
            return Err(MathError::InsufficientData(format!(
                "Holt-Winters with season length {} needs {} observations, have {}",
                self.season_length,
                self.min_observations(),
                values.len()
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Series contains non-finite values".to_string(),
            ));
        }
        if population_std_dev(values)? < f64::EPSILON {
            return Err(MathError::CalculationError(
                "Series has zero variance".to_string(),
            ));
        }

        Ok(())
    }

    /// Fit the model with fixed smoothing weights
    pub fn fit(&self, values: &[f64], params: SmoothingParams) -> Result<FittedHoltWinters> {
        self.check_series(values)?;
        self.run(values, params)
    }

    /// Fit the model choosing the weights that minimise the in-sample SSE
    /// over a regular `grid_steps` grid on each axis.
    pub fn fit_optimized(&self, values: &[f64], grid_steps: usize) -> Result<FittedHoltWinters> {
        if grid_steps < 2 {
            return Err(MathError::InvalidInput(
                "Grid must have at least 2 steps per axis".to_string(),
            ));
        }
        self.check_series(values)?;

        let grid: Vec<f64> = (1..grid_steps)
            .map(|k| k as f64 / grid_steps as f64)
            .collect();

        let mut best: Option<FittedHoltWinters> = None;
        for &alpha in &grid {
            for &beta in &grid {
                for &gamma in &grid {
                    let params = SmoothingParams { alpha, beta, gamma };
                    let Ok(candidate) = self.run(values, params) else {
                        continue;
                    };
                    let better = best
                        .as_ref()
                        .map_or(true, |current| candidate.sse < current.sse);
                    if better {
                        best = Some(candidate);
                    }
                }
            }
        }

        best.ok_or_else(|| {
            MathError::CalculationError(
                "Holt-Winters parameter search did not converge".to_string(),
            )
        })
    }

    fn run(&self, values: &[f64], params: SmoothingParams) -> Result<FittedHoltWinters> {
        let m = self.season_length;
        let n = values.len();

        let first = mean(&values[..m])?;
        let second = mean(&values[m..2 * m])?;
        let initial_trend = (second - first) / m as f64;
        let centre = (m as f64 - 1.0) / 2.0;

        let mut seasonals = Vec::with_capacity(n);
        for (i, &y) in values[..m].iter().enumerate() {
            seasonals.push(y - (first + initial_trend * (i as f64 - centre)));
        }

        let mut level = first + initial_trend * centre;
        let mut trend = initial_trend;
        let mut fitted = Vec::with_capacity(n - m);
        let mut sse = 0.0;

        for t in m..n {
            let y = values[t];
            let season_prev = seasonals[t - m];
            let forecast = level + trend + season_prev;
            fitted.push(forecast);
            sse += (y - forecast).powi(2);

            let prev_level = level;
            let prev_trend = trend;
            level = params.alpha * (y - season_prev) + (1.0 - params.alpha) * (prev_level + prev_trend);
            trend = params.beta * (level - prev_level) + (1.0 - params.beta) * prev_trend;
            seasonals.push(
                params.gamma * (y - prev_level - prev_trend) + (1.0 - params.gamma) * season_prev,
            );
        }

        if !sse.is_finite() || !level.is_finite() || !trend.is_finite() {
            return Err(MathError::CalculationError(
                "Holt-Winters states diverged".to_string(),
            ));
        }

        Ok(FittedHoltWinters {
            params,
            season_length: m,
            level,
            trend,
            seasonals,
            fitted,
            sse,
        })
    }
}

impl FittedHoltWinters {
    /// Point forecasts for the next `horizon` periods
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        let m = self.season_length;
        let n = self.seasonals.len();

        (1..=horizon)
            .map(|h| {
                let season = self.seasonals[n - m + (h - 1) % m];
                self.level + h as f64 * self.trend + season
            })
            .collect()
    }

    /// Smoothing weights used by the fit
    pub fn params(&self) -> SmoothingParams {
        self.params
    }

    /// Final level state
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Final trend state
    pub fn trend(&self) -> f64 {
        self.trend
    }

    /// One-step-ahead in-sample fitted values
    pub fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    /// Sum of squared one-step errors
    pub fn sse(&self) -> f64 {
        self.sse
    }
}
