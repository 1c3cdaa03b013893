//! Per-category growth prediction
//!
//! [`GrowthPredictor`] fits a least-squares line to each job type's monthly
//! counts and compares the average of the extrapolated months with a trailing
//! baseline. Unlike the smoothing forecaster, the baseline averages the last
//! few months instead of using the final point alone.

use crate::config::GrowthConfig;
use crate::data::{distinct_job_types, CategoryFilter, JobPosting, MonthKey, MonthlySeries};
use crate::error::{ForecastError, Result};
use market_math::regression::LinearRegression;
use market_math::statistics::{mean, percent_change, trailing_mean};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Number of items compared when the caller names none
pub const DEFAULT_COMPARISON_ITEMS: usize = 5;

/// Predicted growth of one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthEstimate {
    pub category_label: String,
    pub current_baseline: f64,
    pub predicted_value: f64,
    pub growth_pct: f64,
}

impl GrowthEstimate {
    pub fn new(category_label: impl Into<String>, current: f64, predicted: f64) -> Self {
        Self {
            category_label: category_label.into(),
            current_baseline: current,
            predicted_value: predicted,
            growth_pct: percent_change(current, predicted),
        }
    }

    /// Zero-growth row for a category without enough history
    pub fn placeholder(category_label: impl Into<String>) -> Self {
        Self::new(category_label, 0.0, 0.0)
    }
}

/// Sort descending by growth, ties broken by label so output is stable
fn by_growth_desc(a_growth: f64, a_label: &str, b_growth: f64, b_label: &str) -> Ordering {
    b_growth
        .partial_cmp(&a_growth)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a_label.cmp(b_label))
}

/// Linear trend growth predictor for job types
#[derive(Debug, Clone)]
pub struct GrowthPredictor {
    config: GrowthConfig,
}

impl GrowthPredictor {
    /// Predictor averaging `periods` extrapolated months
    pub fn new(periods: usize) -> Result<Self> {
        Self::from_config(GrowthConfig {
            periods,
            ..GrowthConfig::default()
        })
    }

    pub fn from_config(config: GrowthConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// One estimate per job type present in `postings`, fastest growing first
    pub fn predict(&self, postings: &[JobPosting]) -> Result<Vec<GrowthEstimate>> {
        let categories = distinct_job_types(postings);
        self.predict_categories(postings, &categories)
    }

    /// One estimate per label in `categories`, fastest growing first
    pub fn predict_categories(
        &self,
        postings: &[JobPosting],
        categories: &[String],
    ) -> Result<Vec<GrowthEstimate>> {
        let mut estimates = categories
            .iter()
            .map(|label| {
                let series =
                    MonthlySeries::from_postings(postings, &CategoryFilter::JobType(label.clone()));
                self.estimate(label, &series)
            })
            .collect::<Result<Vec<_>>>()?;

        estimates.sort_by(|a, b| {
            by_growth_desc(a.growth_pct, &a.category_label, b.growth_pct, &b.category_label)
        });

        Ok(estimates)
    }

    /// Growth estimate for a single category series
    pub fn estimate(&self, label: &str, series: &MonthlySeries) -> Result<GrowthEstimate> {
        if series.len() < 2 {
            debug!(category = label, months = series.len(), "zero-growth placeholder");
            return Ok(GrowthEstimate::placeholder(label));
        }

        let values = series.values();
        let current = trailing_mean(&values, self.config.baseline_window)?;

        let regression = LinearRegression::fit(&values)?;
        let predicted = mean(&regression.forecast(self.config.periods))?;

        Ok(GrowthEstimate::new(label, current, predicted))
    }
}

/// Which posting attribute a growth comparison groups by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GrowthDimension {
    JobType,
    Company,
}

impl GrowthDimension {
    fn key<'a>(&self, posting: &'a JobPosting) -> &'a str {
        match self {
            GrowthDimension::JobType => &posting.job_type,
            GrowthDimension::Company => &posting.company,
        }
    }
}

/// Recent versus preceding activity of one job type or company
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthComparison {
    pub item: String,
    pub current: f64,
    pub previous: f64,
    pub growth_pct: f64,
}

/// Compare the trailing `periods` months of each item with the window before it.
///
/// Only months in which an item has postings count. When no earlier window
/// exists the first month is the reference. An empty `items` list compares the
/// most frequent items.
pub fn compare_growth_rates(
    postings: &[JobPosting],
    items: &[String],
    dimension: GrowthDimension,
    periods: usize,
) -> Result<Vec<GrowthComparison>> {
    if periods == 0 {
        return Err(ForecastError::InvalidParameter(
            "Comparison periods must be positive".to_string(),
        ));
    }

    let mut monthly: HashMap<&str, BTreeMap<MonthKey, f64>> = HashMap::new();
    for posting in postings {
        *monthly
            .entry(dimension.key(posting))
            .or_default()
            .entry(posting.month_key())
            .or_insert(0.0) += 1.0;
    }

    let items: Vec<String> = if items.is_empty() {
        top_items(&monthly, DEFAULT_COMPARISON_ITEMS)
    } else {
        items.to_vec()
    };

    let mut comparisons = Vec::with_capacity(items.len());
    for item in items {
        let Some(counts) = monthly.get(item.as_str()) else {
            continue;
        };
        let values: Vec<f64> = counts.values().copied().collect();

        if values.len() < 2 {
            comparisons.push(GrowthComparison {
                current: values.last().copied().unwrap_or(0.0),
                previous: 0.0,
                growth_pct: 0.0,
                item,
            });
            continue;
        }

        let window = periods.min(values.len());
        let split = values.len() - window;
        let current = mean(&values[split..])?;
        let previous = if split > 0 {
            mean(&values[split.saturating_sub(window)..split])?
        } else {
            values[0]
        };

        comparisons.push(GrowthComparison {
            growth_pct: percent_change(previous, current),
            item,
            current,
            previous,
        });
    }

    comparisons.sort_by(|a, b| by_growth_desc(a.growth_pct, &a.item, b.growth_pct, &b.item));
    Ok(comparisons)
}

fn top_items(monthly: &HashMap<&str, BTreeMap<MonthKey, f64>>, n: usize) -> Vec<String> {
    let mut totals: Vec<(&str, f64)> = monthly
        .iter()
        .map(|(item, counts)| (*item, counts.values().sum()))
        .collect();
    totals.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });
    totals
        .into_iter()
        .take(n)
        .map(|(item, _)| item.to_string())
        .collect()
}
