//! Composite job market health index
//!
//! Five monthly signals (posting volume, company diversity, job-type
//! diversity, location diversity, remote ratio) are standardised across the
//! available history, combined with fixed weights and rescaled to 0-100.
//! The scale is relative to the dataset: 50 means typical for this history,
//! not an absolute benchmark.

use crate::config::{HealthIndexConfig, WEIGHT_SUM_TOLERANCE};
use crate::data::{JobPosting, MonthKey};
use crate::error::{ForecastError, Result};
use market_math::moving_averages::trailing_moving_average;
use market_math::statistics::{min_max_scale, z_scores};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::debug;

/// Default weight of the posting volume signal
pub const VOLUME_WEIGHT: f64 = 0.4;
/// Default weight of the distinct company count
pub const COMPANY_DIVERSITY_WEIGHT: f64 = 0.2;
/// Default weight of the distinct job type count
pub const JOB_TYPE_DIVERSITY_WEIGHT: f64 = 0.2;
/// Default weight of the distinct location count
pub const LOCATION_DIVERSITY_WEIGHT: f64 = 0.1;
/// Default weight of the remote posting share
pub const REMOTE_RATIO_WEIGHT: f64 = 0.1;

/// Score at or above which the market is "Very Strong"
pub const VERY_STRONG_THRESHOLD: f64 = 70.0;
/// Score at or above which the market is "Strong"
pub const STRONG_THRESHOLD: f64 = 55.0;
/// Score at or above which the market is "Stable"
pub const STABLE_THRESHOLD: f64 = 45.0;
/// Score at or above which the market is "Weak"; below is "Very Weak"
pub const WEAK_THRESHOLD: f64 = 30.0;

/// Smoothed points needed before a trend is reported
pub const TREND_LOOKBACK: usize = 3;

/// Composite score used when every month combines to the same value
const NEUTRAL_SCORE: f64 = 50.0;

/// Weights of the five health signals; they must sum to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthWeights {
    pub volume: f64,
    pub company_diversity: f64,
    pub job_type_diversity: f64,
    pub location_diversity: f64,
    pub remote_ratio: f64,
}

impl Default for HealthWeights {
    fn default() -> Self {
        Self {
            volume: VOLUME_WEIGHT,
            company_diversity: COMPANY_DIVERSITY_WEIGHT,
            job_type_diversity: JOB_TYPE_DIVERSITY_WEIGHT,
            location_diversity: LOCATION_DIVERSITY_WEIGHT,
            remote_ratio: REMOTE_RATIO_WEIGHT,
        }
    }
}

impl HealthWeights {
    pub fn new(
        volume: f64,
        company_diversity: f64,
        job_type_diversity: f64,
        location_diversity: f64,
        remote_ratio: f64,
    ) -> Result<Self> {
        let weights = Self {
            volume,
            company_diversity,
            job_type_diversity,
            location_diversity,
            remote_ratio,
        };
        weights.validate()?;
        Ok(weights)
    }

    pub fn as_array(&self) -> [f64; 5] {
        [
            self.volume,
            self.company_diversity,
            self.job_type_diversity,
            self.location_diversity,
            self.remote_ratio,
        ]
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    /// Weights must be non-negative and sum to 1
    pub fn validate(&self) -> Result<()> {
        if self.as_array().iter().any(|w| !(*w >= 0.0)) {
            return Err(ForecastError::InvalidParameter(
                "Health weights must be non-negative".to_string(),
            ));
        }
        if (self.sum() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ForecastError::InvalidParameter(format!(
                "Health weights must sum to 1, got {}",
                self.sum()
            )));
        }
        Ok(())
    }
}

/// Raw monthly market signals
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawComponents {
    pub volume: usize,
    pub company_diversity: usize,
    pub job_type_diversity: usize,
    pub location_diversity: usize,
    pub remote_ratio: f64,
}

impl RawComponents {
    fn from_postings(postings: &[&JobPosting]) -> Self {
        let companies: HashSet<&str> = postings.iter().map(|p| p.company.as_str()).collect();
        let job_types: HashSet<&str> = postings.iter().map(|p| p.job_type.as_str()).collect();
        let locations: HashSet<String> = postings
            .iter()
            .map(|p| p.location.trim().to_lowercase())
            .collect();
        let remote = postings.iter().filter(|p| p.is_remote()).count();

        let volume = postings.len();
        Self {
            volume,
            company_diversity: companies.len(),
            job_type_diversity: job_types.len(),
            location_diversity: locations.len(),
            remote_ratio: if volume > 0 {
                remote as f64 / volume as f64
            } else {
                0.0
            },
        }
    }

    fn as_array(&self) -> [f64; 5] {
        [
            self.volume as f64,
            self.company_diversity as f64,
            self.job_type_diversity as f64,
            self.location_diversity as f64,
            self.remote_ratio,
        ]
    }
}

/// Standardised monthly signals
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedComponents {
    pub volume: f64,
    pub company_diversity: f64,
    pub job_type_diversity: f64,
    pub location_diversity: f64,
    pub remote_ratio: f64,
}

impl NormalizedComponents {
    fn from_array(values: [f64; 5]) -> Self {
        Self {
            volume: values[0],
            company_diversity: values[1],
            job_type_diversity: values[2],
            location_diversity: values[3],
            remote_ratio: values[4],
        }
    }

    fn as_array(&self) -> [f64; 5] {
        [
            self.volume,
            self.company_diversity,
            self.job_type_diversity,
            self.location_diversity,
            self.remote_ratio,
        ]
    }

    /// Weighted sum of the signals
    pub fn weighted(&self, weights: &HealthWeights) -> f64 {
        self.as_array()
            .iter()
            .zip(weights.as_array())
            .map(|(v, w)| v * w)
            .sum()
    }
}

/// How the signals were standardised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Normalization {
    /// Population z-score clipped to the configured bound
    ZScore,
    /// Min-max scaling to [-1, 1], used for short histories
    MinMax,
}

/// Health index of one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthIndexPoint {
    pub month_key: MonthKey,
    pub raw_components: RawComponents,
    pub normalized_components: NormalizedComponents,
    /// 0-100 score relative to the whole history
    pub composite_score: f64,
    /// Trailing moving average of `composite_score`
    pub smoothed_score: f64,
    /// Change of `smoothed_score` from the previous month
    pub mom_delta: Option<f64>,
}

/// Health index over every month present in the data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthIndex {
    points: Vec<HealthIndexPoint>,
    normalization: Normalization,
}

impl HealthIndex {
    pub fn points(&self) -> &[HealthIndexPoint] {
        &self.points
    }

    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&HealthIndexPoint> {
        self.points.last()
    }

    /// Direction of the smoothed score over the last [`TREND_LOOKBACK`] months
    pub fn trend(&self) -> Trend {
        let n = self.points.len();
        if n < TREND_LOOKBACK {
            return Trend::InsufficientData;
        }

        let then = self.points[n - TREND_LOOKBACK].smoothed_score;
        let now = self.points[n - 1].smoothed_score;
        if (now - then).abs() < 1e-9 {
            Trend::Stable
        } else if now > then {
            Trend::Improving
        } else {
            Trend::Declining
        }
    }
}

/// Qualitative reading of a health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sentiment {
    VeryWeak,
    Weak,
    Stable,
    Strong,
    VeryStrong,
}

impl Sentiment {
    pub fn from_score(score: f64) -> Self {
        if score >= VERY_STRONG_THRESHOLD {
            Sentiment::VeryStrong
        } else if score >= STRONG_THRESHOLD {
            Sentiment::Strong
        } else if score >= STABLE_THRESHOLD {
            Sentiment::Stable
        } else if score >= WEAK_THRESHOLD {
            Sentiment::Weak
        } else {
            Sentiment::VeryWeak
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Sentiment::VeryStrong => "The job market is booming with abundant opportunities.",
            Sentiment::Strong => "The job market is healthy with good opportunities available.",
            Sentiment::Stable => "The job market is stable with steady demand for workers.",
            Sentiment::Weak => {
                "The job market is showing signs of weakness with limited opportunities."
            }
            Sentiment::VeryWeak => {
                "The job market is experiencing significant challenges with few opportunities."
            }
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sentiment::VeryWeak => "Very Weak",
            Sentiment::Weak => "Weak",
            Sentiment::Stable => "Stable",
            Sentiment::Strong => "Strong",
            Sentiment::VeryStrong => "Very Strong",
        };
        f.write_str(label)
    }
}

/// Direction of the smoothed health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

impl Trend {
    pub fn description(&self) -> &'static str {
        match self {
            Trend::Improving => "The job market is showing signs of improvement.",
            Trend::Declining => "The job market is showing signs of decline.",
            Trend::Stable => "The job market is maintaining stability.",
            Trend::InsufficientData => "Not enough historical data to determine trend.",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Improving => "Improving",
            Trend::Declining => "Declining",
            Trend::Stable => "Stable",
            Trend::InsufficientData => "Insufficient Data",
        };
        f.write_str(label)
    }
}

/// Headline reading of the latest month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketInsights {
    pub current_index: f64,
    pub sentiment: Sentiment,
    pub trend: Trend,
    pub last_updated: MonthKey,
    pub latest: RawComponents,
}

/// Computes the composite health index
#[derive(Debug, Clone)]
pub struct HealthIndexCalculator {
    config: HealthIndexConfig,
}

impl HealthIndexCalculator {
    /// Calculator with default weights and the given moving-average window
    pub fn new(window: usize) -> Result<Self> {
        Self::from_config(HealthIndexConfig {
            window,
            ..HealthIndexConfig::default()
        })
    }

    pub fn from_config(config: HealthIndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Replace the signal weights
    pub fn with_weights(mut self, weights: HealthWeights) -> Result<Self> {
        weights.validate()?;
        self.config.weights = weights;
        Ok(self)
    }

    pub fn config(&self) -> &HealthIndexConfig {
        &self.config
    }

    /// One point per month with postings, oldest first
    pub fn calculate(&self, postings: &[JobPosting]) -> Result<HealthIndex> {
        let mut by_month: BTreeMap<MonthKey, Vec<&JobPosting>> = BTreeMap::new();
        for posting in postings {
            by_month.entry(posting.month_key()).or_default().push(posting);
        }

        let months: Vec<MonthKey> = by_month.keys().copied().collect();
        let raw: Vec<RawComponents> = by_month
            .values()
            .map(|month_postings| RawComponents::from_postings(month_postings))
            .collect();

        let normalization = if months.len() >= self.config.zscore_min_months {
            Normalization::ZScore
        } else {
            Normalization::MinMax
        };

        if raw.is_empty() {
            return Ok(HealthIndex {
                points: Vec::new(),
                normalization,
            });
        }
        debug!(months = months.len(), ?normalization, "calculating health index");

        // Normalise each signal column independently across the history
        let mut columns: [Vec<f64>; 5] = Default::default();
        for (signal, column) in columns.iter_mut().enumerate() {
            let values: Vec<f64> = raw.iter().map(|r| r.as_array()[signal]).collect();
            *column = match normalization {
                Normalization::ZScore => z_scores(&values, Some(self.config.zscore_clip))?,
                Normalization::MinMax => min_max_scale(&values, -1.0, 1.0, 0.0)?,
            };
        }

        let normalized: Vec<NormalizedComponents> = (0..raw.len())
            .map(|i| {
                NormalizedComponents::from_array([
                    columns[0][i],
                    columns[1][i],
                    columns[2][i],
                    columns[3][i],
                    columns[4][i],
                ])
            })
            .collect();

        let weighted: Vec<f64> = normalized
            .iter()
            .map(|n| n.weighted(&self.config.weights))
            .collect();

        let composite: Vec<f64> = min_max_scale(&weighted, 0.0, 100.0, NEUTRAL_SCORE)?
            .into_iter()
            .map(|s| s.clamp(0.0, 100.0))
            .collect();
        let smoothed: Vec<f64> = trailing_moving_average(&composite, self.config.window)?
            .into_iter()
            .map(|s| s.clamp(0.0, 100.0))
            .collect();

        let points = months
            .into_iter()
            .enumerate()
            .map(|(i, month_key)| HealthIndexPoint {
                month_key,
                raw_components: raw[i],
                normalized_components: normalized[i],
                composite_score: composite[i],
                smoothed_score: smoothed[i],
                mom_delta: (i > 0).then(|| smoothed[i] - smoothed[i - 1]),
            })
            .collect();

        Ok(HealthIndex {
            points,
            normalization,
        })
    }

    /// Headline insights, or `None` when there are no postings
    pub fn insights(&self, postings: &[JobPosting]) -> Result<Option<MarketInsights>> {
        let index = self.calculate(postings)?;
        let Some(latest) = index.latest() else {
            return Ok(None);
        };

        Ok(Some(MarketInsights {
            current_index: latest.smoothed_score,
            sentiment: Sentiment::from_score(latest.smoothed_score),
            trend: index.trend(),
            last_updated: latest.month_key,
            latest: latest.raw_components,
        }))
    }
}
