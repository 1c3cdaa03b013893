//! # Job Forecast
//!
//! A Rust library for job market analytics over normalized job postings.
//!
//! ## Features
//!
//! - Monthly time series construction with zero-filled gaps
//! - Posting volume forecasting (Holt-Winters with a season of 3 months)
//! - Linear growth prediction per job type
//! - Composite market health index (0-100) with sentiment and trend
//! - Regional health comparison
//! - Company growth and hiring surge detection
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use job_forecast::data::{CategoryFilter, DataLoader};
//! use job_forecast::forecaster::VolumeForecaster;
//! use job_forecast::growth::GrowthPredictor;
//! use job_forecast::health::HealthIndexCalculator;
//!
//! # fn main() -> job_forecast::error::Result<()> {
//! // Load postings
//! let postings = DataLoader::from_csv("postings.csv")?;
//!
//! // Forecast the next 6 months of posting volume
//! let forecaster = VolumeForecaster::new(6)?;
//! let outcome = forecaster.forecast_postings(&postings, &CategoryFilter::All)?;
//! if let Some(result) = outcome.result() {
//!     for point in result.points() {
//!         println!("{}: {:.1} [{:.1}, {:.1}]", point.month, point.value, point.lower, point.upper);
//!     }
//! }
//!
//! // Rank job types by predicted growth
//! let growth = GrowthPredictor::new(6)?.predict(&postings)?;
//!
//! // Current market health
//! let insights = HealthIndexCalculator::new(3)?.insights(&postings)?;
//! # Ok(())
//! # }
//! ```
//!
//! All computations are pure functions of their inputs and configuration.
//! Progress and fallbacks are reported through `tracing`; install a
//! subscriber in the binary to see them.

pub mod company;
pub mod config;
pub mod data;
pub mod error;
pub mod forecaster;
pub mod growth;
pub mod health;
pub mod models;
pub mod regional;
pub mod utils;

// Re-export commonly used types
pub use crate::config::AnalyticsConfig;
pub use crate::data::{CategoryFilter, DataLoader, JobPosting, MonthKey, MonthlySeries};
pub use crate::error::ForecastError;
pub use crate::forecaster::VolumeForecaster;
pub use crate::growth::{GrowthEstimate, GrowthPredictor};
pub use crate::health::{HealthIndex, HealthIndexCalculator, MarketInsights};
pub use crate::models::{ForecastModel, ForecastOutcome, ForecastResult};
pub use crate::regional::{KeywordRegionClassifier, RegionClassifier};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
