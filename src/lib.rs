//! # Job Pulse
//!
//! Umbrella crate for the job market analytics workspace.
//!
//! - [`math`]: numeric primitives (statistics, regression, smoothing)
//! - [`analytics`]: postings, forecasts, growth and the health index
//!
//! ## Example
//!
//! ```
//! use job_pulse_workspace::analytics::data::MonthKey;
//!
//! let month = MonthKey::new(2024, 12).unwrap();
//! assert_eq!(month.succ().to_string(), "2025-01");
//! ```

pub use job_forecast as analytics;
pub use market_math as math;

/// Versions of the workspace crates, `(name, version)`
pub fn component_versions() -> [(&'static str, &'static str); 2] {
    [
        (job_forecast::NAME, job_forecast::VERSION),
        ("market_math", market_math::VERSION),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_versions() {
        let versions = component_versions();
        assert_eq!(versions[0].0, "job_forecast");
        assert!(!versions[1].1.is_empty());
    }

    #[test]
    fn test_reexports_share_types() {
        let fitted = math::regression::LinearRegression::fit(&[1.0, 2.0, 3.0]).unwrap();
        assert!((fitted.slope() - 1.0).abs() < 1e-12);

        let err: analytics::ForecastError = math::MathError::InvalidInput("x".to_string()).into();
        assert!(err.to_string().contains("x"));
    }
}
