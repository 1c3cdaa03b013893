//! Region classification and per-region health indices

use crate::data::{JobPosting, MonthKey};
use crate::error::Result;
use crate::health::{HealthIndexCalculator, RawComponents};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

pub const REMOTE_REGION: &str = "Remote";
pub const OTHER_REGION: &str = "Other";

/// Maps free-text locations to a region label
pub trait RegionClassifier {
    fn classify(&self, location: &str) -> String;
}

impl<F> RegionClassifier for F
where
    F: Fn(&str) -> String,
{
    fn classify(&self, location: &str) -> String {
        self(location)
    }
}

const STATES: [(&str, &str, &str); 51] = [
    ("AL", "alabama", "Southeast"),
    ("AK", "alaska", "West"),
    ("AZ", "arizona", "Southwest"),
    ("AR", "arkansas", "Southeast"),
    ("CA", "california", "West"),
    ("CO", "colorado", "West"),
    ("CT", "connecticut", "Northeast"),
    ("DE", "delaware", "Northeast"),
    ("DC", "district of columbia", "Northeast"),
    ("FL", "florida", "Southeast"),
    ("GA", "georgia", "Southeast"),
    ("HI", "hawaii", "West"),
    ("ID", "idaho", "West"),
    ("IL", "illinois", "Midwest"),
    ("IN", "indiana", "Midwest"),
    ("IA", "iowa", "Midwest"),
    ("KS", "kansas", "Midwest"),
    ("KY", "kentucky", "Southeast"),
    ("LA", "louisiana", "Southeast"),
    ("ME", "maine", "Northeast"),
    ("MD", "maryland", "Northeast"),
    ("MA", "massachusetts", "Northeast"),
    ("MI", "michigan", "Midwest"),
    ("MN", "minnesota", "Midwest"),
    ("MS", "mississippi", "Southeast"),
    ("MO", "missouri", "Midwest"),
    ("MT", "montana", "West"),
    ("NE", "nebraska", "Midwest"),
    ("NV", "nevada", "West"),
    ("NH", "new hampshire", "Northeast"),
    ("NJ", "new jersey", "Northeast"),
    ("NM", "new mexico", "Southwest"),
    ("NY", "new york", "Northeast"),
    ("NC", "north carolina", "Southeast"),
    ("ND", "north dakota", "Midwest"),
    ("OH", "ohio", "Midwest"),
    ("OK", "oklahoma", "Southwest"),
    ("OR", "oregon", "West"),
    ("PA", "pennsylvania", "Northeast"),
    ("RI", "rhode island", "Northeast"),
    ("SC", "south carolina", "Southeast"),
    ("SD", "south dakota", "Midwest"),
    ("TN", "tennessee", "Southeast"),
    ("TX", "texas", "Southwest"),
    ("UT", "utah", "West"),
    ("VT", "vermont", "Northeast"),
    ("VA", "virginia", "Southeast"),
    ("WA", "washington", "West"),
    ("WV", "west virginia", "Southeast"),
    ("WI", "wisconsin", "Midwest"),
    ("WY", "wyoming", "West"),
];

/// US census-style regions from a trailing state code or a state name
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordRegionClassifier;

impl RegionClassifier for KeywordRegionClassifier {
    fn classify(&self, location: &str) -> String {
        let lower = location.to_lowercase();
        if lower.contains("remote") {
            return REMOTE_REGION.to_string();
        }

        // "Austin, TX" / "Austin, TX 78701"
        let code = location
            .rsplit(',')
            .next()
            .and_then(|tail| tail.split_whitespace().next())
            .map(str::to_uppercase);
        if let Some(code) = code {
            if let Some((_, _, region)) = STATES.iter().find(|(c, _, _)| *c == code) {
                return region.to_string();
            }
        }

        // Longest name first so "west virginia" is not read as "virginia"
        STATES
            .iter()
            .filter(|(_, name, _)| lower.contains(name))
            .max_by_key(|(_, name, _)| name.len())
            .map(|(_, _, region)| region.to_string())
            .unwrap_or_else(|| OTHER_REGION.to_string())
    }
}

/// Latest health reading of one region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalHealth {
    pub region: String,
    /// Composite score of the region's latest month
    pub health_index: f64,
    pub smoothed_index: f64,
    pub latest_month: MonthKey,
    pub months: usize,
    pub latest: RawComponents,
}

/// Health index computed independently per region, healthiest first
pub fn regional_health_indices<C: RegionClassifier + ?Sized>(
    postings: &[JobPosting],
    classifier: &C,
    calculator: &HealthIndexCalculator,
) -> Result<Vec<RegionalHealth>> {
    let mut partitions: BTreeMap<String, Vec<JobPosting>> = BTreeMap::new();
    for posting in postings {
        partitions
            .entry(classifier.classify(&posting.location))
            .or_default()
            .push(posting.clone());
    }

    let mut rows = Vec::with_capacity(partitions.len());
    for (region, region_postings) in partitions {
        let index = calculator.calculate(&region_postings)?;
        let Some(latest) = index.latest() else {
            continue;
        };
        debug!(region = %region, months = index.points().len(), "regional health index");

        rows.push(RegionalHealth {
            health_index: latest.composite_score,
            smoothed_index: latest.smoothed_score,
            latest_month: latest.month_key,
            months: index.points().len(),
            latest: latest.raw_components,
            region,
        });
    }

    rows.sort_by(|a, b| {
        b.health_index
            .partial_cmp(&a.health_index)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.region.cmp(&b.region))
    });
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    #[rstest]
    #[case("Remote", "Remote")]
    #[case("Hybrid / remote-friendly", "Remote")]
    #[case("Austin, TX", "Southwest")]
    #[case("Seattle, WA 98101", "West")]
    #[case("New York, NY", "Northeast")]
    #[case("Charleston, West Virginia", "Southeast")]
    #[case("Chicago, Illinois", "Midwest")]
    #[case("Berlin, Germany", "Other")]
    #[case("", "Other")]
    fn test_keyword_classifier(#[case] location: &str, #[case] expected: &str) {
        assert_eq!(KeywordRegionClassifier.classify(location), expected);
    }

    #[test]
    fn test_closure_classifier() {
        let classifier = |location: &str| location.split(',').next().unwrap_or("").to_string();
        assert_eq!(classifier.classify("Paris, France"), "Paris");
    }

    #[test]
    fn test_regions_ranked_by_latest_index() {
        let d = |m: u32| NaiveDate::from_ymd_opt(2024, m, 1).unwrap();
        let mut postings = Vec::new();
        // West grows, Northeast shrinks
        for (month, west, northeast) in [(1, 1, 3), (2, 2, 2), (3, 3, 1)] {
            for i in 0..west {
                postings.push(JobPosting::new(d(month), "Dev", "Backend", format!("W{}", i), "Portland, OR"));
            }
            for i in 0..northeast {
                postings.push(JobPosting::new(d(month), "Dev", "Backend", format!("N{}", i), "Boston, MA"));
            }
        }

        let calculator = HealthIndexCalculator::new(3).unwrap();
        let rows = regional_health_indices(&postings, &KeywordRegionClassifier, &calculator).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].region, "West");
        assert_eq!(rows[0].health_index, 100.0);
        assert_eq!(rows[1].region, "Northeast");
        assert_eq!(rows[1].health_index, 0.0);
        assert_eq!(rows[0].latest.volume, 3);
    }
}
