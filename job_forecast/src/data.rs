//! Job posting records and monthly time series construction

use crate::error::{ForecastError, Result};
use crate::regional::{KeywordRegionClassifier, RegionClassifier};
use crate::utils::month_range;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Date layouts accepted when a posting date arrives as text
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Year-month bucket used as the time axis for every aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Create a month key, `month` in `1..=12`
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ForecastError::MalformedInput(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }

        Ok(Self { year, month })
    }

    /// Month containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following calendar month
    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Signed number of months from `self` to `other`
    pub fn months_until(&self, other: &MonthKey) -> i64 {
        (other.year as i64 - self.year as i64) * 12 + (other.month as i64 - self.month as i64)
    }

}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || ForecastError::MalformedInput(format!("Invalid month key: {:?}", s));

        let (year, month) = s.trim().split_once('-').ok_or_else(malformed)?;
        let year = year.parse::<i32>().map_err(|_| malformed())?;
        let month = month.parse::<u32>().map_err(|_| malformed())?;

        Self::new(year, month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// A normalized job posting as delivered by the ingestion layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub date: NaiveDate,
    pub job_title: String,
    pub job_type: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary: Option<String>,
}

impl JobPosting {
    /// Create a posting without salary information
    pub fn new(
        date: NaiveDate,
        job_title: impl Into<String>,
        job_type: impl Into<String>,
        company: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            date,
            job_title: job_title.into(),
            job_type: job_type.into(),
            company: company.into(),
            location: location.into(),
            salary: None,
        }
    }

    /// Create a posting from a textual date, rejecting unparseable dates
    pub fn parse(
        date: &str,
        job_title: impl Into<String>,
        job_type: impl Into<String>,
        company: impl Into<String>,
        location: impl Into<String>,
    ) -> Result<Self> {
        let date = parse_date(date).ok_or_else(|| {
            ForecastError::MalformedInput(format!("Unparseable posting date: {:?}", date))
        })?;

        Ok(Self::new(date, job_title, job_type, company, location))
    }

    /// Month bucket of the posting date
    pub fn month_key(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }

    /// Whether the location text signals a remote role
    pub fn is_remote(&self) -> bool {
        self.location.to_lowercase().contains("remote")
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Which postings contribute to a series
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    JobType(String),
    Company(String),
    Region(String),
}

impl CategoryFilter {
    /// Match against the default keyword region classifier
    pub fn matches(&self, posting: &JobPosting) -> bool {
        self.matches_with(posting, &KeywordRegionClassifier)
    }

    /// Match using a caller-supplied region classifier
    pub fn matches_with<C: RegionClassifier + ?Sized>(
        &self,
        posting: &JobPosting,
        classifier: &C,
    ) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::JobType(label) => posting.job_type == *label,
            CategoryFilter::Company(name) => posting.company == *name,
            CategoryFilter::Region(region) => classifier.classify(&posting.location) == *region,
        }
    }
}

/// Contiguous, ascending month-to-value series
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MonthlySeries {
    points: Vec<(MonthKey, f64)>,
}

impl MonthlySeries {
    /// Count the postings matching `filter` per month, zero-filling gaps
    pub fn from_postings(postings: &[JobPosting], filter: &CategoryFilter) -> Self {
        Self::from_postings_with(postings, filter, &KeywordRegionClassifier)
    }

    /// Like [`MonthlySeries::from_postings`], resolving region filters with `classifier`
    pub fn from_postings_with<C: RegionClassifier + ?Sized>(
        postings: &[JobPosting],
        filter: &CategoryFilter,
        classifier: &C,
    ) -> Self {
        Self::from_months(
            postings
                .iter()
                .filter(|p| filter.matches_with(p, classifier))
                .map(JobPosting::month_key),
        )
    }

    /// Count occurrences of each month, zero-filling gaps
    pub fn from_months<I: IntoIterator<Item = MonthKey>>(months: I) -> Self {
        let mut counts: BTreeMap<MonthKey, f64> = BTreeMap::new();
        for month in months {
            *counts.entry(month).or_insert(0.0) += 1.0;
        }

        Self::from_counts(&counts)
    }

    /// Materialise every month between the first and last key of `counts`
    pub fn from_counts(counts: &BTreeMap<MonthKey, f64>) -> Self {
        let (Some((&first, _)), Some((&last, _))) =
            (counts.first_key_value(), counts.last_key_value())
        else {
            return Self::default();
        };

        let points: Vec<(MonthKey, f64)> = month_range(first, last)
            .into_iter()
            .map(|month| (month, counts.get(&month).copied().unwrap_or(0.0)))
            .collect();

        debug!(
            months = points.len(),
            observed = counts.len(),
            "built monthly series"
        );

        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Ordered `(month, value)` pairs
    pub fn points(&self) -> &[(MonthKey, f64)] {
        &self.points
    }

    pub fn months(&self) -> Vec<MonthKey> {
        self.points.iter().map(|(m, _)| *m).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    /// Value recorded for `month`, if it lies inside the series
    pub fn get(&self, month: &MonthKey) -> Option<f64> {
        self.points
            .binary_search_by(|(m, _)| m.cmp(month))
            .ok()
            .map(|idx| self.points[idx].1)
    }

    pub fn first_month(&self) -> Option<MonthKey> {
        self.points.first().map(|(m, _)| *m)
    }

    pub fn last_month(&self) -> Option<MonthKey> {
        self.points.last().map(|(m, _)| *m)
    }

    pub fn last_value(&self) -> Option<f64> {
        self.points.last().map(|(_, v)| *v)
    }

    /// Number of months with a non-zero value
    pub fn nonzero_count(&self) -> usize {
        self.points.iter().filter(|(_, v)| *v != 0.0).count()
    }
}

/// Sorted distinct job type labels present in `postings`
pub fn distinct_job_types(postings: &[JobPosting]) -> Vec<String> {
    postings
        .iter()
        .map(|p| p.job_type.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct months present in `postings`, without gap filling
pub fn distinct_months(postings: &[JobPosting]) -> Vec<MonthKey> {
    postings
        .iter()
        .map(JobPosting::month_key)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Deserialize)]
struct CsvPosting {
    date: String,
    job_title: String,
    job_type: String,
    company: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    salary: Option<String>,
}

/// Data loader for posting exports
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load postings from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<JobPosting>> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load postings from any CSV source.
    ///
    /// Required columns: `date`, `job_title`, `job_type`, `company`.
    /// Rows whose date cannot be parsed are dropped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<JobPosting>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut postings = Vec::new();
        let mut dropped = 0usize;

        for row in csv_reader.deserialize::<CsvPosting>() {
            let row = row?;
            let Some(date) = parse_date(&row.date) else {
                dropped += 1;
                continue;
            };

            postings.push(JobPosting {
                date,
                job_title: row.job_title,
                job_type: row.job_type,
                company: row.company,
                location: row.location.unwrap_or_default(),
                salary: row.salary.filter(|s| !s.is_empty()),
            });
        }

        if dropped > 0 {
            warn!(dropped, "skipped postings with unparseable dates");
        }
        if postings.is_empty() && dropped > 0 {
            return Err(ForecastError::DataError(
                "No posting in the file has a parseable date".to_string(),
            ));
        }

        Ok(postings)
    }
}
