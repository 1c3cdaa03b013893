//! Company hiring activity: growth over recent months and sudden surges

use crate::data::{distinct_months, JobPosting, MonthKey};
use crate::error::{ForecastError, Result};
use market_math::statistics::percent_change;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Postings a company needs across both windows to be ranked
pub const MIN_COMPANY_POSTINGS: usize = 3;

/// Default change that counts as a surge or slowdown, in percent
pub const DEFAULT_SURGE_THRESHOLD_PCT: f64 = 50.0;

/// Default postings a company needs in either month to be checked for surges
pub const DEFAULT_SURGE_MIN_JOBS: usize = 3;

/// Posting growth of a single company
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyGrowth {
    pub company: String,
    pub recent_count: usize,
    pub previous_count: usize,
    pub total_count: usize,
    pub growth_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityType {
    Surge,
    Slowdown,
}

/// Unusual month-over-month change in a company's postings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HiringSurge {
    pub company: String,
    pub recent_month: MonthKey,
    pub previous_month: MonthKey,
    pub recent_count: usize,
    pub previous_count: usize,
    pub pct_change: f64,
    pub activity_type: ActivityType,
}

fn count_by_company<'a>(
    postings: &'a [JobPosting],
    months: &BTreeSet<MonthKey>,
) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for posting in postings.iter().filter(|p| months.contains(&p.month_key())) {
        *counts.entry(posting.company.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Growth of each company between the two halves of the last `lookback` months.
///
/// The recent half holds the last `lookback / 2` months with postings, the
/// previous half the months before it. Companies with fewer than
/// [`MIN_COMPANY_POSTINGS`] postings overall are left out.
pub fn company_growth_rates(postings: &[JobPosting], lookback: usize) -> Vec<CompanyGrowth> {
    let months = distinct_months(postings);
    let window = lookback.min(months.len());
    let half = window / 2;
    if window < 2 || half == 0 {
        return Vec::new();
    }

    let recent: BTreeSet<MonthKey> = months[months.len() - half..].iter().copied().collect();
    let previous: BTreeSet<MonthKey> = months[months.len() - window..months.len() - half]
        .iter()
        .copied()
        .collect();

    let recent_counts = count_by_company(postings, &recent);
    let previous_counts = count_by_company(postings, &previous);

    let companies: BTreeSet<&str> = recent_counts
        .keys()
        .chain(previous_counts.keys())
        .copied()
        .collect();

    let mut rows: Vec<CompanyGrowth> = companies
        .into_iter()
        .filter_map(|company| {
            let recent_count = recent_counts.get(company).copied().unwrap_or(0);
            let previous_count = previous_counts.get(company).copied().unwrap_or(0);
            let total_count = recent_count + previous_count;
            (total_count >= MIN_COMPANY_POSTINGS).then(|| CompanyGrowth {
                company: company.to_string(),
                recent_count,
                previous_count,
                total_count,
                growth_pct: percent_change(previous_count as f64, recent_count as f64),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.growth_pct
            .partial_cmp(&a.growth_pct)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.company.cmp(&b.company))
    });
    rows
}

/// Companies whose postings changed by at least `threshold_pct` between the
/// last two months with data, largest absolute change first.
pub fn detect_hiring_surges(
    postings: &[JobPosting],
    threshold_pct: f64,
    min_jobs: usize,
) -> Result<Vec<HiringSurge>> {
    if !(threshold_pct >= 0.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "Surge threshold must be non-negative, got {}",
            threshold_pct
        )));
    }

    let months = distinct_months(postings);
    let [.., previous_month, recent_month] = months[..] else {
        return Ok(Vec::new());
    };

    let recent_counts = count_by_company(postings, &BTreeSet::from([recent_month]));
    let previous_counts = count_by_company(postings, &BTreeSet::from([previous_month]));

    let companies: BTreeSet<&str> = recent_counts
        .keys()
        .chain(previous_counts.keys())
        .copied()
        .collect();

    let mut surges = Vec::new();
    for company in companies {
        let recent_count = recent_counts.get(company).copied().unwrap_or(0);
        let previous_count = previous_counts.get(company).copied().unwrap_or(0);
        if recent_count < min_jobs && previous_count < min_jobs {
            continue;
        }

        let pct_change = percent_change(previous_count as f64, recent_count as f64);
        if pct_change.abs() < threshold_pct {
            continue;
        }

        surges.push(HiringSurge {
            company: company.to_string(),
            recent_month,
            previous_month,
            recent_count,
            previous_count,
            pct_change,
            activity_type: if pct_change > 0.0 {
                ActivityType::Surge
            } else {
                ActivityType::Slowdown
            },
        });
    }

    surges.sort_by(|a, b| {
        b.pct_change
            .abs()
            .partial_cmp(&a.pct_change.abs())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.company.cmp(&b.company))
    });
    Ok(surges)
}
