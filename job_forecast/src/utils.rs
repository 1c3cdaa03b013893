//! Utility functions for the job_forecast crate

use crate::data::MonthKey;

/// The `horizon` months following `last`
pub fn future_months(last: MonthKey, horizon: usize) -> Vec<MonthKey> {
    let mut months = Vec::with_capacity(horizon);
    let mut current = last;

    for _ in 0..horizon {
        current = current.succ();
        months.push(current);
    }

    months
}

/// Every month from `start` to `end` inclusive; empty when `end < start`
pub fn month_range(start: MonthKey, end: MonthKey) -> Vec<MonthKey> {
    let span = start.months_until(&end);
    if span < 0 {
        return Vec::new();
    }

    let mut months = vec![start];
    months.extend(future_months(start, span as usize));
    months
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_future_months_cross_year() {
        let nov = MonthKey::new(2023, 11).unwrap();
        let months: Vec<String> = future_months(nov, 3).iter().map(|m| m.to_string()).collect();
        assert_eq!(months, vec!["2023-12", "2024-01", "2024-02"]);
        assert!(future_months(nov, 0).is_empty());
    }

    #[test]
    fn test_month_range() {
        let start = MonthKey::new(2024, 1).unwrap();
        let end = MonthKey::new(2024, 4).unwrap();
        assert_eq!(month_range(start, end).len(), 4);
        assert_eq!(month_range(start, start), vec![start]);
        assert!(month_range(end, start).is_empty());
    }
}
