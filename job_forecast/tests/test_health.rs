use chrono::NaiveDate;
use job_forecast::config::HealthIndexConfig;
use job_forecast::data::JobPosting;
use job_forecast::health::{HealthWeights, Normalization, Sentiment, Trend};
use job_forecast::regional::regional_health_indices;
use job_forecast::{HealthIndexCalculator, KeywordRegionClassifier};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rstest::rstest;

const COMPANIES: [&str; 6] = ["Acme", "Globex", "Initech", "Hooli", "Umbrella", "Wayne"];
const JOB_TYPES: [&str; 4] = ["Engineering", "Data", "Product", "Design"];
const LOCATIONS: [&str; 6] = [
    "Remote",
    "Austin, TX",
    "Seattle, WA",
    "Boston, MA",
    "Chicago, IL",
    "Atlanta, GA",
];

fn random_postings(rng: &mut StdRng, months: u32) -> Vec<JobPosting> {
    let mut postings = Vec::new();
    for month in 1..=months {
        let date = NaiveDate::from_ymd_opt(2024, month, 1).unwrap();
        for _ in 0..rng.gen_range(1..15) {
            postings.push(JobPosting::new(
                date,
                "Role",
                *JOB_TYPES.choose(rng).unwrap(),
                *COMPANIES.choose(rng).unwrap(),
                *LOCATIONS.choose(rng).unwrap(),
            ));
        }
    }
    postings
}

#[test]
fn test_weights_sum_to_one() {
    let weights = HealthWeights::default();
    assert!((weights.sum() - 1.0).abs() <= 1e-9);
    assert_eq!(weights.as_array(), [0.4, 0.2, 0.2, 0.1, 0.1]);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(12)]
fn test_scores_stay_in_bounds(#[case] months: u32) {
    let mut rng = StdRng::seed_from_u64(u64::from(months));
    let calculator = HealthIndexCalculator::new(3).unwrap();

    for _ in 0..10 {
        let postings = random_postings(&mut rng, months);
        let index = calculator.calculate(&postings).unwrap();

        assert_eq!(index.points().len(), months as usize);
        for point in index.points() {
            assert!((0.0..=100.0).contains(&point.composite_score));
            assert!((0.0..=100.0).contains(&point.smoothed_score));
        }
    }
}

#[test]
fn test_calculation_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(99);
    let postings = random_postings(&mut rng, 8);
    let calculator = HealthIndexCalculator::new(3).unwrap();

    let first = calculator.calculate(&postings).unwrap();
    let second = calculator.calculate(&postings).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        calculator.insights(&postings).unwrap(),
        calculator.insights(&postings).unwrap()
    );
}

#[test]
fn test_remote_heavy_month_has_full_ratio() {
    let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    let postings = vec![
        JobPosting::new(date, "Role", "Engineering", "Acme", "Remote"),
        JobPosting::new(date, "Role", "Data", "Globex", "Remote (EU)"),
    ];

    let index = HealthIndexCalculator::new(3).unwrap().calculate(&postings).unwrap();
    assert_eq!(index.points()[0].raw_components.remote_ratio, 1.0);
}

#[test]
fn test_two_months_degrade_to_min_max() {
    let jan = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
    let feb = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
    let postings = vec![
        JobPosting::new(jan, "Role", "Engineering", "Acme", "Remote"),
        JobPosting::new(feb, "Role", "Engineering", "Acme", "Remote"),
    ];

    let index = HealthIndexCalculator::new(3).unwrap().calculate(&postings).unwrap();
    assert_eq!(index.normalization(), Normalization::MinMax);
    for point in index.points() {
        assert!(point.composite_score.is_finite());
        assert!(point.smoothed_score.is_finite());
    }
    assert_eq!(index.trend(), Trend::InsufficientData);
}

#[test]
fn test_custom_weights_from_config() {
    let config = HealthIndexConfig {
        weights: HealthWeights::new(1.0, 0.0, 0.0, 0.0, 0.0).unwrap(),
        window: 1,
        ..HealthIndexConfig::default()
    };
    let calculator = HealthIndexCalculator::from_config(config).unwrap();

    // Volume alone drives the score: the busiest month scores 100
    let mut postings = Vec::new();
    for (month, count) in [(1, 2), (2, 8), (3, 5)] {
        let date = NaiveDate::from_ymd_opt(2024, month, 1).unwrap();
        for _ in 0..count {
            postings.push(JobPosting::new(date, "Role", "Engineering", "Acme", "Remote"));
        }
    }
    let index = calculator.calculate(&postings).unwrap();
    let scores: Vec<f64> = index.points().iter().map(|p| p.composite_score).collect();
    assert_eq!(scores[0], 0.0);
    assert_eq!(scores[1], 100.0);
    assert_eq!(scores[2], 50.0);

    let insights = calculator.insights(&postings).unwrap().unwrap();
    assert_eq!(insights.sentiment, Sentiment::Stable);
    assert_eq!(insights.trend, Trend::Improving);
}

#[test]
fn test_regional_indices_cover_every_region() {
    let mut rng = StdRng::seed_from_u64(3);
    let postings = random_postings(&mut rng, 6);
    let calculator = HealthIndexCalculator::new(3).unwrap();

    let regions = regional_health_indices(&postings, &KeywordRegionClassifier, &calculator).unwrap();
    let total_latest: usize = regions.iter().map(|r| r.latest.volume).sum();

    assert!(regions.len() <= LOCATIONS.len());
    assert!(total_latest > 0);
    assert!(regions
        .windows(2)
        .all(|w| w[0].health_index >= w[1].health_index));
    for region in &regions {
        assert!((0.0..=100.0).contains(&region.health_index));
    }
}
