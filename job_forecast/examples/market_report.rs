use job_forecast::company::{
    company_growth_rates, detect_hiring_surges, DEFAULT_SURGE_MIN_JOBS,
    DEFAULT_SURGE_THRESHOLD_PCT,
};
use job_forecast::growth::{compare_growth_rates, GrowthDimension};
use job_forecast::regional::regional_health_indices;
use job_forecast::{
    AnalyticsConfig, CategoryFilter, DataLoader, ForecastOutcome, GrowthPredictor,
    HealthIndexCalculator, KeywordRegionClassifier, VolumeForecaster,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("job_forecast=info")),
        )
        .init();

    // Optional arguments: postings CSV, then a JSON config
    let mut args = std::env::args().skip(1);
    let csv_path = args.next().map(PathBuf::from).unwrap_or_else(|| {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("examples")
            .join("csv")
            .join("postings.csv")
    });
    let config = match args.next() {
        Some(path) => AnalyticsConfig::from_json_file(path)?,
        None => AnalyticsConfig::default(),
    };

    println!("Loading postings from: {}", csv_path.display());
    let postings = DataLoader::from_csv(&csv_path)?;
    println!("Loaded {} postings", postings.len());

    // Posting volume forecast
    let forecaster = VolumeForecaster::from_config(config.forecast.clone())?;
    println!("\n== Posting volume forecast ==");
    match forecaster.forecast_postings(&postings, &CategoryFilter::All)? {
        ForecastOutcome::InsufficientData {
            nonzero_points,
            required,
        } => println!(
            "Not enough history: {} non-zero months, {} required",
            nonzero_points, required
        ),
        outcome => {
            if let ForecastOutcome::ModelFailureFallback { reason, .. } = &outcome {
                println!("Seasonal model unavailable ({}), showing flat forecast", reason);
            }
            if let Some(result) = outcome.result() {
                for point in result.points() {
                    println!(
                        "{}: {:>6.1}  [{:>6.1}, {:>6.1}]",
                        point.month, point.value, point.lower, point.upper
                    );
                }
            }
        }
    }

    // Job type growth
    let predictor = GrowthPredictor::from_config(config.growth.clone())?;
    println!("\n== Predicted growth by job type ==");
    for estimate in predictor.predict(&postings)? {
        println!(
            "{:<20} current {:>5.1}  predicted {:>5.1}  growth {:>7.1}%",
            estimate.category_label,
            estimate.current_baseline,
            estimate.predicted_value,
            estimate.growth_pct
        );
    }

    println!("\n== Recent growth by company ==");
    for row in compare_growth_rates(&postings, &[], GrowthDimension::Company, 3)? {
        println!(
            "{:<20} {:>5.1} -> {:>5.1}  ({:+.1}%)",
            row.item, row.previous, row.current, row.growth_pct
        );
    }

    println!("\n== Company growth (last 6 months) ==");
    for row in company_growth_rates(&postings, 6).iter().take(5) {
        println!(
            "{:<20} {:>3} -> {:>3}  ({:+.1}%)",
            row.company, row.previous_count, row.recent_count, row.growth_pct
        );
    }

    let surges =
        detect_hiring_surges(&postings, DEFAULT_SURGE_THRESHOLD_PCT, DEFAULT_SURGE_MIN_JOBS)?;
    for surge in &surges {
        println!(
            "{:?}: {} {} -> {} ({:+.1}%)",
            surge.activity_type,
            surge.company,
            surge.previous_count,
            surge.recent_count,
            surge.pct_change
        );
    }

    // Market health
    let calculator = HealthIndexCalculator::from_config(config.health.clone())?;
    println!("\n== Market health ==");
    if let Some(insights) = calculator.insights(&postings)? {
        println!(
            "{}: index {:.1} ({}), trend {}",
            insights.last_updated, insights.current_index, insights.sentiment, insights.trend
        );
        println!("{}", insights.sentiment.description());
        println!("{}", insights.trend.description());
    }

    println!("\n== Regional health ==");
    for region in regional_health_indices(&postings, &KeywordRegionClassifier, &calculator)? {
        println!(
            "{:<10} {:>5.1}  ({} months, latest {})",
            region.region, region.health_index, region.months, region.latest_month
        );
    }

    println!("\n{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}
