use job_forecast::error::ForecastError;
use market_math::MathError;
use std::io;

#[test]
fn test_error_conversion() {
    // Test IO error conversion
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forecast_error = ForecastError::from(io_error);
    assert!(matches!(forecast_error, ForecastError::IoError(_)));

    // Math errors keep their message
    let math_error = MathError::InsufficientData("need 6 points".to_string());
    let forecast_error = ForecastError::from(math_error.clone());
    match forecast_error {
        ForecastError::Math(inner) => assert_eq!(inner, math_error),
        other => panic!("Expected Math variant, got {:?}", other),
    }

    // JSON errors
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(
        ForecastError::from(json_error),
        ForecastError::JsonError(_)
    ));
}

#[test]
fn test_error_display() {
    let error = ForecastError::InvalidParameter("window must be positive".to_string());
    let error_string = format!("{}", error);
    assert!(error_string.contains("window must be positive"));

    // Test with source error
    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error_string = ForecastError::from(io_error).to_string();
    assert!(error_string.contains("IO error"));
    assert!(error_string.contains("permission denied"));

    let error = ForecastError::from(MathError::CalculationError("zero variance".to_string()));
    assert!(error.to_string().contains("zero variance"));
}

#[test]
fn test_malformed_input_from_month_key() {
    let error = "2024-00".parse::<job_forecast::MonthKey>().unwrap_err();
    assert!(matches!(error, ForecastError::MalformedInput(_)));
}
