//! Test suite for the tide chart binary: record-building properties and the
//! full HTTP pipeline against a local mock server.


use super::{chartable, config_path};
use tide_chart_lib::tide_data::TideError;
use tide_chart_lib::TideSeries;

#[test]
fn config_flag_takes_following_argument() {
    let args: Vec<String> = ["hko-tide-chart", "--stdout", "--config", "custom.toml"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(config_path(&args), Some("custom.toml"));
}

#[test]
fn config_flag_without_value_is_ignored() {
    let args: Vec<String> = ["hko-tide-chart", "--config"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(config_path(&args), None);
    assert_eq!(config_path(&args[..1]), None);
}

#[test]
fn absence_errors_end_the_run_quietly() {
    let absent = [
        TideError::Status(404),
        TideError::LinkNotFound { year: 2026 },
        TideError::TableNotFound,
    ];
    for error in absent {
        assert!(chartable(Err(error), 2026).unwrap().is_none());
    }
}

#[test]
fn bad_height_fails_the_run() {
    let error = TideError::InvalidHeight {
        token: "N/A".to_string(),
        line: "01/01 N/A 03:00".to_string(),
    };
    let err = chartable(Err(error), 2026).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TideError>(),
        Some(TideError::InvalidHeight { .. })
    ));
}

#[test]
fn empty_series_is_not_charted() {
    assert_eq!(chartable(Ok(TideSeries::new()), 2026).unwrap(), None);
}

#[test]
fn records_are_passed_on_for_charting() {
    let mut series = TideSeries::new();
    series.push("01/01", 1.23);
    let charted = chartable(Ok(series.clone()), 2026).unwrap();
    assert_eq!(charted, Some(series));
}
