//! # HKO Tide Chart Entry Point
//!
//! This binary fetches one year of tide tables and charts them. It writes an
//! SVG chart by default and an ASCII chart with `--stdout`.
//!
//! Flags:
//! - `--stdout`: draw the chart in the terminal instead of writing SVG
//! - `--config <path>`: read settings from `<path>` instead of tide-config.toml
//! - `--verbose`: debug-level logging on stderr

// Test modules
#[cfg(test)]
mod tests;

use std::env;
use tide_chart_lib::tide_data::{self, TideError};
use tide_chart_lib::{config::Config, logger, renderer, TideSeries};
use tracing::{debug, info};

/// Value following `--config`, if any.
fn config_path(args: &[String]) -> Option<&str> {
    args.iter()
        .position(|arg| arg == "--config")
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Decide what the fetch result means for the run.
///
/// Absence errors have already printed their diagnostic and end the run
/// quietly with `Ok(None)`, as does an empty table after printing its own
/// notice. Everything else fatal is returned for a non-zero exit.
fn chartable(
    fetched: Result<TideSeries, TideError>,
    year: i32,
) -> anyhow::Result<Option<TideSeries>> {
    let series = match fetched {
        Ok(series) => series,
        Err(error) if error.is_absence() => {
            debug!(%error, "nothing to chart");
            return Ok(None);
        }
        Err(error) => return Err(error.into()),
    };

    if series.is_empty() {
        println!("No tide records found for {}.", year);
        return Ok(None);
    }

    Ok(Some(series))
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    // Development mode: render to stdout instead of an SVG file
    let ascii_mode = args.iter().any(|arg| arg == "--stdout");
    let verbose = args.iter().any(|arg| arg == "--verbose");

    logger::init_logger(verbose);

    let config = match config_path(&args) {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    let year = config.source.year;

    // Create Tokio runtime for the two page fetches
    let rt = tokio::runtime::Runtime::new()?;
    let fetched = rt.block_on(async {
        let client = reqwest::Client::new();
        tide_data::fetch(&client, &config.source).await
    });

    let Some(series) = chartable(fetched, year)? else {
        return Ok(());
    };

    if ascii_mode {
        renderer::draw_ascii(&series, year);
        return Ok(());
    }

    let path = renderer::draw_chart(&series, year, &config.chart)?;
    info!("open {} to view the chart", path.display());

    Ok(())
}
