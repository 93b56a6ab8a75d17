//! # HKO Tide Chart Core Library
//!
//! This library provides the data pipeline for charting a year of published
//! tide heights from the Hong Kong Observatory (or any site laid out the same
//! way). The binary crate wires these pieces together; everything here is
//! usable on its own and is covered by unit tests.
//!
//! ## Data Flow
//! 1. **Index**: fetch `{base_url}/en/tide/ttext.htm` and find the anchor for the year
//! 2. **Data page**: fetch `{base_url}{href}` and take the text of its first `<table>`
//! 3. **Records**: skip the 3 header lines, keep rows with at least 3 tokens
//! 4. **Chart**: bar + line chart over the dates, written as SVG or drawn in ASCII
//!
//! Each stage returns a `Result`. The "absence" errors (bad status, missing
//! link, missing table) have already printed their diagnostic when they are
//! returned, so callers end the run quietly; anything else is fatal.
//!
//! ## Core Types
//! - [`TideSeries`]: the aligned `dates` / `heights` sequences for one run
//! - [`config::Config`]: where to fetch from and how to draw

pub mod config;
pub mod logger;
pub mod renderer;
pub mod tide_data;

/// Tide heights for one year, stored as two aligned sequences.
///
/// Index `i` of [`dates`](TideSeries::dates) and [`heights`](TideSeries::heights)
/// refer to the same observation. The fields are private and the only way to
/// grow the series is [`push`](TideSeries::push), so both sequences always have
/// the same length.
///
/// # Example
/// ```
/// use tide_chart_lib::TideSeries;
///
/// let mut series = TideSeries::new();
/// series.push("2026-01-01", 1.23);
/// series.push("2026-01-02", 2.5);
///
/// assert_eq!(series.len(), 2);
/// assert_eq!(series.dates(), ["2026-01-01", "2026-01-02"]);
/// assert_eq!(series.heights(), [1.23, 2.5]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TideSeries {
    dates: Vec<String>,
    heights: Vec<f64>,
}

impl TideSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one observation to both sequences.
    pub fn push(&mut self, date: impl Into<String>, height: f64) {
        self.dates.push(date.into());
        self.heights.push(height);
    }

    /// Date labels in insertion order.
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    /// Heights in metres, rounded to 2 decimals, in insertion order.
    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Iterate `(date, height)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.dates
            .iter()
            .map(String::as_str)
            .zip(self.heights.iter().copied())
    }
}
