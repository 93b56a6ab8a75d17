//! # Tide Table Fetching and Parsing
//!
//! This module handles all network and scraping work: it walks from the
//! observatory's index page to the page for one year and turns that page's
//! tide table into a [`TideSeries`].
//!
//! ## Data Source
//!
//! ### Hong Kong Observatory tide tables
//! - **Index**: `{base_url}/en/tide/ttext.htm`, whose first `<table>` holds one
//!   link per year, the link text being the year itself
//! - **Data page**: `{base_url}{href}`, whose first `<table>` holds the records
//! - **Format**: plain text rows, `<date> <height> <more columns...>`, after
//!   3 lines of header
//!
//! ### Data Processing Pipeline
//! 1. **Fetch**: HTTP GET of the index page
//! 2. **Locate**: exact match of the year against anchor text in the first table
//! 3. **Fetch**: HTTP GET of the year's page
//! 4. **Extract**: text of the first table, split into lines
//! 5. **Build**: skip 3 header lines, keep rows with at least 3 tokens
//!
//! ## Error Handling
//!
//! Three failures mean "nothing to chart" and print a diagnostic at the point
//! they happen: a non-200 status, a missing year link and a missing table.
//! [`TideError::is_absence`] reports these so the caller can stop quietly.
//! A transport failure or a height that is not a number is fatal.

use crate::{config::SourceConfig, TideSeries};
use reqwest::{Client, StatusCode};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, info};

/// Number of descriptive lines above the records in the data table.
const HEADER_LINES: usize = 3;

/// Number of extracted lines echoed to stdout before parsing.
const PREVIEW_LINES: usize = 10;

/// Errors that can occur while fetching and parsing tide tables.
#[derive(Error, Debug)]
pub enum TideError {
    /// Server answered with something other than 200
    #[error("Failed to fetch page. Status code: {0}")]
    Status(u16),

    /// No anchor in the index page's first table reads exactly as the year
    #[error("Could not find the link for the {year} tide data.")]
    LinkNotFound { year: i32 },

    /// Data page has no `<table>` element
    #[error("Could not find <table> tag containing tide data.")]
    TableNotFound,

    /// Second token of a data row is not a number
    #[error("invalid tide height {token:?} in line {line:?}")]
    InvalidHeight { token: String, line: String },

    /// HTTP request failed (DNS, connection, protocol)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Chart backend failed to draw or write the figure
    #[error("chart rendering failed: {0}")]
    Chart(String),
}

impl TideError {
    /// True for the failures that end the run with a printed diagnostic
    /// rather than an error exit.
    pub fn is_absence(&self) -> bool {
        matches!(
            self,
            TideError::Status(_) | TideError::LinkNotFound { .. } | TideError::TableNotFound
        )
    }
}

/// Fetch and parse the tide series for `source.year`.
///
/// This is the main entry point: index page → year link → data page →
/// table lines → records. Each step stops the pipeline on failure.
///
/// # Example
/// ```no_run
/// use tide_chart_lib::{config::Config, tide_data};
///
/// # async fn run() -> Result<(), tide_chart_lib::tide_data::TideError> {
/// let config = Config::new("https://www.hko.gov.hk", 2026);
/// let client = reqwest::Client::new();
/// let series = tide_data::fetch(&client, &config.source).await?;
/// println!("{} records", series.len());
/// # Ok(())
/// # }
/// ```
pub async fn fetch(client: &Client, source: &SourceConfig) -> Result<TideSeries, TideError> {
    let index_url = source.index_url();
    info!(url = %index_url, year = source.year, "fetching tide index");
    let index = fetch_page(client, &index_url).await?;

    let link = find_year_link(&parse_html(&index), source.year, &source.base_url)?;

    info!(url = %link, "fetching tide data page");
    let page = fetch_page(client, &link).await?;

    let lines = extract_lines(&parse_html(&page))?;
    let series = build_series(&lines)?;
    info!(
        lines = lines.len(),
        records = series.len(),
        "parsed tide records"
    );

    Ok(series)
}

/// GET `url` and return the body.
///
/// Only an exact 200 counts as success; any other status prints the code and
/// returns [`TideError::Status`]. Redirects follow the client's defaults.
pub async fn fetch_page(client: &Client, url: &str) -> Result<Vec<u8>, TideError> {
    let response = client.get(url).send().await?;
    let status = response.status();

    if status != StatusCode::OK {
        println!("Failed to fetch page. Status code: {}", status.as_u16());
        return Err(TideError::Status(status.as_u16()));
    }

    let body = response.bytes().await?;
    debug!(url, bytes = body.len(), "fetched page");
    Ok(body.to_vec())
}

/// Parse a fetched body as an HTML document.
pub fn parse_html(body: &[u8]) -> Html {
    Html::parse_document(&String::from_utf8_lossy(body))
}

/// Find the link to `year`'s tide page in the document's first table.
///
/// The anchor must carry an `href` and its text must be exactly the year,
/// so `202` does not match `2026` and `" 2026 "` does not match either.
/// Text split across several child nodes (`20<b>26</b>`) does not count.
/// The returned URL is `base_url` followed by the href, unmodified.
pub fn find_year_link(document: &Html, year: i32, base_url: &str) -> Result<String, TideError> {
    let table_sel = Selector::parse("table").expect("CSS selector should be valid");
    let anchor_sel = Selector::parse("a[href]").expect("CSS selector should be valid");
    let wanted = year.to_string();

    let href = document.select(&table_sel).next().and_then(|table| {
        table
            .select(&anchor_sel)
            .find(|a| single_string(*a).as_deref() == Some(wanted.as_str()))
            .and_then(|a| a.value().attr("href"))
    });

    match href {
        Some(href) => {
            debug!(year, href, "found year link");
            Ok(format!("{}{}", base_url, href))
        }
        None => {
            println!("Could not find the link for the {} tide data.", year);
            Err(TideError::LinkNotFound { year })
        }
    }
}

/// The element's text when it holds exactly one child node, looking through
/// a single wrapping element (`<a><b>2026</b></a>`).
fn single_string(element: ElementRef<'_>) -> Option<String> {
    let mut children = element.children();
    let child = children.next()?;
    if children.next().is_some() {
        return None;
    }
    if let Some(text) = child.value().as_text() {
        return Some(text.to_string());
    }
    ElementRef::wrap(child).and_then(single_string)
}

/// Line separators recognised when splitting table text.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split on every line separator, `\r\n` counting once. No trailing empty
/// line is produced for text ending in a separator.
fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let Some(at) = rest.find(is_line_break) else {
            lines.push(rest.to_string());
            break;
        };
        lines.push(rest[..at].to_string());
        let separator = if rest[at..].starts_with("\r\n") {
            2
        } else {
            rest[at..].chars().next().map_or(1, char::len_utf8)
        };
        rest = &rest[at + separator..];
    }
    lines
}

/// Return the text of the document's first table, one entry per line.
///
/// Prints a short preview of the lines to stdout.
pub fn extract_lines(document: &Html) -> Result<Vec<String>, TideError> {
    let table_sel = Selector::parse("table").expect("CSS selector should be valid");

    let Some(table) = document.select(&table_sel).next() else {
        println!("Could not find <table> tag containing tide data.");
        return Err(TideError::TableNotFound);
    };

    let text: String = table.text().collect();
    let lines = split_lines(&text);

    println!("Tide data preview:");
    for line in lines.iter().take(PREVIEW_LINES) {
        println!("{}", line);
    }

    Ok(lines)
}

/// Turn table lines into a series.
///
/// The first 3 lines are dropped. Of the rest, a line split on whitespace
/// into at least 3 tokens yields `(token[0], round2(token[1]))`; shorter
/// lines are skipped without notice. A non-numeric height is an error.
pub fn build_series<S: AsRef<str>>(lines: &[S]) -> Result<TideSeries, TideError> {
    let mut series = TideSeries::new();

    for line in lines.iter().skip(HEADER_LINES) {
        let line = line.as_ref();
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            continue;
        }

        let height: f64 = parts[1].parse().map_err(|_| TideError::InvalidHeight {
            token: parts[1].to_string(),
            line: line.to_string(),
        })?;
        series.push(parts[0], round2(height));
    }

    Ok(series)
}

/// Round to 2 decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
