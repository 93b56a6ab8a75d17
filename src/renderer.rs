//! # Tide Chart Rendering
//!
//! This module draws a [`TideSeries`] two ways:
//! - [`draw_chart`]: an SVG figure with a bar series and a line-with-markers
//!   series over the same categorical date axis
//! - [`draw_ascii`]: the same picture in the terminal, for quick looks and for
//!   machines without anything to open an SVG with
//!
//! Both use the same vertical bounds so the two renditions agree.

use crate::{config::ChartConfig, tide_data::TideError, TideSeries};
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::path::PathBuf;
use tracing::info;

/// Chart title for `year`.
fn chart_title(year: i32) -> String {
    format!("Tide Height Changes ({}): Bar and Line Plot Combined", year)
}

/// Vertical range covering every finite height and the zero baseline of
/// the bars, with 10% headroom above the tallest bar.
fn value_bounds(series: &TideSeries) -> (f64, f64) {
    let (min, max) = series
        .heights()
        .iter()
        .filter(|h| h.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &h| {
            (min.min(h), max.max(h))
        });

    if min > max {
        return (0.0, 1.0);
    }

    let low = min.min(0.0);
    let high = if max > 0.0 { (max * 1.1).min(f64::MAX) } else { 0.0 };
    if high > low {
        (low, high)
    } else {
        (low, low + 1.0)
    }
}

/// Render the series to an SVG file at `config.output` and return its path.
///
/// Bars are translucent blue ("Tide Heights"), the line is red with circle
/// markers ("Line Plot"). Date labels are rotated 90° and only horizontal
/// grid lines are drawn.
pub fn draw_chart(
    series: &TideSeries,
    year: i32,
    config: &ChartConfig,
) -> Result<PathBuf, TideError> {
    if let Some((date, height)) = series.iter().find(|(_, h)| !h.is_finite()) {
        return Err(TideError::Chart(format!(
            "height {} on {} cannot be plotted",
            height, date
        )));
    }
    let (low, high) = value_bounds(series);
    if !(high - low).is_finite() {
        return Err(TideError::Chart(format!(
            "height range {}..{} is too wide to plot",
            low, high
        )));
    }

    plot_svg(series, year, config).map_err(|e| TideError::Chart(e.to_string()))?;
    info!(
        path = %config.output.display(),
        records = series.len(),
        "chart written"
    );
    Ok(config.output.clone())
}

fn plot_svg(
    series: &TideSeries,
    year: i32,
    config: &ChartConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let font = config.font_family.as_str();
    let count = series.len() as u32;
    let (low, high) = value_bounds(series);

    let root = SVGBackend::new(&config.output, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(chart_title(year), (font, 22))
        .margin(15)
        .x_label_area_size(90)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..count).into_segmented(), low..high)?;

    let date_label = |value: &SegmentValue<u32>| match value {
        SegmentValue::CenterOf(index) => series
            .dates()
            .get(*index as usize)
            .cloned()
            .unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(series.len())
        .x_label_formatter(&date_label)
        .x_label_style((font, 11).into_font().transform(FontTransform::Rotate90))
        .y_label_style((font, 12))
        .x_desc("Date")
        .y_desc("Tide Height (m)")
        .axis_desc_style((font, 14))
        .draw()?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.mix(0.6).filled())
                .margin(2)
                .data(
                    series
                        .heights()
                        .iter()
                        .enumerate()
                        .map(|(i, &h)| (i as u32, h)),
                ),
        )?
        .label("Tide Heights")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], BLUE.mix(0.6).filled()));

    let points: Vec<(SegmentValue<u32>, f64)> = series
        .heights()
        .iter()
        .enumerate()
        .map(|(i, &h)| (SegmentValue::CenterOf(i as u32), h))
        .collect();

    chart
        .draw_series(LineSeries::new(points.iter().cloned(), &RED))?
        .label("Line Plot")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 12, y)], &RED));
    chart.draw_series(
        points
            .iter()
            .map(|(x, y)| Circle::new((x.clone(), *y), 3, RED.filled())),
    )?;

    chart
        .configure_series_labels()
        .label_font((font, 12))
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Build the ASCII rendition of the chart.
///
/// One column per record: `█` fills from the zero line to the height and
/// `•` marks the height itself, tracing the line plot. Columns for heights
/// that are not finite stay empty.
pub fn render_ascii(series: &TideSeries, year: i32) -> String {
    const ROWS: usize = 20;
    const Y_AXIS_WIDTH: usize = 7; // Space for Y-axis labels
    let sample_count = series.len();

    let (low, high) = value_bounds(series);
    let value_to_row = |value: f64| {
        let normalized = (value - low) / (high - low);
        (((1.0 - normalized) * (ROWS as f64 - 1.0)).round() as usize).min(ROWS - 1)
    };

    let mut grid = vec![vec![' '; sample_count + Y_AXIS_WIDTH]; ROWS];
    for row in grid.iter_mut() {
        row[Y_AXIS_WIDTH - 1] = '│';
    }

    // Y-axis labels, at most one per row
    let span = high - low;
    let step: f64 = if span > 4.0 { 1.0 } else { 0.5 };
    let step = step.max(span / (ROWS as f64 - 1.0));
    let first_label = (low / step).ceil() * step;
    for k in 0..ROWS {
        let label_value = first_label + k as f64 * step;
        if !(label_value <= high) {
            break;
        }
        let row = value_to_row(label_value);
        let label = format!("{:>width$.1}", label_value, width = Y_AXIS_WIDTH - 2);
        for (i, ch) in label.chars().take(Y_AXIS_WIDTH - 1).enumerate() {
            grid[row][i] = ch;
        }
    }

    let zero_row = value_to_row(0.0);
    for (column, &height) in series.heights().iter().enumerate() {
        if !height.is_finite() {
            continue;
        }
        let row = value_to_row(height);
        let grid_column = column + Y_AXIS_WIDTH;

        let (top, bottom) = if row <= zero_row {
            (row, zero_row)
        } else {
            (zero_row, row)
        };
        for bar_row in grid.iter_mut().take(bottom + 1).skip(top) {
            bar_row[grid_column] = '█';
        }
        grid[row][grid_column] = '•';
    }

    let mut out = String::new();
    out.push_str(&chart_title(year));
    out.push('\n');
    out.push_str("Tide Height (m)    █ Tide Heights   • Line Plot\n");
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    // Date span below the chart
    let padding = " ".repeat(Y_AXIS_WIDTH);
    if let (Some(first), Some(last)) = (series.dates().first(), series.dates().last()) {
        let gap = sample_count.saturating_sub(first.len() + last.len()).max(1);
        out.push_str(&format!("{}{}{}{}\n", padding, first, " ".repeat(gap), last));
    }

    out
}

/// Render tide data to ASCII terminal.
pub fn draw_ascii(series: &TideSeries, year: i32) {
    print!("{}", render_ascii(series, year));
}
