//! Chart artifact rendering.
//!
//! One PNG, two bar panels: daily sales counts for the two target months
//! (left, one bar color per month) and monthly revenue (right), matching the
//! layout of the report this tool replaces.
//!
//! Plotters runs without its font stack here (see Cargo.toml), so panels
//! draw frames and gridlines as plain line series instead of labeled axes.
//! The numbers themselves appear in the document's text sections.

use std::path::Path;

use chrono::Datelike;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::domain::AggregateResult;
use crate::error::AppError;

const MONTH_A_BAR: RGBColor = RGBColor(135, 206, 235); // sky blue
const MONTH_B_BAR: RGBColor = RGBColor(250, 128, 114); // salmon
const REVENUE_BAR: RGBColor = RGBColor(144, 238, 144); // light green
const GRID: RGBColor = RGBColor(214, 214, 214);
const FRAME: RGBColor = RGBColor(64, 64, 64);

/// Maximum day index drawn on the daily panel (x axis spans a full month).
const DAY_AXIS_MAX: f64 = 32.0;

/// Render the chart artifact and flush it to `path`.
///
/// Empty datasets produce a blank white chart so downstream composition can
/// still embed an artifact.
pub fn render_chart(
    path: &Path,
    result: &AggregateResult,
    width: u32,
    height: u32,
) -> Result<(), AppError> {
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let panels = root.split_evenly((1, 2));
    draw_daily_panel(&panels[0], result)?;
    draw_revenue_panel(&panels[1], result)?;

    // present() flushes the PNG; composition reads the file back afterwards,
    // so any encoding/write failure has to surface here.
    root.present()
        .map_err(|e| AppError::render(format!("Failed to write chart '{}': {e}", path.display())))?;
    log::info!("wrote chart artifact: {}", path.display());
    Ok(())
}

fn chart_err(e: impl std::fmt::Display) -> AppError {
    AppError::render(format!("Chart drawing failed: {e}"))
}

/// Paired bars per day-of-month: target month A left of the tick, B right.
fn draw_daily_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    result: &AggregateResult,
) -> Result<(), AppError> {
    let [first, second] = &result.daily_counts;

    let y_max = first
        .days
        .values()
        .chain(second.days.values())
        .copied()
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    let mut chart = ChartBuilder::on(area)
        .margin(14)
        .build_cartesian_2d(0.0..DAY_AXIS_MAX, 0.0..y_max * 1.1)
        .map_err(chart_err)?;

    draw_frame_and_gridlines(&mut chart, 0.0, DAY_AXIS_MAX, y_max)?;

    let bars_a = first.days.iter().map(|(date, &count)| {
        let d = date.day() as f64;
        Rectangle::new([(d - 0.42, 0.0), (d - 0.02, count as f64)], MONTH_A_BAR.filled())
    });
    chart.draw_series(bars_a).map_err(chart_err)?;

    let bars_b = second.days.iter().map(|(date, &count)| {
        let d = date.day() as f64;
        Rectangle::new([(d + 0.02, 0.0), (d + 0.42, count as f64)], MONTH_B_BAR.filled())
    });
    chart.draw_series(bars_b).map_err(chart_err)?;

    Ok(())
}

/// One bar per calendar month, chronological.
fn draw_revenue_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    result: &AggregateResult,
) -> Result<(), AppError> {
    let n_months = result.monthly_revenue.len().max(1) as f64;
    let y_max = result
        .monthly_revenue
        .values()
        .copied()
        .fold(0.0_f64, f64::max)
        .max(1.0);

    let mut chart = ChartBuilder::on(area)
        .margin(14)
        .build_cartesian_2d(0.0..n_months, 0.0..y_max * 1.1)
        .map_err(chart_err)?;

    draw_frame_and_gridlines(&mut chart, 0.0, n_months, y_max)?;

    let bars = result
        .monthly_revenue
        .values()
        .enumerate()
        .map(|(i, &revenue)| {
            let x = i as f64;
            Rectangle::new([(x + 0.18, 0.0), (x + 0.82, revenue)], REVENUE_BAR.filled())
        });
    chart.draw_series(bars).map_err(chart_err)?;

    Ok(())
}

/// Axis frame plus five horizontal gridlines, drawn as line series because
/// the font-less build cannot render tick labels.
fn draw_frame_and_gridlines<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<plotters::coord::types::RangedCoordf64, plotters::coord::types::RangedCoordf64>>,
    x0: f64,
    x1: f64,
    y_max: f64,
) -> Result<(), AppError> {
    for step in 1..=5 {
        let y = y_max * step as f64 / 5.0;
        chart
            .draw_series(LineSeries::new([(x0, y), (x1, y)], &GRID))
            .map_err(chart_err)?;
    }

    // Frame: x axis along the bottom, y axis on the left.
    chart
        .draw_series(LineSeries::new([(x0, 0.0), (x1, 0.0)], &FRAME))
        .map_err(chart_err)?;
    chart
        .draw_series(LineSeries::new([(x0, 0.0), (x0, y_max * 1.1)], &FRAME))
        .map_err(chart_err)?;

    Ok(())
}
