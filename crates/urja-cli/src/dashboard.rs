//! The four objective views.
//!
//! A read-only consumer of the two finished tables. Each view computes one
//! summary statistic for display (percentage change, standard deviation,
//! correlation) and renders an aligned metric table, a coarse sparkline of
//! the series, and the view's insight text. An empty filter selection
//! renders a notice instead of erroring; the dashboard never raises to the
//! user over data gaps.

use std::io::Write as _;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use tabwriter::TabWriter;
use urja_io::{detect_date_column, parse_date_cell};

#[derive(Debug, Clone)]
pub struct DashboardRequest {
    pub city: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub objective: u8,
    /// Weather variable shown by objective 3, canonical column name.
    pub weather: String,
}

/// One filtered row of the master table.
#[derive(Debug, Clone)]
struct Point {
    date: NaiveDate,
    energy: Option<f64>,
    efficiency: Option<f64>,
    weather: Option<f64>,
    predicted: Option<f64>,
}

/// Render the requested objective over a standardized master frame and,
/// for objective 4, the combined actual/forecast frame.
pub fn render(
    master: &DataFrame,
    combined: Option<&DataFrame>,
    request: &DashboardRequest,
) -> Result<String> {
    if !(1..=4).contains(&request.objective) {
        bail!("objective must be 1..4, got {}", request.objective);
    }

    let points = filtered_points(master, request)?;
    let mut out = String::new();
    out.push_str(&header_metrics(&points, request)?);
    out.push('\n');

    let body = match request.objective {
        1 => objective_generation(&points, request),
        2 => objective_efficiency(&points, request),
        3 => objective_weather(&points, request),
        _ => objective_forecast(combined, request)?,
    };
    out.push_str(&body);
    Ok(out)
}

fn filtered_points(df: &DataFrame, request: &DashboardRequest) -> Result<Vec<Point>> {
    let Some((strategy, date_column)) = detect_date_column(df) else {
        return Ok(Vec::new());
    };
    let dates = df.column(&date_column)?;
    let cities = match df.column("CITY") {
        Ok(column) => Some(column.utf8()?),
        Err(_) => None,
    };

    let energy = float_column(df, "ENERGY_GENERATED");
    let efficiency = float_column(df, "EFFICIENCY_INDEX");
    let weather = float_column(df, &request.weather);
    let predicted = float_column(df, "PREDICTED_ENERGY");

    let mut points = Vec::new();
    for i in 0..df.height() {
        if let Some(cities) = &cities {
            if cities.get(i) != Some(request.city.as_str()) {
                continue;
            }
        }
        let value = dates.get(i)?;
        let Some(date) = parse_date_cell(strategy, &value) else {
            continue;
        };
        if date < request.from || date > request.to {
            continue;
        }
        points.push(Point {
            date,
            energy: cell(&energy, i),
            efficiency: cell(&efficiency, i),
            weather: cell(&weather, i),
            predicted: cell(&predicted, i),
        });
    }
    points.sort_by_key(|p| p.date);
    Ok(points)
}

fn float_column(df: &DataFrame, name: &str) -> Option<Series> {
    df.column(name)
        .ok()
        .and_then(|column| column.cast(&DataType::Float64).ok())
}

fn cell(series: &Option<Series>, i: usize) -> Option<f64> {
    series
        .as_ref()
        .and_then(|s| s.f64().ok())
        .and_then(|ca| ca.get(i))
}

fn header_metrics(points: &[Point], request: &DashboardRequest) -> Result<String> {
    let energy: Vec<f64> = points.iter().filter_map(|p| p.energy).collect();
    let efficiency: Vec<f64> = points.iter().filter_map(|p| p.efficiency).collect();
    let residuals: Vec<f64> = points
        .iter()
        .filter_map(|p| match (p.energy, p.predicted) {
            (Some(a), Some(b)) => Some((a - b).abs()),
            _ => None,
        })
        .collect();

    let mut tw = TabWriter::new(Vec::new());
    writeln!(tw, "City\t{}", request.city)?;
    writeln!(tw, "Rows in range\t{}", points.len())?;
    writeln!(tw, "Total energy\t{}", render_stat(sum_opt(&energy)))?;
    writeln!(tw, "Avg efficiency index\t{}", render_stat(mean_opt(&efficiency)))?;
    writeln!(tw, "Max energy output\t{}", render_stat(max_opt(&energy)))?;
    writeln!(tw, "Forecast MAE\t{}", render_stat(mean_opt(&residuals)))?;
    tw.flush()?;
    let bytes = tw
        .into_inner()
        .map_err(|_| anyhow::anyhow!("flushing metric table"))?;
    String::from_utf8(bytes).context("metric table is not utf-8")
}

fn objective_generation(points: &[Point], request: &DashboardRequest) -> String {
    let series: Vec<f64> = points.iter().filter_map(|p| p.energy).collect();
    let mut out = String::from("Objective 1: Energy Generation Performance\n");
    if series.len() < 2 {
        out.push_str("  no rows match the current selection\n");
        return out;
    }
    let growth = percent_change(series[0], series[series.len() - 1]);
    out.push_str(&format!("  {}\n", sparkline(&series)));
    out.push_str(&format!(
        "  - Energy trend shows a {growth:.1}% change over the selected period\n"
    ));
    out.push_str("  - Seasonal cycles are visible at monthly resolution\n");
    out.push_str("  - Peaks mark months of high renewable availability\n");
    out.push_str(&format!(
        "  - {}'s generation stability supports grid planning\n",
        request.city
    ));
    out
}

fn objective_efficiency(points: &[Point], request: &DashboardRequest) -> String {
    let series: Vec<f64> = points.iter().filter_map(|p| p.efficiency).collect();
    let mut out = String::from("Objective 2: Energy Efficiency Dominance\n");
    if series.len() < 2 {
        out.push_str("  no rows match the current selection\n");
        return out;
    }
    let sigma = std_dev(&series);
    out.push_str(&format!("  {}\n", sparkline(&series)));
    out.push_str(&format!("  - Efficiency variability (sigma): {sigma:.2}\n"));
    out.push_str("  - Lower variation indicates operational maturity\n");
    out.push_str("  - Efficiency reflects infrastructure quality\n");
    out.push_str(&format!(
        "  - {}'s efficiency stability is measurable\n",
        request.city
    ));
    out
}

fn objective_weather(points: &[Point], request: &DashboardRequest) -> String {
    let paired: Vec<(f64, f64)> = points
        .iter()
        .filter_map(|p| match (p.weather, p.energy) {
            (Some(w), Some(e)) => Some((w, e)),
            _ => None,
        })
        .collect();
    let mut out = String::from("Objective 3: Weather Contribution Analysis\n");
    if paired.len() < 2 {
        out.push_str("  no rows match the current selection\n");
        return out;
    }
    let correlation = pearson(&paired);
    out.push_str(&format!(
        "  - Correlation of {} with energy: {correlation:.2}\n",
        request.weather
    ));
    out.push_str("  - Weather is a direct production driver\n");
    out.push_str("  - Sensitivity varies across variables\n");
    out.push_str(&format!(
        "  - {}'s output is climate-dependent\n",
        request.city
    ));
    out
}

fn objective_forecast(combined: Option<&DataFrame>, request: &DashboardRequest) -> Result<String> {
    let mut out = String::from("Objective 4: Forecast Reliability Assessment\n");
    let Some(df) = combined else {
        out.push_str("  combined forecast dataset not provided\n");
        return Ok(out);
    };

    let cities = df.column("CITY")?.utf8()?;
    let flags = df.column("DATA_TYPE")?.utf8()?;
    let Some((strategy, date_column)) = detect_date_column(df) else {
        out.push_str("  no rows match the current selection\n");
        return Ok(out);
    };
    let dates = df.column(&date_column)?;

    // The target is whichever numeric column is neither key nor flag.
    let value_column = df
        .get_column_names()
        .iter()
        .find(|name| !["DATE", "CITY", "DATA_TYPE"].contains(&name.to_uppercase().as_str()))
        .map(|name| name.to_string());
    let Some(value_column) = value_column else {
        out.push_str("  no target column found\n");
        return Ok(out);
    };
    let values = df.column(&value_column)?.cast(&DataType::Float64)?;
    let values = values.f64()?;

    let mut actual: Vec<(NaiveDate, f64)> = Vec::new();
    let mut forecast: Vec<(NaiveDate, f64)> = Vec::new();
    for i in 0..df.height() {
        if cities.get(i) != Some(request.city.as_str()) {
            continue;
        }
        let (Ok(date_value), Some(value)) = (dates.get(i), values.get(i)) else {
            continue;
        };
        let Some(date) = parse_date_cell(strategy, &date_value) else {
            continue;
        };
        match flags.get(i) {
            Some("Forecast") => forecast.push((date, value)),
            _ => actual.push((date, value)),
        }
    }
    actual.sort_by_key(|(d, _)| *d);
    forecast.sort_by_key(|(d, _)| *d);

    let (Some((_, last_actual)), Some((last_date, last_forecast))) =
        (actual.last(), forecast.last())
    else {
        out.push_str("  no rows match the current selection\n");
        return Ok(out);
    };

    let growth = percent_change(*last_actual, *last_forecast);
    let series: Vec<f64> = actual
        .iter()
        .chain(forecast.iter())
        .map(|(_, v)| *v)
        .collect();
    out.push_str(&format!("  {}\n", sparkline(&series)));
    out.push_str(&format!(
        "  - Forecast extends through {}\n",
        last_date.format("%Y-%m")
    ));
    out.push_str(&format!(
        "  - Expected growth past the last actual: {growth:.1}%\n"
    ));
    out.push_str("  - Monthly seasonality preserved by the lag features\n");
    out.push_str(&format!(
        "  - {} is suitable for long-horizon planning\n",
        request.city
    ));
    Ok(out)
}

fn render_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.3}"),
        None => "n/a".to_string(),
    }
}

fn sum_opt(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum())
}

fn mean_opt(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

fn max_opt(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

fn percent_change(first: f64, last: f64) -> f64 {
    if first == 0.0 {
        0.0
    } else {
        (last - first) / first * 100.0
    }
}

/// Sample standard deviation.
fn std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    var.sqrt()
}

fn pearson(paired: &[(f64, f64)]) -> f64 {
    let n = paired.len() as f64;
    let mean_x = paired.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = paired.iter().map(|(_, y)| y).sum::<f64>() / n;
    let cov: f64 = paired
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    let var_x: f64 = paired.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    let var_y: f64 = paired.iter().map(|(_, y)| (y - mean_y).powi(2)).sum();
    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        0.0
    } else {
        cov / denom
    }
}

const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

fn sparkline(values: &[f64]) -> String {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    values
        .iter()
        .map(|v| {
            if span == 0.0 {
                BLOCKS[0]
            } else {
                let idx = ((v - min) / span * (BLOCKS.len() - 1) as f64).round() as usize;
                BLOCKS[idx.min(BLOCKS.len() - 1)]
            }
        })
        .collect()
}
