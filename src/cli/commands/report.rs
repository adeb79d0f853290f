//! Report command implementations (stats, trend).

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::analysis::{compute_averages, trend_series};
use crate::cli::commands::Context;
use crate::error::Result;
use crate::model::Record;

#[derive(Serialize)]
struct StatsOutput {
    entries: usize,
    avg_loss: Option<f64>,
    avg_calories: Option<f64>,
}

#[derive(Serialize)]
struct TrendRow {
    date: String,
    weight: f64,
    trend: f64,
}

fn fmt_avg(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

/// Show average loss per entry and average calories.
///
/// Weights and calories are taken in file order; entries whose text is not
/// a number are left out of that average only.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn stats(ctx: &Context) -> Result<()> {
    let records = ctx.store.load()?;
    let weights: Vec<f64> = records.iter().filter_map(Record::weight_value).collect();
    let calories: Vec<f64> = records.iter().filter_map(Record::calorie_value).collect();
    let averages = compute_averages(&weights, &calories);

    if ctx.json {
        let output = StatsOutput {
            entries: records.len(),
            avg_loss: averages.avg_loss,
            avg_calories: averages.avg_calories,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("Entries:          {}", records.len());
    println!("Avg loss / entry: {}", fmt_avg(averages.avg_loss));
    println!("Avg calories:     {}", fmt_avg(averages.avg_calories));
    Ok(())
}

/// Chart points keyed by parsed date; unparseable entries are skipped.
fn chart_points(records: &[Record], date_format: &str) -> Vec<(NaiveDate, f64)> {
    records
        .iter()
        .filter_map(|record| {
            let date = NaiveDate::parse_from_str(&record.date, date_format).ok();
            let weight = record.weight_value();
            if date.is_none() || weight.is_none() {
                debug!(date = %record.date, "Skipping entry without a chartable date/weight");
            }
            Some((date?, weight?))
        })
        .collect()
}

/// Show weights in date order with their trend line.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn trend(ctx: &Context) -> Result<()> {
    let records = ctx.store.load()?;
    let date_format = &ctx.config.date_format;
    let rows: Vec<TrendRow> = trend_series(chart_points(&records, date_format))
        .into_iter()
        .map(|point| TrendRow {
            date: point.key.format(date_format).to_string(),
            weight: point.weight,
            trend: point.trend,
        })
        .collect();

    if ctx.json {
        println!("{}", serde_json::to_string(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("Nothing to chart yet.");
        return Ok(());
    }

    println!("{:<12} {:>8} {:>8}", "Date", "Weight", "Trend");
    for row in &rows {
        println!("{:<12} {:>8.1} {:>8.2}", row.date, row.weight, row.trend);
    }
    Ok(())
}
