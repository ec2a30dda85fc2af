//! Text and JSON rendering of command results.

use std::io::Write;

use serde::Serialize;

use stockcast_forecast::CategoryForecast;
use stockcast_infra::LoadSummary;
use stockcast_inventory::{MonthCategoryRow, QueryRow};
use stockcast_voice::DispatchOutcome;

const CATEGORY_WIDTH: usize = 24;

fn json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn summary<W: Write>(out: &mut W, summary: &LoadSummary, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        return json(out, summary);
    }
    writeln!(
        out,
        "rows: {} (train {}, holdout {})",
        summary.rows, summary.train_rows, summary.holdout_rows
    )?;
    writeln!(out, "categories: {}", summary.categories)?;
    writeln!(out, "holdout MSE: {:.2}", summary.evaluation.mse)?;
    match summary.evaluation.r_squared {
        Some(r2) => writeln!(out, "holdout R²: {r2:.3}")?,
        None => writeln!(out, "holdout R²: n/a")?,
    }
    if summary.low_stock > 0 {
        writeln!(out, "{} products with low stock", summary.low_stock)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    monthly_sales: &'a str,
    low_stock: &'a str,
    table: &'a [MonthCategoryRow],
}

pub fn report<W: Write>(
    out: &mut W,
    monthly_sales: &str,
    low_stock: &str,
    table: &[MonthCategoryRow],
    as_json: bool,
) -> anyhow::Result<()> {
    if as_json {
        return json(
            out,
            &ReportOutput {
                monthly_sales,
                low_stock,
                table,
            },
        );
    }
    writeln!(out, "monthly sales report: {monthly_sales}")?;
    writeln!(out, "low stock report: {low_stock}")?;
    writeln!(out)?;
    writeln!(out, "{:>3}  {:<CATEGORY_WIDTH$} {:>10}", "Mes", "Tipo de producto", "Unidades")?;
    for row in table {
        writeln!(out, "{:>3}  {:<CATEGORY_WIDTH$} {:>10}", row.month, row.category, row.units)?;
    }
    Ok(())
}

pub fn forecast<W: Write>(out: &mut W, forecast: &CategoryForecast, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        return json(out, forecast);
    }
    writeln!(out, "{} {}", forecast.label, forecast.year)?;
    writeln!(out, "{:>3} {:>10} {:>12}", "Mes", "actual", "predicted")?;
    for m in &forecast.months {
        let marker = if m.increase { "  ↑" } else { "" };
        writeln!(out, "{:>3} {:>10} {:>12.1}{marker}", m.month, m.actual, m.predicted)?;
    }
    writeln!(out, "predicted total: {:.1}", forecast.predicted_total())?;
    Ok(())
}

/// Several forecasts, separated by a blank line (a JSON array with `--json`).
pub fn forecasts<W: Write>(out: &mut W, forecasts: &[CategoryForecast], as_json: bool) -> anyhow::Result<()> {
    if as_json {
        return json(out, forecasts);
    }
    for (i, f) in forecasts.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        forecast(out, f, false)?;
    }
    Ok(())
}

fn rows<W: Write>(out: &mut W, rows: &[QueryRow]) -> anyhow::Result<()> {
    for row in rows {
        writeln!(out, "{:>3}  {:<CATEGORY_WIDTH$} {:>10}", row.month, row.category, row.units)?;
    }
    Ok(())
}

pub fn outcome<W: Write>(out: &mut W, outcome: &DispatchOutcome, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        return json(out, outcome);
    }
    match outcome {
        DispatchOutcome::ProductRows { product, rows: found } => {
            writeln!(out, "{product}: {}", outcome.message())?;
            rows(out, found)
        }
        DispatchOutcome::Rows { rows: found, .. } => {
            writeln!(out, "{}", outcome.message())?;
            rows(out, found)
        }
        _ => {
            writeln!(out, "{}", outcome.message())?;
            Ok(())
        }
    }
}
