//! `stockcast` command line: load a sales file, then report, forecast or
//! answer voice queries over it.

pub mod args;
pub mod render;

use std::io::{BufRead, Write};

use anyhow::Context;
use tracing::info;

use stockcast_core::EngineConfig;
use stockcast_infra::{CsvReportExporter, Session};
use stockcast_voice::LineTranscriber;

pub use args::{Cli, Command, EngineArgs};

/// Execute one invocation. `input` feeds `listen`; everything user-facing goes to `out`.
pub fn run<R: BufRead, W: Write>(cli: Cli, input: R, out: &mut W) -> anyhow::Result<()> {
    let config = cli.engine.apply(EngineConfig::default());
    let mut session = Session::new(config).context("invalid engine configuration")?;
    let summary = session
        .load_file(&cli.file)
        .with_context(|| format!("failed to load {}", cli.file.display()))?;
    let exporter = CsvReportExporter::new(&cli.report_dir);

    match cli.command {
        Command::Summary => render::summary(out, &summary, cli.json)?,
        Command::Report => {
            let (monthly_sales, low_stock) = session
                .export_reports(&exporter)
                .context("failed to write reports")?;
            let table = session.monthly_category_table()?;
            render::report(out, &monthly_sales, &low_stock, &table, cli.json)?;
        }
        Command::Forecast {
            category: Some(category),
            year,
        } => {
            let forecast = session.forecast(&category, year)?;
            render::forecast(out, &forecast, cli.json)?;
        }
        Command::Forecast { category: None, year } => {
            let forecasts = session.forecast_top(year)?;
            render::forecasts(out, &forecasts, cli.json)?;
        }
        Command::Ask { text } => {
            let dispatcher = session.dispatcher(&exporter)?;
            let outcome = dispatcher.dispatch(&text.join(" "))?;
            render::outcome(out, &outcome, cli.json)?;
        }
        Command::Listen => {
            let mut dispatcher = session.dispatcher(&exporter)?;
            let mut transcriber = LineTranscriber::new(input);
            info!(session = %session.id(), "listening for queries on stdin");
            loop {
                let outcome = dispatcher.listen(&mut transcriber)?;
                if transcriber.is_exhausted() {
                    break;
                }
                render::outcome(out, &outcome, cli.json)?;
                out.flush()?;
            }
        }
    }
    Ok(())
}
