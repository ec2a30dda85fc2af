//! CSV report exporter.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing::info;

use stockcast_inventory::{LowStockReport, MonthlySalesReport};
use stockcast_voice::{ExportError, ReportExporter};

pub const MONTHLY_SALES_FILE: &str = "reporte_ventas_mensuales.csv";
pub const LOW_STOCK_FILE: &str = "reporte_stock_bajo.csv";

/// Writes report tables as CSV files into one directory.
///
/// Each export overwrites the previous file of the same report.
#[derive(Debug, Clone)]
pub struct CsvReportExporter {
    dir: PathBuf,
}

impl CsvReportExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn writer(&self, file_name: &str) -> Result<(csv::Writer<File>, PathBuf), ExportError> {
        let path = self.dir.join(file_name);
        let unwritable = |source| ExportError::Unwritable {
            location: path.display().to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(unwritable)?;
        let file = File::create(&path).map_err(unwritable)?;
        Ok((csv::Writer::from_writer(file), path))
    }

    fn finish(mut writer: csv::Writer<File>, path: PathBuf) -> Result<String, ExportError> {
        let location = path.display().to_string();
        writer.flush().map_err(|source| ExportError::Unwritable {
            location: location.clone(),
            source,
        })?;
        info!(%location, "report written");
        Ok(location)
    }
}

fn encode(e: csv::Error) -> ExportError {
    ExportError::Encode(e.to_string())
}

impl ReportExporter for CsvReportExporter {
    fn export_monthly_sales(&self, report: &MonthlySalesReport) -> Result<String, ExportError> {
        let (mut writer, path) = self.writer(MONTHLY_SALES_FILE)?;
        writer.write_record(["Tipo de producto", "Unidades"]).map_err(encode)?;
        for row in &report.rows {
            writer
                .write_record([row.category.as_str(), row.total_units.to_string().as_str()])
                .map_err(encode)?;
        }
        Self::finish(writer, path)
    }

    fn export_low_stock(&self, report: &LowStockReport) -> Result<String, ExportError> {
        let (mut writer, path) = self.writer(LOW_STOCK_FILE)?;
        writer
            .write_record(["Mes", "Tipo de producto", "Unidades", "Advertencia"])
            .map_err(encode)?;
        for row in &report.rows {
            writer
                .write_record([
                    row.month.to_string().as_str(),
                    row.category.as_str(),
                    row.units.to_string().as_str(),
                    row.alert.label(),
                ])
                .map_err(encode)?;
        }
        Self::finish(writer, path)
    }
}
