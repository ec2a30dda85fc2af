//! Report export collaborator seam.

use thiserror::Error;

use stockcast_inventory::{LowStockReport, MonthlySalesReport};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export target {location} is not writable: {source}")]
    Unwritable {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode report: {0}")]
    Encode(String),
}

/// Persists report tables and reports where they went.
///
/// Implementations must not retry on failure; that is the caller's decision.
pub trait ReportExporter {
    /// Returns the location the report was written to.
    fn export_monthly_sales(&self, report: &MonthlySalesReport) -> Result<String, ExportError>;

    fn export_low_stock(&self, report: &LowStockReport) -> Result<String, ExportError>;
}

impl<E: ReportExporter + ?Sized> ReportExporter for &E {
    fn export_monthly_sales(&self, report: &MonthlySalesReport) -> Result<String, ExportError> {
        (**self).export_monthly_sales(report)
    }

    fn export_low_stock(&self, report: &LowStockReport) -> Result<String, ExportError> {
        (**self).export_low_stock(report)
    }
}
