//! Infrastructure around the engine: the session that owns the loaded
//! dataset/model pair, CSV import and CSV report export.
//!
//! The engine crates hold no global state; everything lives in a [`Session`].

pub mod export;
pub mod loader;
pub mod session;

pub use export::{CsvReportExporter, LOW_STOCK_FILE, MONTHLY_SALES_FILE};
pub use loader::{LoadError, load_records, load_records_file};
pub use session::{LoadSummary, Session, SessionError};
