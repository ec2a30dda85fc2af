//! Dataset preparation for the sales forecaster.
//!
//! Turns raw historical order rows into a feature table: parsed dates, derived
//! month/year, a fixed category encoding and a reproducible train/holdout split.
//! Pure logic; reading files is the caller's job.

pub mod encoder;
pub mod error;
pub mod prepare;
pub mod record;

pub use encoder::CategoryEncoder;
pub use error::PrepareError;
pub use prepare::{Partition, PreparedDataset, SplitConfig, prepare};
pub use record::{FeatureRow, RawSalesRecord, SalesRecord, parse_order_date};
