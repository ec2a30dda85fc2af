use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use stockcast_core::EngineConfig;
use stockcast_observability::LogFormat;

/// Stockcast - sales forecasting and stock alerts over order history
#[derive(Debug, Parser)]
#[command(name = "stockcast")]
#[command(about = "Sales forecasting, stock alerts and voice queries over order history")]
#[command(version)]
pub struct Cli {
    /// CSV file with order date, product category and units columns
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory report files are written to
    #[arg(long, env = "STOCKCAST_REPORT_DIR", default_value = ".", global = true)]
    pub report_dir: PathBuf,

    /// Log output format (pretty or json); logs go to stderr
    #[arg(long, env = "STOCKCAST_LOG_FORMAT", default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Train and evaluate the model, then print its quality and the low-stock count
    Summary,
    /// Write the monthly sales and low-stock reports and print the month/category table
    Report,
    /// Predict twelve months of sales next to the actual figures
    Forecast {
        /// Product category label, exactly as in the file (defaults to the best sellers)
        category: Option<String>,
        /// Year to forecast (defaults to the latest year in the file)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Answer one transcribed voice query
    Ask {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Answer transcribed voice queries read from stdin, one per line
    Listen,
}

/// Overrides for [`EngineConfig`]; unset flags keep the defaults.
#[derive(Debug, Default, Args)]
pub struct EngineArgs {
    /// Rows with fewer units are flagged "Stock Bajo"
    #[arg(long, env = "STOCKCAST_LOW_STOCK_THRESHOLD", global = true)]
    pub low_stock_threshold: Option<u64>,

    /// Threshold for the lowest-stock voice query
    #[arg(long, env = "STOCKCAST_CRITICAL_STOCK_THRESHOLD", global = true)]
    pub critical_stock_threshold: Option<u64>,

    /// Minimum similarity (0-100) for a misheard product name
    #[arg(long, env = "STOCKCAST_FUZZY_THRESHOLD", global = true)]
    pub fuzzy_threshold: Option<u8>,

    /// Categories returned by the top-selling query and by `forecast` without a category
    #[arg(long, env = "STOCKCAST_TOP_SELLING", global = true)]
    pub top_selling: Option<usize>,

    /// Rows returned by the low-stock-this-month query
    #[arg(long, env = "STOCKCAST_MONTH_LIMIT", global = true)]
    pub month_limit: Option<usize>,

    /// Seed for the train/holdout shuffle
    #[arg(long, env = "STOCKCAST_SEED", global = true)]
    pub seed: Option<u64>,

    /// Fraction of rows held out for evaluation
    #[arg(long, env = "STOCKCAST_TEST_RATIO", global = true)]
    pub test_ratio: Option<f64>,
}

impl EngineArgs {
    pub fn apply(&self, mut cfg: EngineConfig) -> EngineConfig {
        if let Some(v) = self.low_stock_threshold {
            cfg.low_stock_threshold = v;
        }
        if let Some(v) = self.critical_stock_threshold {
            cfg.critical_stock_threshold = v;
        }
        if let Some(v) = self.fuzzy_threshold {
            cfg.fuzzy_match_threshold = v;
        }
        if let Some(v) = self.top_selling {
            cfg.top_selling_count = v;
        }
        if let Some(v) = self.month_limit {
            cfg.low_stock_month_limit = v;
        }
        if let Some(v) = self.seed {
            cfg.split_seed = v;
        }
        if let Some(v) = self.test_ratio {
            cfg.test_ratio = v;
        }
        cfg
    }
}
