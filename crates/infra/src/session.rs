//! The session owns the one loaded dataset and the model trained on it.
//!
//! ```text
//! load(raw)
//!   ↓
//! 1. Prepare (parse, encode, seeded split)
//!   ↓
//! 2. Train on the training partition
//!   ↓
//! 3. Evaluate on the holdout partition
//!   ↓
//! 4. Replace the previous dataset/model pair (only if 1-3 succeeded)
//! ```
//!
//! Queries borrow the session immutably; loading needs `&mut Session`, so no
//! dispatcher or report can observe a half-replaced pair.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use stockcast_core::{CategoryCode, CoreError, EngineConfig, SessionId};
use stockcast_dataset::{PrepareError, PreparedDataset, RawSalesRecord, SplitConfig, prepare};
use stockcast_forecast::{CategoryForecast, Evaluation, ForecastModel, ModelError};
use stockcast_inventory::aggregation::top_n_by_category;
use stockcast_inventory::{
    LowStockReport, MonthCategoryRow, MonthlySalesReport, StockPolicy, monthly_category_table,
};
use stockcast_voice::{CommandDispatcher, ExportError, ReportExporter};

use crate::loader::{LoadError, load_records_file};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Prepare(#[from] PrepareError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("no dataset loaded")]
    NoDataset,

    #[error("unknown product category {0:?}")]
    UnknownCategory(String),
}

/// What a successful load produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadSummary {
    pub session: SessionId,
    pub rows: usize,
    pub categories: usize,
    pub train_rows: usize,
    pub holdout_rows: usize,
    pub evaluation: Evaluation,
    /// Rows under the row-level alert threshold.
    pub low_stock: usize,
}

#[derive(Debug)]
struct Loaded {
    dataset: PreparedDataset,
    model: ForecastModel,
    evaluation: Evaluation,
}

#[derive(Debug)]
pub struct Session {
    id: SessionId,
    config: EngineConfig,
    loaded: Option<Loaded>,
}

impl Session {
    pub fn new(config: EngineConfig) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self {
            id: SessionId::new(),
            config,
            loaded: None,
        })
    }

    /// Changes on every successful load.
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Prepare, train and evaluate, then replace the current pair.
    ///
    /// On failure the previously loaded pair (if any) is kept untouched.
    pub fn load(&mut self, raw: &[RawSalesRecord]) -> Result<LoadSummary, SessionError> {
        let id = SessionId::new();
        let dataset = prepare(raw, &SplitConfig::from(&self.config))?;
        let mut model = ForecastModel::new();
        model.train(&dataset)?;
        let evaluation = model.evaluate(&dataset)?;

        let low_stock = StockPolicy::row_level(&self.config).low_count(dataset.records());
        if low_stock > 0 {
            warn!(session = %id, low_stock, "{low_stock} products with low stock");
        }
        info!(
            session = %id,
            rows = dataset.len(),
            mse = evaluation.mse,
            "dataset loaded and model trained"
        );

        let summary = LoadSummary {
            session: id,
            rows: dataset.len(),
            categories: dataset.encoder().len(),
            train_rows: dataset.train().len(),
            holdout_rows: dataset.holdout().len(),
            evaluation: evaluation.clone(),
            low_stock,
        };
        self.id = id;
        self.loaded = Some(Loaded {
            dataset,
            model,
            evaluation,
        });
        Ok(summary)
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<LoadSummary, SessionError> {
        let raw = load_records_file(path)?;
        self.load(&raw)
    }

    fn loaded(&self) -> Result<&Loaded, SessionError> {
        self.loaded.as_ref().ok_or(SessionError::NoDataset)
    }

    pub fn dataset(&self) -> Result<&PreparedDataset, SessionError> {
        Ok(&self.loaded()?.dataset)
    }

    pub fn model(&self) -> Result<&ForecastModel, SessionError> {
        Ok(&self.loaded()?.model)
    }

    pub fn evaluation(&self) -> Result<&Evaluation, SessionError> {
        Ok(&self.loaded()?.evaluation)
    }

    /// A voice dispatcher over the current dataset.
    pub fn dispatcher<E: ReportExporter>(&self, exporter: E) -> Result<CommandDispatcher<'_, E>, SessionError> {
        Ok(CommandDispatcher::new(self.dataset()?, &self.config, exporter))
    }

    pub fn low_stock_report(&self) -> Result<LowStockReport, SessionError> {
        let dataset = self.dataset()?;
        Ok(LowStockReport::build(
            dataset.records(),
            dataset.encoder(),
            &StockPolicy::row_level(&self.config),
        ))
    }

    pub fn monthly_sales_report(&self) -> Result<MonthlySalesReport, SessionError> {
        let dataset = self.dataset()?;
        Ok(MonthlySalesReport::build(dataset.records(), dataset.encoder()))
    }

    pub fn monthly_category_table(&self) -> Result<Vec<MonthCategoryRow>, SessionError> {
        let dataset = self.dataset()?;
        Ok(monthly_category_table(dataset.records(), dataset.encoder()))
    }

    /// Write both reports; returns (monthly sales location, low stock location).
    pub fn export_reports<E: ReportExporter>(&self, exporter: &E) -> Result<(String, String), SessionError> {
        let monthly = exporter.export_monthly_sales(&self.monthly_sales_report()?)?;
        let low = exporter.export_low_stock(&self.low_stock_report()?)?;
        Ok((monthly, low))
    }

    /// Twelve-month forecast for a category label.
    ///
    /// `year` defaults to the most recent year in the dataset.
    pub fn forecast(&self, category: &str, year: Option<i32>) -> Result<CategoryForecast, SessionError> {
        let loaded = self.loaded()?;
        let code: CategoryCode = loaded
            .dataset
            .encoder()
            .encode(category)
            .ok_or_else(|| SessionError::UnknownCategory(category.to_string()))?;
        let year = loaded.year_or_latest(year)?;
        Ok(loaded.model.forecast_category(&loaded.dataset, code, year)?)
    }

    /// Forecasts for the best-selling categories, best first.
    ///
    /// How many is `top_selling_count`; `year` defaults as in [`Session::forecast`].
    pub fn forecast_top(&self, year: Option<i32>) -> Result<Vec<CategoryForecast>, SessionError> {
        let loaded = self.loaded()?;
        let year = loaded.year_or_latest(year)?;
        top_n_by_category(loaded.dataset.records(), self.config.top_selling_count)
            .into_iter()
            .map(|(code, _)| Ok(loaded.model.forecast_category(&loaded.dataset, code, year)?))
            .collect()
    }
}

impl Loaded {
    fn year_or_latest(&self, year: Option<i32>) -> Result<i32, SessionError> {
        match year {
            Some(y) => Ok(y),
            None => self
                .dataset
                .records()
                .iter()
                .map(|r| r.year)
                .max()
                .ok_or(SessionError::NoDataset),
        }
    }
}
