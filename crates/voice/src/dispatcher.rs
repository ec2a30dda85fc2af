//! Voice command dispatch.
//!
//! ```text
//! listen()
//!   ↓  Idle → Listening
//! 1. Transcribe (blocking collaborator call)
//!   ↓  Listening → Idle (success or failure)
//! 2. Classify transcript against the intent table (leftmost marker wins)
//!   ↓
//! 3. Run the intent's query over the borrowed dataset
//! ```
//!
//! The dispatcher borrows the prepared dataset immutably. Loading a new dataset
//! needs a mutable borrow of the session that owns it, so a dispatcher can never
//! outlive the data it answers from.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use stockcast_core::EngineConfig;
use stockcast_dataset::{PreparedDataset, SalesRecord};
use stockcast_inventory::aggregation::{top_n_by_category, total_units};
use stockcast_inventory::{MonthlySalesReport, QueryRow, StockPolicy};

use crate::clock::{Clock, SystemClock};
use crate::export::{ExportError, ReportExporter};
use crate::intent::{IntentKind, IntentTable, extract_product_name};
use crate::resolver::{Resolution, resolve_product};
use crate::transcriber::{Transcriber, TranscriptionError};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ListenState {
    Idle,
    Listening,
}

/// Result of one voice query. Every variant is a non-fatal, user-facing answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Rows { intent: IntentKind, rows: Vec<QueryRow> },
    ProductRows { product: String, rows: Vec<QueryRow> },
    Total { units: u64 },
    ReportExported { location: String },
    ProductNotFound { query: String },
    NotRecognized,
    AudioNotUnderstood,
    RecognitionUnavailable,
}

impl DispatchOutcome {
    /// Short status line for the UI.
    pub fn message(&self) -> String {
        match self {
            DispatchOutcome::Rows { rows, .. } | DispatchOutcome::ProductRows { rows, .. } => {
                format!("{} row(s)", rows.len())
            }
            DispatchOutcome::Total { units } => format!("total units sold: {units}"),
            DispatchOutcome::ReportExported { location } => {
                format!("monthly report generated: {location}")
            }
            DispatchOutcome::ProductNotFound { .. } => "product not found".to_string(),
            DispatchOutcome::NotRecognized => "question not recognized".to_string(),
            DispatchOutcome::AudioNotUnderstood => "audio not understood".to_string(),
            DispatchOutcome::RecognitionUnavailable => "recognition service connection error".to_string(),
        }
    }

    pub fn rows(&self) -> Option<&[QueryRow]> {
        match self {
            DispatchOutcome::Rows { rows, .. } | DispatchOutcome::ProductRows { rows, .. } => Some(rows),
            _ => None,
        }
    }
}

/// Failures that are not voice-level answers and must reach the caller.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Routes transcripts to analytical queries over one prepared dataset.
///
/// ## Generic Parameters
///
/// - `E`: where the monthly sales report is written
/// - `C`: source of the current month (wall clock unless overridden)
#[derive(Debug)]
pub struct CommandDispatcher<'a, E, C = SystemClock> {
    dataset: &'a PreparedDataset,
    config: &'a EngineConfig,
    table: IntentTable,
    exporter: E,
    clock: C,
    state: ListenState,
}

impl<'a, E> CommandDispatcher<'a, E, SystemClock>
where
    E: ReportExporter,
{
    pub fn new(dataset: &'a PreparedDataset, config: &'a EngineConfig, exporter: E) -> Self {
        Self {
            dataset,
            config,
            table: IntentTable::default(),
            exporter,
            clock: SystemClock,
            state: ListenState::Idle,
        }
    }
}

impl<'a, E, C> CommandDispatcher<'a, E, C>
where
    E: ReportExporter,
    C: Clock,
{
    pub fn with_clock<C2: Clock>(self, clock: C2) -> CommandDispatcher<'a, E, C2> {
        CommandDispatcher {
            dataset: self.dataset,
            config: self.config,
            table: self.table,
            exporter: self.exporter,
            clock,
            state: self.state,
        }
    }

    pub fn with_table(mut self, table: IntentTable) -> Self {
        self.table = table;
        self
    }

    pub fn state(&self) -> ListenState {
        self.state
    }

    /// Capture one utterance and answer it.
    ///
    /// The transcriber call blocks for as long as the collaborator takes. The
    /// state returns to `Idle` whatever the transcription outcome.
    pub fn listen<T: Transcriber>(&mut self, transcriber: &mut T) -> Result<DispatchOutcome, DispatchError> {
        self.state = ListenState::Listening;
        let heard = transcriber.transcribe();
        self.state = ListenState::Idle;

        match heard {
            Ok(text) => self.dispatch(&text),
            Err(TranscriptionError::Unintelligible) => {
                warn!("voice query: audio not understood");
                Ok(DispatchOutcome::AudioNotUnderstood)
            }
            Err(TranscriptionError::ServiceUnavailable(reason)) => {
                warn!(%reason, "voice query: recognition service unavailable");
                Ok(DispatchOutcome::RecognitionUnavailable)
            }
        }
    }

    /// Classify a transcript and run the matching query.
    pub fn dispatch(&self, transcript: &str) -> Result<DispatchOutcome, DispatchError> {
        let Some(intent) = self.table.classify(transcript) else {
            info!(transcript, "voice query not recognized");
            return Ok(DispatchOutcome::NotRecognized);
        };
        info!(transcript, ?intent, "voice query dispatched");

        let records = self.dataset.records();
        let outcome = match intent {
            IntentKind::LowestStock => {
                let rows = StockPolicy::critical(self.config).low_rows(records);
                self.rows(intent, rows)
            }
            IntentKind::ProductStock => self.product_stock(transcript),
            IntentKind::LowStockThisMonth => {
                let month = self.clock.current_month();
                let rows = StockPolicy::row_level(self.config).lowest_in_month(
                    records,
                    month,
                    self.config.low_stock_month_limit,
                );
                self.rows(intent, rows)
            }
            IntentKind::TopSelling => {
                let top: Vec<_> = top_n_by_category(records, self.config.top_selling_count)
                    .into_iter()
                    .map(|(code, _)| code)
                    .collect();
                let rows = records.iter().filter(|r| top.contains(&r.category)).collect();
                self.rows(intent, rows)
            }
            IntentKind::MonthlyReport => {
                let report = MonthlySalesReport::build(records, self.dataset.encoder());
                let location = self.exporter.export_monthly_sales(&report)?;
                info!(%location, "monthly sales report exported");
                DispatchOutcome::ReportExported { location }
            }
            IntentKind::TotalSold => DispatchOutcome::Total {
                units: total_units(records),
            },
            IntentKind::LowStockTotal => {
                let rows = StockPolicy::row_level(self.config).low_rows(records);
                self.rows(intent, rows)
            }
        };
        Ok(outcome)
    }

    fn product_stock(&self, transcript: &str) -> DispatchOutcome {
        let query = extract_product_name(transcript).unwrap_or_default();
        let resolution = resolve_product(query, self.dataset.encoder(), self.config.fuzzy_match_threshold);

        let code = match resolution {
            Resolution::Exact(code) => code,
            Resolution::Fuzzy { code, score } => {
                info!(query, %code, score, "product name resolved approximately");
                code
            }
            Resolution::NotFound { best } => {
                info!(query, ?best, "product not found");
                return DispatchOutcome::ProductNotFound {
                    query: query.to_string(),
                };
            }
        };

        let product = self.dataset.label(code).unwrap_or(query).to_string();
        let rows = self
            .dataset
            .records()
            .iter()
            .filter(|r| r.category == code)
            .map(|r| QueryRow::from_record(r, self.dataset.encoder()))
            .collect();
        DispatchOutcome::ProductRows { product, rows }
    }

    fn rows(&self, intent: IntentKind, rows: Vec<&SalesRecord>) -> DispatchOutcome {
        let encoder = self.dataset.encoder();
        DispatchOutcome::Rows {
            intent,
            rows: rows.into_iter().map(|r| QueryRow::from_record(r, encoder)).collect(),
        }
    }
}
