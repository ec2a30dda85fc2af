//! Report tables handed to the presentation and export collaborators.

use serde::{Deserialize, Serialize};

use stockcast_core::{CategoryCode, Month};
use stockcast_dataset::{CategoryEncoder, SalesRecord};

use crate::aggregation::{Grouping, category_totals, sum_by};
use crate::stock::{StockLevel, StockPolicy};

fn label_of(encoder: &CategoryEncoder, code: CategoryCode) -> String {
    encoder
        .decode(code)
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{code}"))
}

/// A row subset shown to the user: {month, category, units}.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRow {
    pub month: Month,
    pub category: String,
    pub units: u64,
}

impl QueryRow {
    pub fn from_record(record: &SalesRecord, encoder: &CategoryEncoder) -> Self {
        Self {
            month: record.month,
            category: label_of(encoder, record.category),
            units: record.units,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockRow {
    pub month: Month,
    pub category: String,
    pub units: u64,
    pub alert: StockLevel,
}

/// Row-level alert for every record, in dataset order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LowStockReport {
    pub rows: Vec<LowStockRow>,
}

impl LowStockReport {
    pub fn build(records: &[SalesRecord], encoder: &CategoryEncoder, policy: &StockPolicy) -> Self {
        let rows = records
            .iter()
            .map(|r| LowStockRow {
                month: r.month,
                category: label_of(encoder, r.category),
                units: r.units,
                alert: policy.classify(r.units),
            })
            .collect();
        Self { rows }
    }

    pub fn low_count(&self) -> usize {
        self.rows.iter().filter(|r| r.alert == StockLevel::Low).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySalesRow {
    pub category: String,
    pub total_units: u64,
}

/// Total units per category across all months and years, one row per category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonthlySalesReport {
    pub rows: Vec<MonthlySalesRow>,
}

impl MonthlySalesReport {
    /// Rows are ordered by category code.
    pub fn build(records: &[SalesRecord], encoder: &CategoryEncoder) -> Self {
        let rows = category_totals(records)
            .into_iter()
            .map(|(code, total_units)| MonthlySalesRow {
                category: label_of(encoder, code),
                total_units,
            })
            .collect();
        Self { rows }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCategoryRow {
    pub month: Month,
    pub category: String,
    pub units: u64,
}

/// Units per (month, category) pair, ordered by month then category code.
pub fn monthly_category_table(records: &[SalesRecord], encoder: &CategoryEncoder) -> Vec<MonthCategoryRow> {
    sum_by(records, Grouping::MonthAndCategory)
        .into_iter()
        .filter_map(|(key, units)| {
            let month = key.month?;
            let category = key.category?;
            Some(MonthCategoryRow {
                month,
                category: label_of(encoder, category),
                units,
            })
        })
        .collect()
}
