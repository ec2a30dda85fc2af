//! Inventory analytics over prepared sales records.
//!
//! Grouped sums and rankings, the stock-alert policy and the report tables
//! built from them. Deterministic and side-effect free; writing reports out is
//! an infrastructure concern.

pub mod aggregation;
pub mod report;
pub mod stock;

pub use aggregation::{AggregationResult, GroupKey, Grouping};
pub use report::{
    LowStockReport, LowStockRow, MonthCategoryRow, MonthlySalesReport, MonthlySalesRow, QueryRow,
    monthly_category_table,
};
pub use stock::{StockLevel, StockPolicy};

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use stockcast_core::CategoryCode;
    use stockcast_dataset::SalesRecord;

    pub fn record(year: i32, month: u32, category: u32, units: u64) -> SalesRecord {
        let date = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
        SalesRecord::new(date, CategoryCode::new(category), units)
    }

    /// Category 0 ("A") sells 100 every month, category 1 ("B") sells 2000.
    pub fn two_category_year() -> Vec<SalesRecord> {
        (1..=12)
            .flat_map(|m| [record(2024, m, 0, 100), record(2024, m, 1, 2000)])
            .collect()
    }
}
