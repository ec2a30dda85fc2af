//! Stock-alert policy.
//!
//! Two rules share this type with different thresholds: the row-level alert
//! (default 1000 units) and the critical-stock query (default 10 units). They
//! are configured independently and must not be swapped.

use serde::{Deserialize, Serialize};

use stockcast_core::{EngineConfig, Month};
use stockcast_dataset::SalesRecord;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockLevel {
    #[serde(rename = "Stock Bajo")]
    Low,
    #[serde(rename = "Stock Adecuado")]
    Adequate,
}

impl StockLevel {
    pub fn label(self) -> &'static str {
        match self {
            StockLevel::Low => "Stock Bajo",
            StockLevel::Adequate => "Stock Adecuado",
        }
    }
}

impl core::fmt::Display for StockLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// A row is low on stock when its units are strictly below `threshold`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StockPolicy {
    pub threshold: u64,
}

impl StockPolicy {
    pub const fn new(threshold: u64) -> Self {
        Self { threshold }
    }

    /// The row-level alert used by reports and the low-stock voice queries.
    pub fn row_level(cfg: &EngineConfig) -> Self {
        Self::new(cfg.low_stock_threshold)
    }

    /// The critical-stock voice query.
    pub fn critical(cfg: &EngineConfig) -> Self {
        Self::new(cfg.critical_stock_threshold)
    }

    pub fn classify(&self, units: u64) -> StockLevel {
        if units < self.threshold {
            StockLevel::Low
        } else {
            StockLevel::Adequate
        }
    }

    pub fn is_low(&self, units: u64) -> bool {
        self.classify(units) == StockLevel::Low
    }

    /// Every low row, in dataset order, unlimited.
    pub fn low_rows<'a>(&self, records: &'a [SalesRecord]) -> Vec<&'a SalesRecord> {
        records.iter().filter(|r| self.is_low(r.units)).collect()
    }

    /// The `limit` lowest low rows of one month, ascending by units.
    ///
    /// Rows with equal units keep dataset order.
    pub fn lowest_in_month<'a>(
        &self,
        records: &'a [SalesRecord],
        month: Month,
        limit: usize,
    ) -> Vec<&'a SalesRecord> {
        let mut rows: Vec<&SalesRecord> = records
            .iter()
            .filter(|r| r.month == month && self.is_low(r.units))
            .collect();
        rows.sort_by_key(|r| r.units);
        rows.truncate(limit);
        rows
    }

    pub fn low_count(&self, records: &[SalesRecord]) -> usize {
        records.iter().filter(|r| self.is_low(r.units)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{record, two_category_year};
    use stockcast_core::CategoryCode;

    #[test]
    fn threshold_is_exclusive() {
        let policy = StockPolicy::new(1000);
        assert_eq!(policy.classify(999), StockLevel::Low);
        assert_eq!(policy.classify(1000), StockLevel::Adequate);
        assert_eq!(policy.classify(0), StockLevel::Low);
    }

    #[test]
    fn row_level_alert_labels_each_category() {
        let records = two_category_year();
        let policy = StockPolicy::row_level(&EngineConfig::default());
        for r in &records {
            let expected = if r.category == CategoryCode::new(0) {
                "Stock Bajo"
            } else {
                "Stock Adecuado"
            };
            assert_eq!(policy.classify(r.units).label(), expected);
        }
        assert_eq!(policy.low_count(&records), 12);
    }

    #[test]
    fn critical_query_ignores_rows_above_ten_units() {
        let records = two_category_year();
        let critical = StockPolicy::critical(&EngineConfig::default());
        assert!(critical.low_rows(&records).is_empty());
    }

    #[test]
    fn critical_query_returns_matches_in_dataset_order() {
        let records = vec![
            record(2024, 5, 0, 9),
            record(2024, 1, 1, 500),
            record(2024, 2, 2, 3),
        ];
        let critical = StockPolicy::critical(&EngineConfig::default());
        let units: Vec<u64> = critical.low_rows(&records).iter().map(|r| r.units).collect();
        assert_eq!(units, vec![9, 3]);
    }

    #[test]
    fn lowest_in_month_filters_sorts_and_limits() {
        let records = vec![
            record(2024, 3, 0, 900),
            record(2024, 3, 1, 20),
            record(2024, 4, 2, 1),
            record(2024, 3, 3, 1500),
            record(2023, 3, 4, 300),
            record(2024, 3, 5, 20),
            record(2024, 3, 6, 600),
            record(2024, 3, 7, 5),
            record(2024, 3, 8, 999),
        ];
        let policy = StockPolicy::new(1000);
        let march = Month::new(3).unwrap();
        let rows = policy.lowest_in_month(&records, march, 5);
        let got: Vec<(u32, u64)> = rows.iter().map(|r| (r.category.get(), r.units)).collect();
        assert_eq!(got, vec![(7, 5), (1, 20), (5, 20), (4, 300), (6, 600)]);
    }

    #[test]
    fn level_displays_as_report_label() {
        assert_eq!(StockLevel::Low.to_string(), "Stock Bajo");
        assert_eq!(StockLevel::Adequate.to_string(), "Stock Adecuado");
    }
}
