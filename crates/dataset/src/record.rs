use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use stockcast_core::{CategoryCode, Month};

/// One historical order row as it comes out of the tabular import.
///
/// Header names follow the Spanish spreadsheet columns; English aliases are
/// accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSalesRecord {
    #[serde(rename = "Fecha pedido", alias = "order_date")]
    pub order_date: String,
    #[serde(rename = "Tipo de producto", alias = "category")]
    pub category: String,
    #[serde(rename = "Unidades", alias = "units")]
    pub units: u64,
}

impl RawSalesRecord {
    pub fn new(order_date: impl Into<String>, category: impl Into<String>, units: u64) -> Self {
        Self {
            order_date: order_date.into(),
            category: category.into(),
            units,
        }
    }
}

/// A normalized order row: parsed date, derived month/year, encoded category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub order_date: NaiveDate,
    pub month: Month,
    pub year: i32,
    pub category: CategoryCode,
    pub units: u64,
}

impl SalesRecord {
    pub fn new(order_date: NaiveDate, category: CategoryCode, units: u64) -> Self {
        // chrono guarantees month() is in 1..=12.
        let month = Month::new(order_date.month()).unwrap_or(Month::JANUARY);
        Self {
            order_date,
            month,
            year: order_date.year(),
            category,
            units,
        }
    }

    pub fn features(&self) -> FeatureRow {
        FeatureRow {
            month: self.month,
            year: self.year,
            category: self.category,
        }
    }
}

/// Independent variables of the forecast model.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureRow {
    pub month: Month,
    pub year: i32,
    pub category: CategoryCode,
}

impl FeatureRow {
    pub fn new(month: Month, year: i32, category: CategoryCode) -> Self {
        Self {
            month,
            year,
            category,
        }
    }

    /// Column order: month, year, category code.
    pub fn to_vector(&self) -> [f64; 3] {
        [
            f64::from(self.month.number()),
            f64::from(self.year),
            f64::from(self.category.get()),
        ]
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];

/// Parse an order date in any of the accepted layouts.
///
/// Time-of-day components are discarded; only the calendar date matters.
pub fn parse_order_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive())
}
