//! Grouped sums and rankings over sales records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stockcast_core::{CategoryCode, Month};
use stockcast_dataset::SalesRecord;

/// Which fields to group by.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Grouping {
    Month,
    Category,
    MonthAndCategory,
}

/// Grouping tuple. Fields not part of the grouping are `None`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub month: Option<Month>,
    pub category: Option<CategoryCode>,
}

impl GroupKey {
    fn of(record: &SalesRecord, grouping: Grouping) -> Self {
        match grouping {
            Grouping::Month => Self {
                month: Some(record.month),
                category: None,
            },
            Grouping::Category => Self {
                month: None,
                category: Some(record.category),
            },
            Grouping::MonthAndCategory => Self {
                month: Some(record.month),
                category: Some(record.category),
            },
        }
    }
}

/// Summed units per grouping key. Consumers re-sort as needed.
pub type AggregationResult = BTreeMap<GroupKey, u64>;

/// Add into a running total. Sums saturate at `u64::MAX` instead of wrapping.
fn accumulate(total: &mut u64, units: u64) {
    *total = total.saturating_add(units);
}

/// Sum units per distinct key present in `records`.
pub fn sum_by(records: &[SalesRecord], grouping: Grouping) -> AggregationResult {
    let mut out = AggregationResult::new();
    for r in records {
        accumulate(out.entry(GroupKey::of(r, grouping)).or_insert(0), r.units);
    }
    out
}

/// Per-month totals for an arbitrary (e.g. pre-filtered) set of records.
pub fn monthly_totals<'a, I>(records: I) -> BTreeMap<Month, u64>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let mut out = BTreeMap::new();
    for r in records {
        accumulate(out.entry(r.month).or_insert(0), r.units);
    }
    out
}

pub fn category_totals(records: &[SalesRecord]) -> BTreeMap<CategoryCode, u64> {
    let mut out = BTreeMap::new();
    for r in records {
        accumulate(out.entry(r.category).or_insert(0), r.units);
    }
    out
}

pub fn total_units(records: &[SalesRecord]) -> u64 {
    records.iter().fold(0, |total, r| total.saturating_add(r.units))
}

/// Expand a partial month series to all twelve months, filling gaps with zero.
pub fn reindex_months(series: &BTreeMap<Month, u64>) -> [u64; 12] {
    let mut out = [0u64; 12];
    for (month, &units) in series {
        accumulate(&mut out[month.index()], units);
    }
    out
}

/// The `n` best-selling categories, by total units descending.
///
/// Ties go to the lowest category code.
pub fn top_n_by_category(records: &[SalesRecord], n: usize) -> Vec<(CategoryCode, u64)> {
    let mut totals: Vec<(CategoryCode, u64)> = category_totals(records).into_iter().collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    totals.truncate(n);
    totals
}
