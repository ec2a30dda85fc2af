//! Ordered intent table.
//!
//! Each intent is recognized by one marker phrase. Construction rejects any
//! marker that contains another and any pair where the end of one marker is
//! the start of another. A transcript may still mention two markers side by
//! side; classification then takes the leftmost occurrence, so the answer
//! never depends on the order of the table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fixed set of voice-query purposes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentKind {
    /// Critical-stock query (lowest-stock products).
    LowestStock,
    /// Rows of one named product.
    ProductStock,
    /// Row-level alert restricted to the current month.
    LowStockThisMonth,
    /// Rows of the best-selling categories.
    TopSelling,
    /// Export the monthly sales report.
    MonthlyReport,
    /// Sum of all units sold.
    TotalSold,
    /// Row-level alert over every row.
    LowStockTotal,
}

/// Text following the last occurrence of this phrase names the product.
pub const PRODUCT_NAME_MARKER: &str = "del producto";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntentTableError {
    #[error("marker for {0:?} is empty")]
    EmptyMarker(IntentKind),

    #[error("marker {outer:?} contains marker {inner:?}")]
    OverlappingMarkers { outer: String, inner: String },

    #[error("marker {first:?} ends where marker {second:?} begins")]
    ChainedMarkers { first: String, second: String },

    #[error("intent {0:?} appears more than once")]
    DuplicateIntent(IntentKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentTable {
    entries: Vec<(IntentKind, String)>,
}

impl IntentTable {
    pub fn new<I, S>(entries: I) -> Result<Self, IntentTableError>
    where
        I: IntoIterator<Item = (IntentKind, S)>,
        S: Into<String>,
    {
        let entries: Vec<(IntentKind, String)> = entries.into_iter().map(|(k, m)| (k, m.into())).collect();

        for (i, (kind, marker)) in entries.iter().enumerate() {
            if marker.trim().is_empty() {
                return Err(IntentTableError::EmptyMarker(*kind));
            }
            if entries[..i].iter().any(|(k, _)| k == kind) {
                return Err(IntentTableError::DuplicateIntent(*kind));
            }
        }
        for (i, (_, outer)) in entries.iter().enumerate() {
            for (j, (_, inner)) in entries.iter().enumerate() {
                if i == j {
                    continue;
                }
                if find_ignore_case(outer, inner).is_some() {
                    return Err(IntentTableError::OverlappingMarkers {
                        outer: outer.clone(),
                        inner: inner.clone(),
                    });
                }
                if suffix_is_prefix(outer, inner) {
                    return Err(IntentTableError::ChainedMarkers {
                        first: outer.clone(),
                        second: inner.clone(),
                    });
                }
            }
        }

        Ok(Self { entries })
    }

    /// The Spanish command grammar the recognizer is configured for.
    pub fn spanish() -> Self {
        Self {
            entries: vec![
                (IntentKind::LowestStock, "producto con el stock más bajo".to_string()),
                (IntentKind::ProductStock, "unidades quedan".to_string()),
                (IntentKind::LowStockThisMonth, "productos tienen stock bajo este mes".to_string()),
                (IntentKind::TopSelling, "productos más vendidos".to_string()),
                (IntentKind::MonthlyReport, "reporte de ventas del mes pasado".to_string()),
                (IntentKind::TotalSold, "productos se vendieron en total".to_string()),
                (IntentKind::LowStockTotal, "productos con el stock bajo".to_string()),
            ],
        }
    }

    /// Intent whose marker occurs first in `transcript` (case-insensitive).
    ///
    /// Validated markers can never start at the same position, so the leftmost
    /// occurrence is unique.
    pub fn classify(&self, transcript: &str) -> Option<IntentKind> {
        self.entries
            .iter()
            .filter_map(|(kind, marker)| find_ignore_case(transcript, marker).map(|(start, _)| (start, *kind)))
            .min_by_key(|(start, _)| *start)
            .map(|(_, kind)| kind)
    }

    pub fn entries(&self) -> impl Iterator<Item = (IntentKind, &str)> {
        self.entries.iter().map(|(k, m)| (*k, m.as_str()))
    }
}

impl Default for IntentTable {
    fn default() -> Self {
        Self::spanish()
    }
}

/// Product name after the last [`PRODUCT_NAME_MARKER`], trimmed.
///
/// Keeps the transcript's casing.
pub fn extract_product_name(transcript: &str) -> Option<&str> {
    let (_, end) = rfind_ignore_case(transcript, PRODUCT_NAME_MARKER)?;
    Some(transcript[end..].trim())
}

/// Byte length of `needle` matched at the start of `hay`, ignoring case.
fn match_len_ignore_case(hay: &str, needle: &str) -> Option<usize> {
    let mut hay_chars = hay.char_indices();
    for n in needle.chars() {
        let (_, h) = hay_chars.next()?;
        if !h.to_lowercase().eq(n.to_lowercase()) {
            return None;
        }
    }
    Some(hay_chars.next().map_or(hay.len(), |(i, _)| i))
}

/// First match as a `(start, end)` byte range.
fn find_ignore_case(hay: &str, needle: &str) -> Option<(usize, usize)> {
    hay.char_indices()
        .find_map(|(i, _)| match_len_ignore_case(&hay[i..], needle).map(|len| (i, i + len)))
}

/// A proper, non-empty suffix of `first` is a prefix of `second` (ignoring case).
fn suffix_is_prefix(first: &str, second: &str) -> bool {
    first
        .char_indices()
        .skip(1)
        .any(|(i, _)| match_len_ignore_case(second, &first[i..]).is_some())
}

/// Last match as a `(start, end)` byte range.
fn rfind_ignore_case(hay: &str, needle: &str) -> Option<(usize, usize)> {
    hay.char_indices()
        .rev()
        .find_map(|(i, _)| match_len_ignore_case(&hay[i..], needle).map(|len| (i, i + len)))
}
