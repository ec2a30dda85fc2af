//! Calendar month value object.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A calendar month, guaranteed to be in 1..=12.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Month(u32);

impl Month {
    pub const JANUARY: Month = Month(1);
    pub const DECEMBER: Month = Month(12);

    pub fn new(month: u32) -> Result<Self, CoreError> {
        if (1..=12).contains(&month) {
            Ok(Self(month))
        } else {
            Err(CoreError::InvalidMonth(month))
        }
    }

    pub const fn number(self) -> u32 {
        self.0
    }

    /// Zero-based position (January = 0), for indexing 12-slot arrays.
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// All twelve months in calendar order.
    pub fn all() -> impl DoubleEndedIterator<Item = Month> {
        (1..=12).map(Month)
    }
}

impl TryFrom<u32> for Month {
    type Error = CoreError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Month::new(value)
    }
}

impl From<Month> for u32 {
    fn from(value: Month) -> Self {
        value.0
    }
}

impl core::fmt::Display for Month {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
