use chrono::{Datelike, Local, NaiveDate};

use stockcast_core::Month;

/// Source of "today" for month-relative queries.
pub trait Clock {
    fn today(&self) -> NaiveDate;

    fn current_month(&self) -> Month {
        Month::new(self.today().month()).unwrap_or(Month::JANUARY)
    }
}

/// Local wall clock.
#[derive(Debug, Copy, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
