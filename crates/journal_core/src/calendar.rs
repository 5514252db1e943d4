use chrono::{Datelike, Days, NaiveDate};
use thiserror::Error;

/// The target site encodes dates in the domestic (ROC) era: Gregorian
/// year minus this offset.
const ERA_OFFSET: i32 = 1911;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("year {0} predates the supported era")]
    BeforeEra(i32),
}

/// Converts a Gregorian date to the site's domestic-era date string:
/// zero-padded 3-digit era year, 2-digit month, 2-digit day, no
/// separators. 2024-03-05 becomes "1130305".
pub fn to_domestic_era(date: NaiveDate) -> Result<String, CalendarError> {
    let year = date.year();
    if year <= ERA_OFFSET {
        return Err(CalendarError::BeforeEra(year));
    }
    Ok(format!(
        "{:03}{:02}{:02}",
        year - ERA_OFFSET,
        date.month(),
        date.day()
    ))
}

/// An inclusive range of calendar days.
///
/// The caller validates `start <= end` before a run begins; `days` still
/// re-checks defensively and yields an empty sequence for an inverted
/// range rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// All dates in the range, inclusive, daily step, in order.
    pub fn days(&self) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut current = self.start;
        while current <= self.end {
            dates.push(current);
            match current.checked_add_days(Days::new(1)) {
                Some(next) => current = next,
                None => break,
            }
        }
        dates
    }
}
