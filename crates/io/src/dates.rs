//! Calendar-aware conversion between dates and Arrow `Date32` day numbers.
//!
//! `Date32` stores days since 1970-01-01. For non-standard calendars the
//! count is taken in that calendar, so a 360-day series round-trips through
//! Parquet even though the numbers are not Gregorian day numbers.

use mhw_calendar::{Calendar, Date};

use crate::error::IoError;

fn epoch(calendar: Calendar) -> Result<Date, IoError> {
    Ok(Date::new(calendar, 1970, 1, 1)?)
}

/// Days since 1970-01-01 in the date's own calendar.
pub(crate) fn to_date32(date: Date) -> Result<i32, IoError> {
    let days = date.days_since(epoch(date.calendar())?);
    i32::try_from(days).map_err(|_| IoError::InvalidTime {
        reason: format!("{date} is out of range for Date32"),
    })
}

/// Date `days` after 1970-01-01 in `calendar`.
pub(crate) fn from_date32(calendar: Calendar, days: i32) -> Result<Date, IoError> {
    Ok(Date::from_days_since(epoch(calendar)?, i64::from(days))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_matches_unix_days() {
        let d = Date::ymd(2000, 3, 1).unwrap();
        assert_eq!(to_date32(d).unwrap(), 11_017);
        assert_eq!(from_date32(Calendar::Standard, 11_017).unwrap(), d);
    }

    #[test]
    fn day360_counts_in_own_calendar() {
        let d = Date::new(Calendar::Day360, 1971, 2, 30).unwrap();
        assert_eq!(to_date32(d).unwrap(), 360 + 59);
        assert_eq!(from_date32(Calendar::Day360, 419).unwrap(), d);
    }

    #[test]
    fn before_epoch_is_negative() {
        let d = Date::ymd(1969, 12, 31).unwrap();
        assert_eq!(to_date32(d).unwrap(), -1);
    }
}
