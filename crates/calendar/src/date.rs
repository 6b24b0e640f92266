//! Calendar-aware date.

use std::cmp::Ordering;
use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::calendar::Calendar;
use crate::error::CalendarError;

/// A date (year, month, day) interpreted in a specific [`Calendar`].
///
/// Ordering compares `(year, month, day)` only; comparing dates from
/// different calendars is not meaningful but is not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Date {
    year: i32,
    month: u8,
    day: u8,
    calendar: Calendar,
}

impl PartialOrd for Date {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Date {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, self.month, self.day).cmp(&(other.year, other.month, other.day))
    }
}

impl Date {
    /// Creates a new `Date` in `calendar`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] if the month or day does not exist in the
    /// given calendar and year.
    pub fn new(calendar: Calendar, year: i32, month: u8, day: u8) -> Result<Self, CalendarError> {
        let max_day = calendar.days_in_month(year, month)?;
        if day == 0 || day > max_day {
            return Err(CalendarError::InvalidDay {
                day,
                month,
                max_day,
            });
        }
        Ok(Self {
            year,
            month,
            day,
            calendar,
        })
    }

    /// Shorthand for a proleptic Gregorian date.
    pub fn ymd(year: i32, month: u8, day: u8) -> Result<Self, CalendarError> {
        Self::new(Calendar::Standard, year, month, day)
    }

    /// Returns the year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// Returns the month (1..=12).
    pub fn month(self) -> u8 {
        self.month
    }

    /// Returns the day within the month.
    pub fn day(self) -> u8 {
        self.day
    }

    /// Returns the calendar this date belongs to.
    pub fn calendar(self) -> Calendar {
        self.calendar
    }

    /// Whether the date's year has a February 29th.
    pub fn is_leap_year(self) -> bool {
        self.calendar.is_leap_year(self.year)
    }

    /// 1-based ordinal day within the year (`dayofyear`).
    pub fn ordinal(self) -> u16 {
        self.calendar.ordinal(self.year, self.month, self.day)
    }

    /// Returns the following day.
    pub fn next(self) -> Self {
        let ord = self.ordinal();
        if ord == self.calendar.year_length(self.year) {
            Self {
                year: self.year + 1,
                month: 1,
                day: 1,
                calendar: self.calendar,
            }
        } else {
            self.with_ordinal(self.year, ord + 1)
        }
    }

    /// Shifts the date by `days` (negative values move backwards).
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::OutOfRange`] if the result cannot be
    /// represented.
    pub fn add_days(self, days: i64) -> Result<Self, CalendarError> {
        Self::from_day_number(self.calendar, self.day_number() + days)
    }

    /// Date reached `days` days after `epoch`, in the epoch's calendar.
    ///
    /// This is how CF `"days since <epoch>"` time coordinates are decoded.
    pub fn from_days_since(epoch: Date, days: i64) -> Result<Self, CalendarError> {
        epoch.add_days(days)
    }

    /// Signed number of days from `epoch` to `self`.
    pub fn days_since(self, epoch: Date) -> i64 {
        self.day_number() - epoch.day_number()
    }

    /// Converts a proleptic Gregorian date to a chrono date.
    ///
    /// Returns `None` for dates in other calendars.
    pub fn to_naive_date(self) -> Option<NaiveDate> {
        if self.calendar != Calendar::Standard {
            return None;
        }
        NaiveDate::from_ymd_opt(self.year, u32::from(self.month), u32::from(self.day))
    }

    fn with_ordinal(self, year: i32, ordinal: u16) -> Self {
        let (month, day) = self.calendar.month_day(year, ordinal);
        Self {
            year,
            month,
            day,
            calendar: self.calendar,
        }
    }

    /// Continuous day count in the date's calendar.
    fn day_number(self) -> i64 {
        match self.calendar {
            Calendar::Standard => self
                .to_naive_date()
                .map(|d| i64::from(d.num_days_from_ce()))
                .unwrap_or_default(),
            cal => {
                i64::from(self.year) * i64::from(cal.nominal_year_length())
                    + i64::from(self.ordinal())
                    - 1
            }
        }
    }

    fn from_day_number(calendar: Calendar, n: i64) -> Result<Self, CalendarError> {
        match calendar {
            Calendar::Standard => {
                let days = i32::try_from(n).map_err(|_| CalendarError::OutOfRange {
                    year: n / 365,
                })?;
                let d = NaiveDate::from_num_days_from_ce_opt(days)
                    .ok_or(CalendarError::OutOfRange { year: n / 365 })?;
                Ok(Date::from(d))
            }
            cal => {
                let len = i64::from(cal.nominal_year_length());
                let year = n.div_euclid(len);
                let year = i32::try_from(year).map_err(|_| CalendarError::OutOfRange { year })?;
                let ordinal = (n.rem_euclid(len) + 1) as u16;
                let (month, day) = cal.month_day(year, ordinal);
                Ok(Self {
                    year,
                    month,
                    day,
                    calendar: cal,
                })
            }
        }
    }
}

impl From<NaiveDate> for Date {
    fn from(d: NaiveDate) -> Self {
        Self {
            year: d.year(),
            month: d.month() as u8,
            day: d.day() as u8,
            calendar: Calendar::Standard,
        }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_valid() {
        let date = Date::ymd(2000, 2, 29).unwrap();
        assert_eq!(date.year(), 2000);
        assert_eq!(date.month(), 2);
        assert_eq!(date.day(), 29);
        assert_eq!(date.ordinal(), 60);
    }

    #[test]
    fn new_invalid_day_noleap() {
        assert_eq!(
            Date::new(Calendar::NoLeap, 2000, 2, 29).unwrap_err(),
            CalendarError::InvalidDay {
                day: 29,
                month: 2,
                max_day: 28,
            }
        );
    }

    #[test]
    fn day_360_accepts_feb_30() {
        let date = Date::new(Calendar::Day360, 2001, 2, 30).unwrap();
        assert_eq!(date.ordinal(), 60);
    }

    #[test]
    fn next_leap_day() {
        let date = Date::ymd(2024, 2, 28).unwrap();
        assert_eq!(date.next(), Date::ymd(2024, 2, 29).unwrap());
        assert_eq!(date.next().next(), Date::ymd(2024, 3, 1).unwrap());
    }

    #[test]
    fn next_year_wrap_360() {
        let date = Date::new(Calendar::Day360, 1999, 12, 30).unwrap();
        let next = date.next();
        assert_eq!((next.year(), next.month(), next.day()), (2000, 1, 1));
    }

    #[test]
    fn add_days_matches_next() {
        for cal in [
            Calendar::Standard,
            Calendar::NoLeap,
            Calendar::AllLeap,
            Calendar::Day360,
        ] {
            let start = Date::new(cal, 1999, 11, 20).unwrap();
            let mut stepped = start;
            for k in 1..=800 {
                stepped = stepped.next();
                assert_eq!(start.add_days(k).unwrap(), stepped, "{cal} +{k}");
                assert_eq!(stepped.days_since(start), k);
            }
        }
    }

    #[test]
    fn add_negative_days() {
        let date = Date::ymd(2000, 1, 1).unwrap();
        assert_eq!(date.add_days(-1).unwrap(), Date::ymd(1999, 12, 31).unwrap());
    }

    #[test]
    fn from_days_since_epoch() {
        let epoch = Date::ymd(1970, 1, 1).unwrap();
        let date = Date::from_days_since(epoch, 11_016).unwrap();
        assert_eq!(date, Date::ymd(2000, 2, 29).unwrap());
    }

    #[test]
    fn naive_date_conversion() {
        let nd = NaiveDate::from_ymd_opt(2012, 7, 4).unwrap();
        let date = Date::from(nd);
        assert_eq!(date.to_naive_date(), Some(nd));
        let noleap = Date::new(Calendar::NoLeap, 2012, 7, 4).unwrap();
        assert_eq!(noleap.to_naive_date(), None);
    }

    #[test]
    fn ordering() {
        let a = Date::ymd(1999, 12, 31).unwrap();
        let b = Date::ymd(2000, 1, 1).unwrap();
        assert!(a < b);
    }

    #[test]
    fn display() {
        assert_eq!(Date::ymd(981, 3, 7).unwrap().to_string(), "0981-03-07");
    }
}
