//! CF-convention calendars and their year structure.

use std::fmt;
use std::str::FromStr;

use crate::error::CalendarError;

/// Cumulative days before each month in a 365-day year (index 12 = year length).
const CUM_DAYS_365: [u16; 13] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365];

/// Cumulative days before each month in a 366-day year (index 12 = year length).
const CUM_DAYS_366: [u16; 13] = [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335, 366];

/// Calendar used by a time axis, following the CF `calendar` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Calendar {
    /// Proleptic Gregorian (`standard`, `gregorian`, `proleptic_gregorian`).
    #[default]
    Standard,
    /// Every year has 365 days (`noleap`, `365_day`).
    NoLeap,
    /// Every year has 366 days (`all_leap`, `366_day`).
    AllLeap,
    /// Twelve 30-day months (`360_day`).
    Day360,
}

impl Calendar {
    /// Parses a CF calendar name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::UnknownCalendar`] for names outside the
    /// supported set. `julian` is rejected because its leap rule differs from
    /// the proleptic Gregorian one for historical dates.
    pub fn from_cf_name(name: &str) -> Result<Self, CalendarError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" | "gregorian" | "proleptic_gregorian" => Ok(Self::Standard),
            "noleap" | "365_day" => Ok(Self::NoLeap),
            "all_leap" | "366_day" => Ok(Self::AllLeap),
            "360_day" => Ok(Self::Day360),
            _ => Err(CalendarError::UnknownCalendar {
                name: name.to_string(),
            }),
        }
    }

    /// Canonical CF name.
    pub fn cf_name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::NoLeap => "noleap",
            Self::AllLeap => "all_leap",
            Self::Day360 => "360_day",
        }
    }

    /// Whether `year` contains a February 29th in this calendar.
    pub fn is_leap_year(self, year: i32) -> bool {
        match self {
            Self::Standard => (year % 4 == 0 && year % 100 != 0) || year % 400 == 0,
            Self::NoLeap | Self::Day360 => false,
            Self::AllLeap => true,
        }
    }

    /// Number of days in `year`.
    pub fn year_length(self, year: i32) -> u16 {
        match self {
            Self::Day360 => 360,
            _ if self.is_leap_year(year) => 366,
            _ => 365,
        }
    }

    /// Average number of days per year.
    ///
    /// Used to decide whether dates can be mapped onto the 366-slot
    /// day-of-year axis: a 360-day calendar forces time-step indexing.
    pub fn days_per_year(self) -> f64 {
        match self {
            Self::Standard => 365.2425,
            Self::NoLeap => 365.0,
            Self::AllLeap => 366.0,
            Self::Day360 => 360.0,
        }
    }

    /// Nominal year length used for time-step day-of-year indexing.
    pub fn nominal_year_length(self) -> u16 {
        match self {
            Self::Standard | Self::NoLeap => 365,
            Self::AllLeap => 366,
            Self::Day360 => 360,
        }
    }

    /// Whether day-of-year must be derived from the time-step position
    /// rather than from calendar dates.
    pub fn requires_tstep(self) -> bool {
        self.days_per_year() == 360.0
    }

    /// Number of days in `month` of `year`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] if `month` is outside 1..=12.
    pub fn days_in_month(self, year: i32, month: u8) -> Result<u8, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { month });
        }
        if self == Self::Day360 {
            return Ok(30);
        }
        let cum = self.cumulative(year);
        let m = usize::from(month);
        Ok((cum[m] - cum[m - 1]) as u8)
    }

    /// 1-based ordinal day within the year of a validated month/day.
    pub(crate) fn ordinal(self, year: i32, month: u8, day: u8) -> u16 {
        if self == Self::Day360 {
            return u16::from(month - 1) * 30 + u16::from(day);
        }
        self.cumulative(year)[usize::from(month) - 1] + u16::from(day)
    }

    /// Month and day for a 1-based ordinal day within `year`.
    ///
    /// `ordinal` must lie in `1..=self.year_length(year)`.
    pub(crate) fn month_day(self, year: i32, ordinal: u16) -> (u8, u8) {
        if self == Self::Day360 {
            let zero = ordinal - 1;
            return ((zero / 30 + 1) as u8, (zero % 30 + 1) as u8);
        }
        let cum = self.cumulative(year);
        let month = cum[1..].iter().position(|&c| ordinal <= c).unwrap_or(11);
        (month as u8 + 1, (ordinal - cum[month]) as u8)
    }

    fn cumulative(self, year: i32) -> &'static [u16; 13] {
        if self.is_leap_year(year) {
            &CUM_DAYS_366
        } else {
            &CUM_DAYS_365
        }
    }
}

impl FromStr for Calendar {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_cf_name(s)
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cf_name())
    }
}
