//! Day-of-year on a normalized 366-slot axis.
//!
//! Non-leap years skip slot 60 (February 29th) so that, for example,
//! March 1st is always slot 61 and every year lines up on the same axis.

use crate::date::Date;
use crate::error::CalendarError;

/// Number of slots on the normalized day-of-year axis.
pub const DOY_SLOTS: usize = 366;

/// Slot reserved for February 29th.
pub const FEB29: u16 = 60;

/// Day-of-year on the normalized 366-slot axis (1..=366), or a time-step
/// index (1..=year length) when [`DoyMode::TimeStep`] is in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Doy(u16);

impl Doy {
    /// Creates a new `Doy` from a raw value.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidDoy`] if `value` is outside 1..=366.
    pub fn new(value: u16) -> Result<Self, CalendarError> {
        if !(1..=366).contains(&value) {
            return Err(CalendarError::InvalidDoy { doy: value });
        }
        Ok(Self(value))
    }

    /// Normalized day-of-year of a calendar date.
    ///
    /// The ordinal day is kept as-is in leap years and incremented by one on
    /// or after March 1st in non-leap years.
    pub fn of_date(date: Date) -> Self {
        let shift = u16::from(!date.is_leap_year() && date.month() >= 3);
        Self(date.ordinal() + shift)
    }

    /// Returns the raw value.
    pub fn get(self) -> u16 {
        self.0
    }

    /// Returns the 0-based slot index.
    pub fn index(self) -> usize {
        usize::from(self.0) - 1
    }
}

/// How day-of-year is assigned to a time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoyMode {
    /// Calendar dates mapped to the 366-slot axis.
    Calendar,
    /// Repeating time-step index modulo a fixed year length.
    TimeStep {
        /// Number of time steps per year.
        year_length: u16,
    },
}

impl DoyMode {
    /// Selects the mode for a time axis.
    ///
    /// Time-step mode is used when requested or when the calendar is not
    /// measured in real days (360-day years).
    pub fn for_axis(times: &[Date], tstep: bool) -> Self {
        let calendar = times.first().map(|d| d.calendar()).unwrap_or_default();
        if tstep || calendar.requires_tstep() {
            Self::TimeStep {
                year_length: calendar.nominal_year_length(),
            }
        } else {
            Self::Calendar
        }
    }

    /// Length of the day-of-year axis under this mode.
    pub fn n_slots(self) -> usize {
        match self {
            Self::Calendar => DOY_SLOTS,
            Self::TimeStep { year_length } => usize::from(year_length),
        }
    }

    /// Whether the February 29th slot exists and should be interpolated.
    pub fn has_feb29(self) -> bool {
        self == Self::Calendar
    }
}

/// Assigns a day-of-year to every time step.
///
/// In time-step mode the index counts from the start of the first year, so
/// a series beginning on January 1st gets `position % year_length + 1`.
pub fn annotate_doy(times: &[Date], mode: DoyMode) -> Vec<Doy> {
    match mode {
        DoyMode::Calendar => times.iter().map(|&d| Doy::of_date(d)).collect(),
        DoyMode::TimeStep { year_length } => {
            let len = usize::from(year_length.max(1));
            let offset = times
                .first()
                .map(|d| usize::from(d.ordinal()) - 1)
                .unwrap_or(0)
                % len;
            (0..times.len())
                .map(|i| Doy(((offset + i) % len + 1) as u16))
                .collect()
        }
    }
}
