//! Error types for the mhw-calendar crate.

/// Error type for all fallible operations in the mhw-calendar crate.
///
/// Covers validation of day-of-year values, month and day numbers for a
/// given calendar, and unrecognised CF calendar names.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum CalendarError {
    /// Returned when a day-of-year value is outside the valid range 1..=366.
    #[error("invalid day of year: {doy} (must be 1..=366)")]
    InvalidDoy {
        /// The invalid day-of-year value that was provided.
        doy: u16,
    },

    /// Returned when a month number is outside the valid range 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number that was provided.
        month: u8,
    },

    /// Returned when a day number exceeds the number of days in the given month.
    #[error("invalid day: {day} for month {month} (max {max_day})")]
    InvalidDay {
        /// The invalid day number that was provided.
        day: u8,
        /// The month for which the day is invalid.
        month: u8,
        /// The maximum valid day for the given month.
        max_day: u8,
    },

    /// Returned when a CF `calendar` attribute names an unsupported calendar.
    #[error("unsupported calendar: {name:?}")]
    UnknownCalendar {
        /// The calendar name as found in the metadata.
        name: String,
    },

    /// Returned when date arithmetic leaves the representable range.
    #[error("date out of range: {year}")]
    OutOfRange {
        /// Year at which the overflow was detected.
        year: i64,
    },
}
