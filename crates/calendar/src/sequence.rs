//! Contiguous daily date sequences.

use crate::calendar::Calendar;
use crate::date::Date;

/// Generates `n_days` consecutive dates starting at `start`, in the start
/// date's calendar.
///
/// # Example
///
/// ```ignore
/// let start = Date::ymd(2000, 2, 28).unwrap();
/// let dates = date_sequence(start, 3);
/// // Feb 28, Feb 29, Mar 1
/// ```
pub fn date_sequence(start: Date, n_days: usize) -> Vec<Date> {
    let mut dates = Vec::with_capacity(n_days);
    if n_days == 0 {
        return dates;
    }
    dates.push(start);
    let mut current = start;
    for _ in 1..n_days {
        current = current.next();
        dates.push(current);
    }
    dates
}

/// Date sequence covering whole years `first_year..=last_year`.
pub fn year_sequence(calendar: Calendar, first_year: i32, last_year: i32) -> Vec<Date> {
    if last_year < first_year {
        return Vec::new();
    }
    let n: usize = (first_year..=last_year)
        .map(|y| usize::from(calendar.year_length(y)))
        .sum();
    match Date::new(calendar, first_year, 1, 1) {
        Ok(start) => date_sequence(start, n),
        Err(_) => Vec::new(),
    }
}
