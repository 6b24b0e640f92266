//! # mhw-calendar
//!
//! Calendar arithmetic for daily sea-surface-temperature time axes.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["CF calendar name"] -->|"Calendar::from_cf_name()"| B["Calendar"]
//!     B -->|"Date::new()"| C["Date"]
//!     C -->|".next() / .add_days()"| C
//!     C -->|"date_sequence()"| D["Vec of Date"]
//!     D -->|"DoyMode::for_axis()"| E["DoyMode"]
//!     D -->|"annotate_doy()"| F["Vec of Doy (1..=366)"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use mhw_calendar::{Calendar, Date, Doy, DoyMode, annotate_doy, date_sequence};
//!
//! let start = Date::new(Calendar::Standard, 2001, 1, 1).unwrap();
//! let times = date_sequence(start, 365);
//! let mode = DoyMode::for_axis(&times, false);
//! let doy = annotate_doy(&times, mode);
//! assert_eq!(doy[59].get(), 61); // Mar 1 in a non-leap year
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `calendar` | CF calendars and year structure |
//! | `date` | Calendar-aware date |
//! | `doy` | Normalized day-of-year and time-step indexing |
//! | `sequence` | Date sequence generation |
//! | `error` | Error types |

mod calendar;
mod date;
mod doy;
mod error;
mod sequence;

pub use calendar::Calendar;
pub use date::Date;
pub use doy::{DOY_SLOTS, Doy, DoyMode, FEB29, annotate_doy};
pub use error::CalendarError;
pub use sequence::{date_sequence, year_sequence};
