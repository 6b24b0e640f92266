//! # mhw-events
//!
//! Marine heat wave events in a single time series, following the
//! Hobday et al. (2016) definition: at least `min_duration` consecutive
//! days at or above a day-of-year threshold, with runs separated by at most
//! `max_gap` days optionally joined into one event.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["temp, thresh, seas"] -->|"exceedance()"| B["bool series"]
//!     B -->|"find_runs()"| C["runs >= min_duration"]
//!     C -->|"join_gaps()"| D["events"]
//!     D -->|"MhwEvent::from_run"| E["intensities, category, rates"]
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `runs` | Run counter, run detection, per-step labels |
//! | `join` | Gap joining |
//! | `stats` | Anomaly frames and intensity reductions |
//! | `category` | Severity categories and per-category durations |
//! | `rates` | Onset and decline rates |
//! | `event` | `MhwEvent` record |
//! | `detect` | Single-cell pipeline |

mod category;
mod config;
mod detect;
mod error;
mod event;
mod join;
mod rates;
mod runs;
mod stats;

pub use category::{Category, category_durations, event_category, step_categories};
pub use config::EventConfig;
pub use detect::{CellEvents, Intermediate, define_events, detect_runs};
pub use error::EventsError;
pub use event::MhwEvent;
pub use join::join_gaps;
pub use rates::{rate_decline, rate_onset};
pub use runs::{EventLabels, Run, exceedance, find_runs, run_counter};
pub use stats::{Anomalies, Intensity, index_peak};
