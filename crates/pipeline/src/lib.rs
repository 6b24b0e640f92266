//! # mhw-pipeline
//!
//! Gridded marine heat wave detection. [`threshold`] computes a
//! day-of-year climatology for every ocean cell of a grid; [`detect`]
//! finds events in every cell against that climatology. Cells are
//! independent and processed on the rayon thread pool.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph TD
//!     A["Grid"] -->|"land_check()"| B["StackedCells"]
//!     B -->|"annotate_doy()"| C["per-cell series + doy"]
//!     C -->|"calc_clim() per cell"| D["ClimatologyGrid"]
//!     C -->|"define_events() per cell"| E["Detection"]
//!     D --> E
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use mhw_pipeline::{DetectConfig, ThresholdConfig, detect, threshold};
//!
//! let clim = threshold(&sst, &ThresholdConfig::new().with_climatology_period(1983, 2012))?;
//! let found = detect(&sst, &clim, &DetectConfig::new())?;
//! println!("{} events", found.n_events());
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `config` | `ThresholdConfig` and `DetectConfig` builders |
//! | `threshold` | Gridded climatology computation |
//! | `detect` | Gridded event detection |
//! | `output` | `ClimatologyGrid` and `Detection` |
//! | `error` | `MhwError` |

mod config;
mod detect;
mod error;
mod output;
mod params;
mod threshold;

pub use config::{DEFAULT_TDIM, DetectConfig, ThresholdConfig};
pub use detect::detect;
pub use error::MhwError;
pub use output::{ClimatologyGrid, Detection, PARAMETERS_ATTR};
pub use threshold::threshold;

pub use mhw_calendar::{Calendar, Date, Doy, DoyMode};
pub use mhw_climatology::{ClimConfig, Climatology};
pub use mhw_events::{Category, EventConfig, Intermediate, MhwEvent};
pub use mhw_grid::{Coords, Dim, Grid, Gridded};
