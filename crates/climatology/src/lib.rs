//! # mhw-climatology
//!
//! Day-of-year climatologies for heat wave detection: for every slot on the
//! day-of-year axis, the seasonal mean (`seas`) and a percentile threshold
//! (`thresh`) of all values within a ± half-width window of that day,
//! pooled across years.
//!
//! ```mermaid
//! graph LR
//!     A["series + doy"] -->|"window_roll()"| B["(time, 2w+1) windows"]
//!     B -->|"pool_by_doy()"| C["per-doy samples"]
//!     C -->|"calculate_seas() / calculate_thresh()"| D["raw climatology"]
//!     D -->|"feb29() + runavg()"| E["Climatology"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use mhw_calendar::{DoyMode, annotate_doy};
//! use mhw_climatology::{ClimConfig, calc_clim};
//!
//! let mode = DoyMode::for_axis(&times, false);
//! let doy = annotate_doy(&times, mode);
//! let clim = calc_clim(&sst, &doy, mode, &ClimConfig::new())?;
//! println!("{}", clim.thresh()[0]);
//! ```

mod clim;
mod config;
mod error;
mod window;

pub use clim::{Climatology, calc_clim, calculate_seas, calculate_thresh, feb29, runavg};
pub use config::ClimConfig;
pub use error::ClimatologyError;
pub use window::{pool_by_doy, window_roll};
