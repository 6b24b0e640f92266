//! # mhw-grid
//!
//! Labeled gridded time series and the cell stacking used to process every
//! spatial point independently.
//!
//! ```mermaid
//! graph LR
//!     A["Grid (time, lat, lon, ...)"] -->|"land_check()"| B["StackedCells (time, cell)"]
//!     B -->|"per-cell work"| C["Vec of results"]
//!     C -->|"CellLayout::unstack()"| D["Gridded of results"]
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `grid` | `Grid`, `Dim` and `Coords` |
//! | `stack` | Land filtering, `StackedCells`, `CellLayout`, `Gridded` |
//! | `interpolate` | Linear filling of short missing-value runs |
//! | `error` | Error types |

mod error;
mod grid;
mod interpolate;
mod stack;

pub use error::GridError;
pub use grid::{Coords, Dim, Grid};
pub use interpolate::interpolate_na;
pub use stack::{CellLayout, Gridded, StackedCells, land_check};
