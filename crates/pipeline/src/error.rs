//! Error types for the mhw-pipeline crate.

use mhw_climatology::ClimatologyError;
use mhw_events::EventsError;
use mhw_grid::GridError;

/// Error type for gridded threshold and detection runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MhwError {
    /// Grid selection, filtering or reassembly failed.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Climatology configuration or computation failed.
    #[error(transparent)]
    Climatology(#[from] ClimatologyError),

    /// Event detection configuration or computation failed.
    #[error(transparent)]
    Events(#[from] EventsError),

    /// Returned when the climatology period is reversed.
    #[error("invalid climatology period {first}-{last}: first year is after last year")]
    InvalidClimatologyPeriod {
        /// First year of the period.
        first: i32,
        /// Last year of the period.
        last: i32,
    },

    /// Returned when the climatology axis does not match the day-of-year mode
    /// of the temperature time axis.
    #[error(
        "climatology has {got} day-of-year entries but the temperature time axis needs {expected}"
    )]
    ClimatologyLengthMismatch {
        /// Slots required by the temperature time axis.
        expected: usize,
        /// Slots present in the climatology.
        got: usize,
    },

    /// Returned when the climatology and temperature spatial grids differ.
    #[error("climatology spatial shape {got:?} does not match temperature spatial shape {expected:?}")]
    SpatialMismatch {
        /// Spatial shape of the temperature grid.
        expected: Vec<usize>,
        /// Spatial shape of the climatology grid.
        got: Vec<usize>,
    },

    /// Returned when a cell selected for detection has no climatology.
    #[error("no climatology for cell {cell}")]
    MissingClimatology {
        /// Flat spatial index of the cell.
        cell: usize,
    },
}
