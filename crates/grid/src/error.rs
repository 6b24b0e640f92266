//! Error types for the mhw-grid crate.

/// Error type for all fallible operations in the mhw-grid crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// Returned when the requested time dimension is not one of the grid's dimensions.
    #[error("{name} dimension not present (available: {available})")]
    MissingTimeDimension {
        /// Requested dimension name.
        name: String,
        /// Comma-separated list of the grid's dimension names.
        available: String,
    },

    /// Returned when the time dimension carries numeric instead of date coordinates.
    #[error("dimension '{name}' has no date coordinates")]
    NotATimeDimension {
        /// Name of the offending dimension.
        name: String,
    },

    /// Returned when a spatial dimension carries date coordinates.
    #[error("spatial dimension '{name}' must have numeric coordinates")]
    NonNumericCoords {
        /// Name of the offending dimension.
        name: String,
    },

    /// Returned when two dimensions share a name.
    #[error("duplicate dimension name: {name}")]
    DuplicateDimension {
        /// The repeated name.
        name: String,
    },

    /// Returned when the values array shape disagrees with the coordinate lengths.
    #[error("shape mismatch: coordinates imply {expected:?}, values have {got:?}")]
    ShapeMismatch {
        /// Shape implied by the dimension coordinates.
        expected: Vec<usize>,
        /// Shape of the values array.
        got: Vec<usize>,
    },

    /// Returned when every cell is land or missing after filtering.
    #[error("all points of grid are either land or NaN")]
    AllLand,

    /// Returned when a year range selects no time steps.
    #[error("no time steps between {first} and {last}")]
    EmptyTimeRange {
        /// First year of the requested range.
        first: i32,
        /// Last year of the requested range.
        last: i32,
    },

    /// Returned when per-cell results do not line up with the cell layout.
    #[error("expected {expected} cell results, got {got}")]
    CellCountMismatch {
        /// Number of valid cells in the layout.
        expected: usize,
        /// Number of results supplied.
        got: usize,
    },
}
