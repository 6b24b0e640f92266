//! Error types for the mhw-climatology crate.

/// Error type for all fallible operations in the mhw-climatology crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClimatologyError {
    /// Returned when the smoothing window width is even.
    #[error("smoothPercentileWidth should be odd, got {width}")]
    EvenSmoothingWidth {
        /// The rejected width.
        width: usize,
    },

    /// Returned when the percentile is outside (0, 100).
    #[error("percentile must be in (0, 100), got {pctile}")]
    InvalidPercentile {
        /// The rejected percentile.
        pctile: f64,
    },

    /// Returned when the series and its day-of-year annotation differ in length.
    #[error("length mismatch: series has {series} values, doy has {doy}")]
    LengthMismatch {
        /// Length of the value series.
        series: usize,
        /// Length of the day-of-year annotation.
        doy: usize,
    },

    /// Returned when a day-of-year does not fit the climatology axis.
    #[error("day of year {doy} outside climatology axis of {n_slots} slots")]
    DoyOutOfRange {
        /// Offending day of year.
        doy: u16,
        /// Number of slots on the axis.
        n_slots: usize,
    },
}
