//! Error types for the mhw-events crate.

/// Error type for all fallible operations in the mhw-events crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EventsError {
    /// Returned when the maximum joinable gap is not smaller than the minimum duration.
    #[error(
        "maximum gap between mhw events should be smaller than event minimum duration \
         (max_gap={max_gap}, min_duration={min_duration})"
    )]
    InvalidMaxGap {
        /// Requested maximum gap.
        max_gap: usize,
        /// Requested minimum duration.
        min_duration: usize,
    },

    /// Returned when the minimum duration is zero.
    #[error("minimum duration must be at least 1 day")]
    ZeroMinDuration,

    /// Returned when aligned inputs differ in length.
    #[error("length mismatch for {what}: expected {expected}, got {got}")]
    LengthMismatch {
        /// Name of the misaligned input.
        what: &'static str,
        /// Length of the temperature series.
        expected: usize,
        /// Length of the offending input.
        got: usize,
    },
}
