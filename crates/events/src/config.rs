//! Configuration for event detection.

use crate::error::EventsError;

/// Run detection parameters.
///
/// # Example
///
/// ```
/// use mhw_events::EventConfig;
///
/// let config = EventConfig::new().with_min_duration(7).with_max_gap(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventConfig {
    min_duration: usize,
    join_gaps: bool,
    max_gap: usize,
}

impl EventConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `min_duration = 5`, `join_gaps = true`, `max_gap = 2`.
    pub fn new() -> Self {
        Self {
            min_duration: 5,
            join_gaps: true,
            max_gap: 2,
        }
    }

    /// Sets the minimum event duration in time steps.
    pub fn with_min_duration(mut self, days: usize) -> Self {
        self.min_duration = days;
        self
    }

    /// Enables or disables joining events across short gaps.
    pub fn with_join_gaps(mut self, join: bool) -> Self {
        self.join_gaps = join;
        self
    }

    /// Sets the longest gap (in time steps) that is joined.
    pub fn with_max_gap(mut self, days: usize) -> Self {
        self.max_gap = days;
        self
    }

    // --- Accessors ---

    /// Returns the minimum event duration.
    pub fn min_duration(&self) -> usize {
        self.min_duration
    }

    /// Returns whether gaps are joined.
    pub fn join_gaps(&self) -> bool {
        self.join_gaps
    }

    /// Returns the longest joinable gap.
    pub fn max_gap(&self) -> usize {
        self.max_gap
    }

    /// Validates this configuration.
    ///
    /// `max_gap` must be strictly smaller than `min_duration`, whether or not
    /// gap joining is enabled.
    pub fn validate(&self) -> Result<(), EventsError> {
        if self.min_duration == 0 {
            return Err(EventsError::ZeroMinDuration);
        }
        if self.max_gap >= self.min_duration {
            return Err(EventsError::InvalidMaxGap {
                max_gap: self.max_gap,
                min_duration: self.min_duration,
            });
        }
        Ok(())
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self::new()
    }
}
