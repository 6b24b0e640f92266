//! Configuration for gridded threshold and detection runs.

use mhw_climatology::ClimConfig;
use mhw_events::EventConfig;

use crate::error::MhwError;

/// Default name of the time dimension.
pub const DEFAULT_TDIM: &str = "time";

// ---------------------------------------------------------------------------
// ThresholdConfig
// ---------------------------------------------------------------------------

/// Parameters of [`threshold`](crate::threshold).
///
/// # Example
///
/// ```
/// use mhw_pipeline::ThresholdConfig;
///
/// let config = ThresholdConfig::new()
///     .with_climatology_period(1983, 2012)
///     .with_pctile(95.0)
///     .with_max_pad_length(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdConfig {
    tdim: String,
    climatology_period: Option<(i32, i32)>,
    clim: ClimConfig,
    max_pad_length: Option<usize>,
    cold_spells: bool,
    tstep: bool,
    anynans: bool,
}

impl ThresholdConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `tdim = "time"`, whole series as climatology period, 90th
    /// percentile, 5-day window half width, smoothing over 31 days, no
    /// interpolation, warm events, calendar day-of-year, only all-NaN cells
    /// dropped, NaN propagated.
    pub fn new() -> Self {
        Self {
            tdim: DEFAULT_TDIM.to_string(),
            climatology_period: None,
            clim: ClimConfig::new(),
            max_pad_length: None,
            cold_spells: false,
            tstep: false,
            anynans: false,
        }
    }

    /// Sets the name of the time dimension.
    pub fn with_tdim(mut self, tdim: impl Into<String>) -> Self {
        self.tdim = tdim.into();
        self
    }

    /// Restricts the climatology to the inclusive year range.
    pub fn with_climatology_period(mut self, first: i32, last: i32) -> Self {
        self.climatology_period = Some((first, last));
        self
    }

    /// Replaces the per-cell climatology parameters.
    pub fn with_clim(mut self, clim: ClimConfig) -> Self {
        self.clim = clim;
        self
    }

    /// Sets the threshold percentile.
    pub fn with_pctile(mut self, pctile: f64) -> Self {
        self.clim = self.clim.with_pctile(pctile);
        self
    }

    /// Sets the window half width in days.
    pub fn with_window_half_width(mut self, w: usize) -> Self {
        self.clim = self.clim.with_window_half_width(w);
        self
    }

    /// Enables or disables smoothing.
    pub fn with_smooth_percentile(mut self, smooth: bool) -> Self {
        self.clim = self.clim.with_smooth(smooth);
        self
    }

    /// Sets the smoothing window width.
    pub fn with_smooth_percentile_width(mut self, width: usize) -> Self {
        self.clim = self.clim.with_smooth_width(width);
        self
    }

    /// Sets whether NaN is ignored in the mean and percentile.
    pub fn with_skipna(mut self, skipna: bool) -> Self {
        self.clim = self.clim.with_skipna(skipna);
        self
    }

    /// Interpolates runs of at most `days` missing values before computing.
    pub fn with_max_pad_length(mut self, days: usize) -> Self {
        self.max_pad_length = Some(days);
        self
    }

    /// Computes the climatology for cold spells.
    pub fn with_cold_spells(mut self, cold: bool) -> Self {
        self.cold_spells = cold;
        self
    }

    /// Uses the time-step day-of-year mode.
    pub fn with_tstep(mut self, tstep: bool) -> Self {
        self.tstep = tstep;
        self
    }

    /// Drops cells with any missing value instead of only all-missing cells.
    pub fn with_anynans(mut self, anynans: bool) -> Self {
        self.anynans = anynans;
        self
    }

    // --- Accessors ---

    /// Returns the time dimension name.
    pub fn tdim(&self) -> &str {
        &self.tdim
    }

    /// Returns the climatology period, if restricted.
    pub fn climatology_period(&self) -> Option<(i32, i32)> {
        self.climatology_period
    }

    /// Returns the per-cell climatology parameters.
    pub fn clim(&self) -> &ClimConfig {
        &self.clim
    }

    /// Returns the interpolation limit.
    pub fn max_pad_length(&self) -> Option<usize> {
        self.max_pad_length
    }

    /// Returns whether cold spells are targeted.
    pub fn cold_spells(&self) -> bool {
        self.cold_spells
    }

    /// Returns whether time-step mode is requested.
    pub fn tstep(&self) -> bool {
        self.tstep
    }

    /// Returns whether cells with any NaN are dropped.
    pub fn anynans(&self) -> bool {
        self.anynans
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), MhwError> {
        self.clim.validate()?;
        if let Some((first, last)) = self.climatology_period
            && first > last
        {
            return Err(MhwError::InvalidClimatologyPeriod { first, last });
        }
        Ok(())
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// DetectConfig
// ---------------------------------------------------------------------------

/// Parameters of [`detect`](crate::detect).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetectConfig {
    tdim: String,
    events: EventConfig,
    max_pad_length: Option<usize>,
    cold_spells: bool,
    intermediate: bool,
    anynans: bool,
    tstep: bool,
}

impl DetectConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `tdim = "time"`, 5-day minimum duration, gaps of up to
    /// 2 days joined, no interpolation, warm events, no intermediate
    /// output, only all-NaN cells dropped, calendar day-of-year.
    pub fn new() -> Self {
        Self {
            tdim: DEFAULT_TDIM.to_string(),
            events: EventConfig::new(),
            max_pad_length: None,
            cold_spells: false,
            intermediate: false,
            anynans: false,
            tstep: false,
        }
    }

    /// Sets the name of the time dimension.
    pub fn with_tdim(mut self, tdim: impl Into<String>) -> Self {
        self.tdim = tdim.into();
        self
    }

    /// Replaces the run detection parameters.
    pub fn with_events(mut self, events: EventConfig) -> Self {
        self.events = events;
        self
    }

    /// Sets the minimum event duration.
    pub fn with_min_duration(mut self, days: usize) -> Self {
        self.events = self.events.with_min_duration(days);
        self
    }

    /// Enables or disables gap joining.
    pub fn with_join_gaps(mut self, join: bool) -> Self {
        self.events = self.events.with_join_gaps(join);
        self
    }

    /// Sets the longest joinable gap.
    pub fn with_max_gap(mut self, days: usize) -> Self {
        self.events = self.events.with_max_gap(days);
        self
    }

    /// Interpolates runs of at most `days` missing values before detecting.
    pub fn with_max_pad_length(mut self, days: usize) -> Self {
        self.max_pad_length = Some(days);
        self
    }

    /// Detects cold spells instead of heat waves.
    pub fn with_cold_spells(mut self, cold: bool) -> Self {
        self.cold_spells = cold;
        self
    }

    /// Also returns per-time-step diagnostics.
    pub fn with_intermediate(mut self, intermediate: bool) -> Self {
        self.intermediate = intermediate;
        self
    }

    /// Drops cells with any missing value instead of only all-missing cells.
    pub fn with_anynans(mut self, anynans: bool) -> Self {
        self.anynans = anynans;
        self
    }

    /// Uses the time-step day-of-year mode.
    pub fn with_tstep(mut self, tstep: bool) -> Self {
        self.tstep = tstep;
        self
    }

    // --- Accessors ---

    /// Returns the time dimension name.
    pub fn tdim(&self) -> &str {
        &self.tdim
    }

    /// Returns the run detection parameters.
    pub fn events(&self) -> &EventConfig {
        &self.events
    }

    /// Returns the interpolation limit.
    pub fn max_pad_length(&self) -> Option<usize> {
        self.max_pad_length
    }

    /// Returns whether cold spells are detected.
    pub fn cold_spells(&self) -> bool {
        self.cold_spells
    }

    /// Returns whether intermediate output is requested.
    pub fn intermediate(&self) -> bool {
        self.intermediate
    }

    /// Returns whether cells with any NaN are dropped.
    pub fn anynans(&self) -> bool {
        self.anynans
    }

    /// Returns whether time-step mode is requested.
    pub fn tstep(&self) -> bool {
        self.tstep
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), MhwError> {
        self.events.validate()?;
        Ok(())
    }
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self::new()
    }
}
