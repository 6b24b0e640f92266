//! Configuration for climatology computation.

use crate::error::ClimatologyError;

/// Parameters of the seasonal climatology and percentile threshold.
///
/// # Example
///
/// ```
/// use mhw_climatology::ClimConfig;
///
/// let config = ClimConfig::new()
///     .with_pctile(95.0)
///     .with_smooth_width(11);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ClimConfig {
    pctile: f64,
    window_half_width: usize,
    smooth: bool,
    smooth_width: usize,
    skipna: bool,
}

impl ClimConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `pctile = 90`, `window_half_width = 5`, `smooth = true`,
    /// `smooth_width = 31`, `skipna = false`.
    pub fn new() -> Self {
        Self {
            pctile: 90.0,
            window_half_width: 5,
            smooth: true,
            smooth_width: 31,
            skipna: false,
        }
    }

    /// Sets the threshold percentile (0..100).
    pub fn with_pctile(mut self, pctile: f64) -> Self {
        self.pctile = pctile;
        self
    }

    /// Sets the half width of the day-of-year pooling window.
    pub fn with_window_half_width(mut self, w: usize) -> Self {
        self.window_half_width = w;
        self
    }

    /// Enables or disables circular smoothing of both climatologies.
    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    /// Sets the width of the smoothing window (must be odd).
    pub fn with_smooth_width(mut self, width: usize) -> Self {
        self.smooth_width = width;
        self
    }

    /// Ignore missing values in the mean and percentile.
    pub fn with_skipna(mut self, skipna: bool) -> Self {
        self.skipna = skipna;
        self
    }

    // --- Accessors ---

    /// Returns the threshold percentile.
    pub fn pctile(&self) -> f64 {
        self.pctile
    }

    /// Returns the pooling window half width.
    pub fn window_half_width(&self) -> usize {
        self.window_half_width
    }

    /// Returns whether smoothing is applied.
    pub fn smooth(&self) -> bool {
        self.smooth
    }

    /// Returns the smoothing window width.
    pub fn smooth_width(&self) -> usize {
        self.smooth_width
    }

    /// Returns whether missing values are skipped.
    pub fn skipna(&self) -> bool {
        self.skipna
    }

    /// Validates this configuration.
    ///
    /// The smoothing width must be odd (checked even when smoothing is
    /// disabled) and the percentile must lie strictly between 0 and 100.
    pub fn validate(&self) -> Result<(), ClimatologyError> {
        if self.smooth_width % 2 == 0 {
            return Err(ClimatologyError::EvenSmoothingWidth {
                width: self.smooth_width,
            });
        }
        if !self.pctile.is_finite() || self.pctile <= 0.0 || self.pctile >= 100.0 {
            return Err(ClimatologyError::InvalidPercentile {
                pctile: self.pctile,
            });
        }
        Ok(())
    }
}

impl Default for ClimConfig {
    fn default() -> Self {
        Self::new()
    }
}
