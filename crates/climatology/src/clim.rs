//! Seasonal mean and percentile threshold per day-of-year.

use mhw_calendar::{Doy, DoyMode, FEB29};
use mhw_stats::{mean_skipna, percentile};
use tracing::trace;

use crate::config::ClimConfig;
use crate::error::ClimatologyError;
use crate::window::pool_by_doy;

/// Day-of-year climatology of one cell.
///
/// Both series have one entry per day-of-year slot: 366 on the calendar
/// axis, or the year length in time-step mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Climatology {
    thresh: Vec<f64>,
    seas: Vec<f64>,
}

impl Climatology {
    /// Creates a climatology from precomputed series.
    ///
    /// # Errors
    ///
    /// Returns [`ClimatologyError::LengthMismatch`] if the lengths differ.
    pub fn new(thresh: Vec<f64>, seas: Vec<f64>) -> Result<Self, ClimatologyError> {
        if thresh.len() != seas.len() {
            return Err(ClimatologyError::LengthMismatch {
                series: thresh.len(),
                doy: seas.len(),
            });
        }
        Ok(Self { thresh, seas })
    }

    /// Percentile threshold per slot.
    pub fn thresh(&self) -> &[f64] {
        &self.thresh
    }

    /// Seasonal mean per slot.
    pub fn seas(&self) -> &[f64] {
        &self.seas
    }

    /// Number of day-of-year slots.
    pub fn n_slots(&self) -> usize {
        self.thresh.len()
    }

    /// `(thresh, seas)` at a day-of-year.
    pub fn at(&self, doy: Doy) -> (f64, f64) {
        let i = doy.index();
        (self.thresh[i], self.seas[i])
    }

    /// Whether every slot of both series is missing.
    pub fn is_all_nan(&self) -> bool {
        self.thresh.iter().chain(&self.seas).all(|v| v.is_nan())
    }

    /// Sign-flipped copy, used for cold-spell detection.
    pub fn negated(&self) -> Self {
        Self {
            thresh: self.thresh.iter().map(|v| -v).collect(),
            seas: self.seas.iter().map(|v| -v).collect(),
        }
    }
}

/// Mean of each pooled sample.
pub fn calculate_seas(pools: &[Vec<f64>], skipna: bool) -> Vec<f64> {
    pools.iter().map(|p| mean_skipna(p, skipna)).collect()
}

/// Percentile of each pooled sample, linear interpolation between order
/// statistics.
pub fn calculate_thresh(pools: &[Vec<f64>], pctile: f64, skipna: bool) -> Vec<f64> {
    pools.iter().map(|p| percentile(p, pctile, skipna)).collect()
}

/// Sets the February 29th slot to the mean of its neighbours (slots 59 and 61).
///
/// Does nothing on axes shorter than 61 slots.
pub fn feb29(clim: &mut [f64]) {
    let i = usize::from(FEB29) - 1;
    if clim.len() > i + 1 {
        clim[i] = 0.5 * (clim[i - 1] + clim[i + 1]);
    }
}

/// Centered moving average of odd `width`, treating `series` as periodic.
///
/// Equivalent to wrap-padding `(width - 1) / 2` values at each end, taking
/// a rolling mean and dropping the padding. A window containing NaN
/// averages to NaN.
pub fn runavg(series: &[f64], width: usize) -> Vec<f64> {
    let n = series.len();
    if n == 0 || width <= 1 {
        return series.to_vec();
    }
    let half = (width - 1) / 2;
    (0..n)
        .map(|i| {
            let sum: f64 = (0..width)
                .map(|j| series[(i + n * width + j - half) % n])
                .sum();
            sum / width as f64
        })
        .collect()
}

/// Computes the climatology of one cell.
///
/// `series` and `doy` are aligned over the climatology period. Samples are
/// pooled over a `±window_half_width` window around each day, reduced to
/// mean and percentile, the February 29th slot is interpolated on the
/// calendar axis, and both series are optionally smoothed.
///
/// # Errors
///
/// Returns [`ClimatologyError`] if the configuration is invalid, the inputs
/// are misaligned, or a day-of-year exceeds the axis of `mode`.
pub fn calc_clim(
    series: &[f64],
    doy: &[Doy],
    mode: DoyMode,
    config: &ClimConfig,
) -> Result<Climatology, ClimatologyError> {
    config.validate()?;
    if series.len() != doy.len() {
        return Err(ClimatologyError::LengthMismatch {
            series: series.len(),
            doy: doy.len(),
        });
    }
    let n_slots = mode.n_slots();
    if let Some(bad) = doy.iter().find(|d| d.index() >= n_slots) {
        return Err(ClimatologyError::DoyOutOfRange {
            doy: bad.get(),
            n_slots,
        });
    }

    let pools = pool_by_doy(series, doy, config.window_half_width(), n_slots);
    trace!(n_slots, n_values = series.len(), "pooled day-of-year samples");
    let mut thresh = calculate_thresh(&pools, config.pctile(), config.skipna());
    let mut seas = calculate_seas(&pools, config.skipna());

    if mode.has_feb29() {
        feb29(&mut thresh);
        feb29(&mut seas);
    }

    if config.smooth() {
        thresh = runavg(&thresh, config.smooth_width());
        seas = runavg(&seas, config.smooth_width());
    }

    Ok(Climatology { thresh, seas })
}
