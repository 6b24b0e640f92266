//! Detected event record.

use mhw_calendar::Date;

use crate::category::{Category, category_durations, event_category};
use crate::rates::{rate_decline, rate_onset};
use crate::runs::Run;
use crate::stats::{Anomalies, Intensity, index_peak};

/// Properties of one marine heat wave (or cold spell) in one cell.
///
/// Indices refer to positions on the detection time axis. Unsuffixed
/// intensities are relative to the seasonal climatology, `_rel_thresh`
/// relative to the threshold and `_abs` absolute temperatures.
#[derive(Debug, Clone, PartialEq)]
pub struct MhwEvent {
    /// Event id (equal to `start`).
    pub event: usize,
    /// Index of the first day.
    pub start: usize,
    /// Index of the last day.
    pub end: usize,
    /// Number of days, `end - start + 1`.
    pub duration: usize,
    /// Date of the first day.
    pub date_start: Date,
    /// Date of the peak.
    pub date_peak: Date,
    /// Date of the last day.
    pub date_end: Date,
    /// Peak offset from `start`.
    pub index_peak: usize,
    pub intensity_max: f64,
    pub intensity_mean: f64,
    pub intensity_var: f64,
    pub intensity_cumulative: f64,
    /// Threshold anomaly at the peak.
    pub intensity_max_rel_thresh: f64,
    pub intensity_mean_rel_thresh: f64,
    pub intensity_var_rel_thresh: f64,
    pub intensity_cumulative_rel_thresh: f64,
    /// Temperature at the peak.
    pub intensity_max_abs: f64,
    pub intensity_mean_abs: f64,
    pub intensity_var_abs: f64,
    pub intensity_cumulative_abs: f64,
    pub category: Category,
    pub duration_moderate: usize,
    pub duration_strong: usize,
    pub duration_severe: usize,
    pub duration_extreme: usize,
    pub rate_onset: f64,
    pub rate_decline: f64,
}

impl MhwEvent {
    /// Computes the statistics of `run`.
    ///
    /// `temp`, `anomalies` and `times` span the full detection axis and
    /// `cats` holds the per-step category values over the same axis.
    pub(crate) fn from_run(
        run: Run,
        temp: &[f64],
        anomalies: &Anomalies,
        cats: &[f64],
        times: &[Date],
    ) -> Self {
        let span = run.start..=run.end;
        let rel_seas = &anomalies.rel_seas[span.clone()];
        let rel_thresh = &anomalies.rel_thresh[span.clone()];
        let abs = &temp[span.clone()];
        let peak = index_peak(rel_seas);

        let seas_i = Intensity::of(rel_seas);
        let thresh_i = Intensity::of(rel_thresh);
        let abs_i = Intensity::of(abs);

        let event_cats = &cats[span];
        let [moderate, strong, severe, extreme] = category_durations(event_cats);

        Self {
            event: run.id(),
            start: run.start,
            end: run.end,
            duration: run.duration(),
            date_start: times[run.start],
            date_peak: times[run.start + peak],
            date_end: times[run.end],
            index_peak: peak,
            intensity_max: seas_i.max,
            intensity_mean: seas_i.mean,
            intensity_var: seas_i.var,
            intensity_cumulative: seas_i.cumulative,
            intensity_max_rel_thresh: rel_thresh[peak],
            intensity_mean_rel_thresh: thresh_i.mean,
            intensity_var_rel_thresh: thresh_i.var,
            intensity_cumulative_rel_thresh: thresh_i.cumulative,
            intensity_max_abs: abs[peak],
            intensity_mean_abs: abs_i.mean,
            intensity_var_abs: abs_i.var,
            intensity_cumulative_abs: abs_i.cumulative,
            category: event_category(event_cats),
            duration_moderate: moderate,
            duration_strong: strong,
            duration_severe: severe,
            duration_extreme: extreme,
            rate_onset: rate_onset(&anomalies.rel_seas, run, peak),
            rate_decline: rate_decline(&anomalies.rel_seas, run, peak),
        }
    }

    /// Absolute index of the peak on the time axis.
    pub fn peak(&self) -> usize {
        self.start + self.index_peak
    }

    /// Per-category durations, Moderate first.
    pub fn category_durations(&self) -> [usize; 4] {
        [
            self.duration_moderate,
            self.duration_strong,
            self.duration_severe,
            self.duration_extreme,
        ]
    }

    /// Restores original-sign intensities after detection on a negated
    /// series. Spreads (`_var`) are sign-invariant and left alone.
    pub fn flip_cold(&mut self) {
        for v in [
            &mut self.intensity_max,
            &mut self.intensity_mean,
            &mut self.intensity_cumulative,
            &mut self.intensity_max_rel_thresh,
            &mut self.intensity_mean_rel_thresh,
            &mut self.intensity_cumulative_rel_thresh,
            &mut self.intensity_max_abs,
            &mut self.intensity_mean_abs,
            &mut self.intensity_cumulative_abs,
            &mut self.rate_onset,
            &mut self.rate_decline,
        ] {
            *v = -*v;
        }
    }
}
