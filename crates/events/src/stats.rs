//! Anomaly frames and per-event intensity reductions.

use mhw_stats::{nanargmax, nanmax, nanmean, nanstd, nansum};

/// Temperature anomalies over the full series.
#[derive(Debug, Clone, PartialEq)]
pub struct Anomalies {
    /// Temperature minus seasonal climatology.
    pub rel_seas: Vec<f64>,
    /// Temperature minus threshold.
    pub rel_thresh: Vec<f64>,
    /// `(T - thresh) / (thresh - seas)`.
    pub rel_thresh_norm: Vec<f64>,
}

impl Anomalies {
    /// Computes all frames from aligned temperature and climatology series.
    pub fn new(temp: &[f64], thresh: &[f64], seas: &[f64]) -> Self {
        let n = temp.len();
        let mut out = Self {
            rel_seas: Vec::with_capacity(n),
            rel_thresh: Vec::with_capacity(n),
            rel_thresh_norm: Vec::with_capacity(n),
        };
        for ((&t, &th), &se) in temp.iter().zip(thresh).zip(seas) {
            out.rel_seas.push(t - se);
            out.rel_thresh.push(t - th);
            out.rel_thresh_norm.push((t - th) / (th - se));
        }
        out
    }
}

/// Max, mean, standard deviation and sum of one frame over an event.
///
/// Missing values (only possible on joined gap days) are skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intensity {
    /// Largest value.
    pub max: f64,
    /// Mean value.
    pub mean: f64,
    /// Square root of the population variance.
    pub var: f64,
    /// Sum of values.
    pub cumulative: f64,
}

impl Intensity {
    /// Reduces the values of one event.
    pub fn of(values: &[f64]) -> Self {
        Self {
            max: nanmax(values),
            mean: nanmean(values),
            var: nanstd(values),
            cumulative: nansum(values),
        }
    }
}

/// Offset from the event start of the largest seasonal anomaly.
///
/// The first maximum wins; an event whose anomalies are all missing peaks
/// on its first day.
pub fn index_peak(rel_seas: &[f64]) -> usize {
    nanargmax(rel_seas).unwrap_or(0)
}
