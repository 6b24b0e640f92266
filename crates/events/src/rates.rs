//! Rates of onset and decline.
//!
//! Event strength at the start and end is taken half a time step before the
//! first and after the last day, as the mean of the edge anomaly and its
//! outside neighbour. Events touching the series boundary fall back to the
//! edge value itself and a whole-step denominator (at least one step).

use crate::runs::Run;

/// Anomaly change per time step from event start to peak.
///
/// `rel_seas` is the full-series anomaly relative to the seasonal mean and
/// `peak` the peak offset from the event start.
pub fn rate_onset(rel_seas: &[f64], run: Run, peak: usize) -> f64 {
    let first = rel_seas[run.start];
    let at_peak = rel_seas[run.start + peak];
    if run.start > 0 {
        let start_value = 0.5 * (first + rel_seas[run.start - 1]);
        (at_peak - start_value) / (peak as f64 + 0.5)
    } else {
        (at_peak - first) / peak.max(1) as f64
    }
}

/// Anomaly change per time step from peak to event end.
pub fn rate_decline(rel_seas: &[f64], run: Run, peak: usize) -> f64 {
    let last = rel_seas[run.end];
    let at_peak = rel_seas[run.start + peak];
    let after_peak = run.end - run.start - peak;
    if run.end + 1 < rel_seas.len() {
        let end_value = 0.5 * (last + rel_seas[run.end + 1]);
        (at_peak - end_value) / (after_peak as f64 + 0.5)
    } else {
        (at_peak - last) / after_peak.max(1) as f64
    }
}
