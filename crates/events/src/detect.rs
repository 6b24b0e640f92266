//! Event detection for a single cell.

use mhw_calendar::Date;
use tracing::trace;

use crate::category::step_categories;
use crate::config::EventConfig;
use crate::error::EventsError;
use crate::event::MhwEvent;
use crate::join::join_gaps;
use crate::runs::{EventLabels, Run, exceedance, find_runs};
use crate::stats::Anomalies;

/// Per-time-step diagnostics of one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Intermediate {
    /// Temperature as used for detection.
    pub ts: Vec<f64>,
    /// Seasonal climatology aligned to the time axis.
    pub seas: Vec<f64>,
    /// Threshold aligned to the time axis.
    pub thresh: Vec<f64>,
    /// Whether the temperature reached the threshold.
    pub exceed: Vec<bool>,
    /// Event start/end/id labels after joining.
    pub labels: EventLabels,
    /// Anomaly frames, missing outside events.
    pub rel_seas: Vec<f64>,
    pub rel_thresh: Vec<f64>,
    pub rel_thresh_norm: Vec<f64>,
    /// Per-step category value, missing outside events.
    pub cats: Vec<f64>,
}

impl Intermediate {
    /// Restores original-sign series after detection on a negated input.
    ///
    /// The normalised anomaly and categories are ratios of negated values
    /// and keep their sign.
    pub fn flip_cold(&mut self) {
        for frame in [
            &mut self.ts,
            &mut self.seas,
            &mut self.thresh,
            &mut self.rel_seas,
            &mut self.rel_thresh,
        ] {
            frame.iter_mut().for_each(|v| *v = -*v);
        }
    }
}

/// Detection result of one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellEvents {
    /// Events ordered by start.
    pub events: Vec<MhwEvent>,
    /// Per-step diagnostics, when requested.
    pub intermediate: Option<Intermediate>,
}

/// Detects events in one cell.
///
/// `thresh` and `seas` are the climatology already looked up for each time
/// step's day-of-year. Runs of `temp >= thresh` shorter than the minimum
/// duration are discarded, the remaining runs are optionally joined across
/// short gaps, and statistics are computed for each resulting event.
///
/// # Errors
///
/// Returns [`EventsError`] if the configuration is invalid or the inputs
/// are not aligned.
pub fn define_events(
    temp: &[f64],
    thresh: &[f64],
    seas: &[f64],
    times: &[Date],
    config: &EventConfig,
    intermediate: bool,
) -> Result<CellEvents, EventsError> {
    config.validate()?;
    let n = temp.len();
    for (what, len) in [("thresh", thresh.len()), ("seas", seas.len()), ("times", times.len())] {
        if len != n {
            return Err(EventsError::LengthMismatch {
                what,
                expected: n,
                got: len,
            });
        }
    }

    let exceed = exceedance(temp, thresh);
    let runs = detect_runs(&exceed, config);
    trace!(n_events = runs.len(), "cell runs");

    let anomalies = Anomalies::new(temp, thresh, seas);
    let cats = step_categories(&anomalies.rel_thresh_norm);
    let events = runs
        .iter()
        .map(|&run| MhwEvent::from_run(run, temp, &anomalies, &cats, times))
        .collect();

    let intermediate = intermediate.then(|| {
        let labels = EventLabels::from_runs(n, &runs);
        let inside = |v: &[f64]| -> Vec<f64> {
            v.iter()
                .zip(&labels.event)
                .map(|(&x, e)| if e.is_some() { x } else { f64::NAN })
                .collect()
        };
        Intermediate {
            rel_seas: inside(&anomalies.rel_seas),
            rel_thresh: inside(&anomalies.rel_thresh),
            rel_thresh_norm: inside(&anomalies.rel_thresh_norm),
            cats: inside(&cats),
            ts: temp.to_vec(),
            seas: seas.to_vec(),
            thresh: thresh.to_vec(),
            exceed,
            labels,
        }
    });

    Ok(CellEvents {
        events,
        intermediate,
    })
}

/// Runs of at least the minimum duration, joined across gaps if configured.
pub fn detect_runs(exceed: &[bool], config: &EventConfig) -> Vec<Run> {
    let runs = find_runs(exceed, config.min_duration());
    if config.join_gaps() {
        join_gaps(&runs, config.max_gap())
    } else {
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mhw_calendar::date_sequence;

    use crate::category::Category;

    fn times(n: usize) -> Vec<Date> {
        date_sequence(Date::ymd(2001, 1, 1).unwrap(), n)
    }

    #[test]
    fn single_event_statistics() {
        // seas = 20, thresh = 21 everywhere
        let temp = [20.0, 20.5, 21.5, 22.0, 23.5, 22.5, 21.0, 20.0];
        let n = temp.len();
        let cfg = EventConfig::new().with_min_duration(5).with_max_gap(1);
        let out = define_events(&temp, &[21.0; 8], &[20.0; 8], &times(n), &cfg, false).unwrap();
        assert_eq!(out.events.len(), 1);
        let ev = &out.events[0];
        assert_eq!((ev.start, ev.end, ev.duration, ev.event), (2, 6, 5, 2));
        assert_eq!(ev.index_peak, 2);
        assert_eq!(ev.peak(), 4);
        assert_eq!(ev.date_peak, Date::ymd(2001, 1, 5).unwrap());
        assert_relative_eq!(ev.intensity_max, 3.5, epsilon = 1e-12);
        assert_relative_eq!(ev.intensity_mean, 2.1, epsilon = 1e-12);
        assert_relative_eq!(ev.intensity_cumulative, 10.5, epsilon = 1e-12);
        assert_relative_eq!(ev.intensity_max_rel_thresh, 2.5, epsilon = 1e-12);
        assert_relative_eq!(ev.intensity_max_abs, 23.5, epsilon = 1e-12);
        assert_relative_eq!(ev.intensity_mean_abs, 22.1, epsilon = 1e-12);
        // cats: floor(1 + [0.5, 1.0, 2.5, 1.5, 0.0]) = [1, 2, 3, 2, 1]
        assert_eq!(ev.category, Category::Severe);
        assert_eq!(ev.category_durations(), [2, 2, 1, 0]);
        assert!(out.intermediate.is_none());
    }

    #[test]
    fn rejects_misaligned_climatology() {
        let err = define_events(
            &[1.0; 4],
            &[1.0; 3],
            &[0.0; 4],
            &times(4),
            &EventConfig::new(),
            false,
        )
        .unwrap_err();
        assert_eq!(
            err,
            EventsError::LengthMismatch {
                what: "thresh",
                expected: 4,
                got: 3
            }
        );
    }

    #[test]
    fn invalid_config_rejected_first() {
        let cfg = EventConfig::new().with_max_gap(5);
        let err = define_events(&[], &[], &[], &[], &cfg, false).unwrap_err();
        assert!(matches!(err, EventsError::InvalidMaxGap { .. }));
    }

    #[test]
    fn no_events_is_empty_not_error() {
        let out = define_events(
            &[0.0; 10],
            &[1.0; 10],
            &[0.5; 10],
            &times(10),
            &EventConfig::new(),
            true,
        )
        .unwrap();
        assert!(out.events.is_empty());
        let inter = out.intermediate.unwrap();
        assert!(inter.labels.event.iter().all(Option::is_none));
        assert!(inter.rel_seas.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn intermediate_masks_outside_events() {
        let temp = [0.0, 2.0, 2.0, 2.0, 0.0];
        let cfg = EventConfig::new().with_min_duration(3).with_max_gap(0);
        let out = define_events(&temp, &[1.0; 5], &[0.0; 5], &times(5), &cfg, true).unwrap();
        let inter = out.intermediate.unwrap();
        assert_eq!(inter.exceed, vec![false, true, true, true, false]);
        assert!(inter.rel_seas[0].is_nan());
        assert_eq!(inter.rel_seas[1], 2.0);
        assert_eq!(inter.labels.event[3], Some(1));
        assert_eq!(inter.ts, temp.to_vec());
    }

    #[test]
    fn flat_climatology_event_is_moderate() {
        // thresh == seas, e.g. SST pinned at freezing under sea ice
        let mut temp = [-1.8; 11];
        temp[5] = -1.81;
        let out = define_events(
            &temp,
            &[-1.8; 11],
            &[-1.8; 11],
            &times(11),
            &EventConfig::new(),
            false,
        )
        .unwrap();
        assert_eq!(out.events.len(), 1);
        let ev = &out.events[0];
        assert_eq!((ev.start, ev.end, ev.duration), (0, 10, 11));
        assert_eq!(ev.category, Category::Moderate);
        assert_eq!(ev.category_durations(), [0, 0, 0, 0]);
    }

    #[test]
    fn flip_cold_restores_sign() {
        let temp = [0.0, -2.0, -2.0, -2.0, 0.0];
        let neg: Vec<f64> = temp.iter().map(|v| -v).collect();
        let cfg = EventConfig::new().with_min_duration(3).with_max_gap(0);
        let mut out = define_events(&neg, &[1.0; 5], &[0.0; 5], &times(5), &cfg, true).unwrap();
        let inter = out.intermediate.as_mut().unwrap();
        inter.flip_cold();
        assert_eq!(inter.ts, temp.to_vec());
        assert_eq!(inter.thresh, vec![-1.0; 5]);
        assert_eq!(inter.rel_seas[2], -2.0);
        assert_eq!(inter.rel_thresh_norm[2], 1.0);
        let ev = &mut out.events[0];
        ev.flip_cold();
        assert_eq!(ev.intensity_max, -2.0);
        assert_eq!(ev.intensity_var, 0.0);
    }
}
