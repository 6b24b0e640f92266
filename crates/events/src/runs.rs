//! Exceedance runs: detection, minimum-duration filtering and labelling.

/// A contiguous span of time steps, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Run {
    /// Index of the first time step.
    pub start: usize,
    /// Index of the last time step.
    pub end: usize,
}

impl Run {
    /// Creates a run; `start` must not exceed `end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "run start {start} after end {end}");
        Self { start, end }
    }

    /// Number of time steps covered.
    pub fn duration(self) -> usize {
        self.end - self.start + 1
    }

    /// Event identifier: the index of the first time step.
    pub fn id(self) -> usize {
        self.start
    }
}

/// Marks time steps where `series >= thresh`. Missing values never exceed.
pub fn exceedance(series: &[f64], thresh: &[f64]) -> Vec<bool> {
    series.iter().zip(thresh).map(|(v, t)| v >= t).collect()
}

/// Position of each time step within its exceedance run.
///
/// Zero where `exceed` is false and `1, 2, 3, ...` along each run. This is
/// the difference between the time index and the forward-filled index of
/// the last non-exceeding step before it.
pub fn run_counter(exceed: &[bool]) -> Vec<usize> {
    // carry = index of the last false step + 1, or 0 before any false step
    let mut carry = 0;
    exceed
        .iter()
        .enumerate()
        .map(|(t, &e)| {
            if e {
                t + 1 - carry
            } else {
                carry = t + 1;
                0
            }
        })
        .collect()
}

/// Maximal exceedance runs lasting at least `min_duration` steps.
///
/// A run ends where the counter drops at the next step, or at the last step
/// of the series; the counter value there is the run's duration.
pub fn find_runs(exceed: &[bool], min_duration: usize) -> Vec<Run> {
    let counter = run_counter(exceed);
    let n = counter.len();
    counter
        .iter()
        .enumerate()
        .filter(|&(t, &c)| c > 0 && (t + 1 == n || counter[t + 1] < c))
        .filter(|&(_, &c)| c >= min_duration)
        .map(|(end, &duration)| Run::new(end + 1 - duration, end))
        .collect()
}

/// Per-time-step event labels over the full time axis.
///
/// `start` is set only at each event's first step, `end` only at its last
/// step, and `event` (the event id) at every step of the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLabels {
    /// Event start index, at the start position.
    pub start: Vec<Option<usize>>,
    /// Event end index, at the end position.
    pub end: Vec<Option<usize>>,
    /// Event id at every position inside an event.
    pub event: Vec<Option<usize>>,
}

impl EventLabels {
    /// Labels `n` time steps from a set of non-overlapping runs.
    pub fn from_runs(n: usize, runs: &[Run]) -> Self {
        let mut labels = Self {
            start: vec![None; n],
            end: vec![None; n],
            event: vec![None; n],
        };
        for run in runs.iter().filter(|r| r.end < n) {
            labels.start[run.start] = Some(run.start);
            labels.end[run.end] = Some(run.end);
            labels.event[run.start..=run.end].fill(Some(run.id()));
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bools(s: &str) -> Vec<bool> {
        s.chars().map(|c| c == 'T').collect()
    }

    #[test]
    fn counter_matches_forward_fill_formulation() {
        let exceed = bools("FFFFTTTTTFF");
        assert_eq!(run_counter(&exceed), vec![0, 0, 0, 0, 1, 2, 3, 4, 5, 0, 0]);
    }

    #[test]
    fn counter_run_at_series_start() {
        let exceed = bools("TTFT");
        assert_eq!(run_counter(&exceed), vec![1, 2, 0, 1]);
    }

    #[test]
    fn minimal_case() {
        let exceed = bools("FFFFTTTTTFF");
        let runs = find_runs(&exceed, 5);
        assert_eq!(runs, vec![Run::new(4, 8)]);
        assert_eq!(runs[0].duration(), 5);
    }

    #[test]
    fn sub_minimum_run_dropped() {
        let exceed = bools("FTTTTFTTTTTT");
        let runs = find_runs(&exceed, 5);
        assert_eq!(runs, vec![Run::new(6, 11)]);
    }

    #[test]
    fn run_touching_both_ends() {
        let exceed = bools("TTTTTFFTTTTT");
        assert_eq!(find_runs(&exceed, 5), vec![Run::new(0, 4), Run::new(7, 11)]);
    }

    #[test]
    fn all_true_and_all_false() {
        assert_eq!(find_runs(&[true; 7], 5), vec![Run::new(0, 6)]);
        assert!(find_runs(&[false; 7], 1).is_empty());
        assert!(find_runs(&[], 1).is_empty());
    }

    #[test]
    fn exceedance_nan_is_false() {
        let e = exceedance(&[1.0, f64::NAN, 3.0, 2.0], &[1.0, 0.0, 3.5, f64::NAN]);
        assert_eq!(e, vec![true, false, false, false]);
    }

    #[test]
    fn labels_cover_event() {
        let labels = EventLabels::from_runs(8, &[Run::new(2, 4)]);
        assert_eq!(labels.start, vec![None, None, Some(2), None, None, None, None, None]);
        assert_eq!(labels.end[4], Some(4));
        assert_eq!(labels.end.iter().flatten().count(), 1);
        assert_eq!(
            labels.event,
            vec![None, None, Some(2), Some(2), Some(2), None, None, None]
        );
    }
}
