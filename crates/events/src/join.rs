//! Merging runs separated by short gaps.

use crate::runs::Run;

/// Joins consecutive runs whose gap is at most `max_gap` time steps.
///
/// `runs` must be ordered and non-overlapping. The gap between two runs is
/// the number of non-exceeding steps between them. Chains of short gaps
/// collapse into a single run that keeps the earliest start. The joined
/// run is not re-checked against the minimum duration.
pub fn join_gaps(runs: &[Run], max_gap: usize) -> Vec<Run> {
    let mut joined: Vec<Run> = Vec::with_capacity(runs.len());
    for &run in runs {
        match joined.last_mut() {
            Some(prev) if run.start - prev.end - 1 <= max_gap => prev.end = run.end,
            _ => joined.push(run),
        }
    }
    joined
}
