//! Linear gap filling along the time axis.

/// Fills interior runs of NaN no longer than `max_pad` by linear
/// interpolation between the bounding valid values.
///
/// Leading and trailing NaN runs have only one neighbour and are left
/// untouched, as are interior runs longer than `max_pad`.
pub fn interpolate_na(series: &mut [f64], max_pad: usize) {
    let n = series.len();
    let mut i = 0;
    while i < n {
        if !series[i].is_nan() {
            i += 1;
            continue;
        }
        let start = i;
        while i < n && series[i].is_nan() {
            i += 1;
        }
        // series[start..i] is a NaN run
        let len = i - start;
        if start == 0 || i == n || len > max_pad {
            continue;
        }
        let left = series[start - 1];
        let right = series[i];
        let span = (len + 1) as f64;
        for (k, v) in series[start..i].iter_mut().enumerate() {
            let frac = (k + 1) as f64 / span;
            *v = left + frac * (right - left);
        }
    }
}
