//! Reductions over `f64` samples with missing values encoded as NaN.
//!
//! Two families are provided: plain reductions, where a single NaN makes
//! the result NaN (numpy `mean`/`percentile`), and `nan*` reductions that
//! ignore missing values (numpy `nanmean`/`nanpercentile`). Empty samples
//! yield NaN in both families.

use std::cmp::Ordering;

/// Arithmetic mean. NaN if empty or if any value is NaN.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Arithmetic mean of the non-NaN values. NaN if none remain.
pub fn nanmean(data: &[f64]) -> f64 {
    let (sum, n) = data
        .iter()
        .filter(|x| !x.is_nan())
        .fold((0.0, 0usize), |(s, n), &x| (s + x, n + 1));
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

/// Sum of the non-NaN values. NaN if none remain.
pub fn nansum(data: &[f64]) -> f64 {
    let mut seen = false;
    let mut sum = 0.0;
    for &x in data.iter().filter(|x| !x.is_nan()) {
        seen = true;
        sum += x;
    }
    if seen { sum } else { f64::NAN }
}

/// Maximum of the non-NaN values. NaN if none remain.
pub fn nanmax(data: &[f64]) -> f64 {
    data.iter()
        .copied()
        .filter(|x| !x.is_nan())
        .fold(f64::NAN, |acc, x| if acc.is_nan() || x > acc { x } else { acc })
}

/// Population variance (N denominator, numpy `var` with `ddof=0`) of the
/// non-NaN values. NaN if none remain.
pub fn nanvar(data: &[f64]) -> f64 {
    let m = nanmean(data);
    if m.is_nan() {
        return f64::NAN;
    }
    let (ss, n) = data
        .iter()
        .filter(|x| !x.is_nan())
        .fold((0.0, 0usize), |(s, n), &x| (s + (x - m) * (x - m), n + 1));
    ss / n as f64
}

/// Population standard deviation of the non-NaN values.
pub fn nanstd(data: &[f64]) -> f64 {
    nanvar(data).sqrt()
}

/// Index of the first maximum, ignoring NaN. `None` if every value is NaN.
pub fn nanargmax(data: &[f64]) -> Option<usize> {
    data.iter()
        .enumerate()
        .filter(|(_, x)| !x.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (i, &x)| match best {
            Some((_, b)) if x <= b => best,
            _ => Some((i, x)),
        })
        .map(|(i, _)| i)
}

/// R's default quantile algorithm (type=7), identical to numpy's `linear`
/// interpolation.
///
/// **Expects pre-sorted input** (caller's responsibility).
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn quantile_type7(sorted: &[f64], p: f64) -> f64 {
    assert!(
        !sorted.is_empty(),
        "quantile_type7: input must not be empty"
    );
    let n = sorted.len();
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    sorted[lo] + (h - h.floor()) * (sorted[hi] - sorted[lo])
}

/// Percentile (0..=100) of an unsorted sample.
///
/// With `skipna` NaN values are dropped first; otherwise any NaN makes the
/// result NaN. Empty samples give NaN.
pub fn percentile(data: &[f64], pct: f64, skipna: bool) -> f64 {
    let mut sorted: Vec<f64> = if skipna {
        data.iter().copied().filter(|x| !x.is_nan()).collect()
    } else {
        if data.iter().any(|x| x.is_nan()) {
            return f64::NAN;
        }
        data.to_vec()
    };
    if sorted.is_empty() {
        return f64::NAN;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    quantile_type7(&sorted, pct / 100.0)
}

/// Mean of a sample, dropping NaN when `skipna` is set.
pub fn mean_skipna(data: &[f64], skipna: bool) -> f64 {
    if skipna { nanmean(data) } else { mean(data) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&data), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mean_empty_and_nan() {
        assert!(mean(&[]).is_nan());
        assert!(mean(&[1.0, f64::NAN]).is_nan());
    }

    #[test]
    fn test_nanmean() {
        assert_relative_eq!(nanmean(&[1.0, f64::NAN, 3.0]), 2.0, epsilon = 1e-12);
        assert!(nanmean(&[f64::NAN]).is_nan());
    }

    #[test]
    fn test_nansum() {
        assert_relative_eq!(nansum(&[1.5, f64::NAN, 2.5]), 4.0, epsilon = 1e-12);
        assert!(nansum(&[]).is_nan());
    }

    #[test]
    fn test_nanmax() {
        assert_eq!(nanmax(&[f64::NAN, -3.0, -1.0, -2.0]), -1.0);
        assert!(nanmax(&[f64::NAN, f64::NAN]).is_nan());
    }

    #[test]
    fn test_nanvar_population() {
        // numpy.var([2,4,4,4,5,5,7,9]) == 4.0
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(nanvar(&data), 4.0, epsilon = 1e-12);
        assert_relative_eq!(nanstd(&data), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nanvar_single() {
        assert_eq!(nanvar(&[3.0]), 0.0);
        assert!(nanvar(&[]).is_nan());
    }

    #[test]
    fn test_nanargmax_first_wins() {
        assert_eq!(nanargmax(&[1.0, 5.0, 2.0, 5.0]), Some(1));
        assert_eq!(nanargmax(&[f64::NAN, 0.5, f64::NAN]), Some(1));
        assert_eq!(nanargmax(&[f64::NAN]), None);
    }

    #[test]
    fn test_quantile_type7_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        // p=0.1 → h=0.4, lo=0, hi=1 → 1 + 0.4*(2-1) = 1.4
        assert_relative_eq!(quantile_type7(&sorted, 0.1), 1.4, epsilon = 1e-10);
    }

    #[test]
    fn test_quantile_type7_r_crossvalidation() {
        // R: quantile(1:10, 0.3, type=7) = 3.7
        let sorted: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        assert_relative_eq!(quantile_type7(&sorted, 0.3), 3.7, epsilon = 1e-10);
    }

    #[test]
    #[should_panic(expected = "quantile_type7: input must not be empty")]
    fn test_quantile_type7_empty_panics() {
        quantile_type7(&[], 0.5);
    }

    #[test]
    fn test_percentile_unsorted() {
        // numpy.percentile([5,1,4,2,3], 90) == 4.6
        let data = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_relative_eq!(percentile(&data, 90.0, false), 4.6, epsilon = 1e-12);
    }

    #[test]
    fn test_percentile_nan_policy() {
        let data = [5.0, f64::NAN, 1.0, 3.0];
        assert!(percentile(&data, 50.0, false).is_nan());
        assert_relative_eq!(percentile(&data, 50.0, true), 3.0, epsilon = 1e-12);
        assert!(percentile(&[f64::NAN], 50.0, true).is_nan());
    }

    #[test]
    fn test_mean_skipna() {
        let data = [1.0, f64::NAN, 2.0];
        assert!(mean_skipna(&data, false).is_nan());
        assert_relative_eq!(mean_skipna(&data, true), 1.5, epsilon = 1e-12);
    }
}
