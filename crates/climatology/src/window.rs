//! Centered sliding windows over the time axis and their pooling by day-of-year.

use mhw_calendar::Doy;
use ndarray::Array2;

/// Builds the `(time, 2w+1)` matrix of centered windows.
///
/// Row `t` holds `series[t-w..=t+w]`; entries falling outside the series
/// are NaN.
pub fn window_roll(series: &[f64], half_width: usize) -> Array2<f64> {
    let n = series.len();
    let width = 2 * half_width + 1;
    Array2::from_shape_fn((n, width), |(t, k)| {
        (t + k)
            .checked_sub(half_width)
            .and_then(|pos| series.get(pos))
            .copied()
            .unwrap_or(f64::NAN)
    })
}

/// Pools window values by the day-of-year of the window centre.
///
/// Returns `n_slots` samples; sample `i` collects every window whose centre
/// has day-of-year `i + 1`. Positions beyond either end of the series are
/// padding and never enter a sample, whereas missing values inside the
/// series do.
///
/// `doy` must have the same length as `series` and every value must be at
/// most `n_slots`.
pub fn pool_by_doy(series: &[f64], doy: &[Doy], half_width: usize, n_slots: usize) -> Vec<Vec<f64>> {
    let n = series.len();
    let windows = window_roll(series, half_width);
    let mut pools: Vec<Vec<f64>> = vec![Vec::new(); n_slots];
    for (t, (row, d)) in windows.rows().into_iter().zip(doy).enumerate() {
        // columns whose position t + k - w lies inside the series
        let first = half_width.saturating_sub(t);
        let last = (2 * half_width).min(n - 1 - t + half_width);
        pools[d.index()].extend(row.iter().skip(first).take(last + 1 - first));
    }
    pools
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doys(values: &[u16]) -> Vec<Doy> {
        values.iter().map(|&v| Doy::new(v).unwrap()).collect()
    }

    #[test]
    fn window_width_is_constant() {
        let series: Vec<f64> = (0..10).map(f64::from).collect();
        let w = window_roll(&series, 3);
        assert_eq!(w.dim(), (10, 7));
    }

    #[test]
    fn window_pads_edges_with_nan() {
        let series = [1.0, 2.0, 3.0];
        let w = window_roll(&series, 1);
        assert!(w[[0, 0]].is_nan());
        assert_eq!(w[[0, 1]], 1.0);
        assert_eq!(w[[0, 2]], 2.0);
        assert_eq!(w.row(1).to_vec(), vec![1.0, 2.0, 3.0]);
        assert!(w[[2, 2]].is_nan());
    }

    #[test]
    fn pooling_groups_by_centre_doy() {
        // two "years" of a 3-slot axis
        let series = [10.0, 20.0, 30.0, 11.0, 21.0, 31.0];
        let doy = doys(&[1, 2, 3, 1, 2, 3]);
        let pools = pool_by_doy(&series, &doy, 1, 3);
        assert_eq!(pools[0], vec![10.0, 20.0, 30.0, 11.0, 21.0]);
        assert_eq!(pools[1], vec![10.0, 20.0, 30.0, 11.0, 21.0, 31.0]);
        assert_eq!(pools[2], vec![20.0, 30.0, 11.0, 21.0, 31.0]);
    }

    #[test]
    fn interior_value_in_2w_plus_1_pools() {
        let series: Vec<f64> = (0..40).map(f64::from).collect();
        let doy: Vec<Doy> = (0..40).map(|i| Doy::new(i + 1).unwrap()).collect();
        let w = 4;
        let pools = pool_by_doy(&series, &doy, w, 40);
        let target = 20.0;
        let hits = pools.iter().filter(|p| p.contains(&target)).count();
        assert_eq!(hits, 2 * w + 1);
    }

    #[test]
    fn missing_values_are_kept() {
        let series = [1.0, f64::NAN, 3.0];
        let pools = pool_by_doy(&series, &doys(&[1, 2, 3]), 0, 3);
        assert!(pools[1][0].is_nan());
    }

    #[test]
    fn unused_slot_is_empty() {
        let series = [1.0, 2.0];
        let pools = pool_by_doy(&series, &doys(&[59, 61]), 0, 366);
        assert!(pools[59].is_empty());
    }
}
