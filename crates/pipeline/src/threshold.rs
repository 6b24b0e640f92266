//! Gridded climatology computation.

use std::borrow::Cow;

use mhw_calendar::{DoyMode, annotate_doy};
use mhw_climatology::{ClimatologyError, calc_clim};
use mhw_grid::{Grid, land_check};
use rayon::prelude::*;
use tracing::info;

use crate::config::ThresholdConfig;
use crate::error::MhwError;
use crate::output::{ClimatologyGrid, PARAMETERS_ATTR};
use crate::params::threshold_parameters;

/// Computes the seasonal climatology and percentile threshold of every
/// ocean cell of `grid`.
///
/// The time axis is optionally restricted to the climatology period, land
/// and missing cells are dropped, and each remaining cell's climatology is
/// computed in parallel. For cold spells the computation runs on the
/// negated series and the result is negated back, so `thresh` is the
/// `100 - pctile` percentile in the original sign.
///
/// # Errors
///
/// Returns [`MhwError`] if the configuration is invalid, the time dimension
/// is missing, the period selects no data, every cell is land, or a cell
/// computation fails.
#[tracing::instrument(skip_all, fields(tdim = config.tdim()))]
pub fn threshold(grid: &Grid, config: &ThresholdConfig) -> Result<ClimatologyGrid, MhwError> {
    config.validate()?;
    let tdim = config.tdim();

    let grid = match config.climatology_period() {
        Some((first, last)) => Cow::Owned(grid.select_years(tdim, first, last)?),
        None => Cow::Borrowed(grid),
    };
    let mut cells = land_check(&grid, tdim, config.anynans())?;
    let mode = DoyMode::for_axis(cells.times(), config.tstep());
    let doy = annotate_doy(cells.times(), mode);

    if config.cold_spells() {
        cells.negate();
    }
    if let Some(max_pad) = config.max_pad_length() {
        cells.interpolate(max_pad);
    }

    let (first_year, last_year) = match (cells.times().first(), cells.times().last()) {
        (Some(first), Some(last)) => (first.year(), last.year()),
        _ => (0, 0),
    };
    info!(
        n_cells = cells.n_cells(),
        n_times = cells.times().len(),
        first_year,
        last_year,
        ?mode,
        "computing climatology"
    );

    let cold = config.cold_spells();
    let results = (0..cells.n_cells())
        .into_par_iter()
        .map(|i| -> Result<_, ClimatologyError> {
            let clim = calc_clim(&cells.series(i), &doy, mode, config.clim())?;
            Ok(if cold { clim.negated() } else { clim })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let gridded = cells.layout().unstack(results)?;
    Ok(ClimatologyGrid::new(gridded, mode)?
        .with_attr(
            PARAMETERS_ATTR,
            threshold_parameters(config, first_year, last_year),
        )
        .with_inherited_attrs(grid.attrs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mhw_calendar::{Calendar, Date, date_sequence, year_sequence};
    use mhw_grid::GridError;

    fn ramp_grid(years: std::ops::RangeInclusive<i32>) -> Grid {
        let times = year_sequence(Calendar::Standard, *years.start(), *years.end());
        let values = (0..times.len()).map(|i| (i % 7) as f64).collect();
        Grid::from_series("time", times, values).unwrap()
    }

    #[test]
    fn point_series_gives_single_cell() {
        let out = threshold(&ramp_grid(2000..=2003), &ThresholdConfig::new()).unwrap();
        assert_eq!(out.clim().cells().len(), 1);
        assert_eq!(out.n_slots(), 366);
        let clim = out.cell(0).unwrap();
        assert!(clim.thresh().iter().all(|v| v.is_finite()));
        assert!(out.parameters().unwrap().contains("2000-2003"));
    }

    #[test]
    fn period_restricts_years() {
        let cfg = ThresholdConfig::new().with_climatology_period(2001, 2002);
        let out = threshold(&ramp_grid(2000..=2003), &cfg).unwrap();
        assert!(out.parameters().unwrap().contains("2001-2002"));
    }

    #[test]
    fn empty_period_rejected() {
        let cfg = ThresholdConfig::new().with_climatology_period(1990, 1991);
        let err = threshold(&ramp_grid(2000..=2001), &cfg).unwrap_err();
        assert_eq!(
            err,
            MhwError::Grid(GridError::EmptyTimeRange {
                first: 1990,
                last: 1991
            })
        );
    }

    #[test]
    fn day360_forces_time_steps() {
        let start = Date::new(Calendar::Day360, 2000, 1, 1).unwrap();
        let times = date_sequence(start, 3 * 360);
        let values = (0..times.len()).map(|i| (i % 11) as f64).collect();
        let grid = Grid::from_series("time", times, values).unwrap();
        let out = threshold(&grid, &ThresholdConfig::new()).unwrap();
        assert_eq!(out.mode(), DoyMode::TimeStep { year_length: 360 });
        assert_eq!(out.cell(0).unwrap().n_slots(), 360);
    }

    #[test]
    fn inherits_grid_attrs() {
        let grid = ramp_grid(2000..=2001).with_attr("units", "degC");
        let out = threshold(&grid, &ThresholdConfig::new()).unwrap();
        assert_eq!(out.attrs().get("units").map(String::as_str), Some("degC"));
    }
}
