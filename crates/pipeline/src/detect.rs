//! Gridded event detection.

use mhw_calendar::{Doy, DoyMode, annotate_doy};
use mhw_climatology::Climatology;
use mhw_events::{CellEvents, define_events};
use mhw_grid::{Grid, land_check};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::DetectConfig;
use crate::error::MhwError;
use crate::output::{ClimatologyGrid, Detection, PARAMETERS_ATTR};
use crate::params::detect_parameters;

/// Detects marine heat waves (or cold spells) in every ocean cell of `temp`
/// against a precomputed climatology.
///
/// Cells that are land in `temp` are dropped. Cells that are valid in
/// `temp` but whose climatology is absent or entirely missing are dropped
/// with a warning. Every remaining cell is processed in parallel; the first
/// failing cell aborts the run.
///
/// # Errors
///
/// Returns [`MhwError`] if the configuration is invalid, the time dimension
/// is missing, the climatology does not match the time axis or spatial
/// grid, or no cell is left to process.
#[tracing::instrument(skip_all, fields(tdim = config.tdim()))]
pub fn detect(
    temp: &Grid,
    clim: &ClimatologyGrid,
    config: &DetectConfig,
) -> Result<Detection, MhwError> {
    config.validate()?;
    let tdim = config.tdim();

    let (_, times) = temp.time_axis(tdim)?;
    let mode = DoyMode::for_axis(times, config.tstep());
    if clim.n_slots() != mode.n_slots() {
        return Err(MhwError::ClimatologyLengthMismatch {
            expected: mode.n_slots(),
            got: clim.n_slots(),
        });
    }

    let mut cells = land_check(temp, tdim, config.anynans())?;
    let shape = cells.layout().shape();
    if shape != clim.shape() {
        return Err(MhwError::SpatialMismatch {
            expected: shape,
            got: clim.shape(),
        });
    }

    let has_clim: Vec<bool> = cells
        .layout()
        .valid()
        .iter()
        .map(|&flat| clim.cell(flat).is_some_and(|c| !c.is_all_nan()))
        .collect();
    let missing = has_clim.iter().filter(|&&ok| !ok).count();
    if missing > 0 {
        warn!(missing, "dropping cells without climatology");
        cells.retain(|i| has_clim[i])?;
    }

    let doy = annotate_doy(cells.times(), mode);
    if let Some(max_pad) = config.max_pad_length() {
        cells.interpolate(max_pad);
    }
    let cold = config.cold_spells();
    if cold {
        cells.negate();
    }

    info!(
        n_cells = cells.n_cells(),
        n_times = cells.times().len(),
        cold,
        "detecting events"
    );

    let results = cells
        .layout()
        .valid()
        .par_iter()
        .enumerate()
        .map(|(i, &flat)| -> Result<CellEvents, MhwError> {
            let cell_clim = clim
                .cell(flat)
                .ok_or(MhwError::MissingClimatology { cell: flat })?;
            let (thresh, seas) = align(cell_clim, &doy, cold);
            let mut out = define_events(
                &cells.series(i),
                &thresh,
                &seas,
                cells.times(),
                config.events(),
                config.intermediate(),
            )?;
            if cold {
                out.events.iter_mut().for_each(|ev| ev.flip_cold());
                if let Some(inter) = out.intermediate.as_mut() {
                    inter.flip_cold();
                }
            }
            Ok(out)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (events, intermediate): (Vec<_>, Vec<_>) = results
        .into_iter()
        .map(|c| (c.events, c.intermediate))
        .unzip();
    let layout = cells.layout();
    let events = layout.unstack(events)?;
    let intermediate = if config.intermediate() {
        Some(layout.unstack(intermediate.into_iter().flatten().collect())?)
    } else {
        None
    };

    let mut attrs = temp.attrs().clone();
    attrs.insert(PARAMETERS_ATTR.to_string(), detect_parameters(config));
    let detection = Detection {
        events,
        intermediate,
        times: cells.times().to_vec(),
        attrs,
    };
    info!(n_events = detection.n_events(), "detection complete");
    Ok(detection)
}

/// Looks up `(thresh, seas)` for every time step, negated for cold spells.
fn align(clim: &Climatology, doy: &[Doy], negate: bool) -> (Vec<f64>, Vec<f64>) {
    let sign = if negate { -1.0 } else { 1.0 };
    doy.iter()
        .map(|&d| {
            let (thresh, seas) = clim.at(d);
            (sign * thresh, sign * seas)
        })
        .unzip()
}
