//! Threshold command: compute and store the climatology.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use mhw_io::write_climatology;
use mhw_pipeline::threshold;

use crate::cli::ThresholdArgs;
use crate::convert;
use crate::input::{load_config, read_sst, resolve};

/// Run the climatology pipeline.
pub fn run(args: ThresholdArgs) -> Result<()> {
    let _cmd = info_span!("threshold").entered();
    // 1. Load project TOML
    let config = load_config(&args.config)?;
    let input = resolve(args.input, config.io.input.as_ref(), "input", "input")?;
    let output = resolve(
        args.output,
        config.io.climatology.as_ref(),
        "climatology",
        "climatology",
    )?;
    let reader_cfg = convert::build_reader_config(&config.io)?;
    let writer_cfg = convert::build_writer_config(&config.io)?;
    let threshold_cfg = convert::build_threshold_config(&config.threshold, &config.io)?;

    // 2. Read SST
    let grid = read_sst(&input, &reader_cfg)?;

    // 3. Climatology
    let clim = threshold(&grid, &threshold_cfg).context("climatology calculation failed")?;
    info!(
        n_slots = clim.n_slots(),
        n_cells = clim.clim().n_present(),
        "climatology computed"
    );

    // 4. Write
    write_climatology(&output, &clim, &writer_cfg)
        .with_context(|| format!("failed to write climatology: {}", output.display()))?;
    Ok(())
}
