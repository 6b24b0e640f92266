//! Detect command: find events against a stored climatology.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use mhw_io::{read_climatology, write_events, write_intermediate};
use mhw_pipeline::detect;

use crate::cli::DetectArgs;
use crate::convert;
use crate::input::{load_config, read_sst, resolve};

/// Run the detection pipeline.
pub fn run(args: DetectArgs) -> Result<()> {
    let _cmd = info_span!("detect").entered();
    // 1. Load project TOML
    let config = load_config(&args.config)?;
    let input = resolve(args.input, config.io.input.as_ref(), "input", "input")?;
    let clim_path = resolve(
        args.climatology,
        config.io.climatology.as_ref(),
        "climatology",
        "climatology",
    )?;
    let output = resolve(args.output, config.io.events.as_ref(), "events", "events")?;
    let reader_cfg = convert::build_reader_config(&config.io)?;
    let writer_cfg = convert::build_writer_config(&config.io)?;
    let mut detect_cfg = convert::build_detect_config(&config.detect, &config.io)?;
    if args.cold {
        detect_cfg = detect_cfg.with_cold_spells(true);
    }

    // 2. Read SST and climatology
    let grid = read_sst(&input, &reader_cfg)?;
    let clim = read_climatology(&clim_path, &reader_cfg)
        .with_context(|| format!("failed to read climatology: {}", clim_path.display()))?;

    // 3. Detect
    let detection = detect(&grid, &clim, &detect_cfg).context("event detection failed")?;
    info!(n_events = detection.n_events(), "detection finished");

    // 4. Write
    write_events(&output, &detection, &writer_cfg)
        .with_context(|| format!("failed to write events: {}", output.display()))?;
    if let Some(path) = &config.io.intermediate {
        write_intermediate(path, &detection, &writer_cfg)
            .with_context(|| format!("failed to write intermediate: {}", path.display()))?;
    }
    Ok(())
}
