//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};

use crate::config::*;

use mhw_calendar::Calendar;
use mhw_io::{Compression, ReaderConfig, WriterConfig};
use mhw_pipeline::{DetectConfig, ThresholdConfig};

/// Parses a compression algorithm name string into the corresponding enum variant.
pub fn parse_compression(s: &str) -> Result<Compression> {
    match s.to_lowercase().as_str() {
        "none" => Ok(Compression::None),
        "snappy" => Ok(Compression::Snappy),
        "zstd" => Ok(Compression::Zstd),
        other => bail!("unknown compression: {other:?}"),
    }
}

/// Builds a [`ReaderConfig`] from the TOML I/O configuration.
pub fn build_reader_config(io: &IoConfig) -> Result<ReaderConfig> {
    let calendar = Calendar::from_cf_name(&io.calendar)?;
    let cfg = ReaderConfig::default()
        .with_time_column(&io.time)
        .with_value_column(&io.variable)
        .with_spatial_columns(io.spatial.clone())
        .with_calendar(calendar);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`WriterConfig`] from the TOML I/O configuration.
pub fn build_writer_config(io: &IoConfig) -> Result<WriterConfig> {
    let compression = parse_compression(&io.compression)?;
    Ok(WriterConfig::default()
        .with_compression(compression)
        .with_row_group_size(io.row_group_size)
        .with_time_column(&io.time)
        .with_value_column(&io.variable))
}

/// Builds a [`ThresholdConfig`] from the TOML threshold section.
pub fn build_threshold_config(t: &ThresholdToml, io: &IoConfig) -> Result<ThresholdConfig> {
    let mut cfg = ThresholdConfig::new()
        .with_tdim(&io.time)
        .with_pctile(t.pctile)
        .with_window_half_width(t.window_half_width)
        .with_smooth_percentile(t.smooth_percentile)
        .with_smooth_percentile_width(t.smooth_percentile_width)
        .with_skipna(t.skipna)
        .with_cold_spells(t.cold_spells)
        .with_tstep(t.tstep)
        .with_anynans(t.anynans);
    if let Some([first, last]) = t.climatology_period {
        cfg = cfg.with_climatology_period(first, last);
    }
    if let Some(days) = t.max_pad_length {
        cfg = cfg.with_max_pad_length(days);
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`DetectConfig`] from the TOML detect section.
///
/// Intermediate output is requested when an intermediate path is set.
pub fn build_detect_config(d: &DetectToml, io: &IoConfig) -> Result<DetectConfig> {
    let mut cfg = DetectConfig::new()
        .with_tdim(&io.time)
        .with_min_duration(d.min_duration)
        .with_join_gaps(d.join_gaps)
        .with_max_gap(d.max_gap)
        .with_cold_spells(d.cold_spells)
        .with_tstep(d.tstep)
        .with_anynans(d.anynans)
        .with_intermediate(io.intermediate.is_some());
    if let Some(days) = d.max_pad_length {
        cfg = cfg.with_max_pad_length(days);
    }
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compression_names() {
        assert_eq!(parse_compression("ZSTD").unwrap(), Compression::Zstd);
        assert!(parse_compression("lz4").is_err());
    }

    #[test]
    fn unknown_calendar_rejected() {
        let io = IoConfig {
            calendar: "julian".to_string(),
            ..IoConfig::default()
        };
        assert!(build_reader_config(&io).is_err());
    }

    #[test]
    fn threshold_fields_forwarded() {
        let t = ThresholdToml {
            climatology_period: Some([1983, 2012]),
            pctile: 95.0,
            max_pad_length: Some(3),
            ..ThresholdToml::default()
        };
        let cfg = build_threshold_config(&t, &IoConfig::default()).unwrap();
        assert_eq!(cfg.climatology_period(), Some((1983, 2012)));
        assert_eq!(cfg.clim().pctile(), 95.0);
        assert_eq!(cfg.max_pad_length(), Some(3));
    }

    #[test]
    fn even_smoothing_width_rejected() {
        let t = ThresholdToml {
            smooth_percentile_width: 30,
            ..ThresholdToml::default()
        };
        assert!(build_threshold_config(&t, &IoConfig::default()).is_err());
    }

    #[test]
    fn intermediate_follows_output_path() {
        let io = IoConfig {
            intermediate: Some("steps.parquet".into()),
            ..IoConfig::default()
        };
        let cfg = build_detect_config(&DetectToml::default(), &io).unwrap();
        assert!(cfg.intermediate());
        let cfg = build_detect_config(&DetectToml::default(), &IoConfig::default()).unwrap();
        assert!(!cfg.intermediate());
    }

    #[test]
    fn max_gap_not_below_min_duration_rejected() {
        let d = DetectToml {
            max_gap: 5,
            ..DetectToml::default()
        };
        assert!(build_detect_config(&d, &IoConfig::default()).is_err());
    }
}
