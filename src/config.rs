use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct MhwConfig {
    /// I/O settings.
    #[serde(default)]
    pub io: IoConfig,

    /// Climatology and threshold settings.
    #[serde(default)]
    pub threshold: ThresholdToml,

    /// Event detection settings.
    #[serde(default)]
    pub detect: DetectToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoConfig {
    /// Sea surface temperature input (`.parquet` or `.nc`).
    pub input: Option<PathBuf>,
    /// Climatology Parquet, written by `threshold` and read by `detect`.
    pub climatology: Option<PathBuf>,
    /// Event table output.
    pub events: Option<PathBuf>,
    /// Per-step diagnostics output; enables intermediate output when set.
    pub intermediate: Option<PathBuf>,
    #[serde(default = "default_variable")]
    pub variable: String,
    #[serde(default = "default_time")]
    pub time: String,
    #[serde(default = "default_spatial")]
    pub spatial: Vec<String>,
    #[serde(default = "default_calendar")]
    pub calendar: String,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            input: None,
            climatology: None,
            events: None,
            intermediate: None,
            variable: default_variable(),
            time: default_time(),
            spatial: default_spatial(),
            calendar: default_calendar(),
            compression: default_compression(),
            row_group_size: default_row_group_size(),
        }
    }
}

fn default_variable() -> String {
    "sst".to_string()
}
fn default_time() -> String {
    "time".to_string()
}
fn default_spatial() -> Vec<String> {
    vec!["lat".to_string(), "lon".to_string()]
}
fn default_calendar() -> String {
    "standard".to_string()
}
fn default_compression() -> String {
    "snappy".to_string()
}
fn default_row_group_size() -> usize {
    1_000_000
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdToml {
    /// Inclusive `[first, last]` years of the baseline.
    #[serde(default)]
    pub climatology_period: Option<[i32; 2]>,
    #[serde(default = "default_pctile")]
    pub pctile: f64,
    #[serde(default = "default_window_half_width")]
    pub window_half_width: usize,
    #[serde(default = "default_true")]
    pub smooth_percentile: bool,
    #[serde(default = "default_smooth_width")]
    pub smooth_percentile_width: usize,
    #[serde(default)]
    pub skipna: bool,
    #[serde(default)]
    pub max_pad_length: Option<usize>,
    #[serde(default)]
    pub cold_spells: bool,
    #[serde(default)]
    pub tstep: bool,
    #[serde(default)]
    pub anynans: bool,
}

impl Default for ThresholdToml {
    fn default() -> Self {
        Self {
            climatology_period: None,
            pctile: default_pctile(),
            window_half_width: default_window_half_width(),
            smooth_percentile: true,
            smooth_percentile_width: default_smooth_width(),
            skipna: false,
            max_pad_length: None,
            cold_spells: false,
            tstep: false,
            anynans: false,
        }
    }
}

fn default_pctile() -> f64 {
    90.0
}
fn default_window_half_width() -> usize {
    5
}
fn default_smooth_width() -> usize {
    31
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectToml {
    #[serde(default = "default_min_duration")]
    pub min_duration: usize,
    #[serde(default = "default_true")]
    pub join_gaps: bool,
    #[serde(default = "default_max_gap")]
    pub max_gap: usize,
    #[serde(default)]
    pub max_pad_length: Option<usize>,
    #[serde(default)]
    pub cold_spells: bool,
    #[serde(default)]
    pub tstep: bool,
    #[serde(default)]
    pub anynans: bool,
}

impl Default for DetectToml {
    fn default() -> Self {
        Self {
            min_duration: default_min_duration(),
            join_gaps: true,
            max_gap: default_max_gap(),
            max_pad_length: None,
            cold_spells: false,
            tstep: false,
            anynans: false,
        }
    }
}

fn default_min_duration() -> usize {
    5
}
fn default_max_gap() -> usize {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: MhwConfig = toml::from_str("").unwrap();
        assert_eq!(config.io.variable, "sst");
        assert_eq!(config.io.spatial, vec!["lat", "lon"]);
        assert_eq!(config.threshold.pctile, 90.0);
        assert_eq!(config.threshold.smooth_percentile_width, 31);
        assert_eq!(config.detect.min_duration, 5);
        assert_eq!(config.detect.max_gap, 2);
        assert!(config.detect.join_gaps);
    }

    #[test]
    fn sections_parse() {
        let text = r#"
            [io]
            input = "sst.parquet"
            climatology = "clim.parquet"
            spatial = ["lat"]
            calendar = "noleap"

            [threshold]
            climatology_period = [1983, 2012]
            pctile = 95.0
            cold_spells = true

            [detect]
            max_gap = 3
            min_duration = 7
        "#;
        let config: MhwConfig = toml::from_str(text).unwrap();
        assert_eq!(config.io.input, Some(PathBuf::from("sst.parquet")));
        assert_eq!(config.threshold.climatology_period, Some([1983, 2012]));
        assert!(config.threshold.cold_spells);
        assert_eq!(config.detect.max_gap, 3);
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<MhwConfig, _> = toml::from_str("[detect]\nmaxGap = 3\n");
        assert!(result.is_err());
    }
}
