//! Human-readable run parameter descriptions stored as attributes.

use crate::config::{DetectConfig, ThresholdConfig};

const ANYNANS_NOTE: &str =
    "any grid point with even only 1 NaN along time axis has been removed from calculation";

/// Describes a threshold run over the years `first..=last`.
pub(crate) fn threshold_parameters(config: &ThresholdConfig, first: i32, last: i32) -> String {
    let clim = config.clim();
    let mut parts = vec![
        format!("Threshold calculated using: {} percentile", clim.pctile()),
        format!("climatology period is {first}-{last}"),
        format!(
            "window half width used for percentile is {}",
            clim.window_half_width()
        ),
    ];
    if clim.skipna() {
        parts.push("NaNs were skipped in percentile and mean calculations".to_string());
    }
    if clim.smooth() {
        parts.push(format!(
            "width of moving average window to smooth percentile is {}",
            clim.smooth_width()
        ));
    }
    if config.cold_spells() {
        parts.push("climatology computed for cold spells".to_string());
    }
    if let Some(pad) = config.max_pad_length() {
        parts.push(pad_note(pad));
    }
    if config.anynans() {
        parts.push(ANYNANS_NOTE.to_string());
    }
    parts.join("; ")
}

/// Describes a detection run.
pub(crate) fn detect_parameters(config: &DetectConfig) -> String {
    let events = config.events();
    let mut parts = vec![format!(
        "MHW detected using: {} days of minimum duration",
        events.min_duration()
    )];
    if events.join_gaps() {
        parts.push(format!(
            "events separated by {} or less days were joined",
            events.max_gap()
        ));
    }
    if config.cold_spells() {
        parts.push("cold events were detected instead of heat events".to_string());
    }
    if let Some(pad) = config.max_pad_length() {
        parts.push(pad_note(pad));
    }
    if config.anynans() {
        parts.push(ANYNANS_NOTE.to_string());
    }
    parts.join("; ")
}

fn pad_note(pad: usize) -> String {
    format!(
        "missing values were filled by linear interpolation, gaps > {pad} days long were left as NaNs"
    )
}
