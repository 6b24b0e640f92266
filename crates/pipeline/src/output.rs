//! Gridded results of threshold and detection runs.

use std::collections::BTreeMap;

use mhw_calendar::{Date, DoyMode};
use mhw_climatology::Climatology;
use mhw_events::{Intermediate, MhwEvent};
use mhw_grid::Gridded;

use crate::error::MhwError;

/// Attribute holding the human-readable description of the run parameters.
pub const PARAMETERS_ATTR: &str = "mhw_parameters";

// ---------------------------------------------------------------------------
// ClimatologyGrid
// ---------------------------------------------------------------------------

/// Per-cell day-of-year climatologies on the original spatial grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimatologyGrid {
    clim: Gridded<Climatology>,
    mode: DoyMode,
    attrs: BTreeMap<String, String>,
}

impl ClimatologyGrid {
    /// Wraps gridded climatologies computed under `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`MhwError::ClimatologyLengthMismatch`] if a cell's axis
    /// length differs from `mode.n_slots()`.
    pub fn new(clim: Gridded<Climatology>, mode: DoyMode) -> Result<Self, MhwError> {
        let expected = mode.n_slots();
        if let Some((_, bad)) = clim.iter().find(|(_, c)| c.n_slots() != expected) {
            return Err(MhwError::ClimatologyLengthMismatch {
                expected,
                got: bad.n_slots(),
            });
        }
        Ok(Self {
            clim,
            mode,
            attrs: BTreeMap::new(),
        })
    }

    /// Adds or replaces an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Adds every attribute of `attrs`, keeping existing keys.
    pub(crate) fn with_inherited_attrs(mut self, attrs: &BTreeMap<String, String>) -> Self {
        for (k, v) in attrs {
            self.attrs.entry(k.clone()).or_insert_with(|| v.clone());
        }
        self
    }

    /// Per-cell climatologies.
    pub fn clim(&self) -> &Gridded<Climatology> {
        &self.clim
    }

    /// Climatology of a flat spatial index, `None` for land cells.
    pub fn cell(&self, flat: usize) -> Option<&Climatology> {
        self.clim.get_flat(flat)
    }

    /// Day-of-year mode the climatology was computed under.
    pub fn mode(&self) -> DoyMode {
        self.mode
    }

    /// Length of the day-of-year axis.
    pub fn n_slots(&self) -> usize {
        self.mode.n_slots()
    }

    /// Spatial shape.
    pub fn shape(&self) -> Vec<usize> {
        self.clim.shape()
    }

    /// Attributes.
    pub fn attrs(&self) -> &BTreeMap<String, String> {
        &self.attrs
    }

    /// Description of the parameters the climatology was computed with.
    pub fn parameters(&self) -> Option<&str> {
        self.attrs.get(PARAMETERS_ATTR).map(String::as_str)
    }

    /// Sign-flipped copy.
    pub fn negated(&self) -> Self {
        Self {
            clim: self.clim.clone().map(|c| c.negated()),
            mode: self.mode,
            attrs: self.attrs.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Events detected in every cell of a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Events per cell, ordered by start; `None` for dropped cells.
    pub events: Gridded<Vec<MhwEvent>>,
    /// Per-time-step diagnostics, when requested.
    pub intermediate: Option<Gridded<Intermediate>>,
    /// Time coordinates events are indexed against.
    pub times: Vec<Date>,
    /// Inherited grid attributes plus the run parameters.
    pub attrs: BTreeMap<String, String>,
}

impl Detection {
    /// Total number of events over all cells.
    pub fn n_events(&self) -> usize {
        self.events.iter().map(|(_, ev)| ev.len()).sum()
    }

    /// Description of the parameters the detection was run with.
    pub fn parameters(&self) -> Option<&str> {
        self.attrs.get(PARAMETERS_ATTR).map(String::as_str)
    }
}
