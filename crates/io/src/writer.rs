//! High-level Parquet writer configuration and orchestration.

use std::path::Path;

use mhw_grid::Grid;
use mhw_pipeline::{ClimatologyGrid, Detection};
use parquet::file::properties::WriterProperties;
use tracing::info;

use crate::error::IoError;
use crate::parquet_write;

/// Compression algorithm for Parquet output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// No compression.
    None,
    /// Snappy compression (fast, moderate ratio).
    #[default]
    Snappy,
    /// Zstd compression (slower, better ratio).
    Zstd,
}

impl Compression {
    /// Converts to the corresponding `parquet::basic::Compression` variant.
    fn to_parquet(self) -> Result<parquet::basic::Compression, IoError> {
        Ok(match self {
            Self::None => parquet::basic::Compression::UNCOMPRESSED,
            Self::Snappy => parquet::basic::Compression::SNAPPY,
            Self::Zstd => {
                let level =
                    parquet::basic::ZstdLevel::try_new(3).map_err(|e| IoError::Parquet {
                        reason: e.to_string(),
                    })?;
                parquet::basic::Compression::ZSTD(level)
            }
        })
    }
}

/// Configuration for writing grids, climatologies and events to Parquet.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Compression algorithm to use.
    compression: Compression,
    /// Maximum number of rows per row group.
    row_group_size: usize,
    /// Name of the time column in grid output.
    time_column: String,
    /// Name of the value column in grid output.
    value_column: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
            row_group_size: 1_000_000,
            time_column: "time".into(),
            value_column: "sst".into(),
        }
    }
}

impl WriterConfig {
    /// Sets the compression algorithm.
    pub fn with_compression(mut self, comp: Compression) -> Self {
        self.compression = comp;
        self
    }

    /// Sets the maximum number of rows per row group.
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Sets the time column name used by [`write_grid`].
    pub fn with_time_column(mut self, name: impl Into<String>) -> Self {
        self.time_column = name.into();
        self
    }

    /// Sets the value column name used by [`write_grid`].
    pub fn with_value_column(mut self, name: impl Into<String>) -> Self {
        self.value_column = name.into();
        self
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if `row_group_size` is zero or a
    /// column name is empty.
    fn validate(&self) -> Result<(), IoError> {
        let mut problems = Vec::new();
        if self.row_group_size == 0 {
            problems.push("row_group_size must be greater than 0".to_string());
        }
        if self.time_column.is_empty() || self.value_column.is_empty() {
            problems.push("column names must not be empty".to_string());
        }
        if !problems.is_empty() {
            return Err(IoError::Validation {
                count: problems.len(),
                details: problems.join("; "),
            });
        }
        Ok(())
    }

    fn properties(
        &self,
        metadata: Vec<parquet::file::metadata::KeyValue>,
    ) -> Result<WriterProperties, IoError> {
        Ok(WriterProperties::builder()
            .set_compression(self.compression.to_parquet()?)
            .set_max_row_group_size(self.row_group_size)
            .set_key_value_metadata(Some(metadata))
            .build())
    }
}

/// Writes a gridded time series in long format, one row per time step and
/// cell. The grid's attributes and spatial axes are kept as file metadata.
///
/// # Errors
///
/// Returns [`IoError::Validation`] for an invalid configuration,
/// [`IoError::Grid`] if the grid has no time dimension named after the
/// configured time column, or [`IoError::Parquet`] on write failure.
pub fn write_grid(path: &Path, grid: &Grid, config: &WriterConfig) -> Result<(), IoError> {
    config.validate()?;
    let (schema, batch) =
        parquet_write::grid_to_batch(grid, &config.time_column, &config.value_column)?;
    let spatial: Vec<_> = grid
        .dims()
        .iter()
        .filter(|d| d.name() != config.time_column)
        .cloned()
        .collect();
    let props = config.properties(parquet_write::file_metadata(&spatial, grid.attrs()))?;
    parquet_write::write_batches(path, &[batch], &schema, props)?;
    info!(path = %path.display(), rows = grid.values().len(), "wrote grid");
    Ok(())
}

/// Writes a climatology table (`doy`, coordinates, `thresh`, `seas`).
///
/// # Errors
///
/// Returns [`IoError::Validation`] for an invalid configuration or
/// [`IoError::Parquet`] on write failure.
pub fn write_climatology(
    path: &Path,
    clim: &ClimatologyGrid,
    config: &WriterConfig,
) -> Result<(), IoError> {
    config.validate()?;
    let (schema, batch) = parquet_write::climatology_to_batch(clim)?;
    let props = config.properties(parquet_write::file_metadata(clim.clim().dims(), clim.attrs()))?;
    let rows = batch.num_rows();
    parquet_write::write_batches(path, &[batch], &schema, props)?;
    info!(path = %path.display(), rows, n_slots = clim.n_slots(), "wrote climatology");
    Ok(())
}

/// Writes the event table, one row per detected event.
///
/// # Errors
///
/// Returns [`IoError::Validation`] for an invalid configuration or
/// [`IoError::Parquet`] on write failure.
pub fn write_events(path: &Path, detection: &Detection, config: &WriterConfig) -> Result<(), IoError> {
    config.validate()?;
    let (schema, batch) = parquet_write::events_to_batch(detection)?;
    let props = config.properties(parquet_write::file_metadata(
        detection.events.dims(),
        &detection.attrs,
    ))?;
    parquet_write::write_batches(path, &[batch], &schema, props)?;
    info!(path = %path.display(), n_events = detection.n_events(), "wrote events");
    Ok(())
}

/// Writes the per-time-step diagnostics of a detection run.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if the detection carries no intermediate
/// output or the configuration is invalid, or [`IoError::Parquet`] on write
/// failure.
pub fn write_intermediate(
    path: &Path,
    detection: &Detection,
    config: &WriterConfig,
) -> Result<(), IoError> {
    config.validate()?;
    let inter = detection
        .intermediate
        .as_ref()
        .ok_or_else(|| IoError::Validation {
            count: 1,
            details: "detection was run without intermediate output".to_string(),
        })?;
    let (schema, batch) = parquet_write::intermediate_to_batch(inter, detection)?;
    let props = config.properties(parquet_write::file_metadata(inter.dims(), &detection.attrs))?;
    let rows = batch.num_rows();
    parquet_write::write_batches(path, &[batch], &schema, props)?;
    info!(path = %path.display(), rows, "wrote intermediate");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = WriterConfig::default();
        assert_eq!(config.compression, Compression::Snappy);
        assert_eq!(config.row_group_size, 1_000_000);
        assert_eq!(config.time_column, "time");
        assert_eq!(config.value_column, "sst");
    }

    #[test]
    fn builder_methods() {
        let config = WriterConfig::default()
            .with_compression(Compression::Zstd)
            .with_row_group_size(500)
            .with_value_column("temp");
        assert_eq!(config.compression, Compression::Zstd);
        assert_eq!(config.row_group_size, 500);
        assert_eq!(config.value_column, "temp");
    }

    #[test]
    fn validate_collects_problems() {
        let config = WriterConfig::default()
            .with_row_group_size(0)
            .with_time_column("");
        match config.validate().unwrap_err() {
            IoError::Validation { count, details } => {
                assert_eq!(count, 2);
                assert!(details.contains("row_group_size"));
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn zstd_maps_to_parquet() {
        assert!(matches!(
            Compression::Zstd.to_parquet().unwrap(),
            parquet::basic::Compression::ZSTD(_)
        ));
    }
}
