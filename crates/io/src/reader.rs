//! High-level reader configuration and orchestration.

use std::path::Path;

use mhw_calendar::Calendar;
use mhw_grid::Grid;
use mhw_pipeline::ClimatologyGrid;
use tracing::info;

use crate::error::IoError;
use crate::parquet_read;

// ---------------------------------------------------------------------------
// ReaderConfig
// ---------------------------------------------------------------------------

/// Configuration for reading sea surface temperature grids and
/// climatologies.
///
/// Use the builder methods (`with_*`) to customise column and variable
/// names. The [`Default`] implementation expects a `time` axis, an `sst`
/// value and `lat`/`lon` spatial coordinates.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Name of the time column (Parquet) or time variable (NetCDF).
    time_column: String,
    /// Name of the temperature column or variable.
    value_column: String,
    /// Spatial coordinate columns of Parquet input, outermost first.
    spatial_columns: Vec<String>,
    /// Calendar of Parquet `Date32` values.
    calendar: Calendar,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            time_column: "time".into(),
            value_column: "sst".into(),
            spatial_columns: vec!["lat".into(), "lon".into()],
            calendar: Calendar::Standard,
        }
    }
}

impl ReaderConfig {
    /// Set the time column name.
    pub fn with_time_column(mut self, name: impl Into<String>) -> Self {
        self.time_column = name.into();
        self
    }

    /// Set the temperature column name.
    pub fn with_value_column(mut self, name: impl Into<String>) -> Self {
        self.value_column = name.into();
        self
    }

    /// Set the spatial coordinate columns. An empty list reads a single
    /// point series.
    pub fn with_spatial_columns(mut self, names: Vec<String>) -> Self {
        self.spatial_columns = names;
        self
    }

    /// Set the calendar used to decode Parquet dates.
    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    // --- Accessors ---

    /// Time column name.
    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    /// Temperature column name.
    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    /// Spatial coordinate column names.
    pub fn spatial_columns(&self) -> &[String] {
        &self.spatial_columns
    }

    /// Calendar of Parquet dates.
    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if a column name is empty or
    /// repeated.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut names = vec![self.time_column.as_str(), self.value_column.as_str()];
        names.extend(self.spatial_columns.iter().map(String::as_str));
        let mut problems = Vec::new();
        if names.iter().any(|n| n.is_empty()) {
            problems.push("column names must not be empty".to_string());
        }
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != names.len() {
            problems.push(format!("column names must be distinct, got {names:?}"));
        }
        if !problems.is_empty() {
            return Err(IoError::Validation {
                count: problems.len(),
                details: problems.join("; "),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Read a long-format sea surface temperature table into a grid.
///
/// The time axis comes first, followed by the configured spatial columns.
/// File key-value metadata becomes the grid's attributes.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the path does not exist,
/// [`IoError::MissingVariable`] if a configured column is absent,
/// [`IoError::Validation`] for duplicate rows or an invalid configuration,
/// or [`IoError::Parquet`] on read failure.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn read_parquet_grid(path: &Path, config: &ReaderConfig) -> Result<Grid, IoError> {
    config.validate()?;
    let contents = parquet_read::read_batches(path)?;
    let grid = parquet_read::batches_to_grid(
        &contents,
        &config.time_column,
        &config.value_column,
        &config.spatial_columns,
        config.calendar,
        path,
    )?;
    info!(shape = ?grid.shape(), "read parquet grid");
    Ok(grid)
}

/// Read a climatology written by [`crate::write_climatology`].
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the path does not exist,
/// [`IoError::MissingVariable`] if a column is absent,
/// [`IoError::Validation`] for malformed day-of-year values, or
/// [`IoError::Parquet`] on read failure.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn read_climatology(path: &Path, config: &ReaderConfig) -> Result<ClimatologyGrid, IoError> {
    config.validate()?;
    let contents = parquet_read::read_batches(path)?;
    let clim = parquet_read::batches_to_climatology(&contents, &config.spatial_columns, path)?;
    info!(
        n_slots = clim.n_slots(),
        n_cells = clim.clim().n_present(),
        "read climatology"
    );
    Ok(clim)
}

// ---------------------------------------------------------------------------
// NetCDF
// ---------------------------------------------------------------------------

/// Read a sea surface temperature variable from a NetCDF file.
///
/// Every dimension of the value variable other than the time dimension
/// becomes a spatial dimension, labelled by its coordinate variable when
/// one exists and by index otherwise. Fill values become NaN and global
/// string attributes become grid attributes.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the path does not exist,
/// [`IoError::MissingVariable`] if the value or time variable is absent,
/// [`IoError::InvalidTime`] for unsupported time units, or
/// [`IoError::Netcdf`] on read failure.
#[cfg(feature = "netcdf")]
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn read_netcdf(path: &Path, config: &ReaderConfig) -> Result<Grid, IoError> {
    use mhw_grid::Dim;
    use ndarray::{ArrayD, IxDyn};
    use tracing::debug;

    use crate::netcdf_read;

    config.validate()?;
    let file = netcdf_read::open_file(path)?;

    let offsets = netcdf_read::read_1d_f64(&file, &[&config.time_column], path)?;
    let encoding = netcdf_read::read_time_encoding(&file, &config.time_column, path)?;
    let dates = netcdf_read::offsets_to_dates(&encoding, &offsets)?;
    debug!(n_time = dates.len(), calendar = %encoding.calendar, "decoded time axis");

    let raw = netcdf_read::read_nd_f64(&file, &config.value_column, path)?;
    if !raw.dims.iter().any(|(name, _)| *name == config.time_column) {
        return Err(IoError::MissingVariable {
            name: format!("{} dimension of {}", config.time_column, config.value_column),
            path: path.to_path_buf(),
        });
    }

    let mut dims = Vec::with_capacity(raw.dims.len());
    let mut shape = Vec::with_capacity(raw.dims.len());
    for (name, len) in &raw.dims {
        shape.push(*len);
        if *name == config.time_column {
            if dates.len() != *len {
                return Err(IoError::DimensionMismatch {
                    name: name.clone(),
                    expected: *len,
                    got: dates.len(),
                });
            }
            dims.push(Dim::time(name.as_str(), dates.clone()));
        } else {
            let coords = match file.variable(name) {
                Some(_) => netcdf_read::read_1d_f64(&file, &[name.as_str()], path)?,
                None => (0..*len).map(|i| i as f64).collect(),
            };
            dims.push(Dim::values(name.as_str(), coords));
        }
    }

    let values = ArrayD::from_shape_vec(IxDyn(&shape), raw.data).map_err(|e| IoError::Grid {
        reason: e.to_string(),
    })?;
    let mut grid = Grid::new(dims, values)?;
    for (k, v) in netcdf_read::global_attributes(&file) {
        grid = grid.with_attr(k, v);
    }
    info!(shape = ?grid.shape(), "read netcdf grid");
    Ok(grid)
}
