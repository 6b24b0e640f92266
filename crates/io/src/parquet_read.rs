//! Low-level Parquet reading and column extraction.

use std::collections::BTreeMap;
use std::path::Path;

use arrow::array::{Array, AsArray, RecordBatch};
use arrow::datatypes::{Date32Type, Float64Type, UInt16Type};
use mhw_calendar::{Calendar, DOY_SLOTS, Date, DoyMode};
use mhw_grid::{CellLayout, Dim, Grid};
use mhw_pipeline::{ClimatologyGrid, Climatology};
use ndarray::{ArrayD, IxDyn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tracing::debug;

use crate::dates::from_date32;
use crate::error::IoError;

/// Prefix of the file metadata keys holding full spatial axes.
pub(crate) const AXIS_KEY_PREFIX: &str = "mhw:axis:";

/// Record batches and user key-value metadata of one file.
#[derive(Debug)]
pub(crate) struct ParquetContents {
    pub batches: Vec<RecordBatch>,
    pub metadata: BTreeMap<String, String>,
}

/// Reads all record batches and the key-value metadata of a Parquet file.
///
/// Arrow's own schema entry is not part of the returned metadata.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file does not exist, or
/// [`IoError::Parquet`] if the file cannot be opened or read.
pub(crate) fn read_batches(path: &Path) -> Result<ParquetContents, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let metadata = builder
        .metadata()
        .file_metadata()
        .key_value_metadata()
        .map(|kvs| {
            kvs.iter()
                .filter(|kv| !kv.key.starts_with("ARROW:"))
                .filter_map(|kv| kv.value.clone().map(|v| (kv.key.clone(), v)))
                .collect()
        })
        .unwrap_or_default();
    let reader = builder.build()?;

    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    Ok(ParquetContents { batches, metadata })
}

// ---------------------------------------------------------------------------
// Column extraction
// ---------------------------------------------------------------------------

fn column_index(batch: &RecordBatch, name: &str, path: &Path) -> Result<usize, IoError> {
    batch
        .schema()
        .index_of(name)
        .map_err(|_| IoError::MissingVariable {
            name: name.to_string(),
            path: path.to_path_buf(),
        })
}

fn type_error(name: &str, expected: &str, batch: &RecordBatch, idx: usize) -> IoError {
    IoError::Validation {
        count: 1,
        details: format!(
            "column '{name}' should be {expected}, got {}",
            batch.schema().field(idx).data_type()
        ),
    }
}

/// Float64 column with nulls read as NaN.
fn f64_column(batch: &RecordBatch, name: &str, path: &Path) -> Result<Vec<f64>, IoError> {
    let idx = column_index(batch, name, path)?;
    let col = batch
        .column(idx)
        .as_primitive_opt::<Float64Type>()
        .ok_or_else(|| type_error(name, "Float64", batch, idx))?;
    Ok((0..col.len())
        .map(|i| if col.is_null(i) { f64::NAN } else { col.value(i) })
        .collect())
}

/// Spatial coordinate column; nulls and NaN are rejected.
fn coord_column(batch: &RecordBatch, name: &str, path: &Path) -> Result<Vec<f64>, IoError> {
    let values = f64_column(batch, name, path)?;
    let bad = values.iter().filter(|v| v.is_nan()).count();
    if bad > 0 {
        return Err(IoError::Validation {
            count: bad,
            details: format!("coordinate column '{name}' has {bad} missing value(s)"),
        });
    }
    Ok(values)
}

fn date32_column(batch: &RecordBatch, name: &str, path: &Path) -> Result<Vec<i32>, IoError> {
    let idx = column_index(batch, name, path)?;
    let col = batch
        .column(idx)
        .as_primitive_opt::<Date32Type>()
        .ok_or_else(|| type_error(name, "Date32", batch, idx))?;
    if col.null_count() > 0 {
        return Err(IoError::InvalidTime {
            reason: format!("column '{name}' has {} null value(s)", col.null_count()),
        });
    }
    Ok(col.values().to_vec())
}

fn u16_column(batch: &RecordBatch, name: &str, path: &Path) -> Result<Vec<u16>, IoError> {
    let idx = column_index(batch, name, path)?;
    let col = batch
        .column(idx)
        .as_primitive_opt::<UInt16Type>()
        .ok_or_else(|| type_error(name, "UInt16", batch, idx))?;
    if col.null_count() > 0 {
        return Err(IoError::Validation {
            count: col.null_count(),
            details: format!("column '{name}' has null values"),
        });
    }
    Ok(col.values().to_vec())
}

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

/// Sorted unique values.
fn unique_sorted(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut v: Vec<f64> = values.into_iter().collect();
    v.sort_by(f64::total_cmp);
    v.dedup_by(|a, b| a.total_cmp(b).is_eq());
    v
}

fn position(axis: &[f64], x: f64) -> Option<usize> {
    axis.binary_search_by(|p| p.total_cmp(&x)).ok()
}

/// Parses an axis stored in the file metadata.
pub(crate) fn parse_axis(name: &str, text: &str) -> Result<Vec<f64>, IoError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| IoError::Validation {
            count: 1,
            details: format!("axis metadata for '{name}' is malformed: {e}"),
        })
}

/// Spatial axis: the full axis from the metadata when present, otherwise the
/// coordinates seen in the rows.
fn spatial_axis(
    name: &str,
    seen: &[f64],
    metadata: &BTreeMap<String, String>,
) -> Result<Vec<f64>, IoError> {
    match metadata.get(&format!("{AXIS_KEY_PREFIX}{name}")) {
        Some(text) => {
            let mut axis = parse_axis(name, text)?;
            if !axis.is_sorted_by(|a, b| a.total_cmp(b).is_le()) {
                axis = unique_sorted(axis);
            }
            Ok(axis)
        }
        None => Ok(unique_sorted(seen.iter().copied())),
    }
}

/// Row coordinates of every spatial column, concatenated over batches.
fn spatial_rows(
    batches: &[RecordBatch],
    spatial: &[String],
    path: &Path,
) -> Result<Vec<Vec<f64>>, IoError> {
    let mut rows: Vec<Vec<f64>> = vec![Vec::new(); spatial.len()];
    for batch in batches {
        for (name, out) in spatial.iter().zip(rows.iter_mut()) {
            out.extend(coord_column(batch, name, path)?);
        }
    }
    Ok(rows)
}

/// Flat spatial index of each of `n_rows` rows.
fn flat_indices(
    rows: &[Vec<f64>],
    axes: &[Vec<f64>],
    spatial: &[String],
    n_rows: usize,
) -> Result<Vec<usize>, IoError> {
    let mut flat = vec![0usize; n_rows];
    for ((values, axis), name) in rows.iter().zip(axes).zip(spatial) {
        for (f, &x) in flat.iter_mut().zip(values) {
            let i = position(axis, x).ok_or_else(|| IoError::Validation {
                count: 1,
                details: format!("coordinate {x} of '{name}' is not on the stored axis"),
            })?;
            *f = *f * axis.len() + i;
        }
    }
    Ok(flat)
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// Assembles a gridded time series from long-format rows.
///
/// Every distinct date becomes a time step and every distinct coordinate
/// combination a cell; combinations absent from the file are NaN.
pub(crate) fn batches_to_grid(
    contents: &ParquetContents,
    time_column: &str,
    value_column: &str,
    spatial: &[String],
    calendar: Calendar,
    path: &Path,
) -> Result<Grid, IoError> {
    let mut days: Vec<i32> = Vec::new();
    let mut values: Vec<f64> = Vec::new();
    for batch in &contents.batches {
        days.extend(date32_column(batch, time_column, path)?);
        values.extend(f64_column(batch, value_column, path)?);
    }
    let rows = spatial_rows(&contents.batches, spatial, path)?;

    let mut time_axis = days.clone();
    time_axis.sort_unstable();
    time_axis.dedup();
    let axes = spatial
        .iter()
        .zip(&rows)
        .map(|(name, seen)| spatial_axis(name, seen, &contents.metadata))
        .collect::<Result<Vec<_>, _>>()?;
    let flat = flat_indices(&rows, &axes, spatial, values.len())?;

    let n_time = time_axis.len();
    let n_cells: usize = axes.iter().map(Vec::len).product();
    let mut data = vec![f64::NAN; n_time * n_cells];
    let mut seen = vec![false; n_time * n_cells];
    let mut duplicates = 0usize;
    for ((d, v), cell) in days.iter().zip(&values).zip(&flat) {
        let t = time_axis.partition_point(|x| x < d);
        let k = t * n_cells + cell;
        if seen[k] {
            duplicates += 1;
        }
        seen[k] = true;
        data[k] = *v;
    }
    if duplicates > 0 {
        return Err(IoError::Validation {
            count: duplicates,
            details: format!("{duplicates} duplicate (time, cell) row(s)"),
        });
    }

    let dates = time_axis
        .iter()
        .map(|&d| from_date32(calendar, d))
        .collect::<Result<Vec<Date>, _>>()?;
    let mut dims = vec![Dim::time(time_column, dates)];
    let mut shape = vec![n_time];
    for (name, axis) in spatial.iter().zip(axes) {
        shape.push(axis.len());
        dims.push(Dim::values(name.as_str(), axis));
    }
    let array = ArrayD::from_shape_vec(IxDyn(&shape), data).map_err(|e| IoError::Grid {
        reason: e.to_string(),
    })?;
    debug!(n_time, n_cells, rows = values.len(), "assembled grid from parquet");

    let mut grid = Grid::new(dims, array)?;
    for (k, v) in &contents.metadata {
        if !k.starts_with(AXIS_KEY_PREFIX) {
            grid = grid.with_attr(k.as_str(), v.as_str());
        }
    }
    Ok(grid)
}

// ---------------------------------------------------------------------------
// Climatology
// ---------------------------------------------------------------------------

/// Assembles a climatology from `doy`, spatial, `thresh` and `seas` columns.
///
/// The axis length is the largest day-of-year present: 366 selects the
/// calendar mode, anything else the time-step mode of that year length.
/// Cells without rows are treated as land.
pub(crate) fn batches_to_climatology(
    contents: &ParquetContents,
    spatial: &[String],
    path: &Path,
) -> Result<ClimatologyGrid, IoError> {
    let mut doy: Vec<u16> = Vec::new();
    let mut thresh: Vec<f64> = Vec::new();
    let mut seas: Vec<f64> = Vec::new();
    for batch in &contents.batches {
        doy.extend(u16_column(batch, "doy", path)?);
        thresh.extend(f64_column(batch, "thresh", path)?);
        seas.extend(f64_column(batch, "seas", path)?);
    }
    let n_slots = doy.iter().copied().max().unwrap_or(0);
    if n_slots == 0 || doy.contains(&0) {
        return Err(IoError::Validation {
            count: 1,
            details: "climatology 'doy' column must hold values starting at 1".to_string(),
        });
    }
    let mode = if usize::from(n_slots) == DOY_SLOTS {
        DoyMode::Calendar
    } else {
        DoyMode::TimeStep {
            year_length: n_slots,
        }
    };

    let rows = spatial_rows(&contents.batches, spatial, path)?;
    let axes = spatial
        .iter()
        .zip(&rows)
        .map(|(name, seen)| spatial_axis(name, seen, &contents.metadata))
        .collect::<Result<Vec<_>, _>>()?;
    let flat = flat_indices(&rows, &axes, spatial, doy.len())?;
    let n_cells: usize = axes.iter().map(Vec::len).product();

    let n = usize::from(n_slots);
    let mut cells: Vec<Option<(Vec<f64>, Vec<f64>)>> = vec![None; n_cells];
    for (((d, th), se), &cell) in doy.iter().zip(&thresh).zip(&seas).zip(&flat) {
        let (t, s) = cells[cell].get_or_insert_with(|| (vec![f64::NAN; n], vec![f64::NAN; n]));
        let i = usize::from(*d) - 1;
        t[i] = *th;
        s[i] = *se;
    }

    let mut valid = Vec::new();
    let mut clims = Vec::new();
    for (i, cell) in cells.into_iter().enumerate() {
        if let Some((t, s)) = cell {
            valid.push(i);
            clims.push(Climatology::new(t, s).map_err(|e| IoError::Grid {
                reason: e.to_string(),
            })?);
        }
    }
    debug!(n_cells, present = valid.len(), n_slots, "assembled climatology from parquet");

    let dims = spatial
        .iter()
        .zip(axes)
        .map(|(name, axis)| Dim::values(name.as_str(), axis))
        .collect();
    let gridded = CellLayout::new(dims, valid).unstack(clims)?;
    let mut out = ClimatologyGrid::new(gridded, mode)?;
    for (k, v) in &contents.metadata {
        if !k.starts_with(AXIS_KEY_PREFIX) {
            out = out.with_attr(k.as_str(), v.as_str());
        }
    }
    Ok(out)
}
