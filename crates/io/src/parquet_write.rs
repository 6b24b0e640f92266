//! Low-level Parquet column building.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Date32Array, Float64Array, RecordBatch, StringArray, UInt16Array,
    UInt64Array,
};
use arrow::datatypes::{DataType, Field, Schema};
use mhw_grid::{Dim, Grid};
use mhw_pipeline::{ClimatologyGrid, Detection, Gridded, Intermediate};
use ndarray::IxDyn;
use parquet::arrow::ArrowWriter;
use parquet::file::metadata::KeyValue;
use parquet::file::properties::WriterProperties;

use crate::dates::to_date32;
use crate::error::IoError;
use crate::parquet_read::AXIS_KEY_PREFIX;

/// Float64 columns of the event table, in output order.
const EVENT_INTENSITY_COLUMNS: [&str; 12] = [
    "intensity_max",
    "intensity_mean",
    "intensity_var",
    "intensity_cumulative",
    "intensity_max_relThresh",
    "intensity_mean_relThresh",
    "intensity_var_relThresh",
    "intensity_cumulative_relThresh",
    "intensity_max_abs",
    "intensity_mean_abs",
    "intensity_var_abs",
    "intensity_cumulative_abs",
];

/// Per-category duration columns, Moderate first.
const EVENT_DURATION_COLUMNS: [&str; 4] = [
    "duration_moderate",
    "duration_strong",
    "duration_severe",
    "duration_extreme",
];

fn spatial_fields(dims: &[Dim]) -> Vec<Field> {
    dims.iter()
        .map(|d| Field::new(d.name(), DataType::Float64, false))
        .collect()
}

/// One coordinate vector per spatial dimension.
struct CoordColumns(Vec<Vec<f64>>);

impl CoordColumns {
    fn new(n_dims: usize) -> Self {
        Self(vec![Vec::new(); n_dims])
    }

    fn push(&mut self, coords: &[f64]) {
        for (col, &c) in self.0.iter_mut().zip(coords) {
            col.push(c);
        }
    }

    fn into_arrays(self) -> Vec<ArrayRef> {
        self.0
            .into_iter()
            .map(|c| Arc::new(Float64Array::from(c)) as ArrayRef)
            .collect()
    }
}

fn f64_array(values: Vec<f64>) -> ArrayRef {
    Arc::new(Float64Array::from(values))
}

fn u64_array(values: Vec<u64>) -> ArrayRef {
    Arc::new(UInt64Array::from(values))
}

fn date32_array(values: Vec<i32>) -> ArrayRef {
    Arc::new(Date32Array::from(values))
}

fn to_batch(schema: &Schema, columns: Vec<ArrayRef>) -> Result<RecordBatch, IoError> {
    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// File metadata recording the full spatial axes and `attrs`.
pub(crate) fn file_metadata(dims: &[Dim], attrs: &BTreeMap<String, String>) -> Vec<KeyValue> {
    let axes = dims.iter().filter_map(|d| {
        d.numeric().map(|coords| {
            let text = coords
                .iter()
                .map(f64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            KeyValue::new(format!("{AXIS_KEY_PREFIX}{}", d.name()), text)
        })
    });
    attrs
        .iter()
        .map(|(k, v)| KeyValue::new(k.clone(), v.clone()))
        .chain(axes)
        .collect()
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// Long-format table of a grid: `tdim` (Date32), one column per spatial
/// dimension, and `value_column`. Every (time, cell) pair is a row.
pub(crate) fn grid_to_batch(
    grid: &Grid,
    tdim: &str,
    value_column: &str,
) -> Result<(Schema, RecordBatch), IoError> {
    let (axis, dates) = grid.time_axis(tdim)?;
    let spatial: Vec<Dim> = grid
        .dims()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != axis)
        .map(|(_, d)| d.clone())
        .collect();

    let mut fields = vec![Field::new(tdim, DataType::Date32, false)];
    fields.extend(spatial_fields(&spatial));
    fields.push(Field::new(value_column, DataType::Float64, true));
    let schema = Schema::new(fields);

    let day_numbers = dates
        .iter()
        .map(|&d| to_date32(d))
        .collect::<Result<Vec<_>, _>>()?;
    let order: Vec<usize> = std::iter::once(axis)
        .chain((0..grid.dims().len()).filter(|&i| i != axis))
        .collect();
    let permuted = grid.values().view().permuted_axes(IxDyn(&order));

    let n = grid.values().len();
    let mut time_col = Vec::with_capacity(n);
    let mut coords = CoordColumns::new(spatial.len());
    let mut values = Vec::with_capacity(n);
    let mut point = vec![0.0; spatial.len()];
    for (idx, &v) in permuted.indexed_iter() {
        time_col.push(day_numbers[idx[0]]);
        for (k, d) in spatial.iter().enumerate() {
            let i = idx[k + 1];
            point[k] = d.numeric().map_or(i as f64, |c| c[i]);
        }
        coords.push(&point);
        values.push(v);
    }

    let mut columns = vec![date32_array(time_col)];
    columns.extend(coords.into_arrays());
    columns.push(f64_array(values));
    let batch = to_batch(&schema, columns)?;
    Ok((schema, batch))
}

// ---------------------------------------------------------------------------
// Climatology
// ---------------------------------------------------------------------------

/// Climatology table: `doy`, spatial coordinates, `thresh`, `seas`; one row
/// per day-of-year of every ocean cell.
pub(crate) fn climatology_to_batch(
    clim: &ClimatologyGrid,
) -> Result<(Schema, RecordBatch), IoError> {
    let dims = clim.clim().dims();
    let mut fields = vec![Field::new("doy", DataType::UInt16, false)];
    fields.extend(spatial_fields(dims));
    fields.push(Field::new("thresh", DataType::Float64, true));
    fields.push(Field::new("seas", DataType::Float64, true));
    let schema = Schema::new(fields);

    let mut doy = Vec::new();
    let mut coords = CoordColumns::new(dims.len());
    let mut thresh = Vec::new();
    let mut seas = Vec::new();
    for (flat, cell) in clim.clim().iter() {
        let point = clim.clim().coords_of(flat);
        for (slot, (&t, &s)) in cell.thresh().iter().zip(cell.seas()).enumerate() {
            doy.push(slot as u16 + 1);
            coords.push(&point);
            thresh.push(t);
            seas.push(s);
        }
    }

    let mut columns: Vec<ArrayRef> = vec![Arc::new(UInt16Array::from(doy))];
    columns.extend(coords.into_arrays());
    columns.push(f64_array(thresh));
    columns.push(f64_array(seas));
    let batch = to_batch(&schema, columns)?;
    Ok((schema, batch))
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Event table: spatial coordinates followed by one column per event
/// property; one row per event.
pub(crate) fn events_to_batch(detection: &Detection) -> Result<(Schema, RecordBatch), IoError> {
    let dims = detection.events.dims();
    let mut fields = spatial_fields(dims);
    for name in ["event", "start", "end", "duration"] {
        fields.push(Field::new(name, DataType::UInt64, false));
    }
    for name in ["date_start", "date_peak", "date_end"] {
        fields.push(Field::new(name, DataType::Date32, false));
    }
    fields.push(Field::new("index_peak", DataType::UInt64, false));
    for name in EVENT_INTENSITY_COLUMNS {
        fields.push(Field::new(name, DataType::Float64, true));
    }
    fields.push(Field::new("category", DataType::Utf8, false));
    for name in EVENT_DURATION_COLUMNS {
        fields.push(Field::new(name, DataType::UInt64, false));
    }
    fields.push(Field::new("rate_onset", DataType::Float64, true));
    fields.push(Field::new("rate_decline", DataType::Float64, true));
    let schema = Schema::new(fields);

    let mut coords = CoordColumns::new(dims.len());
    let mut indices: [Vec<u64>; 5] = Default::default();
    let mut dates: [Vec<i32>; 3] = Default::default();
    let mut intensities: [Vec<f64>; 12] = Default::default();
    let mut durations: [Vec<u64>; 4] = Default::default();
    let mut categories: Vec<&'static str> = Vec::new();
    let mut rates: [Vec<f64>; 2] = Default::default();

    for (flat, events) in detection.events.iter() {
        let point = detection.events.coords_of(flat);
        for ev in events {
            coords.push(&point);
            let idx = [ev.event, ev.start, ev.end, ev.duration, ev.index_peak];
            for (col, v) in indices.iter_mut().zip(idx) {
                col.push(v as u64);
            }
            for (col, d) in dates.iter_mut().zip([ev.date_start, ev.date_peak, ev.date_end]) {
                col.push(to_date32(d)?);
            }
            let values = [
                ev.intensity_max,
                ev.intensity_mean,
                ev.intensity_var,
                ev.intensity_cumulative,
                ev.intensity_max_rel_thresh,
                ev.intensity_mean_rel_thresh,
                ev.intensity_var_rel_thresh,
                ev.intensity_cumulative_rel_thresh,
                ev.intensity_max_abs,
                ev.intensity_mean_abs,
                ev.intensity_var_abs,
                ev.intensity_cumulative_abs,
            ];
            for (col, v) in intensities.iter_mut().zip(values) {
                col.push(v);
            }
            categories.push(ev.category.name());
            for (col, v) in durations.iter_mut().zip(ev.category_durations()) {
                col.push(v as u64);
            }
            rates[0].push(ev.rate_onset);
            rates[1].push(ev.rate_decline);
        }
    }

    let [event, start, end, duration, index_peak] = indices;
    let mut columns = coords.into_arrays();
    columns.extend([event, start, end, duration].map(u64_array));
    columns.extend(dates.map(date32_array));
    columns.push(u64_array(index_peak));
    columns.extend(intensities.map(f64_array));
    columns.push(Arc::new(StringArray::from(categories)));
    columns.extend(durations.map(u64_array));
    columns.extend(rates.map(f64_array));
    let batch = to_batch(&schema, columns)?;
    Ok((schema, batch))
}

// ---------------------------------------------------------------------------
// Intermediate
// ---------------------------------------------------------------------------

/// Per-time-step table: spatial coordinates, `time`, input series,
/// exceedance, event label and anomaly frames; one row per step per cell.
pub(crate) fn intermediate_to_batch(
    inter: &Gridded<Intermediate>,
    detection: &Detection,
) -> Result<(Schema, RecordBatch), IoError> {
    let dims = inter.dims();
    let mut fields = spatial_fields(dims);
    fields.push(Field::new("time", DataType::Date32, false));
    for name in ["ts", "seas", "thresh"] {
        fields.push(Field::new(name, DataType::Float64, true));
    }
    fields.push(Field::new("exceed", DataType::Boolean, false));
    fields.push(Field::new("event", DataType::UInt64, true));
    for name in ["relSeas", "relThresh", "relThreshNorm", "severity"] {
        fields.push(Field::new(name, DataType::Float64, true));
    }
    let schema = Schema::new(fields);

    let day_numbers = detection
        .times
        .iter()
        .map(|&d| to_date32(d))
        .collect::<Result<Vec<_>, _>>()?;

    let mut coords = CoordColumns::new(dims.len());
    let mut time = Vec::new();
    let mut frames: [Vec<f64>; 7] = Default::default();
    let mut exceed = Vec::new();
    let mut event: Vec<Option<u64>> = Vec::new();

    for (flat, cell) in inter.iter() {
        let point = inter.coords_of(flat);
        let sources = [
            &cell.ts,
            &cell.seas,
            &cell.thresh,
            &cell.rel_seas,
            &cell.rel_thresh,
            &cell.rel_thresh_norm,
            &cell.cats,
        ];
        for (t, &day) in day_numbers.iter().enumerate().take(cell.ts.len()) {
            coords.push(&point);
            time.push(day);
            for (col, src) in frames.iter_mut().zip(sources) {
                col.push(src[t]);
            }
            exceed.push(cell.exceed[t]);
            event.push(cell.labels.event[t].map(|e| e as u64));
        }
    }

    let [ts, seas, thresh, rel_seas, rel_thresh, rel_thresh_norm, cats] = frames;
    let mut columns = coords.into_arrays();
    columns.push(date32_array(time));
    columns.extend([ts, seas, thresh].map(f64_array));
    columns.push(Arc::new(BooleanArray::from(exceed)));
    columns.push(Arc::new(UInt64Array::from(event)));
    columns.extend([rel_seas, rel_thresh, rel_thresh_norm, cats].map(f64_array));
    let batch = to_batch(&schema, columns)?;
    Ok((schema, batch))
}

/// Writes a sequence of [`RecordBatch`]es to a Parquet file at `path`.
///
/// # Errors
///
/// Returns [`IoError::Parquet`] if file creation, batch writing, or file
/// finalisation fails.
pub(crate) fn write_batches(
    path: &Path,
    batches: &[RecordBatch],
    schema: &Schema,
    props: WriterProperties,
) -> Result<(), IoError> {
    let file = std::fs::File::create(path).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })?;
    let mut writer = ArrowWriter::try_new(file, Arc::new(schema.clone()), Some(props))?;

    for batch in batches {
        writer.write(batch)?;
    }

    writer.close()?;
    Ok(())
}
