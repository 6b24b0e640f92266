//! Parquet round trips of grids, climatologies and detection output.

use std::fs::File;
use std::path::Path;

use mhw_calendar::{Calendar, Date, year_sequence};
use mhw_grid::{Dim, Grid};
use mhw_io::{
    IoError, ReaderConfig, WriterConfig, read_climatology, read_parquet_grid, write_climatology,
    write_events, write_grid, write_intermediate,
};
use mhw_pipeline::{DetectConfig, DoyMode, PARAMETERS_ATTR, ThresholdConfig, detect, threshold};
use ndarray::{ArrayD, IxDyn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tempfile::tempdir;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Deterministic seasonal cycle with a weekly wobble and a +4 degree spike
/// over 2003-08-01..=2003-08-08.
fn sst(times: &[Date], offset: f64) -> Vec<f64> {
    times
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let phase = 2.0 * std::f64::consts::PI * f64::from(d.ordinal()) / 365.25;
            let wobble = 0.4 * (i as f64 * 0.9).sin() + 0.2 * (i as f64 * 0.13).cos();
            let spike = if d.year() == 2003 && d.month() == 8 && d.day() <= 8 {
                4.0
            } else {
                0.0
            };
            offset + 3.0 * phase.sin() + wobble + spike
        })
        .collect()
}

/// (time, lat=2, lon=2) grid over 2000-2005; cell (0, 1) is land.
fn grid(calendar: Calendar) -> Grid {
    let times = year_sequence(calendar, 2000, 2005);
    let n = times.len();
    let columns: Vec<Vec<f64>> = (0..4)
        .map(|c| {
            if c == 1 {
                vec![f64::NAN; n]
            } else {
                sst(&times, 18.0 + c as f64)
            }
        })
        .collect();
    let mut values = Vec::with_capacity(n * 4);
    for t in 0..n {
        for col in &columns {
            values.push(col[t]);
        }
    }
    Grid::new(
        vec![
            Dim::time("time", times),
            Dim::values("lat", vec![-42.5, -42.25]),
            Dim::values("lon", vec![147.0, 147.25]),
        ],
        ArrayD::from_shape_vec(IxDyn(&[n, 2, 2]), values).unwrap(),
    )
    .unwrap()
    .with_attr("source", "synthetic")
}

fn same_values(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| x == y || (x.is_nan() && y.is_nan()))
}

fn column_names(path: &Path) -> (Vec<String>, usize) {
    let file = File::open(path).unwrap();
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
    let names = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let rows = builder
        .build()
        .unwrap()
        .map(|b| b.unwrap().num_rows())
        .sum();
    (names, rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn grid_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sst.parquet");
    let original = grid(Calendar::Standard);
    write_grid(&path, &original, &WriterConfig::default()).unwrap();

    let back = read_parquet_grid(&path, &ReaderConfig::default()).unwrap();
    assert_eq!(back.dims(), original.dims());
    assert!(same_values(
        back.values().as_slice().unwrap(),
        original.values().as_slice().unwrap()
    ));
    assert_eq!(back.attrs().get("source").map(String::as_str), Some("synthetic"));
}

#[test]
fn noleap_grid_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sst_noleap.parquet");
    let original = grid(Calendar::NoLeap);
    write_grid(&path, &original, &WriterConfig::default()).unwrap();

    let config = ReaderConfig::default().with_calendar(Calendar::NoLeap);
    let back = read_parquet_grid(&path, &config).unwrap();
    let (_, times) = back.time_axis("time").unwrap();
    assert_eq!(times.len(), 6 * 365);
    assert_eq!(times[0].calendar(), Calendar::NoLeap);
    assert_eq!(back.dims(), original.dims());
}

#[test]
fn point_series_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("point.parquet");
    let times = year_sequence(Calendar::Standard, 2001, 2002);
    let values = sst(&times, 15.0);
    let original = Grid::from_series("time", times, values).unwrap();
    write_grid(&path, &original, &WriterConfig::default()).unwrap();

    let (names, rows) = column_names(&path);
    assert_eq!(names, vec!["time", "sst"]);
    assert_eq!(rows, 730);

    let config = ReaderConfig::default().with_spatial_columns(vec![]);
    let back = read_parquet_grid(&path, &config).unwrap();
    assert_eq!(back.shape(), original.shape());
    assert!(same_values(
        back.values().as_slice().unwrap(),
        original.values().as_slice().unwrap()
    ));
}

#[test]
fn climatology_round_trip_keeps_land_and_parameters() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("clim.parquet");
    let g = grid(Calendar::Standard);
    let clim = threshold(&g, &ThresholdConfig::new()).unwrap();
    write_climatology(&path, &clim, &WriterConfig::default()).unwrap();

    let (names, rows) = column_names(&path);
    assert_eq!(names, vec!["doy", "lat", "lon", "thresh", "seas"]);
    assert_eq!(rows, 3 * 366);

    let back = read_climatology(&path, &ReaderConfig::default()).unwrap();
    assert_eq!(back.mode(), DoyMode::Calendar);
    assert_eq!(back.shape(), vec![2, 2]);
    assert!(back.cell(1).is_none());
    for flat in [0, 2, 3] {
        let a = clim.cell(flat).unwrap();
        let b = back.cell(flat).unwrap();
        assert!(same_values(a.thresh(), b.thresh()));
        assert!(same_values(a.seas(), b.seas()));
    }
    assert_eq!(back.parameters(), clim.parameters());
    assert_eq!(back.attrs().get("source").map(String::as_str), Some("synthetic"));
}

#[test]
fn detection_from_stored_climatology_matches() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("clim.parquet");
    let g = grid(Calendar::Standard);
    let clim = threshold(&g, &ThresholdConfig::new()).unwrap();
    write_climatology(&path, &clim, &WriterConfig::default()).unwrap();
    let back = read_climatology(&path, &ReaderConfig::default()).unwrap();

    let config = DetectConfig::new();
    let direct = detect(&g, &clim, &config).unwrap();
    let stored = detect(&g, &back, &config).unwrap();
    assert_eq!(direct.events.cells(), stored.events.cells());
    assert!(direct.n_events() > 0);
}

#[test]
fn event_table_has_one_row_per_event() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.parquet");
    let g = grid(Calendar::Standard);
    let clim = threshold(&g, &ThresholdConfig::new()).unwrap();
    let found = detect(&g, &clim, &DetectConfig::new()).unwrap();
    write_events(&path, &found, &WriterConfig::default()).unwrap();

    let (names, rows) = column_names(&path);
    assert_eq!(rows, found.n_events());
    assert_eq!(&names[..3], &["lat", "lon", "event"]);
    for expected in ["date_peak", "intensity_max_relThresh", "category", "rate_decline"] {
        assert!(names.iter().any(|n| n == expected), "missing {expected}");
    }

    let file = File::open(&path).unwrap();
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
    let kv = builder.metadata().file_metadata().key_value_metadata().unwrap();
    let params = kv.iter().find(|k| k.key == PARAMETERS_ATTR).unwrap();
    assert!(params.value.as_deref().unwrap().contains("minimum duration"));
}

#[test]
fn intermediate_table_covers_every_step() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("intermediate.parquet");
    let g = grid(Calendar::Standard);
    let clim = threshold(&g, &ThresholdConfig::new()).unwrap();
    let found = detect(&g, &clim, &DetectConfig::new().with_intermediate(true)).unwrap();
    write_intermediate(&path, &found, &WriterConfig::default()).unwrap();

    let (names, rows) = column_names(&path);
    assert_eq!(rows, 3 * found.times.len());
    assert!(names.iter().any(|n| n == "relThreshNorm"));
    assert!(names.iter().any(|n| n == "exceed"));
}

#[test]
fn intermediate_requires_intermediate_output() {
    let dir = tempdir().unwrap();
    let g = grid(Calendar::Standard);
    let clim = threshold(&g, &ThresholdConfig::new()).unwrap();
    let found = detect(&g, &clim, &DetectConfig::new()).unwrap();
    let err = write_intermediate(&dir.path().join("x.parquet"), &found, &WriterConfig::default())
        .unwrap_err();
    assert!(matches!(err, IoError::Validation { .. }));
}

#[test]
fn missing_value_column_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sst.parquet");
    write_grid(&path, &grid(Calendar::Standard), &WriterConfig::default()).unwrap();
    let config = ReaderConfig::default().with_value_column("analysed_sst");
    match read_parquet_grid(&path, &config).unwrap_err() {
        IoError::MissingVariable { name, .. } => assert_eq!(name, "analysed_sst"),
        other => panic!("expected MissingVariable, got {other:?}"),
    }
}
