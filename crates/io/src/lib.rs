//! # mhw-io
//!
//! Read sea surface temperature grids from Parquet or NetCDF and write
//! climatologies, event tables and per-step diagnostics to Parquet. Bridges
//! external file formats into the [`mhw_grid::Grid`] and
//! [`mhw_pipeline::ClimatologyGrid`] types used by detection.
//!
//! Parquet tables are long format: one row per time step (or day-of-year,
//! or event) and cell, with one column per spatial coordinate. The full
//! spatial axes and any attributes travel as file key-value metadata, so
//! cells that are entirely land survive a round trip.
//!
//! NetCDF input requires the `netcdf` feature.

mod dates;
mod error;
#[cfg(feature = "netcdf")]
mod netcdf_read;
mod parquet_read;
mod parquet_write;
mod reader;
mod writer;

pub use error::IoError;
#[cfg(feature = "netcdf")]
pub use reader::read_netcdf;
pub use reader::{ReaderConfig, read_climatology, read_parquet_grid};
pub use writer::{
    Compression, WriterConfig, write_climatology, write_events, write_grid, write_intermediate,
};
