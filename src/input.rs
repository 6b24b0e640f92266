//! Shared loading steps of the subcommands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use mhw_io::{ReaderConfig, read_parquet_grid};
use mhw_pipeline::Grid;
use tracing::info;

use crate::config::MhwConfig;

/// Reads and parses the TOML configuration file.
pub fn load_config(path: &Path) -> Result<MhwConfig> {
    let toml_str = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    toml::from_str(&toml_str).context("failed to parse TOML config")
}

/// Picks the CLI override, then the config value.
pub fn resolve(
    cli: Option<PathBuf>,
    config: Option<&PathBuf>,
    what: &str,
    key: &str,
) -> Result<PathBuf> {
    cli.or_else(|| config.cloned())
        .ok_or_else(|| anyhow!("no {what} path: set [io].{key} in config or pass it on the command line"))
}

fn is_netcdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "nc" | "nc4" | "netcdf"))
}

/// Reads the SST grid, choosing the format from the file extension.
pub fn read_sst(path: &Path, reader: &ReaderConfig) -> Result<Grid> {
    info!(path = %path.display(), "reading sea surface temperature");
    if is_netcdf(path) {
        return read_netcdf_sst(path, reader);
    }
    read_parquet_grid(path, reader)
        .with_context(|| format!("failed to read Parquet: {}", path.display()))
}

#[cfg(feature = "netcdf")]
fn read_netcdf_sst(path: &Path, reader: &ReaderConfig) -> Result<Grid> {
    mhw_io::read_netcdf(path, reader)
        .with_context(|| format!("failed to read NetCDF: {}", path.display()))
}

#[cfg(not(feature = "netcdf"))]
fn read_netcdf_sst(path: &Path, _reader: &ReaderConfig) -> Result<Grid> {
    anyhow::bail!(
        "{} looks like NetCDF but mhw was built without the `netcdf` feature",
        path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn netcdf_extensions() {
        assert!(is_netcdf(Path::new("sst.nc")));
        assert!(is_netcdf(Path::new("/data/OISST.NC4")));
        assert!(!is_netcdf(Path::new("sst.parquet")));
        assert!(!is_netcdf(Path::new("sst")));
    }

    #[test]
    fn cli_path_wins() {
        let cfg = PathBuf::from("config.parquet");
        let got = resolve(Some("cli.parquet".into()), Some(&cfg), "input", "input").unwrap();
        assert_eq!(got, PathBuf::from("cli.parquet"));
        let got = resolve(None, Some(&cfg), "input", "input").unwrap();
        assert_eq!(got, cfg);
        assert!(resolve(None, None, "input", "input").is_err());
    }
}
