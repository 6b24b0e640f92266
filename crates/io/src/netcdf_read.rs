//! Low-level NetCDF extraction helpers.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use mhw_calendar::{Calendar, Date};
use netcdf::AttributeValue;

use crate::error::IoError;

/// Open a NetCDF file at `path`, returning [`IoError::FileNotFound`] if the
/// path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Read a 1-D `f64` variable, trying each alias in order.
///
/// Returns the data from the first alias that matches. If none match,
/// returns [`IoError::MissingVariable`] with the first alias as the name.
pub(crate) fn read_1d_f64(
    file: &netcdf::File,
    aliases: &[&str],
    path: &Path,
) -> Result<Vec<f64>, IoError> {
    for &alias in aliases {
        if let Some(var) = file.variable(alias) {
            return Ok(var.get_values::<f64, _>(..)?);
        }
    }

    let name = aliases.first().copied().unwrap_or("unknown");
    Err(IoError::MissingVariable {
        name: name.to_string(),
        path: path.to_path_buf(),
    })
}

/// An n-D variable with its dimension names, in storage order.
#[derive(Debug)]
pub(crate) struct RawVariable {
    pub dims: Vec<(String, usize)>,
    pub data: Vec<f64>,
}

/// Reads a variable of any rank, replacing `_FillValue` and
/// `missing_value` entries with NaN.
pub(crate) fn read_nd_f64(
    file: &netcdf::File,
    var_name: &str,
    path: &Path,
) -> Result<RawVariable, IoError> {
    let var = file
        .variable(var_name)
        .ok_or_else(|| IoError::MissingVariable {
            name: var_name.to_string(),
            path: path.to_path_buf(),
        })?;

    let dims = var
        .dimensions()
        .iter()
        .map(|d| (d.name(), d.len()))
        .collect();
    let mut data = var.get_values::<f64, _>(..)?;

    let fills: Vec<f64> = ["_FillValue", "missing_value"]
        .iter()
        .filter_map(|name| var.attribute_value(name).and_then(Result::ok))
        .filter_map(attribute_f64)
        .collect();
    if !fills.is_empty() {
        for v in &mut data {
            if fills.contains(v) {
                *v = f64::NAN;
            }
        }
    }
    Ok(RawVariable { dims, data })
}

fn attribute_f64(value: AttributeValue) -> Option<f64> {
    match value {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(f64::from(v)),
        AttributeValue::Int(v) => Some(f64::from(v)),
        AttributeValue::Short(v) => Some(f64::from(v)),
        _ => None,
    }
}

/// Global string attributes of the file.
pub(crate) fn global_attributes(file: &netcdf::File) -> BTreeMap<String, String> {
    file.attributes()
        .filter_map(|attr| match attr.value() {
            Ok(AttributeValue::Str(s)) => Some((attr.name().to_string(), s)),
            _ => None,
        })
        .collect()
}

/// Unit of a CF time offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimeUnit {
    Days,
    Hours,
    Seconds,
}

impl TimeUnit {
    fn per_day(self) -> f64 {
        match self {
            Self::Days => 1.0,
            Self::Hours => 24.0,
            Self::Seconds => 86_400.0,
        }
    }
}

/// Parsed `units` and `calendar` attributes of a time variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TimeEncoding {
    pub unit: TimeUnit,
    pub base: NaiveDate,
    pub calendar: Calendar,
}

/// Parses a CF units string like `"days since 1981-09-01"` or
/// `"hours since 1900-01-01 00:00:00"`.
pub(crate) fn parse_time_units(units: &str) -> Result<(TimeUnit, NaiveDate), IoError> {
    let parts: Vec<&str> = units.splitn(3, ' ').collect();
    if parts.len() < 3 || parts[1] != "since" {
        return Err(IoError::InvalidTime {
            reason: format!("unexpected time units format: '{units}'"),
        });
    }
    let unit = match parts[0] {
        "days" | "day" => TimeUnit::Days,
        "hours" | "hour" => TimeUnit::Hours,
        "seconds" | "second" => TimeUnit::Seconds,
        other => {
            return Err(IoError::InvalidTime {
                reason: format!("unsupported time unit '{other}'"),
            });
        }
    };

    // Take only the date portion (first 10 characters of parts[2]).
    let date_str = parts[2].get(..10).unwrap_or(parts[2]);
    let base =
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| IoError::InvalidTime {
            reason: format!("failed to parse base date '{date_str}': {e}"),
        })?;
    Ok((unit, base))
}

/// Read the `units` and optional `calendar` attributes from a time variable.
///
/// The calendar defaults to `"standard"` when the attribute is absent.
pub(crate) fn read_time_encoding(
    file: &netcdf::File,
    time_var: &str,
    path: &Path,
) -> Result<TimeEncoding, IoError> {
    let var = file
        .variable(time_var)
        .ok_or_else(|| IoError::MissingVariable {
            name: time_var.to_string(),
            path: path.to_path_buf(),
        })?;

    let units: String = var
        .attribute_value("units")
        .ok_or_else(|| IoError::InvalidTime {
            reason: format!("time variable '{time_var}' has no 'units' attribute"),
        })?
        .map_err(|e| IoError::InvalidTime {
            reason: format!("failed to read 'units' attribute: {e}"),
        })?
        .try_into()
        .map_err(|e: netcdf::Error| IoError::InvalidTime {
            reason: format!("'units' attribute is not a string: {e}"),
        })?;
    let (unit, base) = parse_time_units(&units)?;

    let calendar = match var.attribute_value("calendar").and_then(Result::ok) {
        Some(AttributeValue::Str(name)) => Calendar::from_cf_name(&name)?,
        _ => Calendar::Standard,
    };

    Ok(TimeEncoding {
        unit,
        base,
        calendar,
    })
}

/// Converts time offsets into dates of the encoding's calendar.
///
/// Offsets are truncated to whole days.
pub(crate) fn offsets_to_dates(
    encoding: &TimeEncoding,
    offsets: &[f64],
) -> Result<Vec<Date>, IoError> {
    let b = encoding.base;
    let month = u8::try_from(b.month()).map_err(|e| IoError::InvalidTime {
        reason: e.to_string(),
    })?;
    let day = u8::try_from(b.day()).map_err(|e| IoError::InvalidTime {
        reason: e.to_string(),
    })?;
    let epoch = Date::new(encoding.calendar, b.year(), month, day)?;
    offsets
        .iter()
        .map(|&offset| {
            if !offset.is_finite() {
                return Err(IoError::InvalidTime {
                    reason: format!("non-finite time offset {offset}"),
                });
            }
            let days = (offset / encoding.unit.per_day()).floor() as i64;
            Ok(Date::from_days_since(epoch, days)?)
        })
        .collect()
}
