//! Labeled N-dimensional array with one date-valued time dimension.

use std::collections::{BTreeMap, HashSet};

use mhw_calendar::{Calendar, Date};
use ndarray::{ArrayD, Axis, IxDyn};

use crate::error::GridError;

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

/// Coordinate labels along one dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum Coords {
    /// Numeric labels (latitude, longitude, depth, station id, ...).
    Values(Vec<f64>),
    /// Calendar dates.
    Time(Vec<Date>),
}

impl Coords {
    /// Number of labels.
    pub fn len(&self) -> usize {
        match self {
            Self::Values(v) => v.len(),
            Self::Time(t) => t.len(),
        }
    }

    /// Whether there are no labels.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named dimension with its coordinate labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Dim {
    name: String,
    coords: Coords,
}

impl Dim {
    /// Dimension with numeric coordinates.
    pub fn values(name: impl Into<String>, coords: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            coords: Coords::Values(coords),
        }
    }

    /// Dimension with date coordinates.
    pub fn time(name: impl Into<String>, dates: Vec<Date>) -> Self {
        Self {
            name: name.into(),
            coords: Coords::Time(dates),
        }
    }

    /// Dimension name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Coordinate labels.
    pub fn coords(&self) -> &Coords {
        &self.coords
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Whether the dimension has zero length.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Numeric labels, or `None` for a time dimension.
    pub fn numeric(&self) -> Option<&[f64]> {
        match &self.coords {
            Coords::Values(v) => Some(v),
            Coords::Time(_) => None,
        }
    }

    /// Date labels, or `None` for a numeric dimension.
    pub fn dates(&self) -> Option<&[Date]> {
        match &self.coords {
            Coords::Time(t) => Some(t),
            Coords::Values(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// Labeled array of `f64` values, missing data encoded as NaN.
///
/// Axis `i` of `values` corresponds to `dims[i]`. Free-form string
/// attributes (units, long names, provenance) travel with the grid.
#[derive(Debug, Clone)]
pub struct Grid {
    dims: Vec<Dim>,
    values: ArrayD<f64>,
    attrs: BTreeMap<String, String>,
}

impl Grid {
    /// Creates a grid after checking names are unique and the shape matches
    /// the coordinate lengths.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::DuplicateDimension`] or [`GridError::ShapeMismatch`].
    pub fn new(dims: Vec<Dim>, values: ArrayD<f64>) -> Result<Self, GridError> {
        let mut seen = HashSet::new();
        for d in &dims {
            if !seen.insert(d.name.as_str()) {
                return Err(GridError::DuplicateDimension {
                    name: d.name.clone(),
                });
            }
        }
        let expected: Vec<usize> = dims.iter().map(Dim::len).collect();
        if expected != values.shape() {
            return Err(GridError::ShapeMismatch {
                expected,
                got: values.shape().to_vec(),
            });
        }
        Ok(Self {
            dims,
            values,
            attrs: BTreeMap::new(),
        })
    }

    /// Single time series with no spatial dimensions.
    pub fn from_series(tdim: &str, times: Vec<Date>, values: Vec<f64>) -> Result<Self, GridError> {
        let n = values.len();
        let arr = ArrayD::from_shape_vec(IxDyn(&[n]), values).map_err(|_| {
            GridError::ShapeMismatch {
                expected: vec![times.len()],
                got: vec![n],
            }
        })?;
        Self::new(vec![Dim::time(tdim, times)], arr)
    }

    /// Adds or replaces an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Dimensions in axis order.
    pub fn dims(&self) -> &[Dim] {
        &self.dims
    }

    /// Underlying values.
    pub fn values(&self) -> &ArrayD<f64> {
        &self.values
    }

    /// Grid attributes.
    pub fn attrs(&self) -> &BTreeMap<String, String> {
        &self.attrs
    }

    /// Shape of the values array.
    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    /// Axis index of a named dimension.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::MissingTimeDimension`] if no dimension has that name.
    pub fn axis_of(&self, name: &str) -> Result<usize, GridError> {
        self.dims
            .iter()
            .position(|d| d.name == name)
            .ok_or_else(|| GridError::MissingTimeDimension {
                name: name.to_string(),
                available: self
                    .dims
                    .iter()
                    .map(|d| d.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Axis index and dates of the time dimension `tdim`.
    pub fn time_axis(&self, tdim: &str) -> Result<(usize, &[Date]), GridError> {
        let axis = self.axis_of(tdim)?;
        let dates = self.dims[axis]
            .dates()
            .ok_or_else(|| GridError::NotATimeDimension {
                name: tdim.to_string(),
            })?;
        Ok((axis, dates))
    }

    /// Calendar of the time dimension (standard for an empty axis).
    pub fn calendar(&self, tdim: &str) -> Result<Calendar, GridError> {
        let (_, dates) = self.time_axis(tdim)?;
        Ok(dates.first().map(|d| d.calendar()).unwrap_or_default())
    }

    /// Restricts the time dimension to whole years `first..=last`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyTimeRange`] if no time step falls in range.
    pub fn select_years(&self, tdim: &str, first: i32, last: i32) -> Result<Self, GridError> {
        let (axis, dates) = self.time_axis(tdim)?;
        let keep: Vec<usize> = dates
            .iter()
            .enumerate()
            .filter(|(_, d)| (first..=last).contains(&d.year()))
            .map(|(i, _)| i)
            .collect();
        if keep.is_empty() {
            return Err(GridError::EmptyTimeRange { first, last });
        }
        let kept_dates: Vec<Date> = keep.iter().map(|&i| dates[i]).collect();
        let mut dims = self.dims.clone();
        dims[axis] = Dim::time(tdim, kept_dates);
        Ok(Self {
            dims,
            values: self.values.select(Axis(axis), &keep),
            attrs: self.attrs.clone(),
        })
    }
}
