//! Stacking spatial dimensions into a single cell axis and back.

use mhw_calendar::{Calendar, Date};
use ndarray::{Array2, ArrayView1, Axis, IxDyn};
use tracing::info;

use crate::error::GridError;
use crate::grid::{Dim, Grid};
use crate::interpolate::interpolate_na;

// ---------------------------------------------------------------------------
// CellLayout
// ---------------------------------------------------------------------------

/// Reversible mapping between the stacked cell axis and the original
/// spatial dimensions.
///
/// Flat indices enumerate the full spatial grid in row-major order over
/// `dims`; `valid` lists the flat indices that survived filtering, in
/// increasing order.
#[derive(Debug, Clone, PartialEq)]
pub struct CellLayout {
    dims: Vec<Dim>,
    valid: Vec<usize>,
}

impl CellLayout {
    /// Layout over `dims` keeping the given flat indices.
    pub fn new(dims: Vec<Dim>, valid: Vec<usize>) -> Self {
        Self { dims, valid }
    }

    /// Spatial dimensions in row-major order.
    pub fn dims(&self) -> &[Dim] {
        &self.dims
    }

    /// Flat indices of the kept cells.
    pub fn valid(&self) -> &[usize] {
        &self.valid
    }

    /// Number of kept cells.
    pub fn n_cells(&self) -> usize {
        self.valid.len()
    }

    /// Number of cells in the full spatial grid (1 with no spatial dims).
    pub fn n_total(&self) -> usize {
        self.dims.iter().map(Dim::len).product()
    }

    /// Spatial shape.
    pub fn shape(&self) -> Vec<usize> {
        self.dims.iter().map(Dim::len).collect()
    }

    /// Per-dimension indices of a flat cell index.
    pub fn unravel(&self, flat: usize) -> Vec<usize> {
        unravel(&self.shape(), flat)
    }

    /// Coordinate values of a flat cell index, one per spatial dimension.
    pub fn coords_of(&self, flat: usize) -> Vec<f64> {
        coords_of(&self.dims, flat)
    }

    /// Scatters per-valid-cell results back onto the full spatial grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::CellCountMismatch`] if `results` does not have one
    /// entry per kept cell.
    pub fn unstack<T>(&self, results: Vec<T>) -> Result<Gridded<T>, GridError> {
        if results.len() != self.valid.len() {
            return Err(GridError::CellCountMismatch {
                expected: self.valid.len(),
                got: results.len(),
            });
        }
        let mut cells: Vec<Option<T>> = (0..self.n_total()).map(|_| None).collect();
        for (&flat, r) in self.valid.iter().zip(results) {
            cells[flat] = Some(r);
        }
        Ok(Gridded {
            dims: self.dims.clone(),
            cells,
        })
    }
}

fn unravel(shape: &[usize], mut flat: usize) -> Vec<usize> {
    let mut idx = vec![0; shape.len()];
    for (i, &n) in shape.iter().enumerate().rev() {
        if n > 0 {
            idx[i] = flat % n;
            flat /= n;
        }
    }
    idx
}

fn coords_of(dims: &[Dim], flat: usize) -> Vec<f64> {
    let shape: Vec<usize> = dims.iter().map(Dim::len).collect();
    unravel(&shape, flat)
        .into_iter()
        .zip(dims)
        .map(|(i, d)| d.numeric().map_or(i as f64, |c| c[i]))
        .collect()
}

// ---------------------------------------------------------------------------
// StackedCells
// ---------------------------------------------------------------------------

/// Valid cells as columns of a `(time, cell)` matrix.
#[derive(Debug, Clone)]
pub struct StackedCells {
    tdim: String,
    times: Vec<Date>,
    layout: CellLayout,
    data: Array2<f64>,
}

impl StackedCells {
    /// Name of the time dimension the cells were stacked from.
    pub fn tdim(&self) -> &str {
        &self.tdim
    }

    /// Time coordinates.
    pub fn times(&self) -> &[Date] {
        &self.times
    }

    /// Calendar of the time axis.
    pub fn calendar(&self) -> Calendar {
        self.times.first().map(|d| d.calendar()).unwrap_or_default()
    }

    /// Cell layout for unstacking.
    pub fn layout(&self) -> &CellLayout {
        &self.layout
    }

    /// `(time, cell)` data matrix.
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Number of valid cells.
    pub fn n_cells(&self) -> usize {
        self.layout.n_cells()
    }

    /// Time series of the `i`-th valid cell.
    pub fn column(&self, i: usize) -> ArrayView1<'_, f64> {
        self.data.column(i)
    }

    /// Time series of the `i`-th valid cell as an owned vector.
    pub fn series(&self, i: usize) -> Vec<f64> {
        self.data.column(i).to_vec()
    }

    /// Multiplies every value by -1.
    pub fn negate(&mut self) {
        self.data.mapv_inplace(|v| -v);
    }

    /// Linearly fills runs of at most `max_pad` missing values in every cell.
    pub fn interpolate(&mut self, max_pad: usize) {
        for mut col in self.data.columns_mut() {
            let mut series = col.to_vec();
            interpolate_na(&mut series, max_pad);
            col.assign(&ArrayView1::from(series.as_slice()));
        }
    }

    /// Keeps only the cells for which `keep` returns true (by valid position).
    ///
    /// # Errors
    ///
    /// Returns [`GridError::AllLand`] if no cell is kept.
    pub fn retain(&mut self, keep: impl Fn(usize) -> bool) -> Result<(), GridError> {
        let positions: Vec<usize> = (0..self.n_cells()).filter(|&i| keep(i)).collect();
        if positions.is_empty() {
            return Err(GridError::AllLand);
        }
        if positions.len() == self.n_cells() {
            return Ok(());
        }
        let valid = positions.iter().map(|&i| self.layout.valid[i]).collect();
        self.data = self.data.select(Axis(1), &positions);
        self.layout.valid = valid;
        Ok(())
    }
}

/// Stacks every non-time dimension into a cell axis and drops land cells.
///
/// A cell is dropped when all of its values are NaN or, with `anynans`,
/// when any of them is. The time axis is moved to the front so the result
/// is a `(time, cell)` matrix whose columns follow row-major order over the
/// remaining dimensions.
///
/// # Errors
///
/// Returns [`GridError::MissingTimeDimension`] if `tdim` is absent,
/// [`GridError::NonNumericCoords`] if a spatial dimension holds dates, and
/// [`GridError::AllLand`] if no cell survives.
pub fn land_check(grid: &Grid, tdim: &str, anynans: bool) -> Result<StackedCells, GridError> {
    let (axis, times) = grid.time_axis(tdim)?;
    let spatial: Vec<Dim> = grid
        .dims()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != axis)
        .map(|(_, d)| d.clone())
        .collect();
    if let Some(d) = spatial.iter().find(|d| d.numeric().is_none()) {
        return Err(GridError::NonNumericCoords {
            name: d.name().to_string(),
        });
    }

    let n_time = times.len();
    let n_total: usize = spatial.iter().map(Dim::len).product();
    let order: Vec<usize> = std::iter::once(axis)
        .chain((0..grid.dims().len()).filter(|&i| i != axis))
        .collect();
    let permuted = grid.values().view().permuted_axes(IxDyn(&order));
    let flat: Vec<f64> = permuted.iter().copied().collect();
    let full = Array2::from_shape_vec((n_time, n_total), flat).map_err(|_| {
        GridError::ShapeMismatch {
            expected: vec![n_time, n_total],
            got: grid.shape().to_vec(),
        }
    })?;

    let valid: Vec<usize> = full
        .columns()
        .into_iter()
        .enumerate()
        .filter(|(_, col)| {
            if anynans {
                n_time > 0 && col.iter().all(|v| !v.is_nan())
            } else {
                col.iter().any(|v| !v.is_nan())
            }
        })
        .map(|(i, _)| i)
        .collect();

    if valid.is_empty() {
        return Err(GridError::AllLand);
    }
    info!(
        kept = valid.len(),
        dropped = n_total - valid.len(),
        "stacked grid cells"
    );

    Ok(StackedCells {
        tdim: tdim.to_string(),
        times: times.to_vec(),
        data: full.select(Axis(1), &valid),
        layout: CellLayout::new(spatial, valid),
    })
}

// ---------------------------------------------------------------------------
// Gridded
// ---------------------------------------------------------------------------

/// Per-cell results laid out on the original spatial grid.
///
/// Cells removed by [`land_check`] hold `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Gridded<T> {
    dims: Vec<Dim>,
    cells: Vec<Option<T>>,
}

impl<T> Gridded<T> {
    /// Spatial dimensions.
    pub fn dims(&self) -> &[Dim] {
        &self.dims
    }

    /// Spatial shape.
    pub fn shape(&self) -> Vec<usize> {
        self.dims.iter().map(Dim::len).collect()
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Option<T>] {
        &self.cells
    }

    /// Result at a flat index.
    pub fn get_flat(&self, flat: usize) -> Option<&T> {
        self.cells.get(flat).and_then(Option::as_ref)
    }

    /// Result at per-dimension indices.
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        let shape = self.shape();
        if index.len() != shape.len() || index.iter().zip(&shape).any(|(i, n)| i >= n) {
            return None;
        }
        let flat = index
            .iter()
            .zip(&shape)
            .fold(0, |acc, (&i, &n)| acc * n + i);
        self.get_flat(flat)
    }

    /// Coordinate values of a flat index.
    pub fn coords_of(&self, flat: usize) -> Vec<f64> {
        coords_of(&self.dims, flat)
    }

    /// Present cells with their flat index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_ref().map(|c| (i, c)))
    }

    /// Number of present cells.
    pub fn n_present(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Applies `f` to every present cell.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Gridded<U> {
        Gridded {
            dims: self.dims,
            cells: self.cells.into_iter().map(|c| c.map(&mut f)).collect(),
        }
    }
}
