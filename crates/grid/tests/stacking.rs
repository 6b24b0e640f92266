use mhw_calendar::{Date, date_sequence};
use mhw_grid::{Dim, Grid, GridError, land_check};
use ndarray::{ArrayD, IxDyn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_grid(seed: u64, land_fraction: f64) -> Grid {
    let mut rng = StdRng::seed_from_u64(seed);
    let (nt, nlat, nlon) = (20, 4, 5);
    let land: Vec<bool> = (0..nlat * nlon).map(|_| rng.random::<f64>() < land_fraction).collect();
    let mut values = Vec::with_capacity(nt * nlat * nlon);
    for _ in 0..nt {
        for (c, &is_land) in land.iter().enumerate() {
            values.push(if is_land { f64::NAN } else { c as f64 + rng.random::<f64>() });
        }
    }
    Grid::new(
        vec![
            Dim::time("time", date_sequence(Date::ymd(1990, 1, 1).unwrap(), nt)),
            Dim::values("lat", (0..nlat).map(|i| i as f64 * 0.25).collect()),
            Dim::values("lon", (0..nlon).map(|i| 150.0 + i as f64 * 0.25).collect()),
        ],
        ArrayD::from_shape_vec(IxDyn(&[nt, nlat, nlon]), values).unwrap(),
    )
    .unwrap()
}

#[test]
fn unstack_restores_spatial_coordinates() {
    let grid = random_grid(7, 0.3);
    let cells = land_check(&grid, "time", false).unwrap();
    let first_values: Vec<f64> = (0..cells.n_cells()).map(|i| cells.series(i)[0]).collect();
    let gridded = cells.layout().unstack(first_values).unwrap();

    assert_eq!(gridded.shape(), vec![4, 5]);
    for flat in 0..20 {
        let (lat, lon) = (flat / 5, flat % 5);
        let original = grid.values()[[0, lat, lon]];
        match gridded.get(&[lat, lon]) {
            Some(&v) => assert_eq!(v, original),
            None => assert!(original.is_nan(), "dropped cell {flat} was not land"),
        }
        assert_eq!(gridded.coords_of(flat), vec![lat as f64 * 0.25, 150.0 + lon as f64 * 0.25]);
    }
}

#[test]
fn dropped_cells_are_absent_not_zero() {
    let grid = random_grid(11, 0.5);
    let cells = land_check(&grid, "time", false).unwrap();
    let gridded = cells.layout().unstack(vec![0.0; cells.n_cells()]).unwrap();
    assert_eq!(gridded.n_present(), cells.n_cells());
    assert_eq!(gridded.cells().len(), 20);
    assert!(gridded.cells().iter().filter(|c| c.is_none()).count() == 20 - cells.n_cells());
}

#[test]
fn all_land_grid_fails() {
    let grid = random_grid(3, 1.0);
    assert_eq!(land_check(&grid, "time", false).unwrap_err(), GridError::AllLand);
}
