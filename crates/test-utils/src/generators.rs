//! Generators for synthetic staggered grids.
//!
//! All arrays follow grid file conventions: corner fields are
//! `(ny + 1, nx + 1)`, `dx` is `(ny + 1, nx)`, `dy` is `(ny, nx + 1)` and
//! `area` is `(ny, nx)`, rows running south to north.

use ndarray::Array2;

use crate::fixtures::EARTH_RADIUS;

/// Every array field of a grid tile.
#[derive(Debug, Clone)]
pub struct StaggeredGrid {
    pub x: Array2<f64>,
    pub y: Array2<f64>,
    pub dx: Array2<f64>,
    pub dy: Array2<f64>,
    pub area: Array2<f64>,
    pub angle_dx: Array2<f64>,
    pub angle_dy: Array2<f64>,
}

impl StaggeredGrid {
    /// Cell counts as `(nx, ny)`.
    pub fn cells(&self) -> (usize, usize) {
        (self.area.ncols(), self.area.nrows())
    }
}

/// Creates a regular lon/lat grid of `nx` by `ny` cells.
///
/// Corners start at (`lon0`, `lat0`) and step by `dlon`/`dlat` degrees.
/// Edge lengths and areas are exact on a sphere of [`EARTH_RADIUS`];
/// rotation angles are zero.
///
/// # Example
///
/// ```
/// use test_utils::regular_lonlat_grid;
///
/// let grid = regular_lonlat_grid(4, 2, 0.0, -10.0, 5.0, 10.0);
/// assert_eq!(grid.x.dim(), (3, 5));
/// assert_eq!(grid.dx.dim(), (3, 4));
/// assert_eq!(grid.dy.dim(), (2, 5));
/// assert_eq!(grid.area.dim(), (2, 4));
/// ```
pub fn regular_lonlat_grid(
    nx: usize,
    ny: usize,
    lon0: f64,
    lat0: f64,
    dlon: f64,
    dlat: f64,
) -> StaggeredGrid {
    let lon = |i: usize| lon0 + i as f64 * dlon;
    let lat = |j: usize| lat0 + j as f64 * dlat;

    let x = Array2::from_shape_fn((ny + 1, nx + 1), |(_, i)| lon(i));
    let y = Array2::from_shape_fn((ny + 1, nx + 1), |(j, _)| lat(j));

    let dx = Array2::from_shape_fn((ny + 1, nx), |(j, _)| {
        EARTH_RADIUS * lat(j).to_radians().cos() * dlon.to_radians()
    });
    let dy = Array2::from_elem((ny, nx + 1), EARTH_RADIUS * dlat.to_radians());
    let area = Array2::from_shape_fn((ny, nx), |(j, _)| {
        EARTH_RADIUS
            * EARTH_RADIUS
            * dlon.to_radians()
            * (lat(j + 1).to_radians().sin() - lat(j).to_radians().sin())
    });

    StaggeredGrid {
        x,
        y,
        dx,
        dy,
        area,
        angle_dx: Array2::zeros((ny + 1, nx + 1)),
        angle_dy: Array2::zeros((ny + 1, nx + 1)),
    }
}

/// Creates a corner array whose value at each point is its flat index.
///
/// Handy for checking index arithmetic: `flat[k] == k as f64`.
pub fn indexed_corners(rows: usize, cols: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |(r, c)| (r * cols + c) as f64)
}
