//! A-grid coordinates derived from a staggered supergrid.
//!
//! A supergrid of `(2*ny + 1, 2*nx + 1)` corner points carries cell corners,
//! edge midpoints and cell centers interleaved. The A-grid longitude of
//! column `i` is the point just right of the first edge row, the A-grid
//! latitude of row `j` is read from the second column of each odd row.

use std::f64::consts::PI;

use ndarray::{Array1, Array2};

use crate::error::{GridError, GridResult};

/// Degrees to radians.
const D2R: f64 = PI / 180.0;

/// Compute A-grid longitudes and latitudes, in radians, from supergrid
/// corner coordinates given in degrees.
///
/// Latitudes keep the long-standing output of the grid tools: every row is
/// written into the slot of the last longitude index, so only that slot is
/// non-zero and it holds the latitude of the last row. Shapes for which no
/// such slot exists are rejected.
pub fn agrid_lonlat(x: &Array2<f64>, y: &Array2<f64>) -> GridResult<(Array1<f64>, Array1<f64>)> {
    let (rows, cols) = x.dim();
    let nx = cols.saturating_sub(1) / 2;
    let ny = rows.saturating_sub(1) / 2;
    let stride = 2 * nx + 1;

    let x_flat: Vec<f64> = x.iter().copied().collect();
    let y_flat: Vec<f64> = y.iter().copied().collect();

    let mut a_lon = Array1::<f64>::zeros(nx);
    for i in 0..nx {
        a_lon[i] = flat_value("x", &x_flat, stride + 2 * i + 1)? * D2R;
    }

    let mut a_lat = Array1::<f64>::zeros(ny);
    if ny > 0 {
        let slot = nx.checked_sub(1).ok_or_else(|| {
            GridError::InvalidShape(format!(
                "supergrid with {} rows has no longitude index to place latitudes",
                rows
            ))
        })?;
        if slot >= ny {
            return Err(GridError::InvalidShape(format!(
                "latitude slot {} is outside an A-grid of {} rows",
                slot, ny
            )));
        }

        for j in 0..ny {
            a_lat[slot] = flat_value("y", &y_flat, (2 * j + 1) * stride + 1)? * D2R;
        }
    }

    Ok((a_lon, a_lat))
}

fn flat_value(name: &str, flat: &[f64], index: usize) -> GridResult<f64> {
    flat.get(index).copied().ok_or_else(|| {
        GridError::InvalidShape(format!(
            "index {} is outside '{}' with {} points",
            index,
            name,
            flat.len()
        ))
    })
}
