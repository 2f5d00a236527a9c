//! Grid container for staggered model grids.
//!
//! [`GridObj`] holds the geometry of one grid tile: supergrid corner
//! coordinates, cell edge lengths, cell areas and local rotation angles.
//! Every construction path runs the same two steps: assign the fields that
//! were given, then [`GridObj::extract_from`] a [`GridDataset`].

use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2, Ix2};
use tracing::{debug, info};

use crate::agrid::agrid_lonlat;
use crate::dataset::{GridDataset, VariableData};
use crate::error::{GridError, GridResult};
use crate::utils::check_file_is_there;

/// Variables a grid file may carry, in write order.
pub const GRID_VARIABLES: [&str; 9] = [
    "tile", "x", "y", "dx", "dy", "area", "angle_dx", "angle_dy", "arcx",
];

/// Dimension used for the single-element text variables on write.
const TEXT_DIM: &str = "dim_0";

/// Geometry of one grid tile.
///
/// Array fields use the dimension conventions of grid files:
///
/// | field | dims |
/// |---|---|
/// | `x`, `y`, `angle_dx`, `angle_dy` | `(nyp, nxp)` |
/// | `dx` | `(nyp, nx)` |
/// | `dy` | `(ny, nxp)` |
/// | `area` | `(ny, nx)` |
///
/// A field is `None` when the source did not carry the variable.
#[derive(Debug, Clone, Default)]
pub struct GridObj {
    /// Backing dataset, when built from one or from a file
    pub grid_data: Option<GridDataset>,
    /// File the grid was read from
    pub grid_file: Option<PathBuf>,
    /// Tile identifier, e.g. `tile1`
    pub tile: Option<String>,
    pub x: Option<Array2<f64>>,
    pub y: Option<Array2<f64>>,
    pub dx: Option<Array2<f64>>,
    pub dy: Option<Array2<f64>>,
    pub area: Option<Array2<f64>>,
    pub angle_dx: Option<Array2<f64>>,
    pub angle_dy: Option<Array2<f64>>,
    /// Stagger convention marker
    pub arcx: Option<String>,
    nx: Option<usize>,
    ny: Option<usize>,
    nxp: Option<usize>,
    nyp: Option<usize>,
}

impl GridObj {
    /// Create an empty grid, to be filled in by hand before writing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a grid from individual fields and/or a source.
    pub fn builder() -> GridObjBuilder {
        GridObjBuilder::default()
    }

    /// Wrap an in-memory dataset, extracting every grid variable it holds.
    pub fn from_dataset(grid_data: GridDataset) -> GridResult<Self> {
        let mut grid = Self::new();
        grid.extract_from(&grid_data)?;
        grid.grid_data = Some(grid_data);
        Ok(grid)
    }

    /// Load a grid from a netCDF file.
    ///
    /// Fails with [`GridError::NotFound`] before touching the netCDF library
    /// when `path` does not exist. The file is closed once its contents are
    /// in memory; the loaded dataset is kept as `grid_data`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> GridResult<Self> {
        let path = path.as_ref();
        check_file_is_there(path)?;

        let mut grid = Self::from_dataset(GridDataset::open(path)?)?;
        grid.grid_file = Some(path.to_path_buf());
        Ok(grid)
    }

    /// Load a grid from a netCDF image held in memory.
    pub fn from_bytes(data: &[u8]) -> GridResult<Self> {
        Self::from_dataset(GridDataset::from_bytes(data)?)
    }

    /// Copy every grid variable present in `grid_data` into this grid.
    ///
    /// Fields whose variable is absent keep their current value. Either all
    /// present variables are taken or, on error, none are.
    pub fn extract_from(&mut self, grid_data: &GridDataset) -> GridResult<()> {
        let tile = text_variable(grid_data, "tile")?;
        let x = array_variable(grid_data, "x")?;
        let y = array_variable(grid_data, "y")?;
        let dx = array_variable(grid_data, "dx")?;
        let dy = array_variable(grid_data, "dy")?;
        let area = array_variable(grid_data, "area")?;
        let angle_dx = array_variable(grid_data, "angle_dx")?;
        let angle_dy = array_variable(grid_data, "angle_dy")?;
        let arcx = text_variable(grid_data, "arcx")?;

        if tile.is_some() {
            self.tile = tile;
        }
        if x.is_some() {
            self.x = x;
        }
        if y.is_some() {
            self.y = y;
        }
        if dx.is_some() {
            self.dx = dx;
        }
        if dy.is_some() {
            self.dy = dy;
        }
        if area.is_some() {
            self.area = area;
        }
        if angle_dx.is_some() {
            self.angle_dx = angle_dx;
        }
        if angle_dy.is_some() {
            self.angle_dy = angle_dy;
        }
        if arcx.is_some() {
            self.arcx = arcx;
        }

        Ok(())
    }

    /// Build a dataset holding every field that is set.
    ///
    /// Unset fields are left out entirely. Arrays whose shapes disagree on a
    /// shared dimension are reported as [`GridError::DimensionMismatch`].
    pub fn to_dataset(&self) -> GridResult<GridDataset> {
        let mut out = GridDataset::new();

        put_text(&mut out, "tile", self.tile.as_deref())?;
        put_array(&mut out, "x", ["nyp", "nxp"], self.x.as_ref())?;
        put_array(&mut out, "y", ["nyp", "nxp"], self.y.as_ref())?;
        put_array(&mut out, "dx", ["nyp", "nx"], self.dx.as_ref())?;
        put_array(&mut out, "dy", ["ny", "nxp"], self.dy.as_ref())?;
        put_array(&mut out, "area", ["ny", "nx"], self.area.as_ref())?;
        put_array(&mut out, "angle_dx", ["nyp", "nxp"], self.angle_dx.as_ref())?;
        put_array(&mut out, "angle_dy", ["nyp", "nxp"], self.angle_dy.as_ref())?;
        put_text(&mut out, "arcx", self.arcx.as_deref())?;

        Ok(out)
    }

    /// Write the grid to a netCDF file.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> GridResult<()> {
        let out = self.to_dataset()?;
        info!(
            path = %path.as_ref().display(),
            variables = ?out.variable_names(),
            "Writing grid"
        );
        out.write(path)
    }

    /// A-grid longitudes and latitudes in radians.
    ///
    /// Returns `Ok(None)` unless both `x` and `y` are set. See
    /// [`agrid_lonlat`] for the index layout.
    pub fn derive_agrid_lonlat(&self) -> GridResult<Option<(Array1<f64>, Array1<f64>)>> {
        match (&self.x, &self.y) {
            (Some(x), Some(y)) => agrid_lonlat(x, y).map(Some),
            _ => Ok(None),
        }
    }

    /// Names of the variables in the backing dataset, in dataset order.
    pub fn variable_list(&self) -> GridResult<Vec<String>> {
        self.grid_data
            .as_ref()
            .map(GridDataset::variable_names)
            .ok_or(GridError::NoDataset)
    }

    /// Take the backing dataset out of the grid.
    ///
    /// Dimension sizes already resolved stay cached.
    pub fn detach_dataset(&mut self) -> Option<GridDataset> {
        self.grid_data.take()
    }

    /// Number of cells along x.
    ///
    /// Read from the dataset's `nx` dimension, else from the column count of
    /// `area`. Cached once resolved.
    pub fn nx(&mut self) -> Option<usize> {
        let area = &self.area;
        resolve_dimension(&mut self.nx, self.grid_data.as_ref(), "nx", || {
            area.as_ref().map(|a| a.ncols())
        })
    }

    /// Number of cells along y, falling back to the row count of `area`.
    pub fn ny(&mut self) -> Option<usize> {
        let area = &self.area;
        resolve_dimension(&mut self.ny, self.grid_data.as_ref(), "ny", || {
            area.as_ref().map(|a| a.nrows())
        })
    }

    /// Number of corner points along x, falling back to the column count of `x`.
    pub fn nxp(&mut self) -> Option<usize> {
        let x = &self.x;
        resolve_dimension(&mut self.nxp, self.grid_data.as_ref(), "nxp", || {
            x.as_ref().map(|a| a.ncols())
        })
    }

    /// Number of corner points along y, falling back to the row count of `x`.
    pub fn nyp(&mut self) -> Option<usize> {
        let x = &self.x;
        resolve_dimension(&mut self.nyp, self.grid_data.as_ref(), "nyp", || {
            x.as_ref().map(|a| a.nrows())
        })
    }
}

/// Builder mirroring the field-wise grid constructor.
///
/// When a dataset is given it is extracted; otherwise a file path, when
/// given, is opened and extracted. Variables found in the source overwrite
/// fields set on the builder.
#[derive(Debug, Default)]
pub struct GridObjBuilder {
    grid: GridObj,
}

impl GridObjBuilder {
    pub fn grid_data(mut self, grid_data: GridDataset) -> Self {
        self.grid.grid_data = Some(grid_data);
        self
    }

    pub fn grid_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.grid.grid_file = Some(path.into());
        self
    }

    pub fn tile(mut self, tile: impl Into<String>) -> Self {
        self.grid.tile = Some(tile.into());
        self
    }

    pub fn x(mut self, x: Array2<f64>) -> Self {
        self.grid.x = Some(x);
        self
    }

    pub fn y(mut self, y: Array2<f64>) -> Self {
        self.grid.y = Some(y);
        self
    }

    pub fn dx(mut self, dx: Array2<f64>) -> Self {
        self.grid.dx = Some(dx);
        self
    }

    pub fn dy(mut self, dy: Array2<f64>) -> Self {
        self.grid.dy = Some(dy);
        self
    }

    pub fn area(mut self, area: Array2<f64>) -> Self {
        self.grid.area = Some(area);
        self
    }

    pub fn angle_dx(mut self, angle_dx: Array2<f64>) -> Self {
        self.grid.angle_dx = Some(angle_dx);
        self
    }

    pub fn angle_dy(mut self, angle_dy: Array2<f64>) -> Self {
        self.grid.angle_dy = Some(angle_dy);
        self
    }

    pub fn arcx(mut self, arcx: impl Into<String>) -> Self {
        self.grid.arcx = Some(arcx.into());
        self
    }

    pub fn build(self) -> GridResult<GridObj> {
        let mut grid = self.grid;

        if let Some(grid_data) = grid.grid_data.take() {
            grid.extract_from(&grid_data)?;
            grid.grid_data = Some(grid_data);
        } else if let Some(path) = grid.grid_file.clone() {
            check_file_is_there(&path)?;
            let grid_data = GridDataset::open(&path)?;
            grid.extract_from(&grid_data)?;
            grid.grid_data = Some(grid_data);
        }

        Ok(grid)
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

fn resolve_dimension(
    cache: &mut Option<usize>,
    grid_data: Option<&GridDataset>,
    name: &str,
    fallback: impl FnOnce() -> Option<usize>,
) -> Option<usize> {
    if cache.is_none() {
        *cache = match grid_data.and_then(|ds| ds.dimension_len(name)) {
            Some(len) => Some(len),
            None => {
                let len = fallback();
                debug!(dimension = name, len = ?len, "Dimension inferred from array shape");
                len
            }
        };
    }
    *cache
}

fn text_variable(grid_data: &GridDataset, name: &str) -> GridResult<Option<String>> {
    let Some(var) = grid_data.variable(name) else {
        return Ok(None);
    };

    match var.data() {
        VariableData::Text(value) => Ok(Some(value.clone())),
        other => Err(GridError::InvalidFormat(format!(
            "variable '{}' is {}, expected text",
            name,
            other.kind()
        ))),
    }
}

fn array_variable(grid_data: &GridDataset, name: &str) -> GridResult<Option<Array2<f64>>> {
    let Some(var) = grid_data.variable(name) else {
        return Ok(None);
    };

    let array = var.data().as_float().ok_or_else(|| {
        GridError::InvalidFormat(format!("variable '{}' is text, expected float", name))
    })?;
    let array = array
        .view()
        .into_dimensionality::<Ix2>()
        .map_err(|_| {
            GridError::InvalidShape(format!(
                "variable '{}' has shape {:?}, expected 2 dimensions",
                name,
                array.shape()
            ))
        })?
        .as_standard_layout()
        .into_owned();

    debug!(variable = name, shape = ?array.shape(), "Extracted grid variable");
    Ok(Some(array))
}

fn put_array(
    out: &mut GridDataset,
    name: &str,
    dims: [&str; 2],
    array: Option<&Array2<f64>>,
) -> GridResult<()> {
    if let Some(array) = array {
        out.insert_array(name, &dims, array.clone().into_dyn())?;
    }
    Ok(())
}

fn put_text(out: &mut GridDataset, name: &str, value: Option<&str>) -> GridResult<()> {
    if let Some(value) = value {
        out.add_dimension(TEXT_DIM, 1)?;
        out.insert_text(name, &[TEXT_DIM], value)?;
    }
    Ok(())
}
