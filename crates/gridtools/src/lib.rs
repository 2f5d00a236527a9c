//! Grid container and netCDF serialization for model grid tooling.
//!
//! This crate loads the geometry of a staggered model grid tile (supergrid
//! corner coordinates, cell edge lengths, cell areas, rotation angles) from a
//! netCDF grid file or an in-memory [`GridDataset`], exposes it as contiguous
//! [`ndarray`] arrays with lazily derived dimension sizes, writes it back out
//! and derives A-grid coordinates from the supergrid.
//!
//! # Grid File Structure
//!
//! Grid files carry the dimensions `nx`, `ny` (cells) and `nxp`, `nyp`
//! (corner points) and any subset of the variables in [`GRID_VARIABLES`].
//! Missing variables are not an error; the matching [`GridObj`] field is
//! simply `None`.
//!
//! # Example
//!
//! ```ignore
//! use gridtools::GridObj;
//!
//! let mut grid = GridObj::from_file("horizontal_grid.tile1.nc")?;
//! println!("{:?} x {:?} cells", grid.nx(), grid.ny());
//! grid.write("copy.tile1.nc")?;
//! ```

pub mod agrid;
pub mod dataset;
pub mod error;
pub mod gridobj;
pub mod native;
pub mod utils;

// Re-exports
pub use agrid::agrid_lonlat;
pub use dataset::{GridDataset, Variable, VariableData};
pub use error::{GridError, GridResult};
pub use gridobj::{GridObj, GridObjBuilder, GRID_VARIABLES};
pub use native::silence_hdf5_errors;
pub use utils::check_file_is_there;
