//! Error types for grid container operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for grid container operations.
pub type GridResult<T> = Result<T, GridError>;

/// Error types for loading, deriving and writing grids.
#[derive(Error, Debug)]
pub enum GridError {
    /// The grid file does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reported by the netCDF library
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// Missing required variable or dimension
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Variable content does not match the expected kind
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Array rank or shape cannot satisfy the requested operation
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    /// A dimension was given two different lengths
    #[error("Dimension '{name}' has length {expected}, got {found}")]
    DimensionMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    /// Introspection was requested on a container with no dataset attached
    #[error("No grid dataset attached")]
    NoDataset,
}
