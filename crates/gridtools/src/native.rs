//! NetCDF reading and writing for [`GridDataset`] using the netcdf library.
//!
//! Files are read completely into memory: the netcdf handle only lives for
//! the duration of [`GridDataset::open`] and is closed on every return path,
//! so the resulting dataset can outlive the file it came from.
//!
//! # Performance Notes
//!
//! The netcdf library requires a file path (it wraps libnetcdf/HDF5 which need
//! file handles). When reading from bytes, we write to a temp file first.
//! On Linux, we use `/dev/shm` (memory-backed tmpfs) to minimize I/O latency.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Once;

use ndarray::{ArrayD, IxDyn};
use netcdf::types::NcVariableType;
use tracing::{debug, info, warn};

use crate::dataset::{GridDataset, VariableData};
use crate::error::{GridError, GridResult};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code. This function disables that output
/// by calling H5Eset_auto2 with null handlers. It only needs to be called once
/// per process, but is safe to call multiple times.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

impl GridDataset {
    /// Read a netCDF file into memory.
    pub fn open<P: AsRef<Path>>(path: P) -> GridResult<Self> {
        silence_hdf5_errors();

        let path = path.as_ref();
        let nc_file = netcdf::open(path)?;
        let dataset = read_dataset(&nc_file)?;

        info!(
            path = %path.display(),
            dimensions = dataset.dimensions().count(),
            variables = dataset.variables().count(),
            "Loaded grid dataset"
        );

        Ok(dataset)
    }

    /// Decode a netCDF image held in memory.
    pub fn from_bytes(data: &[u8]) -> GridResult<Self> {
        let temp_file = get_optimal_temp_dir().join(generate_temp_filename());
        open_via_temp_file(&temp_file, data)
    }

    /// Write the dataset to a netCDF-4 file, replacing any existing file.
    ///
    /// Numeric variables are stored as doubles and text variables as netCDF
    /// strings.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> GridResult<()> {
        silence_hdf5_errors();

        let path = path.as_ref();
        let mut nc_file = netcdf::create(path)?;

        for (name, len) in self.dimensions() {
            nc_file.add_dimension(name, len)?;
        }

        for var in self.variables() {
            let dims: Vec<&str> = var.dims().iter().map(String::as_str).collect();

            match var.data() {
                VariableData::Float(array) => {
                    let values = array.as_standard_layout();
                    let slice = values.as_slice().ok_or_else(|| {
                        GridError::InvalidShape(format!("variable '{}' is not contiguous", var.name()))
                    })?;
                    let mut nc_var = nc_file.add_variable::<f64>(var.name(), &dims)?;
                    nc_var.put_values(slice, ..)?;
                }
                VariableData::Text(value) => {
                    let first = vec![0usize; dims.len()];
                    let mut nc_var = nc_file.add_string_variable(var.name(), &dims)?;
                    nc_var.put_string(value, first.as_slice())?;
                }
            }

            debug!(variable = var.name(), kind = var.data().kind(), "Wrote variable");
        }

        info!(
            path = %path.display(),
            variables = self.variables().count(),
            "Wrote grid dataset"
        );

        Ok(())
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Write `data` to `temp_file`, read it back and remove the file again.
///
/// The file is removed whether writing or reading failed.
fn open_via_temp_file(temp_file: &Path, data: &[u8]) -> GridResult<GridDataset> {
    let result = std::fs::write(temp_file, data)
        .map_err(GridError::from)
        .and_then(|()| GridDataset::open(temp_file));

    // Clean up
    let _ = std::fs::remove_file(temp_file);

    result
}

fn read_dataset(nc_file: &netcdf::File) -> GridResult<GridDataset> {
    let mut dataset = GridDataset::new();

    for dim in nc_file.dimensions() {
        dataset.add_dimension(&dim.name(), dim.len())?;
    }

    for var in nc_file.variables() {
        let name = var.name();
        let dim_names: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        let dims: Vec<&str> = dim_names.iter().map(String::as_str).collect();

        match var.vartype() {
            NcVariableType::Char => {
                let raw = var.get_raw_values(..)?;
                let row_len = var.dimensions().last().map(|d| d.len()).unwrap_or(raw.len());
                let value = decode_char_row(&name, &raw[..row_len.min(raw.len())])?;
                dataset.insert_text(&name, &dims, value)?;
            }
            NcVariableType::String => {
                let first = vec![0usize; dims.len()];
                let value = var.get_string(first.as_slice())?;
                dataset.insert_text(&name, &dims, value)?;
            }
            NcVariableType::Int(_) | NcVariableType::Float(_) => {
                let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
                let values: Vec<f64> = var.get_values(..)?;
                let array = ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|e| {
                    GridError::InvalidShape(format!("variable '{}': {}", name, e))
                })?;
                dataset.insert_array(&name, &dims, array)?;
            }
            other => {
                warn!(variable = %name, vartype = ?other, "Skipping variable with unsupported type");
                continue;
            }
        }

        debug!(variable = %name, dims = ?dim_names, "Read variable");
    }

    Ok(dataset)
}

/// Decode a fixed-width character array into a string.
///
/// Trailing NUL padding is dropped; the remaining bytes must be ASCII.
fn decode_char_row(name: &str, bytes: &[u8]) -> GridResult<String> {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |pos| pos + 1);
    let trimmed = &bytes[..end];

    if !trimmed.is_ascii() {
        return Err(GridError::InvalidFormat(format!(
            "text variable '{}' is not ASCII",
            name
        )));
    }

    Ok(trimmed.iter().map(|&b| b as char).collect())
}

/// Get the optimal temp directory for NetCDF file operations.
///
/// On Linux, uses /dev/shm (memory-backed tmpfs) if available for faster I/O.
/// Falls back to the system temp directory on other platforms or if /dev/shm is unavailable.
fn get_optimal_temp_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        let shm_path = Path::new("/dev/shm");
        if shm_path.exists() && shm_path.is_dir() {
            // Verify we can write to /dev/shm
            let test_path = shm_path.join(format!(".gridtools_test_{}", std::process::id()));
            if std::fs::write(&test_path, b"test").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return shm_path.to_path_buf();
            }
        }
    }

    std::env::temp_dir()
}

/// Generate a unique temp file name for concurrent safety.
/// Uses process ID, thread ID, and a counter to ensure uniqueness.
fn generate_temp_filename() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let pid = std::process::id();
    let tid = std::thread::current().id();
    let count = COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("grid_native_{}_{:?}_{}.nc", pid, tid, count)
}
