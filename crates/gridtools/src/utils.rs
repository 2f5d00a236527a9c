//! Small filesystem helpers shared by the construction paths.

use std::path::Path;

use crate::error::{GridError, GridResult};

/// Fail with [`GridError::NotFound`] unless `path` exists.
pub fn check_file_is_there<P: AsRef<Path>>(path: P) -> GridResult<()> {
    let path = path.as_ref();
    if path.exists() {
        Ok(())
    } else {
        Err(GridError::NotFound(path.to_path_buf()))
    }
}
