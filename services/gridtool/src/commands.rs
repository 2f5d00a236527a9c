//! Subcommand bodies.
//!
//! Each command returns what it would print so `main` only dispatches.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use gridtools::GridObj;

use crate::report::GridSummary;

/// Summarise a grid file as text or pretty JSON.
pub fn run_info(file: &Path, json: bool) -> Result<String> {
    let mut grid = load(file)?;
    let summary = GridSummary::from_grid(&file.display().to_string(), &mut grid)?;

    if json {
        Ok(format!("{}\n", serde_json::to_string_pretty(&summary)?))
    } else {
        Ok(summary.render_text())
    }
}

/// A-grid longitudes and latitudes in radians, one line each.
pub fn run_agrid(file: &Path) -> Result<String> {
    let grid = load(file)?;

    match grid.derive_agrid_lonlat()? {
        Some((lon, lat)) => Ok(format!(
            "lon ({}): {:?}\nlat ({}): {:?}\n",
            lon.len(),
            lon.to_vec(),
            lat.len(),
            lat.to_vec()
        )),
        None => anyhow::bail!("{} has no x/y supergrid coordinates", file.display()),
    }
}

/// Reload `input` and write its grid variables to `output`.
pub fn run_copy(input: &Path, output: &Path) -> Result<()> {
    let grid = load(input)?;
    grid.write(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(input = %input.display(), output = %output.display(), "Copied grid");
    Ok(())
}

fn load(path: &Path) -> Result<GridObj> {
    GridObj::from_file(path).with_context(|| format!("Failed to load grid {}", path.display()))
}
