//! Printable summaries of a loaded grid.

use std::fmt::Write;

use gridtools::{GridObj, GridResult};
use serde::Serialize;

/// What `gridtool info` reports about a grid file.
#[derive(Debug, Clone, Serialize)]
pub struct GridSummary {
    pub file: String,
    pub tile: Option<String>,
    pub arcx: Option<String>,
    pub variables: Vec<String>,
    pub nx: Option<usize>,
    pub ny: Option<usize>,
    pub nxp: Option<usize>,
    pub nyp: Option<usize>,
}

impl GridSummary {
    pub fn from_grid(file: &str, grid: &mut GridObj) -> GridResult<Self> {
        Ok(Self {
            file: file.to_string(),
            tile: grid.tile.clone(),
            arcx: grid.arcx.clone(),
            variables: grid.variable_list()?,
            nx: grid.nx(),
            ny: grid.ny(),
            nxp: grid.nxp(),
            nyp: grid.nyp(),
        })
    }

    /// Human-readable multi-line report.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let dim = |v: Option<usize>| v.map_or_else(|| "-".to_string(), |n| n.to_string());

        let _ = writeln!(out, "file:      {}", self.file);
        let _ = writeln!(out, "tile:      {}", self.tile.as_deref().unwrap_or("-"));
        let _ = writeln!(out, "arcx:      {}", self.arcx.as_deref().unwrap_or("-"));
        let _ = writeln!(
            out,
            "cells:     nx={} ny={}",
            dim(self.nx),
            dim(self.ny)
        );
        let _ = writeln!(
            out,
            "corners:   nxp={} nyp={}",
            dim(self.nxp),
            dim(self.nyp)
        );
        let _ = writeln!(out, "variables: {}", self.variables.join(", "));
        out
    }
}
