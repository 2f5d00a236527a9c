//! Common test fixtures for grid container tests.

/// Mean Earth radius used by the grid tools, in meters.
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// Common supergrid sizes as `(nx, ny)` cell counts.
pub mod sizes {
    /// Smallest supergrid with one A-grid cell
    pub const SINGLE_CELL: (usize, usize) = (2, 2);

    /// Small non-square grid, useful for catching swapped axes
    pub const SMALL_RECT: (usize, usize) = (6, 4);

    /// Supergrid of one C48 cubed-sphere tile
    pub const C48_TILE: (usize, usize) = (96, 96);
}

/// Tile identifiers as they appear in grid files.
pub mod tiles {
    pub const TILE1: &str = "tile1";
    pub const TILE6: &str = "tile6";
}

/// Values seen in the `arcx` variable of real grid files.
pub mod arcx {
    pub const SMALL_CIRCLE: &str = "small_circle";
    pub const GREAT_CIRCLE: &str = "great_circle";
}
