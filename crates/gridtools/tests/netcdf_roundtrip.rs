//! Round-trip tests through real netCDF files.
//!
//! These tests need libnetcdf at runtime; they write into temporary
//! directories and clean up after themselves.

use gridtools::{GridDataset, GridError, GridObj, GRID_VARIABLES};
use ndarray::Array2;
use netcdf::types::NcVariableType;
use test_utils::{
    arcx, assert_approx_eq, indexed_corners, regular_lonlat_grid, require_test_file, sizes,
    temp_test_dir_with_prefix, tiles, StaggeredGrid,
};

fn full_grid(fields: &StaggeredGrid) -> GridObj {
    GridObj::builder()
        .tile(tiles::TILE1)
        .x(fields.x.clone())
        .y(fields.y.clone())
        .dx(fields.dx.clone())
        .dy(fields.dy.clone())
        .area(fields.area.clone())
        .angle_dx(fields.angle_dx.clone())
        .angle_dy(fields.angle_dy.clone())
        .arcx(arcx::SMALL_CIRCLE)
        .build()
        .unwrap()
}

/// Fixed-width, NUL padded character row as written by the grid generators.
fn padded(value: &str, width: usize) -> Vec<u8> {
    let mut bytes = value.as_bytes().to_vec();
    bytes.resize(width, 0);
    bytes
}

fn bitwise_eq(left: &Array2<f64>, right: &Array2<f64>) -> bool {
    left.dim() == right.dim()
        && left
            .iter()
            .zip(right.iter())
            .all(|(a, b)| a.to_bits() == b.to_bits())
}

#[test]
fn test_full_grid_roundtrip_is_exact() {
    let dir = temp_test_dir_with_prefix("gridtools_roundtrip_");
    let path = dir.path().join("grid.tile1.nc");

    let (nx, ny) = sizes::SMALL_RECT;
    // Non-representable decimal steps make any lossy conversion visible
    let fields = regular_lonlat_grid(nx, ny, -0.1, 12.3, 0.7, 1.3);
    let original = full_grid(&fields);
    original.write(&path).unwrap();

    let reloaded = GridObj::from_file(&path).unwrap();

    assert_eq!(reloaded.grid_file.as_deref(), Some(path.as_path()));
    assert_eq!(reloaded.tile.as_deref(), Some(tiles::TILE1));
    assert_eq!(reloaded.arcx.as_deref(), Some(arcx::SMALL_CIRCLE));
    assert!(bitwise_eq(reloaded.x.as_ref().unwrap(), &fields.x));
    assert!(bitwise_eq(reloaded.y.as_ref().unwrap(), &fields.y));
    assert!(bitwise_eq(reloaded.dx.as_ref().unwrap(), &fields.dx));
    assert!(bitwise_eq(reloaded.dy.as_ref().unwrap(), &fields.dy));
    assert!(bitwise_eq(reloaded.area.as_ref().unwrap(), &fields.area));
    assert!(bitwise_eq(reloaded.angle_dx.as_ref().unwrap(), &fields.angle_dx));
    assert!(bitwise_eq(reloaded.angle_dy.as_ref().unwrap(), &fields.angle_dy));

    let expected: Vec<String> = GRID_VARIABLES.iter().map(|s| s.to_string()).collect();
    assert_eq!(reloaded.variable_list().unwrap(), expected);
}

#[test]
fn test_partial_grid_roundtrip_adds_no_fields() {
    let dir = temp_test_dir_with_prefix("gridtools_partial_");
    let path = dir.path().join("partial.nc");

    let mut original = GridObj::new();
    original.x = Some(indexed_corners(5, 7));
    original.area = Some(Array2::from_elem((2, 3), 42.0));
    original.write(&path).unwrap();

    let reloaded = GridObj::from_file(&path).unwrap();

    assert_eq!(
        reloaded.variable_list().unwrap(),
        vec!["x".to_string(), "area".to_string()]
    );
    assert_eq!(reloaded.x, original.x);
    assert_eq!(reloaded.area, original.area);
    assert!(reloaded.tile.is_none());
    assert!(reloaded.arcx.is_none());
    assert!(reloaded.y.is_none());
    assert!(reloaded.dx.is_none());
    assert!(reloaded.dy.is_none());
    assert!(reloaded.angle_dx.is_none());
    assert!(reloaded.angle_dy.is_none());
}

#[test]
fn test_rewrite_of_loaded_grid_matches_source() {
    let dir = temp_test_dir_with_prefix("gridtools_rewrite_");
    let first = dir.path().join("first.nc");
    let second = dir.path().join("second.nc");

    let fields = regular_lonlat_grid(3, 2, 100.0, -30.0, 2.0, 3.0);
    full_grid(&fields).write(&first).unwrap();

    GridObj::from_file(&first).unwrap().write(&second).unwrap();

    let a = GridDataset::open(&first).unwrap();
    let b = GridDataset::open(&second).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_dimensions_from_file_match_array_shapes() {
    let dir = temp_test_dir_with_prefix("gridtools_dims_");
    let path = dir.path().join("dims.nc");

    let (nx, ny) = sizes::SMALL_RECT;
    full_grid(&regular_lonlat_grid(nx, ny, 0.0, 0.0, 1.0, 1.0))
        .write(&path)
        .unwrap();

    let mut loaded = GridObj::from_file(&path).unwrap();
    let mut by_shape = GridObj::new();
    by_shape.x = loaded.x.clone();
    by_shape.area = loaded.area.clone();

    assert_eq!(loaded.nx(), Some(nx));
    assert_eq!(loaded.ny(), Some(ny));
    assert_eq!(loaded.nxp(), Some(nx + 1));
    assert_eq!(loaded.nyp(), Some(ny + 1));

    assert_eq!(by_shape.nx(), loaded.nx());
    assert_eq!(by_shape.ny(), loaded.ny());
    assert_eq!(by_shape.nxp(), loaded.nxp());
    assert_eq!(by_shape.nyp(), loaded.nyp());
}

#[test]
fn test_from_bytes_matches_from_file() {
    let dir = temp_test_dir_with_prefix("gridtools_bytes_");
    let path = dir.path().join("bytes.nc");

    let fields = regular_lonlat_grid(2, 2, 0.0, 0.0, 1.0, 1.0);
    full_grid(&fields).write(&path).unwrap();

    let data = std::fs::read(&path).unwrap();
    let from_bytes = GridObj::from_bytes(&data).unwrap();
    let from_file = GridObj::from_file(&path).unwrap();

    assert!(from_bytes.grid_file.is_none());
    assert_eq!(from_bytes.tile, from_file.tile);
    assert_eq!(from_bytes.x, from_file.x);
    assert_eq!(from_bytes.area, from_file.area);
    assert_eq!(
        from_bytes.variable_list().unwrap(),
        from_file.variable_list().unwrap()
    );
}

#[test]
fn test_char_array_metadata_from_file() {
    let dir = temp_test_dir_with_prefix("gridtools_char_");
    let path = dir.path().join("char.tile6.nc");
    let copy = dir.path().join("copy.tile6.nc");

    // Trailing spaces are part of the value; only NUL padding is dropped
    let tile_name = format!("{}  ", tiles::TILE6);
    let x = indexed_corners(3, 3);

    {
        let mut nc_file = netcdf::create(&path).unwrap();
        nc_file.add_dimension("string", 255).unwrap();
        nc_file.add_dimension("ntiles", 1).unwrap();
        nc_file.add_dimension("nyp", 3).unwrap();
        nc_file.add_dimension("nxp", 3).unwrap();
        {
            let mut tile = nc_file
                .add_variable_with_type("tile", &["string"], &NcVariableType::Char)
                .unwrap();
            tile.put_raw_values(&padded(&tile_name, 255), ..).unwrap();
        }
        {
            let mut x_var = nc_file.add_variable::<f64>("x", &["nyp", "nxp"]).unwrap();
            x_var.put_values(x.as_slice().unwrap(), ..).unwrap();
        }
        {
            let mut arcx_var = nc_file
                .add_variable_with_type("arcx", &["ntiles", "string"], &NcVariableType::Char)
                .unwrap();
            arcx_var
                .put_raw_values(&padded(arcx::GREAT_CIRCLE, 255), ..)
                .unwrap();
        }
    }

    let grid = GridObj::from_file(&path).unwrap();

    assert_eq!(grid.tile.as_deref(), Some(tile_name.as_str()));
    assert_eq!(grid.arcx.as_deref(), Some(arcx::GREAT_CIRCLE));
    assert_eq!(grid.x.as_ref(), Some(&x));
    assert_eq!(
        grid.variable_list().unwrap(),
        vec!["tile".to_string(), "x".to_string(), "arcx".to_string()]
    );
    assert_eq!(
        grid.grid_data.as_ref().and_then(|ds| ds.dimension_len("string")),
        Some(255)
    );

    // Rewritten as netCDF strings, the values survive unchanged
    grid.write(&copy).unwrap();
    let reloaded = GridObj::from_file(&copy).unwrap();
    assert_eq!(reloaded.tile, grid.tile);
    assert_eq!(reloaded.arcx.as_deref(), Some(arcx::GREAT_CIRCLE));
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = temp_test_dir_with_prefix("gridtools_missing_");
    let path = dir.path().join("nope.nc");

    assert!(matches!(
        GridObj::from_file(&path),
        Err(GridError::NotFound(_))
    ));
    // No file should have been created by the failed load
    assert!(!path.exists());
}

#[test]
fn test_garbage_file_is_netcdf_error() {
    let dir = temp_test_dir_with_prefix("gridtools_garbage_");
    let path = dir.path().join("garbage.nc");
    std::fs::write(&path, b"definitely not netcdf").unwrap();

    assert!(matches!(
        GridObj::from_file(&path),
        Err(GridError::NetCdf(_))
    ));
}

#[test]
fn test_agrid_from_written_supergrid() {
    let dir = temp_test_dir_with_prefix("gridtools_agrid_");
    let path = dir.path().join("agrid.nc");

    // One A-grid cell: supergrid of 2x2 cells
    let (nx, ny) = sizes::SINGLE_CELL;
    let fields = regular_lonlat_grid(nx, ny, 10.0, 20.0, 5.0, 5.0);
    full_grid(&fields).write(&path).unwrap();

    let grid = GridObj::from_file(&path).unwrap();
    let (lon, lat) = grid.derive_agrid_lonlat().unwrap().unwrap();

    assert_eq!(lon.len(), 1);
    assert_eq!(lat.len(), 1);
    // Supergrid center point sits at (15, 25) degrees
    assert_approx_eq!(lon[0], 15.0_f64.to_radians(), 1e-12);
    assert_approx_eq!(lat[0], 25.0_f64.to_radians(), 1e-12);
}

#[test]
fn test_real_tile_file() {
    let path = require_test_file!("C48_grid.tile1.nc");

    let mut grid = GridObj::from_file(&path).unwrap();
    let (nx, ny) = sizes::C48_TILE;

    assert_eq!(grid.tile.as_deref(), Some(tiles::TILE1));
    assert_eq!(grid.nx(), Some(nx));
    assert_eq!(grid.ny(), Some(ny));
    assert_eq!(grid.nxp(), Some(nx + 1));
    assert_eq!(grid.nyp(), Some(ny + 1));
    assert_eq!(grid.x.as_ref().map(|x| x.dim()), Some((ny + 1, nx + 1)));
}
