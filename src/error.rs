use thiserror::Error;

/// Errors raised by grid construction, lookup and relocation.
///
/// `NonIntegerCoord`, `TileOutOfRange`, `CoordinateOccupied` and
/// `WrapMismatch` are bad input.
/// `UnmappedTile` and `MissingNeighbor` mean the coordinate map is corrupt and
/// whatever was being built on top of it must be abandoned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error("grid must have at least one tile (got {width}x{depth})")]
    EmptyGrid { width: usize, depth: usize },

    #[error("{axis} coordinate {value} is not an integer")]
    NonIntegerCoord { axis: char, value: f32 },

    #[error("tile index {index} out of range (grid has {n} tiles)")]
    TileOutOfRange { index: usize, n: usize },

    #[error("tile {index} claims ({x}, {z}) but that coordinate has no mapping")]
    UnmappedTile { index: usize, x: i32, z: i32 },

    #[error("coordinate ({x}, {z}) is already occupied")]
    CoordinateOccupied { x: i32, z: i32 },

    #[error("resident window has a hole at ({x}, {z})")]
    WindowHole { x: i32, z: i32 },

    #[error("{width}x{depth} torus does not fit a tiling that repeats every {period:?} tiles")]
    WrapMismatch {
        width: usize,
        depth: usize,
        period: (usize, usize),
    },

    #[error("no tile at wrapped neighbor coordinate ({x}, {z})")]
    MissingNeighbor { x: i32, z: i32 },
}
