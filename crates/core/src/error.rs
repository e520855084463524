//! Error types for room generation and tessellation.

use thiserror::Error;

/// Fatal failures of a generation run. Recoverable settings problems never
/// surface here; they are reported as [`crate::SettingsWarning`]s instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("grid row {row} has {found} cells, expected {expected}")]
    JaggedGrid { row: usize, expected: usize, found: usize },
    #[error("grid cell ({x}, {y}) holds unknown tile value {value}")]
    UnknownTile { x: usize, y: usize, value: u8 },
    #[error("no room reached the room threshold of {threshold} tiles")]
    NoRooms { threshold: usize },
    #[error("edge-tile check from ({x}, {y}) indexed outside the grid")]
    EdgeTileOutOfBounds { x: i32, y: i32 },
    #[error("region starting at ({x}, {y}) has no edge tiles")]
    NoEdgeTiles { x: i32, y: i32 },
    #[error("{remaining} room(s) are still unreachable from the main room")]
    UnreachableRooms { remaining: usize },
    #[error("point ({x}, {y}) lies outside the {width}x{height} grid")]
    PointOutOfBounds { x: i32, y: i32, width: usize, height: usize },
    #[error("room index {index} is out of range for {count} rooms")]
    RoomIndexOutOfRange { index: usize, count: usize },
    #[error("room generation failed for world cell ({x}, {z}): {source}")]
    WorldCell {
        x: usize,
        z: usize,
        #[source]
        source: Box<GenerationError>,
    },
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("cannot tessellate a {width}x{height} grid, at least 2x2 nodes are needed")]
    EmptyGrid { width: usize, height: usize },
    #[error("grid is {found_width}x{found_height} but the mapping expects {width}x{height}")]
    MappingMismatch { width: usize, height: usize, found_width: usize, found_height: usize },
    #[error("vertex {vertex} has no triangle entry")]
    OrphanVertex { vertex: u32 },
}
