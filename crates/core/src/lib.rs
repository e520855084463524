pub mod config;
pub mod coords;
pub mod error;
pub mod mapgen;
pub mod mesh;
pub mod settings;
pub mod types;
pub mod world;

pub use config::{FillPercent, GenerationConfig, SeedSource};
pub use coords::{WorldMapping, WorldPoint};
pub use error::{GenerationError, MeshError};
pub use mapgen::{
    GeneratedRoom, Grid, Marker, MarkerKind, Passage, Room, RoomGenerator, RoomGraph, RoomLayout,
    generate_room,
};
pub use mesh::{Outline, RoomMesh, WallMesh, generate_mesh};
pub use settings::{LoadedSettings, Settings, SettingsWarning};
pub use types::*;
pub use world::{Cell, Doorway, GeneratedWorld, WorldGenerator, WorldRoom};
