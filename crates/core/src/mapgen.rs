//! Cellular-automaton room generation split into coherent submodules.

pub mod automaton;
pub mod connector;
pub mod linkage;
pub mod model;
pub mod passage;
pub mod placement;
pub mod regions;
pub mod rooms;

pub(crate) mod seed;

mod generator;
mod grid;

pub use generator::{RoomGenerator, RoomLayout};
pub use grid::Grid;
pub use model::{GeneratedRoom, PruneStats};
pub use passage::Passage;
pub use placement::{END_GOAL_VALUE, Marker, MarkerKind};
pub use rooms::{Room, RoomGraph};

use crate::config::GenerationConfig;
use crate::error::GenerationError;

pub fn generate_room(config: GenerationConfig) -> Result<GeneratedRoom, GenerationError> {
    RoomGenerator::new(config)?.generate()
}
