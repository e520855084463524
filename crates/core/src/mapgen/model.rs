//! Output of a finished room generation run.

use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

use super::grid::Grid;
use super::passage::Passage;
use super::placement::{Marker, MarkerKind};
use super::regions::ConvertOutcome;
use super::rooms::RoomGraph;
use crate::coords::WorldMapping;
use crate::mesh::RoomMesh;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PruneStats {
    pub smoothed_wall_tiles: usize,
    pub wall_regions: usize,
    pub wall_tiles: usize,
    pub kept_wall_tiles: usize,
    pub floor_regions: usize,
    pub floor_tiles: usize,
    pub kept_floor_tiles: usize,
}

impl PruneStats {
    pub fn new(smoothed_wall_tiles: usize, walls: ConvertOutcome, floors: ConvertOutcome) -> Self {
        Self {
            smoothed_wall_tiles,
            wall_regions: walls.converted_regions,
            wall_tiles: walls.converted_tiles,
            kept_wall_tiles: walls.retained_tiles,
            floor_regions: floors.converted_regions,
            floor_tiles: floors.converted_tiles,
            kept_floor_tiles: floors.retained_tiles,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct GeneratedRoom {
    /// Resolved seed string; feeding it back as an explicit seed replays the run.
    pub seed: String,
    pub fill_percent: u8,
    pub grid: Grid,
    pub graph: RoomGraph,
    pub passages: Vec<Passage>,
    pub markers: Vec<Marker>,
    pub pruning: PruneStats,
    pub mapping: WorldMapping,
    pub mesh: RoomMesh,
}

impl GeneratedRoom {
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = self.grid.canonical_bytes();
        bytes.push(self.fill_percent);
        bytes.extend((self.graph.len() as u32).to_le_bytes());
        bytes.extend((self.passages.len() as u32).to_le_bytes());
        bytes.extend((self.markers.len() as u32).to_le_bytes());
        for marker in &self.markers {
            match marker.kind {
                MarkerKind::Spawn => bytes.push(0),
                MarkerKind::Goal { value } => {
                    bytes.push(1);
                    bytes.extend(value.to_le_bytes());
                }
            }
            bytes.extend(marker.tile.x.to_le_bytes());
            bytes.extend(marker.tile.y.to_le_bytes());
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    pub fn spawn(&self) -> Option<&Marker> {
        self.markers.iter().find(|marker| marker.kind == MarkerKind::Spawn)
    }

    pub fn goals(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(|marker| matches!(marker.kind, MarkerKind::Goal { .. }))
    }
}
