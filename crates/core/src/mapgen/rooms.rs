//! Rooms (retained floor regions) and the room graph used by the connector.

use rayon::prelude::*;
use serde::Serialize;
use slotmap::SlotMap;

use super::grid::Grid;
use super::linkage::Linkage;
use super::regions::Region;
use crate::error::GenerationError;
use crate::types::{Coord, RoomId, TileKind};

/// A floor region promoted to a graph node. Tiles and edge tiles are fixed
/// after construction; connectivity lives in the owning [`RoomGraph`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Room {
    tiles: Vec<Coord>,
    edge_tiles: Vec<Coord>,
}

impl Room {
    /// Edge tiles are tiles with a wall directly left, right, below or
    /// above them. Diagonal contact does not count.
    pub fn from_region(region: Region, grid: &Grid) -> Result<Self, GenerationError> {
        let mut edge_tiles = Vec::new();
        for &tile in &region.tiles {
            let mut is_edge = false;
            for neighbor in tile.orthogonal_neighbors() {
                match grid.get(neighbor) {
                    None => {
                        return Err(GenerationError::EdgeTileOutOfBounds { x: tile.x, y: tile.y });
                    }
                    Some(TileKind::Wall) => is_edge = true,
                    Some(TileKind::Floor) => {}
                }
            }
            if is_edge {
                edge_tiles.push(tile);
            }
        }

        if edge_tiles.is_empty() {
            let first = region.tiles.first().copied().unwrap_or_default();
            return Err(GenerationError::NoEdgeTiles { x: first.x, y: first.y });
        }

        Ok(Self { tiles: region.tiles, edge_tiles })
    }

    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    pub fn tiles(&self) -> &[Coord] {
        &self.tiles
    }

    pub fn edge_tiles(&self) -> &[Coord] {
        &self.edge_tiles
    }
}

pub fn build_rooms(grid: &Grid, regions: Vec<Region>) -> Result<Vec<Room>, GenerationError> {
    regions
        .into_par_iter()
        .enumerate()
        .map(|(index, region)| {
            Room::from_region(region, grid).inspect_err(|error| {
                log::error!("building room from region {index} failed: {error}");
            })
        })
        .collect()
}

/// Arena of rooms. `ids()` lists rooms largest first; the first one is the
/// main room.
#[derive(Clone, Debug, Serialize)]
pub struct RoomGraph {
    rooms: SlotMap<RoomId, Room>,
    order: Vec<RoomId>,
    linkage: Linkage<RoomId>,
}

impl RoomGraph {
    pub fn new(mut rooms: Vec<Room>) -> Result<Self, GenerationError> {
        if rooms.is_empty() {
            return Err(GenerationError::NoRooms { threshold: 0 });
        }
        rooms.sort_by(|a, b| b.size().cmp(&a.size()));

        let mut arena = SlotMap::with_key();
        let order: Vec<RoomId> = rooms.into_iter().map(|room| arena.insert(room)).collect();
        let mut linkage = Linkage::new(order.iter().copied());
        linkage.set_accessible_from_main(order[0]);

        Ok(Self { rooms: arena, order, linkage })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn ids(&self) -> &[RoomId] {
        &self.order
    }

    pub fn main_room(&self) -> RoomId {
        self.order[0]
    }

    pub fn is_main(&self, id: RoomId) -> bool {
        self.order.first() == Some(&id)
    }

    pub fn get(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn by_rank(&self, rank: usize) -> Option<(RoomId, &Room)> {
        let id = *self.order.get(rank)?;
        self.rooms.get(id).map(|room| (id, room))
    }

    pub fn iter(&self) -> impl Iterator<Item = (RoomId, &Room)> {
        self.order.iter().filter_map(|&id| self.rooms.get(id).map(|room| (id, room)))
    }

    pub fn connected_rooms(&self, id: RoomId) -> impl Iterator<Item = RoomId> + '_ {
        self.linkage.connections(id)
    }

    pub fn connection_count(&self, id: RoomId) -> usize {
        self.linkage.connection_count(id)
    }

    pub fn is_connected(&self, a: RoomId, b: RoomId) -> bool {
        self.linkage.is_connected(a, b)
    }

    pub fn is_accessible_from_main(&self, id: RoomId) -> bool {
        self.linkage.is_accessible(id)
    }

    pub fn all_accessible(&self) -> bool {
        self.linkage.all_accessible()
    }

    pub fn inaccessible_count(&self) -> usize {
        self.linkage.inaccessible_count()
    }

    pub fn is_single_component(&self) -> bool {
        self.linkage.component_size(self.main_room()) == self.len()
    }

    pub fn link_count(&self) -> usize {
        self.linkage.link_count()
    }

    pub(crate) fn link(&mut self, a: RoomId, b: RoomId) {
        self.linkage.link(a, b);
    }

    pub fn total_tiles(&self) -> usize {
        self.rooms.values().map(Room::size).sum()
    }
}
