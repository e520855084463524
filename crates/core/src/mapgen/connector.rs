//! Two-phase room connector. The pairing phase gives every isolated room
//! one corridor to its nearest neighbour; the forced phase then joins the
//! closest unreachable room to the main network until everything is
//! reachable from the main room.

use rayon::prelude::*;

use super::grid::Grid;
use super::passage::{Passage, create_passage};
use super::rooms::{Room, RoomGraph};
use crate::error::GenerationError;
use crate::types::{Coord, RoomId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectPhase {
    Pairing,
    ForceMainAccess,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Connection {
    pub from_room: RoomId,
    pub to_room: RoomId,
    pub from_tile: Coord,
    pub to_tile: Coord,
    pub distance: u64,
}

/// Orders equal-distance candidates by source position, target position,
/// then edge-tile positions, so parallel searches pick the same pair as a
/// sequential scan would.
type Rank = (usize, usize, usize, usize);

pub fn connect_rooms(
    grid: &mut Grid,
    graph: &mut RoomGraph,
    hall_radius: u32,
) -> Result<Vec<Passage>, GenerationError> {
    let mut passages = Vec::new();
    let mut phase = ConnectPhase::Pairing;

    loop {
        match phase {
            ConnectPhase::Pairing => {
                let all: Vec<RoomId> = graph.ids().to_vec();
                for &room in &all {
                    if graph.connection_count(room) > 0 {
                        continue;
                    }
                    if let Some(connection) = closest_pair(graph, &[room], &all) {
                        passages.push(apply(grid, graph, connection, hall_radius));
                    }
                }
                log::debug!(
                    "pairing phase: {} corridors, {} rooms unreachable",
                    passages.len(),
                    graph.inaccessible_count()
                );
                phase = ConnectPhase::ForceMainAccess;
            }
            ConnectPhase::ForceMainAccess => {
                let (reachable, unreachable): (Vec<RoomId>, Vec<RoomId>) =
                    graph.ids().iter().partition(|&&room| graph.is_accessible_from_main(room));
                if unreachable.is_empty() {
                    break;
                }
                let Some(connection) = closest_pair(graph, &unreachable, &reachable) else {
                    log::error!(
                        "forced connection found no candidate for {} unreachable rooms",
                        unreachable.len()
                    );
                    return Err(GenerationError::UnreachableRooms { remaining: unreachable.len() });
                };
                passages.push(apply(grid, graph, connection, hall_radius));
            }
        }
    }

    log::debug!("connected {} rooms with {} corridors", graph.len(), passages.len());
    Ok(passages)
}

fn apply(grid: &mut Grid, graph: &mut RoomGraph, connection: Connection, radius: u32) -> Passage {
    graph.link(connection.from_room, connection.to_room);
    create_passage(grid, connection.from_tile, connection.to_tile, radius)
}

/// Exact closest edge-tile pair from any room in `sources` to any room in
/// `targets` it is not yet connected to. Room pairs are scanned in
/// parallel.
pub fn closest_pair(graph: &RoomGraph, sources: &[RoomId], targets: &[RoomId]) -> Option<Connection> {
    sources
        .par_iter()
        .enumerate()
        .flat_map_iter(|(source_rank, &from_room)| {
            targets.iter().enumerate().filter_map(move |(target_rank, &to_room)| {
                if from_room == to_room || graph.is_connected(from_room, to_room) {
                    return None;
                }
                let (from, to) = (graph.get(from_room)?, graph.get(to_room)?);
                let (distance, (from_edge, to_edge), from_tile, to_tile) = closest_tiles(from, to)?;
                let rank: Rank = (source_rank, target_rank, from_edge, to_edge);
                Some((distance, rank, Connection { from_room, to_room, from_tile, to_tile, distance }))
            })
        })
        .min_by_key(|&(distance, rank, _)| (distance, rank))
        .map(|(_, _, connection)| connection)
}

fn closest_tiles(a: &Room, b: &Room) -> Option<(u64, (usize, usize), Coord, Coord)> {
    let mut best: Option<(u64, (usize, usize), Coord, Coord)> = None;
    for (ia, &tile_a) in a.edge_tiles().iter().enumerate() {
        for (ib, &tile_b) in b.edge_tiles().iter().enumerate() {
            let distance = tile_a.squared_distance(tile_b);
            if best.is_none_or(|(current, ..)| distance < current) {
                best = Some((distance, (ia, ib), tile_a, tile_b));
            }
        }
    }
    best
}
