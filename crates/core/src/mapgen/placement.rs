//! Spawn and goal placement, and connecting an arbitrary tile into the
//! corridor network.

use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use super::grid::Grid;
use super::passage::{Passage, create_passage};
use super::rooms::{Room, RoomGraph};
use super::seed::random_below;
use crate::coords::WorldPoint;
use crate::error::GenerationError;
use crate::types::Coord;

pub const END_GOAL_VALUE: u32 = 2500;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MarkerKind {
    Spawn,
    Goal { value: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub tile: Coord,
    pub position: WorldPoint,
}

/// Carves a corridor from the nearest room edge tile to `point`. The
/// nearest tile is the exact minimum over all rooms, ties going to the
/// larger room and then to the earlier edge tile.
pub fn connect_to_point(
    grid: &mut Grid,
    graph: &RoomGraph,
    point: Coord,
    radius: u32,
) -> Result<Passage, GenerationError> {
    if !grid.in_bounds(point) {
        return Err(GenerationError::PointOutOfBounds {
            x: point.x,
            y: point.y,
            width: grid.width(),
            height: grid.height(),
        });
    }

    let nearest = graph
        .iter()
        .flat_map(|(_, room)| room.edge_tiles().iter().copied())
        .min_by_key(|tile| tile.squared_distance(point))
        .ok_or(GenerationError::NoRooms { threshold: 0 })?;

    Ok(create_passage(grid, nearest, point, radius))
}

/// Picks a tile for a marker. `room` selects by size rank (0 = main room);
/// `None` draws a random room. Open tiles (no surrounding walls) are
/// preferred, otherwise a random edge tile is used.
pub fn pick_room_tile(
    grid: &Grid,
    graph: &RoomGraph,
    room: Option<usize>,
    rng: &mut ChaCha8Rng,
) -> Result<Coord, GenerationError> {
    let rank = match room {
        Some(rank) => rank,
        None => random_below(rng, graph.len()),
    };
    let (_, room) = graph
        .by_rank(rank)
        .ok_or(GenerationError::RoomIndexOutOfRange { index: rank, count: graph.len() })?;
    Ok(pick_tile_in(grid, room, rng))
}

fn pick_tile_in(grid: &Grid, room: &Room, rng: &mut ChaCha8Rng) -> Coord {
    let open: Vec<Coord> = room
        .tiles()
        .iter()
        .copied()
        .filter(|&tile| grid.surrounding_wall_count(tile) == 0)
        .collect();
    if !open.is_empty() {
        return open[random_below(rng, open.len())];
    }
    let edges = room.edge_tiles();
    edges[random_below(rng, edges.len())]
}

#[cfg(test)]
mod tests {
    use rand_chacha::rand_core::SeedableRng;

    use super::*;
    use crate::mapgen::regions::get_regions;
    use crate::mapgen::rooms::build_rooms;
    use crate::types::TileKind;

    fn grid_with_rooms() -> (Grid, RoomGraph) {
        let mut grid = Grid::filled(30, 20, TileKind::Wall);
        for y in 2..10 {
            for x in 2..12 {
                grid.set(Coord::new(x, y), TileKind::Floor);
            }
        }
        for y in 14..16 {
            for x in 20..26 {
                grid.set(Coord::new(x, y), TileKind::Floor);
            }
        }
        let rooms = build_rooms(&grid, get_regions(&grid, TileKind::Floor)).expect("rooms");
        let graph = RoomGraph::new(rooms).expect("graph");
        (grid, graph)
    }

    #[test]
    fn connect_to_point_starts_from_the_nearest_edge_tile() {
        let (mut grid, graph) = grid_with_rooms();
        let target = Coord::new(16, 5);
        let passage = connect_to_point(&mut grid, &graph, target, 0).expect("passage");
        assert_eq!(passage.from.x, 11);
        assert_eq!(passage.from.y, 5);
        assert_eq!(passage.to, target);
        assert_eq!(grid.get(target), Some(TileKind::Floor));
    }

    #[test]
    fn connect_to_point_rejects_points_outside_the_grid() {
        let (mut grid, graph) = grid_with_rooms();
        let result = connect_to_point(&mut grid, &graph, Coord::new(30, 2), 1);
        assert_eq!(
            result,
            Err(GenerationError::PointOutOfBounds { x: 30, y: 2, width: 30, height: 20 })
        );
    }

    #[test]
    fn open_tiles_are_preferred_over_edges() {
        let (grid, graph) = grid_with_rooms();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..20 {
            let tile = pick_room_tile(&grid, &graph, Some(0), &mut rng).expect("tile");
            assert_eq!(grid.surrounding_wall_count(tile), 0);
        }
    }

    #[test]
    fn thin_rooms_fall_back_to_edge_tiles() {
        let (grid, graph) = grid_with_rooms();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let tile = pick_room_tile(&grid, &graph, Some(1), &mut rng).expect("tile");
        let (_, thin) = graph.by_rank(1).expect("second room");
        assert!(thin.edge_tiles().contains(&tile));
    }

    #[test]
    fn room_rank_out_of_range_is_reported() {
        let (grid, graph) = grid_with_rooms();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert_eq!(
            pick_room_tile(&grid, &graph, Some(7), &mut rng),
            Err(GenerationError::RoomIndexOutOfRange { index: 7, count: 2 })
        );
    }
}
