//! Multi-room worlds: a `world_width × world_height` lattice of rooms,
//! joined with the same pairing then forced-reachability scheme the room
//! connector uses, with cell (0, 0) as the main cell.

use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use slotmap::SlotMap;
use xxhash_rust::xxh3::xxh3_64;

use crate::config::SeedSource;
use crate::coords::WorldPoint;
use crate::error::GenerationError;
use crate::mapgen::linkage::Linkage;
use crate::mapgen::seed::{derive_cell_seed, random_below, random_range, seeded_rng};
use crate::mapgen::{END_GOAL_VALUE, GeneratedRoom, MarkerKind, RoomGenerator, RoomLayout};
use crate::settings::Settings;
use crate::types::{CellId, Coord};

/// Small goals per non-spawn room, `min..=max`.
const SMALL_GOAL_COUNT: (usize, usize) = (5, 14);
const SMALL_GOAL_VALUE: (usize, usize) = (100, 149);
/// Lowest coordinate drawn for a doorway along a shared side.
const DOORWAY_MIN_OFFSET: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub x: usize,
    pub z: usize,
}

/// Where a passage towards a neighbouring room meets this room's border.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Doorway {
    pub neighbor: Cell,
    /// Border tile facing the neighbour.
    pub border_tile: Coord,
    /// Interior tile next to `border_tile` that the passage was carved to.
    pub entry: Coord,
    pub position: WorldPoint,
}

#[derive(Clone, Debug, Serialize)]
pub struct WorldRoom {
    pub cell: Cell,
    pub origin: WorldPoint,
    pub room: GeneratedRoom,
    pub doorways: Vec<Doorway>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GeneratedWorld {
    pub seed: String,
    pub width: usize,
    pub height: usize,
    /// Row-major by `z`, then `x`.
    pub rooms: Vec<WorldRoom>,
    pub links: Vec<(Cell, Cell)>,
    pub end_goal: Cell,
}

impl GeneratedWorld {
    pub fn room(&self, x: usize, z: usize) -> Option<&WorldRoom> {
        if x >= self.width || z >= self.height {
            return None;
        }
        self.rooms.get(z * self.width + x)
    }

    /// True when every room can be reached from (0, 0) over links.
    pub fn is_fully_connected(&self) -> bool {
        let mut cells: SlotMap<CellId, Cell> = SlotMap::with_key();
        let ids: Vec<CellId> = self.rooms.iter().map(|room| cells.insert(room.cell)).collect();
        let mut linkage = Linkage::new(ids.iter().copied());
        for &(a, b) in &self.links {
            linkage.link(ids[a.z * self.width + a.x], ids[b.z * self.width + b.x]);
        }
        ids.first().is_some_and(|&main| linkage.component_size(main) == ids.len())
    }

    pub fn fingerprint(&self) -> u64 {
        let mut bytes = Vec::new();
        for room in &self.rooms {
            bytes.extend(room.room.canonical_bytes());
            bytes.extend((room.doorways.len() as u32).to_le_bytes());
        }
        xxh3_64(&bytes)
    }
}

pub struct WorldGenerator {
    settings: Settings,
}

impl WorldGenerator {
    pub fn new(settings: Settings) -> Result<Self, GenerationError> {
        settings.room.validate()?;
        if settings.world_width == 0 || settings.world_height == 0 {
            return Err(GenerationError::InvalidConfig(format!(
                "world must have at least one room, got {}x{}",
                settings.world_width, settings.world_height
            )));
        }
        if settings.room_connection_width > settings.room.max_hall_radius() {
            return Err(GenerationError::InvalidConfig(format!(
                "room connection width {} exceeds {}",
                settings.room_connection_width,
                settings.room.max_hall_radius()
            )));
        }
        Ok(Self { settings })
    }

    pub fn generate(&self) -> Result<GeneratedWorld, GenerationError> {
        let (width, height) = self.settings.world_dimensions();
        let seed = self.settings.room.seed.resolve();
        let mut rng = seeded_rng(&seed);

        let mut arena: SlotMap<CellId, Cell> = SlotMap::with_key();
        let ids: Vec<CellId> = (0..height)
            .flat_map(|z| (0..width).map(move |x| Cell { x, z }))
            .map(|cell| arena.insert(cell))
            .collect();

        let mut layouts: Vec<RoomLayout> = ids
            .par_iter()
            .map(|&id| self.build_cell(&seed, arena[id]))
            .collect::<Result<_, _>>()?;
        log::debug!("world {width}x{height}: {} room layouts built", layouts.len());

        let lattice = Lattice { arena: &arena, ids: &ids, width, height };
        let links = lattice.link_cells(&mut rng)?;

        let mut doorways: Vec<Vec<Doorway>> = vec![Vec::new(); ids.len()];
        for &(a, b) in &links {
            let (point_a, point_b) = self.point_package(a, b, &mut rng);
            for (cell, neighbor, border_tile) in [(a, b, point_a), (b, a, point_b)] {
                let index = cell.z * width + cell.x;
                let doorway = self.carve_doorway(&mut layouts[index], cell, neighbor, border_tile)?;
                doorways[index].push(doorway);
            }
        }

        let end_goal = self.pick_end_goal_cell(&mut rng);
        layouts
            .par_iter_mut()
            .enumerate()
            .try_for_each(|(index, layout)| {
                let cell = arena[ids[index]];
                place_markers(layout, cell, end_goal).map_err(|source| cell_error(cell, source))
            })?;

        let rooms: Vec<WorldRoom> = layouts
            .into_par_iter()
            .zip(doorways)
            .enumerate()
            .map(|(index, (layout, doorways))| {
                let cell = arena[ids[index]];
                let origin = layout.mapping().origin();
                let room = layout.finish().map_err(|source| cell_error(cell, source))?;
                Ok(WorldRoom { cell, origin, room, doorways })
            })
            .collect::<Result<_, GenerationError>>()?;

        log::info!(
            "world seed={seed:?} {width}x{height} rooms, {} links, end goal in ({}, {})",
            links.len(),
            end_goal.x,
            end_goal.z
        );
        Ok(GeneratedWorld { seed, width, height, rooms, links, end_goal })
    }

    /// Room origin on the floor plane: rooms are spaced one and a half room
    /// sizes apart.
    pub fn room_origin(&self, cell: Cell) -> WorldPoint {
        let room = &self.settings.room;
        let pitch_x = (room.width + room.width / 2) as f32 * room.tile_size;
        let pitch_z = (room.height + room.height / 2) as f32 * room.tile_size;
        WorldPoint::new(cell.x as f32 * pitch_x, room.elevation, cell.z as f32 * pitch_z)
    }

    fn build_cell(&self, world_seed: &str, cell: Cell) -> Result<RoomLayout, GenerationError> {
        let mut config = self.settings.room.clone();
        config.seed = SeedSource::Explicit(derive_cell_seed(world_seed, cell.x, cell.z));
        RoomGenerator::with_origin(config, self.room_origin(cell))
            .and_then(|generator| generator.build_layout())
            .map_err(|source| cell_error(cell, source))
    }

    /// Facing border tiles for a link between neighbouring cells. The
    /// coordinate along the shared side is drawn once and used by both.
    fn point_package(&self, a: Cell, b: Cell, rng: &mut ChaCha8Rng) -> (Coord, Coord) {
        let room = &self.settings.room;
        let (x_a, x_b) = facing(a.x, b.x, room.width, rng);
        let (z_a, z_b) = facing(a.z, b.z, room.height, rng);
        (Coord::new(x_a as i32, z_a as i32), Coord::new(x_b as i32, z_b as i32))
    }

    fn carve_doorway(
        &self,
        layout: &mut RoomLayout,
        cell: Cell,
        neighbor: Cell,
        border_tile: Coord,
    ) -> Result<Doorway, GenerationError> {
        let room = &self.settings.room;
        let entry = Coord::new(
            border_tile.x.clamp(1, room.width as i32 - 2),
            border_tile.y.clamp(1, room.height as i32 - 2),
        );
        layout
            .connect_to_point_with(entry, self.settings.room_connection_width)
            .map_err(|source| cell_error(cell, source))?;
        let position = layout.mapping().tile_to_world(border_tile);
        Ok(Doorway { neighbor, border_tile, entry, position })
    }

    /// Random cell in the far-corner band of width `end_goal_threshold`.
    fn pick_end_goal_cell(&self, rng: &mut ChaCha8Rng) -> Cell {
        let threshold = self.settings.end_goal_threshold;
        let pick = |size: usize, rng: &mut ChaCha8Rng| {
            let last = size - 1;
            let value = random_range(rng, last.saturating_sub(threshold), last);
            if value == 0 { last } else { value }
        };
        let x = pick(self.settings.world_width, rng);
        let z = pick(self.settings.world_height, rng);
        Cell { x, z }
    }
}

/// Border coordinates along one axis for cells at `a` and `b`. Equal
/// positions share a random coordinate in `[5, side - 1)`, or the middle
/// when the side is too short for that range.
fn facing(a: usize, b: usize, side: usize, rng: &mut ChaCha8Rng) -> (usize, usize) {
    let last = side - 1;
    if b < a {
        (0, last)
    } else if b > a {
        (last, 0)
    } else if last > DOORWAY_MIN_OFFSET + 1 {
        let shared = random_range(rng, DOORWAY_MIN_OFFSET, last - 1);
        (shared, shared)
    } else {
        (side / 2, side / 2)
    }
}

fn place_markers(layout: &mut RoomLayout, cell: Cell, end_goal: Cell) -> Result<(), GenerationError> {
    if (cell.x, cell.z) == (0, 0) {
        layout.place_marker(MarkerKind::Spawn, Some(0))?;
    }
    if cell == end_goal {
        layout.place_marker(MarkerKind::Goal { value: END_GOAL_VALUE }, None)?;
    }
    if (cell.x, cell.z) != (0, 0) {
        let count = random_range(layout.rng(), SMALL_GOAL_COUNT.0, SMALL_GOAL_COUNT.1);
        for _ in 0..count {
            let value = random_range(layout.rng(), SMALL_GOAL_VALUE.0, SMALL_GOAL_VALUE.1) as u32;
            layout.place_marker(MarkerKind::Goal { value }, None)?;
        }
    }
    Ok(())
}

fn cell_error(cell: Cell, source: GenerationError) -> GenerationError {
    log::error!("room generation for world cell ({}, {}) failed: {source}", cell.x, cell.z);
    GenerationError::WorldCell { x: cell.x, z: cell.z, source: Box::new(source) }
}

struct Lattice<'a> {
    arena: &'a SlotMap<CellId, Cell>,
    ids: &'a [CellId],
    width: usize,
    height: usize,
}

impl Lattice<'_> {
    fn neighbors(&self, id: CellId) -> Vec<CellId> {
        let Cell { x, z } = self.arena[id];
        let mut out = Vec::with_capacity(4);
        if x > 0 {
            out.push(self.ids[z * self.width + x - 1]);
        }
        if x + 1 < self.width {
            out.push(self.ids[z * self.width + x + 1]);
        }
        if z > 0 {
            out.push(self.ids[(z - 1) * self.width + x]);
        }
        if z + 1 < self.height {
            out.push(self.ids[(z + 1) * self.width + x]);
        }
        out
    }

    /// Pairing pass over cells in random order, then forced links from
    /// unreachable cells to reachable neighbours until (0, 0) reaches all.
    fn link_cells(&self, rng: &mut ChaCha8Rng) -> Result<Vec<(Cell, Cell)>, GenerationError> {
        let mut linkage = Linkage::new(self.ids.iter().copied());
        linkage.set_accessible_from_main(self.ids[0]);
        let mut links = Vec::new();

        let mut order = self.ids.to_vec();
        for i in (1..order.len()).rev() {
            order.swap(i, random_below(rng, i + 1));
        }
        for id in order {
            if linkage.connection_count(id) > 0 {
                continue;
            }
            let neighbors = self.neighbors(id);
            if neighbors.is_empty() {
                continue;
            }
            let other = neighbors[random_below(rng, neighbors.len())];
            linkage.link(id, other);
            links.push((self.arena[id], self.arena[other]));
        }

        while !linkage.all_accessible() {
            let candidates: Vec<(CellId, CellId)> = self
                .ids
                .iter()
                .filter(|&&id| !linkage.is_accessible(id))
                .flat_map(|&id| {
                    self.neighbors(id)
                        .into_iter()
                        .filter(|&other| linkage.is_accessible(other))
                        .map(move |other| (id, other))
                })
                .collect();
            if candidates.is_empty() {
                return Err(GenerationError::UnreachableRooms {
                    remaining: linkage.inaccessible_count(),
                });
            }
            let (id, other) = candidates[random_below(rng, candidates.len())];
            linkage.link(id, other);
            links.push((self.arena[id], self.arena[other]));
        }

        log::debug!("linked {} world cells with {} links", self.ids.len(), links.len());
        Ok(links)
    }
}
