//! Room generation orchestration: fill, smooth, prune, connect, place and
//! tessellate.

use rand_chacha::ChaCha8Rng;

use super::automaton::{random_fill, smooth_times};
use super::connector::connect_rooms;
use super::grid::Grid;
use super::model::{GeneratedRoom, PruneStats};
use super::passage::Passage;
use super::placement::{END_GOAL_VALUE, Marker, MarkerKind, connect_to_point, pick_room_tile};
use super::regions::{get_regions, region_convert};
use super::rooms::{RoomGraph, build_rooms};
use super::seed::seeded_rng;
use crate::config::GenerationConfig;
use crate::coords::{WorldMapping, WorldPoint};
use crate::error::GenerationError;
use crate::mesh::generate_mesh;
use crate::types::{Coord, TileKind};

pub struct RoomGenerator {
    config: GenerationConfig,
    origin: WorldPoint,
}

impl RoomGenerator {
    /// Validates `config` up front so no grid is allocated for a run that
    /// cannot succeed. The room is centred on `(0, elevation, 0)`.
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        let origin = WorldPoint::new(0.0, config.elevation, 0.0);
        Self::with_origin(config, origin)
    }

    pub fn with_origin(config: GenerationConfig, origin: WorldPoint) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self { config, origin })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn build_layout(&self) -> Result<RoomLayout, GenerationError> {
        let config = &self.config;
        let seed = config.seed.resolve();
        let mut rng = seeded_rng(&seed);
        let fill_percent = config.resolve_fill_percent(&mut rng);
        log::debug!(
            "room {}x{} seed={seed:?} fill={fill_percent}%",
            config.width,
            config.height
        );

        let grid = random_fill(config.width, config.height, fill_percent, &mut rng);
        let mut grid = smooth_times(grid, config.smooth_iterations);

        let smoothed_walls = grid.count(TileKind::Wall);
        let walls = get_regions(&grid, TileKind::Wall);
        let (_, wall_outcome) = region_convert(&mut grid, walls, config.wall_threshold);
        let floors = get_regions(&grid, TileKind::Floor);
        let (kept, floor_outcome) = region_convert(&mut grid, floors, config.room_threshold);
        let pruning = PruneStats::new(smoothed_walls, wall_outcome, floor_outcome);
        log::debug!(
            "pruned {} wall regions ({} tiles) and {} floor regions ({} tiles), {} rooms kept",
            pruning.wall_regions,
            pruning.wall_tiles,
            pruning.floor_regions,
            pruning.floor_tiles,
            kept.len()
        );

        if kept.is_empty() {
            return Err(GenerationError::NoRooms { threshold: config.room_threshold });
        }
        let rooms = build_rooms(&grid, kept)?;
        let mut graph = RoomGraph::new(rooms)?;
        let passages = connect_rooms(&mut grid, &mut graph, config.hall_radius)?;

        Ok(RoomLayout {
            seed,
            fill_percent,
            grid,
            graph,
            passages,
            markers: Vec::new(),
            pruning,
            mapping: config.mapping(self.origin),
            hall_radius: config.hall_radius,
            wall_height: config.wall_height,
            rng,
        })
    }

    pub fn generate(&self) -> Result<GeneratedRoom, GenerationError> {
        let mut layout = self.build_layout()?;
        layout.place_marker(MarkerKind::Spawn, Some(0))?;
        layout.place_marker(MarkerKind::Goal { value: END_GOAL_VALUE }, None)?;
        layout.finish()
    }
}

/// A connected room that can still receive markers and extra corridors.
/// The run's random stream continues here, so placement stays
/// deterministic for a given seed.
pub struct RoomLayout {
    pub seed: String,
    pub fill_percent: u8,
    pub grid: Grid,
    pub graph: RoomGraph,
    pub passages: Vec<Passage>,
    pub markers: Vec<Marker>,
    pub pruning: PruneStats,
    mapping: WorldMapping,
    hall_radius: u32,
    wall_height: f32,
    rng: ChaCha8Rng,
}

impl RoomLayout {
    pub fn mapping(&self) -> &WorldMapping {
        &self.mapping
    }

    pub(crate) fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn connect_to_point(&mut self, point: Coord) -> Result<&Passage, GenerationError> {
        self.connect_to_point_with(point, self.hall_radius)
    }

    pub fn connect_to_point_with(
        &mut self,
        point: Coord,
        radius: u32,
    ) -> Result<&Passage, GenerationError> {
        let passage = connect_to_point(&mut self.grid, &self.graph, point, radius)?;
        self.passages.push(passage);
        Ok(&self.passages[self.passages.len() - 1])
    }

    pub fn place_marker(
        &mut self,
        kind: MarkerKind,
        room: Option<usize>,
    ) -> Result<Marker, GenerationError> {
        let tile = pick_room_tile(&self.grid, &self.graph, room, &mut self.rng)?;
        self.connect_to_point(tile)?;
        let marker = Marker { kind, tile, position: self.mapping.tile_to_world(tile) };
        self.markers.push(marker);
        Ok(marker)
    }

    pub fn finish(self) -> Result<GeneratedRoom, GenerationError> {
        let mesh = generate_mesh(&self.grid, &self.mapping, self.wall_height)?;
        log::info!(
            "room seed={:?} fill={}% rooms={} corridors={} vertices={} outlines={}",
            self.seed,
            self.fill_percent,
            self.graph.len(),
            self.passages.len(),
            mesh.vertices.len(),
            mesh.outlines.len()
        );
        Ok(GeneratedRoom {
            seed: self.seed,
            fill_percent: self.fill_percent,
            grid: self.grid,
            graph: self.graph,
            passages: self.passages,
            markers: self.markers,
            pruning: self.pruning,
            mapping: self.mapping,
            mesh,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FillPercent, SeedSource};
    use crate::settings::Settings;

    fn config(seed: &str) -> GenerationConfig {
        GenerationConfig {
            width: 50,
            height: 50,
            fill: FillPercent::Explicit(45),
            seed: SeedSource::Explicit(seed.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn invalid_config_fails_before_generation() {
        let bad = GenerationConfig { width: 2, ..config("x") };
        assert!(matches!(RoomGenerator::new(bad), Err(GenerationError::InvalidConfig(_))));
    }

    #[test]
    fn layout_is_connected_and_pruned() {
        let layout = RoomGenerator::new(config("test123")).expect("config").build_layout().expect("layout");
        assert!(layout.graph.all_accessible());
        assert!(layout.graph.is_single_component());
        for (_, room) in layout.graph.iter() {
            assert!(room.size() >= 50);
        }
        assert_eq!(layout.fill_percent, 45);
    }

    #[test]
    fn generate_places_spawn_in_the_main_room_and_one_end_goal() {
        let room = RoomGenerator::new(config("markers")).expect("config").generate().expect("room");
        let spawn = room.spawn().expect("spawn");
        let main = room.graph.main_room();
        let main_tiles = room.graph.get(main).expect("main").tiles();
        assert!(main_tiles.contains(&spawn.tile));
        assert_eq!(room.grid.get(spawn.tile), Some(TileKind::Floor));

        let goals: Vec<&Marker> = room.goals().collect();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].kind, MarkerKind::Goal { value: END_GOAL_VALUE });
        assert_eq!(spawn.position, room.mapping.tile_to_world(spawn.tile));
    }

    #[test]
    fn clamped_hall_width_from_settings_still_generates() {
        let loaded = Settings::parse("roomwidth 40\nroomheight 40\nseed wide-halls\nhallwidth 50000\n");
        assert_eq!(loaded.settings.room.hall_radius, 20);
        match RoomGenerator::new(loaded.settings.room).expect("config").generate() {
            Ok(room) => assert!(room.graph.all_accessible()),
            Err(error) => assert!(matches!(error, GenerationError::NoRooms { .. }), "{error}"),
        }
    }

    #[test]
    fn too_high_room_threshold_reports_no_rooms() {
        let strict = GenerationConfig { room_threshold: 10_000, ..config("strict") };
        let result = RoomGenerator::new(strict).expect("config").build_layout();
        assert!(matches!(result, Err(GenerationError::NoRooms { threshold: 10_000 })));
    }
}
