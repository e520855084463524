//! Grid-space to world-space mapping.
//!
//! Every externally visible position (mesh vertices, marker positions, room
//! origins in a world) goes through [`WorldMapping`]. The mapping is a
//! uniform scale plus offset, so squared grid distances order candidates the
//! same way world distances would; the room connector compares in grid space.

use serde::{Deserialize, Serialize};

use crate::types::Coord;

/// World position. The floor plane is `x`/`z`, `y` points up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPoint {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn offset(self, dx: f32, dy: f32, dz: f32) -> Self {
        Self { x: self.x + dx, y: self.y + dy, z: self.z + dz }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldMapping {
    origin: WorldPoint,
    tile_size: f32,
    width: usize,
    height: usize,
    border: usize,
}

impl WorldMapping {
    /// `width`/`height` are the unpadded room dimensions; `border` tiles of
    /// padding are added on every side when meshing.
    pub fn new(
        origin: WorldPoint,
        tile_size: f32,
        width: usize,
        height: usize,
        border: usize,
    ) -> Self {
        Self { origin, tile_size, width, height, border }
    }

    pub fn origin(&self) -> WorldPoint {
        self.origin
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn border(&self) -> usize {
        self.border
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn padded_dimensions(&self) -> (usize, usize) {
        (self.width + self.border * 2, self.height + self.border * 2)
    }

    /// Position of the control node at padded-grid index (`px`, `py`). The
    /// padded grid is centred on the origin.
    pub fn node_position(&self, px: usize, py: usize) -> WorldPoint {
        let (padded_width, padded_height) = self.padded_dimensions();
        let half_width = padded_width as f32 * self.tile_size / 2.0;
        let half_height = padded_height as f32 * self.tile_size / 2.0;
        WorldPoint {
            x: self.origin.x - half_width + px as f32 * self.tile_size,
            y: self.origin.y,
            z: self.origin.z - half_height + py as f32 * self.tile_size,
        }
    }

    pub fn above_midpoint(&self, px: usize, py: usize) -> WorldPoint {
        self.node_position(px, py).offset(0.0, 0.0, self.tile_size / 2.0)
    }

    pub fn right_midpoint(&self, px: usize, py: usize) -> WorldPoint {
        self.node_position(px, py).offset(self.tile_size / 2.0, 0.0, 0.0)
    }

    pub fn tile_to_world(&self, tile: Coord) -> WorldPoint {
        let (padded_width, padded_height) = self.padded_dimensions();
        let half_width = padded_width as f32 * self.tile_size / 2.0;
        let half_height = padded_height as f32 * self.tile_size / 2.0;
        WorldPoint {
            x: self.origin.x - half_width + (tile.x as f32 + self.border as f32) * self.tile_size,
            y: self.origin.y,
            z: self.origin.z - half_height + (tile.y as f32 + self.border as f32) * self.tile_size,
        }
    }

    pub fn world_to_tile(&self, point: WorldPoint) -> Coord {
        let (padded_width, padded_height) = self.padded_dimensions();
        let half_width = padded_width as f32 * self.tile_size / 2.0;
        let half_height = padded_height as f32 * self.tile_size / 2.0;
        let px = (point.x - self.origin.x + half_width) / self.tile_size - self.border as f32;
        let pz = (point.z - self.origin.z + half_height) / self.tile_size - self.border as f32;
        Coord { x: px.round() as i32, y: pz.round() as i32 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_and_node_positions_agree_through_the_border_offset() {
        let mapping = WorldMapping::new(WorldPoint::new(10.0, 15.0, -4.0), 2.0, 20, 10, 1);
        let tile = Coord::new(3, 4);
        assert_eq!(mapping.tile_to_world(tile), mapping.node_position(4, 5));
    }

    #[test]
    fn padded_grid_is_centred_on_the_origin() {
        let mapping = WorldMapping::new(WorldPoint::default(), 1.0, 8, 6, 1);
        let first = mapping.node_position(0, 0);
        assert_eq!(first, WorldPoint::new(-5.0, 0.0, -4.0));
        let (pw, ph) = mapping.padded_dimensions();
        let last = mapping.node_position(pw, ph);
        assert_eq!(last, WorldPoint::new(5.0, 0.0, 4.0));
    }

    #[test]
    fn world_to_tile_inverts_tile_to_world() {
        let mapping = WorldMapping::new(WorldPoint::new(150.0, 15.0, 75.0), 1.5, 40, 30, 2);
        for tile in [Coord::new(0, 0), Coord::new(39, 29), Coord::new(12, 7)] {
            assert_eq!(mapping.world_to_tile(mapping.tile_to_world(tile)), tile);
        }
    }

    #[test]
    fn midpoints_sit_half_a_tile_from_their_node() {
        let mapping = WorldMapping::new(WorldPoint::default(), 2.0, 4, 4, 0);
        let node = mapping.node_position(1, 1);
        assert_eq!(mapping.right_midpoint(1, 1), node.offset(1.0, 0.0, 0.0));
        assert_eq!(mapping.above_midpoint(1, 1), node.offset(0.0, 0.0, 1.0));
    }
}
