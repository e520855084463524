//! Tile grid storage and tile-space primitives.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::GenerationError;
use crate::types::{Coord, TileKind};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>,
}

impl Grid {
    pub fn filled(width: usize, height: usize, tile: TileKind) -> Self {
        Self { width, height, tiles: vec![tile; width * height] }
    }

    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, GenerationError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(GenerationError::InvalidConfig(format!(
                "grid must not be empty, got {width}x{height}"
            )));
        }

        let mut tiles = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GenerationError::JaggedGrid { row: y, expected: width, found: row.len() });
            }
            for (x, &value) in row.iter().enumerate() {
                let tile =
                    TileKind::from_value(value).ok_or(GenerationError::UnknownTile { x, y, value })?;
                tiles.push(tile);
            }
        }
        Ok(Self { width, height, tiles })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut [TileKind] {
        &mut self.tiles
    }

    pub fn in_bounds(&self, pos: Coord) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn is_border(&self, pos: Coord) -> bool {
        self.in_bounds(pos)
            && (pos.x == 0
                || pos.y == 0
                || pos.x as usize == self.width - 1
                || pos.y as usize == self.height - 1)
    }

    pub fn is_interior(&self, pos: Coord) -> bool {
        self.in_bounds(pos) && !self.is_border(pos)
    }

    pub fn get(&self, pos: Coord) -> Option<TileKind> {
        self.in_bounds(pos).then(|| self.tiles[self.index(pos.x as usize, pos.y as usize)])
    }

    pub fn tile(&self, x: usize, y: usize) -> TileKind {
        self.tiles[self.index(x, y)]
    }

    pub fn set(&mut self, pos: Coord, tile: TileKind) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        let index = self.index(pos.x as usize, pos.y as usize);
        self.tiles[index] = tile;
        true
    }

    pub fn count(&self, tile: TileKind) -> usize {
        self.tiles.iter().filter(|&&candidate| candidate == tile).count()
    }

    /// Walls among the 8 cells around `pos`; cells outside the grid count
    /// as wall.
    pub fn surrounding_wall_count(&self, pos: Coord) -> u8 {
        let mut walls = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let neighbor = Coord { x: pos.x + dx, y: pos.y + dy };
                if self.get(neighbor).is_none_or(|tile| tile == TileKind::Wall) {
                    walls += 1;
                }
            }
        }
        walls
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| Coord { x: x as i32, y: y as i32 })
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = &[TileKind]> {
        self.tiles.chunks(self.width)
    }

    pub fn padded(&self, border: usize) -> Self {
        let width = self.width + border * 2;
        let height = self.height + border * 2;
        let mut padded = Self::filled(width, height, TileKind::Wall);
        for (y, row) in self.rows().enumerate() {
            let start = padded.index(border, y + border);
            padded.tiles[start..start + self.width].copy_from_slice(row);
        }
        padded
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.tiles.len());
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        bytes.extend(self.tiles.iter().map(|tile| tile.value()));
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.tiles.chunks(self.width).rev() {
            out.extend(row.iter().map(|tile| match tile {
                TileKind::Wall => '#',
                TileKind::Floor => '.',
            }));
            out.push('\n');
        }
        out
    }

    pub(crate) fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }
}
