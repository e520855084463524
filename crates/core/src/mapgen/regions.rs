//! Flood-fill region extraction and size-threshold pruning.

use std::collections::VecDeque;

use super::grid::Grid;
use crate::types::{Coord, TileKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub tile: TileKind,
    pub tiles: Vec<Coord>,
}

impl Region {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn touches_border(&self, grid: &Grid) -> bool {
        self.tiles.iter().any(|&tile| grid.is_border(tile))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConvertOutcome {
    pub converted_regions: usize,
    pub converted_tiles: usize,
    pub retained_tiles: usize,
}

pub fn get_regions(grid: &Grid, tile: TileKind) -> Vec<Region> {
    let mut visited = vec![false; grid.width() * grid.height()];
    let mut regions = Vec::new();
    for pos in grid.coords() {
        let index = grid.index(pos.x as usize, pos.y as usize);
        if visited[index] || grid.get(pos) != Some(tile) {
            continue;
        }
        regions.push(flood_fill(grid, pos, &mut visited));
    }
    regions
}

fn flood_fill(grid: &Grid, start: Coord, visited: &mut [bool]) -> Region {
    let tile = grid.tile(start.x as usize, start.y as usize);
    let mut tiles = Vec::new();
    let mut open = VecDeque::from([start]);
    visited[grid.index(start.x as usize, start.y as usize)] = true;

    while let Some(pos) = open.pop_front() {
        tiles.push(pos);
        for next in pos.orthogonal_neighbors() {
            if grid.get(next) != Some(tile) {
                continue;
            }
            let index = grid.index(next.x as usize, next.y as usize);
            if visited[index] {
                continue;
            }
            visited[index] = true;
            open.push_back(next);
        }
    }

    Region { tile, tiles }
}

/// Rewrites every region smaller than `threshold` to the opposite tile type
/// and returns the regions that were kept. Regions touching the grid border
/// are always kept so the border stays sealed.
pub fn region_convert(
    grid: &mut Grid,
    regions: Vec<Region>,
    threshold: usize,
) -> (Vec<Region>, ConvertOutcome) {
    let mut outcome = ConvertOutcome::default();
    let mut retained = Vec::new();
    for region in regions {
        if region.len() >= threshold || region.touches_border(grid) {
            outcome.retained_tiles += region.len();
            retained.push(region);
            continue;
        }
        let replacement = region.tile.opposite();
        for &tile in &region.tiles {
            grid.set(tile, replacement);
        }
        outcome.converted_regions += 1;
        outcome.converted_tiles += region.len();
    }
    (retained, outcome)
}
