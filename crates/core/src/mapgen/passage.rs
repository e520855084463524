//! Corridor carving: a Bresenham line swept with a disc brush.

use rayon::prelude::*;
use serde::Serialize;

use super::grid::Grid;
use crate::types::{Coord, TileKind};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Passage {
    pub from: Coord,
    pub to: Coord,
    pub radius: u32,
    pub line: Vec<Coord>,
    pub carved: usize,
}

/// Integer line from `from` to `to`, both endpoints included. The major
/// axis is stepped every iteration and the minor axis whenever the
/// accumulated slope error reaches the major length.
pub fn line_between(from: Coord, to: Coord) -> Vec<Coord> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let steep = dy.abs() > dx.abs();
    let (longest, shortest, major_step, minor_step) = if steep {
        (dy.abs(), dx.abs(), dy.signum(), dx.signum())
    } else {
        (dx.abs(), dy.abs(), dx.signum(), dy.signum())
    };

    let mut line = Vec::with_capacity(longest as usize + 1);
    let mut pos = from;
    let mut error = longest / 2;
    for _ in 0..longest {
        line.push(pos);
        if steep {
            pos.y += major_step;
        } else {
            pos.x += major_step;
        }
        error += shortest;
        if error >= longest {
            if steep {
                pos.x += minor_step;
            } else {
                pos.y += minor_step;
            }
            error -= longest;
        }
    }
    line.push(pos);
    line
}

pub fn disc_offsets(radius: u32) -> Vec<Coord> {
    let r = i32::try_from(radius).unwrap_or(i32::MAX);
    let r_squared = i64::from(r) * i64::from(r);
    let mut offsets = Vec::new();
    for dx in -r..=r {
        for dy in -r..=r {
            if i64::from(dx).pow(2) + i64::from(dy).pow(2) <= r_squared {
                offsets.push(Coord::new(dx, dy));
            }
        }
    }
    offsets
}

/// Only interior cells are cleared. Radii above `width + height` are capped,
/// since such a disc already covers the whole grid.
pub fn create_passage(grid: &mut Grid, from: Coord, to: Coord, radius: u32) -> Passage {
    let line = line_between(from, to);
    let reach = u32::try_from(grid.width() + grid.height()).unwrap_or(u32::MAX);
    let offsets = disc_offsets(radius.min(reach));

    let cells: Vec<Coord> = {
        let view: &Grid = grid;
        line.par_iter()
            .flat_map_iter(|&point| {
                offsets
                    .iter()
                    .map(move |offset| Coord::new(point.x + offset.x, point.y + offset.y))
                    .filter(|&cell| view.is_interior(cell))
            })
            .collect()
    };

    let mut carved = 0;
    for cell in cells {
        if grid.get(cell) == Some(TileKind::Wall) {
            grid.set(cell, TileKind::Floor);
            carved += 1;
        }
    }

    log::debug!(
        "passage ({}, {}) -> ({}, {}) r={radius}: {} points, {carved} cells cleared",
        from.x,
        from.y,
        to.x,
        to.y,
        line.len()
    );

    Passage { from, to, radius, line, carved }
}
