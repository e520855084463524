//! Random fill and cellular-automaton smoothing.

use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use super::grid::Grid;
use super::seed::roll_percent;
use crate::types::{Coord, TileKind};

pub fn random_fill(width: usize, height: usize, fill_percent: u8, rng: &mut ChaCha8Rng) -> Grid {
    let mut grid = Grid::filled(width, height, TileKind::Wall);
    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            if roll_percent(rng) >= fill_percent {
                grid.set(Coord { x: x as i32, y: y as i32 }, TileKind::Floor);
            }
        }
    }
    grid
}

/// One synchronous smoothing pass. Every neighbour count is taken from
/// `grid` as it was before the pass; more than 4 walls makes a wall, fewer
/// than 4 makes floor, exactly 4 keeps the previous tile.
pub fn smooth(grid: &Grid) -> Grid {
    let width = grid.width();
    let mut next = grid.clone();
    next.tiles_mut().par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, tile) in row.iter_mut().enumerate() {
            let walls = grid.surrounding_wall_count(Coord { x: x as i32, y: y as i32 });
            if walls > 4 {
                *tile = TileKind::Wall;
            } else if walls < 4 {
                *tile = TileKind::Floor;
            }
        }
    });
    next
}

pub fn smooth_times(mut grid: Grid, iterations: usize) -> Grid {
    for _ in 0..iterations {
        grid = smooth(&grid);
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::seed::seeded_rng;

    fn border_is_wall(grid: &Grid) -> bool {
        grid.coords()
            .filter(|&pos| grid.is_border(pos))
            .all(|pos| grid.get(pos) == Some(TileKind::Wall))
    }

    #[test]
    fn random_fill_seals_the_border() {
        let mut rng = seeded_rng("border");
        let grid = random_fill(30, 20, 0, &mut rng);
        assert!(border_is_wall(&grid));
        assert_eq!(grid.count(TileKind::Floor), 28 * 18);
    }

    #[test]
    fn full_fill_percent_walls_everything() {
        let mut rng = seeded_rng("full");
        let grid = random_fill(12, 12, 100, &mut rng);
        assert_eq!(grid.count(TileKind::Floor), 0);
    }

    #[test]
    fn smoothing_keeps_tie_cells_unchanged() {
        // Centre cell of this pattern has exactly 4 wall neighbours.
        let rows = vec![
            vec![1, 1, 1, 1, 1],
            vec![1, 1, 1, 0, 1],
            vec![1, 1, 0, 0, 1],
            vec![1, 1, 0, 0, 1],
            vec![1, 1, 1, 1, 1],
        ];
        let grid = Grid::from_rows(&rows).expect("valid grid");
        let center = Coord::new(2, 2);
        assert_eq!(grid.surrounding_wall_count(center), 4);

        let smoothed = smooth(&grid);
        assert_eq!(smoothed.get(center), Some(TileKind::Floor));
    }

    #[test]
    fn smoothing_reads_the_previous_pass_only() {
        // A diagonal of floor cells: in-place scanning would see already
        // rewritten neighbours and produce a different result.
        let mut grid = Grid::filled(7, 7, TileKind::Wall);
        for i in 1..6 {
            grid.set(Coord::new(i, i), TileKind::Floor);
        }
        let smoothed = smooth(&grid);
        for y in 0..7 {
            for x in 0..7 {
                let pos = Coord::new(x, y);
                let walls = grid.surrounding_wall_count(pos);
                let expected = match walls {
                    w if w > 4 => TileKind::Wall,
                    w if w < 4 => TileKind::Floor,
                    _ => grid.get(pos).expect("in bounds"),
                };
                assert_eq!(smoothed.get(pos), Some(expected), "cell {pos:?}");
            }
        }
    }

    #[test]
    fn smoothing_is_deterministic_for_the_same_seed() {
        let mut left_rng = seeded_rng("smooth");
        let mut right_rng = seeded_rng("smooth");
        let left = smooth_times(random_fill(40, 40, 45, &mut left_rng), 5);
        let right = smooth_times(random_fill(40, 40, 45, &mut right_rng), 5);
        assert_eq!(left.canonical_bytes(), right.canonical_bytes());
        assert!(border_is_wall(&left));
    }
}
