//! Node arena for marching squares. Corner nodes sit on tile positions of
//! the padded grid; every corner also owns the midpoint towards its +z
//! ("above") and +x ("right") neighbour, so adjacent squares share
//! midpoints by id.

use crate::coords::{WorldMapping, WorldPoint};
use crate::mapgen::Grid;
use crate::types::TileKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Corner = 0,
    Above = 1,
    Right = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Named points of one square, corners first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Point {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    CentreTop,
    CentreRight,
    CentreBottom,
    CentreLeft,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Square {
    pub x: usize,
    pub y: usize,
    /// Bit per wall corner: top-left 8, top-right 4, bottom-right 2, bottom-left 1.
    pub configuration: u8,
    corners: [NodeId; 4],
    midpoints: [NodeId; 4],
}

impl Square {
    pub fn node(&self, point: Point) -> NodeId {
        match point {
            Point::TopLeft => self.corners[0],
            Point::TopRight => self.corners[1],
            Point::BottomRight => self.corners[2],
            Point::BottomLeft => self.corners[3],
            Point::CentreTop => self.midpoints[0],
            Point::CentreRight => self.midpoints[1],
            Point::CentreBottom => self.midpoints[2],
            Point::CentreLeft => self.midpoints[3],
        }
    }

    pub fn corners(&self) -> [NodeId; 4] {
        self.corners
    }
}

pub struct NodeGrid<'a> {
    grid: &'a Grid,
    mapping: &'a WorldMapping,
    vertex_index: Vec<Option<u32>>,
}

impl<'a> NodeGrid<'a> {
    /// `grid` must already be padded to the mapping's padded dimensions.
    pub fn new(grid: &'a Grid, mapping: &'a WorldMapping) -> Self {
        let vertex_index = vec![None; grid.width() * grid.height() * 3];
        Self { grid, mapping, vertex_index }
    }

    pub fn id(&self, x: usize, y: usize, kind: NodeKind) -> NodeId {
        NodeId((y * self.grid.width() + x) * 3 + kind as usize)
    }

    fn decode(&self, id: NodeId) -> (usize, usize, usize) {
        let cell = id.0 / 3;
        (cell % self.grid.width(), cell / self.grid.width(), id.0 % 3)
    }

    pub fn position(&self, id: NodeId) -> WorldPoint {
        let (x, y, kind) = self.decode(id);
        match kind {
            1 => self.mapping.above_midpoint(x, y),
            2 => self.mapping.right_midpoint(x, y),
            _ => self.mapping.node_position(x, y),
        }
    }

    pub fn is_active(&self, x: usize, y: usize) -> bool {
        self.grid.tile(x, y) == TileKind::Wall
    }

    pub fn vertex(&self, id: NodeId) -> Option<u32> {
        self.vertex_index[id.0]
    }

    /// Returns the node's vertex index, assigning `next` on first use. The
    /// flag is true when `next` was consumed.
    pub fn assign(&mut self, id: NodeId, next: u32) -> (u32, bool) {
        match self.vertex_index[id.0] {
            Some(index) => (index, false),
            None => {
                self.vertex_index[id.0] = Some(next);
                (next, true)
            }
        }
    }

    /// Squares between adjacent corner nodes, `x` outer and `y` inner.
    pub fn squares(&self) -> impl Iterator<Item = Square> + '_ {
        let (width, height) = (self.grid.width(), self.grid.height());
        (0..width.saturating_sub(1))
            .flat_map(move |x| (0..height.saturating_sub(1)).map(move |y| self.square(x, y)))
    }

    fn square(&self, x: usize, y: usize) -> Square {
        let corners = [
            self.id(x, y + 1, NodeKind::Corner),
            self.id(x + 1, y + 1, NodeKind::Corner),
            self.id(x + 1, y, NodeKind::Corner),
            self.id(x, y, NodeKind::Corner),
        ];
        let midpoints = [
            self.id(x, y + 1, NodeKind::Right),
            self.id(x + 1, y, NodeKind::Above),
            self.id(x, y, NodeKind::Right),
            self.id(x, y, NodeKind::Above),
        ];
        let configuration = [(x, y + 1, 8_u8), (x + 1, y + 1, 4), (x + 1, y, 2), (x, y, 1)]
            .into_iter()
            .filter(|&(cx, cy, _)| self.is_active(cx, cy))
            .fold(0, |acc, (_, _, bit)| acc | bit);
        Square { x, y, configuration, corners, midpoints }
    }
}
