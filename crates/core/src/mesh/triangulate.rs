//! The 16-case marching-squares table and the vertex-deduplicating mesh
//! builder.

use super::nodes::{NodeGrid, Point, Square};
use crate::coords::WorldPoint;

use Point::{
    BottomLeft as BL, BottomRight as BR, CentreBottom as CB, CentreLeft as CL, CentreRight as CR,
    CentreTop as CT, TopLeft as TL, TopRight as TR,
};

/// Polygon per configuration, fanned from its first point. Every polygon
/// is listed clockwise when viewed from above.
pub const CASES: [&[Point]; 16] = [
    &[],
    &[CL, CB, BL],
    &[BR, CB, CR],
    &[CR, BR, BL, CL],
    &[TR, CR, CT],
    &[CT, TR, CR, CB, BL, CL],
    &[CT, TR, BR, CB],
    &[CT, TR, BR, BL, CL],
    &[TL, CT, CL],
    &[TL, CT, CB, BL],
    &[TL, CT, CR, BR, CB, CL],
    &[TL, CT, CR, BR, BL],
    &[TL, TR, CR, CL],
    &[TL, TR, CR, CB, BL],
    &[TL, TR, BR, CB, CL],
    &[TL, TR, BR, BL],
];

pub(crate) struct MeshBuilder<'a> {
    nodes: NodeGrid<'a>,
    pub vertices: Vec<WorldPoint>,
    pub triangles: Vec<[u32; 3]>,
    /// Triangle indices touching each vertex.
    pub triangles_by_vertex: Vec<Vec<usize>>,
    /// Vertices excluded from outline walks.
    pub checked: Vec<bool>,
}

impl<'a> MeshBuilder<'a> {
    pub fn new(nodes: NodeGrid<'a>) -> Self {
        Self {
            nodes,
            vertices: Vec::new(),
            triangles: Vec::new(),
            triangles_by_vertex: Vec::new(),
            checked: Vec::new(),
        }
    }

    /// Triangulates every square in order.
    pub fn build(mut self) -> Self {
        let squares: Vec<Square> = self.nodes.squares().collect();
        for square in &squares {
            self.triangulate(square);
        }
        self
    }

    fn triangulate(&mut self, square: &Square) {
        let points = CASES[usize::from(square.configuration)];
        if points.is_empty() {
            return;
        }
        let indices: Vec<u32> = points.iter().map(|&point| self.vertex_for(square, point)).collect();
        for pair in indices[1..].windows(2) {
            self.push_triangle([indices[0], pair[0], pair[1]]);
        }
        if square.configuration == 15 {
            for corner in square.corners() {
                if let Some(vertex) = self.nodes.vertex(corner) {
                    self.checked[vertex as usize] = true;
                }
            }
        }
    }

    fn vertex_for(&mut self, square: &Square, point: Point) -> u32 {
        let node = square.node(point);
        let (index, is_new) = self.nodes.assign(node, self.vertices.len() as u32);
        if is_new {
            self.vertices.push(self.nodes.position(node));
            self.triangles_by_vertex.push(Vec::new());
            self.checked.push(false);
        }
        index
    }

    fn push_triangle(&mut self, triangle: [u32; 3]) {
        let index = self.triangles.len();
        for vertex in triangle {
            self.triangles_by_vertex[vertex as usize].push(index);
        }
        self.triangles.push(triangle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::WorldMapping;
    use crate::mapgen::Grid;
    use crate::types::{Coord, TileKind};

    fn single_square(configuration: u8) -> Grid {
        let mut grid = Grid::filled(2, 2, TileKind::Floor);
        for (bit, corner) in [(8, (0, 1)), (4, (1, 1)), (2, (1, 0)), (1, (0, 0))] {
            if configuration & bit != 0 {
                grid.set(Coord::new(corner.0, corner.1), TileKind::Wall);
            }
        }
        grid
    }

    fn signed_area(a: WorldPoint, b: WorldPoint, c: WorldPoint) -> f32 {
        (b.x - a.x) * (c.z - a.z) - (b.z - a.z) * (c.x - a.x)
    }

    #[test]
    fn every_case_winds_clockwise() {
        let mapping = WorldMapping::new(WorldPoint::default(), 1.0, 2, 2, 0);
        for configuration in 1..16_u8 {
            let grid = single_square(configuration);
            let mesh = MeshBuilder::new(NodeGrid::new(&grid, &mapping)).build();
            assert_eq!(mesh.triangles.len(), CASES[usize::from(configuration)].len() - 2);
            for triangle in &mesh.triangles {
                let [a, b, c] = triangle.map(|index| mesh.vertices[index as usize]);
                assert!(signed_area(a, b, c) < 0.0, "case {configuration} triangle {triangle:?}");
            }
        }
    }

    #[test]
    fn empty_square_emits_nothing() {
        let mapping = WorldMapping::new(WorldPoint::default(), 1.0, 2, 2, 0);
        let grid = single_square(0);
        let mesh = MeshBuilder::new(NodeGrid::new(&grid, &mapping)).build();
        assert!(mesh.vertices.is_empty());
        assert!(mesh.triangles.is_empty());
    }

    #[test]
    fn shared_nodes_get_one_vertex() {
        let grid = Grid::filled(4, 3, TileKind::Wall);
        let mapping = WorldMapping::new(WorldPoint::default(), 1.0, 4, 3, 0);
        let mesh = MeshBuilder::new(NodeGrid::new(&grid, &mapping)).build();
        assert_eq!(mesh.vertices.len(), 12);
        assert_eq!(mesh.triangles.len(), 12);
        assert!(mesh.checked.iter().all(|&checked| checked));
    }
}
