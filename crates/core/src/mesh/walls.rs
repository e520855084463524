//! Geometry derived from outlines: extruded wall strips, 2D collision
//! edges and UVs.

use serde::Serialize;

use super::outline::Outline;
use crate::coords::WorldPoint;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct WallMesh {
    pub vertices: Vec<WorldPoint>,
    pub triangles: Vec<[u32; 3]>,
    pub uvs: Vec<[f32; 2]>,
}

/// One quad per outline segment: the segment itself on top and a copy
/// lowered by `wall_height` below it.
pub fn extrude_walls(vertices: &[WorldPoint], outlines: &[Outline], wall_height: f32) -> WallMesh {
    let mut wall = WallMesh::default();
    for outline in outlines {
        for (a, b) in outline.segments() {
            let start = wall.vertices.len() as u32;
            let top_a = vertices[a as usize];
            let top_b = vertices[b as usize];
            wall.vertices.extend([
                top_a,
                top_b,
                top_a.offset(0.0, -wall_height, 0.0),
                top_b.offset(0.0, -wall_height, 0.0),
            ]);
            wall.triangles.push([start, start + 2, start + 3]);
            wall.triangles.push([start + 3, start + 1, start]);
        }
    }
    wall.uvs = wall.vertices.iter().map(|vertex| [vertex.x, vertex.y]).collect();
    wall
}

/// Each outline as a polyline on the floor plane.
pub fn collision_edges(vertices: &[WorldPoint], outlines: &[Outline]) -> Vec<Vec<[f32; 2]>> {
    outlines
        .iter()
        .map(|outline| {
            outline
                .vertices
                .iter()
                .map(|&index| {
                    let point = vertices[index as usize];
                    [point.x, point.z]
                })
                .collect()
        })
        .collect()
}

pub fn floor_uvs(vertices: &[WorldPoint]) -> Vec<[f32; 2]> {
    vertices.iter().map(|vertex| [vertex.x, vertex.z]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_outline() -> (Vec<WorldPoint>, Vec<Outline>) {
        let vertices = vec![
            WorldPoint::new(0.0, 5.0, 0.0),
            WorldPoint::new(0.0, 5.0, 1.0),
            WorldPoint::new(1.0, 5.0, 1.0),
            WorldPoint::new(1.0, 5.0, 0.0),
        ];
        (vertices, vec![Outline { vertices: vec![0, 1, 2, 3, 0] }])
    }

    #[test]
    fn walls_have_two_triangles_per_segment() {
        let (vertices, outlines) = square_outline();
        let wall = extrude_walls(&vertices, &outlines, 3.0);
        assert_eq!(wall.vertices.len(), 16);
        assert_eq!(wall.triangles.len(), 8);
        assert_eq!(wall.triangles[0], [0, 2, 3]);
        assert_eq!(wall.triangles[1], [3, 1, 0]);
        assert_eq!(wall.vertices[2], WorldPoint::new(0.0, 2.0, 0.0));
        assert_eq!(wall.uvs[2], [0.0, 2.0]);
    }

    #[test]
    fn collision_edges_drop_the_height_axis() {
        let (vertices, outlines) = square_outline();
        let edges = collision_edges(&vertices, &outlines);
        assert_eq!(edges, vec![vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]]);
        assert_eq!(floor_uvs(&vertices)[2], [1.0, 1.0]);
    }
}
