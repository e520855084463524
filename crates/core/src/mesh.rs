//! Marching-squares tessellation of a finished room grid.

pub mod nodes;
pub mod outline;
pub mod triangulate;
pub mod walls;

use serde::Serialize;

pub use outline::Outline;
pub use walls::WallMesh;

use self::nodes::NodeGrid;
use self::outline::OutlineWalker;
use self::triangulate::MeshBuilder;
use crate::coords::{WorldMapping, WorldPoint};
use crate::error::MeshError;
use crate::mapgen::Grid;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RoomMesh {
    pub vertices: Vec<WorldPoint>,
    pub triangles: Vec<[u32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub outlines: Vec<Outline>,
    pub walls: WallMesh,
    pub collision_edges: Vec<Vec<[f32; 2]>>,
}

impl RoomMesh {
    /// Number of triangles containing both `a` and `b`.
    pub fn edge_share_count(&self, a: u32, b: u32) -> usize {
        self.triangles.iter().filter(|triangle| triangle.contains(&a) && triangle.contains(&b)).count()
    }
}

/// Pads `grid` with the mapping's border, then triangulates, walks the
/// outlines and extrudes walls `wall_height` below the floor.
pub fn generate_mesh(
    grid: &Grid,
    mapping: &WorldMapping,
    wall_height: f32,
) -> Result<RoomMesh, MeshError> {
    let (width, height) = mapping.dimensions();
    if (grid.width(), grid.height()) != (width, height) {
        return Err(MeshError::MappingMismatch {
            width,
            height,
            found_width: grid.width(),
            found_height: grid.height(),
        });
    }

    let padded = grid.padded(mapping.border());
    if padded.width() < 2 || padded.height() < 2 {
        return Err(MeshError::EmptyGrid { width: padded.width(), height: padded.height() });
    }

    let builder = MeshBuilder::new(NodeGrid::new(&padded, mapping)).build();
    let outlines =
        OutlineWalker::new(&builder.triangles, &builder.triangles_by_vertex, builder.checked)
            .outlines()?;
    let walls = walls::extrude_walls(&builder.vertices, &outlines, wall_height);
    let collision_edges = walls::collision_edges(&builder.vertices, &outlines);
    let uvs = walls::floor_uvs(&builder.vertices);
    log::debug!(
        "mesh: {} vertices, {} triangles, {} outlines",
        builder.vertices.len(),
        builder.triangles.len(),
        outlines.len()
    );

    Ok(RoomMesh {
        vertices: builder.vertices,
        triangles: builder.triangles,
        uvs,
        outlines,
        walls,
        collision_edges,
    })
}
