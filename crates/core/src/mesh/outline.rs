//! Silhouette extraction. An edge is an outline edge when exactly one
//! triangle contains both of its vertices.

use serde::Serialize;

use crate::error::MeshError;

/// Ordered vertex indices along one silhouette. The first vertex is repeated
/// at the end only when the walk finished on an outline edge back to it, so
/// a walk cut short by already-checked vertices stays open.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Outline {
    pub vertices: Vec<u32>,
}

impl Outline {
    pub fn is_closed(&self) -> bool {
        self.vertices.len() > 2 && self.vertices.first() == self.vertices.last()
    }

    pub fn segments(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.vertices.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

pub(crate) struct OutlineWalker<'a> {
    triangles: &'a [[u32; 3]],
    triangles_by_vertex: &'a [Vec<usize>],
    checked: Vec<bool>,
}

impl<'a> OutlineWalker<'a> {
    pub fn new(
        triangles: &'a [[u32; 3]],
        triangles_by_vertex: &'a [Vec<usize>],
        checked: Vec<bool>,
    ) -> Self {
        Self { triangles, triangles_by_vertex, checked }
    }

    /// Walks every outline, starting from vertices in index order.
    pub fn outlines(mut self) -> Result<Vec<Outline>, MeshError> {
        let mut outlines = Vec::new();
        for vertex in 0..self.checked.len() as u32 {
            if self.checked[vertex as usize] {
                continue;
            }
            let Some(mut next) = self.connected_outline_vertex(vertex)? else {
                continue;
            };
            self.checked[vertex as usize] = true;
            let mut vertices = vec![vertex];
            loop {
                vertices.push(next);
                self.checked[next as usize] = true;
                match self.connected_outline_vertex(next)? {
                    Some(following) => next = following,
                    None => break,
                }
            }
            if self.is_outline_edge(next, vertex)? {
                vertices.push(vertex);
            }
            outlines.push(Outline { vertices });
        }
        Ok(outlines)
    }

    fn triangles_of(&self, vertex: u32) -> Result<&'a [usize], MeshError> {
        match self.triangles_by_vertex.get(vertex as usize) {
            Some(list) if !list.is_empty() => Ok(list),
            _ => Err(MeshError::OrphanVertex { vertex }),
        }
    }

    fn connected_outline_vertex(&self, vertex: u32) -> Result<Option<u32>, MeshError> {
        let triangles = self.triangles_of(vertex)?;
        for &triangle in triangles {
            for other in self.triangles[triangle] {
                if other != vertex
                    && !self.checked[other as usize]
                    && self.is_outline_edge(vertex, other)?
                {
                    return Ok(Some(other));
                }
            }
        }
        Ok(None)
    }

    pub fn is_outline_edge(&self, a: u32, b: u32) -> Result<bool, MeshError> {
        let shared = self
            .triangles_of(a)?
            .iter()
            .filter(|&&triangle| self.triangles[triangle].contains(&b))
            .count();
        Ok(shared == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_vertex(triangles: &[[u32; 3]], count: usize) -> Vec<Vec<usize>> {
        let mut map = vec![Vec::new(); count];
        for (index, triangle) in triangles.iter().enumerate() {
            for &vertex in triangle {
                map[vertex as usize].push(index);
            }
        }
        map
    }

    #[test]
    fn quad_outline_is_closed_and_skips_the_diagonal() {
        let triangles = [[0, 1, 2], [0, 2, 3]];
        let map = by_vertex(&triangles, 4);
        let walker = OutlineWalker::new(&triangles, &map, vec![false; 4]);
        assert_eq!(walker.is_outline_edge(0, 2), Ok(false));
        assert_eq!(walker.is_outline_edge(0, 1), Ok(true));

        let outlines = walker.outlines().expect("outlines");
        assert_eq!(outlines, vec![Outline { vertices: vec![0, 1, 2, 3, 0] }]);
        assert!(outlines[0].is_closed());
        assert_eq!(outlines[0].segments().count(), 4);
    }

    #[test]
    fn checked_vertices_never_start_or_join_an_outline() {
        let triangles = [[0, 1, 2], [0, 2, 3]];
        let map = by_vertex(&triangles, 4);
        let walker = OutlineWalker::new(&triangles, &map, vec![true; 4]);
        assert!(walker.outlines().expect("outlines").is_empty());
    }

    #[test]
    fn walk_that_cannot_return_to_its_start_stays_open() {
        let triangles = [[0, 1, 2], [0, 2, 3]];
        let map = by_vertex(&triangles, 4);
        let walker = OutlineWalker::new(&triangles, &map, vec![false, false, false, true]);
        let outlines = walker.outlines().expect("outlines");
        assert_eq!(outlines, vec![Outline { vertices: vec![0, 1, 2] }]);
        assert!(!outlines[0].is_closed());
    }

    #[test]
    fn vertex_without_triangles_is_an_error() {
        let triangles = [[0, 1, 2]];
        let map = by_vertex(&triangles, 4);
        let walker = OutlineWalker::new(&triangles, &map, vec![false; 4]);
        assert_eq!(walker.outlines(), Err(MeshError::OrphanVertex { vertex: 3 }));
    }
}
