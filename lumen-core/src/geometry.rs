/// Indexed triangle geometry produced by the mesh importer
use nalgebra::{Point2, Point3, Vector3};

/// A vertex with position, normal and texture coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub tex_coords: Point2<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, tex_coords: Point2<f32>) -> Self {
        Self {
            position,
            normal,
            tex_coords,
        }
    }
}

/// Flat vertex buffer plus triangle index buffer.
///
/// Every index is smaller than `vertices.len()` and `indices.len()` is a
/// multiple of 3. The importer never hands out an empty geometry.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Geometry {
    pub(crate) fn from_parts(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        debug_assert_eq!(indices.len() % 3, 0);
        debug_assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
        Self { vertices, indices }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    /// Iterate over triangles as resolved vertex triples
    pub fn triangles(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }
}

/// Face normal of a triangle, or `None` for degenerate triangles
pub fn face_normal(triangle: &[Vertex; 3]) -> Option<Vector3<f32>> {
    let edge1 = triangle[1].position - triangle[0].position;
    let edge2 = triangle[2].position - triangle[0].position;
    edge1.cross(&edge2).try_normalize(1e-12)
}
