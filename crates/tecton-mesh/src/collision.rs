//! Collision representation built from render geometry.

use glam::Vec3;

use crate::mesh::MeshData;

/// Triangle soup for static collision, mirroring a render mesh one-to-one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionMesh {
    /// Vertex positions.
    pub vertices: Vec<Vec3>,
    /// Triangles as vertex index triples.
    pub triangles: Vec<[u32; 3]>,
}

impl CollisionMesh {
    /// Copies positions and triangles out of a render mesh.
    pub fn from_mesh(mesh: &MeshData) -> Self {
        Self {
            vertices: mesh
                .vertices
                .iter()
                .map(|v| Vec3::from_array(v.position))
                .collect(),
            triangles: mesh.triangles().collect(),
        }
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}
