//! Template primitives used as element geometry.

use glam::Vec3;

use crate::mesh::{IndexFormat, MeshData};

/// Face normals paired with two tangents whose cross product is the normal.
const CUBE_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::Y, Vec3::Z),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::Z, Vec3::X),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::Y, Vec3::X),
];

/// Builds an axis-aligned box of the given size centered on the origin.
///
/// 24 vertices (4 per face, so each face keeps a flat normal) and 36 16-bit indices,
/// wound counter-clockwise when viewed from outside.
pub fn cube(size: Vec3) -> MeshData {
    let half = size * 0.5;
    let mut mesh = MeshData::new(IndexFormat::U16);

    for (normal, u, v) in CUBE_FACES {
        let center = normal * half;
        let du = u * half;
        let dv = v * half;
        mesh.push_quad(
            [
                center - du - dv,
                center + du - dv,
                center + du + dv,
                center - du + dv,
            ],
            normal,
        );
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_counts() {
        let mesh = cube(Vec3::ONE);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(mesh.indices.format(), IndexFormat::U16);
    }

    #[test]
    fn test_cube_size_matches_request() {
        let size = Vec3::new(2.0, 0.5, 3.0);
        let mesh = cube(size);
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, -size * 0.5);
        assert_eq!(max, size * 0.5);
    }

    #[test]
    fn test_face_tangents_are_right_handed() {
        for (normal, u, v) in CUBE_FACES {
            assert_eq!(u.cross(v), normal);
        }
    }

    #[test]
    fn test_cube_winding_faces_outward() {
        let mesh = cube(Vec3::new(1.0, 2.0, 3.0));
        for [a, b, c] in mesh.triangles() {
            let pa = Vec3::from_array(mesh.vertices[a as usize].position);
            let pb = Vec3::from_array(mesh.vertices[b as usize].position);
            let pc = Vec3::from_array(mesh.vertices[c as usize].position);
            let geometric = (pb - pa).cross(pc - pa);
            let normal = Vec3::from_array(mesh.vertices[a as usize].normal);
            assert!(
                geometric.dot(normal) > 0.0,
                "Triangle ({a}, {b}, {c}) is wound against its normal"
            );
        }
    }
}
