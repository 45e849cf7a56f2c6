//! Procedural mesh generators for tests and benchmarks.
//!
//! All generators are deterministic and produce counter-clockwise
//! outward winding, so the cluster preprocessor derives correct face
//! normals from them.

use glam::DVec3;
use kessler_types::Scalar;

use crate::mesh::TriangleMesh;

/// Generates an axis-aligned box centred at the origin.
///
/// 8 vertices, 12 triangles, outward winding.
pub fn box_mesh(half_extents: DVec3) -> TriangleMesh {
    let h = half_extents;
    let mut mesh = TriangleMesh::with_capacity(8, 12);
    mesh.vertices = vec![
        DVec3::new(-h.x, -h.y, -h.z),
        DVec3::new(h.x, -h.y, -h.z),
        DVec3::new(h.x, h.y, -h.z),
        DVec3::new(-h.x, h.y, -h.z),
        DVec3::new(-h.x, -h.y, h.z),
        DVec3::new(h.x, -h.y, h.z),
        DVec3::new(h.x, h.y, h.z),
        DVec3::new(-h.x, h.y, h.z),
    ];
    #[rustfmt::skip]
    let faces: [[u32; 3]; 12] = [
        [0, 3, 2], [0, 2, 1], // bottom (-z)
        [4, 5, 6], [4, 6, 7], // top (+z)
        [0, 1, 5], [0, 5, 4], // -y
        [1, 2, 6], [1, 6, 5], // +x
        [2, 3, 7], [2, 7, 6], // +y
        [3, 0, 4], [3, 4, 7], // -x
    ];
    for f in faces {
        mesh.indices.extend_from_slice(&f);
    }
    mesh
}

/// Generates a unit cube (1 m edge) centred at the origin.
pub fn unit_cube() -> TriangleMesh {
    box_mesh(DVec3::splat(0.5))
}

/// Generates a square plate in the XY plane at z = 0, facing +Z.
///
/// 4 vertices, 2 triangles. `half_width` is half the edge length.
pub fn plate(half_width: Scalar) -> TriangleMesh {
    let h = half_width;
    let mut mesh = TriangleMesh::with_capacity(4, 2);
    mesh.vertices = vec![
        DVec3::new(-h, -h, 0.0),
        DVec3::new(h, -h, 0.0),
        DVec3::new(h, h, 0.0),
        DVec3::new(-h, h, 0.0),
    ];
    mesh.indices = vec![0, 1, 2, 0, 2, 3];
    mesh
}

/// Generates a regular icosahedron with vertices on a sphere of the
/// given radius.
///
/// 12 vertices, 20 triangles, the cheapest closed approximation of a
/// sphere the narrow phase can chew on.
pub fn icosahedron(radius: Scalar) -> TriangleMesh {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let scale = radius / (1.0 + phi * phi).sqrt();

    let raw = [
        DVec3::new(-1.0, phi, 0.0),
        DVec3::new(1.0, phi, 0.0),
        DVec3::new(-1.0, -phi, 0.0),
        DVec3::new(1.0, -phi, 0.0),
        DVec3::new(0.0, -1.0, phi),
        DVec3::new(0.0, 1.0, phi),
        DVec3::new(0.0, -1.0, -phi),
        DVec3::new(0.0, 1.0, -phi),
        DVec3::new(phi, 0.0, -1.0),
        DVec3::new(phi, 0.0, 1.0),
        DVec3::new(-phi, 0.0, -1.0),
        DVec3::new(-phi, 0.0, 1.0),
    ];

    let mut mesh = TriangleMesh::with_capacity(12, 20);
    mesh.vertices = raw.iter().map(|v| *v * scale).collect();

    #[rustfmt::skip]
    let faces: [[u32; 3]; 20] = [
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];
    for f in faces {
        mesh.indices.extend_from_slice(&f);
    }
    mesh
}
