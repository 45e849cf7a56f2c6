//! Integration tests for kessler-mesh.

use std::collections::{HashMap, HashSet};

use glam::DVec3;
use kessler_mesh::generators::{box_mesh, icosahedron, plate, unit_cube};
use kessler_mesh::{build_clusters, load_obj, FaceCluster, TriangleMesh};

fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

// ─── TriangleMesh ─────────────────────────────────────────────

#[test]
fn generated_meshes_validate() {
    assert!(unit_cube().validate().is_ok());
    assert!(plate(5.0).validate().is_ok());
    assert!(icosahedron(1.0).validate().is_ok());
}

#[test]
fn cube_counts() {
    let mesh = unit_cube();
    assert_eq!(mesh.vertex_count(), 8);
    assert_eq!(mesh.triangle_count(), 12);
}

#[test]
fn validate_catches_oob_index() {
    let mut mesh = unit_cube();
    mesh.indices[5] = 99;
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_degenerate_triangle() {
    let mut mesh = unit_cube();
    mesh.indices[1] = mesh.indices[0];
    assert!(mesh.validate().is_err());
}

#[test]
fn icosahedron_vertices_on_sphere() {
    let mesh = icosahedron(2.0);
    for v in &mesh.vertices {
        assert!((v.length() - 2.0).abs() < 1e-12);
    }
}

#[test]
fn bounding_radius_of_cube() {
    let mesh = unit_cube();
    let expected = (0.75_f64).sqrt(); // corner of a 0.5-half-extent cube
    assert!((mesh.bounding_radius() - expected).abs() < 1e-12);
}

// ─── Cluster well-formedness ──────────────────────────────────

fn assert_well_formed(mesh: &TriangleMesh, clusters: &[FaceCluster], min_dim: f64) {
    // Every mesh edge appears exactly once across all edge lists.
    let mut counts: HashMap<(u32, u32), u32> = HashMap::new();
    for t in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle(t);
        for (v0, v1) in [(a, b), (b, c), (c, a)] {
            *counts.entry(edge_key(v0, v1)).or_insert(0) += 1;
        }
    }
    let closed_edges: HashSet<(u32, u32)> = counts
        .iter()
        .filter(|(_, &n)| n == 2)
        .map(|(&k, _)| k)
        .collect();

    let mut owned: HashSet<(u32, u32)> = HashSet::new();
    for cluster in clusters {
        assert_eq!(cluster.edges.len(), cluster.edge_faces.len());
        for e in &cluster.edges {
            let key = edge_key(e[0], e[1]);
            assert!(owned.insert(key), "edge {:?} owned twice", key);
        }
    }
    assert_eq!(owned, closed_edges, "owned edges must cover interior edges");

    // Every vertex index appears exactly once across unique_verts.
    let mut verts: HashSet<u32> = HashSet::new();
    for cluster in clusters {
        for &v in &cluster.unique_verts {
            assert!(verts.insert(v), "vertex {} assigned twice", v);
        }
    }
    let referenced: HashSet<u32> = mesh.indices.iter().copied().collect();
    assert_eq!(verts, referenced);

    // Half-extents respect the floor.
    for cluster in clusters {
        assert!(cluster.half_extents.x >= min_dim);
        assert!(cluster.half_extents.y >= min_dim);
        assert!(cluster.half_extents.z >= min_dim);
    }

    // Triangle indices are valid and normals unit length.
    for cluster in clusters {
        for tri in &cluster.triangles {
            for &v in tri {
                assert!((v as usize) < mesh.vertex_count());
            }
        }
        for n in &cluster.normals {
            assert!((n.length() - 1.0).abs() < 1e-12);
        }
    }
}

#[test]
fn cube_clusters_are_well_formed() {
    let mesh = unit_cube();
    let clusters = build_clusters(&mesh, 1.0, 0.005).unwrap();
    assert_well_formed(&mesh, &clusters, 0.005);
    // A spread bound of 1.0 keeps every face alone (the face diagonal
    // is sqrt(2)).
    assert_eq!(clusters.len(), 12);
}

#[test]
fn cube_single_cluster_when_unbounded() {
    let mesh = unit_cube();
    let clusters = build_clusters(&mesh, 10.0, 0.005).unwrap();
    assert_well_formed(&mesh, &clusters, 0.005);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].triangles.len(), 12);
    assert_eq!(clusters[0].edges.len(), 18); // cube mesh edge count
    assert_eq!(clusters[0].unique_verts.len(), 8);
}

#[test]
fn icosahedron_clusters_are_well_formed() {
    let mesh = icosahedron(1.0);
    let clusters = build_clusters(&mesh, 1.0, 0.005).unwrap();
    assert_well_formed(&mesh, &clusters, 0.005);
}

#[test]
fn cube_face_normals_point_outward() {
    let mesh = unit_cube();
    let clusters = build_clusters(&mesh, 10.0, 0.005).unwrap();
    for (tri, normal) in clusters[0].triangles.iter().zip(&clusters[0].normals) {
        let centroid = tri
            .iter()
            .map(|&v| mesh.position(v as usize))
            .fold(DVec3::ZERO, |acc, p| acc + p)
            / 3.0;
        assert!(
            centroid.dot(*normal) > 0.0,
            "normal {:?} at centroid {:?} points inward",
            normal,
            centroid
        );
    }
}

#[test]
fn side_face_cluster_falls_back_to_raw_points() {
    // A single +x cube face projects to a line in XY; the hull is empty
    // and the box must come from the raw vertex set.
    let mesh = unit_cube();
    let clusters = build_clusters(&mesh, 1.0, 0.005).unwrap();
    for cluster in &clusters {
        let n = cluster.normals[0];
        if n.x.abs() > 0.9 {
            assert!(cluster.half_extents.y > 0.4);
            assert!(cluster.half_extents.z > 0.4);
        }
    }
}

#[test]
fn min_dim_floors_thin_clusters() {
    let mesh = plate(5.0);
    let clusters = build_clusters(&mesh, 20.0, 0.01).unwrap();
    assert_eq!(clusters.len(), 1);
    assert!((clusters[0].half_extents.z - 0.01).abs() < 1e-15);
}

#[test]
fn clustering_is_deterministic() {
    let mesh = icosahedron(1.0);
    let a = build_clusters(&mesh, 1.2, 0.005).unwrap();
    let b = build_clusters(&mesh, 1.2, 0.005).unwrap();
    assert_eq!(a.len(), b.len());
    for (ca, cb) in a.iter().zip(&b) {
        assert_eq!(ca.triangles, cb.triangles);
        assert_eq!(ca.edges, cb.edges);
        assert_eq!(ca.unique_verts, cb.unique_verts);
        assert_eq!(ca.centroid, cb.centroid);
        assert_eq!(ca.half_extents, cb.half_extents);
    }
}

#[test]
fn empty_mesh_is_rejected() {
    let mesh = TriangleMesh::default();
    assert!(build_clusters(&mesh, 1.0, 0.005).is_err());
}

// ─── OBJ loading ──────────────────────────────────────────────

#[test]
fn obj_roundtrip_through_file() {
    let dir = std::env::temp_dir();
    let path = dir.join("kessler_mesh_test_cube.obj");
    let mesh = box_mesh(DVec3::splat(0.5));

    let mut contents = String::new();
    for v in &mesh.vertices {
        contents.push_str(&format!("v {} {} {}\n", v.x, v.y, v.z));
    }
    for t in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle(t);
        contents.push_str(&format!("f {} {} {}\n", a + 1, b + 1, c + 1));
    }
    std::fs::write(&path, contents).unwrap();

    let loaded = load_obj(&path).unwrap();
    assert_eq!(loaded.vertex_count(), 8);
    assert_eq!(loaded.triangle_count(), 12);
    for (a, b) in loaded.vertices.iter().zip(&mesh.vertices) {
        assert!((*a - *b).length() < 1e-6);
    }

    std::fs::remove_file(&path).ok();
}

#[test]
fn missing_obj_fails_at_load_time() {
    assert!(load_obj("/definitely/not/a/real/path.obj").is_err());
}
