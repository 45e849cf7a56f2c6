//! Face-cluster preprocessing.
//!
//! Turns a triangle soup into size-bounded groups of adjacent faces.
//! Each cluster carries everything the collision phases need:
//! per-face normals and bounds, a cluster-level oriented bounding box,
//! the edges it owns (each mesh edge is owned by exactly one cluster,
//! with both adjacent faces recorded), and a disjoint slice of the
//! body's vertex indices.
//!
//! Clustering is greedy: seeds are taken in order of decreasing
//! distance from the body origin, and a cluster grows by repeatedly
//! absorbing the adjacent face that least increases its vertex spread,
//! until any further face would push the spread past `max_dim`.
//! The build is fully deterministic: hash maps are used for keyed
//! lookup only, never iterated.

use std::collections::{BTreeSet, HashMap};

use glam::DVec3;
use kessler_math::hull::planar_hull;
use kessler_types::{ClusterId, FaceId, KesslerError, KesslerResult, Scalar};

use crate::mesh::TriangleMesh;

/// The two faces meeting at an owned edge.
///
/// `face_a` is local to the owning cluster; `face_b` is local to
/// cluster `cluster_b` (which may be the owning cluster itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeFaces {
    /// Face in the owning cluster that introduced the edge.
    pub face_a: FaceId,
    /// Cluster containing the second face.
    pub cluster_b: ClusterId,
    /// Face index local to `cluster_b`.
    pub face_b: FaceId,
}

/// A group of adjacent faces treated as one primitive by the broad and
/// mid collision phases.
#[derive(Debug, Clone)]
pub struct FaceCluster {
    /// Vertex-index triples of the member faces.
    pub triangles: Vec<[u32; 3]>,
    /// Outward unit normal of each face, from winding.
    pub normals: Vec<DVec3>,
    /// Centroid of each face, body frame.
    pub face_centroids: Vec<DVec3>,
    /// Axis-aligned half-extents of each face about its centroid.
    pub face_half_extents: Vec<DVec3>,
    /// Centre of the cluster bounding box, body frame.
    pub centroid: DVec3,
    /// Cluster bounding-box half-extents, floored at the configured minimum.
    pub half_extents: DVec3,
    /// Owned edges, one entry per mesh edge owned by this cluster,
    /// in the vertex order of the introducing face.
    pub edges: Vec<[u32; 2]>,
    /// Adjacent-face records parallel to `edges`.
    pub edge_faces: Vec<EdgeFaces>,
    /// Vertex indices first seen in this cluster; disjoint across the
    /// clusters of a body, sorted ascending.
    pub unique_verts: Vec<u32>,
}

struct FaceData {
    normal: DVec3,
    centroid: DVec3,
    half_extents: DVec3,
    max_dist: Scalar,
}

fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

fn face_data(mesh: &TriangleMesh, t: usize) -> KesslerResult<FaceData> {
    let [a, b, c] = mesh.triangle(t);
    let va = mesh.position(a as usize);
    let vb = mesh.position(b as usize);
    let vc = mesh.position(c as usize);

    let raw = (vb - va).cross(vc - vb);
    let len = raw.length();
    if len < 1e-12 {
        return Err(KesslerError::InvalidGeometry(format!(
            "face {} has collinear vertices, no normal",
            t
        )));
    }

    let centroid = (va + vb + vc) / 3.0;
    let mut half = DVec3::ZERO;
    for v in [va, vb, vc] {
        let d = v - centroid;
        half = half.max(d.abs());
    }

    Ok(FaceData {
        normal: raw / len,
        centroid,
        half_extents: half,
        max_dist: va.length().max(vb.length()).max(vc.length()),
    })
}

/// Builds face clusters from a validated mesh.
///
/// `max_dim` bounds the vertex spread within one cluster (metres);
/// `min_dim` floors the cluster bounding-box half-extents so thin sheets
/// do not collapse to zero-thickness boxes.
pub fn build_clusters(
    mesh: &TriangleMesh,
    max_dim: Scalar,
    min_dim: Scalar,
) -> KesslerResult<Vec<FaceCluster>> {
    if mesh.triangle_count() == 0 {
        return Err(KesslerError::InvalidGeometry(
            "cannot build clusters from an empty mesh".into(),
        ));
    }
    if max_dim <= 0.0 {
        return Err(KesslerError::InvalidConfig(format!(
            "max cluster dimension must be positive, got {}",
            max_dim
        )));
    }

    let tri_count = mesh.triangle_count();
    let faces: Vec<FaceData> = (0..tri_count)
        .map(|t| face_data(mesh, t))
        .collect::<KesslerResult<_>>()?;

    // Face adjacency: two faces are adjacent iff they share an edge.
    let mut edge_map: HashMap<(u32, u32), Vec<u32>> = HashMap::new();
    for t in 0..tri_count {
        let [a, b, c] = mesh.triangle(t);
        for (v0, v1) in [(a, b), (b, c), (c, a)] {
            edge_map.entry(edge_key(v0, v1)).or_default().push(t as u32);
        }
    }
    let mut neighbors: Vec<Vec<u32>> = vec![Vec::with_capacity(3); tri_count];
    for t in 0..tri_count {
        let [a, b, c] = mesh.triangle(t);
        for (v0, v1) in [(a, b), (b, c), (c, a)] {
            for &other in &edge_map[&edge_key(v0, v1)] {
                if other != t as u32 {
                    neighbors[t].push(other);
                }
            }
        }
    }

    // Greedy seed order: farthest face from the origin first.
    let mut seed_order: Vec<usize> = (0..tri_count).collect();
    seed_order.sort_by(|&f1, &f2| {
        faces[f2]
            .max_dist
            .partial_cmp(&faces[f1].max_dist)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(f1.cmp(&f2))
    });

    let mut grouped = vec![false; tri_count];
    let mut cluster_members: Vec<Vec<u32>> = Vec::new();

    for &seed in &seed_order {
        if grouped[seed] {
            continue;
        }
        grouped[seed] = true;
        let mut members: Vec<u32> = vec![seed as u32];
        let mut member_verts: Vec<DVec3> = mesh
            .triangle(seed)
            .iter()
            .map(|&v| mesh.position(v as usize))
            .collect();

        loop {
            // Ungrouped faces adjacent to the cluster, ascending so the
            // distance tie-break lands on the lowest face index.
            let mut adjacent: Vec<u32> = Vec::new();
            for &f in &members {
                for &n in &neighbors[f as usize] {
                    if !grouped[n as usize] && !adjacent.contains(&n) {
                        adjacent.push(n);
                    }
                }
            }
            if adjacent.is_empty() {
                break;
            }
            adjacent.sort_unstable();

            // Max distance the candidate's vertices reach from any
            // vertex already in the cluster.
            let mut best: Option<(Scalar, u32)> = None;
            for &cand in &adjacent {
                let mut spread: Scalar = 0.0;
                for &v in &mesh.triangle(cand as usize) {
                    let p = mesh.position(v as usize);
                    for &q in &member_verts {
                        spread = spread.max((p - q).length());
                    }
                }
                if best.map_or(true, |(d, _)| spread < d) {
                    best = Some((spread, cand));
                }
            }
            let Some((spread, winner)) = best else {
                break;
            };
            if spread >= max_dim {
                break;
            }

            grouped[winner as usize] = true;
            members.push(winner);
            for &v in &mesh.triangle(winner as usize) {
                member_verts.push(mesh.position(v as usize));
            }
        }

        cluster_members.push(members);
    }

    // Assemble per-cluster data.
    let mut clusters: Vec<FaceCluster> = Vec::with_capacity(cluster_members.len());
    let mut seen_verts: BTreeSet<u32> = BTreeSet::new();

    for members in &cluster_members {
        let mut triangles = Vec::with_capacity(members.len());
        let mut normals = Vec::with_capacity(members.len());
        let mut face_centroids = Vec::with_capacity(members.len());
        let mut face_half_extents = Vec::with_capacity(members.len());
        let mut vert_set: BTreeSet<u32> = BTreeSet::new();

        for &f in members {
            let tri = mesh.triangle(f as usize);
            triangles.push(tri);
            normals.push(faces[f as usize].normal);
            face_centroids.push(faces[f as usize].centroid);
            face_half_extents.push(faces[f as usize].half_extents);
            vert_set.extend(tri);
        }

        // Size the box from the convex hull of the cluster's vertices,
        // falling back to the raw set for degenerate clusters.
        let raw_points: Vec<DVec3> = vert_set
            .iter()
            .map(|&v| mesh.position(v as usize))
            .collect();
        let hull = planar_hull(&raw_points);
        let points = if hull.is_empty() { &raw_points } else { &hull };

        let mut min = DVec3::splat(f64::MAX);
        let mut max = DVec3::splat(f64::MIN);
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        let centroid = (min + max) / 2.0;
        let mut half_extents = DVec3::splat(min_dim);
        for p in points {
            half_extents = half_extents.max((*p - centroid).abs());
        }

        let unique_verts: Vec<u32> = vert_set
            .iter()
            .copied()
            .filter(|v| !seen_verts.contains(v))
            .collect();
        seen_verts.extend(&unique_verts);

        clusters.push(FaceCluster {
            triangles,
            normals,
            face_centroids,
            face_half_extents,
            centroid,
            half_extents,
            edges: Vec::new(),
            edge_faces: Vec::new(),
            unique_verts,
        });
    }

    // Pair up the two occurrences of every mesh edge and store each
    // edge once, in the cluster of the face that introduced it.
    let mut first_seen: HashMap<(u32, u32), (usize, u32, [u32; 2])> = HashMap::new();
    let mut owned: Vec<(usize, [u32; 2], EdgeFaces)> = Vec::new();
    for (ci, members) in cluster_members.iter().enumerate() {
        for (fi, &f) in members.iter().enumerate() {
            let [a, b, c] = mesh.triangle(f as usize);
            for (v0, v1) in [(a, b), (b, c), (c, a)] {
                let key = edge_key(v0, v1);
                match first_seen.remove(&key) {
                    Some((c0, f0, dir)) => {
                        owned.push((
                            c0,
                            dir,
                            EdgeFaces {
                                face_a: FaceId(f0),
                                cluster_b: ClusterId(ci as u32),
                                face_b: FaceId(fi as u32),
                            },
                        ));
                    }
                    None => {
                        first_seen.insert(key, (ci, fi as u32, [v0, v1]));
                    }
                }
            }
        }
    }
    for (ci, dir, ef) in owned {
        clusters[ci].edges.push(dir);
        clusters[ci].edge_faces.push(ef);
    }

    Ok(clusters)
}
