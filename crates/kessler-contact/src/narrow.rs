//! Narrow phase: per-primitive vertex-face and edge-edge tests.
//!
//! For every surviving cluster pair, three sweeps run in a fixed order:
//! faces of A against the unique vertices of B, faces of B against the
//! unique vertices of A, then the owned edges of A against the owned
//! edges of B. A primitive pair is only examined exactly (at the start
//! pose) when the interval sign test proves the associated signed
//! volume changes sign during the sub-step, so the plane crossing cannot
//! be missed, and nothing that stays clear is ever touched.

use glam::DVec3;
use kessler_math::{ScalarInterval, VectorInterval};
use kessler_mesh::{FaceCluster, TriangleMesh};
use kessler_types::constants::{PARALLEL_TOL, STRADDLE_TOL, TRIANGLE_TOL};
use kessler_types::{ClusterId, Scalar};

use crate::contact::{Contact, Manifold};
use crate::sweep::{BodyMotion, SweptPose};

/// Everything the narrow phase needs to know about one body.
#[derive(Clone, Copy)]
pub struct NarrowInputs<'a> {
    /// Body-frame geometry.
    pub mesh: &'a TriangleMesh,
    /// Preprocessed face clusters.
    pub clusters: &'a [FaceCluster],
    /// Pose swept over the sub-step.
    pub pose: &'a SweptPose,
    /// Instantaneous kinematics at the start of the sub-step.
    pub motion: &'a BodyMotion,
}

/// The interval narrow phase.
pub struct NarrowPhase {
    /// Contact-error acceptance bound (m).
    pub max_pos_error: Scalar,
}

/// One swept edge with the world-frame normals of its two faces.
struct EdgeSweep {
    start: VectorInterval,
    end: VectorInterval,
    normal_1: DVec3,
    normal_2: DVec3,
}

/// Sign test on the edge-edge volume interval; the source keeps this
/// one strict about zero rather than using the straddle threshold.
#[inline]
fn straddles_strict(iv: &ScalarInterval) -> bool {
    (iv.lower < 0.0 && iv.upper > 0.0) || (iv.lower > 0.0 && iv.upper < 0.0)
}

impl NarrowPhase {
    /// Builds the contact manifold for one close body pair from its
    /// surviving cluster pairs. Traversal order is fixed (pairs in the
    /// order given, vertices and edges by index), so small input
    /// perturbations do not reorder the contact set.
    pub fn detect(
        &self,
        body_a: &NarrowInputs<'_>,
        body_b: &NarrowInputs<'_>,
        cluster_pairs: &[(ClusterId, ClusterId)],
    ) -> Manifold {
        let mut manifold = Manifold::new();

        for &(ca, cb) in cluster_pairs {
            let cluster_a = &body_a.clusters[ca.index()];
            let cluster_b = &body_b.clusters[cb.index()];

            let mut verts_a: Vec<VectorInterval> = cluster_a
                .unique_verts
                .iter()
                .map(|&v| body_a.pose.world_interval(body_a.mesh.position(v as usize)))
                .collect();
            let mut verts_b: Vec<VectorInterval> = cluster_b
                .unique_verts
                .iter()
                .map(|&v| body_b.pose.world_interval(body_b.mesh.position(v as usize)))
                .collect();

            let edges_a = sweep_edges(body_a, cluster_a);
            let edges_b = sweep_edges(body_b, cluster_b);

            // Faces of A against the unique vertices of B.
            self.faces_against_vertices(
                body_a,
                cluster_a,
                &mut verts_b,
                false,
                &mut manifold,
            );

            // Faces of B against the unique vertices of A.
            self.faces_against_vertices(
                body_b,
                cluster_b,
                &mut verts_a,
                true,
                &mut manifold,
            );

            // Owned edges of A against owned edges of B.
            self.edges_against_edges(body_a, body_b, &edges_a, &edges_b, &mut manifold);
        }

        manifold
    }

    /// Vertex-vs-face sweep in one direction. When `vertices_are_a` is
    /// false the faces belong to body A and the vertices to body B;
    /// when true, the reverse. A vertex that produces a contact is
    /// consumed; it is not offered to the remaining faces.
    fn faces_against_vertices(
        &self,
        face_body: &NarrowInputs<'_>,
        cluster: &FaceCluster,
        vertices: &mut Vec<VectorInterval>,
        vertices_are_a: bool,
        manifold: &mut Manifold,
    ) {
        for (face_idx, tri) in cluster.triangles.iter().enumerate() {
            let corners: [VectorInterval; 3] = [
                face_body
                    .pose
                    .world_interval(face_body.mesh.position(tri[0] as usize)),
                face_body
                    .pose
                    .world_interval(face_body.mesh.position(tri[1] as usize)),
                face_body
                    .pose
                    .world_interval(face_body.mesh.position(tri[2] as usize)),
            ];
            let leg_1 = corners[0].sub(&corners[1]);
            let leg_2 = corners[0].sub(&corners[2]);
            let plane = leg_1.cross(&leg_2);

            let mut used: Vec<usize> = Vec::new();
            for (vert_idx, vert) in vertices.iter().enumerate() {
                let support = vert.sub(&corners[0]);
                let volume = support.dot(&plane);
                if !volume.straddles_zero(STRADDLE_TOL) {
                    continue;
                }

                let Some((projected, error)) = point_in_triangle(
                    vert.lower,
                    corners[0].lower,
                    corners[1].lower,
                    corners[2].lower,
                ) else {
                    continue;
                };
                if !manifold.accepts(error, self.max_pos_error) {
                    continue;
                }

                let normal = face_body.pose.rotate_now(cluster.normals[face_idx]);
                let contact = if vertices_are_a {
                    // Faces belong to B: its outward normal already
                    // points from B into A.
                    Contact {
                        point_a: vert.lower,
                        point_b: projected,
                        normal,
                        error,
                    }
                } else {
                    Contact {
                        point_a: projected,
                        point_b: vert.lower,
                        normal: -normal,
                        error,
                    }
                };
                manifold.remove_duplicates(contact.point_a, contact.point_b);
                manifold.push(contact);
                used.push(vert_idx);
            }

            for &idx in used.iter().rev() {
                vertices.remove(idx);
            }
        }
    }

    /// Edge-vs-edge sweep over the owned edges of both clusters.
    fn edges_against_edges(
        &self,
        body_a: &NarrowInputs<'_>,
        body_b: &NarrowInputs<'_>,
        edges_a: &[EdgeSweep],
        edges_b: &[EdgeSweep],
        manifold: &mut Manifold,
    ) {
        for edge_a in edges_a {
            let dir_a = edge_a.end.sub(&edge_a.start);
            for edge_b in edges_b {
                let dir_b = edge_b.end.sub(&edge_b.start);
                let diff = edge_b.start.sub(&edge_a.start);
                let volume = diff.dot(&dir_a.cross(&dir_b));
                if !straddles_strict(&volume) {
                    continue;
                }

                let Some((point_a, point_b)) = segment_closest_points(
                    edge_a.start.lower,
                    edge_a.end.lower,
                    edge_b.start.lower,
                    edge_b.end.lower,
                ) else {
                    continue;
                };

                let error = (point_a - point_b).length();
                if !manifold.accepts(error, self.max_pos_error) {
                    continue;
                }
                manifold.remove_duplicates(point_a, point_b);

                // Contact normal from the B edge's faces, but only where
                // the approach velocity actually opposes them.
                let rel_vel =
                    body_a.motion.point_velocity(point_a) - body_b.motion.point_velocity(point_b);
                let against_1 = rel_vel.dot(edge_b.normal_1) < -STRADDLE_TOL;
                let against_2 = rel_vel.dot(edge_b.normal_2) < -STRADDLE_TOL;
                let normal = if against_1 && against_2 {
                    (edge_b.normal_1 + edge_b.normal_2).normalize()
                } else if against_1 {
                    edge_b.normal_1
                } else if against_2 {
                    edge_b.normal_2
                } else {
                    continue;
                };

                manifold.push(Contact {
                    point_a,
                    point_b,
                    normal,
                    error,
                });
            }
        }
    }
}

fn sweep_edges(body: &NarrowInputs<'_>, cluster: &FaceCluster) -> Vec<EdgeSweep> {
    cluster
        .edges
        .iter()
        .zip(&cluster.edge_faces)
        .map(|(edge, faces)| EdgeSweep {
            start: body.pose.world_interval(body.mesh.position(edge[0] as usize)),
            end: body.pose.world_interval(body.mesh.position(edge[1] as usize)),
            normal_1: body.pose.rotate_now(cluster.normals[faces.face_a.index()]),
            normal_2: body.pose.rotate_now(
                body.clusters[faces.cluster_b.index()].normals[faces.face_b.index()],
            ),
        })
        .collect()
}

/// Projects `support` onto the plane of the triangle and tests the
/// projection against its edges. Returns the projected point and the
/// projection distance when the point lands inside; `None` when it is
/// off the triangle or in an ambiguous vertex region.
pub fn point_in_triangle(
    support: DVec3,
    t0: DVec3,
    t1: DVec3,
    t2: DVec3,
) -> Option<(DVec3, Scalar)> {
    let u01 = t1 - t0;
    let u02 = t2 - t0;
    let u12 = t2 - t1;
    let n = u01.cross(u02).normalize();
    let alpha = (support - t0).dot(n);
    let point = support - alpha * n;
    let distance = alpha.abs();

    // Sector directions splitting the plane around the triangle, used
    // to pick which edge the half-plane test runs against.
    let v1 = -u01.normalize() - u02.normalize();
    let v2 = -u12.normalize() + u01.normalize();
    let v3 = u02.normalize() + u12.normalize();
    let f1 = v1.cross(point - t0).dot(n);
    let f2 = v2.cross(point - t1).dot(n);
    let f3 = v3.cross(point - t2).dot(n);

    let inside = if f2 <= 0.0 && f1 > 0.0 {
        (t0 - point).cross(t1 - point).dot(n) >= -TRIANGLE_TOL
    } else if f3 <= 0.0 && f2 > 0.0 {
        (t1 - point).cross(t2 - point).dot(n) >= -TRIANGLE_TOL
    } else if f1 <= 0.0 && f3 > 0.0 {
        (t2 - point).cross(t0 - point).dot(n) >= -TRIANGLE_TOL
    } else {
        false
    };

    inside.then_some((point, distance))
}

/// Closest points between segments `p1p2` and `p3p4`.
///
/// Returns the clamped closest-point pair when the segment parameters
/// both land in `[0, 1]`, the midpoint construction for parallel
/// overlapping segments, and `None` when the closest approach lies off
/// either segment.
pub fn segment_closest_points(
    p1: DVec3,
    p2: DVec3,
    p3: DVec3,
    p4: DVec3,
) -> Option<(DVec3, DVec3)> {
    // Orient segment 3-4 along 1-2 so the parallel cases below only
    // have to reason about one direction.
    let (p3, p4) = if (p2 - p1).dot(p4 - p3) < 0.0 {
        (p4, p3)
    } else {
        (p3, p4)
    };

    let line13 = p1 - p3;
    let line43 = p4 - p3;
    let line21 = p2 - p1;

    let d1343 = line13.dot(line43);
    let d4321 = line43.dot(line21);
    let d1321 = line13.dot(line21);
    let d4343 = line43.dot(line43);
    let d2121 = line21.dot(line21);

    let denom = d2121 * d4343 - d4321 * d4321;
    if denom.abs() < PARALLEL_TOL {
        return parallel_closest_points(p1, p2, p3, p4);
    }

    let mua = (d1343 * d4321 - d1321 * d4343) / denom;
    let mub = (d1343 + d4321 * mua) / d4343;
    if !(0.0..=1.0).contains(&mua) || !(0.0..=1.0).contains(&mub) {
        return None;
    }
    Some((p1 + mua * line21, p3 + mub * line43))
}

/// Parallel-segment branch: classify the overlap of the two collinear
/// projections and return midpoints of the overlapping stretch. The
/// half-point averaging mirrors the reference geometry of each case.
fn parallel_closest_points(p1: DVec3, p2: DVec3, p3: DVec3, p4: DVec3) -> Option<(DVec3, DVec3)> {
    let line13 = p1 - p3;
    let line21 = p2 - p1;
    let line43 = p4 - p3;
    let line23 = p2 - p3;
    let line24 = p2 - p4;
    let line41 = p4 - p1;
    let d2121 = line21.dot(line21);
    let d4343 = line43.dot(line43);

    let start_inside = line13.dot(line43) < 0.0; // p1 before p3 along the shared direction
    let end_after = line24.dot(-line43) > 0.0; // p2 beyond p4

    if start_inside && end_after {
        // Segment 3-4 sits inside 1-2's span.
        let a = p1 + ((-line13).dot(line21) / d2121) * line21;
        let b = p3 + (line23.dot(line43) / d4343) * line43;
        return Some(((a + p2) / 2.0, (b + p3) / 2.0));
    }
    if start_inside && !end_after {
        // 1-2 starts before 3 and ends inside 3-4.
        let a0 = p1 + ((-line13).dot(line21) / d2121) * line21;
        let a1 = p1 + (line41.dot(line21) / d2121) * line21;
        return Some(((a0 + a1) / 2.0, (p3 + p4) / 2.0));
    }

    let start_after = line13.dot(line43) > 0.0;
    let end_inside = (-line43).dot(line24) < 0.0;

    if end_inside && start_after {
        // 1-2 starts inside 3-4 and ends beyond it.
        let a = p1 + (line41.dot(line21) / d2121) * line21;
        let b = p3 + (line13.dot(line43) / d4343) * line43;
        return Some((((a + p1) / 2.0), ((b + p4) / 2.0)));
    }
    if !end_inside && start_after {
        // Segment 1-2 sits inside 3-4's span.
        let b0 = p3 + (line13.dot(line43) / d4343) * line43;
        let b1 = p3 + (line23.dot(line43) / d4343) * line43;
        return Some(((p1 + p2) / 2.0, (b0 + b1) / 2.0));
    }

    // Touching end-to-end.
    let t = line21.dot(-line23);
    if (-1e-6..=1e-6).contains(&t) {
        return Some((p2, p3));
    }
    let t = (-line41).dot(line21);
    if (-1e-6..=1e-6).contains(&t) {
        return Some((p1, p4));
    }
    if (-1e-6..=1e-6).contains(&line21.dot(line13)) && (-1e-6..=1e-6).contains(&line21.dot(line24))
    {
        return Some(((p1 + p2) / 2.0, (p3 + p4) / 2.0));
    }
    None
}
