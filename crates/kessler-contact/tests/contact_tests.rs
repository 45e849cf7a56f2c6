//! Integration tests for kessler-contact.

use glam::{DMat3, DVec3};
use kessler_contact::{
    close_pairs, cull_cluster_pairs, BodyMotion, NarrowInputs, NarrowPhase, SphereSweep, SweptPose,
};
use kessler_mesh::generators::{icosahedron, plate, unit_cube};
use kessler_mesh::{build_clusters, FaceCluster, TriangleMesh};
use kessler_types::ClusterId;

fn static_pose(r: DVec3) -> SweptPose {
    SweptPose {
        r_now: r,
        r_next: r,
        dcm_nb_now: DMat3::IDENTITY,
        dcm_nb_next: DMat3::IDENTITY,
    }
}

fn falling_pose(r: DVec3, v: DVec3, dt: f64) -> SweptPose {
    SweptPose {
        r_now: r,
        r_next: r + v * dt,
        dcm_nb_now: DMat3::IDENTITY,
        dcm_nb_next: DMat3::IDENTITY,
    }
}

fn motion(r: DVec3, v: DVec3) -> BodyMotion {
    BodyMotion {
        r,
        v,
        dcm_nb: DMat3::IDENTITY,
        omega_tilde_b: DMat3::ZERO,
    }
}

fn rot_z(angle: f64) -> DMat3 {
    DMat3::from_rotation_z(angle)
}

// ─── Broad phase ──────────────────────────────────────────────

#[test]
fn distant_bodies_are_culled() {
    let bodies = [
        SphereSweep {
            r_now: DVec3::ZERO,
            r_next: DVec3::ZERO,
            radius: 1.0,
        },
        SphereSweep {
            r_now: DVec3::new(100.0, 0.0, 0.0),
            r_next: DVec3::new(100.0, 0.0, 0.0),
            radius: 1.0,
        },
    ];
    assert!(close_pairs(&bodies).is_empty());
}

#[test]
fn touching_bodies_survive() {
    let bodies = [
        SphereSweep {
            r_now: DVec3::ZERO,
            r_next: DVec3::ZERO,
            radius: 1.0,
        },
        SphereSweep {
            r_now: DVec3::new(1.5, 0.0, 0.0),
            r_next: DVec3::new(1.5, 0.0, 0.0),
            radius: 1.0,
        },
    ];
    assert_eq!(close_pairs(&bodies), vec![(0, 1)]);
}

#[test]
fn sweep_through_catches_fast_pair() {
    // Far at both endpoints' distance bound only if the interval is
    // ignored; the swept interval keeps the pair because the lower
    // distance bound dips inside the summed radii.
    let bodies = [
        SphereSweep {
            r_now: DVec3::new(-3.0, 0.0, 0.0),
            r_next: DVec3::new(3.0, 0.0, 0.0),
            radius: 1.0,
        },
        SphereSweep {
            r_now: DVec3::ZERO,
            r_next: DVec3::ZERO,
            radius: 1.0,
        },
    ];
    assert_eq!(close_pairs(&bodies), vec![(0, 1)]);
}

// ─── Mid phase ────────────────────────────────────────────────

fn cube_clusters() -> (TriangleMesh, Vec<FaceCluster>) {
    let mesh = unit_cube();
    let clusters = build_clusters(&mesh, 10.0, 0.005).unwrap();
    (mesh, clusters)
}

#[test]
fn separated_boxes_are_culled() {
    let (_, ca) = cube_clusters();
    let (_, cb) = cube_clusters();
    let pose_a = static_pose(DVec3::new(0.0, 0.0, 5.0));
    let pose_b = static_pose(DVec3::ZERO);
    assert!(cull_cluster_pairs(&ca, &cb, &pose_a, &pose_b, 1.0).is_empty());
}

#[test]
fn overlapping_boxes_survive() {
    let (_, ca) = cube_clusters();
    let (_, cb) = cube_clusters();
    let pose_a = static_pose(DVec3::new(0.0, 0.0, 0.9));
    let pose_b = static_pose(DVec3::ZERO);
    assert_eq!(cull_cluster_pairs(&ca, &cb, &pose_a, &pose_b, 1.0).len(), 1);
}

#[test]
fn rotation_sweep_defeats_static_separation() {
    // Two cubes 1.1 m apart along x: axis-aligned at both endpoints of
    // the step, so a static SAT at either endpoint separates them. But
    // body B turns 90° about z during the step, swinging a corner out
    // to 0.707 m; the interval axis projections must keep the pair.
    let (_, ca) = cube_clusters();
    let (_, cb) = cube_clusters();

    let pose_a = static_pose(DVec3::new(1.1, 0.0, 0.0));
    let start_rot = DMat3::IDENTITY;
    let end_rot = rot_z(std::f64::consts::FRAC_PI_2);

    // Static endpoints: culled at both.
    for rot in [start_rot, end_rot] {
        let pose_b = SweptPose {
            r_now: DVec3::ZERO,
            r_next: DVec3::ZERO,
            dcm_nb_now: rot,
            dcm_nb_next: rot,
        };
        assert!(cull_cluster_pairs(&ca, &cb, &pose_a, &pose_b, 1.0).is_empty());
    }

    // Swept rotation: retained.
    let pose_b = SweptPose {
        r_now: DVec3::ZERO,
        r_next: DVec3::ZERO,
        dcm_nb_now: start_rot,
        dcm_nb_next: end_rot,
    };
    assert_eq!(cull_cluster_pairs(&ca, &cb, &pose_a, &pose_b, 1.0).len(), 1);
}

#[test]
fn mid_phase_is_symmetric() {
    let (_, ca) = cube_clusters();
    let mesh_b = icosahedron(1.0);
    let cb = build_clusters(&mesh_b, 1.0, 0.005).unwrap();

    let pose_a = static_pose(DVec3::new(0.0, 0.4, 0.9));
    let pose_b = static_pose(DVec3::ZERO);

    let forward = cull_cluster_pairs(&ca, &cb, &pose_a, &pose_b, 1.0);
    let reverse = cull_cluster_pairs(&cb, &ca, &pose_b, &pose_a, 1.0);

    let mut swapped: Vec<(u32, u32)> = reverse.iter().map(|&(a, b)| (b.0, a.0)).collect();
    swapped.sort_unstable();
    let mut forward_sorted: Vec<(u32, u32)> =
        forward.iter().map(|&(a, b)| (a.0, b.0)).collect();
    forward_sorted.sort_unstable();
    assert_eq!(forward_sorted, swapped);
}

#[test]
fn inflation_factor_widens_acceptance() {
    let (_, ca) = cube_clusters();
    let (_, cb) = cube_clusters();
    let pose_a = static_pose(DVec3::new(0.0, 0.0, 1.05));
    let pose_b = static_pose(DVec3::ZERO);
    assert!(cull_cluster_pairs(&ca, &cb, &pose_a, &pose_b, 1.0).is_empty());
    assert_eq!(cull_cluster_pairs(&ca, &cb, &pose_a, &pose_b, 1.2).len(), 1);
}

// ─── Narrow phase ─────────────────────────────────────────────

#[test]
fn falling_cube_makes_four_vertex_face_contacts() {
    // Cube bottom face crosses the plate during the step.
    let cube = unit_cube();
    let cube_clusters = build_clusters(&cube, 10.0, 0.005).unwrap();
    let plate_mesh = plate(5.0);
    let plate_clusters = build_clusters(&plate_mesh, 20.0, 0.005).unwrap();

    let dt = 0.01;
    let v = DVec3::new(0.0, 0.0, -1.0);
    let r = DVec3::new(0.0, 0.0, 0.5 + 5.0e-5);

    let pose_a = falling_pose(r, v, dt);
    let pose_b = static_pose(DVec3::ZERO);
    let motion_a = motion(r, v);
    let motion_b = motion(DVec3::ZERO, DVec3::ZERO);

    let narrow = NarrowPhase {
        max_pos_error: 1.0e-3,
    };
    let manifold = narrow.detect(
        &NarrowInputs {
            mesh: &cube,
            clusters: &cube_clusters,
            pose: &pose_a,
            motion: &motion_a,
        },
        &NarrowInputs {
            mesh: &plate_mesh,
            clusters: &plate_clusters,
            pose: &pose_b,
            motion: &motion_b,
        },
        &[(ClusterId(0), ClusterId(0))],
    );

    assert_eq!(manifold.len(), 4, "one contact per bottom-face corner");
    for c in manifold.contacts() {
        // Normal from the plate (B) into the cube (A): +Z.
        assert!((c.normal - DVec3::Z).length() < 1e-9);
        assert!((c.point_a.z - 5.0e-5).abs() < 1e-12);
        assert!(c.error <= 1.0e-3);
    }
}

#[test]
fn no_straddle_no_contacts() {
    // Cube hovers above the plate for the whole step.
    let cube = unit_cube();
    let cube_clusters = build_clusters(&cube, 10.0, 0.005).unwrap();
    let plate_mesh = plate(5.0);
    let plate_clusters = build_clusters(&plate_mesh, 20.0, 0.005).unwrap();

    let pose_a = falling_pose(DVec3::new(0.0, 0.0, 0.6), DVec3::new(0.0, 0.0, -1.0), 0.01);
    let pose_b = static_pose(DVec3::ZERO);
    let motion_a = motion(DVec3::new(0.0, 0.0, 0.6), DVec3::new(0.0, 0.0, -1.0));
    let motion_b = motion(DVec3::ZERO, DVec3::ZERO);

    let narrow = NarrowPhase {
        max_pos_error: 1.0e-3,
    };
    let manifold = narrow.detect(
        &NarrowInputs {
            mesh: &cube,
            clusters: &cube_clusters,
            pose: &pose_a,
            motion: &motion_a,
        },
        &NarrowInputs {
            mesh: &plate_mesh,
            clusters: &plate_clusters,
            pose: &pose_b,
            motion: &motion_b,
        },
        &[(ClusterId(0), ClusterId(0))],
    );
    assert!(manifold.is_empty());
}

#[test]
fn crossed_edges_make_an_edge_edge_contact() {
    // Two cubes rotated 45° about different axes so a vertical leading
    // edge of A crosses a horizontal leading edge of B near the origin.
    let mesh = unit_cube();
    let clusters = build_clusters(&mesh, 10.0, 0.005).unwrap();

    let half_diag = (0.5_f64 * 0.5 + 0.5 * 0.5).sqrt();
    let gap = 1.0e-4;
    let dt = 0.01;

    // A: rotated about z, leading vertical edge toward -x.
    let ra = DVec3::new(half_diag + gap, 0.0, 0.0);
    let va = DVec3::new(-1.0, 0.0, 0.0);
    let pose_a = SweptPose {
        r_now: ra,
        r_next: ra + va * dt,
        dcm_nb_now: rot_z(std::f64::consts::FRAC_PI_4),
        dcm_nb_next: rot_z(std::f64::consts::FRAC_PI_4),
    };
    let motion_a = BodyMotion {
        r: ra,
        v: va,
        dcm_nb: rot_z(std::f64::consts::FRAC_PI_4),
        omega_tilde_b: DMat3::ZERO,
    };

    // B: rotated about y, leading horizontal edge toward +x.
    let rb = DVec3::new(-half_diag, 0.0, 0.0);
    let vb = DVec3::new(1.0, 0.0, 0.0);
    let rot_b = DMat3::from_rotation_y(std::f64::consts::FRAC_PI_4);
    let pose_b = SweptPose {
        r_now: rb,
        r_next: rb + vb * dt,
        dcm_nb_now: rot_b,
        dcm_nb_next: rot_b,
    };
    let motion_b = BodyMotion {
        r: rb,
        v: vb,
        dcm_nb: rot_b,
        omega_tilde_b: DMat3::ZERO,
    };

    let narrow = NarrowPhase {
        max_pos_error: 1.0e-3,
    };
    let manifold = narrow.detect(
        &NarrowInputs {
            mesh: &mesh,
            clusters: &clusters,
            pose: &pose_a,
            motion: &motion_a,
        },
        &NarrowInputs {
            mesh: &mesh,
            clusters: &clusters,
            pose: &pose_b,
            motion: &motion_b,
        },
        &[(ClusterId(0), ClusterId(0))],
    );

    assert!(!manifold.is_empty(), "edge crossing must be detected");
    for c in manifold.contacts() {
        // The B edge's face normals both have positive x; the blended
        // contact normal points from B into A, i.e. +x dominated.
        assert!(c.normal.x > 0.5, "normal {:?} should oppose approach", c.normal);
        assert!(c.error <= 1.0e-3 + 1e-12);
    }
}

#[test]
fn receding_edges_are_discarded() {
    // Same crossing geometry, but the bodies separate: the relative
    // velocity opposes neither B-edge normal, so no contact is kept.
    let mesh = unit_cube();
    let clusters = build_clusters(&mesh, 10.0, 0.005).unwrap();

    let half_diag = (0.5_f64 * 0.5 + 0.5 * 0.5).sqrt();
    let dt = 0.01;

    let ra = DVec3::new(half_diag - 1.0e-4, 0.0, 0.0);
    let va = DVec3::new(1.0, 0.0, 0.0); // receding
    let pose_a = SweptPose {
        r_now: ra,
        r_next: ra + va * dt,
        dcm_nb_now: rot_z(std::f64::consts::FRAC_PI_4),
        dcm_nb_next: rot_z(std::f64::consts::FRAC_PI_4),
    };
    let motion_a = BodyMotion {
        r: ra,
        v: va,
        dcm_nb: rot_z(std::f64::consts::FRAC_PI_4),
        omega_tilde_b: DMat3::ZERO,
    };

    let rb = DVec3::new(-half_diag, 0.0, 0.0);
    let vb = DVec3::new(-1.0, 0.0, 0.0); // receding
    let rot_b = DMat3::from_rotation_y(std::f64::consts::FRAC_PI_4);
    let pose_b = SweptPose {
        r_now: rb,
        r_next: rb + vb * dt,
        dcm_nb_now: rot_b,
        dcm_nb_next: rot_b,
    };
    let motion_b = BodyMotion {
        r: rb,
        v: vb,
        dcm_nb: rot_b,
        omega_tilde_b: DMat3::ZERO,
    };

    let narrow = NarrowPhase {
        max_pos_error: 1.0e-3,
    };
    let manifold = narrow.detect(
        &NarrowInputs {
            mesh: &mesh,
            clusters: &clusters,
            pose: &pose_a,
            motion: &motion_a,
        },
        &NarrowInputs {
            mesh: &mesh,
            clusters: &clusters,
            pose: &pose_b,
            motion: &motion_b,
        },
        &[(ClusterId(0), ClusterId(0))],
    );
    assert!(manifold.is_empty());
}

// ─── End-to-end pipeline sanity (S4) ──────────────────────────

#[test]
fn distant_icosahedra_produce_nothing() {
    let mesh = icosahedron(1.0);
    let clusters = build_clusters(&mesh, 1.0, 0.005).unwrap();

    let sweeps = [
        SphereSweep {
            r_now: DVec3::ZERO,
            r_next: DVec3::ZERO,
            radius: 1.0,
        },
        SphereSweep {
            r_now: DVec3::new(100.0, 0.0, 0.0),
            r_next: DVec3::new(100.0, 0.0, 0.0),
            radius: 1.0,
        },
    ];
    let pairs = close_pairs(&sweeps);
    assert!(pairs.is_empty());

    // Even forced through the mid phase, everything is separated.
    let pose_a = static_pose(DVec3::ZERO);
    let pose_b = static_pose(DVec3::new(100.0, 0.0, 0.0));
    assert!(cull_cluster_pairs(&clusters, &clusters, &pose_a, &pose_b, 1.0).is_empty());
}
