//! Block inverse-inertia (Delassus) assembly.
//!
//! The operator `M` maps contact impulse rates to relative contact
//! acceleration, `v̇ = M λ̇`, with one 3×3 block per contact pair.
//! Block (i, j) couples an impulse at contact j to the velocity change
//! felt at contact i through the shared rigid body.

use glam::{DMat3, DVec3};
use kessler_math::skew;

use crate::frame::ContactFrame;

/// Solve-time inertia constants of one body.
#[derive(Debug, Clone, Copy)]
pub struct BodyInertia {
    /// Inverse mass (1/kg).
    pub inv_mass: f64,
    /// Inverse inertia tensor, body frame.
    pub inv_inertia_b: DMat3,
    /// Body-to-inertial rotation at the collision instant.
    pub dcm_nb: DMat3,
    /// Centre of mass, inertial frame; the reference point the contact
    /// arms are taken about.
    pub com_n: DVec3,
}

/// One body's contribution to block (i, j):
/// `(1/m) I − [r_i]× (R_CB I⁻¹ R_CBᵀ) [r_j]×`
/// with both contact arms relative to the centre of mass and expressed
/// in contact frame i.
fn body_block(
    body: &BodyInertia,
    frame_i: &ContactFrame,
    point_i: DVec3,
    point_j: DVec3,
) -> DMat3 {
    let r_i = frame_i.to_contact(point_i - body.com_n);
    let r_j = frame_i.to_contact(point_j - body.com_n);
    let dcm_cb = frame_i.dcm_cn * body.dcm_nb;
    let inv_inertia_c = dcm_cb * body.inv_inertia_b * dcm_cb.transpose();

    DMat3::IDENTITY * body.inv_mass - skew(r_i) * inv_inertia_c * skew(r_j)
}

/// Assembles the K×K block Delassus operator for a contact set.
///
/// `points_a` / `points_b` are the inertial contact points on each
/// body; `body_b` is `None` when body B is kinematic, dropping its
/// contribution. Off-diagonal blocks are post-multiplied by
/// `R_CB_A(i) R_CB_A(j)ᵀ` to re-express an impulse given in frame j
/// inside frame i.
pub fn assemble_delassus(
    frames: &[ContactFrame],
    points_a: &[DVec3],
    points_b: &[DVec3],
    body_a: &BodyInertia,
    body_b: Option<&BodyInertia>,
) -> Vec<DMat3> {
    let k = frames.len();
    let mut blocks = Vec::with_capacity(k * k);

    for i in 0..k {
        for j in 0..k {
            let mut block = body_block(body_a, &frames[i], points_a[i], points_a[j]);
            if let Some(b) = body_b {
                block = block + body_block(b, &frames[i], points_b[i], points_b[j]);
            }

            if i != j {
                let cb_i = frames[i].dcm_cn * body_a.dcm_nb;
                let cb_j = frames[j].dcm_cn * body_a.dcm_nb;
                block = block * (cb_i * cb_j.transpose());
            }

            blocks.push(block);
        }
    }

    blocks
}
