//! Local contact frames.
//!
//! Each contact gets an orthonormal frame with ĉ₃ along the contact
//! normal, so the solver sees normal and tangential components as plain
//! vector slots.

use glam::{DMat3, DVec3};
use kessler_types::constants::FRAME_DEGENERACY_TOL;

/// Orthonormal frame of one contact.
///
/// Rows of `dcm_cn` are (ĉ₁, ĉ₂, ĉ₃) expressed in the inertial frame;
/// `dcm_cn * v_N` rotates an inertial vector into the contact frame,
/// with the third component along the contact normal.
#[derive(Debug, Clone, Copy)]
pub struct ContactFrame {
    /// Inertial-to-contact rotation.
    pub dcm_cn: DMat3,
}

impl ContactFrame {
    /// Builds the frame from a contact normal (inertial) and the
    /// body-to-inertial rotation of body B.
    ///
    /// ĉ₁ is seeded from B's z axis and falls back to B's x axis when
    /// the normal is (anti)parallel to it.
    pub fn build(normal_n: DVec3, dcm_nb_b: &DMat3) -> Self {
        let c3 = normal_n.normalize();
        let mut c1 = c3.cross(*dcm_nb_b * DVec3::Z);
        if c1.length() < FRAME_DEGENERACY_TOL {
            c1 = c3.cross(*dcm_nb_b * DVec3::X);
        }
        let c1 = c1.normalize();
        let c2 = c3.cross(c1).normalize();

        Self {
            dcm_cn: DMat3::from_cols(c1, c2, c3).transpose(),
        }
    }

    /// Rotates an inertial vector into the contact frame.
    #[inline]
    pub fn to_contact(&self, v_n: DVec3) -> DVec3 {
        self.dcm_cn * v_n
    }

    /// Rotates a contact-frame vector back to the inertial frame.
    #[inline]
    pub fn to_inertial(&self, v_c: DVec3) -> DVec3 {
        self.dcm_cn.transpose() * v_c
    }
}
