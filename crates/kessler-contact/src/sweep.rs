//! Swept poses and instantaneous body motion.
//!
//! The collision phases never see a body type; they see the pose
//! interval a body sweeps during the sub-step and, where contact
//! velocities matter, its instantaneous kinematics at the start of it.

use glam::{DMat3, DVec3};
use kessler_math::VectorInterval;

/// A body pose bounded over one sub-step.
#[derive(Debug, Clone, Copy)]
pub struct SweptPose {
    /// Position at the start of the step.
    pub r_now: DVec3,
    /// Position at the end of the step.
    pub r_next: DVec3,
    /// Body-to-inertial rotation at the start of the step.
    pub dcm_nb_now: DMat3,
    /// Body-to-inertial rotation at the end of the step.
    pub dcm_nb_next: DMat3,
}

impl SweptPose {
    /// Interval swept in the inertial frame by a body-frame point.
    #[inline]
    pub fn world_interval(&self, local: DVec3) -> VectorInterval {
        VectorInterval::new(
            self.r_now + self.dcm_nb_now * local,
            self.r_next + self.dcm_nb_next * local,
        )
    }

    /// Interval swept in the inertial frame by a body-frame direction.
    #[inline]
    pub fn axis_interval(&self, axis: DVec3) -> VectorInterval {
        VectorInterval::new(self.dcm_nb_now * axis, self.dcm_nb_next * axis)
    }

    /// A body-frame vector rotated into the inertial frame at the start
    /// of the step.
    #[inline]
    pub fn rotate_now(&self, local: DVec3) -> DVec3 {
        self.dcm_nb_now * local
    }
}

/// Instantaneous kinematics of a body at the start of the sub-step.
#[derive(Debug, Clone, Copy)]
pub struct BodyMotion {
    /// Position in the inertial frame.
    pub r: DVec3,
    /// Velocity in the inertial frame.
    pub v: DVec3,
    /// Body-to-inertial rotation.
    pub dcm_nb: DMat3,
    /// Skew matrix of the body-frame angular velocity.
    pub omega_tilde_b: DMat3,
}

impl BodyMotion {
    /// Inertial velocity of a body-fixed point given in the inertial
    /// frame: `v + R_NB (ω̃ R_BN (p − r))`.
    pub fn point_velocity(&self, point_n: DVec3) -> DVec3 {
        let dcm_bn = self.dcm_nb.transpose();
        self.v + self.dcm_nb * (self.omega_tilde_b * (dcm_bn * (point_n - self.r)))
    }
}
