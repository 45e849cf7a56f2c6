//! Kinematic prediction.
//!
//! Propagates a body's reference state forward by `tau` seconds, using
//! the same closed-form update at every call so repeated predictions of
//! the same instant are bit-identical; the impulse queues are indexed
//! by these trajectories.

use kessler_math::skew;
use kessler_types::Scalar;

use crate::body::{BodyKind, BodyStates};

/// Propagates `states` forward by `tau` seconds.
///
/// Kinematic bodies extrapolate position linearly and update the DCM
/// to first order, `[BN]' = [BN] − ω̃ [BN] τ`, holding angular velocity
/// constant. Spacecraft bodies apply the non-conservative acceleration
/// to position and velocity, step the MRP attitude explicitly with the
/// propagated angular velocity, and advance ω by its rate.
pub fn propagate(states: &BodyStates, kind: BodyKind, tau: Scalar) -> BodyStates {
    let mut next = *states;

    match kind {
        BodyKind::Kinematic => {
            next.r_bn_n = states.r_bn_n + states.v_bn_n * tau;
            next.dcm_bn = states.dcm_bn + (-states.omega_tilde_b * states.dcm_bn) * tau;
            next.dcm_nb = next.dcm_bn.transpose();
        }
        BodyKind::Spacecraft => {
            next.r_bn_n = states.r_bn_n
                + states.v_bn_n * tau
                + states.dcm_nb * (states.accel_b * (tau * tau));
            next.v_bn_n = states.v_bn_n + states.dcm_nb * (states.accel_b * tau);
            next.omega_bn_b = states.omega_bn_b + states.omega_dot_bn_b * tau;
            next.sigma_bn = states.sigma_bn.propagate(next.omega_bn_b, tau);
            next.dcm_nb = next.sigma_bn.to_dcm_nb();
            next.dcm_bn = next.dcm_nb.transpose();
            next.omega_tilde_b = skew(next.omega_bn_b);
        }
    }

    next
}
