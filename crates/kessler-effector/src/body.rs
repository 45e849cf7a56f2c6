//! Bodies and their kinematic state.
//!
//! A body is registered once with its collision geometry and contact
//! coefficients, then receives fresh state from the outer system every
//! macro-step. Spacecraft bodies carry full rigid-body state; kinematic
//! bodies move on rails and never receive contact forces.

use std::collections::VecDeque;

use glam::{DMat3, DVec3};
use kessler_math::{skew, Mrp};
use kessler_mesh::{FaceCluster, TriangleMesh};
use kessler_types::Scalar;

use crate::cycle::SolutionSlot;

/// What kind of dynamics a body has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Full rigid-body dynamics; receives contact forces.
    Spacecraft,
    /// Moves on externally supplied rails (planet, asteroid, fixture);
    /// participates in collisions but absorbs no impulse.
    Kinematic,
}

/// Kinematic state of one body at a reference instant.
#[derive(Debug, Clone, Copy)]
pub struct BodyStates {
    /// Position of the body frame in the inertial frame (m).
    pub r_bn_n: DVec3,
    /// Inertial velocity (m/s).
    pub v_bn_n: DVec3,
    /// Non-conservative linear acceleration, body frame (m/s²).
    pub accel_b: DVec3,
    /// Mass (kg).
    pub mass: Scalar,
    /// Inertia tensor about the body origin, body frame.
    pub inertia_b: DMat3,
    /// Inverse inertia tensor.
    pub inertia_inv_b: DMat3,
    /// Centre-of-mass offset, body frame (m).
    pub c_b: DVec3,
    /// Attitude as modified Rodrigues parameters.
    pub sigma_bn: Mrp,
    /// Angular velocity, body frame (rad/s).
    pub omega_bn_b: DVec3,
    /// Angular acceleration, body frame (rad/s²).
    pub omega_dot_bn_b: DVec3,
    /// Skew matrix of `omega_bn_b`.
    pub omega_tilde_b: DMat3,
    /// Inertial-to-body rotation.
    pub dcm_bn: DMat3,
    /// Body-to-inertial rotation.
    pub dcm_nb: DMat3,
}

impl Default for BodyStates {
    fn default() -> Self {
        Self {
            r_bn_n: DVec3::ZERO,
            v_bn_n: DVec3::ZERO,
            accel_b: DVec3::ZERO,
            mass: 1.0,
            inertia_b: DMat3::IDENTITY,
            inertia_inv_b: DMat3::IDENTITY,
            c_b: DVec3::ZERO,
            sigma_bn: Mrp::IDENTITY,
            omega_bn_b: DVec3::ZERO,
            omega_dot_bn_b: DVec3::ZERO,
            omega_tilde_b: DMat3::ZERO,
            dcm_bn: DMat3::IDENTITY,
            dcm_nb: DMat3::IDENTITY,
        }
    }
}

/// Per-macro-step state write for a spacecraft body.
#[derive(Debug, Clone, Copy)]
pub struct SpacecraftStateInput {
    pub r_bn_n: DVec3,
    pub v_bn_n: DVec3,
    /// Non-conservative acceleration at the body origin, body frame.
    pub accel_b: DVec3,
    pub sigma_bn: Mrp,
    pub omega_bn_b: DVec3,
    pub omega_dot_bn_b: DVec3,
    pub mass: Scalar,
    pub inertia_b: DMat3,
    /// Centre-of-mass offset, body frame.
    pub c_b: DVec3,
}

/// Per-macro-step state write for a kinematic body.
#[derive(Debug, Clone, Copy)]
pub struct KinematicStateInput {
    pub r_bn_n: DVec3,
    pub v_bn_n: DVec3,
    /// Inertial-to-body rotation.
    pub dcm_bn: DMat3,
    /// Time derivative of `dcm_bn`.
    pub dcm_bn_dot: DMat3,
}

/// An impulse solved on body A, waiting for body B's own invocation.
#[derive(Debug, Clone, Copy)]
pub struct PendingImpulse {
    /// Impulse on the partner, inertial frame (N·s).
    pub impulse_n: DVec3,
    /// Torque impulse about the partner's origin, its body frame (N·m·s).
    pub torque_impulse_b: DVec3,
    /// Sub-step time the impulse belongs to.
    pub time: Scalar,
    /// Sub-step size it was solved with.
    pub step: Scalar,
}

/// One registered body.
#[derive(Debug)]
pub struct Body {
    pub kind: BodyKind,
    /// Model tag for logs and diagnostics.
    pub tag: String,
    /// Bounding-sphere radius for the broad phase (m).
    pub bounding_radius: Scalar,
    /// Coefficient of restitution against any partner (body-A value
    /// wins for a pair unless a pair override exists).
    pub restitution: Scalar,
    /// Coefficient of friction, same pairing rule.
    pub friction: Scalar,
    /// Collision geometry, body frame.
    pub mesh: TriangleMesh,
    /// Preprocessed face clusters.
    pub clusters: Vec<FaceCluster>,
    /// State at the last macro-step write.
    pub states: BodyStates,
    /// State predicted one outer cadence ahead.
    pub future: BodyStates,
    /// Action-reaction impulses awaiting this body's invocation.
    pub(crate) pending: VecDeque<PendingImpulse>,
    /// Memoised answer for the current sub-step.
    pub(crate) slot: SolutionSlot,
}

impl Body {
    pub(crate) fn new(
        kind: BodyKind,
        tag: String,
        mesh: TriangleMesh,
        clusters: Vec<FaceCluster>,
        bounding_radius: Scalar,
        restitution: Scalar,
        friction: Scalar,
    ) -> Self {
        Self {
            kind,
            tag,
            bounding_radius,
            restitution,
            friction,
            mesh,
            clusters,
            states: BodyStates::default(),
            future: BodyStates::default(),
            pending: VecDeque::new(),
            slot: SolutionSlot::None,
        }
    }

    /// True for bodies that never receive contact forces.
    #[inline]
    pub fn is_kinematic(&self) -> bool {
        self.kind == BodyKind::Kinematic
    }

    /// Applies a macro-step state write for a spacecraft body.
    pub fn write_spacecraft_state(&mut self, input: &SpacecraftStateInput) {
        let dcm_nb = input.sigma_bn.to_dcm_nb();
        self.states = BodyStates {
            r_bn_n: input.r_bn_n,
            v_bn_n: input.v_bn_n,
            accel_b: input.accel_b,
            mass: input.mass,
            inertia_b: input.inertia_b,
            inertia_inv_b: input.inertia_b.inverse(),
            c_b: input.c_b,
            sigma_bn: input.sigma_bn,
            omega_bn_b: input.omega_bn_b,
            omega_dot_bn_b: input.omega_dot_bn_b,
            omega_tilde_b: skew(input.omega_bn_b),
            dcm_bn: dcm_nb.transpose(),
            dcm_nb,
        };
    }

    /// Applies a macro-step state write for a kinematic body.
    ///
    /// The body-frame angular velocity is recovered from the DCM rate:
    /// `ω̃ = −[BN]̇ [BN]ᵀ`.
    pub fn write_kinematic_state(&mut self, input: &KinematicStateInput) {
        let omega_tilde_b = -(input.dcm_bn_dot * input.dcm_bn.transpose());
        self.states = BodyStates {
            r_bn_n: input.r_bn_n,
            v_bn_n: input.v_bn_n,
            omega_tilde_b,
            dcm_bn: input.dcm_bn,
            dcm_nb: input.dcm_bn.transpose(),
            ..BodyStates::default()
        };
    }
}
