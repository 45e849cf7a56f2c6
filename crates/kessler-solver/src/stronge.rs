//! Stronge energetic-restitution collision integrator.
//!
//! The collision state for K contacts is a flat vector of length 8K:
//! relative contact velocities (3K), accumulated impulses (3K), then a
//! compression-work / restitution-work pair per contact. The state
//! evolves over an auxiliary collision time τ:
//!
//! - while a contact is unresolved, its normal impulse rate is 1 and
//!   its tangential rate is Coulomb friction opposing the sliding
//!   direction, `(−μ cos φ, −μ sin φ)` with `φ = atan2(v₂, v₁)`
//! - compression work accumulates while the normal velocity is
//!   negative, restitution work afterwards
//! - a contact is resolved when its restitution work has repaid `e²`
//!   times the compression work; the integration stops when all are
//!
//! Classical RK4 drives the state; the iteration cap exists purely to
//! bound badly conditioned inputs and is logged when hit.

use glam::{DMat3, DVec3};
use kessler_types::constants::{SOLVER_ITERATION_CAP, WORK_SEED};
use kessler_types::{KesslerError, Scalar};

use crate::frame::ContactFrame;

/// Result of one impulse solve.
#[derive(Debug, Clone)]
pub struct ImpulseSolution {
    /// Accumulated impulse per contact, contact frame.
    pub impulses_c: Vec<DVec3>,
    /// Accumulated impulse per contact, inertial frame.
    pub impulses_n: Vec<DVec3>,
    /// RK4 iterations used.
    pub iterations: u64,
    /// False when the iteration cap was hit before the energy
    /// condition held at every contact.
    pub converged: bool,
}

/// The collision-time integrator.
#[derive(Debug, Clone)]
pub struct StrongeSolver {
    /// RK4 step in collision time τ.
    pub integration_step: Scalar,
    /// Hard cap on iterations.
    pub iteration_cap: u64,
}

/// State-vector offsets for K contacts.
#[inline]
fn impulse_base(k: usize) -> usize {
    3 * k
}

#[inline]
fn work_base(k: usize) -> usize {
    6 * k
}

impl StrongeSolver {
    /// Creates a solver with the given τ step and the default cap.
    pub fn new(integration_step: Scalar) -> Self {
        Self {
            integration_step,
            iteration_cap: SOLVER_ITERATION_CAP,
        }
    }

    /// Creates a solver from a [`crate::SolverConfig`].
    pub fn from_config(config: &crate::SolverConfig) -> Self {
        Self {
            integration_step: config.integration_step,
            iteration_cap: config.iteration_cap,
        }
    }

    /// Integrates the collision ODE for K contacts.
    ///
    /// `delassus` is the row-major K×K block operator from
    /// [`crate::assemble_delassus`]; `initial_velocities` holds the
    /// relative contact velocity of A w.r.t. B in each contact frame at
    /// the collision instant.
    pub fn solve(
        &self,
        delassus: &[DMat3],
        frames: &[ContactFrame],
        initial_velocities: &[DVec3],
        restitution: Scalar,
        friction: Scalar,
    ) -> ImpulseSolution {
        let k = initial_velocities.len();
        debug_assert_eq!(delassus.len(), k * k);
        debug_assert_eq!(frames.len(), k);

        let mut state = vec![0.0; 8 * k];
        for (i, v) in initial_velocities.iter().enumerate() {
            state[3 * i] = v.x;
            state[3 * i + 1] = v.y;
            state[3 * i + 2] = v.z;
            // Seed the restitution work by the sign of the approach
            // velocity's normal component for numerical robustness: an
            // approaching contact starts active, a separating one is
            // already resolved.
            state[work_base(k) + 2 * i + 1] = if v.z < 0.0 { -WORK_SEED } else { WORK_SEED };
        }

        let h = self.integration_step;
        let e2 = restitution * restitution;
        let mut iterations: u64 = 0;
        let mut converged = true;

        let mut scratch = vec![0.0; 8 * k];
        loop {
            iterations += 1;

            let k1 = self.derivative(&state, k, delassus, e2, friction);
            axpy(&state, &k1, h / 2.0, &mut scratch);
            let k2 = self.derivative(&scratch, k, delassus, e2, friction);
            axpy(&state, &k2, h / 2.0, &mut scratch);
            let k3 = self.derivative(&scratch, k, delassus, e2, friction);
            axpy(&state, &k3, h, &mut scratch);
            let k4 = self.derivative(&scratch, k, delassus, e2, friction);

            for idx in 0..state.len() {
                state[idx] += (h / 6.0) * (k1[idx] + 2.0 * k2[idx] + 2.0 * k3[idx] + k4[idx]);
            }

            let all_resolved = (0..k).all(|i| !contact_active(&state, k, i, e2));
            if all_resolved {
                break;
            }

            if iterations > self.iteration_cap {
                let residual = (0..k)
                    .map(|i| {
                        let wc = state[work_base(k) + 2 * i];
                        let wr = state[work_base(k) + 2 * i + 1];
                        (-e2 * wc - wr).max(0.0)
                    })
                    .fold(0.0, f64::max);
                // Diagnostic only: the partial impulse state is still
                // accepted and returned.
                let err = KesslerError::SolverDivergence {
                    iterations,
                    residual,
                };
                tracing::warn!(%err, "accepting partial impulse state");
                converged = false;
                break;
            }
        }

        let impulses_c: Vec<DVec3> = (0..k)
            .map(|i| {
                DVec3::new(
                    state[impulse_base(k) + 3 * i],
                    state[impulse_base(k) + 3 * i + 1],
                    state[impulse_base(k) + 3 * i + 2],
                )
            })
            .collect();
        let impulses_n = impulses_c
            .iter()
            .zip(frames)
            .map(|(imp, frame)| frame.to_inertial(*imp))
            .collect();

        ImpulseSolution {
            impulses_c,
            impulses_n,
            iterations,
            converged,
        }
    }

    /// Right-hand side of the collision ODE.
    fn derivative(
        &self,
        state: &[f64],
        k: usize,
        delassus: &[DMat3],
        e2: Scalar,
        friction: Scalar,
    ) -> Vec<f64> {
        let mut xdot = vec![0.0; 8 * k];

        for i in 0..k {
            if contact_active(state, k, i, e2) {
                let phi = state[3 * i + 1].atan2(state[3 * i]);
                xdot[impulse_base(k) + 3 * i] = -friction * phi.cos();
                xdot[impulse_base(k) + 3 * i + 1] = -friction * phi.sin();
                xdot[impulse_base(k) + 3 * i + 2] = 1.0;
            }

            let v_n = state[3 * i + 2];
            if v_n < 0.0 {
                xdot[work_base(k) + 2 * i] = v_n;
            } else if contact_active(state, k, i, e2) {
                xdot[work_base(k) + 2 * i + 1] = v_n;
            }
        }

        // v̇ = M λ̇, block by block.
        for i in 0..k {
            let mut dv = DVec3::ZERO;
            for j in 0..k {
                let rate = DVec3::new(
                    xdot[impulse_base(k) + 3 * j],
                    xdot[impulse_base(k) + 3 * j + 1],
                    xdot[impulse_base(k) + 3 * j + 2],
                );
                dv += delassus[i * k + j] * rate;
            }
            xdot[3 * i] = dv.x;
            xdot[3 * i + 1] = dv.y;
            xdot[3 * i + 2] = dv.z;
        }

        xdot
    }
}

/// A contact is active (still absorbing impulse) while its restitution
/// work has not yet repaid `e²` times its compression work.
#[inline]
fn contact_active(state: &[f64], k: usize, i: usize, e2: Scalar) -> bool {
    state[work_base(k) + 2 * i + 1] < -e2 * state[work_base(k) + 2 * i]
}

/// `out = base + scale * delta`, elementwise.
fn axpy(base: &[f64], delta: &[f64], scale: f64, out: &mut [f64]) {
    for idx in 0..base.len() {
        out[idx] = base[idx] + scale * delta[idx];
    }
}
