//! Effector configuration.

use kessler_types::constants::{
    DEFAULT_BOX_INFLATION, DEFAULT_MAX_TIME_STEP, DEFAULT_MIN_BOX_DIM, DEFAULT_TIME_SYNCH_TOL,
};
use kessler_types::{KesslerError, KesslerResult, Scalar};
use serde::{Deserialize, Serialize};

/// Configuration for a [`crate::ContactEffector`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectorConfig {
    /// Upper limit on cluster vertex spread during mesh preprocessing (m).
    pub max_bounding_box_dim: Scalar,

    /// Floor on cluster bounding-box half-extents (m).
    pub min_bounding_box_dim: Scalar,

    /// Cluster bounding-box inflation factor for the mid phase.
    pub bounding_box_ff: Scalar,

    /// Acceptance threshold on contact error (m). Larger detected
    /// errors trigger the step-rejection signal.
    pub max_pos_error: Scalar,

    /// Advisory maximum integrator sub-step (s).
    pub max_time_step: Scalar,

    /// Tolerance for matching queued impulses to integrator calls (s).
    pub time_synch_tol: Scalar,

    /// RK4 step in collision time for the impulse solver.
    pub collision_integration_step: Scalar,

    /// Outer simulation cadence (s); the horizon the broad and mid
    /// phases sweep each macro-step.
    pub sim_time_step: Scalar,

    /// Seed for the step-rejection draw. Part of the configuration so
    /// reruns reproduce the rejection values bit for bit.
    pub rng_seed: u64,
}

impl Default for EffectorConfig {
    fn default() -> Self {
        Self {
            max_bounding_box_dim: 1.0,
            min_bounding_box_dim: DEFAULT_MIN_BOX_DIM,
            bounding_box_ff: DEFAULT_BOX_INFLATION,
            max_pos_error: 1.0e-3,
            max_time_step: DEFAULT_MAX_TIME_STEP,
            time_synch_tol: DEFAULT_TIME_SYNCH_TOL,
            collision_integration_step: 1.0e-4,
            sim_time_step: 1.0e-3,
            rng_seed: 0x6b65_7373_6c65_72,
        }
    }
}

impl EffectorConfig {
    /// Validates the configuration at effector construction.
    pub fn validate(&self) -> KesslerResult<()> {
        for (name, value) in [
            ("max_bounding_box_dim", self.max_bounding_box_dim),
            ("min_bounding_box_dim", self.min_bounding_box_dim),
            ("bounding_box_ff", self.bounding_box_ff),
            ("max_pos_error", self.max_pos_error),
            ("max_time_step", self.max_time_step),
            ("time_synch_tol", self.time_synch_tol),
            ("collision_integration_step", self.collision_integration_step),
            ("sim_time_step", self.sim_time_step),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(KesslerError::InvalidConfig(format!(
                    "{} must be a positive finite number, got {}",
                    name, value
                )));
            }
        }
        if self.min_bounding_box_dim >= self.max_bounding_box_dim {
            return Err(KesslerError::InvalidConfig(format!(
                "min_bounding_box_dim {} must be below max_bounding_box_dim {}",
                self.min_bounding_box_dim, self.max_bounding_box_dim
            )));
        }
        Ok(())
    }
}
