//! Solver configuration.

use kessler_types::constants::SOLVER_ITERATION_CAP;
use kessler_types::Scalar;
use serde::{Deserialize, Serialize};

/// Configuration for the collision-time integrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// RK4 step in the auxiliary collision time τ. Smaller steps cost
    /// iterations and buy accuracy in the phase-switch timing.
    pub integration_step: Scalar,

    /// Hard cap on RK4 iterations per solve.
    pub iteration_cap: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            integration_step: 1.0e-4,
            iteration_cap: SOLVER_ITERATION_CAP,
        }
    }
}

impl SolverConfig {
    /// A tighter configuration for validation runs.
    pub fn high_accuracy() -> Self {
        Self {
            integration_step: 1.0e-6,
            ..Default::default()
        }
    }
}
