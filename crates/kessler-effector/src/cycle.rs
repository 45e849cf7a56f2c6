//! Sub-step bookkeeping.
//!
//! An adaptive outer integrator calls `compute_force_torque` several
//! times per macro-step and once per body per sub-step, and expects
//! repeated queries at the same (t, Δt) to be answered consistently,
//! including the pseudo-random rejection values. The bookkeeping is an
//! explicit value: a small [`CycleState`] on the effector plus one
//! [`SolutionSlot`] per body.

use glam::DVec3;
use kessler_types::constants::TIME_MATCH_TOL;
use kessler_types::Scalar;

/// Macro-step-scoped coordinator state.
#[derive(Debug, Clone, Copy)]
pub struct CycleState {
    /// True until the first call after an `update_state`.
    pub new_macro_step: bool,
    /// Time of the first sub-step call in this macro-step.
    pub top_time: Scalar,
    /// Step of the first sub-step call in this macro-step.
    pub top_time_step: Scalar,
}

impl CycleState {
    pub fn reset() -> Self {
        Self {
            new_macro_step: true,
            top_time: 0.0,
            top_time_step: 0.0,
        }
    }

    /// Captures the first (t, Δt) seen after a macro-step reset.
    pub fn observe(&mut self, time: Scalar, step: Scalar) {
        if self.new_macro_step {
            self.top_time = time;
            self.top_time_step = step;
            self.new_macro_step = false;
        }
    }
}

/// Memoised answer for one body's current sub-step.
///
/// `Solved` and `Rejected` replay while the queried time is within the
/// sub-step they were computed for; `Empty` replays only at the exact
/// same time but keeps its sub-step marker so a contact surfacing
/// mid-sub-step is treated as over-penetration rather than re-solved.
#[derive(Debug, Clone, Copy)]
pub enum SolutionSlot {
    /// Nothing memoised.
    None,
    /// A computed (or delivered) contact response.
    Solved {
        force_n: DVec3,
        torque_b: DVec3,
        time_found: Scalar,
        step: Scalar,
    },
    /// The stored step-rejection draw.
    Rejected {
        force_n: DVec3,
        torque_b: DVec3,
        time_found: Scalar,
        step: Scalar,
    },
    /// No contact found at this sub-step time.
    Empty {
        time: Scalar,
        time_found: Scalar,
        step: Scalar,
    },
}

/// What a slot says about an incoming (t, Δt) query.
#[derive(Debug, Clone, Copy)]
pub enum SlotAnswer {
    /// Replay this response verbatim.
    Replay { force_n: DVec3, torque_b: DVec3 },
    /// Re-detect; a non-empty manifold now means over-penetration.
    RecomputeLockedEmpty,
    /// Compute fresh.
    Recompute,
}

impl SolutionSlot {
    /// Classifies a query against the memoised state. Expired slots
    /// clear themselves.
    pub fn answer(&mut self, time: Scalar, step: Scalar) -> SlotAnswer {
        match *self {
            SolutionSlot::None => SlotAnswer::Recompute,
            SolutionSlot::Solved {
                force_n,
                torque_b,
                time_found,
                step: s,
            }
            | SolutionSlot::Rejected {
                force_n,
                torque_b,
                time_found,
                step: s,
            } => {
                if time_found >= time && (step - s).abs() < TIME_MATCH_TOL {
                    SlotAnswer::Replay { force_n, torque_b }
                } else {
                    *self = SolutionSlot::None;
                    SlotAnswer::Recompute
                }
            }
            SolutionSlot::Empty {
                time: t0,
                time_found,
                step: s,
            } => {
                if (time - t0).abs() < TIME_MATCH_TOL && (step - s).abs() < TIME_MATCH_TOL {
                    SlotAnswer::Replay {
                        force_n: DVec3::ZERO,
                        torque_b: DVec3::ZERO,
                    }
                } else if time_found >= time && (step - s).abs() < TIME_MATCH_TOL {
                    SlotAnswer::RecomputeLockedEmpty
                } else {
                    *self = SolutionSlot::None;
                    SlotAnswer::Recompute
                }
            }
        }
    }
}
