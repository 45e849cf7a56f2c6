//! Contact-engine event types.
//!
//! Structured events emitted at each phase of a sub-step. Detection,
//! solve, and rejection events name the bodies involved so sinks can
//! aggregate per pair. Events are plain value types, cheap to copy and
//! buffer.

use kessler_types::BodyId;
use serde::{Deserialize, Serialize};

/// An event emitted by the contact effector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ContactEvent {
    /// Simulation time the event belongs to (seconds).
    pub sim_time: f64,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum EventKind {
    /// Broad phase completed.
    BroadPhase {
        /// Number of body pairs within each other's bounding spheres.
        close_pairs: u32,
    },

    /// Mid phase completed for one close body pair.
    CoarsePairs {
        /// Body A of the pair.
        body_a: BodyId,
        /// Body B of the pair.
        body_b: BodyId,
        /// Cluster pairs that survived the swept SAT.
        cluster_pairs: u32,
    },

    /// Narrow phase produced a manifold for one close body pair.
    ContactDetection {
        /// Leading body of the pair.
        body_a: BodyId,
        /// Partner body.
        body_b: BodyId,
        /// Contacts in the manifold.
        contact_count: u32,
        /// Worst contact error (m).
        max_error: f64,
    },

    /// Impulse solve finished.
    ImpulseSolve {
        /// Leading body of the pair.
        body_a: BodyId,
        /// Partner body.
        body_b: BodyId,
        /// Contacts solved.
        contact_count: u32,
        /// RK4 iterations used.
        iterations: u64,
        /// Whether the energy condition was met at every contact.
        converged: bool,
    },

    /// The over-penetration rejection path fired.
    StepRejection {
        /// Body whose query was answered with the rejection draw.
        body: BodyId,
        /// Sub-step time that was rejected.
        time: f64,
        /// Sub-step size that was rejected.
        step: f64,
    },
}

impl ContactEvent {
    /// Creates a new event at the given simulation time.
    pub fn new(sim_time: f64, kind: EventKind) -> Self {
        Self { sim_time, kind }
    }
}
