//! Telemetry sinks.
//!
//! [`PairStatsSink`] folds the event stream into per-body-pair
//! aggregates (manifold sizes, worst errors, solver effort).
//! [`TracingSink`] forwards events to `tracing` at levels matched to
//! their severity: rejections and capped solves are warnings, routine
//! phase results are debug noise.

use std::collections::HashMap;

use kessler_types::BodyId;

use crate::events::{ContactEvent, EventKind};

/// Trait for event consumers.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &ContactEvent);

    /// Called when the simulation ends. Flush buffers, close files, etc.
    fn finalize(&mut self) {}

    /// Returns a human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Aggregate contact statistics for one body pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairStats {
    /// Narrow-phase passes that produced at least one contact.
    pub detections: u64,
    /// Largest manifold seen.
    pub peak_contacts: u32,
    /// Worst contact error seen (m).
    pub worst_error: f64,
    /// Impulse solves completed.
    pub solves: u64,
    /// RK4 iterations summed across all solves.
    pub total_iterations: u64,
    /// Solves that stopped at the iteration cap.
    pub non_convergences: u64,
}

/// A sink that keys detection and solve events by body pair and step
/// rejections by the body they were served to.
#[derive(Debug, Default)]
pub struct PairStatsSink {
    stats: HashMap<(BodyId, BodyId), PairStats>,
    rejections: HashMap<BodyId, u64>,
}

fn pair_key(a: BodyId, b: BodyId) -> (BodyId, BodyId) {
    if a.0 < b.0 {
        (a, b)
    } else {
        (b, a)
    }
}

impl PairStatsSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics for a body pair, order-insensitive.
    pub fn pair(&self, a: BodyId, b: BodyId) -> Option<&PairStats> {
        self.stats.get(&pair_key(a, b))
    }

    /// Step rejections served to `body`.
    pub fn rejections(&self, body: BodyId) -> u64 {
        self.rejections.get(&body).copied().unwrap_or(0)
    }

    /// Number of body pairs with recorded activity.
    pub fn pair_count(&self) -> usize {
        self.stats.len()
    }
}

impl EventSink for PairStatsSink {
    fn handle(&mut self, event: &ContactEvent) {
        match event.kind {
            EventKind::ContactDetection {
                body_a,
                body_b,
                contact_count,
                max_error,
            } => {
                let entry = self.stats.entry(pair_key(body_a, body_b)).or_default();
                if contact_count > 0 {
                    entry.detections += 1;
                }
                entry.peak_contacts = entry.peak_contacts.max(contact_count);
                entry.worst_error = entry.worst_error.max(max_error);
            }
            EventKind::ImpulseSolve {
                body_a,
                body_b,
                iterations,
                converged,
                ..
            } => {
                let entry = self.stats.entry(pair_key(body_a, body_b)).or_default();
                entry.solves += 1;
                entry.total_iterations += iterations;
                if !converged {
                    entry.non_convergences += 1;
                }
            }
            EventKind::StepRejection { body, .. } => {
                *self.rejections.entry(body).or_insert(0) += 1;
            }
            EventKind::BroadPhase { .. } | EventKind::CoarsePairs { .. } => {}
        }
    }

    fn name(&self) -> &str {
        "pair_stats"
    }
}

/// A sink that forwards events through the `tracing` crate.
#[derive(Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Creates the sink.
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &ContactEvent) {
        match event.kind {
            EventKind::StepRejection { body, time, step } => {
                tracing::warn!(
                    sim_time = event.sim_time,
                    body = body.0,
                    time,
                    step,
                    "step rejected, integrator must retry smaller"
                );
            }
            EventKind::ImpulseSolve {
                body_a,
                body_b,
                contact_count,
                iterations,
                converged: false,
            } => {
                tracing::warn!(
                    body_a = body_a.0,
                    body_b = body_b.0,
                    contact_count,
                    iterations,
                    "impulse solve stopped at the iteration cap"
                );
            }
            EventKind::ImpulseSolve {
                body_a,
                body_b,
                contact_count,
                iterations,
                ..
            } => {
                tracing::debug!(
                    body_a = body_a.0,
                    body_b = body_b.0,
                    contact_count,
                    iterations,
                    "impulse solve"
                );
            }
            EventKind::ContactDetection {
                body_a,
                body_b,
                contact_count,
                max_error,
            } => {
                tracing::debug!(
                    body_a = body_a.0,
                    body_b = body_b.0,
                    contact_count,
                    max_error,
                    "narrow phase"
                );
            }
            EventKind::BroadPhase { close_pairs } => {
                tracing::trace!(sim_time = event.sim_time, close_pairs, "broad phase");
            }
            EventKind::CoarsePairs {
                body_a,
                body_b,
                cluster_pairs,
            } => {
                tracing::trace!(
                    body_a = body_a.0,
                    body_b = body_b.0,
                    cluster_pairs,
                    "mid phase"
                );
            }
        }
    }

    fn name(&self) -> &str {
        "tracing"
    }
}
