//! Contact coefficient lookup.
//!
//! Restitution and friction live on each body, with body A's values
//! governing a pair by default. Specific pairs can override that with
//! an entry keyed by the two body indices, order-insensitive.

use std::collections::HashMap;

use kessler_types::{BodyId, Scalar};

/// Per-pair overrides for (restitution, friction).
#[derive(Debug, Clone, Default)]
pub struct PairCoefficients {
    overrides: HashMap<(u32, u32), (Scalar, Scalar)>,
}

fn key(a: BodyId, b: BodyId) -> (u32, u32) {
    if a.0 < b.0 {
        (a.0, b.0)
    } else {
        (b.0, a.0)
    }
}

impl PairCoefficients {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the (restitution, friction) pair for two bodies.
    pub fn set(&mut self, a: BodyId, b: BodyId, restitution: Scalar, friction: Scalar) {
        self.overrides.insert(key(a, b), (restitution, friction));
    }

    /// Looks up the coefficients for a pair, falling back to body A's
    /// own values.
    pub fn lookup(
        &self,
        a: BodyId,
        b: BodyId,
        body_a_restitution: Scalar,
        body_a_friction: Scalar,
    ) -> (Scalar, Scalar) {
        self.overrides
            .get(&key(a, b))
            .copied()
            .unwrap_or((body_a_restitution, body_a_friction))
    }
}
