//! # kessler-contact
//!
//! Collision detection for the Kessler contact engine.
//!
//! Detection is a three-level filter over one sub-step `[t, t+Δt]`:
//! 1. **Broad phase**: swept bounding-sphere test between body pairs
//! 2. **Mid phase**: separating-axis test between swept cluster OBBs,
//!    evaluated with interval arithmetic so body rotation over the step
//!    cannot produce a false separation
//! 3. **Narrow phase**: per-primitive vertex-face and edge-edge tests
//!    that only fire when an interval sign change proves a crossing,
//!    producing a contact manifold with an error metric
//!
//! All three phases consume [`SweptPose`]s: body poses bounded by
//! their values at the start and end of the sub-step.

pub mod broad;
pub mod contact;
pub mod midphase;
pub mod narrow;
pub mod sweep;

pub use broad::{close_pairs, SphereSweep};
pub use contact::{Contact, Manifold};
pub use midphase::cull_cluster_pairs;
pub use narrow::{NarrowInputs, NarrowPhase};
pub use sweep::{BodyMotion, SweptPose};
