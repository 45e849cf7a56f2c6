//! # kessler-effector
//!
//! The rigid-body contact effector: the facade an outer simulation
//! integrator talks to.
//!
//! Bodies are registered once with their collision geometry, then fed
//! fresh kinematic state every macro-step. [`ContactEffector::update_state`]
//! re-predicts each body's pose over the coming step and runs the broad
//! and mid collision phases; [`ContactEffector::compute_force_torque`]
//! answers each body's sub-step queries with narrow-phase detection, an
//! impulse solve, queued action-reaction delivery, or the step-rejection
//! signal, memoised so the repeated calls an adaptive integrator makes
//! within one sub-step are answered without re-solving.

pub mod body;
pub mod config;
pub mod cycle;
pub mod effector;
pub mod materials;
pub mod predictor;

pub use body::{Body, BodyKind, BodyStates, KinematicStateInput, SpacecraftStateInput};
pub use config::EffectorConfig;
pub use effector::{BodyForces, ContactEffector};
pub use materials::PairCoefficients;
