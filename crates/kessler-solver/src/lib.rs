//! # kessler-solver
//!
//! Multi-contact impulse resolution for the Kessler contact engine.
//!
//! Given a contact manifold, the solver:
//! 1. Builds a local frame at every contact ([`ContactFrame`])
//! 2. Assembles the block inverse-inertia (Delassus) operator mapping
//!    contact impulses to relative contact velocities ([`assemble_delassus`])
//! 3. Integrates Stronge's energetic-restitution collision ODE over an
//!    auxiliary collision time with classical RK4, terminating when the
//!    restitution-phase work at every contact has repaid `e²` times the
//!    compression-phase work ([`StrongeSolver`])
//!
//! The output is one impulse vector per contact, which the effector
//! converts to an equivalent external force and torque over the
//! sub-step.

pub mod config;
pub mod delassus;
pub mod frame;
pub mod stronge;

pub use config::SolverConfig;
pub use delassus::{assemble_delassus, BodyInertia};
pub use frame::ContactFrame;
pub use stronge::{ImpulseSolution, StrongeSolver};
