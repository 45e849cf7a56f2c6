//! # kessler-types
//!
//! Shared types, identifiers, error types, and numerical constants
//! for the Kessler rigid-body contact engine.
//!
//! This crate has zero domain logic; it defines the vocabulary
//! that all other Kessler crates share.

pub mod constants;
pub mod error;
pub mod ids;
pub mod scalar;

pub use error::{KesslerError, KesslerResult};
pub use ids::{BodyId, ClusterId, FaceId};
pub use scalar::Scalar;
