//! Scalar type alias for the engine.
//!
//! Contact dynamics accumulate work integrals across millions of RK4
//! steps and compare interval bounds down at 1e-12; everything runs in
//! double precision on the CPU.

/// The floating-point type used throughout the engine.
pub type Scalar = f64;
