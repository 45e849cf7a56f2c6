//! Error types for the Kessler engine.
//!
//! All crates return `KesslerResult<T>` from fallible operations.
//! Geometry and file errors surface at load time; the per-step contact
//! pipeline itself never fails, it degrades (see the effector crate).

use thiserror::Error;

/// Unified error type for the Kessler engine.
#[derive(Debug, Error)]
pub enum KesslerError {
    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Derived geometry (clusters, hulls, frames) is degenerate beyond repair.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Wavefront .obj file could not be loaded.
    #[error("OBJ load error: {0}")]
    ObjLoad(String),

    /// Impulse solver hit its iteration cap before the restitution
    /// energy condition was met at every contact.
    #[error("Impulse solver did not converge after {iterations} iterations (residual energy: {residual:.2e})")]
    SolverDivergence { iterations: u64, residual: f64 },
}

/// Convenience alias for `Result<T, KesslerError>`.
pub type KesslerResult<T> = Result<T, KesslerError>;
