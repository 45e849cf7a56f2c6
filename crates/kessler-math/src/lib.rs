//! # kessler-math
//!
//! Math kernels for the Kessler contact engine.
//!
//! Provides:
//! - Re-exports of `glam` double-precision types (`DVec3`, `DMat3`, etc.)
//! - Skew-symmetric (tilde) matrix construction
//! - Modified Rodrigues parameter attitude set
//! - Interval arithmetic on time-swept vectors (the soundness backbone of
//!   the broad/mid/narrow collision phases)
//! - 2D convex hull used to size cluster bounding boxes

pub mod hull;
pub mod interval;
pub mod mrp;

// Re-export glam's f64 types as the canonical math types for Kessler.
pub use glam::{DMat3, DQuat, DVec2, DVec3};

pub use interval::{ScalarInterval, VectorInterval};
pub use mrp::Mrp;

/// Skew-symmetric (cross-product) matrix of `v`.
///
/// `skew(v) * w == v.cross(w)` for all `w`.
#[inline]
pub fn skew(v: DVec3) -> DMat3 {
    DMat3::from_cols(
        DVec3::new(0.0, v.z, -v.y),
        DVec3::new(-v.z, 0.0, v.x),
        DVec3::new(v.y, -v.x, 0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skew_matches_cross() {
        let v = DVec3::new(1.0, -2.0, 3.0);
        let w = DVec3::new(-0.5, 4.0, 2.5);
        let diff = skew(v) * w - v.cross(w);
        assert!(diff.length() < 1e-14);
    }
}
