//! Modified Rodrigues parameter attitude set.
//!
//! The kinematic predictor propagates spacecraft attitude as MRPs with
//! the differential equation `σ̇ = ¼ B(σ) ω`. This module supplies the
//! MRP → DCM conversion and the B matrix.

use glam::{DMat3, DVec3};
use kessler_types::Scalar;

use crate::skew;

/// Modified Rodrigues parameters describing a body-to-inertial attitude.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Mrp(pub DVec3);

impl Mrp {
    /// The identity attitude.
    pub const IDENTITY: Mrp = Mrp(DVec3::ZERO);

    /// Creates an MRP set from its three components.
    #[inline]
    pub fn new(x: Scalar, y: Scalar, z: Scalar) -> Self {
        Self(DVec3::new(x, y, z))
    }

    /// Squared norm σᵀσ.
    #[inline]
    pub fn norm_squared(&self) -> Scalar {
        self.0.length_squared()
    }

    /// Body-to-inertial rotation matrix `[NB]`.
    ///
    /// Computed as the transpose of the direction cosine matrix
    /// `[BN] = I + (8 σ̃σ̃ − 4(1−σ²) σ̃) / (1+σ²)²`.
    pub fn to_dcm_nb(&self) -> DMat3 {
        let s2 = self.norm_squared();
        let denom = (1.0 + s2) * (1.0 + s2);
        let tilde = skew(self.0);
        let dcm_bn = DMat3::IDENTITY + (tilde * tilde * 8.0 - tilde * (4.0 * (1.0 - s2))) * (1.0 / denom);
        dcm_bn.transpose()
    }

    /// Inertial-to-body rotation matrix `[BN]`.
    #[inline]
    pub fn to_dcm_bn(&self) -> DMat3 {
        self.to_dcm_nb().transpose()
    }

    /// The MRP kinematic matrix `B(σ) = (1−σ²)I + 2σ̃ + 2σσᵀ`.
    pub fn bmat(&self) -> DMat3 {
        let s2 = self.norm_squared();
        let outer = DMat3::from_cols(
            self.0 * self.0.x,
            self.0 * self.0.y,
            self.0 * self.0.z,
        );
        DMat3::IDENTITY * (1.0 - s2) + skew(self.0) * 2.0 + outer * 2.0
    }

    /// One explicit-Euler step of `σ̇ = ¼ B(σ) ω` over `tau` seconds.
    #[inline]
    pub fn propagate(&self, omega_b: DVec3, tau: Scalar) -> Mrp {
        Mrp(self.0 + self.bmat() * omega_b * (0.25 * tau))
    }
}
