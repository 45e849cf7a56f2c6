//! Interval arithmetic on time-swept vectors.
//!
//! A [`VectorInterval`] bounds a time-varying 3-vector over one sub-step
//! `[t, t+Δt]` by its endpoint values. The dot and cross products here
//! return sound outer bounds by enumerating products of component
//! endpoints and taking componentwise min/max: the tightest box
//! containing the true range, never an opportunistically widened one.
//!
//! The collision phases lean on one consequence: if an interval dot
//! product does not straddle zero, the underlying continuous quantity
//! cannot have changed sign during the sub-step.

use glam::DVec3;
use kessler_types::Scalar;

/// Bounds of a scalar quantity over a time interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarInterval {
    /// Lower bound.
    pub lower: Scalar,
    /// Upper bound.
    pub upper: Scalar,
}

impl ScalarInterval {
    /// Creates an interval from bounds, swapping if given out of order.
    #[inline]
    pub fn new(lower: Scalar, upper: Scalar) -> Self {
        if lower <= upper {
            Self { lower, upper }
        } else {
            Self { lower: upper, upper: lower }
        }
    }

    /// Returns true if `value` lies within the bounds (inclusive).
    #[inline]
    pub fn contains(&self, value: Scalar) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Returns true if the interval strictly crosses zero: both endpoints
    /// at least `tol` in magnitude, with opposite signs.
    #[inline]
    pub fn straddles_zero(&self, tol: Scalar) -> bool {
        (self.lower <= -tol && self.upper >= tol) || (self.lower >= tol && self.upper <= -tol)
    }

    /// The larger absolute endpoint.
    #[inline]
    pub fn max_abs(&self) -> Scalar {
        self.lower.abs().max(self.upper.abs())
    }
}

/// Bounds of a 3-vector quantity over a time interval.
///
/// `lower` holds the value at the start of the sub-step, `upper` the
/// value at the end; the interval operations treat each component as
/// ranging freely between its two endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorInterval {
    /// Value at the start of the interval.
    pub lower: DVec3,
    /// Value at the end of the interval.
    pub upper: DVec3,
}

/// Min/max over the four endpoint products of two scalar ranges.
#[inline]
fn product_bounds(a_lo: Scalar, a_hi: Scalar, b_lo: Scalar, b_hi: Scalar) -> (Scalar, Scalar) {
    let p1 = a_lo * b_lo;
    let p2 = a_lo * b_hi;
    let p3 = a_hi * b_lo;
    let p4 = a_hi * b_hi;
    (p1.min(p2).min(p3).min(p4), p1.max(p2).max(p3).max(p4))
}

impl VectorInterval {
    /// Creates an interval from its endpoint values.
    #[inline]
    pub fn new(lower: DVec3, upper: DVec3) -> Self {
        Self { lower, upper }
    }

    /// An interval collapsed to a single constant vector.
    #[inline]
    pub fn degenerate(v: DVec3) -> Self {
        Self { lower: v, upper: v }
    }

    /// Componentwise difference of two intervals, endpoint by endpoint.
    #[inline]
    pub fn sub(&self, other: &VectorInterval) -> VectorInterval {
        VectorInterval {
            lower: self.lower - other.lower,
            upper: self.upper - other.upper,
        }
    }

    /// Sound bounds on the dot product of all vector pairs drawn from
    /// the two intervals.
    pub fn dot(&self, other: &VectorInterval) -> ScalarInterval {
        let mut lower = 0.0;
        let mut upper = 0.0;
        for axis in 0..3 {
            let (lo, hi) = product_bounds(
                self.lower[axis],
                self.upper[axis],
                other.lower[axis],
                other.upper[axis],
            );
            lower += lo;
            upper += hi;
        }
        ScalarInterval { lower, upper }
    }

    /// Sound componentwise bounds on the cross product of all vector
    /// pairs drawn from the two intervals.
    ///
    /// Each component is a difference of two products, bounded by the
    /// min/max endpoint products of each term.
    pub fn cross(&self, other: &VectorInterval) -> VectorInterval {
        let mut lower = DVec3::ZERO;
        let mut upper = DVec3::ZERO;
        // Component k = a_i*b_j - a_j*b_i for (k, i, j) cyclic.
        for (k, i, j) in [(0usize, 1usize, 2usize), (1, 2, 0), (2, 0, 1)] {
            let (pos_lo, pos_hi) = product_bounds(
                self.lower[i],
                self.upper[i],
                other.lower[j],
                other.upper[j],
            );
            let (neg_lo, neg_hi) = product_bounds(
                self.lower[j],
                self.upper[j],
                other.lower[i],
                other.upper[i],
            );
            lower[k] = pos_lo - neg_hi;
            upper[k] = pos_hi - neg_lo;
        }
        VectorInterval { lower, upper }
    }
}

/// Sound bounds on `sin(x)` for `x` in `[min(a,b), max(a,b)]`.
///
/// Covers the 3π/2 minimum and π/2 maximum when the interval crosses
/// them; otherwise the endpoints are the extrema.
pub fn interval_sin(a: Scalar, b: Scalar) -> ScalarInterval {
    let lo = a.min(b);
    let hi = a.max(b);
    let lower = if lo <= 3.0 * std::f64::consts::FRAC_PI_2 && hi >= 3.0 * std::f64::consts::FRAC_PI_2
    {
        -1.0
    } else {
        a.sin().min(b.sin())
    };
    let upper = if lo <= std::f64::consts::FRAC_PI_2 && hi >= std::f64::consts::FRAC_PI_2 {
        1.0
    } else {
        a.sin().max(b.sin())
    };
    ScalarInterval { lower, upper }
}

/// Sound bounds on `cos(x)` for `x` in `[a, b]`, `a ≤ b`.
///
/// An interval spanning a full period collapses to `[-1, 1]`; an
/// interval containing an odd multiple of π pins the minimum, an even
/// multiple pins the maximum.
pub fn interval_cos(a: Scalar, b: Scalar) -> ScalarInterval {
    let pi = std::f64::consts::PI;
    let spans_min = ((a / pi).ceil() as i64..=(b / pi).floor() as i64).any(|k| k.rem_euclid(2) == 1);
    let spans_max = ((a / pi).ceil() as i64..=(b / pi).floor() as i64).any(|k| k.rem_euclid(2) == 0);
    let lower = if spans_min { -1.0 } else { a.cos().min(b.cos()) };
    let upper = if spans_max { 1.0 } else { a.cos().max(b.cos()) };
    ScalarInterval { lower, upper }
}
