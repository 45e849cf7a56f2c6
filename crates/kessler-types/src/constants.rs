//! Numerical constants and engine defaults.

use crate::scalar::Scalar;

/// Interval straddle threshold for the narrow-phase sign test (m³ or m²·m).
pub const STRADDLE_TOL: Scalar = 1.0e-12;

/// Tolerance for the exact point-in-triangle sub-tests (m²).
pub const TRIANGLE_TOL: Scalar = 1.0e-9;

/// Denominator threshold below which two edge lines are treated as parallel.
pub const PARALLEL_TOL: Scalar = 1.0e-9;

/// Two contact points closer than this are the same contact (m).
pub const CONTACT_DEDUP_DISTANCE: Scalar = 1.0e-3;

/// Slack added to the best error seen when keeping best-so-far candidates.
pub const BEST_ERROR_SLACK: Scalar = 1.0e-15;

/// Tolerance for recognising repeated (time, step) invocations.
pub const TIME_MATCH_TOL: Scalar = 1.0e-15;

/// Magnitude of the work-accumulator seed applied for numerical robustness.
pub const WORK_SEED: Scalar = 1.0e-14;

/// Norm below which a contact-frame cross product falls back to the x axis.
pub const FRAME_DEGENERACY_TOL: Scalar = 1.0e-9;

/// Hard cap on impulse-solver RK4 iterations.
pub const SOLVER_ITERATION_CAP: u64 = 1_000_000_000;

/// Default floor on cluster bounding-box half-extents (m).
pub const DEFAULT_MIN_BOX_DIM: Scalar = 0.005;

/// Default cluster bounding-box inflation factor.
pub const DEFAULT_BOX_INFLATION: Scalar = 1.0;

/// Default advisory maximum integrator sub-step (s).
pub const DEFAULT_MAX_TIME_STEP: Scalar = 0.001;

/// Default tolerance for matching queued impulses to integrator calls (s).
pub const DEFAULT_TIME_SYNCH_TOL: Scalar = 1.0e-9;
