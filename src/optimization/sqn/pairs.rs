//! sqn::pairs — Powell damping and curvature-pair acceptance.
//!
//! Purpose
//! -------
//! Hold the numerical core shared by every curvature-pair discipline: the
//! Powell damping blend that guarantees a positive-definite update even
//! when a raw pair fails the curvature condition, and the
//! sufficient-curvature (rho) test used by the undamped disciplines.
//!
//! Key behaviors
//! -------------
//! - [`powell_damp`] takes a raw pair `(s, y)` and a quasi-Newton product
//!   `hy = H·y` (two-loop output for limited memory, a dense solve for
//!   full memory) and returns the blended step `r = θ·s + (1−θ)·hy`
//!   together with `θ ∈ [0, 1]`.
//! - [`sufficient_curvature`] evaluates `ρ = (s·y)/(y·y)` against a
//!   discipline-specific tolerance; failing pairs are skipped by the
//!   caller, leaving the store untouched.
//!
//! Invariants & assumptions
//! ------------------------
//! - `θ = 1` (no blending) exactly when `s·y ≥ 0.2·(y·hy)`.
//! - A non-finite or non-positive damping denominator is surfaced as
//!   [`OptError::DegenerateCurvaturePair`]; the caller converts it into a
//!   skipped update, never into a NaN direction.
use crate::optimization::{
    errors::{OptError, OptResult},
    sqn::types::{Grad, Weights, CURVATURE_DOT_GUARD, DAMPING_THRESHOLD},
};

/// A Powell-damped curvature pair: the blended step and its coefficient.
#[derive(Debug, Clone)]
pub struct DampedPair {
    pub r: Weights,
    pub theta: f64,
}

/// Blend a raw pair into one that satisfies the damped curvature
/// condition.
///
/// With `lhs = s·y` and `rhs = 0.2·(y·hy)`:
/// - `lhs ≥ rhs` keeps the raw step: `θ = 1`, `r = s`.
/// - Otherwise `θ = 4·rhs / (rhs/0.2 − lhs)` and `r = θ·s + (1−θ)·hy`,
///   which lands `r·y` on the damping threshold.
///
/// # Errors
/// Returns [`OptError::DegenerateCurvaturePair`] when the blend
/// denominator is non-finite or non-positive (a negative- or
/// zero-curvature `hy`); callers skip the update for that period.
pub fn powell_damp(s: &Weights, y: &Grad, hy: &Grad) -> OptResult<DampedPair> {
    let lhs = s.dot(y);
    let curvature = y.dot(hy);
    let rhs = DAMPING_THRESHOLD * curvature;
    if !lhs.is_finite() || !curvature.is_finite() {
        return Err(OptError::DegenerateCurvaturePair {
            numerator: lhs,
            denominator: curvature,
            reason: "Damping inputs must be finite.",
        });
    }
    if lhs >= rhs {
        return Ok(DampedPair { r: s.clone(), theta: 1.0 });
    }
    // Blending is only meaningful against positive quasi-Newton curvature;
    // anything else would push θ outside [0, 1].
    if curvature <= CURVATURE_DOT_GUARD {
        return Err(OptError::DegenerateCurvaturePair {
            numerator: lhs,
            denominator: curvature,
            reason: "Damping requires positive quasi-Newton curvature.",
        });
    }
    let denominator = rhs / DAMPING_THRESHOLD - lhs;
    let theta = 4.0 * rhs / denominator;
    let mut r = s * theta;
    r.scaled_add(1.0 - theta, hy);
    Ok(DampedPair { r, theta })
}

/// Sufficient-curvature (rho) test: `(s·y)/(y·y) > tol`.
///
/// Returns `false` for degenerate `y` (near-zero or non-finite `y·y`), so
/// callers can treat "skip" as the single failure mode.
pub fn sufficient_curvature(s: &Weights, y: &Grad, tol: f64) -> bool {
    let yy = y.dot(y);
    if !yy.is_finite() || yy <= CURVATURE_DOT_GUARD {
        return false;
    }
    let rho = s.dot(y) / yy;
    rho.is_finite() && rho > tol
}
