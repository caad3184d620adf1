//! Numerical stability utilities.
//!
//! Provides safe implementations of common nonlinear transforms
//! that are prone to overflow/underflow in naïve form.
//! The functions here follow guarded strategies similar to those
//! in major ML libraries (e.g. PyTorch, TensorFlow), using explicit
//! cutoffs (`x > 20.0`) to keep `f64` arithmetic in a well-conditioned regime.
//!
//! # Provided items
//! - [`safe_softplus(x)`]: stable version of `ln(1 + exp(x))`,
//!   mapping ℝ → (0, ∞) without overflow.
//! - [`safe_sigmoid(x)`]: stable logistic function `1 / (1 + exp(-x))`,
//!   mapping ℝ → (0, 1) without overflow on either tail.
//!
//! # Rationale
//! These transforms are the building blocks of loss and gradient
//! evaluation for classification objectives, where margins routinely
//! reach magnitudes at which `exp` overflows `f64`.

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// Computes softplus without overflow for large positive `x` and
/// with good precision for large negative `x`. This implementation
/// uses a simple piecewise guard:
///
/// - For sufficiently large `x`, `softplus(x) ≈ x + ln1p(exp(-x)) ≈ x`.
/// - Otherwise, it falls back to `ln1p(exp(x))`.
///
/// The cutoff used here (`x > 20.0`) is a practical threshold that
/// keeps the calculation in a well-conditioned regime for `f64`
/// (similar to the strategy used in common ML libraries like PyTorch).
///
/// # Parameters
/// - `x`: real input
///
/// # Returns
/// - `softplus(x)` as `f64`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Numerically stable logistic function: `sigmoid(x) = 1 / (1 + exp(-x))`.
///
/// Evaluates the branch whose exponential argument is non-positive, so
/// `exp` never overflows:
///
/// - For `x >= 0`: `1 / (1 + exp(-x))`.
/// - For `x < 0`: `exp(x) / (1 + exp(x))`.
///
/// Both branches agree analytically; the split only controls which tail
/// the exponential is evaluated on.
///
/// # Parameters
/// - `x`: real input
///
/// # Returns
/// - `sigmoid(x)` as `f64`, guaranteed to lie in `[0, 1]`.
pub fn safe_sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
