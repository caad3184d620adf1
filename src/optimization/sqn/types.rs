//! sqn::types — shared numeric aliases, defaults, and guard constants.
//!
//! Purpose
//! -------
//! Centralize the core numeric types and tunable defaults used by the
//! stochastic quasi-Newton engine. By defining these in one place, the
//! rest of the optimization code can stay agnostic to `ndarray` and can
//! more easily evolve if the backend changes.
//!
//! Key behaviors
//! -------------
//! - Define canonical aliases for weight vectors, gradients, and batch
//!   index sets (`Weights`, `Grad`, `BatchIndices`).
//! - Provide the crate-wide defaults for epoch counts, batch sizes,
//!   curvature memory, Fisher window, tuning steps, and RNG seeding.
//! - Provide the numeric guard constants shared by the curvature
//!   disciplines (sufficient-curvature tolerances, damping threshold,
//!   monitoring growth factor).
//!
//! Conventions
//! -----------
//! - `Weights` and `Grad` are treated conceptually as column vectors with
//!   length equal to the number of model parameters.
//! - Batches are index sets into `{0,…,m-1}`, sampled with replacement.
//! - This module defines no runtime behavior; correctness is exercised by
//!   the components that consume these aliases and constants.

use ndarray::Array1;

/// Weight (iterate) vector `w` for finite-sum minimization.
///
/// Alias for `ndarray::Array1<f64>`, used as the canonical parameter type
/// throughout the optimizer.
pub type Weights = Array1<f64>;

/// Gradient vector `∇f(w)`, matching the shape of `Weights`.
pub type Grad = Array1<f64>;

/// A sampled batch of dataset indices (with replacement).
pub type BatchIndices = Vec<usize>;

/// Default number of curvature pairs held by a limited-memory store.
pub const DEFAULT_MEMORY: usize = 20;

/// Default number of training epochs per trial.
pub const DEFAULT_EPOCHS: usize = 10;

/// Default gradient batch size.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Default batch size for Hessian-vector product evaluations.
pub const DEFAULT_BATCH_SIZE_HESS: usize = 100;

/// Default size of the fixed monitoring set used by adaQN.
pub const DEFAULT_BATCH_SIZE_FUN: usize = 100;

/// Default capacity of the adaQN sliding gradient window.
pub const DEFAULT_FISHER_MEMORY: usize = 100;

/// Default number of randomized tuning trials when hyperparameters are
/// not supplied.
pub const DEFAULT_TUNING_STEPS: usize = 10;

/// Default RNG seed; `seed: None` in the options delegates to entropy.
pub const DEFAULT_SEED: u64 = 42;

/// Powell damping threshold: pairs whose curvature falls below this
/// fraction of the quasi-Newton curvature are blended rather than stored
/// raw.
pub const DAMPING_THRESHOLD: f64 = 0.2;

/// Sufficient-curvature tolerance for the adaQN Fisher pairs.
pub const ADAQN_RHO_TOL: f64 = 1e-4;

/// Growth factor on the monitoring loss beyond which adaQN treats its
/// curvature estimate as diverged and rolls back.
pub const MONITOR_GROWTH_TOL: f64 = 1.01;

/// Absolute floor on curvature dot products inside the two-loop recursion
/// and the dense update; pairs below it contribute nothing rather than
/// amplifying round-off into the search direction.
pub(crate) const CURVATURE_DOT_GUARD: f64 = 1e-12;

/// `sqrt(f64::EPSILON)`: the sufficient-curvature tolerance for the
/// Hessian-vector discipline and the jitter inside AdaGrad/RMS scalings.
pub fn sqrt_machine_eps() -> f64 {
    f64::EPSILON.sqrt()
}
