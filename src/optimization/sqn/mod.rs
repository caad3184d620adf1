//! sqn — stochastic quasi-Newton methods for finite-sum minimization.
//!
//! Purpose
//! -------
//! Provide the full SQN engine: a curvature-pair store with the two-loop
//! recursion, dense BFGS state for the full-memory methods, the three
//! curvature-pair disciplines (Hessian-vector products, gradient
//! differencing, Fisher window), the epoch/batch training loop, and the
//! randomized hyperparameter tuner. Callers implement
//! [`Objective`](crate::optimization::problem::Objective) and invoke
//! [`minimize`] with an [`SQNOptions`] naming one of eleven methods.
//!
//! Key behaviors
//! -------------
//! - Resolve a method name into a (strategy, damping, regularization,
//!   memory, initializer) configuration via [`api::resolve_config`],
//!   auto-correcting conflicting requests with a warning.
//! - Run one trial per supplied hyperparameter set, or a best-of-N
//!   randomized search when hyperparameters are omitted
//!   ([`tuner::tune`]).
//! - Advance iterates with directions from the two-loop recursion
//!   ([`memory::CurvatureMemory`]) or a conjugate-gradient solve against
//!   the dense approximation ([`bfgs::DenseBfgs`]).
//! - Build curvature pairs per discipline, applying Powell damping and
//!   sufficient-curvature tests ([`pairs`]) and the adaQN monitoring /
//!   rollback policy ([`run`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Every trial owns its iterate, sampler, and curvature state; nothing
//!   is shared across trials.
//! - Divergence (non-finite loss) is a typed per-trial outcome; only
//!   "every trial diverged" is fatal.
//! - Options are validated before any numerical work starts
//!   ([`validation`]).
//!
//! Conventions
//! -----------
//! - All vectors are `ndarray::Array1<f64>` via the [`types`] aliases.
//! - Batches sample indices with replacement from an explicitly seeded
//!   RNG ([`sampling::BatchSampler`]); fixed seeds are bit-reproducible.
//!
//! Downstream usage
//! ----------------
//! - Front-ends are expected to interact only with the re-exported
//!   surface: [`minimize`], [`SQNOptions`], [`Method`], [`InitMethod`],
//!   [`MemoryMode`], and [`FitOutcome`], or the [`prelude`].
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover the two-loop identities and FIFO
//!   semantics, damping bounds, dense updates and CG solves, sampler
//!   reproducibility, trial divergence, tuner selection, and dispatch
//!   corrections.
//! - Integration tests exercise `minimize` end-to-end on least squares
//!   and logistic regression.

pub mod api;
pub mod bfgs;
pub mod fisher;
pub mod logger;
pub mod memory;
pub mod pairs;
pub mod run;
pub mod sampling;
pub mod traits;
pub mod tuner;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::traits::{
    FitOutcome, InitMethod, MemoryMode, Method, MethodConfig, SQNOptions, TunedParams,
};
pub use self::types::{Grad, Weights, DEFAULT_MEMORY, DEFAULT_TUNING_STEPS};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_sqn::optimization::sqn::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::minimize;
    pub use super::traits::{FitOutcome, InitMethod, MemoryMode, Method, SQNOptions};
    pub use super::types::{Grad, Weights};
}
