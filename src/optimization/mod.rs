//! optimization — SQN engine, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide a cohesive optimization layer for fitting finite-sum models with
//! stochastic quasi-Newton methods: the curvature machinery and training
//! loop (`sqn`), numerically stable scalar transforms
//! (`numerical_stability`), the objective interface (`problem`), and a
//! single error/result surface. Callers implement an objective, choose a
//! method and options, and obtain a loss history and fitted weights
//! without touching solver internals.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **minimizing finite sums**
//!   `f(w) = (1/m) Σ f_i(w)` (`sqn`), including method dispatch, curvature
//!   bookkeeping, and automatic hyperparameter tuning.
//! - Supply shared numerical primitives (`numerical_stability`) used by
//!   loss implementations to keep exponentials and logs well-conditioned.
//! - Normalize configuration issues, numerical failures, and problem-layer
//!   errors into a single enum (`errors::OptError`) with a common result
//!   alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizers operate on unconstrained weight vectors `w` and assume
//!   inputs are finite once validation has passed; invalid states are
//!   reported as `OptError`, not panics.
//! - Objective implementations treat non-finite losses as recoverable,
//!   typed divergence — the engine abandons the affected trial only.
//! - Dimension and finiteness checks for gradients and fitted weights are
//!   enforced via shared validation, so downstream code can assume that
//!   promoted results satisfy basic sanity constraints.
//!
//! Conventions
//! -----------
//! - Weights and gradients are represented using `ndarray`-based aliases
//!   (`Weights`, `Grad`); batches are index subsets into `{0,…,m-1}`.
//! - Public optimization entrypoints that can fail return `OptResult<T>`;
//!   callers never see problem-specific error enums directly.
//! - Diagnostics are emitted via `eprintln!` gated on `verbose`, except
//!   option auto-corrections, which always warn.
//!
//! Downstream usage
//! ----------------
//! - Model code implements `problem::Objective` and calls `sqn::minimize`
//!   with `SQNOptions` to obtain a `FitOutcome`.
//! - Loss implementations use `numerical_stability` for guarded
//!   softplus/sigmoid evaluation.
//! - Front-ends typically import the curated surface via
//!   `optimization::prelude::*`.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules focus on local concerns:
//!   - `sqn`: curvature-store FIFO semantics, two-loop identities, Powell
//!     damping bounds, sampler reproducibility, tuner selection.
//!   - `numerical_stability`: agreement with naïve formulas on safe grids
//!     and well-behaved tails.
//!   - `errors`: conversions from problem errors into `OptError`.
//! - Higher-level integration tests exercise end-to-end fits, verifying
//!   that configuration mistakes and numerical divergence surface as
//!   sensible `OptError` values or typed trial outcomes.

pub mod errors;
pub mod numerical_stability;
pub mod problem;
pub mod sqn;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_sqn::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::numerical_stability::prelude::*;
    pub use super::problem::Objective;
    pub use super::sqn::prelude::*;
}
