//! rust_sqn — stochastic quasi-Newton optimizers for finite-sum problems.
//!
//! Purpose
//! -------
//! Provide a family of stochastic quasi-Newton (SQN) methods for
//! unconstrained finite-sum minimization, `min f(w) = (1/m) Σ f_i(w)`,
//! together with an automatic hyperparameter tuner that turns every method
//! into a parameter-free one. Callers implement a single trait,
//! [`optimization::problem::Objective`], and invoke
//! [`optimization::sqn::minimize`] with a method name and options.
//!
//! Key behaviors
//! -------------
//! - Maintain limited-memory curvature-pair stores (ring buffer + two-loop
//!   recursion) and full-memory dense BFGS matrices, with Barzilai–Borwein,
//!   AdaGrad, or RMS initial scalings.
//! - Build curvature pairs from Hessian-vector products (SQN/DSQN),
//!   gradient differencing (oBFGS/oLBFGS and damped/regularized variants),
//!   or a sliding-window Fisher accumulator (adaQN), with optional Powell
//!   damping and Hessian regularization.
//! - Drive a per-method epoch/batch training loop over batches sampled with
//!   replacement, recording per-epoch average losses.
//! - Tune missing hyperparameters by randomized log-uniform search,
//!   discarding diverged trials and keeping the best-scoring run.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work happens on `ndarray` containers over `f64`;
//!   problems supply exact gradients and Hessian-vector products.
//! - Divergence (a non-finite loss) is a typed, trial-local outcome, never
//!   a panic; structural misconfiguration is either auto-corrected with a
//!   warning or rejected at startup.
//! - Each training trial owns its iterate, curvature state, and RNG; no
//!   state is shared across trials.
//!
//! Conventions
//! -----------
//! - Weights and gradients use the canonical aliases
//!   [`optimization::sqn::types::Weights`] and
//!   [`optimization::sqn::types::Grad`] (`Array1<f64>`).
//! - Errors bubble up as [`optimization::errors::OptResult`]; this crate
//!   never intentionally panics or uses `unsafe` in non-test code.
//! - RNG seeding follows `seed: Option<u64>` with a reproducible default;
//!   `None` delegates to system entropy.
//!
//! Downstream usage
//! ----------------
//! - Model code implements [`optimization::problem::Objective`] (or uses
//!   the bundled [`problems::logistic::LogisticRegression`] /
//!   [`problems::least_squares::LeastSquares`]), builds
//!   [`optimization::sqn::SQNOptions`], and calls
//!   [`optimization::sqn::minimize`].
//! - Plotting, dataset loading, and reporting are external callers; the
//!   crate's output is a [`optimization::sqn::FitOutcome`] record.
//!
//! Testing notes
//! -------------
//! - Unit tests live in `#[cfg(test)]` modules alongside each component;
//!   end-to-end behavior (convergence on least squares / logistic
//!   regression, tuner selection, reproducibility) is covered by
//!   `tests/integration_sqn_pipeline.rs`.

pub mod optimization;
pub mod problems;
pub mod utils;
