//! numerical_stability — numerically robust scalar transformations.
//!
//! Purpose
//! -------
//! Collect numerically stable scalar transforms used by loss and gradient
//! implementations. This module centralizes the guarded softplus and
//! sigmoid evaluations so the problem layer can assume well-conditioned
//! `f64` arithmetic inside tight per-sample loops.
//!
//! Key behaviors
//! -------------
//! - Provide stable scalar transforms (`safe_softplus`, `safe_sigmoid`)
//!   for evaluating classification losses and their derivatives without
//!   overflow/underflow on either tail.
//!
//! Invariants & assumptions
//! ------------------------
//! - All public transforms assume finite `f64` inputs; domain and shape
//!   validation is enforced in the problem and optimizer layers, not here.
//!
//! Conventions
//! -----------
//! - This module never logs, performs I/O, or touches global state; it is
//!   pure numerical helpers suitable for use inside tight inner loops.
//! - Panics and `unsafe` are avoided; invalid inputs should be caught by
//!   upstream validation and surfaced as domain-specific error types.
//!
//! Downstream usage
//! ----------------
//! - The logistic-regression objective evaluates its per-sample loss via
//!   `safe_softplus` and its gradient / Hessian-vector weights via
//!   `safe_sigmoid`.
//! - Higher-level front-ends are expected to depend only on the
//!   re-exported surface or the prelude, not on internal details of
//!   [`transformations`].
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover agreement of the stable
//!   transforms with naïve formulas on safe grids and their tail behavior
//!   at magnitudes where the naïve formulas overflow.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{safe_sigmoid, safe_softplus};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_sqn::optimization::numerical_stability::prelude::*;
//
// to import the main numerical-stability surface in a single line.

pub mod prelude {
    pub use super::transformations::{safe_sigmoid, safe_softplus};
}
