//! problems — bundled finite-sum objectives.
//!
//! Purpose
//! -------
//! Provide the concrete model layer the optimizer is exercised against:
//! binary logistic regression and linear least squares, each implementing
//! [`Objective`](crate::optimization::problem::Objective) over a dense
//! `ndarray` design matrix with exact per-subset losses, gradients, and
//! Hessian-vector products.
//!
//! Key behaviors
//! -------------
//! - Validate datasets once at construction (dimensions, finiteness,
//!   label domain) and surface defects as typed [`errors::ProblemError`]
//!   values.
//! - Evaluate everything over an optional index subset, the contract the
//!   stochastic training loop relies on.
//!
//! Downstream usage
//! ----------------
//! - Construct a problem, pass it to
//!   [`minimize`](crate::optimization::sqn::minimize), and read the
//!   returned loss history and fitted weights.
//! - User-defined models implement the same `Objective` trait directly
//!   and do not need anything from this module.
//!
//! Testing notes
//! -------------
//! - Unit tests validate constructors, hand-computed losses, and
//!   derivative consistency against finite differences; integration
//!   tests run full fits.

pub mod errors;
pub mod least_squares;
pub mod logistic;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{ProblemError, ProblemResult};
pub use self::least_squares::LeastSquares;
pub use self::logistic::LogisticRegression;
