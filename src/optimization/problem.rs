//! Objective interface consumed by the stochastic quasi-Newton engine.
//!
//! A problem exposes its sample count, parameter dimension, starting
//! weights, and three evaluation capabilities over an optional index
//! subset: the averaged loss, its gradient, and a Hessian-vector product.
//! Passing `None` for the index set means "the full dataset". The engine
//! only ever reads these five facts; concrete models (logistic regression,
//! least squares, or user-supplied objectives) implement them without any
//! further coupling to the solver.
use crate::optimization::{
    errors::OptResult,
    sqn::types::{Grad, Weights},
};

/// Finite-sum objective `f(w) = (1/m) Σ f_i(w)` evaluated over batches.
///
/// Required:
/// - `num_samples`: total number of terms `m` in the sum.
/// - `dim`: parameter count `n` (length of `w`).
/// - `initial_weights`: starting iterate `w0`.
/// - `value(&w, indices) -> OptResult<f64>`: averaged loss over the subset.
///   Implementations must surface a non-finite result as
///   `OptError::DivergedLoss` rather than returning NaN.
/// - `grad(&w, indices) -> OptResult<Grad>`: averaged gradient over the
///   subset, same length as `w`.
/// - `hess_vec(&w, v, indices) -> OptResult<Grad>`: averaged
///   Hessian-vector product `H(w)·v` over the subset.
///
/// Optional:
/// - `check(&w0)`: validation hook to reject obviously invalid starting
///   points or inconsistent data. Called once before a fit begins.
pub trait Objective {
    fn num_samples(&self) -> usize;
    fn dim(&self) -> usize;
    fn initial_weights(&self) -> Weights;

    fn value(&self, w: &Weights, indices: Option<&[usize]>) -> OptResult<f64>;
    fn grad(&self, w: &Weights, indices: Option<&[usize]>) -> OptResult<Grad>;
    fn hess_vec(&self, w: &Weights, v: &Weights, indices: Option<&[usize]>) -> OptResult<Grad>;

    fn check(&self, _w0: &Weights) -> OptResult<()> {
        Ok(())
    }
}
