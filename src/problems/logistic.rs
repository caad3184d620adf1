//! Binary logistic regression over a dense design matrix.
//!
//! Purpose
//! -------
//! Provide the classification objective used to exercise the optimizer:
//! `f(w) = (1/m) Σ softplus(−y_i · x_iᵀw)` with labels `y_i ∈ {−1, +1}`.
//! The per-sample loss, gradient, and Hessian-vector product are exact
//! and evaluated over an optional index subset, which is what the
//! stochastic training loop consumes.
//!
//! Key behaviors
//! -------------
//! - Validate the dataset once at construction: consistent dimensions,
//!   finite entries, and ±1 labels.
//! - Evaluate loss terms through the guarded
//!   [`safe_softplus`]/[`safe_sigmoid`] transforms, so extreme margins
//!   stay finite.
//! - Report batch problems (out-of-range indices, empty batches) as
//!   typed errors rather than panicking.
//!
//! Conventions
//! -----------
//! - Rows of `x` are samples; `dim()` is the column count.
//! - Gradients are averaged over the evaluated subset, matching the
//!   finite-sum convention of the optimizer.
use crate::optimization::{
    errors::OptResult,
    numerical_stability::{safe_sigmoid, safe_softplus},
    problem::Objective,
    sqn::types::{Grad, Weights},
};
use crate::problems::errors::{ProblemError, ProblemResult};
use ndarray::{Array1, Array2};

/// Binary logistic regression problem with ±1 labels.
///
/// Invariants (enforced at construction):
/// - `x.nrows() == y.len() > 0`;
/// - every entry of `x` and `y` is finite;
/// - every label is −1 or +1.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    x: Array2<f64>,
    y: Array1<f64>,
}

impl LogisticRegression {
    /// Construct a validated problem from a design matrix and labels.
    ///
    /// # Errors
    /// - [`ProblemError::EmptyData`] for a rowless design matrix.
    /// - [`ProblemError::DimMismatch`] when `y.len() != x.nrows()`.
    /// - [`ProblemError::NonFiniteData`] on the first NaN/infinite entry.
    /// - [`ProblemError::InvalidLabel`] on the first label outside {−1, +1}.
    pub fn new(x: Array2<f64>, y: Array1<f64>) -> ProblemResult<Self> {
        if x.nrows() == 0 {
            return Err(ProblemError::EmptyData);
        }
        if y.len() != x.nrows() {
            return Err(ProblemError::DimMismatch { expected: x.nrows(), found: y.len() });
        }
        for (row, sample) in x.rows().into_iter().enumerate() {
            for &value in sample.iter() {
                if !value.is_finite() {
                    return Err(ProblemError::NonFiniteData { row, value });
                }
            }
        }
        for (index, &value) in y.iter().enumerate() {
            if !value.is_finite() {
                return Err(ProblemError::NonFiniteData { row: index, value });
            }
            if value != 1.0 && value != -1.0 {
                return Err(ProblemError::InvalidLabel { index, value });
            }
        }
        Ok(LogisticRegression { x, y })
    }

    /// Reject weight vectors of the wrong length.
    fn check_w(&self, w: &Weights) -> ProblemResult<()> {
        if w.len() != self.x.ncols() {
            return Err(ProblemError::DimMismatch { expected: self.x.ncols(), found: w.len() });
        }
        Ok(())
    }

    /// Reject out-of-range or empty batches.
    fn validate_batch(&self, indices: &[usize]) -> ProblemResult<()> {
        if indices.is_empty() {
            return Err(ProblemError::EmptyData);
        }
        let m = self.x.nrows();
        for &index in indices {
            if index >= m {
                return Err(ProblemError::IndexOutOfRange { index, len: m });
            }
        }
        Ok(())
    }
}

impl Objective for LogisticRegression {
    fn num_samples(&self) -> usize {
        self.x.nrows()
    }

    fn dim(&self) -> usize {
        self.x.ncols()
    }

    fn initial_weights(&self) -> Weights {
        Array1::zeros(self.x.ncols())
    }

    fn value(&self, w: &Weights, indices: Option<&[usize]>) -> OptResult<f64> {
        self.check_w(w)?;
        let mut total = 0.0;
        let mut visit = |i: usize| {
            let z = self.x.row(i).dot(w);
            total += safe_softplus(-self.y[i] * z);
        };
        let count = match indices {
            Some(batch) => {
                self.validate_batch(batch)?;
                batch.iter().for_each(|&i| visit(i));
                batch.len()
            }
            None => {
                (0..self.x.nrows()).for_each(&mut visit);
                self.x.nrows()
            }
        };
        let loss = total / count as f64;
        if !loss.is_finite() {
            return Err(ProblemError::NonFiniteLoss { value: loss }.into());
        }
        Ok(loss)
    }

    fn grad(&self, w: &Weights, indices: Option<&[usize]>) -> OptResult<Grad> {
        self.check_w(w)?;
        let mut g: Grad = Array1::zeros(self.x.ncols());
        let mut visit = |i: usize| {
            let row = self.x.row(i);
            let z = row.dot(w);
            let weight = -self.y[i] * safe_sigmoid(-self.y[i] * z);
            g.scaled_add(weight, &row);
        };
        let count = match indices {
            Some(batch) => {
                self.validate_batch(batch)?;
                batch.iter().for_each(|&i| visit(i));
                batch.len()
            }
            None => {
                (0..self.x.nrows()).for_each(&mut visit);
                self.x.nrows()
            }
        };
        Ok(g / count as f64)
    }

    fn hess_vec(&self, w: &Weights, v: &Weights, indices: Option<&[usize]>) -> OptResult<Grad> {
        self.check_w(w)?;
        self.check_w(v)?;
        let mut hv: Grad = Array1::zeros(self.x.ncols());
        let mut visit = |i: usize| {
            let row = self.x.row(i);
            let p = safe_sigmoid(row.dot(w));
            let weight = p * (1.0 - p) * row.dot(v);
            hv.scaled_add(weight, &row);
        };
        let count = match indices {
            Some(batch) => {
                self.validate_batch(batch)?;
                batch.iter().for_each(|&i| visit(i));
                batch.len()
            }
            None => {
                (0..self.x.nrows()).for_each(&mut visit);
                self.x.nrows()
            }
        };
        Ok(hv / count as f64)
    }
}
