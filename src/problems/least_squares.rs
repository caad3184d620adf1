//! Linear least squares over a dense design matrix.
//!
//! Purpose
//! -------
//! Provide the regression objective used to exercise the optimizer:
//! `f(w) = (1/2m) Σ (x_iᵀw − y_i)²` with exact per-subset gradients and
//! Hessian-vector products. On this problem the optimum is available in
//! closed form, which the end-to-end tests lean on.
//!
//! Conventions
//! -----------
//! - Rows of `x` are samples; `dim()` is the column count.
//! - Losses and derivatives are averaged over the evaluated subset,
//!   matching the finite-sum convention of the optimizer.
use crate::optimization::{
    errors::OptResult,
    problem::Objective,
    sqn::types::{Grad, Weights},
};
use crate::problems::errors::{ProblemError, ProblemResult};
use ndarray::{Array1, Array2};

/// Linear least-squares problem `min (1/2m) ‖X·w − y‖²`.
///
/// Invariants (enforced at construction): `x.nrows() == y.len() > 0` and
/// every entry of `x` and `y` is finite.
#[derive(Debug, Clone)]
pub struct LeastSquares {
    x: Array2<f64>,
    y: Array1<f64>,
}

impl LeastSquares {
    /// Construct a validated problem from a design matrix and targets.
    ///
    /// # Errors
    /// - [`ProblemError::EmptyData`] for a rowless design matrix.
    /// - [`ProblemError::DimMismatch`] when `y.len() != x.nrows()`.
    /// - [`ProblemError::NonFiniteData`] on the first NaN/infinite entry.
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
        for (row, &value) in y.iter().enumerate() {
            if !value.is_finite() {
                return Err(ProblemError::NonFiniteData { row, value });
            }
        }
        Ok(LeastSquares { x, y })
    }

    fn check_w(&self, w: &Weights) -> ProblemResult<()> {
        if w.len() != self.x.ncols() {
            return Err(ProblemError::DimMismatch { expected: self.x.ncols(), found: w.len() });
        }
        Ok(())
    }

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

impl Objective for LeastSquares {
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
            let residual = self.x.row(i).dot(w) - self.y[i];
            total += 0.5 * residual * residual;
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
            let residual = row.dot(w) - self.y[i];
            g.scaled_add(residual, &row);
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
            hv.scaled_add(row.dot(v), &row);
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
