//! sqn::bfgs — explicit dense Hessian approximation for full-memory
//! methods.
//!
//! Purpose
//! -------
//! Maintain the direct Hessian approximation `B` used by the full-memory
//! methods (oBFGS, D-oBFGS, RES, SDBFGS): the standard rank-2 BFGS update
//! plus an optional `δ·I` regularization term, and a conjugate-gradient
//! solve of `B·d = g` in place of the two-loop recursion.
//!
//! Key behaviors
//! -------------
//! - `B` starts at the identity and stays symmetric positive definite:
//!   updates whose denominators fail the curvature guard are skipped
//!   rather than applied.
//! - Directions come from an inner CG loop with a relative residual
//!   tolerance and an iteration cap of the problem dimension, so the
//!   `n×n` matrix is never factorized.
//!
//! Invariants & assumptions
//! ------------------------
//! - `update` is only fed pairs the discipline accepted (damped or raw);
//!   the internal guards are a second line of defense, not the acceptance
//!   test.
//! - `solve` assumes `B` is SPD, which the guarded updates preserve.
use crate::optimization::sqn::types::{Grad, Weights, CURVATURE_DOT_GUARD};
use crate::utils::l2_norm;
use ndarray::{Array1, Array2};

/// Relative residual tolerance for the inner conjugate-gradient solve.
const CG_REL_TOL: f64 = 1e-10;

/// Dense direct Hessian approximation with rank-2 updates.
#[derive(Debug, Clone)]
pub struct DenseBfgs {
    b: Array2<f64>,
}

impl DenseBfgs {
    /// Create the identity approximation for `dim` parameters.
    pub fn new(dim: usize) -> Self {
        DenseBfgs { b: Array2::eye(dim) }
    }

    /// Problem dimension.
    pub fn dim(&self) -> usize {
        self.b.nrows()
    }

    /// Reset the approximation back to the identity.
    pub fn reset(&mut self) {
        self.b = Array2::eye(self.dim());
    }

    /// Matrix-vector product `B·v`.
    pub fn apply(&self, v: &Weights) -> Grad {
        self.b.dot(v)
    }

    /// Rank-2 BFGS update with regularization:
    /// `B ← B − (B·r)(B·r)ᵀ/(rᵀB·r) + y·yᵀ/(yᵀ·r) + δ·I`.
    ///
    /// Returns `false` (approximation untouched) when either denominator
    /// fails the curvature guard; positive definiteness is preserved in
    /// both cases.
    pub fn update(&mut self, r: &Weights, y: &Grad, delta: f64) -> bool {
        let br = self.b.dot(r);
        let rbr = r.dot(&br);
        let yr = y.dot(r);
        if !rbr.is_finite() || rbr <= CURVATURE_DOT_GUARD {
            return false;
        }
        if !yr.is_finite() || yr <= CURVATURE_DOT_GUARD {
            return false;
        }
        let dim = self.dim();
        for i in 0..dim {
            for j in 0..dim {
                self.b[[i, j]] += y[i] * y[j] / yr - br[i] * br[j] / rbr;
            }
            if delta > 0.0 {
                self.b[[i, i]] += delta;
            }
        }
        true
    }

    /// Solve `B·d = g` by conjugate gradient.
    ///
    /// Runs at most `dim` iterations and stops when the residual norm
    /// falls under `CG_REL_TOL · ‖g‖`. A zero right-hand side returns the
    /// zero direction immediately.
    pub fn solve(&self, g: &Grad) -> Grad {
        let dim = self.dim();
        let g_norm = l2_norm(g);
        let mut x: Array1<f64> = Array1::zeros(dim);
        if g_norm == 0.0 {
            return x;
        }
        let tol = CG_REL_TOL * g_norm;
        let mut residual = g.clone();
        let mut p = residual.clone();
        let mut rs = residual.dot(&residual);
        for _ in 0..dim {
            let bp = self.b.dot(&p);
            let pbp = p.dot(&bp);
            if !pbp.is_finite() || pbp <= CURVATURE_DOT_GUARD {
                break;
            }
            let step = rs / pbp;
            x.scaled_add(step, &p);
            residual.scaled_add(-step, &bp);
            let rs_next = residual.dot(&residual);
            if rs_next.sqrt() <= tol {
                break;
            }
            let ratio = rs_next / rs;
            p = &residual + &(p * ratio);
            rs = rs_next;
        }
        x
    }
}
