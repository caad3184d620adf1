//! Validation helpers for the stochastic quasi-Newton engine.
//!
//! This module centralizes common consistency checks used across the
//! optimizer interface:
//!
//! - **Option checks**: [`verify_options`] and the `verify_*` helpers
//!   ensure counts are positive and hyperparameters, when supplied, are
//!   finite and in range.
//! - **Gradient validation**: [`validate_grad`] enforces correct dimension
//!   and finite entries.
//! - **Fitted weights**: [`validate_w_star`] ensures a candidate result
//!   exists and contains only finite values.
//! - **Loss values**: [`validate_loss`] turns non-finite losses into the
//!   typed divergence error.
//!
//! These helpers standardize error reporting by returning domain-specific
//! [`OptError`] variants, making higher-level code more uniform and easier
//! to debug.
use crate::optimization::{
    errors::{OptError, OptResult},
    sqn::{
        traits::{MemoryMode, SQNOptions},
        types::{Grad, Weights},
    },
};

/// Validate a full option set before a run begins.
///
/// Checks, in order: epochs, the three batch sizes, an explicit limited
/// memory (when supplied), the Fisher window, tuning steps, and any
/// supplied hyperparameters.
///
/// # Errors
/// Returns the first failing `Invalid*` variant; see the individual
/// helpers for the exact conditions.
pub fn verify_options(opts: &SQNOptions) -> OptResult<()> {
    if opts.epochs == 0 {
        return Err(OptError::InvalidEpochs {
            epochs: opts.epochs,
            reason: "Epoch count must be positive.",
        });
    }
    verify_batch_size("batch_size", opts.batch_size)?;
    verify_batch_size("batch_size_hess", opts.batch_size_hess)?;
    verify_batch_size("batch_size_fun", opts.batch_size_fun)?;
    if let Some(MemoryMode::Limited(memory)) = opts.memory {
        if memory == 0 {
            return Err(OptError::InvalidMemory {
                memory,
                reason: "Curvature memory must hold at least one pair.",
            });
        }
    }
    if opts.fisher_memory == 0 {
        return Err(OptError::InvalidFisherMemory {
            memory: opts.fisher_memory,
            reason: "Fisher window must hold at least one gradient.",
        });
    }
    if opts.tuning_steps == 0 {
        return Err(OptError::InvalidTuningSteps {
            steps: opts.tuning_steps,
            reason: "Tuning step count must be positive.",
        });
    }
    verify_alpha(opts.alpha)?;
    verify_update_period(opts.update_period)?;
    verify_delta(opts.delta)?;
    Ok(())
}

/// Validate a single batch-size option.
///
/// # Errors
/// Returns [`OptError::InvalidBatchSize`] when the size is zero; the
/// offending option name is carried in the payload.
pub fn verify_batch_size(name: &'static str, size: usize) -> OptResult<()> {
    if size == 0 {
        return Err(OptError::InvalidBatchSize {
            name,
            size,
            reason: "Batch sizes must be positive.",
        });
    }
    Ok(())
}

/// Validate an optional step size.
///
/// - Accepts `None` (the tuner will draw one).
/// - If `Some`, the value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns [`OptError::InvalidStepSize`] otherwise.
pub fn verify_alpha(alpha: Option<f64>) -> OptResult<()> {
    if let Some(alpha) = alpha {
        if !alpha.is_finite() {
            return Err(OptError::InvalidStepSize { alpha, reason: "Step size must be finite." });
        }
        if alpha <= 0.0 {
            return Err(OptError::InvalidStepSize {
                alpha,
                reason: "Step size must be strictly positive.",
            });
        }
    }
    Ok(())
}

/// Validate an optional curvature update period.
///
/// - Accepts `None` (the tuner will draw one).
/// - If `Some`, the period must be at least 1.
///
/// # Errors
/// Returns [`OptError::InvalidUpdatePeriod`] otherwise.
pub fn verify_update_period(period: Option<usize>) -> OptResult<()> {
    if let Some(period) = period {
        if period == 0 {
            return Err(OptError::InvalidUpdatePeriod {
                period,
                reason: "Curvature update period must be at least 1.",
            });
        }
    }
    Ok(())
}

/// Validate an optional Hessian-regularization constant.
///
/// - Accepts `None` (drawn by the tuner, or forced to 0 for methods
///   without regularization).
/// - If `Some`, the value must be **finite** and **non-negative**.
///
/// # Errors
/// Returns [`OptError::InvalidRegularization`] otherwise.
pub fn verify_delta(delta: Option<f64>) -> OptResult<()> {
    if let Some(delta) = delta {
        if !delta.is_finite() {
            return Err(OptError::InvalidRegularization {
                delta,
                reason: "Regularization constant must be finite.",
            });
        }
        if delta < 0.0 {
            return Err(OptError::InvalidRegularization {
                delta,
                reason: "Regularization constant must be non-negative.",
            });
        }
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// Checks:
/// - `grad.len() == dim`
/// - every element is finite (`NaN` or `±∞` are rejected)
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value/reason of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap a fitted weight vector.
///
/// Accepts only a present vector with all **finite** entries.
///
/// # Returns
/// The owned `Weights` if valid.
///
/// # Errors
/// - [`OptError::MissingWeights`] if no vector was provided.
/// - [`OptError::InvalidWeights`] if any element is non-finite.
pub fn validate_w_star(w_star: Option<Weights>) -> OptResult<Weights> {
    match w_star {
        Some(w) => {
            for (index, &value) in w.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidWeights {
                        index,
                        value,
                        reason: "Fitted weights must be finite.",
                    });
                }
            }
            Ok(w)
        }
        None => Err(OptError::MissingWeights),
    }
}

/// Validate that a scalar loss value is finite.
///
/// Negative values are fine as long as they are finite.
///
/// # Errors
/// Returns [`OptError::DivergedLoss`] if the value is `NaN` or infinite.
pub fn validate_loss(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::DivergedLoss { value });
    }
    Ok(())
}
