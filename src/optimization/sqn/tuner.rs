//! sqn::tuner — randomized hyperparameter search with best-of-N selection.
//!
//! Purpose
//! -------
//! Turn any method into a parameter-free one: when the caller leaves a
//! hyperparameter the method consumes unset, the tuner repeatedly samples
//! it log-uniformly from a fixed range, runs a full training trial per
//! draw, discards diverged trials, and promotes the trial with the lowest
//! final-epoch average loss.
//!
//! Key behaviors
//! -------------
//! - Exactly one trial runs when every consumed hyperparameter is
//!   supplied; otherwise `tuning_steps` trials run (default 10).
//! - Draw ranges: `α ∈ [1e-6, 1e2]`, `L ∈ {2,…,64}` (integer,
//!   log-uniform), `δ ∈ [1e-5, 1e-1]`; `δ` is forced to 0 for methods
//!   without Hessian regularization.
//! - Per-trial seeds derive deterministically from the tuner RNG, so a
//!   fixed options seed reproduces every trial bit-for-bit.
//! - If every trial diverges, the whole run fails with
//!   [`OptError::AllTrialsDiverged`].
use crate::optimization::{
    errors::{OptError, OptResult},
    problem::Objective,
    sqn::{
        logger::TrialRecord,
        run::{run_trial, TrialOutcome},
        traits::{FitOutcome, MethodConfig, SQNOptions, TunedParams},
    },
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Log-uniform draw range for the step size α.
const ALPHA_RANGE: (f64, f64) = (1e-6, 1e2);

/// Integer log-uniform draw range for the curvature update period L.
const PERIOD_RANGE: (usize, usize) = (2, 64);

/// Log-uniform draw range for the regularization constant δ.
const DELTA_RANGE: (f64, f64) = (1e-5, 1e-1);

/// Run the tuning loop for a resolved method configuration.
///
/// # Behavior
/// - Decides the trial count from which hyperparameters are missing (see
///   the module documentation).
/// - Per trial: fills in missing hyperparameters by log-uniform draws,
///   derives a fresh trial seed, and delegates to
///   [`run_trial`](crate::optimization::sqn::run::run_trial).
/// - Keeps the record whose final-epoch loss is strictly lower than the
///   best seen so far (initial best = +∞); diverged trials are discarded
///   with a diagnostic under verbose.
///
/// # Errors
/// - [`OptError::AllTrialsDiverged`] when no trial finishes.
/// - Propagates structural errors from the training loop unchanged.
pub fn tune<P: Objective>(
    problem: &P, config: &MethodConfig, opts: &SQNOptions,
) -> OptResult<FitOutcome> {
    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let needs_alpha = opts.alpha.is_none();
    let needs_period = opts.update_period.is_none() && config.strategy.uses_update_period();
    let needs_delta = opts.delta.is_none() && config.regularization;
    let trials = if needs_alpha || needs_period || needs_delta { opts.tuning_steps } else { 1 };

    let mut best: Option<TrialRecord> = None;
    for trial in 0..trials {
        let params = TunedParams {
            alpha: opts.alpha.unwrap_or_else(|| log_uniform(&mut rng, ALPHA_RANGE)),
            update_period: if config.strategy.uses_update_period() {
                opts.update_period.unwrap_or_else(|| draw_period(&mut rng))
            } else {
                1
            },
            delta: if config.regularization {
                opts.delta.unwrap_or_else(|| log_uniform(&mut rng, DELTA_RANGE))
            } else {
                0.0
            },
        };
        let trial_seed: u64 = rng.gen();
        match run_trial(problem, config, opts, &params, trial_seed)? {
            TrialOutcome::Finished(record) => {
                if opts.verbose {
                    eprintln!(
                        "trial {}/{}: final loss = {:.6e} (alpha = {:.3e}, L = {}, delta = {:.3e})",
                        trial + 1,
                        trials,
                        record.final_loss(),
                        params.alpha,
                        params.update_period,
                        params.delta,
                    );
                }
                if improves(&record, &best) {
                    best = Some(record);
                }
            }
            TrialOutcome::Diverged { epoch } => {
                if opts.verbose {
                    eprintln!(
                        "trial {}/{}: diverged in epoch {} (alpha = {:.3e}); discarding",
                        trial + 1,
                        trials,
                        epoch,
                        params.alpha,
                    );
                }
            }
        }
    }

    match best {
        Some(record) => FitOutcome::from_record(record),
        None => Err(OptError::AllTrialsDiverged { trials }),
    }
}

/// Strict best-of-N comparison: a candidate wins only with a final loss
/// strictly below the incumbent's (ties keep the earlier trial).
fn improves(candidate: &TrialRecord, best: &Option<TrialRecord>) -> bool {
    match best {
        None => true,
        Some(incumbent) => candidate.final_loss() < incumbent.final_loss(),
    }
}

/// Draw log-uniformly from `[lo, hi]`.
fn log_uniform(rng: &mut StdRng, (lo, hi): (f64, f64)) -> f64 {
    let u: f64 = rng.gen();
    (lo.ln() + u * (hi.ln() - lo.ln())).exp()
}

/// Draw an integer update period log-uniformly from the period range.
fn draw_period(rng: &mut StdRng) -> usize {
    let (lo, hi) = PERIOD_RANGE;
    let value = log_uniform(rng, (lo as f64, hi as f64)).round() as usize;
    value.clamp(lo, hi)
}
