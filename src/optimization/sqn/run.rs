//! Execution of a single training trial.
//!
//! This is the shared epoch/batch driver used by every method. It wires
//! up:
//! - a per-trial [`BatchSampler`] (seeded, sampling with replacement),
//! - the curvature state (limited-memory two-loop store or dense matrix),
//! - the method's curvature-pair discipline (Hessian-vector, gradient
//!   differencing, or Fisher window),
//!   then walks `epochs × batches` stochastic steps and records the
//!   per-epoch average losses.
//!
//! Divergence is a typed outcome, not an error: any non-finite loss value
//! (batch or monitoring) terminates the trial as
//! [`TrialOutcome::Diverged`], which the tuner treats as a failed trial.
//! Structural errors (dimension mismatches, out-of-range indices) still
//! propagate as `Err`.
use crate::optimization::{
    errors::{OptError, OptResult},
    problem::Objective,
    sqn::{
        bfgs::DenseBfgs,
        fisher::FisherAccumulator,
        logger::TrialRecord,
        memory::CurvatureMemory,
        pairs::{powell_damp, sufficient_curvature},
        sampling::BatchSampler,
        traits::{MemoryMode, MethodConfig, PairStrategy, SQNOptions, TunedParams},
        types::{sqrt_machine_eps, Grad, Weights, ADAQN_RHO_TOL, MONITOR_GROWTH_TOL},
        validation::{validate_grad, validate_loss},
    },
};
use ndarray::Array1;

/// Terminal state of one training trial.
///
/// `Finished` carries the trial's record; `Diverged` names the epoch in
/// which the first non-finite loss appeared.
#[derive(Debug, Clone, PartialEq)]
pub enum TrialOutcome {
    Finished(TrialRecord),
    Diverged { epoch: usize },
}

/// Curvature state owned by one trial: either a bounded pair store
/// applied through the two-loop recursion or an explicit dense matrix.
enum CurvatureState {
    Limited(CurvatureMemory),
    Full(DenseBfgs),
}

impl CurvatureState {
    /// Quasi-Newton search direction `H·g`.
    fn direction(&mut self, g: &Grad) -> Grad {
        match self {
            CurvatureState::Limited(memory) => memory.two_loop(g),
            CurvatureState::Full(bfgs) => bfgs.solve(g),
        }
    }

    /// Inverse-Hessian product `H·y` used by the damping blend.
    fn hv_product(&mut self, y: &Grad) -> Grad {
        match self {
            CurvatureState::Limited(memory) => memory.two_loop(y),
            CurvatureState::Full(bfgs) => bfgs.solve(y),
        }
    }

    /// Store an accepted pair. Returns whether the state actually changed
    /// (the dense update skips guarded-degenerate pairs).
    fn store(&mut self, r: Weights, y: Grad, delta: f64) -> bool {
        match self {
            CurvatureState::Limited(memory) => {
                memory.store(r, y);
                true
            }
            CurvatureState::Full(bfgs) => bfgs.update(&r, &y, delta),
        }
    }

    /// Drop all curvature information (adaQN rollback).
    fn reset(&mut self) {
        match self {
            CurvatureState::Limited(memory) => memory.reset(),
            CurvatureState::Full(bfgs) => bfgs.reset(),
        }
    }
}

/// Run one trial of `epochs × batches` stochastic quasi-Newton steps.
///
/// # Behavior
/// - Samples `batch_size` indices with replacement per step, evaluates
///   the stochastic loss and gradient, advances
///   `w ← w − α·direction(gradient)`, and runs the configured discipline's
///   curvature bookkeeping (see the module documentation).
/// - Appends each epoch's average batch loss to the trial record.
/// - Converts any non-finite loss into `Ok(TrialOutcome::Diverged)`.
///
/// # Errors
/// - Propagates structural problem errors (dimension mismatches,
///   out-of-range indices) and non-degenerate damping failures.
pub fn run_trial<P: Objective>(
    problem: &P, config: &MethodConfig, opts: &SQNOptions, params: &TunedParams, seed: u64,
) -> OptResult<TrialOutcome> {
    let m = problem.num_samples();
    let n = problem.dim();
    let mut sampler = BatchSampler::new(seed, m);
    let mut w = problem.initial_weights();

    let mut curvature = match config.memory {
        MemoryMode::Limited(capacity) => {
            CurvatureState::Limited(CurvatureMemory::new(n, capacity, config.init))
        }
        MemoryMode::Full => CurvatureState::Full(DenseBfgs::new(n)),
    };
    let mut fisher = FisherAccumulator::new(opts.fisher_memory);
    // adaQN monitors a fixed held-out index set drawn once per trial.
    let monitor: Vec<usize> = match config.strategy {
        PairStrategy::Fisher => sampler.draw(opts.batch_size_fun),
        _ => Vec::new(),
    };

    let period = params.update_period.max(1);
    let batches = batches_per_epoch(m, config.strategy, opts, period);

    let mut average_sum: Weights = Array1::zeros(n);
    let mut prev_average: Option<Weights> = None;
    let mut inner_steps = 0usize;

    let mut fhist = Vec::with_capacity(opts.epochs);
    for epoch in 0..opts.epochs {
        let mut loss_sum = 0.0;
        for _ in 0..batches {
            let batch = sampler.draw(opts.batch_size);
            let loss = match stochastic_loss(problem, &w, &batch) {
                Ok(value) => value,
                Err(OptError::DivergedLoss { .. }) => {
                    return Ok(TrialOutcome::Diverged { epoch });
                }
                Err(e) => return Err(e),
            };
            let g = problem.grad(&w, Some(&batch))?;
            validate_grad(&g, n)?;
            let direction = curvature.direction(&g);

            match config.strategy {
                PairStrategy::GradientDifference => {
                    let mut w_new = w.clone();
                    w_new.scaled_add(-params.alpha, &direction);
                    // Second gradient evaluation on the SAME batch; the
                    // pair differences gradients at fixed sample indices.
                    let g_new = problem.grad(&w_new, Some(&batch))?;
                    let s = &w_new - &w;
                    let mut y = &g_new - &g;
                    if params.delta > 0.0 {
                        y.scaled_add(-params.delta, &s);
                    }
                    store_with_damping(&mut curvature, config, opts, s, y, params.delta)?;
                    w = w_new;
                }
                PairStrategy::HessianVector => {
                    w.scaled_add(-params.alpha, &direction);
                    average_sum += &w;
                    inner_steps += 1;
                    if inner_steps % period == 0 {
                        let w_avg = &average_sum / period as f64;
                        average_sum.fill(0.0);
                        if let Some(w_prev) = prev_average.replace(w_avg.clone()) {
                            let s = &w_avg - &w_prev;
                            let hess_batch = sampler.draw(opts.batch_size_hess);
                            let y = problem.hess_vec(&w_avg, &s, Some(&hess_batch))?;
                            if config.damping {
                                store_with_damping(&mut curvature, config, opts, s, y, 0.0)?;
                            } else if sufficient_curvature(&s, &y, sqrt_machine_eps()) {
                                curvature.store(s, y, 0.0);
                            } else if opts.verbose {
                                eprintln!("curvature update skipped: rho below tolerance");
                            }
                        }
                    }
                }
                PairStrategy::Fisher => {
                    w.scaled_add(-params.alpha, &direction);
                    fisher.push(g.clone());
                    average_sum += &w;
                    inner_steps += 1;
                    if inner_steps % period == 0 {
                        let w_avg = &average_sum / period as f64;
                        average_sum.fill(0.0);
                        let monitor_set = monitor.as_slice();
                        match prev_average.take() {
                            None => prev_average = Some(w_avg),
                            Some(w_prev) => {
                                let f_new = match stochastic_loss(problem, &w_avg, monitor_set) {
                                    Ok(value) => value,
                                    Err(OptError::DivergedLoss { .. }) => {
                                        return Ok(TrialOutcome::Diverged { epoch });
                                    }
                                    Err(e) => return Err(e),
                                };
                                let f_prev = match stochastic_loss(problem, &w_prev, monitor_set) {
                                    Ok(value) => value,
                                    Err(OptError::DivergedLoss { .. }) => {
                                        return Ok(TrialOutcome::Diverged { epoch });
                                    }
                                    Err(e) => return Err(e),
                                };
                                if f_new > MONITOR_GROWTH_TOL * f_prev {
                                    // Curvature estimate diverged: drop it,
                                    // roll back to the last accepted average.
                                    if opts.verbose {
                                        eprintln!(
                                            "monitoring loss grew ({f_new:.6e} > {f_prev:.6e}); \
                                             resetting curvature and rolling back"
                                        );
                                    }
                                    curvature.reset();
                                    w = w_prev.clone();
                                    prev_average = Some(w_prev);
                                } else {
                                    let s = &w_avg - &w_prev;
                                    if let Some(y) = fisher.curvature_product(&s) {
                                        if sufficient_curvature(&s, &y, ADAQN_RHO_TOL) {
                                            curvature.store(s, y, 0.0);
                                        }
                                    }
                                    prev_average = Some(w_avg);
                                }
                            }
                        }
                    }
                }
            }
            loss_sum += loss;
        }
        let epoch_loss = loss_sum / batches as f64;
        if !epoch_loss.is_finite() {
            return Ok(TrialOutcome::Diverged { epoch });
        }
        fhist.push(epoch_loss);
        if opts.verbose {
            eprintln!("epoch {}/{}: avg loss = {:.6e}", epoch + 1, opts.epochs, epoch_loss);
        }
    }
    Ok(TrialOutcome::Finished(TrialRecord { fhist, params: *params, w_star: w }))
}

/// Evaluate the averaged stochastic loss on a batch and reject
/// non-finite values as typed divergence.
fn stochastic_loss<P: Objective>(problem: &P, w: &Weights, batch: &[usize]) -> OptResult<f64> {
    let value = problem.value(w, Some(batch))?;
    validate_loss(value)?;
    Ok(value)
}

/// Store a pair, routing through the Powell blend when damping is on.
///
/// A `DegenerateCurvaturePair` from the blend downgrades to a skipped
/// update (with a diagnostic under verbose); any other error propagates.
fn store_with_damping(
    curvature: &mut CurvatureState, config: &MethodConfig, opts: &SQNOptions, s: Weights, y: Grad,
    delta: f64,
) -> OptResult<()> {
    if config.damping {
        let hy = curvature.hv_product(&y);
        match powell_damp(&s, &y, &hy) {
            Ok(damped) => {
                curvature.store(damped.r, y, delta);
            }
            Err(OptError::DegenerateCurvaturePair { .. }) => {
                if opts.verbose {
                    eprintln!("curvature update skipped: degenerate damping denominator");
                }
            }
            Err(e) => return Err(e),
        }
    } else {
        curvature.store(s, y, delta);
    }
    Ok(())
}

/// Number of batches per epoch for a dataset of `m` samples.
///
/// One epoch is a full pass-equivalent measured in evaluation cost: the
/// gradient batch plus, for the periodic disciplines, the amortized
/// Hessian/monitoring batch divided by the update period.
fn batches_per_epoch(m: usize, strategy: PairStrategy, opts: &SQNOptions, period: usize) -> usize {
    let cost = match strategy {
        PairStrategy::GradientDifference => opts.batch_size as f64,
        PairStrategy::HessianVector => {
            opts.batch_size as f64 + opts.batch_size_hess as f64 / period as f64
        }
        PairStrategy::Fisher => {
            opts.batch_size as f64 + opts.batch_size_fun as f64 / period as f64
        }
    };
    ((m as f64 / cost).floor() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::sqn::traits::{InitMethod, Method, SQNOptions};
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Trial completion and loss decrease for each discipline on a
    //   deterministic quadratic objective.
    // - Typed divergence when the objective produces non-finite losses.
    // - The batches-per-epoch accounting.
    //
    // They intentionally DO NOT cover:
    // - Best-of-N selection across trials (tuner tests).
    // - Real datasets; the problems module has its own coverage.
    // -------------------------------------------------------------------------

    /// Deterministic quadratic `f_i(w) = 0.5·‖w − t‖²` for every sample.
    struct Quadratic {
        target: Weights,
        samples: usize,
    }

    impl Objective for Quadratic {
        fn num_samples(&self) -> usize {
            self.samples
        }

        fn dim(&self) -> usize {
            self.target.len()
        }

        fn initial_weights(&self) -> Weights {
            Array1::zeros(self.target.len())
        }

        fn value(&self, w: &Weights, _indices: Option<&[usize]>) -> OptResult<f64> {
            let d = w - &self.target;
            Ok(0.5 * d.dot(&d))
        }

        fn grad(&self, w: &Weights, _indices: Option<&[usize]>) -> OptResult<Grad> {
            Ok(w - &self.target)
        }

        fn hess_vec(&self, _w: &Weights, v: &Weights, _indices: Option<&[usize]>) -> OptResult<Grad> {
            Ok(v.clone())
        }
    }

    /// Objective whose loss is NaN everywhere.
    struct AlwaysNan;

    impl Objective for AlwaysNan {
        fn num_samples(&self) -> usize {
            8
        }

        fn dim(&self) -> usize {
            1
        }

        fn initial_weights(&self) -> Weights {
            array![0.0]
        }

        fn value(&self, _w: &Weights, _indices: Option<&[usize]>) -> OptResult<f64> {
            Ok(f64::NAN)
        }

        fn grad(&self, _w: &Weights, _indices: Option<&[usize]>) -> OptResult<Grad> {
            Ok(array![0.0])
        }

        fn hess_vec(
            &self, _w: &Weights, v: &Weights, _indices: Option<&[usize]>,
        ) -> OptResult<Grad> {
            Ok(v.clone())
        }
    }

    fn quadratic() -> Quadratic {
        Quadratic { target: array![1.0_f64, -1.0], samples: 40 }
    }

    fn small_opts(method: Method) -> SQNOptions {
        let mut opts = SQNOptions::new(method);
        opts.epochs = 10;
        opts.batch_size = 10;
        opts.batch_size_hess = 10;
        opts.batch_size_fun = 10;
        opts.fisher_memory = 20;
        opts
    }

    #[test]
    // Purpose
    // -------
    // Verify that a gradient-differencing trial finishes on the quadratic
    // and contracts the loss.
    //
    // Given
    // -----
    // - oLBFGS-style config (limited memory, no damping) with α = 0.1.
    //
    // Expect
    // ------
    // - `Finished` with one loss per epoch and a final loss well below
    //   the first.
    fn gradient_differencing_trial_contracts_quadratic_loss() {
        // Arrange
        let problem = quadratic();
        let opts = small_opts(Method::Olbfgs);
        let config = MethodConfig {
            strategy: PairStrategy::GradientDifference,
            damping: false,
            regularization: false,
            memory: MemoryMode::Limited(10),
            init: InitMethod::Bb,
        };
        let params = TunedParams { alpha: 0.1, update_period: 1, delta: 0.0 };

        // Act
        let outcome = run_trial(&problem, &config, &opts, &params, 42).unwrap();

        // Assert
        match outcome {
            TrialOutcome::Finished(record) => {
                assert_eq!(record.fhist.len(), opts.epochs);
                assert!(record.final_loss() < 0.1 * record.fhist[0]);
            }
            other => panic!("expected Finished, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that the damped dense path (D-oBFGS-style) also finishes and
    // contracts the loss, exercising the Powell blend and CG solve.
    //
    // Given
    // -----
    // - Full-memory config with damping, α = 0.1.
    //
    // Expect
    // ------
    // - `Finished` with a decreasing loss history.
    fn damped_dense_trial_contracts_quadratic_loss() {
        // Arrange
        let problem = quadratic();
        let opts = small_opts(Method::DObfgs);
        let config = MethodConfig {
            strategy: PairStrategy::GradientDifference,
            damping: true,
            regularization: false,
            memory: MemoryMode::Full,
            init: InitMethod::Bb,
        };
        let params = TunedParams { alpha: 0.1, update_period: 1, delta: 0.0 };

        // Act
        let outcome = run_trial(&problem, &config, &opts, &params, 42).unwrap();

        // Assert
        match outcome {
            TrialOutcome::Finished(record) => {
                assert!(record.final_loss() < record.fhist[0]);
            }
            other => panic!("expected Finished, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that the Hessian-vector discipline (SQN-style) finishes and
    // contracts the loss with periodic curvature updates.
    //
    // Given
    // -----
    // - Limited memory, no damping, α = 0.1, L = 5.
    //
    // Expect
    // ------
    // - `Finished` with a final loss below the first epoch's.
    fn hessian_vector_trial_contracts_quadratic_loss() {
        // Arrange
        let problem = quadratic();
        let opts = small_opts(Method::Sqn);
        let config = MethodConfig {
            strategy: PairStrategy::HessianVector,
            damping: false,
            regularization: false,
            memory: MemoryMode::Limited(10),
            init: InitMethod::Bb,
        };
        let params = TunedParams { alpha: 0.1, update_period: 5, delta: 0.0 };

        // Act
        let outcome = run_trial(&problem, &config, &opts, &params, 7).unwrap();

        // Assert
        match outcome {
            TrialOutcome::Finished(record) => {
                assert_eq!(record.fhist.len(), opts.epochs);
                assert!(record.final_loss() < record.fhist[0]);
            }
            other => panic!("expected Finished, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that the Fisher discipline (adaQN-style) finishes on the
    // quadratic and does not increase the loss.
    //
    // Given
    // -----
    // - Limited memory with RMS initialization, α = 0.05, L = 4.
    //
    // Expect
    // ------
    // - `Finished` with one loss per epoch and a final loss below the
    //   first epoch's.
    fn fisher_trial_contracts_quadratic_loss() {
        // Arrange
        let problem = quadratic();
        let opts = small_opts(Method::AdaQn);
        let config = MethodConfig {
            strategy: PairStrategy::Fisher,
            damping: false,
            regularization: false,
            memory: MemoryMode::Limited(10),
            init: InitMethod::Rms,
        };
        let params = TunedParams { alpha: 0.05, update_period: 4, delta: 0.0 };

        // Act
        let outcome = run_trial(&problem, &config, &opts, &params, 11).unwrap();

        // Assert
        match outcome {
            TrialOutcome::Finished(record) => {
                assert_eq!(record.fhist.len(), opts.epochs);
                assert!(record.final_loss() < record.fhist[0]);
            }
            other => panic!("expected Finished, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that a NaN loss aborts the trial as a typed divergence in
    // the epoch where it appears.
    //
    // Given
    // -----
    // - An objective returning NaN losses from the first batch.
    //
    // Expect
    // ------
    // - `Ok(TrialOutcome::Diverged { epoch: 0 })`, not an `Err`.
    fn nan_loss_diverges_the_trial_in_epoch_zero() {
        // Arrange
        let problem = AlwaysNan;
        let opts = small_opts(Method::Olbfgs);
        let config = MethodConfig {
            strategy: PairStrategy::GradientDifference,
            damping: false,
            regularization: false,
            memory: MemoryMode::Limited(5),
            init: InitMethod::Bb,
        };
        let params = TunedParams { alpha: 0.1, update_period: 1, delta: 0.0 };

        // Act
        let outcome = run_trial(&problem, &config, &opts, &params, 42).unwrap();

        // Assert
        assert_eq!(outcome, TrialOutcome::Diverged { epoch: 0 });
    }

    #[test]
    // Purpose
    // -------
    // Verify the per-epoch batch accounting for each discipline.
    //
    // Given
    // -----
    // - m = 100, batch_size = 20, batch_size_hess = batch_size_fun = 100,
    //   period L = 5.
    //
    // Expect
    // ------
    // - Gradient differencing: floor(100/20) = 5.
    // - Hessian-vector and Fisher: floor(100/(20 + 100/5)) = 2.
    // - The count never drops below 1.
    fn batches_per_epoch_matches_the_cost_model() {
        // Arrange
        let opts = SQNOptions::new(Method::Sqn);

        // Act + Assert
        assert_eq!(batches_per_epoch(100, PairStrategy::GradientDifference, &opts, 5), 5);
        assert_eq!(batches_per_epoch(100, PairStrategy::HessianVector, &opts, 5), 2);
        assert_eq!(batches_per_epoch(100, PairStrategy::Fisher, &opts, 5), 2);
        assert_eq!(batches_per_epoch(3, PairStrategy::GradientDifference, &opts, 1), 1);
    }
}
