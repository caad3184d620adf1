//! High-level entry point for fitting a problem with a named method.
//!
//! This validates the options, resolves the method name into its
//! (strategy, damping, regularization, memory, initializer) configuration
//! — auto-correcting conflicting requests with a warning — and delegates
//! the run to the tuner.
use crate::optimization::{
    errors::{OptError, OptResult},
    problem::Objective,
    sqn::{
        traits::{FitOutcome, InitMethod, MemoryMode, Method, MethodConfig, SQNOptions},
        tuner::tune,
        types::DEFAULT_MEMORY,
        validation::verify_options,
    },
};

/// Minimize a finite-sum objective with the configured method.
///
/// # Behavior
/// - Validates the options via `verify_options` and rejects empty
///   problems.
/// - Validates the starting point via `problem.check(w0)`.
/// - Resolves the method into a [`MethodConfig`] with
///   [`resolve_config`], warning on corrected conflicts.
/// - Delegates to the tuner, which runs one trial when hyperparameters
///   are supplied and a randomized search otherwise.
///
/// # Parameters
/// - `problem`: your model implementing
///   [`Objective`](crate::optimization::problem::Objective).
/// - `opts`: run configuration (method, epochs, batch sizes,
///   hyperparameters, seeding).
///
/// # Errors
/// - Any `Invalid*` option error from validation.
/// - Any error from `problem.check`.
/// - [`OptError::AllTrialsDiverged`] when no tuning trial finishes.
///
/// # Returns
/// A [`FitOutcome`] with the per-epoch loss history, the hyperparameters
/// actually used, and the final iterate.
pub fn minimize<P: Objective>(problem: &P, opts: &SQNOptions) -> OptResult<FitOutcome> {
    verify_options(opts)?;
    if problem.num_samples() == 0 {
        return Err(OptError::EmptyProblem);
    }
    let w0 = problem.initial_weights();
    problem.check(&w0)?;
    let config = resolve_config(opts);
    tune(problem, &config, opts)
}

/// Resolve a method name plus user options into a concrete
/// [`MethodConfig`].
///
/// Pure configuration mapping, no numerical logic. Conflicting requests
/// are corrected rather than rejected, and each correction warns on
/// stderr:
/// - full memory requested for a limited-memory method ⇒ limited with
///   the default pair count;
/// - limited memory requested for a method that maintains the dense
///   matrix ⇒ full;
/// - a BB initializer requested for adaQN ⇒ RMS (an explicit AdaGrad
///   request is honored).
pub fn resolve_config(opts: &SQNOptions) -> MethodConfig {
    let method = opts.method;
    let name = method.canonical_name();

    let memory = if method.requires_full_memory() {
        match opts.memory {
            Some(MemoryMode::Limited(memory)) => {
                eprintln!(
                    "warning: {name} maintains an explicit Hessian approximation; ignoring the \
                     requested {memory}-pair limit"
                );
                MemoryMode::Full
            }
            _ => MemoryMode::Full,
        }
    } else {
        match opts.memory {
            Some(MemoryMode::Limited(memory)) => MemoryMode::Limited(memory),
            Some(MemoryMode::Full) => {
                eprintln!(
                    "warning: {name} is a limited-memory method; using {DEFAULT_MEMORY} pairs \
                     instead of full memory"
                );
                MemoryMode::Limited(DEFAULT_MEMORY)
            }
            None => MemoryMode::Limited(DEFAULT_MEMORY),
        }
    };

    let init = if method == Method::AdaQn {
        match opts.init {
            Some(InitMethod::Adagrad) => InitMethod::Adagrad,
            Some(InitMethod::Bb) => {
                eprintln!("warning: adaQN pairs require a diagonal scaling; using RMS instead of BB");
                InitMethod::Rms
            }
            _ => InitMethod::Rms,
        }
    } else {
        opts.init.unwrap_or(InitMethod::Bb)
    };

    MethodConfig {
        strategy: method.strategy(),
        damping: opts.damping.unwrap_or_else(|| method.default_damping()),
        regularization: opts.regularization.unwrap_or_else(|| method.default_regularization()),
        memory,
        init,
    }
}
