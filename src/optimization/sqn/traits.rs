//! Public API surface for stochastic quasi-Newton minimization.
//!
//! - [`Method`]: the eleven supported SQN variants, parseable from their
//!   literature names.
//! - [`InitMethod`] and [`MemoryMode`]: inverse-Hessian initialization and
//!   curvature storage choices.
//! - [`SQNOptions`]: per-run configuration with validated numeric fields.
//! - [`MethodConfig`]: the resolved (strategy, damping, regularization,
//!   memory, initializer) bundle a method name maps to.
//! - [`TunedParams`] and [`FitOutcome`]: the hyperparameters a trial ran
//!   with and the normalized result returned by the high-level `minimize`
//!   API.
//!
//! Convention: we minimize the finite-sum average `f(w) = (1/m) Σ f_i(w)`;
//! all reported losses are epoch averages of stochastic batch losses.
use crate::optimization::{
    errors::{OptError, OptResult},
    sqn::{
        logger::TrialRecord,
        types::{
            DEFAULT_BATCH_SIZE, DEFAULT_BATCH_SIZE_FUN, DEFAULT_BATCH_SIZE_HESS, DEFAULT_EPOCHS,
            DEFAULT_FISHER_MEMORY, DEFAULT_SEED, DEFAULT_TUNING_STEPS, Weights,
        },
        validation::validate_w_star,
    },
};
use std::str::FromStr;

/// The supported stochastic quasi-Newton methods.
///
/// Variants map one-to-one onto the literature names accepted by
/// [`Method::from_str`] (case-insensitive): `SQN`, `DSQN`, `oBFGS`,
/// `oLBFGS`, `D-oBFGS`, `D-oLBFGS`, `RES`, `L-RES`, `SDBFGS`, `L-SDBFGS`,
/// and `adaQN`. Unknown names return [`OptError::UnsupportedMethod`]
/// rather than silently defaulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Sqn,
    Dsqn,
    Obfgs,
    Olbfgs,
    DObfgs,
    DOlbfgs,
    Res,
    LRes,
    Sdbfgs,
    LSdbfgs,
    AdaQn,
}

impl Method {
    /// The curvature-pair update discipline this method runs.
    pub fn strategy(&self) -> PairStrategy {
        match self {
            Method::Sqn | Method::Dsqn => PairStrategy::HessianVector,
            Method::AdaQn => PairStrategy::Fisher,
            _ => PairStrategy::GradientDifference,
        }
    }

    /// Whether Powell damping is on by default for this method.
    pub fn default_damping(&self) -> bool {
        matches!(
            self,
            Method::Dsqn | Method::DObfgs | Method::DOlbfgs | Method::Sdbfgs | Method::LSdbfgs
        )
    }

    /// Whether Hessian regularization (`delta`) is on by default.
    pub fn default_regularization(&self) -> bool {
        matches!(self, Method::Res | Method::LRes | Method::Sdbfgs | Method::LSdbfgs)
    }

    /// Whether this method maintains an explicit dense matrix instead of a
    /// limited-memory pair store.
    pub fn requires_full_memory(&self) -> bool {
        matches!(self, Method::Obfgs | Method::DObfgs | Method::Res | Method::Sdbfgs)
    }

    /// Canonical literature name, used in warnings and diagnostics.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Method::Sqn => "SQN",
            Method::Dsqn => "DSQN",
            Method::Obfgs => "oBFGS",
            Method::Olbfgs => "oLBFGS",
            Method::DObfgs => "D-oBFGS",
            Method::DOlbfgs => "D-oLBFGS",
            Method::Res => "RES",
            Method::LRes => "L-RES",
            Method::Sdbfgs => "SDBFGS",
            Method::LSdbfgs => "L-SDBFGS",
            Method::AdaQn => "adaQN",
        }
    }
}

impl FromStr for Method {
    type Err = OptError;

    /// Parse a method name (case-insensitive).
    ///
    /// Accepts the canonical names listed on [`Method`]; any other value
    /// returns [`OptError::UnsupportedMethod`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqn" => Ok(Method::Sqn),
            "dsqn" => Ok(Method::Dsqn),
            "obfgs" => Ok(Method::Obfgs),
            "olbfgs" => Ok(Method::Olbfgs),
            "d-obfgs" => Ok(Method::DObfgs),
            "d-olbfgs" => Ok(Method::DOlbfgs),
            "res" => Ok(Method::Res),
            "l-res" => Ok(Method::LRes),
            "sdbfgs" => Ok(Method::Sdbfgs),
            "l-sdbfgs" => Ok(Method::LSdbfgs),
            "adaqn" => Ok(Method::AdaQn),
            _ => Err(OptError::UnsupportedMethod { name: s.to_string() }),
        }
    }
}

/// How raw curvature pairs are produced.
///
/// Variants:
/// - `HessianVector`: periodic pairs from averaged iterates and a
///   Hessian-vector product on a fresh batch (SQN, DSQN).
/// - `GradientDifference`: per-step pairs from the gradient evaluated
///   twice on the same batch (oBFGS/oLBFGS family, RES, SDBFGS).
/// - `Fisher`: periodic pairs from a sliding window of stochastic
///   gradients applied as a low-rank curvature proxy (adaQN).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairStrategy {
    HessianVector,
    GradientDifference,
    Fisher,
}

impl PairStrategy {
    /// Whether the discipline fires every `update_period` inner steps
    /// (rather than every step).
    pub fn uses_update_period(&self) -> bool {
        matches!(self, PairStrategy::HessianVector | PairStrategy::Fisher)
    }
}

/// Inverse-Hessian initialization used by the two-loop recursion.
///
/// Variants:
/// - `Bb`: Barzilai–Borwein scalar from the most recent pair.
/// - `Adagrad`: per-coordinate `1/sqrt(Σ g²)` scaling.
/// - `Rms`: per-coordinate scaling from an exponential moving average of
///   `g²`.
///
/// Parsing: implements `FromStr` over the case-insensitive names `"BB"`,
/// `"ADAGRAD"`, `"RMS"`; unknown names return
/// [`OptError::InvalidInitMethod`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitMethod {
    Bb,
    Adagrad,
    Rms,
}

impl FromStr for InitMethod {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bb" => Ok(InitMethod::Bb),
            "adagrad" => Ok(InitMethod::Adagrad),
            "rms" => Ok(InitMethod::Rms),
            _ => Err(OptError::InvalidInitMethod {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'BB', 'ADAGRAD', or 'RMS'.",
            }),
        }
    }
}

/// Curvature storage mode.
///
/// `Limited(m)` keeps the most recent `m` pairs in a ring buffer and
/// applies them via the two-loop recursion; `Full` maintains an explicit
/// dense matrix updated by rank-2 corrections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryMode {
    Limited(usize),
    Full,
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `method: Method` — which SQN variant to run.
/// - `epochs` — number of dataset pass-equivalents per trial (> 0).
/// - `batch_size` / `batch_size_hess` / `batch_size_fun` — gradient,
///   Hessian-vector, and monitoring batch sizes (> 0).
/// - `memory: Option<MemoryMode>` — curvature storage override; `None`
///   follows the method (dense for oBFGS/D-oBFGS/RES/SDBFGS, 20 pairs
///   otherwise). Conflicting requests are auto-corrected with a warning.
/// - `fisher_memory` — adaQN gradient window capacity (> 0).
/// - `damping` / `regularization: Option<bool>` — overrides for the
///   method-derived flags.
/// - `init: Option<InitMethod>` — inverse-Hessian initializer; `None`
///   means BB, except adaQN which runs RMS unless AdaGrad is requested
///   explicitly.
/// - `alpha` / `update_period` / `delta` — step size, curvature update
///   period `L`, and regularization constant. Leaving any that the method
///   consumes as `None` switches on randomized tuning.
/// - `tuning_steps` — number of randomized trials when tuning (> 0,
///   default 10).
/// - `verbose` — per-epoch and per-trial progress on stderr.
/// - `seed: Option<u64>` — RNG seed; `Some` yields reproducible runs,
///   `None` delegates to system entropy. Defaults to `Some(42)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SQNOptions {
    pub method: Method,
    pub epochs: usize,
    pub batch_size: usize,
    pub batch_size_hess: usize,
    pub batch_size_fun: usize,
    pub memory: Option<MemoryMode>,
    pub fisher_memory: usize,
    pub damping: Option<bool>,
    pub regularization: Option<bool>,
    pub init: Option<InitMethod>,
    pub alpha: Option<f64>,
    pub update_period: Option<usize>,
    pub delta: Option<f64>,
    pub tuning_steps: usize,
    pub verbose: bool,
    pub seed: Option<u64>,
}

impl SQNOptions {
    /// Build the default configuration for a method.
    ///
    /// All hyperparameters start unset (so a plain `minimize` call tunes
    /// them), batch sizes and window capacities take the documented
    /// defaults, and the seed is the reproducible default.
    pub fn new(method: Method) -> Self {
        SQNOptions {
            method,
            epochs: DEFAULT_EPOCHS,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_size_hess: DEFAULT_BATCH_SIZE_HESS,
            batch_size_fun: DEFAULT_BATCH_SIZE_FUN,
            memory: None,
            fisher_memory: DEFAULT_FISHER_MEMORY,
            damping: None,
            regularization: None,
            init: None,
            alpha: None,
            update_period: None,
            delta: None,
            tuning_steps: DEFAULT_TUNING_STEPS,
            verbose: false,
            seed: Some(DEFAULT_SEED),
        }
    }
}

/// Resolved per-method configuration: the dispatch target of a
/// [`Method`] plus any user overrides, after conflict correction.
///
/// Unlike [`SQNOptions`] this carries no `Option`s; every field is a
/// concrete choice the training loop can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodConfig {
    pub strategy: PairStrategy,
    pub damping: bool,
    pub regularization: bool,
    pub memory: MemoryMode,
    pub init: InitMethod,
}

/// The hyperparameters a single trial actually ran with.
///
/// For methods without a periodic discipline `update_period` is carried
/// as 1; for methods without Hessian regularization `delta` is 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TunedParams {
    pub alpha: f64,
    pub update_period: usize,
    pub delta: f64,
}

/// Canonical result returned by `minimize`.
///
/// - `loss_history`: per-epoch average stochastic losses (length =
///   `epochs`) of the promoted trial.
/// - `hyperparams`: the hyperparameters that trial ran with (supplied or
///   tuned).
/// - `w_star`: final iterate of the promoted trial, validated finite.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOutcome {
    pub loss_history: Vec<f64>,
    pub hyperparams: TunedParams,
    pub w_star: Weights,
}

impl FitOutcome {
    /// Promote a finished trial into the caller-facing outcome.
    ///
    /// Performs a final finiteness check on the fitted weights via
    /// `validate_w_star` before handing them to the caller.
    ///
    /// # Errors
    /// - [`OptError::InvalidWeights`] if any fitted weight is non-finite.
    pub fn from_record(record: TrialRecord) -> OptResult<Self> {
        let w_star = validate_w_star(Some(record.w_star))?;
        Ok(FitOutcome { loss_history: record.fhist, hyperparams: record.params, w_star })
    }
}
