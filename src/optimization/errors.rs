use crate::problems::errors::ProblemError;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Numerical divergence ----
    /// A loss evaluation produced a non-finite value; the affected trial is
    /// abandoned, not the whole run.
    DivergedLoss {
        value: f64,
    },

    /// Every tuning trial diverged; nothing could be promoted to the caller.
    AllTrialsDiverged {
        trials: usize,
    },

    /// A curvature computation hit a near-zero or non-finite denominator.
    /// Callers skip the offending update instead of propagating a NaN/Inf
    /// direction.
    DegenerateCurvaturePair {
        numerator: f64,
        denominator: f64,
        reason: &'static str,
    },

    // ---- Method dispatch ----
    /// Unknown method name with no declared curvature-pair strategy.
    UnsupportedMethod {
        name: String,
    },

    /// Invalid inverse-Hessian initializer name.
    InvalidInitMethod {
        name: String,
        reason: &'static str,
    },

    // ---- Options ----
    /// Epoch count must be positive.
    InvalidEpochs {
        epochs: usize,
        reason: &'static str,
    },

    /// A batch-size option must be positive.
    InvalidBatchSize {
        name: &'static str,
        size: usize,
        reason: &'static str,
    },

    /// Step size must be finite and strictly positive.
    InvalidStepSize {
        alpha: f64,
        reason: &'static str,
    },

    /// Curvature update period must be at least 1.
    InvalidUpdatePeriod {
        period: usize,
        reason: &'static str,
    },

    /// Regularization constant must be finite and non-negative.
    InvalidRegularization {
        delta: f64,
        reason: &'static str,
    },

    /// Limited curvature memory must hold at least one pair.
    InvalidMemory {
        memory: usize,
        reason: &'static str,
    },

    /// Fisher window must hold at least one gradient.
    InvalidFisherMemory {
        memory: usize,
        reason: &'static str,
    },

    /// Tuning step count must be positive.
    InvalidTuningSteps {
        steps: usize,
        reason: &'static str,
    },

    // ---- Gradients / iterates ----
    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Gradient elements need to be finite.
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Fitted weights must be finite before promotion.
    InvalidWeights {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// No fitted weights were produced.
    MissingWeights,

    // ---- Problem layer ----
    /// Design matrix / target dimensions do not agree.
    DimMismatch {
        expected: usize,
        found: usize,
    },

    /// A batch index fell outside the dataset.
    IndexOutOfRange {
        index: usize,
        len: usize,
    },

    /// The problem holds no samples.
    EmptyProblem,

    /// A classification label was not ±1.
    InvalidLabel {
        index: usize,
        value: f64,
    },

    /// A data entry was NaN or infinite.
    NonFiniteData {
        row: usize,
        value: f64,
    },
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Numerical divergence ----
            OptError::DivergedLoss { value } => {
                write!(f, "Loss evaluation diverged to a non-finite value: {value}")
            }
            OptError::AllTrialsDiverged { trials } => {
                write!(
                    f,
                    "All {trials} tuning trials diverged; increase tuning_steps, change the \
                     seed, or supply hyperparameters manually"
                )
            }
            OptError::DegenerateCurvaturePair { numerator, denominator, reason } => {
                write!(
                    f,
                    "Degenerate curvature pair ({numerator} / {denominator}): {reason}"
                )
            }

            // ---- Method dispatch ----
            OptError::UnsupportedMethod { name } => {
                write!(f, "Method '{name}' has no curvature-pair update strategy implemented")
            }
            OptError::InvalidInitMethod { name, reason } => {
                write!(f, "Invalid initializer '{name}': {reason}")
            }

            // ---- Options ----
            OptError::InvalidEpochs { epochs, reason } => {
                write!(f, "Invalid epoch count {epochs}: {reason}")
            }
            OptError::InvalidBatchSize { name, size, reason } => {
                write!(f, "Invalid {name} {size}: {reason}")
            }
            OptError::InvalidStepSize { alpha, reason } => {
                write!(f, "Invalid step size {alpha}: {reason}")
            }
            OptError::InvalidUpdatePeriod { period, reason } => {
                write!(f, "Invalid curvature update period {period}: {reason}")
            }
            OptError::InvalidRegularization { delta, reason } => {
                write!(f, "Invalid regularization constant {delta}: {reason}")
            }
            OptError::InvalidMemory { memory, reason } => {
                write!(f, "Invalid curvature memory {memory}: {reason}")
            }
            OptError::InvalidFisherMemory { memory, reason } => {
                write!(f, "Invalid Fisher memory {memory}: {reason}")
            }
            OptError::InvalidTuningSteps { steps, reason } => {
                write!(f, "Invalid tuning step count {steps}: {reason}")
            }

            // ---- Gradients / iterates ----
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }
            OptError::InvalidWeights { index, value, reason } => {
                write!(f, "Invalid fitted weight at index {index}: {value}: {reason}")
            }
            OptError::MissingWeights => {
                write!(f, "Missing fitted weights")
            }

            // ---- Problem layer ----
            OptError::DimMismatch { expected, found } => {
                write!(f, "Dimension mismatch: expected {expected}, found {found}")
            }
            OptError::IndexOutOfRange { index, len } => {
                write!(f, "Batch index {index} out of range for {len} samples")
            }
            OptError::EmptyProblem => {
                write!(f, "Problem holds no samples")
            }
            OptError::InvalidLabel { index, value } => {
                write!(f, "Invalid label at row {index}: {value}, must be -1 or +1")
            }
            OptError::NonFiniteData { row, value } => {
                write!(f, "Non-finite data entry at row {row}: {value}")
            }
        }
    }
}

impl From<ProblemError> for OptError {
    fn from(err: ProblemError) -> Self {
        match err {
            ProblemError::NonFiniteLoss { value } => OptError::DivergedLoss { value },
            ProblemError::DimMismatch { expected, found } => {
                OptError::DimMismatch { expected, found }
            }
            ProblemError::IndexOutOfRange { index, len } => {
                OptError::IndexOutOfRange { index, len }
            }
            ProblemError::EmptyData => OptError::EmptyProblem,
            ProblemError::InvalidLabel { index, value } => OptError::InvalidLabel { index, value },
            ProblemError::NonFiniteData { row, value } => OptError::NonFiniteData { row, value },
        }
    }
}
