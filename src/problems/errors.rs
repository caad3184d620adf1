/// Result alias for problem-layer operations.
pub type ProblemResult<T> = Result<T, ProblemError>;

/// Errors raised by the bundled objective implementations.
///
/// These convert into
/// [`OptError`](crate::optimization::errors::OptError) at the optimizer
/// boundary, so trait consumers see one error surface.
#[derive(Debug, Clone, PartialEq)]
pub enum ProblemError {
    /// A loss evaluation produced a NaN or infinite value.
    NonFiniteLoss {
        value: f64,
    },

    /// Design matrix / target / weight dimensions do not agree.
    DimMismatch {
        expected: usize,
        found: usize,
    },

    /// A batch index fell outside the dataset.
    IndexOutOfRange {
        index: usize,
        len: usize,
    },

    /// The dataset (or a requested batch) holds no rows.
    EmptyData,

    /// A classification label was not ±1.
    InvalidLabel {
        index: usize,
        value: f64,
    },

    /// A design-matrix or target entry was NaN or infinite.
    NonFiniteData {
        row: usize,
        value: f64,
    },
}

impl std::error::Error for ProblemError {}

impl std::fmt::Display for ProblemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemError::NonFiniteLoss { value } => {
                write!(f, "Loss evaluation produced a non-finite value: {value}")
            }
            ProblemError::DimMismatch { expected, found } => {
                write!(f, "Dimension mismatch: expected {expected}, found {found}")
            }
            ProblemError::IndexOutOfRange { index, len } => {
                write!(f, "Batch index {index} out of range for {len} samples")
            }
            ProblemError::EmptyData => {
                write!(f, "Dataset holds no rows")
            }
            ProblemError::InvalidLabel { index, value } => {
                write!(f, "Invalid label at row {index}: {value}, must be -1 or +1")
            }
            ProblemError::NonFiniteData { row, value } => {
                write!(f, "Non-finite data entry at row {row}: {value}")
            }
        }
    }
}
