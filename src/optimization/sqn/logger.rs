//! Per-trial training record.
//!
//! Each tuning trial accumulates its own [`TrialRecord`]: the per-epoch
//! average losses, the hyperparameters the trial ran with, and the final
//! iterate. Records are created fresh per trial; only the best-scoring
//! one is promoted to the caller (as a
//! [`FitOutcome`](crate::optimization::sqn::traits::FitOutcome)), the
//! rest are dropped.
use crate::optimization::sqn::{traits::TunedParams, types::Weights};

/// Loss history, hyperparameters, and final iterate of one finished trial.
///
/// Invariant: `fhist` is non-empty for any finished trial (the epoch loop
/// runs at least once), so [`TrialRecord::final_loss`] is total.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialRecord {
    /// Per-epoch average stochastic losses, in epoch order.
    pub fhist: Vec<f64>,
    /// Hyperparameters this trial ran with.
    pub params: TunedParams,
    /// Final iterate reached by the trial.
    pub w_star: Weights,
}

impl TrialRecord {
    /// The final-epoch average loss, the trial's tuning score.
    pub fn final_loss(&self) -> f64 {
        *self.fhist.last().expect("finished trials record at least one epoch")
    }
}
