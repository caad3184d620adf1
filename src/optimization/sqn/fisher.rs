//! sqn::fisher — sliding window of stochastic gradients (adaQN).
//!
//! Purpose
//! -------
//! Hold the most recent stochastic gradients in a bounded FIFO and apply
//! them as a low-rank Gauss–Newton/Fisher curvature proxy: with the
//! window `F = [g_1 … g_k]`, the curvature action on a step `s` is
//! `F·(Fᵀ·s) = Σ_k g_k (g_k·s)`, computed without ever materializing the
//! `n×n` product.
//!
//! Invariants & assumptions
//! ------------------------
//! - The window never exceeds its capacity; pushing into a full window
//!   evicts the oldest gradient first.
//! - All stored gradients share one dimension; the caller feeds gradients
//!   from a single trial only.
use crate::optimization::sqn::types::{Grad, Weights};
use ndarray::Array1;
use std::collections::VecDeque;

/// Bounded FIFO of recent stochastic gradients.
#[derive(Debug, Clone)]
pub struct FisherAccumulator {
    capacity: usize,
    window: VecDeque<Grad>,
}

impl FisherAccumulator {
    /// Create an empty window holding at most `capacity` gradients.
    pub fn new(capacity: usize) -> Self {
        FisherAccumulator { capacity, window: VecDeque::with_capacity(capacity) }
    }

    /// Number of gradients currently held.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Append a gradient, evicting the oldest when full.
    pub fn push(&mut self, g: Grad) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(g);
    }

    /// Apply the low-rank curvature proxy to a step:
    /// `y = Σ_k g_k (g_k·s)`.
    ///
    /// Returns `None` when the window is empty (no curvature information
    /// yet); callers skip the update for that period.
    pub fn curvature_product(&self, s: &Weights) -> Option<Grad> {
        if self.window.is_empty() {
            return None;
        }
        let mut y = Array1::zeros(s.len());
        for g in &self.window {
            let weight = g.dot(s);
            y.scaled_add(weight, g);
        }
        Some(y)
    }
}
