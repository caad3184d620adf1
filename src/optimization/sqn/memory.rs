//! sqn::memory — sliding curvature-pair store and two-loop recursion.
//!
//! Purpose
//! -------
//! Own the bounded window of curvature pairs `(s, y)` and the
//! inverse-Hessian initialization state, and turn gradients into
//! quasi-Newton directions via the standard two-loop recursion. This is
//! the shared core behind every limited-memory method in the crate.
//!
//! Key behaviors
//! -------------
//! - Store pairs in a fixed-capacity ring buffer indexed by a write
//!   cursor; when full, the oldest pair is overwritten (strict FIFO).
//! - Apply stored pairs newest→oldest then oldest→newest around an
//!   initial scaling chosen by [`InitMethod`]: a Barzilai–Borwein scalar
//!   from the newest pair, or per-coordinate AdaGrad/RMS scalings built
//!   from running `g²` accumulators.
//! - `reset` drops the pairs but keeps the accumulators, matching the
//!   adaQN rollback semantics.
//!
//! Invariants & assumptions
//! ------------------------
//! - `len() ≤ capacity()` at all times; pair `0` is always the oldest.
//! - All stored vectors share the dimension fixed at construction;
//!   callers store only pairs that passed their discipline's acceptance
//!   test.
//! - With no pairs and BB initialization, `two_loop` is the identity.
//! - Pairs whose inner product `s·y` falls under the curvature guard are
//!   passed over inside the recursion rather than amplifying round-off.
//!
//! Conventions
//! -----------
//! - The `g²` accumulators are refreshed on every `two_loop` call only
//!   for the BB and RMS lineages; the AdaGrad branch reads
//!   `adagrad_sum` as accumulated so far. This mirrors the behavior of
//!   the methods as published and is deliberately left untouched.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the empty-memory identity, FIFO eviction order,
//!   reset semantics, and hand-checked two-loop output for a single
//!   stored pair.
use crate::optimization::sqn::{
    traits::InitMethod,
    types::{sqrt_machine_eps, Grad, Weights, CURVATURE_DOT_GUARD},
};
use ndarray::Array1;

/// Bounded FIFO store of curvature pairs plus H0 initialization state.
#[derive(Debug, Clone)]
pub struct CurvatureMemory {
    capacity: usize,
    /// Slot that receives the next stored pair.
    head: usize,
    len: usize,
    s_slots: Vec<Weights>,
    y_slots: Vec<Weights>,
    init: InitMethod,
    adagrad_sum: Array1<f64>,
    rms_sum: Array1<f64>,
}

impl CurvatureMemory {
    /// Create an empty store for vectors of length `dim` holding at most
    /// `capacity` pairs.
    ///
    /// `capacity` must be at least 1; option validation enforces this
    /// before construction.
    pub fn new(dim: usize, capacity: usize, init: InitMethod) -> Self {
        CurvatureMemory {
            capacity,
            head: 0,
            len: 0,
            s_slots: vec![Array1::zeros(dim); capacity],
            y_slots: vec![Array1::zeros(dim); capacity],
            init,
            adagrad_sum: Array1::zeros(dim),
            rms_sum: Array1::zeros(dim),
        }
    }

    /// Number of pairs currently stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the store holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of pairs the store can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all stored pairs. The `g²` accumulators are kept.
    pub fn reset(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Append a pair, evicting the oldest when the store is full.
    ///
    /// Acceptance testing (rho / damping) is the caller's responsibility;
    /// the store takes what it is given.
    pub fn store(&mut self, s: Weights, y: Weights) {
        self.s_slots[self.head] = s;
        self.y_slots[self.head] = y;
        self.head = (self.head + 1) % self.capacity;
        if self.len < self.capacity {
            self.len += 1;
        }
    }

    /// Borrow the `i`-th stored pair, oldest first (`i < len()`).
    pub fn pair(&self, i: usize) -> (&Weights, &Weights) {
        let slot = (self.head + self.capacity - self.len + i) % self.capacity;
        (&self.s_slots[slot], &self.y_slots[slot])
    }

    /// Approximate inverse-Hessian-vector product `H·g` via the two-loop
    /// recursion over the stored pairs.
    ///
    /// The first loop walks pairs newest→oldest accumulating the `α_i`
    /// coefficients, the initial scaling is applied according to the
    /// configured [`InitMethod`], and the second loop walks oldest→newest.
    /// Pairs with `|s·y|` under the curvature guard are skipped in both
    /// loops. With no pairs and BB initialization the input is returned
    /// unchanged.
    pub fn two_loop(&mut self, g: &Grad) -> Grad {
        self.refresh_accumulators(g);

        let k = self.len;
        let mut q = g.clone();
        let mut alphas = vec![0.0_f64; k];
        let mut skipped = vec![false; k];
        for i in (0..k).rev() {
            let (s, y) = self.pair(i);
            let sy = s.dot(y);
            if !sy.is_finite() || sy.abs() <= CURVATURE_DOT_GUARD {
                skipped[i] = true;
                continue;
            }
            let a = s.dot(&q) / sy;
            alphas[i] = a;
            q.scaled_add(-a, y);
        }

        let mut r = self.apply_initial_scaling(q);

        for i in 0..k {
            if skipped[i] {
                continue;
            }
            let (s, y) = self.pair(i);
            let sy = s.dot(y);
            let b = y.dot(&r) / sy;
            r.scaled_add(alphas[i] - b, s);
        }
        r
    }

    /// Scale the intermediate vector by the configured H0.
    fn apply_initial_scaling(&self, q: Grad) -> Grad {
        match self.init {
            InitMethod::Bb => {
                if self.len == 0 {
                    return q;
                }
                let (s, y) = self.pair(self.len - 1);
                let yy = y.dot(y);
                let sy = s.dot(y);
                if yy <= CURVATURE_DOT_GUARD {
                    return q;
                }
                let gamma = sy / yy;
                if !gamma.is_finite() || gamma <= 0.0 {
                    return q;
                }
                q * gamma
            }
            InitMethod::Adagrad => {
                let jitter = sqrt_machine_eps();
                let scale = self.adagrad_sum.mapv(|a| (a + jitter).sqrt());
                q / &scale
            }
            InitMethod::Rms => {
                let jitter = sqrt_machine_eps();
                let scale = self.rms_sum.mapv(|a| (a + jitter).sqrt());
                q / &scale
            }
        }
    }

    /// Refresh the running `g²` accumulators.
    ///
    /// Only the BB and RMS lineages refresh; the AdaGrad branch reads its
    /// accumulator as-is.
    fn refresh_accumulators(&mut self, g: &Grad) {
        if matches!(self.init, InitMethod::Bb | InitMethod::Rms) {
            let g2 = g.mapv(|v| v * v);
            self.adagrad_sum += &g2;
            self.rms_sum *= 0.9;
            self.rms_sum.scaled_add(0.1, &g2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The empty-memory identity under BB initialization.
    // - Strict FIFO eviction and oldest-first indexing in the ring buffer.
    // - Reset semantics (pairs dropped, accumulators kept).
    // - Hand-checked two-loop output for a single stored pair.
    // - RMS/AdaGrad scaling shapes and the accumulator refresh conditional.
    //
    // They intentionally DO NOT cover:
    // - Pair acceptance (rho tests, damping); that is the caller's job and
    //   is tested in `pairs` and `run`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the empty-memory identity: with no pairs and BB
    // initialization, `two_loop(g)` returns `g` unchanged.
    //
    // Given
    // -----
    // - A fresh store with BB initialization and an arbitrary gradient.
    //
    // Expect
    // ------
    // - The output equals the input exactly.
    fn two_loop_on_empty_memory_is_identity_under_bb() {
        // Arrange
        let mut memory = CurvatureMemory::new(3, 5, InitMethod::Bb);
        let g = array![1.0_f64, -2.0, 0.5];

        // Act
        let direction = memory.two_loop(&g);

        // Assert
        assert_eq!(direction, g);
    }

    #[test]
    // Purpose
    // -------
    // Verify strict FIFO eviction: storing `capacity + 1` pairs keeps
    // exactly the most recent `capacity` pairs in oldest-first order.
    //
    // Given
    // -----
    // - A store with capacity 3 and four distinguishable pairs.
    //
    // Expect
    // ------
    // - `len() == 3` and `pair(0..3)` are pairs 2, 3, 4 in that order.
    fn store_evicts_oldest_pair_first() {
        // Arrange
        let mut memory = CurvatureMemory::new(2, 3, InitMethod::Bb);
        for k in 1..=4 {
            let v = k as f64;
            memory.store(array![v, 0.0], array![0.0, v]);
        }

        // Act + Assert
        assert_eq!(memory.len(), 3);
        for i in 0..3 {
            let expected = (i + 2) as f64;
            let (s, y) = memory.pair(i);
            assert_eq!(s[0], expected, "s order broken at {i}");
            assert_eq!(y[1], expected, "y order broken at {i}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that `reset` drops the pairs but keeps the RMS accumulator
    // state, so a post-reset two-loop still uses the accumulated scaling.
    //
    // Given
    // -----
    // - An RMS store that has seen one gradient and holds one pair.
    //
    // Expect
    // ------
    // - After `reset`, `len() == 0` while a further `two_loop` call scales
    //   by a non-trivial (accumulated) RMS denominator rather than the
    //   fresh-store one.
    fn reset_clears_pairs_but_keeps_accumulators() {
        // Arrange
        let mut seen = CurvatureMemory::new(2, 3, InitMethod::Rms);
        let g = array![2.0_f64, 2.0];
        seen.two_loop(&g);
        seen.store(array![1.0, 0.0], array![1.0, 0.0]);

        let mut fresh = CurvatureMemory::new(2, 3, InitMethod::Rms);

        // Act
        seen.reset();
        let after_reset = seen.two_loop(&g);
        let from_fresh = fresh.two_loop(&g);

        // Assert
        assert_eq!(seen.len(), 0);
        // The reset store has accumulated two g² refreshes, the fresh one
        // a single refresh, so their scalings must differ.
        assert!((after_reset[0] - from_fresh[0]).abs() > 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Hand-check the two-loop recursion for a single stored pair on a
    // diagonal problem.
    //
    // Given
    // -----
    // - One pair `s = [1, 0]`, `y = [2, 0]` (BB γ = 1/2) and `g = [2, 4]`.
    //
    // Expect
    // ------
    // - First loop: α = (s·g)/(s·y) = 1, q = g − α·y = [0, 4].
    // - Scaling: r = γ·q = [0, 2].
    // - Second loop: β = (y·r)/(s·y) = 0, r += (α − β)·s = [1, 2].
    fn two_loop_matches_hand_computation_for_single_pair() {
        // Arrange
        let mut memory = CurvatureMemory::new(2, 3, InitMethod::Bb);
        memory.store(array![1.0_f64, 0.0], array![2.0_f64, 0.0]);
        let g = array![2.0_f64, 4.0];

        // Act
        let direction = memory.two_loop(&g);

        // Assert
        assert!((direction[0] - 1.0).abs() < 1e-12);
        assert!((direction[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify that the AdaGrad branch does not refresh its own accumulator:
    // repeated two-loop calls under AdaGrad keep returning the same
    // scaling for the same gradient.
    //
    // Given
    // -----
    // - An AdaGrad store and two identical `two_loop` calls.
    //
    // Expect
    // ------
    // - Both calls return identical output (the accumulator never moved).
    fn adagrad_branch_keeps_its_accumulator_fixed() {
        // Arrange
        let mut memory = CurvatureMemory::new(2, 3, InitMethod::Adagrad);
        let g = array![3.0_f64, -1.0];

        // Act
        let first = memory.two_loop(&g);
        let second = memory.two_loop(&g);

        // Assert
        assert_eq!(first, second);
    }

    #[test]
    // Purpose
    // -------
    // Verify that the RMS scaling shrinks the direction once gradients
    // have been accumulated (denominator grows past the jitter floor).
    //
    // Given
    // -----
    // - An RMS store fed the same gradient twice.
    //
    // Expect
    // ------
    // - The second direction is strictly smaller in magnitude than the
    //   first on every coordinate with non-zero gradient.
    fn rms_scaling_shrinks_as_accumulator_grows() {
        // Arrange
        let mut memory = CurvatureMemory::new(2, 3, InitMethod::Rms);
        let g = array![2.0_f64, -2.0];

        // Act
        let first = memory.two_loop(&g);
        let second = memory.two_loop(&g);

        // Assert
        assert!(second[0].abs() < first[0].abs());
        assert!(second[1].abs() < first[1].abs());
    }
}
