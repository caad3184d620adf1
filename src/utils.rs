//! Shared numeric helpers used across the optimizer and problem layers.
//!
//! Small, allocation-free utilities that several modules need but that do
//! not belong to any single component: Euclidean norms over `ndarray`
//! vectors.

use ndarray::Array1;

/// Euclidean (L2) norm of a vector.
///
/// Returns `sqrt(v · v)`. An empty vector has norm 0.
pub fn l2_norm(v: &Array1<f64>) -> f64 {
    v.dot(v).sqrt()
}
