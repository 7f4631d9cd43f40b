//! Element-wise sum, matrix product and determinant
//!
//! Inputs are already validated: sets hold at least two matrices and
//! determinants receive square matrices.

use crate::matrix::{Matrix, MatrixSet};
use nalgebra::DMatrix;

/// Element-wise sum of every matrix in the set
pub fn sum(set: &MatrixSet) -> DMatrix<f64> {
    let mut iter = set.iter();
    let mut acc = iter
        .next()
        .map(|m| m.as_dmatrix().clone())
        .unwrap_or_else(|| DMatrix::zeros(0, 0));
    for m in iter {
        acc += m.as_dmatrix();
    }
    acc
}

/// Product of the first two matrices of the set; any further matrices are ignored
pub fn product(set: &MatrixSet) -> DMatrix<f64> {
    match (set.get(0), set.get(1)) {
        (Some(a), Some(b)) => a.as_dmatrix() * b.as_dmatrix(),
        (Some(a), None) => a.as_dmatrix().clone(),
        _ => DMatrix::zeros(0, 0),
    }
}

/// Determinant of a square matrix
///
/// nalgebra uses closed forms up to 3x3 and an LU decomposition with partial
/// pivoting beyond that.
pub fn determinant(m: &Matrix) -> f64 {
    m.as_dmatrix().determinant()
}
