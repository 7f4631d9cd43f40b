//! Dense matrix data model
//!
//! Requests carry matrices as nested rows of numbers. A [`Matrix`] is only
//! built from rows that form a non-empty rectangle, so every operation can
//! rely on a well-formed `DMatrix<f64>` underneath.

pub mod validate;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rows of a matrix exactly as they arrive on the wire
pub type Rows = Vec<Vec<f64>>;

/// Row and column count of a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Why a set of rows cannot form a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowsDefect {
    /// No rows, or rows without entries
    Empty,
    /// Row `row` has `found` entries where `expected` were required
    Ragged { row: usize, expected: usize, found: usize },
}

/// A rectangular matrix with at least one row and one column
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    inner: DMatrix<f64>,
}

impl Matrix {
    /// Build a matrix from wire rows, checking the rectangle invariant
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, RowsDefect> {
        let nrows = rows.len();
        let ncols = rows.first().map(Vec::len).unwrap_or(0);
        if nrows == 0 || ncols == 0 {
            return Err(RowsDefect::Empty);
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
            return Err(RowsDefect::Ragged { row, expected: ncols, found: r.len() });
        }
        let inner = DMatrix::from_fn(nrows, ncols, |i, j| rows[i][j]);
        Ok(Self { inner })
    }

    /// Wrap an existing nalgebra matrix
    pub fn from_dmatrix(inner: DMatrix<f64>) -> Result<Self, RowsDefect> {
        if inner.is_empty() {
            return Err(RowsDefect::Empty);
        }
        Ok(Self { inner })
    }

    pub fn identity(n: usize) -> Result<Self, RowsDefect> {
        Self::from_dmatrix(DMatrix::identity(n, n))
    }

    pub fn shape(&self) -> Shape {
        Shape::new(self.inner.nrows(), self.inner.ncols())
    }

    pub fn is_square(&self) -> bool {
        self.shape().is_square()
    }

    pub fn as_dmatrix(&self) -> &DMatrix<f64> {
        &self.inner
    }

    pub fn into_dmatrix(self) -> DMatrix<f64> {
        self.inner
    }

    /// Rows in row-major order, the inverse of [`Matrix::from_rows`]
    pub fn to_rows(&self) -> Rows {
        self.inner
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }
}

/// Ordered matrices taking part in a sum or product
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixSet {
    matrices: Vec<Matrix>,
}

impl MatrixSet {
    pub fn new(matrices: Vec<Matrix>) -> Self {
        Self { matrices }
    }

    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    pub fn first(&self) -> Option<&Matrix> {
        self.matrices.first()
    }

    pub fn get(&self, index: usize) -> Option<&Matrix> {
        self.matrices.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Matrix> {
        self.matrices.iter()
    }
}
