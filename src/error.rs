//! Error taxonomy for matrix operations
//!
//! Every failure is tagged with one of four kinds. Callers never see more
//! than the kind and the message: the HTTP boundary maps all of them to the
//! same client-error response.

use crate::matrix::Shape;
use crate::ops::Operation;

/// Coarse classification of a [`MatrixError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Too few matrices supplied to a set operation
    Arity,
    /// Unequal, ragged or non-square shapes
    ShapeMismatch,
    /// Missing matrix or matrices
    EmptyInput,
    /// Singular matrix, numerical failure or malformed numeric data
    Computation,
}

/// Errors raised while validating or computing a matrix operation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatrixError {
    #[error("at least two matrices are required for the {operation}")]
    TooFewMatrices { operation: Operation, found: usize },

    #[error("the matrices must have the same dimensions for the {operation} (expected {expected}, found {found} at position {index})")]
    ShapeMismatch {
        operation: Operation,
        index: usize,
        expected: Shape,
        found: Shape,
    },

    #[error("the number of columns of the first matrix ({left}) must equal the number of rows of the second matrix ({right}) for the {operation}")]
    NotConformable {
        operation: Operation,
        left: Shape,
        right: Shape,
    },

    #[error("matrix at position {index} is not rectangular or has no entries, required for the {operation}")]
    MalformedMember { operation: Operation, index: usize },

    #[error("a matrix is required for the {operation}")]
    EmptyInput { operation: Operation },

    #[error("the matrix must be square for the {operation}")]
    NotSquare { operation: Operation },

    #[error("singular matrix: {0}")]
    Singular(String),

    #[error("eigenvalue iteration did not converge after {0} iterations")]
    NoConvergence(usize),

    #[error("result of the {operation} contains a value that is not a finite number")]
    NonFinite { operation: Operation },

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("computation aborted: {0}")]
    Aborted(String),
}

impl MatrixError {
    /// The taxonomy tag of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MatrixError::TooFewMatrices { .. } => ErrorKind::Arity,
            MatrixError::ShapeMismatch { .. }
            | MatrixError::NotConformable { .. }
            | MatrixError::MalformedMember { .. }
            | MatrixError::NotSquare { .. } => ErrorKind::ShapeMismatch,
            MatrixError::EmptyInput { .. } => ErrorKind::EmptyInput,
            MatrixError::Singular(_)
            | MatrixError::NoConvergence(_)
            | MatrixError::NonFinite { .. }
            | MatrixError::InvalidBody(_)
            | MatrixError::Aborted(_) => ErrorKind::Computation,
        }
    }

    /// True for failures detected before any numeric work
    pub fn is_validation(&self) -> bool {
        self.kind() != ErrorKind::Computation
    }
}

impl From<serde_json::Error> for MatrixError {
    fn from(e: serde_json::Error) -> Self {
        MatrixError::InvalidBody(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let arity = MatrixError::TooFewMatrices { operation: Operation::Sum, found: 1 };
        assert_eq!(arity.kind(), ErrorKind::Arity);
        assert!(arity.is_validation());

        let square = MatrixError::NotSquare { operation: Operation::Determinant };
        assert_eq!(square.kind(), ErrorKind::ShapeMismatch);

        let singular = MatrixError::Singular("P".to_string());
        assert_eq!(singular.kind(), ErrorKind::Computation);
        assert!(!singular.is_validation());
    }

    #[test]
    fn test_messages_name_the_operation() {
        let sum = MatrixError::TooFewMatrices { operation: Operation::Sum, found: 0 };
        let product = MatrixError::TooFewMatrices { operation: Operation::Product, found: 0 };
        assert_eq!(sum.to_string(), "at least two matrices are required for the sum");
        assert_ne!(sum.to_string(), product.to_string());

        let det = MatrixError::NotSquare { operation: Operation::Determinant };
        let diag = MatrixError::NotSquare { operation: Operation::Diagonalization };
        assert!(det.to_string().contains("determinant"));
        assert!(diag.to_string().contains("diagonalization"));
    }

    #[test]
    fn test_json_error_is_invalid_body() {
        let err: MatrixError = serde_json::from_str::<Vec<f64>>("[1, \"x\"]").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::Computation);
        assert!(err.to_string().starts_with("invalid request body"));
    }
}
