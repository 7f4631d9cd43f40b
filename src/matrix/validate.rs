//! Shape and arity checks run before any numeric work
//!
//! Set operations need at least two matrices of identical shape. Single
//! matrix operations need one non-empty square matrix.

use super::{Matrix, MatrixSet, Rows, RowsDefect};
use crate::config::ProductShapeRule;
use crate::error::MatrixError;
use crate::ops::Operation;

/// Validate the operands of a sum
pub fn sum_operands(matrices: &[Rows]) -> Result<MatrixSet, MatrixError> {
    let set = collect_set(Operation::Sum, matrices)?;
    require_equal_shapes(Operation::Sum, &set)?;
    Ok(set)
}

/// Validate the operands of a product under the configured shape rule
pub fn product_operands(
    matrices: &[Rows],
    rule: ProductShapeRule,
) -> Result<MatrixSet, MatrixError> {
    let set = collect_set(Operation::Product, matrices)?;
    match rule {
        ProductShapeRule::EqualShapes => require_equal_shapes(Operation::Product, &set)?,
        ProductShapeRule::Conformable => {
            let (left, right) = (set.matrices[0].shape(), set.matrices[1].shape());
            if left.cols != right.rows {
                return Err(MatrixError::NotConformable {
                    operation: Operation::Product,
                    left,
                    right,
                });
            }
        }
    }
    Ok(set)
}

/// Validate the single matrix of a determinant or eigen operation
pub fn square_operand(operation: Operation, rows: &[Vec<f64>]) -> Result<Matrix, MatrixError> {
    let matrix = Matrix::from_rows(rows).map_err(|defect| match defect {
        RowsDefect::Empty if rows.is_empty() => MatrixError::EmptyInput { operation },
        _ => MatrixError::NotSquare { operation },
    })?;
    if !matrix.is_square() {
        return Err(MatrixError::NotSquare { operation });
    }
    Ok(matrix)
}

fn collect_set(operation: Operation, matrices: &[Rows]) -> Result<MatrixSet, MatrixError> {
    if matrices.len() < 2 {
        return Err(MatrixError::TooFewMatrices { operation, found: matrices.len() });
    }
    let members = matrices
        .iter()
        .enumerate()
        .map(|(index, rows)| {
            Matrix::from_rows(rows).map_err(|_| MatrixError::MalformedMember { operation, index })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MatrixSet::new(members))
}

fn require_equal_shapes(operation: Operation, set: &MatrixSet) -> Result<(), MatrixError> {
    let expected = set.matrices[0].shape();
    for (index, m) in set.iter().enumerate().skip(1) {
        if m.shape() != expected {
            return Err(MatrixError::ShapeMismatch {
                operation,
                index,
                expected,
                found: m.shape(),
            });
        }
    }
    Ok(())
}
