//! Conversion of numeric results into their JSON form
//!
//! Real values become JSON numbers and complex values with a non-zero
//! imaginary part become `{"re": x, "im": y}` objects. Sums and products
//! write integral entries as JSON integers. Matrices are arrays of rows. NaN and infinities have no JSON encoding, so a result holding
//! one is rejected as a whole.

use crate::error::MatrixError;
use crate::ops::eigen::{Diagonalization, DominantEigenpair, EigenDecomposition, C64};
use crate::ops::Operation;
use nalgebra::{DMatrix, DVector};
use serde::Serialize;

/// A JSON-safe number
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Real(f64),
    Complex { re: f64, im: f64 },
}

impl Scalar {
    pub fn re(&self) -> f64 {
        match *self {
            Scalar::Integer(k) => k as f64,
            Scalar::Real(x) => x,
            Scalar::Complex { re, .. } => re,
        }
    }

    pub fn im(&self) -> f64 {
        match *self {
            Scalar::Integer(_) | Scalar::Real(_) => 0.0,
            Scalar::Complex { im, .. } => im,
        }
    }
}

pub type ScalarMatrix = Vec<Vec<Scalar>>;

/// Response payload of an operation, keyed by the wire field names
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OperationResult {
    Matrix {
        #[serde(rename = "resultado")]
        result: ScalarMatrix,
    },
    Determinant {
        #[serde(rename = "determinante")]
        determinant: Scalar,
    },
    Eigen {
        #[serde(rename = "valores_propios")]
        values: Vec<Scalar>,
        #[serde(rename = "vectores_propios")]
        vectors: ScalarMatrix,
    },
    Diagonalization {
        #[serde(rename = "matriz_P")]
        p: ScalarMatrix,
        #[serde(rename = "matriz_D")]
        d: ScalarMatrix,
        #[serde(rename = "matriz_P_inversa")]
        p_inverse: ScalarMatrix,
    },
    Dominant {
        #[serde(rename = "valor_propio_dominante")]
        value: Scalar,
        #[serde(rename = "vector_propio_dominante")]
        vector: Vec<Scalar>,
    },
}

/// `resultado` of a sum or product
pub fn matrix_result(operation: Operation, m: &DMatrix<f64>) -> Result<OperationResult, MatrixError> {
    let result = real_matrix(operation, m)?;
    Ok(OperationResult::Matrix { result })
}

pub fn determinant_result(operation: Operation, det: f64) -> Result<OperationResult, MatrixError> {
    let determinant = scalar(operation, C64::new(det, 0.0))?;
    Ok(OperationResult::Determinant { determinant })
}

pub fn eigen_result(
    operation: Operation,
    eig: &EigenDecomposition,
) -> Result<OperationResult, MatrixError> {
    Ok(OperationResult::Eigen {
        values: complex_vector(operation, &eig.values)?,
        vectors: complex_matrix(operation, &eig.vectors)?,
    })
}

pub fn diagonalization_result(
    operation: Operation,
    diag: &Diagonalization,
) -> Result<OperationResult, MatrixError> {
    Ok(OperationResult::Diagonalization {
        p: complex_matrix(operation, &diag.p)?,
        d: complex_matrix(operation, &diag.d)?,
        p_inverse: complex_matrix(operation, &diag.p_inverse)?,
    })
}

pub fn dominant_result(
    operation: Operation,
    pair: &DominantEigenpair,
) -> Result<OperationResult, MatrixError> {
    Ok(OperationResult::Dominant {
        value: scalar(operation, pair.value)?,
        vector: complex_vector(operation, &pair.vector)?,
    })
}

fn scalar(operation: Operation, z: C64) -> Result<Scalar, MatrixError> {
    if !z.re.is_finite() || !z.im.is_finite() {
        return Err(MatrixError::NonFinite { operation });
    }
    // Adding +0.0 turns -0.0 into 0.0.
    let (re, im) = (z.re + 0.0, z.im + 0.0);
    if im == 0.0 {
        Ok(Scalar::Real(re))
    } else {
        Ok(Scalar::Complex { re, im })
    }
}

/// Largest magnitude below which every integer is exact in an f64
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn real_matrix(operation: Operation, m: &DMatrix<f64>) -> Result<ScalarMatrix, MatrixError> {
    m.row_iter()
        .map(|row| row.iter().map(|&x| integral_or_real(operation, x)).collect())
        .collect()
}

fn integral_or_real(operation: Operation, x: f64) -> Result<Scalar, MatrixError> {
    if x.fract() == 0.0 && x.abs() <= MAX_EXACT_INTEGER {
        Ok(Scalar::Integer(x as i64))
    } else {
        scalar(operation, C64::new(x, 0.0))
    }
}

fn complex_matrix(operation: Operation, m: &DMatrix<C64>) -> Result<ScalarMatrix, MatrixError> {
    m.row_iter()
        .map(|row| row.iter().map(|&z| scalar(operation, z)).collect())
        .collect()
}

fn complex_vector(operation: Operation, v: &DVector<C64>) -> Result<Vec<Scalar>, MatrixError> {
    v.iter().map(|&z| scalar(operation, z)).collect()
}
