//! Matrix operations and request decoding
//!
//! - **arithmetic**: sum, product and determinant
//! - **eigen**: general eigendecomposition, diagonalization and the
//!   dominant eigenpair

pub mod arithmetic;
pub mod eigen;

use crate::matrix::Rows;
use crate::error::MatrixError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six operations the service exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Sum,
    Product,
    Determinant,
    EigenDecomposition,
    Diagonalization,
    DominantEigenpair,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Sum,
        Operation::Product,
        Operation::Determinant,
        Operation::EigenDecomposition,
        Operation::Diagonalization,
        Operation::DominantEigenpair,
    ];

    /// Endpoint name, also accepted by the CLI
    pub fn endpoint(&self) -> &'static str {
        match self {
            Operation::Sum => "sumar_matrices",
            Operation::Product => "multiplicar_matrices",
            Operation::Determinant => "calcular_determinante",
            Operation::EigenDecomposition => "valores-vectores-propios",
            Operation::Diagonalization => "diagonalizar_matriz",
            Operation::DominantEigenpair => "valor_propio_dominante",
        }
    }

    /// HTTP route of the operation
    pub fn route(&self) -> String {
        format!("/{}", self.endpoint())
    }

    pub fn from_endpoint(name: &str) -> Option<Self> {
        let name = name.trim_start_matches('/');
        Self::ALL.into_iter().find(|op| op.endpoint() == name)
    }

    /// Whether the operation takes a set of matrices rather than one
    pub fn takes_set(&self) -> bool {
        matches!(self, Operation::Sum | Operation::Product)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Sum => "sum",
            Operation::Product => "product",
            Operation::Determinant => "determinant",
            Operation::EigenDecomposition => "eigenvalues and eigenvectors",
            Operation::Diagonalization => "diagonalization",
            Operation::DominantEigenpair => "dominant eigenvalue",
        };
        f.write_str(name)
    }
}

/// Body of the set operations: `{"matrices": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatricesBody {
    #[serde(default)]
    pub matrices: Vec<Rows>,
}

/// Body of the single matrix operations: `{"matriz": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatrixBody {
    #[serde(default)]
    pub matriz: Rows,
}

/// An unvalidated request for one operation
#[derive(Debug, Clone, PartialEq)]
pub enum OperationRequest {
    Sum(Vec<Rows>),
    Product(Vec<Rows>),
    Determinant(Rows),
    EigenDecomposition(Rows),
    Diagonalization(Rows),
    DominantEigenpair(Rows),
}

impl OperationRequest {
    pub fn operation(&self) -> Operation {
        match self {
            OperationRequest::Sum(_) => Operation::Sum,
            OperationRequest::Product(_) => Operation::Product,
            OperationRequest::Determinant(_) => Operation::Determinant,
            OperationRequest::EigenDecomposition(_) => Operation::EigenDecomposition,
            OperationRequest::Diagonalization(_) => Operation::Diagonalization,
            OperationRequest::DominantEigenpair(_) => Operation::DominantEigenpair,
        }
    }

    /// Decode a JSON request body for `operation`
    pub fn from_json(operation: Operation, body: &[u8]) -> Result<Self, MatrixError> {
        if operation.takes_set() {
            let MatricesBody { matrices } = serde_json::from_slice(body)?;
            Ok(Self::from_set(operation, matrices))
        } else {
            let MatrixBody { matriz } = serde_json::from_slice(body)?;
            Ok(Self::from_matrix(operation, matriz))
        }
    }

    fn from_set(operation: Operation, matrices: Vec<Rows>) -> Self {
        match operation {
            Operation::Product => OperationRequest::Product(matrices),
            _ => OperationRequest::Sum(matrices),
        }
    }

    fn from_matrix(operation: Operation, matriz: Rows) -> Self {
        match operation {
            Operation::EigenDecomposition => OperationRequest::EigenDecomposition(matriz),
            Operation::Diagonalization => OperationRequest::Diagonalization(matriz),
            Operation::DominantEigenpair => OperationRequest::DominantEigenpair(matriz),
            _ => OperationRequest::Determinant(matriz),
        }
    }
}
