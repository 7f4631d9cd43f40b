//! Matrix service — validate, compute, normalize
//!
//! [`MatrixService`] holds only immutable configuration, so one instance can
//! be cloned into every request handler. Each call is a self-contained
//! computation that either returns the whole result or an error.

use crate::config::ServiceConfig;
use crate::error::MatrixError;
use crate::matrix::{validate, Rows};
use crate::normalize::{self, OperationResult};
use crate::ops::eigen::{self, EigenSettings};
use crate::ops::{arithmetic, Operation, OperationRequest};
use log::debug;

#[derive(Debug, Clone, Default)]
pub struct MatrixService {
    config: ServiceConfig,
    eigen: EigenSettings,
}

impl MatrixService {
    pub fn new(config: ServiceConfig) -> Self {
        let eigen = EigenSettings::from(&config);
        Self { config, eigen }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Decode a JSON body for `operation` and execute it
    pub fn execute_json(
        &self,
        operation: Operation,
        body: &[u8],
    ) -> Result<OperationResult, MatrixError> {
        let request = OperationRequest::from_json(operation, body)?;
        self.execute(&request)
    }

    /// Validate the request, run the operation and normalize its result
    pub fn execute(&self, request: &OperationRequest) -> Result<OperationResult, MatrixError> {
        let operation = request.operation();
        match request {
            OperationRequest::Sum(matrices) => {
                let set = validate::sum_operands(matrices)?;
                debug!("Summing {} matrices of shape {}", set.len(), shape_of(matrices));
                normalize::matrix_result(operation, &arithmetic::sum(&set))
            }
            OperationRequest::Product(matrices) => {
                let set = validate::product_operands(matrices, self.config.product_shape_rule)?;
                debug!("Multiplying first 2 of {} matrices", set.len());
                normalize::matrix_result(operation, &arithmetic::product(&set))
            }
            OperationRequest::Determinant(rows) => {
                let m = validate::square_operand(operation, rows)?;
                debug!("Determinant of {} matrix", m.shape());
                normalize::determinant_result(operation, arithmetic::determinant(&m))
            }
            OperationRequest::EigenDecomposition(rows) => {
                let m = validate::square_operand(operation, rows)?;
                debug!("Eigendecomposition of {} matrix", m.shape());
                let eig = eigen::eigen_decompose(&m, &self.eigen)?;
                normalize::eigen_result(operation, &eig)
            }
            OperationRequest::Diagonalization(rows) => {
                let m = validate::square_operand(operation, rows)?;
                debug!("Diagonalization of {} matrix", m.shape());
                let diag = eigen::diagonalize(&m, &self.eigen)?;
                normalize::diagonalization_result(operation, &diag)
            }
            OperationRequest::DominantEigenpair(rows) => {
                let m = validate::square_operand(operation, rows)?;
                debug!("Dominant eigenpair of {} matrix", m.shape());
                let pair = eigen::dominant_eigenpair(&m, &self.eigen)?;
                normalize::dominant_result(operation, &pair)
            }
        }
    }
}

fn shape_of(matrices: &[Rows]) -> String {
    matrices
        .first()
        .map(|m| format!("{}x{}", m.len(), m.first().map(Vec::len).unwrap_or(0)))
        .unwrap_or_default()
}
