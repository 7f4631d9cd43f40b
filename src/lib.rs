//! Matrix Service — dense linear algebra over HTTP
//!
//! Sum, product, determinant, eigendecomposition, diagonalization and
//! dominant eigenpair of small dense matrices. Requests flow through a
//! validator, the numeric operation and a normalizer that produces
//! JSON-safe output.

pub mod config;
pub mod error;
pub mod http;
pub mod matrix;
pub mod normalize;
pub mod ops;
pub mod service;

pub use config::{ProductShapeRule, ServerConfig, ServiceConfig};
pub use error::{ErrorKind, MatrixError};
pub use matrix::{Matrix, MatrixSet, Rows, Shape};
pub use normalize::{OperationResult, Scalar};
pub use ops::{Operation, OperationRequest};
pub use service::MatrixService;
