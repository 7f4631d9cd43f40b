//! Error responses
//!
//! Every failure, validation or computation, is answered with status 400
//! and a body of the form `{"error": "<message>"}`.

use crate::error::MatrixError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&MatrixError> for ErrorBody {
    fn from(e: &MatrixError) -> Self {
        Self { error: e.to_string() }
    }
}

impl IntoResponse for MatrixError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(ErrorBody::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::Operation;

    #[test]
    fn test_all_errors_are_bad_request() {
        let errors = [
            MatrixError::TooFewMatrices { operation: Operation::Sum, found: 1 },
            MatrixError::EmptyInput { operation: Operation::Determinant },
            MatrixError::Singular("P".to_string()),
            MatrixError::InvalidBody("eof".to_string()),
        ];
        for e in errors {
            assert_eq!(e.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }
}
