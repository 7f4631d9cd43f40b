//! Request handlers
//!
//! Bodies are read as raw bytes and decoded by the service, so malformed
//! JSON gets the same `{"error": ...}` response as any other failure instead
//! of the framework's default rejection.

use crate::error::MatrixError;
use crate::normalize::OperationResult;
use crate::ops::Operation;
use crate::service::MatrixService;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::Json;
use log::{debug, warn};
use serde_json::{json, Value};
use uuid::Uuid;

/// Liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Run one operation on a request body
///
/// The computation runs on the blocking pool so large decompositions do not
/// stall the async workers.
pub async fn run_operation(
    service: MatrixService,
    operation: Operation,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<OperationResult>, MatrixError> {
    let request_id = Uuid::new_v4();
    let body = body.map_err(|e| {
        warn!("[{}] {}: unreadable body: {}", request_id, operation.endpoint(), e);
        MatrixError::InvalidBody(e.body_text())
    })?;
    debug!("[{}] {}: {} bytes", request_id, operation.endpoint(), body.len());

    let outcome = tokio::task::spawn_blocking(move || service.execute_json(operation, &body))
        .await
        .map_err(|e| MatrixError::Aborted(e.to_string()))?;

    match outcome {
        Ok(result) => {
            debug!("[{}] {}: ok", request_id, operation.endpoint());
            Ok(Json(result))
        }
        Err(e) => {
            warn!("[{}] {} failed ({:?}): {}", request_id, operation.endpoint(), e.kind(), e);
            Err(e)
        }
    }
}
