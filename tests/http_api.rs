use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use matrix_service::http::create_router;
use matrix_service::{ProductShapeRule, ServerConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    create_router(&ServerConfig::default())
}

async fn post(app: Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
    post(app(), uri, body.to_string()).await
}

#[tokio::test]
async fn test_sum_matrices() {
    let (status, body) = post_json(
        "/sumar_matrices",
        json!({"matrices": [[[1, 2], [3, 4]], [[5, 6], [7, 8]]]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"resultado": [[6, 8], [10, 12]]}));
}

#[tokio::test]
async fn test_multiply_matrices() {
    let (status, body) = post_json(
        "/multiplicar_matrices",
        json!({"matrices": [[[1, 2], [3, 4]], [[5, 6], [7, 8]]]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"resultado": [[19, 22], [43, 50]]}));
}

#[tokio::test]
async fn test_determinant() {
    let (status, body) = post_json("/calcular_determinante", json!({"matriz": [[2, 0], [0, 3]]})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"determinante": 6.0}));
}

#[tokio::test]
async fn test_eigen_decomposition() {
    let a = [[4.0, 1.0], [2.0, 3.0]];
    let (status, body) = post_json("/valores-vectores-propios", json!({"matriz": a})).await;
    assert_eq!(status, StatusCode::OK);
    let values = body["valores_propios"].as_array().unwrap();
    let vectors = body["vectores_propios"].as_array().unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(vectors.len(), 2);
    assert!(values.iter().all(Value::is_f64));

    // Column k of vectores_propios belongs to valores_propios[k].
    for (k, lambda) in values.iter().map(|v| v.as_f64().unwrap()).enumerate() {
        let v: Vec<f64> = vectors.iter().map(|row| row[k].as_f64().unwrap()).collect();
        for i in 0..2 {
            let av = a[i][0] * v[0] + a[i][1] * v[1];
            assert!((av - lambda * v[i]).abs() < 1e-9, "column {} for eigenvalue {}", k, lambda);
        }
    }
}

#[tokio::test]
async fn test_close_eigenvalues_diagonalize() {
    let (status, body) = post_json("/diagonalizar_matriz", json!({"matriz": [[1, 0], [0, 1.0000000001]]})).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["matriz_P"], json!([[1.0, 0.0], [0.0, 1.0]]));
}

#[tokio::test]
async fn test_diagonalize() {
    let (status, body) = post_json("/diagonalizar_matriz", json!({"matriz": [[4, 1], [2, 3]]})).await;
    assert_eq!(status, StatusCode::OK);
    for key in ["matriz_P", "matriz_D", "matriz_P_inversa"] {
        assert_eq!(body[key].as_array().unwrap().len(), 2, "field {}", key);
    }
    let d = &body["matriz_D"];
    assert_eq!(d[0][1], json!(0.0));
    assert_eq!(d[1][0], json!(0.0));
}

#[tokio::test]
async fn test_dominant_eigenpair() {
    let (status, body) = post_json("/valor_propio_dominante", json!({"matriz": [[1, 0], [0, 1]]})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"valor_propio_dominante": 1.0, "vector_propio_dominante": [1.0, 0.0]})
    );
}

#[tokio::test]
async fn test_dominant_eigenpair_is_rounded() {
    let (status, body) = post_json("/valor_propio_dominante", json!({"matriz": [[2, 1], [1, 2]]})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"valor_propio_dominante": 3.0, "vector_propio_dominante": [0.7071, 0.7071]})
    );
}

#[tokio::test]
async fn test_arity_error_is_bad_request() {
    for uri in ["/sumar_matrices", "/multiplicar_matrices"] {
        let (status, body) = post_json(uri, json!({"matrices": [[[1, 2], [3, 4]]]})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("at least two matrices"));
    }
}

#[tokio::test]
async fn test_shape_errors_are_bad_request() {
    let (status, _) = post_json(
        "/sumar_matrices",
        json!({"matrices": [[[1, 2]], [[1], [2]]]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for uri in [
        "/calcular_determinante",
        "/valores-vectores-propios",
        "/diagonalizar_matriz",
        "/valor_propio_dominante",
    ] {
        let (status, body) = post_json(uri, json!({"matriz": [[1, 2, 3]]})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].as_str().unwrap().contains("square"));

        let (status, body) = post_json(uri, json!({"matriz": []})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_error_messages_are_operation_specific() {
    let (_, det) = post_json("/calcular_determinante", json!({"matriz": [[1, 2]]})).await;
    let (_, diag) = post_json("/diagonalizar_matriz", json!({"matriz": [[1, 2]]})).await;
    assert_ne!(det["error"], diag["error"]);
}

#[tokio::test]
async fn test_singular_eigenvectors_are_bad_request() {
    let (status, body) = post_json("/diagonalizar_matriz", json!({"matriz": [[1, 1], [0, 1]]})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("singular"));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (status, body) = post(app(), "/calcular_determinante", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("invalid request body"));

    let (status, _) = post_json("/calcular_determinante", json!({"matriz": [["a", 1], [2, 3]]})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_body_limit_is_bad_request() {
    let config = ServerConfig { body_limit_bytes: 16, ..ServerConfig::default() };
    let body = json!({"matrices": [[[1, 2], [3, 4]], [[5, 6], [7, 8]]]}).to_string();
    let (status, body) = post(create_router(&config), "/sumar_matrices", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_conformable_product_rule() {
    let mut config = ServerConfig::default();
    config.service.product_shape_rule = ProductShapeRule::Conformable;
    let body = json!({"matrices": [[[1, 2, 3]], [[1], [2], [3]]]}).to_string();
    let (status, body) = post(create_router(&config), "/multiplicar_matrices", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"resultado": [[14]]}));
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/sumar_matrices")
        .header(header::ORIGIN, "http://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
