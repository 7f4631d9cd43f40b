//! HTTP interface
//!
//! One `POST` route per operation plus `GET /health`:
//!
//! | Route | Body |
//! |---|---|
//! | `/sumar_matrices` | `{"matrices": [...]}` |
//! | `/multiplicar_matrices` | `{"matrices": [...]}` |
//! | `/calcular_determinante` | `{"matriz": [...]}` |
//! | `/valores-vectores-propios` | `{"matriz": [...]}` |
//! | `/diagonalizar_matriz` | `{"matriz": [...]}` |
//! | `/valor_propio_dominante` | `{"matriz": [...]}` |

pub mod error;
pub mod handlers;

use crate::config::ServerConfig;
use crate::ops::Operation;
use crate::service::MatrixService;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::routing::{get, post};
use axum::Router;
use log::{info, warn};
use tower_http::cors::{Any, CorsLayer};

pub use error::ErrorBody;

/// Build the application router
pub fn create_router(config: &ServerConfig) -> Router {
    let service = MatrixService::new(config.service.clone());

    let mut router: Router<MatrixService> = Router::new().route("/health", get(handlers::health));
    for operation in Operation::ALL {
        router = router.route(
            &operation.route(),
            post(
                move |State(service): State<MatrixService>,
                      body: Result<Bytes, BytesRejection>| {
                    handlers::run_operation(service, operation, body)
                },
            ),
        );
    }

    let router = router
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .with_state(service);

    if config.cors_allow_any_origin {
        router.layer(cors_layer())
    } else {
        router
    }
}

/// Cross-origin requests from any origin, with any method and header
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Bind `config.bind_addr` and serve until Ctrl+C
pub async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    info!(
        "Product shape rule: {:?}, eigen tolerance: {:e}",
        config.service.product_shape_rule, config.service.eigen_tolerance
    );

    axum::serve(listener, create_router(&config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}
