//! Service and server configuration
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```json
//! { "bind_addr": "0.0.0.0:8080", "service": { "product_shape_rule": "conformable" } }
//! ```

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`ServerConfig::bind_addr`]
pub const ADDR_ENV: &str = "MATRIXD_ADDR";

/// How the operands of a product are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductShapeRule {
    /// Both operands must have identical shapes (historical behavior)
    #[default]
    EqualShapes,
    /// Columns of the first operand must equal rows of the second
    Conformable,
}

/// Numerical and validation settings of the matrix service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub product_shape_rule: ProductShapeRule,
    /// Relative tolerance for grouping equal eigenvalues and for rank decisions
    pub eigen_tolerance: f64,
    /// Upper bound on Schur iterations, at least 1
    pub max_schur_iterations: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            product_shape_rule: ProductShapeRule::EqualShapes,
            eigen_tolerance: 1e-9,
            max_schur_iterations: 10_000,
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Largest accepted request body
    pub body_limit_bytes: usize,
    /// Allow cross-origin requests from any origin
    pub cors_allow_any_origin: bool,
    pub service: ServiceConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            body_limit_bytes: 1024 * 1024,
            cors_allow_any_origin: true,
            service: ServiceConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded server configuration from {}", path);
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(addr) = std::env::var(ADDR_ENV) {
            if !addr.trim().is_empty() {
                self.bind_addr = addr.trim().to_string();
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.body_limit_bytes == 0 {
            return Err("body_limit_bytes must be positive".to_string());
        }
        let tol = self.service.eigen_tolerance;
        if !tol.is_finite() || tol <= 0.0 || tol >= 1.0 {
            return Err(format!("eigen_tolerance must lie in (0, 1), got {}", tol));
        }
        if self.service.max_schur_iterations == 0 {
            return Err("max_schur_iterations must be positive".to_string());
        }
        Ok(())
    }
}
