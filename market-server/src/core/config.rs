//! Server configuration
//!
//! All settings come from environment variables with sensible defaults.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | DATA_DIR | ./data | Database and log directory |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | PLATFORM_FEE_RATE | 0.05 | Commission rate applied to every sale |
//! | GATEWAY_DELAY_MS | 500 | Simulated gateway processing delay |
//! | CONFIRM_TIMEOUT_MS | 30000 | Bound on one gateway confirmation |
//! | LOG_LEVEL | info | tracing level filter |

use std::path::PathBuf;

use crate::auth::JwtConfig;

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for the redb file and rolling logs
    pub data_dir: String,
    pub http_port: u16,
    pub jwt: JwtConfig,
    /// development | staging | production
    pub environment: String,
    /// Commission rate in [0, 1], applied at order creation
    pub platform_fee_rate: f64,
    /// Simulated gateway processing delay (milliseconds)
    pub gateway_delay_ms: u64,
    /// Upper bound on a single confirmation attempt (milliseconds)
    pub confirm_timeout_ms: u64,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            platform_fee_rate: std::env::var("PLATFORM_FEE_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|r: &f64| (0.0..=1.0).contains(r))
                .unwrap_or(0.05),
            gateway_delay_ms: std::env::var("GATEWAY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
            confirm_timeout_ms: std::env::var("CONFIRM_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30_000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Path of the redb database file
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("market.redb")
    }

    /// Directory for rolling log files
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("logs")
    }

    /// Ensure the data directory structure exists
    pub fn ensure_data_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
