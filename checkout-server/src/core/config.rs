/// Server configuration
///
/// # Environment variables
///
/// Every setting can be overridden via environment variables:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | /var/lib/checkout | Working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | Runtime environment |
/// | LOG_LEVEL | info | Log level |
/// | LOG_DIR | (none) | Directory for rolling log files |
/// | REQUEST_TIMEOUT_MS | 30000 | HTTP request timeout (ms) |
/// | SHUTDOWN_TIMEOUT_MS | 5000 | Graceful shutdown budget (ms) |
/// | CHECKOUT_DEADLINE_MS | 10000 | Wall-clock budget per checkout (ms) |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/checkout HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Log level
    pub log_level: String,
    /// Optional directory for rolling log files
    pub log_dir: Option<String>,
    /// HTTP request timeout (milliseconds)
    pub request_timeout_ms: u64,
    /// Graceful shutdown budget (milliseconds)
    pub shutdown_timeout_ms: u64,
    /// Wall-clock budget for a single checkout (milliseconds)
    pub checkout_deadline_ms: u64,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/checkout".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30_000),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5_000),
            checkout_deadline_ms: std::env::var("CHECKOUT_DEADLINE_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10_000),
        }
    }

    /// Path of the redb database file under the working directory
    pub fn db_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join("checkout.redb")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
