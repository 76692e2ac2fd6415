use std::path::PathBuf;

/// Server configuration - all tunables for a floor node
///
/// # Environment variables
///
/// Every setting can be overridden through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/comanda/floor | Working directory (databases, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | TAX_RATE_PERCENT | 10.0 | Flat tax rate applied at settlement |
/// | TAX_ENABLED | true | Disable to run tax-free |
/// | SESSION_JOIN_WINDOW_MINS | 120 | How long new orders may join a table session |
/// | SESSION_MAX_LIFETIME_MINS | 240 | Hard cap on a session's lifetime |
/// | CLOSURE_REPLAY_WINDOW_SECS | 600 | Replay window for repeated close requests |
/// | TABLE_COUNT | 12 | Tables seeded on first start |
/// | TABLE_CAPACITY | 4 | Capacity of seeded tables |
/// | BUSINESS_TIMEZONE | Europe/Madrid | Timezone for receipt-number dates |
/// | CATALOG_FILE | (unset) | JSON catalog file; default menu when unset |
/// | LOG_LEVEL | info | tracing filter level |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/comanda HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding databases and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,

    // === Money ===
    /// Flat tax rate in percent
    pub tax_rate_percent: f64,
    /// Whether tax is applied at all
    pub tax_enabled: bool,

    // === Sessions and closure ===
    /// Join window for table sessions (minutes)
    pub session_join_window_mins: i64,
    /// Maximum session lifetime (minutes)
    pub session_max_lifetime_mins: i64,
    /// Closure replay window (seconds)
    pub closure_replay_window_secs: i64,

    // === Floor layout ===
    /// Number of tables seeded on first start
    pub table_count: u32,
    /// Capacity of seeded tables
    pub table_capacity: u32,

    // === Misc ===
    /// IANA timezone used when stamping receipt numbers
    pub business_timezone: String,
    /// Optional JSON catalog file; the built-in menu is used when unset
    pub catalog_file: Option<String>,
    /// tracing filter level
    pub log_level: String,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/comanda/floor".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            tax_rate_percent: std::env::var("TAX_RATE_PERCENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10.0),
            tax_enabled: std::env::var("TAX_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            session_join_window_mins: std::env::var("SESSION_JOIN_WINDOW_MINS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
            session_max_lifetime_mins: std::env::var("SESSION_MAX_LIFETIME_MINS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(240),
            closure_replay_window_secs: std::env::var("CLOSURE_REPLAY_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
            table_count: std::env::var("TABLE_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(12),
            table_capacity: std::env::var("TABLE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
            business_timezone: std::env::var("BUSINESS_TIMEZONE")
                .unwrap_or_else(|_| "Europe/Madrid".into()),
            catalog_file: std::env::var("CATALOG_FILE").ok(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        }
    }

    /// Override the directory and port, keeping everything else from the
    /// environment. Used by tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Path of the orders database
    pub fn orders_db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("data").join("orders.redb")
    }

    /// Path of the closure audit database
    pub fn audit_db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("data").join("audit.redb")
    }

    /// Directory for rolling log files
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Create the work-dir layout if missing
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(PathBuf::from(&self.work_dir).join("data"))?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
