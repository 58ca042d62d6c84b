use chrono_tz::Tz;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | working directory (database, logs) |
/// | DATABASE_PATH | {WORK_DIR}/database/pos.db | SQLite file |
/// | HTTP_PORT | 5000 | HTTP port |
/// | ENVIRONMENT | development | development / production |
/// | LOG_LEVEL | info | default log level (`RUST_LOG` wins) |
/// | LOG_DIR | unset | daily rolling log files |
/// | SESSION_IDLE_TIMEOUT_SECS | 1800 | cart session idle timeout |
/// | AUTO_ASSIGN_TABLE | true | seat dine-in orders without a table automatically |
/// | BUSINESS_TZ | UTC | timezone for business days and order numbers |
/// | REQUEST_TIMEOUT_MS | 30000 | request timeout (milliseconds) |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/srv/pos HTTP_PORT=8080 BUSINESS_TZ=Europe/Madrid cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database and logs
    pub work_dir: String,
    /// Explicit database file, defaults under `work_dir`
    pub database_path: Option<String>,
    pub http_port: u16,
    /// development | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub session_idle_timeout_secs: u64,
    pub auto_assign_table: bool,
    pub business_tz: Tz,
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            database_path: std::env::var("DATABASE_PATH").ok().filter(|p| !p.is_empty()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            session_idle_timeout_secs: std::env::var("SESSION_IDLE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1800),
            auto_assign_table: std::env::var("AUTO_ASSIGN_TABLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            business_tz: std::env::var("BUSINESS_TZ")
                .ok()
                .map(|tz| parse_timezone(&tz))
                .unwrap_or(Tz::UTC),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
        }
    }

    /// Override the work dir and port, mostly for tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.database_path = None;
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// SQLite file location
    pub fn database_path(&self) -> String {
        match &self.database_path {
            Some(path) => path.clone(),
            None => format!("{}/database/pos.db", self.work_dir),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_timezone(name: &str) -> Tz {
    name.parse().unwrap_or_else(|_| {
        tracing::warn!(timezone = %name, "Unknown BUSINESS_TZ, falling back to UTC");
        Tz::UTC
    })
}
