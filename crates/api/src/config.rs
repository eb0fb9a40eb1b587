use std::path::PathBuf;
use std::time::Duration;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight requests get to drain after a shutdown signal (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Test-execution settings for the QA endpoints.
    pub qa: QaConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            qa: QaConfig::from_env(),
        }
    }
}

/// Default command line for QA test runs.
const DEFAULT_TEST_COMMAND: &str = "cargo test";
/// Default limit for a single QA test run, in seconds.
const DEFAULT_TEST_TIMEOUT_SECS: u64 = 600;

const DEFAULT_RETENTION_MINUTES: i64 = 60;

#[derive(Debug, Clone)]
pub struct QaConfig {
    /// Whitespace-separated command; name filters are appended after `--`.
    pub test_command: String,
    pub working_directory: Option<PathBuf>,
    pub timeout: Duration,
    /// How long finished executions stay queryable.
    pub retention_minutes: i64,
}

impl QaConfig {
    /// | Env Var                | Default       |
    /// |------------------------|---------------|
    /// | `QA_TEST_COMMAND`      | `cargo test`  |
    /// | `QA_TEST_WORKDIR`      | current dir   |
    /// | `QA_TEST_TIMEOUT_SECS` | `600`         |
    /// | `QA_RETENTION_MINUTES` | `60`          |
    pub fn from_env() -> Self {
        let test_command = std::env::var("QA_TEST_COMMAND")
            .ok()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TEST_COMMAND.into());

        let timeout_secs: u64 = std::env::var("QA_TEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TEST_TIMEOUT_SECS.to_string())
            .parse()
            .expect("QA_TEST_TIMEOUT_SECS must be a valid u64");

        let retention_minutes: i64 = std::env::var("QA_RETENTION_MINUTES")
            .unwrap_or_else(|_| DEFAULT_RETENTION_MINUTES.to_string())
            .parse()
            .expect("QA_RETENTION_MINUTES must be a valid i64");

        Self {
            test_command,
            working_directory: std::env::var("QA_TEST_WORKDIR").ok().map(PathBuf::from),
            timeout: Duration::from_secs(timeout_secs),
            retention_minutes,
        }
    }
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            test_command: DEFAULT_TEST_COMMAND.into(),
            working_directory: None,
            timeout: Duration::from_secs(DEFAULT_TEST_TIMEOUT_SECS),
            retention_minutes: DEFAULT_RETENTION_MINUTES,
        }
    }
}
