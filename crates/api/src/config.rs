use std::path::PathBuf;
use std::str::FromStr;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. Unparseable
/// values fall back to the default with a warning.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// A single `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory served under `/frontend` when it exists.
    pub frontend_dir: PathBuf,
    /// Verbose diagnostics (default: `false`).
    pub debug_mode: bool,
    pub features: FeatureFlags,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default      |
    /// |------------------------|--------------|
    /// | `HOST`                 | `0.0.0.0`    |
    /// | `PORT`                 | `8000`       |
    /// | `CORS_ORIGINS`         | `*`          |
    /// | `REQUEST_TIMEOUT_SECS` | `30`         |
    /// | `FRONTEND_DIR`         | `frontend`   |
    /// | `DEBUG_MODE`           | `false`      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = env_or("PORT", 8000);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = env_or("REQUEST_TIMEOUT_SECS", 30);

        let frontend_dir = std::env::var("FRONTEND_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("frontend"));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            frontend_dir,
            debug_mode: env_flag("DEBUG_MODE", false),
            features: FeatureFlags::from_env(),
        }
    }

    /// Whether every origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

/// Subsystem switches reported by `/api/v1/health`.
///
/// A disabled subsystem is reported as `disabled`; an enabled one as
/// `online`. No connectivity check is performed.
#[derive(Debug, Clone, Copy)]
pub struct FeatureFlags {
    pub postgres: bool,
    pub mongodb: bool,
    pub graphql: bool,
    pub kafka: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            postgres: true,
            mongodb: true,
            graphql: true,
            kafka: true,
        }
    }
}

impl FeatureFlags {
    /// | Env Var            | Default |
    /// |--------------------|---------|
    /// | `POSTGRES_ENABLED` | `true`  |
    /// | `MONGODB_ENABLED`  | `true`  |
    /// | `GRAPHQL_ENABLED`  | `true`  |
    /// | `KAFKA_ENABLED`    | `true`  |
    pub fn from_env() -> Self {
        Self {
            postgres: env_flag("POSTGRES_ENABLED", true),
            mongodb: env_flag("MONGODB_ENABLED", true),
            graphql: env_flag("GRAPHQL_ENABLED", true),
            kafka: env_flag("KAFKA_ENABLED", true),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Invalid value, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Parse a boolean switch. Accepts `true/false`, `1/0`, `yes/no`, `on/off`.
fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|raw| parse_flag(&raw))
        .unwrap_or(default)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
