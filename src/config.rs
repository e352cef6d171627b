/*
 * Responsibility
 * - Load settings from the environment (.env for local runs, real env vars in CI)
 * - Validate values and fail fast at startup when something required is missing
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Dev,
    Test,
    Prod,
}

impl AppEnv {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

impl FromStr for AppEnv {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "test" => Ok(Self::Test),
            "prod" => Ok(Self::Prod),
            _ => Err(ConfigError::Invalid("APP_ENV")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// `tracing_subscriber::EnvFilter` directive for this level.
    pub fn filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            // tracing has no level above error
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARNING" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(ConfigError::Invalid("LOG_LEVEL")),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub log_level: LogLevel,

    // SQLite file, must end with `.db`
    pub database_url: String,

    // HS256 signing secret for access tokens
    pub api_token: String,
    pub access_token_ttl_seconds: i64,
    pub token_scopes: Vec<String>,

    // Operator account for the token endpoint (Basic auth)
    pub basic_auth_username: String,
    pub basic_auth_password: String,

    pub persist_max_retries: u32,

    // Per-request bounds applied in front of every route
    pub max_body_bytes: usize,
    pub request_timeout_seconds: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print secrets
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("log_level", &self.log_level)
            .field("database_url", &self.database_url)
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("token_scopes", &self.token_scopes)
            .field("basic_auth_username", &self.basic_auth_username)
            .field("persist_max_retries", &self.persist_max_retries)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (process env, a map in tests).
    pub fn from_source<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let app_env: AppEnv = required("APP_ENV")?.parse()?;

        let database_url = required("DATABASE_URL")?;
        if database_url.trim().is_empty() || !database_url.ends_with(".db") {
            return Err(ConfigError::Invalid("DATABASE_URL"));
        }

        let api_token = required("API_TOKEN")?;
        if api_token.trim().is_empty() {
            return Err(ConfigError::Invalid("API_TOKEN"));
        }

        let basic_auth_username = required("BASIC_AUTH_USERNAME")?;
        if basic_auth_username.trim().is_empty() {
            return Err(ConfigError::Invalid("BASIC_AUTH_USERNAME"));
        }
        let basic_auth_password = required("BASIC_AUTH_PASSWORD")?;

        let log_level = match get("LOG_LEVEL") {
            Some(v) => v.parse()?,
            None => LogLevel::Info,
        };

        let port: u16 = get("PORT").and_then(|s| s.parse().ok()).unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let access_token_ttl_seconds = get("ACCESS_TOKEN_TTL_SECONDS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(3600); // 1 hour

        let token_scopes = get("TOKEN_SCOPES")
            .unwrap_or_else(|| "alerts:read alerts:write".to_string())
            .split_whitespace()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let persist_max_retries = get("PERSIST_MAX_RETRIES")
            .and_then(|s| s.parse().ok())
            .unwrap_or(2);

        let max_body_bytes = get("MAX_BODY_BYTES")
            .and_then(|s| s.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(1024 * 1024); // 1 MiB

        let request_timeout_seconds = get("REQUEST_TIMEOUT_SECONDS")
            .and_then(|s| s.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(30);

        Ok(Self {
            addr,
            app_env,
            log_level,
            database_url,
            api_token,
            access_token_ttl_seconds,
            token_scopes,
            basic_auth_username,
            basic_auth_password,
            persist_max_retries,
            max_body_bytes,
            request_timeout_seconds,
        })
    }
}
