/*
 * Responsibility
 * - 環境変数から設定を読む (dotenvy で .env → プロセス環境)
 * - ストア URL redis://{host}:{port}/{db} を組み立てる
 * - 値の検証 (解釈できない値は起動時に失敗させる)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where the visit cache lives. The URL is always composed from these parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub db: u32,
}

impl RedisSettings {
    pub fn url(&self) -> Result<Url, ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("REDIS_HOST"));
        }

        let url = Url::parse(&format!("redis://{}:{}/{}", self.host, self.port, self.db))
            .map_err(|_| ConfigError::Invalid("REDIS_HOST"))?;

        if url.host_str().is_none() {
            return Err(ConfigError::Invalid("REDIS_HOST"));
        }

        Ok(url)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub request_timeout: Duration,
    pub request_body_limit: usize,

    pub redis: RedisSettings,
    pub redis_url: Url,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup (process env in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(&lookup, "PORT", 3000)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let request_timeout_seconds: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECONDS", 30)?;
        if request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }

        let request_body_limit: usize = parse_or(&lookup, "REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;

        let redis = RedisSettings {
            host: lookup("REDIS_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: parse_or(&lookup, "REDIS_PORT", 7380)?,
            db: parse_or(&lookup, "REDIS_DB", 0)?,
        };
        let redis_url = redis.url()?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            request_timeout: Duration::from_secs(request_timeout_seconds),
            request_body_limit,
            redis,
            redis_url,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}
