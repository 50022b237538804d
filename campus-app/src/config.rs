//! Configuration loading from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use campus_hex::inbound::{Environment, RateLimitSettings};
use campus_types::RateLimitConfig;

/// Shortest accepted token signing secret, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime (one year).
pub const MAX_JWT_TTL_HOURS: i64 = 24 * 365;

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_ttl: chrono::Duration,
    pub environment: Environment,
    pub api_limit: RateLimitConfig,
    pub login_limit: RateLimitConfig,
    pub sweep_every: Duration,
    pub license_url: Option<String>,
    pub license_poll_every: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("environment", &self.environment)
            .field("api_limit", &self.api_limit)
            .field("login_limit", &self.login_limit)
            .field("license_url", &self.license_url)
            .finish_non_exhaustive()
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} is invalid: {}", name, e)),
        None => Ok(default),
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads configuration through `lookup`, which returns a variable's value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = parsed(&lookup, "PORT", 3000u16)?;

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let jwt_secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!("JWT_SECRET must be at least {} bytes", MIN_JWT_SECRET_LEN);
        }
        let jwt_ttl_hours = parsed(&lookup, "JWT_TTL_HOURS", 24i64)?;
        if !(1..=MAX_JWT_TTL_HOURS).contains(&jwt_ttl_hours) {
            anyhow::bail!("JWT_TTL_HOURS must be between 1 and {}", MAX_JWT_TTL_HOURS);
        }
        let jwt_ttl = chrono::Duration::try_hours(jwt_ttl_hours)
            .ok_or_else(|| anyhow::anyhow!("JWT_TTL_HOURS is out of range"))?;

        let environment = match lookup("APP_ENV") {
            Some(raw) => raw.parse().map_err(|e: String| anyhow::anyhow!(e))?,
            None => Environment::Development,
        };

        let api_limit = RateLimitConfig::new(
            parsed(&lookup, "RATE_LIMIT_WINDOW_MS", 60_000u64)?,
            parsed(&lookup, "RATE_LIMIT_MAX_REQUESTS", 100u32)?,
        )?;
        let login_limit = RateLimitConfig::new(
            parsed(&lookup, "LOGIN_RATE_LIMIT_WINDOW_MS", 900_000u64)?,
            parsed(&lookup, "LOGIN_RATE_LIMIT_MAX_REQUESTS", 5u32)?,
        )?;

        let sweep_secs = parsed(&lookup, "RATE_LIMIT_SWEEP_SECS", 60u64)?.max(1);
        let license_poll_secs = parsed(&lookup, "LICENSE_POLL_SECS", 3600u64)?.max(1);
        let license_url = lookup("LICENSE_STATUS_URL").filter(|url| !url.trim().is_empty());

        Ok(Self {
            port,
            database_url,
            jwt_secret,
            jwt_ttl,
            environment,
            api_limit,
            login_limit,
            sweep_every: Duration::from_secs(sweep_secs),
            license_url,
            license_poll_every: Duration::from_secs(license_poll_secs),
        })
    }

    pub fn rate_limits(&self) -> RateLimitSettings {
        RateLimitSettings {
            api: self.api_limit,
            login: self.login_limit,
            environment: self.environment,
        }
    }
}
