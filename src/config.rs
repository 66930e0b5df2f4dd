//! Process configuration read from environment variables.
//!
//! - `DATAFORSEO_LOGIN` / `DATAFORSEO_PASSWORD` - provider Basic credentials (required)
//! - `DATAFORSEO_BASE_URL` - provider API root (default: sandbox v3)
//! - `HOST` / `PORT` - listen address (default: `0.0.0.0:3000`)
//! - `STATIC_DIR` - directory served for the web page (default: `public`)
//! - `UPSTREAM_TIMEOUT_SECS` - per-request timeout for provider calls (default: 60)

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://sandbox.dataforseo.com/v3";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STATIC_DIR: &str = "public";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone)]
pub struct Config {
    pub login: String,
    pub password: String,
    pub base_url: String,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub upstream_timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("static_dir", &self.static_dir)
            .field("upstream_timeout", &self.upstream_timeout)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset.
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let port = match get("PORT") {
            Some(v) => v.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: v,
            })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(v) => {
                let secs = v.trim().parse::<u64>().ok().filter(|secs| *secs > 0);
                secs.ok_or(ConfigError::Invalid {
                    name: "UPSTREAM_TIMEOUT_SECS",
                    value: v,
                })?
            }
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        Ok(Self {
            login: required("DATAFORSEO_LOGIN")?,
            password: required("DATAFORSEO_PASSWORD")?,
            base_url: get("DATAFORSEO_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            static_dir: PathBuf::from(
                get("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            ),
            upstream_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// `host:port` string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
