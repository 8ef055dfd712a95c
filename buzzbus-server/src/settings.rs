//! Server settings from the environment.

use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::transloc::{DEFAULT_BASE_URL, TranslocConfig};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

/// Origins of the deployed frontends.
const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "https://buzz-bus.vercel.app",
    "https://buzzbus.netlify.app",
    "https://buzzbus.vercel.app",
];

/// Errors from reading settings.
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("{var} is not a valid {expected}: {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Server settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Relay connection; unused when `mock_dir` is set.
    pub transloc: TranslocConfig,
    /// Serve from fixtures in this directory instead of the live API.
    pub mock_dir: Option<PathBuf>,
    pub host: IpAddr,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl Settings {
    /// Read settings from process environment variables.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let host_var = get("BUZZBUS_HOST");
        let host = parse("BUZZBUS_HOST", "IP address", host_var.as_deref().unwrap_or(DEFAULT_HOST))?;

        let port = match get("BUZZBUS_PORT") {
            Some(v) => parse("BUZZBUS_PORT", "port", &v)?,
            None => DEFAULT_PORT,
        };

        let mut transloc = TranslocConfig::new(
            get("TRANSLOC_API_KEY").unwrap_or_default(),
            get("TRANSLOC_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        );
        if let Some(v) = get("TRANSLOC_MAX_CONCURRENT") {
            transloc.max_concurrent =
                parse::<NonZeroUsize>("TRANSLOC_MAX_CONCURRENT", "positive integer", &v)?;
        }
        if let Some(v) = get("TRANSLOC_TIMEOUT_SECS") {
            let secs = parse::<NonZeroUsize>("TRANSLOC_TIMEOUT_SECS", "positive integer", &v)?;
            transloc.timeout = Duration::from_secs(secs.get() as u64);
        }

        let cors_origins = match get("BUZZBUS_CORS_ORIGINS") {
            Some(v) => v
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            transloc,
            mock_dir: get("TRANSLOC_MOCK_DIR").map(PathBuf::from),
            host,
            port,
            cors_origins,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse<T: std::str::FromStr>(
    var: &'static str,
    expected: &'static str,
    value: &str,
) -> Result<T, SettingsError> {
    value.trim().parse().map_err(|_| SettingsError::Invalid {
        var,
        expected,
        value: value.to_string(),
    })
}
