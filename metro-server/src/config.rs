//! Server configuration.
//!
//! Read once from the environment at startup. Every setting has a default,
//! so the server runs with no variables set as long as the station files are
//! where it expects them.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;

use crate::fetch::DEFAULT_TIMEOUT_SECS;
use crate::refresh::DEFAULT_REFRESH;

const RAIL_STATIONS_VAR: &str = "METRO_RAIL_STATIONS";
const BUS_STATIONS_VAR: &str = "METRO_BUS_STATIONS";
const LISTEN_ADDR_VAR: &str = "METRO_LISTEN_ADDR";
const FETCH_TIMEOUT_VAR: &str = "METRO_FETCH_TIMEOUT_SECS";
const REFRESH_VAR: &str = "METRO_REFRESH_SECS";
const TIMEZONE_VAR: &str = "METRO_TIMEZONE";
const STATIC_DIR_VAR: &str = "METRO_STATIC_DIR";

const DEFAULT_RAIL_STATIONS: &str = "data/fgv-bocas.csv";
const DEFAULT_BUS_STATIONS: &str = "data/emt-paradas.csv";
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_STATIC_DIR: &str = "static";

/// An environment variable holds a value we cannot use.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {var}={value:?}: {message}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub message: String,
}

/// Settings for the dashboard server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Rail station directory file
    pub rail_stations: PathBuf,
    /// Bus station directory file (optional at runtime)
    pub bus_stations: PathBuf,
    /// Address to listen on
    pub listen_addr: SocketAddr,
    /// Status page request timeout in seconds
    pub fetch_timeout_secs: u64,
    /// Live board refresh period
    pub refresh: Duration,
    /// Time zone the operator publishes clock times in
    pub timezone: Tz,
    /// Directory served under /static
    pub static_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rail_stations: PathBuf::from(DEFAULT_RAIL_STATIONS),
            bus_stations: PathBuf::from(DEFAULT_BUS_STATIONS),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            fetch_timeout_secs: DEFAULT_TIMEOUT_SECS,
            refresh: DEFAULT_REFRESH,
            timezone: chrono_tz::Europe::Madrid,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup(RAIL_STATIONS_VAR) {
            config.rail_stations = PathBuf::from(path);
        }
        if let Some(path) = lookup(BUS_STATIONS_VAR) {
            config.bus_stations = PathBuf::from(path);
        }
        if let Some(dir) = lookup(STATIC_DIR_VAR) {
            config.static_dir = PathBuf::from(dir);
        }

        let addr = lookup(LISTEN_ADDR_VAR).unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        config.listen_addr = addr
            .parse()
            .map_err(|e: std::net::AddrParseError| invalid(LISTEN_ADDR_VAR, &addr, e))?;

        if let Some(secs) = lookup(FETCH_TIMEOUT_VAR) {
            config.fetch_timeout_secs = parse_positive(FETCH_TIMEOUT_VAR, &secs)?;
        }
        if let Some(secs) = lookup(REFRESH_VAR) {
            config.refresh = Duration::from_secs(parse_positive(REFRESH_VAR, &secs)?);
        }
        if let Some(tz) = lookup(TIMEZONE_VAR) {
            config.timezone = tz
                .parse::<Tz>()
                .map_err(|e| invalid(TIMEZONE_VAR, &tz, e))?;
        }

        Ok(config)
    }

    pub fn with_rail_stations(mut self, path: impl Into<PathBuf>) -> Self {
        self.rail_stations = path.into();
        self
    }

    pub fn with_bus_stations(mut self, path: impl Into<PathBuf>) -> Self {
        self.bus_stations = path.into();
        self
    }

    pub fn with_refresh(mut self, refresh: Duration) -> Self {
        self.refresh = refresh;
        self
    }
}

fn parse_positive(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(invalid(var, value, "must be greater than zero")),
        Ok(n) => Ok(n),
        Err(e) => Err(invalid(var, value, e)),
    }
}

fn invalid(var: &'static str, value: &str, message: impl ToString) -> ConfigError {
    ConfigError {
        var,
        value: value.to_string(),
        message: message.to_string(),
    }
}
