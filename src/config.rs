//! Mimic configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::time::Duration;

/// Top-level Mimic configuration.
///
/// Loaded once at startup via [`MimicConfig::from_env`].
#[derive(Debug, Clone)]
pub struct MimicConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8900`).
    pub listen_addr: SocketAddr,

    /// Regions every mocked service is available in.
    pub regions: Vec<String>,

    /// Number of load balancer pools seeded for each new tenant/region.
    pub default_pools: usize,

    /// Follow wall-clock time instead of the manually advanced clock.
    pub realtime: bool,

    /// How long a pool node stays `ADDING` before it becomes `ACTIVE`.
    /// `None` keeps nodes `ADDING` forever.
    pub node_activation: Option<Duration>,

    /// Maximum number of nodes on one cloud load balancer.
    pub clb_max_nodes: usize,

    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl Default for MimicConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8900)),
            regions: vec!["ORD".to_string()],
            default_pools: 1,
            realtime: false,
            node_activation: None,
            clb_max_nodes: 25,
            log_json: false,
        }
    }
}

impl MimicConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to the [`Default`] values when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`], if `MIMIC_REGIONS` is set but names no region, or
    /// if `MIMIC_NODE_ACTIVATION_SECS` is not a whole number of seconds that
    /// fits a date-time offset.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr: SocketAddr = match std::env::var("LISTEN_ADDR") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.listen_addr,
        };

        let regions = match std::env::var("MIMIC_REGIONS") {
            Ok(raw) => {
                let regions = parse_regions(&raw);
                if regions.is_empty() {
                    return Err(format!("MIMIC_REGIONS names no region: {raw:?}").into());
                }
                regions
            }
            Err(_) => defaults.regions,
        };

        let default_pools = parse_env("MIMIC_DEFAULT_POOLS", defaults.default_pools);
        let realtime = parse_env_bool("MIMIC_REALTIME", defaults.realtime);
        let node_activation = match std::env::var("MIMIC_NODE_ACTIVATION_SECS") {
            Ok(raw) => Some(parse_activation_secs(&raw)?),
            Err(_) => defaults.node_activation,
        };
        let clb_max_nodes = parse_env("MIMIC_CLB_MAX_NODES", defaults.clb_max_nodes);
        let log_json = std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(defaults.log_json);

        Ok(Self {
            listen_addr,
            regions,
            default_pools,
            realtime,
            node_activation,
            clb_max_nodes,
            log_json,
        })
    }
}

/// Splits a comma-separated region list, trimming blanks and upper-casing.
fn parse_regions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_ascii_uppercase)
        .collect()
}

/// Parses a node activation delay in whole seconds, rejecting values too
/// large to add to a timestamp.
fn parse_activation_secs(raw: &str) -> Result<Duration, String> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("MIMIC_NODE_ACTIVATION_SECS is not a number of seconds: {raw:?}"))?;
    i64::try_from(secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .ok_or_else(|| format!("MIMIC_NODE_ACTIVATION_SECS is out of range: {secs}"))?;
    Ok(Duration::from_secs(secs))
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref() {
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => true,
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => false,
        _ => default,
    }
}
