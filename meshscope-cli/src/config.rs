use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::io::ErrorKind;
use std::time::Duration;

use meshscope_client::api::DEFAULT_API_PREFIX;
use meshscope_client::reboot::{DEFAULT_DELAY, DEFAULT_INTERVAL};
use meshscope_client::RebootPoller;
use meshscope_core::telemetry::DEFAULT_CAPACITY;

pub const DEFAULT_CONFIG_PATH: &str = "meshscope.toml";
pub const DEFAULT_PALETTE_SEED: u64 = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    pub address: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            address: DEFAULT_API_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryConfig {
    pub capacity: usize,
    pub palette_seed: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        TelemetryConfig {
            capacity: DEFAULT_CAPACITY,
            palette_seed: DEFAULT_PALETTE_SEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RebootConfig {
    pub delay: Duration,
    pub interval: Duration,
}

impl Default for RebootConfig {
    fn default() -> Self {
        RebootConfig {
            delay: DEFAULT_DELAY,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl RebootConfig {
    pub fn poller(&self) -> RebootPoller {
        RebootPoller::new(self.delay, self.interval)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub node: NodeConfig,
    pub telemetry: TelemetryConfig,
    pub reboot: RebootConfig,
}

#[derive(Deserialize)]
struct NodePartial {
    address: Option<String>,
}

#[derive(Deserialize)]
struct TelemetryPartial {
    capacity: Option<usize>,
    palette_seed: Option<u64>,
}

#[derive(Deserialize)]
struct RebootPartial {
    delay_ms: Option<u64>,
    interval_ms: Option<u64>,
}

/// Loads configuration from the given TOML file; a missing file means defaults.
pub fn load_config(path: &str) -> Result<Config, Box<dyn Error>> {
    match fs::read_to_string(path) {
        Ok(s) => parse_config(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::warn!("Config file {} not found, using defaults", path);
            Ok(Config::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Parses TOML text, keeping defaults for every absent section or key.
pub fn parse_config(s: &str) -> Result<Config, Box<dyn Error>> {
    let val: toml::Value = toml::from_str(s)?;
    let table = val.as_table().ok_or("config is not a table")?;
    let mut config = Config::default();

    if let Some(v) = table.get("node") {
        let partial = v.clone().try_into::<NodePartial>()?;
        if let Some(x) = partial.address {
            config.node.address = resolve_address(&x);
        }
    }

    if let Some(v) = table.get("telemetry") {
        let partial = v.clone().try_into::<TelemetryPartial>()?;
        if let Some(x) = partial.capacity {
            if x == 0 {
                log::warn!("telemetry.capacity must be at least 1, using 1");
            }
            config.telemetry.capacity = x.max(1);
        }
        if let Some(x) = partial.palette_seed {
            config.telemetry.palette_seed = x;
        }
    }

    if let Some(v) = table.get("reboot") {
        let partial = v.clone().try_into::<RebootPartial>()?;
        if let Some(x) = partial.delay_ms {
            config.reboot.delay = Duration::from_millis(x);
        }
        if let Some(x) = partial.interval_ms {
            config.reboot.interval = Duration::from_millis(x);
        }
    }

    Ok(config)
}

/// Turns a bare host (`10.0.0.1`, `[fe80::1]:8080`) into an API prefix.
pub fn resolve_address(address: &str) -> String {
    let address = address.trim();
    let mut prefix = if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    };
    if !prefix.ends_with('/') {
        prefix.push('/');
    }
    prefix
}
