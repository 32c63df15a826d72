use log::warn;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 18000;
const DEFAULT_AUTOSAVE_QUIET_SECS: u64 = 3;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub data_dir: Option<PathBuf>,
    pub autosave_quiet_period: Duration,
    pub demo_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: DEFAULT_PORT,
            data_dir: None,
            autosave_quiet_period: Duration::from_secs(DEFAULT_AUTOSAVE_QUIET_SECS),
            demo_mode: false,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = ServerConfig::default();

        ServerConfig {
            port: parse_or(&lookup, "PORT", defaults.port),
            data_dir: lookup("DATA_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            autosave_quiet_period: Duration::from_secs(parse_or(
                &lookup,
                "AUTOSAVE_QUIET_SECS",
                DEFAULT_AUTOSAVE_QUIET_SECS,
            )),
            demo_mode: lookup("MODE").as_deref() == Some("DEMO"),
        }
    }
}

fn parse_or<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("invalid {} value '{}', using default", key, raw);
            default
        }),
        None => default,
    }
}
