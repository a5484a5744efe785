use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

#[derive(Debug)]
pub struct Config {
    /// Unset means the server keeps everything in memory.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub bind_addr: String,
}

impl Config {
    /// Reads the process environment. `.env` is picked up by
    /// [`crate::init_tracing`], which binaries call first.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            max_connections: try_load(&lookup, "DATABASE_MAX_CONNECTIONS", "5")?,
            bind_addr: try_load(&lookup, "BIND_ADDR", "0.0.0.0:3000")?,
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        anyhow::anyhow!("invalid {key} value {raw:?}: {e}")
    })
}
