use anyhow::{bail, Context, Result};
use chrono::Duration;
use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

const DEFAULT_ADMIN_PASSWORD: &str = "change-me";

/// One year
pub const MAX_SESSION_TTL_MINUTES: u32 = 525_600;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_path: Option<PathBuf>,
    pub seed_path: Option<PathBuf>,
    pub feed_url: Option<String>,
    pub admin_user: String,
    pub admin_password: String,
    pub session_ttl_minutes: u32,
    pub similar_limit: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `load` passes the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let admin_password = lookup("ESTATES_ADMIN_PASSWORD").unwrap_or_else(|| {
            warn!("ESTATES_ADMIN_PASSWORD not set, using the default password");
            DEFAULT_ADMIN_PASSWORD.to_string()
        });

        let session_ttl_minutes: u32 = try_load(&lookup, "ESTATES_SESSION_TTL_MINUTES", "480")?;
        if session_ttl_minutes == 0 || session_ttl_minutes > MAX_SESSION_TTL_MINUTES {
            bail!(
                "ESTATES_SESSION_TTL_MINUTES must be between 1 and {MAX_SESSION_TTL_MINUTES}, got {session_ttl_minutes}"
            );
        }

        Ok(Self {
            host: try_load(&lookup, "ESTATES_HOST", "0.0.0.0")?,
            port: try_load(&lookup, "ESTATES_PORT", "8080")?,
            data_path: lookup("ESTATES_DATA_PATH").map(PathBuf::from),
            seed_path: lookup("ESTATES_SEED_PATH").map(PathBuf::from),
            feed_url: lookup("ESTATES_FEED_URL").filter(|url| !url.trim().is_empty()),
            admin_user: try_load(&lookup, "ESTATES_ADMIN_USER", "admin")?,
            admin_password,
            session_ttl_minutes,
            similar_limit: try_load(&lookup, "ESTATES_SIMILAR_LIMIT", "4")?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::minutes(i64::from(self.session_ttl_minutes))
    }
}

fn try_load<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value '{raw}'"))
}
