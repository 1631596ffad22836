use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Runtime configuration, read from the environment.
///
/// | Variable | Default |
/// |---|---|
/// | `PANTRY_BASE_URL` | `http://127.0.0.1:5000` |
/// | `PANTRY_DOWNLOAD_DIR` | current directory |
/// | `PANTRY_TIMEOUT_SECS` | no timeout |
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub download_dir: PathBuf,
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            download_dir: PathBuf::from("."),
            timeout: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let base_url = lookup("PANTRY_BASE_URL").unwrap_or(defaults.base_url);
        let download_dir = lookup("PANTRY_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.download_dir);
        let timeout = match lookup("PANTRY_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("PANTRY_TIMEOUT_SECS must be a number of seconds, got {:?}", raw))?;
                Some(Duration::from_secs(secs))
            }
            None => defaults.timeout,
        };

        Ok(Self {
            base_url,
            download_dir,
            timeout,
        })
    }
}
