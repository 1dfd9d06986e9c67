// src/config.rs
//! Environment-driven service configuration.

use std::net::SocketAddr;
use std::time::Duration;

pub const ENV_PORT: &str = "PORT";
pub const ENV_BULK_SLANG_URL: &str = "SLANG_BULK_URL";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "SLANG_FETCH_TIMEOUT_SECS";
pub const ENV_CLASSIFIER_MODE: &str = "CLASSIFIER_MODE";
pub const ENV_CLASSIFIER_URL: &str = "CLASSIFIER_URL";

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BULK_SLANG_URL: &str =
    "https://huggingface.co/datasets/theonlydo/indonesia-slang/resolve/main/slang-indo.csv";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

/// Which classifier backend to build at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierMode {
    /// Bundled keyword-weight lexicon; deterministic, no network.
    Lexicon,
    /// Remote inference endpoint returning per-item probability pairs.
    Remote,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub bulk_slang_url: String,
    pub fetch_timeout: Duration,
    pub classifier_mode: ClassifierMode,
    pub classifier_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var(ENV_PORT)
            .ok()
            .and_then(|v| v.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let bulk_slang_url = std::env::var(ENV_BULK_SLANG_URL)
            .unwrap_or_else(|_| DEFAULT_BULK_SLANG_URL.to_string());

        let fetch_timeout = std::env::var(ENV_FETCH_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS));

        let classifier_mode = match std::env::var(ENV_CLASSIFIER_MODE)
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str()
        {
            "remote" => ClassifierMode::Remote,
            _ => ClassifierMode::Lexicon,
        };

        let classifier_url = std::env::var(ENV_CLASSIFIER_URL).ok();

        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            bulk_slang_url,
            fetch_timeout,
            classifier_mode,
            classifier_url,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            bulk_slang_url: DEFAULT_BULK_SLANG_URL.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            classifier_mode: ClassifierMode::Lexicon,
            classifier_url: None,
        }
    }
}
