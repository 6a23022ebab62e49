// src/config.rs
//! Service configuration, passed into the router at construction.
//!
//! Resolution: built-in defaults → optional `config/tag_trends.toml` →
//! `HOST` / `PORT` / `DEBUG` environment overrides.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::TrendsError;

pub const DEFAULT_CONFIG_PATH: &str = "config/tag_trends.toml";
pub const DEFAULT_DATASET_PATH: &str = "data/stackoverflow_tags_selected_2023-2025.csv";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_DEBUG: &str = "DEBUG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// CSV dataset with `Tag` and `Time` columns.
    pub dataset_path: PathBuf,
    /// Folder holding `index.html` and other front-end assets.
    pub static_dir: PathBuf,
    pub host: String,
    pub port: u16,
    /// Verbose logging. Only settable through `DEBUG`.
    #[serde(skip)]
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            debug: false,
        }
    }
}

impl AppConfig {
    /// Load from a TOML file; missing keys keep their defaults.
    pub fn load_from(path: &Path) -> Result<Self, TrendsError> {
        let content = fs::read_to_string(path)
            .map_err(|e| TrendsError::Config(format!("reading {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| TrendsError::Config(format!("parsing {}: {e}", path.display())))
    }

    /// Defaults, then `config/tag_trends.toml` if present, then the process environment.
    pub fn load() -> Result<Self, TrendsError> {
        let file = PathBuf::from(DEFAULT_CONFIG_PATH);
        let mut cfg = if file.exists() {
            Self::load_from(&file)?
        } else {
            Self::default()
        };
        cfg.apply_env_overrides(|k| std::env::var(k).ok())?;
        Ok(cfg)
    }

    /// Apply `HOST`, `PORT` and `DEBUG` from `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), TrendsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST).filter(|h| !h.trim().is_empty()) {
            self.host = host.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_PORT) {
            self.port = raw.trim().parse().map_err(|_| {
                TrendsError::Config(format!("{ENV_PORT} is not a valid port: {raw:?}"))
            })?;
        }
        if let Some(raw) = lookup(ENV_DEBUG) {
            self.debug = parse_flag(&raw);
        }
        Ok(())
    }

    /// `host:port`, resolved by the listener (host names allowed).
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn index_path(&self) -> PathBuf {
        self.static_dir.join("index.html")
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
