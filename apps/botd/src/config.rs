//! Bot configuration.
//!
//! TOML at `~/.config/linkfetch/config.toml`, overridable with the
//! `LINKFETCH_CONFIG` environment variable. A missing file falls back to
//! defaults under `~/.local/share/linkfetch`.

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root directory downloads are stored under.
    pub storage_path: PathBuf,
    /// SQLite history database location.
    pub database_path: PathBuf,
    /// Directory the outbox relay delivers into.
    pub outbox_path: PathBuf,
    /// The single identity allowed to drive the bot.
    pub authorized_user: i64,
}

impl Default for Config {
    fn default() -> Self {
        let data = data_dir();
        Self {
            storage_path: data.join("files"),
            database_path: data.join("history.db"),
            outbox_path: data.join("outbox"),
            authorized_user: 0,
        }
    }
}

impl Config {
    /// Loads configuration, falling back to defaults when no file exists.
    pub fn load() -> anyhow::Result<Self> {
        let path = match std::env::var_os("LINKFETCH_CONFIG") {
            Some(path) => PathBuf::from(path),
            None => config_dir().join("config.toml"),
        };

        if !path.exists() {
            tracing::info!(config = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

fn config_dir() -> PathBuf {
    home_dir().join(".config/linkfetch")
}

fn data_dir() -> PathBuf {
    home_dir().join(".local/share/linkfetch")
}
