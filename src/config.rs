//! Runtime configuration for the backend binary.
//!
//! The server is constructed from exactly one [`ServerConfig`]; nothing else
//! in the crate reads the process environment.

use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloads";
pub const DEFAULT_YTDLP_PROGRAM: &str = "yt-dlp";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub download_dir: PathBuf,
    pub ytdlp_program: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            ytdlp_program: PathBuf::from(DEFAULT_YTDLP_PROGRAM),
        }
    }
}

impl ServerConfig {
    /// Reads configuration from the process environment. `PORT` keeps its
    /// historical unprefixed name; the remaining variables are namespaced.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] but with an injected lookup so
    /// tests can supply variables without touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup("PORT")
            && !value.is_empty()
        {
            config.port = value
                .parse()
                .with_context(|| format!("parsing PORT value {value:?}"))?;
        }
        if let Some(value) = lookup("TUBEGRAB_HOST")
            && !value.is_empty()
        {
            config.host = value;
        }
        if let Some(value) = lookup("TUBEGRAB_DOWNLOAD_DIR")
            && !value.is_empty()
        {
            config.download_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("TUBEGRAB_YTDLP")
            && !value.is_empty()
        {
            config.ytdlp_program = PathBuf::from(value);
        }

        Ok(config)
    }
}
