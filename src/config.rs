use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// Environment variable naming a YAML config file.
pub const CONFIG_ENV: &str = "HTSERVE_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    /// One of `trace`, `debug`, `info`, `warn`, `error`
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Size of each socket read
    pub read_buffer_size: usize,
    /// Largest request line plus headers accepted, in bytes
    pub max_head_size: usize,
    /// Longest request target accepted, in bytes
    pub max_uri_len: usize,
    /// Largest request body accepted, in bytes
    pub max_body_size: usize,
    /// Allow persistent connections
    pub keep_alive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8888".to_string(),
            read_buffer_size: 1024,
            max_head_size: 8 * 1024,
            max_uri_len: 2 * 1024,
            max_body_size: 1024 * 1024,
            keep_alive: true,
        }
    }
}

impl Config {
    /// Loads the configuration from the process environment.
    ///
    /// Reads the file named by `HTSERVE_CONFIG` if set, then applies the
    /// `LISTEN` and `LOG_LEVEL` overrides.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Like [`load`](Self::load) with a custom variable lookup.
    pub fn load_with<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match lookup(CONFIG_ENV) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Some(addr) = lookup("LISTEN") {
            cfg.server.listen_addr = addr;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            cfg.log_level = level;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn log_level(&self) -> anyhow::Result<tracing::Level> {
        self.log_level
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid log level: {}", self.log_level))
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.server.read_buffer_size == 0 {
            anyhow::bail!("server.read_buffer_size must be greater than zero");
        }
        if self.server.max_head_size == 0 || self.server.max_uri_len == 0 {
            anyhow::bail!("server.max_head_size and server.max_uri_len must be greater than zero");
        }
        self.log_level()?;
        Ok(())
    }
}
