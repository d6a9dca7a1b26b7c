use std::str::FromStr;
use std::time::Duration;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// Which key-value backend holds the statuses.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Redis,
    Memory,
    File,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            other => Err(anyhow!("store.backend must be one of redis, memory, file (got {other:?})")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_file_path")]
    pub file_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: String::new(),
            timeout_ms: default_timeout_ms(),
            file_path: default_file_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_timeout_ms() -> u64 { 3000 }
fn default_file_path() -> String { "data/statuses.json".into() }
fn default_log_format() -> String { "compact".into() }
fn default_redis_url() -> String { "redis://127.0.0.1:6379/".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    AppConfig::from_toml_str(&content)
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let cfg: AppConfig = toml::from_str(content)?;
        Ok(cfg)
    }

    /// Build a config purely from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from a variable lookup; unset variables keep defaults.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = AppConfig::default();
        if let Some(host) = get("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = get("SERVER_PORT") {
            cfg.server.port = port
                .trim()
                .parse()
                .map_err(|e| anyhow!("SERVER_PORT is not a valid port: {e}"))?;
        }
        if let Some(w) = get("TOKIO_WORKER_THREADS") {
            let threads = w
                .trim()
                .parse()
                .map_err(|e| anyhow!("TOKIO_WORKER_THREADS is not a number: {e}"))?;
            cfg.server.worker_threads = Some(threads);
        }
        if let Some(backend) = get("STORE_BACKEND") {
            cfg.store.backend = backend.parse()?;
        }
        if let Some(url) = get("REDIS_URL") {
            cfg.store.url = url;
        }
        if let Some(ms) = get("STORE_TIMEOUT_MS") {
            cfg.store.timeout_ms = ms
                .trim()
                .parse()
                .map_err(|e| anyhow!("STORE_TIMEOUT_MS is not a number: {e}"))?;
        }
        if let Some(path) = get("STORE_FILE_PATH") {
            cfg.store.file_path = path;
        }
        if let Some(format) = get("LOG_FORMAT") {
            cfg.logging.format = format;
        }
        Ok(cfg)
    }

    /// Load from the TOML file when it exists, otherwise from the environment,
    /// then normalize and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_missing_file(&e) => Self::from_env()?,
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.store.normalize_from_env();
        self.store.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

fn is_missing_file(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StoreConfig {
    /// Fill the Redis URL from `REDIS_URL` when the file left it empty.
    pub fn normalize_from_env(&mut self) {
        if self.backend == StoreBackend::Redis && self.url.trim().is_empty() {
            self.url = std::env::var("REDIS_URL").unwrap_or_else(|_| default_redis_url());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(anyhow!("store.timeout_ms must be a positive number of milliseconds"));
        }
        match self.backend {
            StoreBackend::Redis => {
                let lower = self.url.trim().to_lowercase();
                if !(lower.starts_with("redis://") || lower.starts_with("rediss://")) {
                    return Err(anyhow!("store.url must start with redis:// or rediss://"));
                }
            }
            StoreBackend::File => {
                if self.file_path.trim().is_empty() {
                    return Err(anyhow!("store.file_path is required for the file backend"));
                }
            }
            StoreBackend::Memory => {}
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<()> {
        match self.format.as_str() {
            "compact" | "json" => Ok(()),
            other => Err(anyhow!("logging.format must be compact or json (got {other:?})")),
        }
    }
}
