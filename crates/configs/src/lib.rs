use std::net::{IpAddr, SocketAddr};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

/// Environment variable carrying the listening port.
pub const PORT_ENV: &str = "REST_PORT";
/// Port used when `REST_PORT` is unset or empty.
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
const DEFAULT_WORKER_THREADS: usize = 4;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            worker_threads: Some(DEFAULT_WORKER_THREADS),
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

/// Where the effective port came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSource {
    Env,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPort {
    pub port: u16,
    pub source: PortSource,
}

/// Resolve the port from the raw `REST_PORT` value.
///
/// Unset or blank falls back to [`DEFAULT_PORT`]; anything else must be a
/// port in `1..=65535`.
pub fn resolve_port(raw: Option<&str>) -> Result<ResolvedPort> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(ResolvedPort {
            port: DEFAULT_PORT,
            source: PortSource::Default,
        }),
        Some(v) => {
            let port: u16 = v
                .parse()
                .with_context(|| format!("{PORT_ENV} must be a port number, got {v:?}"))?;
            if port == 0 {
                return Err(anyhow!("{PORT_ENV} must be in 1..=65535"));
            }
            Ok(ResolvedPort {
                port,
                source: PortSource::Env,
            })
        }
    }
}

pub fn port_from_env() -> Result<ResolvedPort> {
    resolve_port(std::env::var(PORT_ENV).ok().as_deref())
}

/// Path of the optional TOML file: explicit override, `CONFIG_PATH`, or `config.toml`.
pub fn config_path(explicit: Option<&str>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var("CONFIG_PATH").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

/// Load the file if it exists; a missing file yields `None`, a broken one is an error.
pub fn load_optional(path: &str) -> Result<Option<AppConfig>> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse(&content)
            .with_context(|| format!("invalid config file {path}"))
            .map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(anyhow!("cannot read {path}: {e}")),
    }
}

/// `TOKIO_WORKER_THREADS`, used when no config file is present.
pub fn worker_threads_from_env() -> Option<usize> {
    std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|w| *w > 0)
}

impl AppConfig {
    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize();
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(DEFAULT_WORKER_THREADS),
        }
    }

    /// Socket address to bind for the given port. `host` must be an IP literal.
    pub fn bind_addr(&self, port: u16) -> Result<SocketAddr> {
        let host = self.host.trim();
        let ip = host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .with_context(|| format!("invalid listen host {:?}", self.host))?;
        Ok(SocketAddr::new(ip, port))
    }
}

/// Whether a `--addr` value (`host:port` or `:port`) names the same endpoint
/// as `effective`. An empty host matches any host.
pub fn addr_flag_matches(flag: &str, effective: SocketAddr) -> bool {
    let Some((host, port)) = flag.trim().rsplit_once(':') else {
        return false;
    };
    if port.parse::<u16>().ok() != Some(effective.port()) {
        return false;
    }
    let host = host.trim_start_matches('[').trim_end_matches(']');
    host.is_empty() || host.parse::<IpAddr>().ok() == Some(effective.ip())
}
