use std::env;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

pub const DEFAULT_MODEL_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_FORWARD_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 50 * 1024 * 1024;
pub const DEFAULT_MOCK_DELAY_MS: u64 = 2000;
pub const DEFAULT_REGION: &str = "local";
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "https://your-frontend-vercel-app.vercel.app",
    "https://*.vercel.app",
];

const DEFAULT_PROXY_PORT: u16 = 8081;
const DEFAULT_MOCK_PORT: u16 = 8082;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
    #[error("Invalid MODEL_API_BASE_URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("Invalid CORS origin {0:?}")]
    InvalidOrigin(String),
}

/// Listener settings shared by the proxy and the mock deployable.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    fn from_lookup<F>(lookup: &F, default_port: u16) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = read_var(lookup, "HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_var(lookup, "PORT", default_port)?;
        let allowed_origins: Vec<String> = match read_var(lookup, "CORS_ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        for origin in &allowed_origins {
            if !origin.contains('*') && Url::parse(origin).is_err() {
                return Err(ConfigError::InvalidOrigin(origin.clone()));
            }
        }

        Ok(Self {
            host,
            port,
            allowed_origins,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Settings for the live forwarding proxy, read once at startup.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub server: ServerConfig,
    /// Stored without a trailing slash.
    pub model_api_base_url: String,
    pub forward_timeout: Duration,
    pub health_timeout: Duration,
    pub region: String,
    pub max_image_bytes: usize,
}

impl ProxyConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = ServerConfig::from_lookup(&lookup, DEFAULT_PROXY_PORT)?;
        let base_url = read_var(&lookup, "MODEL_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_MODEL_API_BASE_URL.to_string());

        Ok(Self {
            server,
            model_api_base_url: normalize_base_url(&base_url)?,
            forward_timeout: Duration::from_secs(parse_var(
                &lookup,
                "MODEL_API_TIMEOUT_SECS",
                DEFAULT_FORWARD_TIMEOUT_SECS,
            )?),
            health_timeout: Duration::from_secs(parse_var(
                &lookup,
                "MODEL_API_HEALTH_TIMEOUT_SECS",
                DEFAULT_HEALTH_TIMEOUT_SECS,
            )?),
            region: read_var(&lookup, "VERCEL_REGION")
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            max_image_bytes: parse_var(&lookup, "MAX_IMAGE_BYTES", DEFAULT_MAX_IMAGE_BYTES)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct MockConfig {
    pub server: ServerConfig,
    pub delay: Duration,
}

impl MockConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            server: ServerConfig::from_lookup(&lookup, DEFAULT_MOCK_PORT)?,
            delay: Duration::from_millis(parse_var(
                &lookup,
                "MOCK_DELAY_MS",
                DEFAULT_MOCK_DELAY_MS,
            )?),
        })
    }
}

fn read_var<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match read_var(lookup, name) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(raw).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {}", parsed.scheme()),
        });
    }

    Ok(raw.trim_end_matches('/').to_string())
}
