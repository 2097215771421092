use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_GOV24_BASE_URL: &str = "https://api.gov24.example.com";
pub const DEFAULT_GOV24_API_KEY: &str = "demo-key";
pub const DEFAULT_GITHUB_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_NOTION_API_BASE_URL: &str = "https://api.notion.com";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub gov24: Gov24Config,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let ansi = env::var("APP_LOG_ANSI")
            .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, ansi },
            gov24: Gov24Config::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Connection settings for the Gov24 issuance API.
///
/// A missing base URL or API key falls back to the documented demo values;
/// `defaults_applied` lists which variables were absent so the caller can
/// warn once logging is up.
#[derive(Debug, Clone)]
pub struct Gov24Config {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub defaults_applied: Vec<&'static str>,
}

impl Gov24Config {
    fn from_env() -> Result<Self, ConfigError> {
        let mut defaults_applied = Vec::new();

        let base_url = match non_empty_var("GOV24_API_BASE_URL") {
            Some(value) => value,
            None => {
                defaults_applied.push("GOV24_API_BASE_URL");
                DEFAULT_GOV24_BASE_URL.to_string()
            }
        };
        validate_base_url("GOV24_API_BASE_URL", &base_url)?;

        let api_key = match non_empty_var("GOV24_API_KEY") {
            Some(value) => value,
            None => {
                defaults_applied.push("GOV24_API_KEY");
                DEFAULT_GOV24_API_KEY.to_string()
            }
        };

        let timeout_secs = env::var("GOV24_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout)?;

        Ok(Self {
            base_url,
            api_key,
            timeout: Duration::from_secs(timeout_secs),
            defaults_applied,
        })
    }
}

/// Credentials and targets for the commit sync pipeline. Loaded on demand so
/// the issuance service can run without them.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub github_token: String,
    pub github_owner: String,
    pub github_repo: String,
    pub github_api_base_url: String,
    pub notion_token: String,
    pub notion_database_id: String,
    pub notion_api_base_url: String,
    pub per_page: u8,
    pub interval: Duration,
}

impl SyncConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let required = [
            "GITHUB_TOKEN",
            "GITHUB_OWNER",
            "GITHUB_REPO",
            "NOTION_TOKEN",
            "NOTION_DATABASE_ID",
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .copied()
            .filter(|name| non_empty_var(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingVars(missing));
        }

        let github_api_base_url = non_empty_var("GITHUB_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_GITHUB_API_BASE_URL.to_string());
        validate_base_url("GITHUB_API_BASE_URL", &github_api_base_url)?;
        let notion_api_base_url = non_empty_var("NOTION_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_NOTION_API_BASE_URL.to_string());
        validate_base_url("NOTION_API_BASE_URL", &notion_api_base_url)?;

        let per_page = env::var("SYNC_PER_PAGE")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u8>()
            .ok()
            .filter(|count| (1..=100).contains(count))
            .ok_or(ConfigError::InvalidPerPage)?;

        let interval_secs = env::var("SYNC_INTERVAL_SECS")
            .unwrap_or_else(|_| "300".to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidInterval)?;

        Ok(Self {
            github_token: required_var("GITHUB_TOKEN")?,
            github_owner: required_var("GITHUB_OWNER")?,
            github_repo: required_var("GITHUB_REPO")?,
            github_api_base_url,
            notion_token: required_var("NOTION_TOKEN")?,
            notion_database_id: required_var("NOTION_DATABASE_ID")?,
            notion_api_base_url,
            per_page,
            interval: Duration::from_secs(interval_secs),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    non_empty_var(name).ok_or(ConfigError::MissingVars(vec![name]))
}

fn validate_base_url(name: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidBaseUrl {
            name,
            value: value.to_string(),
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout,
    InvalidBaseUrl { name: &'static str, value: String },
    InvalidPerPage,
    InvalidInterval,
    MissingVars(Vec<&'static str>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "GOV24_TIMEOUT_SECS must be a positive number of seconds")
            }
            ConfigError::InvalidBaseUrl { name, value } => {
                write!(f, "{name} must be an http(s) URL, got '{value}'")
            }
            ConfigError::InvalidPerPage => write!(f, "SYNC_PER_PAGE must be between 1 and 100"),
            ConfigError::InvalidInterval => {
                write!(f, "SYNC_INTERVAL_SECS must be a positive number of seconds")
            }
            ConfigError::MissingVars(names) => {
                write!(f, "missing environment variables: {}", names.join(", "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
