use crate::error::ConfigError;
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_GATEWAY_BASE_URL: &str = "https://apiinterna.ecompleto.com.br";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub access_token: String,
    pub gateway: GatewayConfig,
    pub pretty_report: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_redirects: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GATEWAY_BASE_URL.to_string(),
            timeout_secs: 30,
            max_redirects: 10,
        }
    }
}

/// Shape of the optional TOML config file. Every key may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub database_url: Option<String>,
    pub db_max_connections: Option<u32>,
    pub access_token: Option<String>,
    pub pretty_report: Option<bool>,
    #[serde(default)]
    pub gateway: FileGatewayConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileGatewayConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_redirects: Option<usize>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

impl Config {
    /// Loads the optional config file, then lets environment variables
    /// override it.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => FileConfig::from_path(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(file, |key| env::var(key).ok())
    }

    pub fn resolve<F>(file: FileConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = GatewayConfig::default();

        let access_token = lookup("PAGCOMPLETO_ACCESS_TOKEN")
            .or(file.access_token)
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing("PAGCOMPLETO_ACCESS_TOKEN"))?;

        Ok(Self {
            server_port: parsed(&lookup, "PORT")?.or(file.port).unwrap_or(9999),
            database_url: lookup("DATABASE_URL").or(file.database_url),
            db_max_connections: parsed(&lookup, "DB_MAX_CONNECTIONS")?
                .or(file.db_max_connections)
                .unwrap_or(5),
            access_token,
            gateway: GatewayConfig {
                base_url: lookup("GATEWAY_BASE_URL")
                    .or(file.gateway.base_url)
                    .unwrap_or(defaults.base_url),
                timeout_secs: parsed(&lookup, "GATEWAY_TIMEOUT_SECS")?
                    .or(file.gateway.timeout_secs)
                    .unwrap_or(defaults.timeout_secs),
                max_redirects: parsed(&lookup, "GATEWAY_MAX_REDIRECTS")?
                    .or(file.gateway.max_redirects)
                    .unwrap_or(defaults.max_redirects),
            },
            pretty_report: parsed(&lookup, "PRETTY_REPORT")?
                .or(file.pretty_report)
                .unwrap_or(true),
        })
    }
}

fn parsed<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
