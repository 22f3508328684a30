use std::{collections::HashMap, fs, path::Path, time::Duration};

use thiserror::Error;
use tracing::warn;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "persons.toml";
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Re-fetch the current page after a successful delete.
    #[default]
    Refetch,
    /// Drop the row from the cached page without a round trip.
    Optimistic,
}

impl std::str::FromStr for DeletePolicy {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "refetch" => Ok(Self::Refetch),
            "optimistic" => Ok(Self::Optimistic),
            _ => Err(ConfigError::InvalidValue {
                key: "delete_policy",
                value: raw.to_string(),
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid base url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub person_service_url: String,
    pub demography_service_url: String,
    pub page_size: u32,
    pub request_timeout: Duration,
    pub delete_policy: DeletePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            person_service_url: "http://127.0.0.1:8080".into(),
            demography_service_url: "http://127.0.0.1:8081".into(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(10),
            delete_policy: DeletePolicy::Refetch,
        }
    }
}

/// Defaults, then `persons.toml` (or `path`), then the process environment.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    let explicit = path.is_some();
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw, &path.display().to_string())?,
        Err(source) if explicit => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            })
        }
        Err(_) => {}
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    settings.validate()?;
    Ok(settings)
}

pub(crate) fn apply_file(
    settings: &mut Settings,
    raw: &str,
    origin: &str,
) -> Result<(), ConfigError> {
    let file_cfg: HashMap<String, toml::Value> =
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })?;

    for (key, value) in file_cfg {
        let text = match &value {
            toml::Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        match key.as_str() {
            "person_service_url" => settings.person_service_url = text,
            "demography_service_url" => settings.demography_service_url = text,
            "page_size" => settings.page_size = parse_page_size(&text)?,
            "request_timeout_secs" => settings.request_timeout = parse_timeout(&text)?,
            "delete_policy" => settings.delete_policy = text.parse()?,
            other => warn!(key = other, origin, "config: ignoring unknown key"),
        }
    }
    Ok(())
}

pub(crate) fn apply_env(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    // Later names win, matching the precedence of the older front-end variables.
    for key in ["VITE_PERSON_SERVICE", "PERSON_SERVICE_URL", "APP__PERSON_SERVICE_URL"] {
        if let Some(v) = lookup(key) {
            settings.person_service_url = v;
        }
    }
    for key in [
        "VITE_DEMOGRAPHY_SERVICE",
        "DEMOGRAPHY_SERVICE_URL",
        "APP__DEMOGRAPHY_SERVICE_URL",
    ] {
        if let Some(v) = lookup(key) {
            settings.demography_service_url = v;
        }
    }
    if let Some(v) = lookup("APP__PAGE_SIZE") {
        settings.page_size = parse_page_size(&v)?;
    }
    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout = parse_timeout(&v)?;
    }
    if let Some(v) = lookup("APP__DELETE_POLICY") {
        settings.delete_policy = v.parse()?;
    }
    Ok(())
}

impl Settings {
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.person_service_url = normalize_base_url(&self.person_service_url)?;
        self.demography_service_url = normalize_base_url(&self.demography_service_url)?;
        Ok(())
    }
}

pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    Url::parse(trimmed).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    Ok(trimmed.to_string())
}

fn parse_page_size(raw: &str) -> Result<u32, ConfigError> {
    match raw.trim().parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ConfigError::InvalidValue {
            key: "page_size",
            value: raw.to_string(),
        }),
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::InvalidValue {
            key: "request_timeout_secs",
            value: raw.to_string(),
        })
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
