use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;
use shared::protocol::{DEFAULT_FILE_NAME, DEFAULT_LANGUAGE};
use thiserror::Error;
use url::Url;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";
pub const DEFAULT_CONFIG_FILE: &str = "testgen.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub service_url: String,
    pub file_name: String,
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.into(),
            file_name: DEFAULT_FILE_NAME.into(),
            language: DEFAULT_LANGUAGE.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    service_url: Option<String>,
    file_name: Option<String>,
    language: Option<String>,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid service url '{url}': {reason}")]
    InvalidServiceUrl { url: String, reason: String },
}

/// Defaults, then the TOML file, then environment. An explicitly named file must exist;
/// the default `testgen.toml` is optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let raw = match config_path {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?,
        ),
        None => fs::read_to_string(DEFAULT_CONFIG_FILE).ok(),
    };
    if let Some(raw) = raw {
        apply_file(&mut settings, &raw).with_context(|| {
            format!(
                "failed to parse config file '{}'",
                config_path
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string())
            )
        })?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings.service_url = normalize_service_url(&settings.service_url)?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.service_url {
        settings.service_url = v;
    }
    if let Some(v) = file_cfg.file_name {
        settings.file_name = v;
    }
    if let Some(v) = file_cfg.language {
        settings.language = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("TESTGEN_SERVICE_URL") {
        settings.service_url = v;
    }
    if let Some(v) = lookup("APP__SERVICE_URL") {
        settings.service_url = v;
    }
    if let Some(v) = lookup("TESTGEN_FILE_NAME") {
        settings.file_name = v;
    }
    if let Some(v) = lookup("TESTGEN_LANGUAGE") {
        settings.language = v;
    }
}

pub fn normalize_service_url(raw_service_url: &str) -> Result<String, SettingsError> {
    let raw_service_url = raw_service_url.trim();
    if raw_service_url.is_empty() {
        return Ok(DEFAULT_SERVICE_URL.to_string());
    }

    let candidate = if raw_service_url.contains("://") {
        raw_service_url.to_string()
    } else {
        format!("http://{raw_service_url}")
    };

    let parsed = Url::parse(&candidate).map_err(|err| SettingsError::InvalidServiceUrl {
        url: raw_service_url.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(SettingsError::InvalidServiceUrl {
            url: raw_service_url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
