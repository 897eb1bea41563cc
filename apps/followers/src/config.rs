use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use client_core::{github, GithubClientOptions};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "followers.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub database_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub github_token: Option<String>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: github::DEFAULT_API_BASE_URL.into(),
            database_url: "sqlite://./data/favorites.db".into(),
            request_timeout_secs: 15,
            user_agent: github::DEFAULT_USER_AGENT.into(),
            github_token: None,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn github_options(&self) -> GithubClientOptions {
        GithubClientOptions {
            api_base_url: self.api_base_url.clone(),
            user_agent: self.user_agent.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            token: self.github_token.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    database_url: Option<String>,
    request_timeout_secs: Option<u64>,
    user_agent: Option<String>,
    github_token: Option<String>,
    log_filter: Option<String>,
}

/// Defaults, then the config file, then environment variables.
///
/// An explicitly requested config file must exist; the default
/// `followers.toml` is optional.
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();

    let file_cfg = match config_path {
        Some(path) => Some(read_file_settings(path)?),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                Some(read_file_settings(&default_path)?)
            } else {
                None
            }
        }
    };
    if let Some(file_cfg) = file_cfg {
        apply_file(&mut settings, file_cfg);
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn read_file_settings(path: &Path) -> Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("invalid config file '{}'", path.display()))
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file_cfg.database_url {
        settings.database_url = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file_cfg.user_agent {
        settings.user_agent = v;
    }
    if let Some(v) = file_cfg.github_token {
        settings.github_token = Some(v);
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("GITHUB_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = var("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = var("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    if let Some(v) = var("APP__USER_AGENT") {
        settings.user_agent = v;
    }

    if let Some(v) = var("GITHUB_TOKEN") {
        settings.github_token = Some(v);
    }
    if let Some(v) = var("APP__GITHUB_TOKEN") {
        settings.github_token = Some(v);
    }

    if let Some(v) = var("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}

/// Turns a bare file path into a sqlite url; urls pass through unchanged.
pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite:") || raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
