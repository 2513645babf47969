use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "server.toml";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub solver_url: Option<String>,
    pub classifier_url: Option<String>,
    pub solver_timeout_seconds: u64,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5001".into(),
            solver_url: None,
            classifier_url: None,
            solver_timeout_seconds: 20,
            max_body_bytes: 8 * 1024 * 1024,
        }
    }
}

impl Settings {
    pub fn solver_timeout(&self) -> Duration {
        Duration::from_secs(self.solver_timeout_seconds)
    }
}

pub fn load_settings() -> anyhow::Result<Settings> {
    let mut settings = Settings::default();
    apply_file(&mut settings, Path::new(DEFAULT_CONFIG_PATH))?;
    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, path: &Path) -> anyhow::Result<()> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };
    apply_toml(settings, &raw).with_context(|| format!("invalid config file '{}'", path.display()))
}

fn apply_toml(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(raw)?;

    if let Some(v) = file_cfg.get("bind_addr").and_then(toml::Value::as_str) {
        settings.server_bind = v.to_string();
    }
    if let Some(v) = file_cfg.get("solver_url").and_then(toml::Value::as_str) {
        settings.solver_url = Some(v.to_string());
    }
    if let Some(v) = file_cfg.get("classifier_url").and_then(toml::Value::as_str) {
        settings.classifier_url = Some(v.to_string());
    }
    if let Some(v) = file_cfg
        .get("solver_timeout_seconds")
        .and_then(toml::Value::as_integer)
    {
        settings.solver_timeout_seconds = u64::try_from(v).context("solver_timeout_seconds")?;
    }
    if let Some(v) = file_cfg.get("max_body_bytes").and_then(toml::Value::as_integer) {
        settings.max_body_bytes = usize::try_from(v).context("max_body_bytes")?;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = var("SOLVER_URL") {
        settings.solver_url = Some(v);
    }
    if let Some(v) = var("APP__SOLVER_URL") {
        settings.solver_url = Some(v);
    }
    settings.solver_url = non_blank(settings.solver_url.take());

    if let Some(v) = var("CLASSIFIER_URL") {
        settings.classifier_url = Some(v);
    }
    if let Some(v) = var("APP__CLASSIFIER_URL") {
        settings.classifier_url = Some(v);
    }
    settings.classifier_url = non_blank(settings.classifier_url.take());

    if let Some(v) = var("APP__SOLVER_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.solver_timeout_seconds = parsed;
        }
    }
    if let Some(v) = var("APP__MAX_BODY_BYTES") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.max_body_bytes = parsed;
        }
    }
}

fn non_blank(url: Option<String>) -> Option<String> {
    url.map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
