use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::{anyhow, Context};
use serde::Deserialize;
use tracing::warn;
use url::Url;

use shared::domain::RecordId;

use crate::{error::SubmissionError, transport::BodyEncoding};

pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

const CREATE_ROUTE: &str = "auth/add_advertisement";
const UPDATE_ROUTE: &str = "auth/update_advertisement";
const DELETE_ROUTE: &str = "auth/delete_ad";
const DASHBOARD_ROUTE: &str = "auth/dashboard";

/// What the create flow does when the request itself fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateFailurePolicy {
    #[default]
    RedirectToDashboard,
    StayOnForm,
}

impl std::str::FromStr for CreateFailurePolicy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "redirect" | "redirect_to_dashboard" => Ok(Self::RedirectToDashboard),
            "stay" | "stay_on_form" => Ok(Self::StayOnForm),
            other => Err(format!("unknown create failure policy '{other}'")),
        }
    }
}

/// Absolute targets for every submission flow. Built once and handed to the
/// client at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub create: Url,
    pub update: Url,
    pub delete: Url,
    pub dashboard: Url,
}

impl Endpoints {
    /// Derives the default routes below `base`, keeping any path prefix it has.
    pub fn from_base(base: &Url) -> Result<Self, url::ParseError> {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            create: base.join(CREATE_ROUTE)?,
            update: base.join(UPDATE_ROUTE)?,
            delete: base.join(DELETE_ROUTE)?,
            dashboard: base.join(DASHBOARD_ROUTE)?,
        })
    }

    /// Delete target for one record: the id becomes the last path segment.
    pub fn delete_target(&self, id: &RecordId) -> Result<Url, SubmissionError> {
        let mut url = self.delete.clone();
        url.path_segments_mut()
            .map_err(|()| SubmissionError::InvalidTarget {
                url: self.delete.to_string(),
            })?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub create_url: Option<String>,
    pub update_url: Option<String>,
    pub delete_url: Option<String>,
    pub dashboard_url: Option<String>,
    pub reload_delay_ms: u64,
    pub create_encoding: BodyEncoding,
    pub create_failure_policy: CreateFailurePolicy,
    pub request_timeout_ms: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".into(),
            create_url: None,
            update_url: None,
            delete_url: None,
            dashboard_url: None,
            reload_delay_ms: 1000,
            create_encoding: BodyEncoding::Form,
            create_failure_policy: CreateFailurePolicy::RedirectToDashboard,
            request_timeout_ms: None,
        }
    }
}

impl Settings {
    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(self.reload_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Resolves the configured targets. Explicit URLs win over routes derived
    /// from `base_url`.
    pub fn endpoints(&self) -> anyhow::Result<Endpoints> {
        let base = Url::parse(self.base_url.trim())
            .with_context(|| format!("invalid base url '{}'", self.base_url))?;
        let mut endpoints = Endpoints::from_base(&base)
            .with_context(|| format!("failed to derive routes from '{base}'"))?;

        override_url(&mut endpoints.create, self.create_url.as_deref(), "create")?;
        override_url(&mut endpoints.update, self.update_url.as_deref(), "update")?;
        override_url(&mut endpoints.delete, self.delete_url.as_deref(), "delete")?;
        override_url(
            &mut endpoints.dashboard,
            self.dashboard_url.as_deref(),
            "dashboard",
        )?;

        Ok(endpoints)
    }
}

fn override_url(target: &mut Url, raw: Option<&str>, name: &str) -> anyhow::Result<()> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(());
    };
    *target = Url::parse(raw).with_context(|| format!("invalid {name} url '{raw}'"))?;
    Ok(())
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(DEFAULT_CONFIG_FILE))
}

pub fn load_settings_from(path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Err(err) = apply_file_overrides(&mut settings, &raw) {
            warn!(path = %path.display(), "ignoring unreadable config file: {err:#}");
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

pub fn apply_file_overrides(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg =
        toml::from_str::<HashMap<String, toml::Value>>(raw).context("invalid TOML")?;

    for (key, value) in file_cfg {
        let text = match value {
            toml::Value::String(text) => text,
            toml::Value::Integer(number) => number.to_string(),
            toml::Value::Boolean(flag) => flag.to_string(),
            other => {
                return Err(anyhow!("unsupported value for '{key}': {other}"));
            }
        };
        apply_setting(settings, &key, text);
    }

    Ok(())
}

/// Overlays environment values. `APP__*` names take precedence over the
/// shorter `ADV_*` aliases.
pub fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    const KEYS: [(&str, &str, &str); 9] = [
        ("ADV_BASE_URL", "APP__BASE_URL", "base_url"),
        ("ADV_CREATE_URL", "APP__CREATE_URL", "create_url"),
        ("ADV_UPDATE_URL", "APP__UPDATE_URL", "update_url"),
        ("ADV_DELETE_URL", "APP__DELETE_URL", "delete_url"),
        ("ADV_DASHBOARD_URL", "APP__DASHBOARD_URL", "dashboard_url"),
        ("ADV_RELOAD_DELAY_MS", "APP__RELOAD_DELAY_MS", "reload_delay_ms"),
        ("ADV_CREATE_ENCODING", "APP__CREATE_ENCODING", "create_encoding"),
        (
            "ADV_CREATE_FAILURE_POLICY",
            "APP__CREATE_FAILURE_POLICY",
            "create_failure_policy",
        ),
        ("ADV_REQUEST_TIMEOUT_MS", "APP__REQUEST_TIMEOUT_MS", "request_timeout_ms"),
    ];

    for (short, namespaced, key) in KEYS {
        if let Some(v) = lookup(short) {
            apply_setting(settings, key, v);
        }
        if let Some(v) = lookup(namespaced) {
            apply_setting(settings, key, v);
        }
    }
}

fn apply_setting(settings: &mut Settings, key: &str, value: String) {
    match key {
        "base_url" => settings.base_url = value,
        "create_url" => settings.create_url = Some(value),
        "update_url" => settings.update_url = Some(value),
        "delete_url" => settings.delete_url = Some(value),
        "dashboard_url" => settings.dashboard_url = Some(value),
        "reload_delay_ms" => match value.trim().parse::<u64>() {
            Ok(parsed) => settings.reload_delay_ms = parsed,
            Err(_) => warn!(value = %value, "ignoring invalid reload_delay_ms"),
        },
        "request_timeout_ms" => match value.trim().parse::<u64>() {
            Ok(0) => settings.request_timeout_ms = None,
            Ok(parsed) => settings.request_timeout_ms = Some(parsed),
            Err(_) => warn!(value = %value, "ignoring invalid request_timeout_ms"),
        },
        "create_encoding" => match value.parse() {
            Ok(parsed) => settings.create_encoding = parsed,
            Err(err) => warn!("{err}"),
        },
        "create_failure_policy" => match value.parse() {
            Ok(parsed) => settings.create_failure_policy = parsed,
            Err(err) => warn!("{err}"),
        },
        other => warn!(key = other, "ignoring unknown setting"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
