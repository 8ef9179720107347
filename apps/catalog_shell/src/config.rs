use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use shared::domain::Locale;
use tracing::warn;

use crate::controller::orchestration::DEFAULT_REDIRECT_DELAY;
use crate::ui::notifications::DEFAULT_NOTIFICATION_TTL;

pub const SETTINGS_FILE: &str = "catalog.toml";
pub const STORE_FILE_NAME: &str = "local_storage.json";
const APP_DIR_NAME: &str = "library_catalog";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `None` means the platform data directory.
    pub data_dir: Option<PathBuf>,
    pub locale: Locale,
    pub notification_ttl: Duration,
    pub login_redirect_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            locale: Locale::default(),
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
            login_redirect_delay: DEFAULT_REDIRECT_DELAY,
        }
    }
}

impl Settings {
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR_NAME)
        })
    }

    pub fn store_path(&self) -> PathBuf {
        self.resolved_data_dir().join(STORE_FILE_NAME)
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then `file` when it parses, then environment overrides.
pub fn load_settings_from(file: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(file) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => apply_file(&mut settings, &file_cfg),
            Err(err) => warn!(path = %file.display(), error = %err, "ignoring unreadable settings file"),
        }
    }

    if let Some(v) = env("CATALOG_DATA_DIR") {
        settings.data_dir = Some(PathBuf::from(v));
    }
    if let Some(v) = env("APP__DATA_DIR") {
        settings.data_dir = Some(PathBuf::from(v));
    }

    if let Some(v) = env("APP__LOCALE") {
        set_locale(&mut settings, &v);
    }

    if let Some(v) = env("APP__NOTIFICATION_TTL_MS") {
        set_millis(&mut settings.notification_ttl, "APP__NOTIFICATION_TTL_MS", &v);
    }
    if let Some(v) = env("APP__REDIRECT_DELAY_MS") {
        set_millis(&mut settings.login_redirect_delay, "APP__REDIRECT_DELAY_MS", &v);
    }

    settings
}

fn apply_file(settings: &mut Settings, file_cfg: &HashMap<String, toml::Value>) {
    if let Some(v) = file_cfg.get("data_dir").and_then(toml::Value::as_str) {
        settings.data_dir = Some(PathBuf::from(v));
    }
    if let Some(v) = file_cfg.get("locale").and_then(toml::Value::as_str) {
        set_locale(settings, v);
    }
    if let Some(v) = file_cfg
        .get("notification_ttl_ms")
        .and_then(toml::Value::as_integer)
    {
        set_millis(&mut settings.notification_ttl, "notification_ttl_ms", &v.to_string());
    }
    if let Some(v) = file_cfg
        .get("redirect_delay_ms")
        .and_then(toml::Value::as_integer)
    {
        set_millis(&mut settings.login_redirect_delay, "redirect_delay_ms", &v.to_string());
    }
}

fn set_locale(settings: &mut Settings, raw: &str) {
    match raw.parse::<Locale>() {
        Ok(locale) => settings.locale = locale,
        Err(err) => warn!(value = raw, error = %err, "ignoring unknown locale"),
    }
}

fn set_millis(target: &mut Duration, key: &str, raw: &str) {
    match raw.trim().parse::<u64>() {
        Ok(ms) => *target = Duration::from_millis(ms),
        Err(_) => warn!(key, value = raw, "ignoring non-numeric duration"),
    }
}
