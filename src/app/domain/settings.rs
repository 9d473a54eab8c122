use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app::infrastructure::error::AppError;

pub const DEFAULT_THEME: &str = "red";
pub const DEFAULT_FONT_SIZE: u32 = 12;
/// Smallest editor font size, for stored settings and zooming alike.
pub const MIN_FONT_SIZE: u32 = 8;

/// Which credential an integration is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    LlmApiKey,
    Telegram,
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::LlmApiKey => f.write_str("LLM API key"),
            Credential::Telegram => f.write_str("Telegram bot token and chat ID"),
        }
    }
}

/// Flat settings record persisted as JSON. Every field may be absent or
/// `null` at rest; accessors apply the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub llm_api_key: Option<String>,

    #[serde(default)]
    pub telegram_token: Option<String>,

    #[serde(default)]
    pub telegram_chat_id: Option<String>,

    #[serde(default)]
    pub theme: Option<String>,

    #[serde(default)]
    pub font_size: Option<u32>,
}

/// Treats empty strings the same as missing values.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl AppSettings {
    pub fn llm_api_key(&self) -> Option<&str> {
        non_empty(&self.llm_api_key)
    }

    /// Returns `(token, chat_id)` only when both are set.
    pub fn telegram_credentials(&self) -> Option<(&str, &str)> {
        Some((non_empty(&self.telegram_token)?, non_empty(&self.telegram_chat_id)?))
    }

    pub fn theme(&self) -> &str {
        non_empty(&self.theme).unwrap_or(DEFAULT_THEME)
    }

    pub fn font_size(&self) -> u32 {
        self.font_size.unwrap_or(DEFAULT_FONT_SIZE).max(MIN_FONT_SIZE)
    }

    pub fn set_llm_api_key(&mut self, key: &str) {
        self.llm_api_key = Some(key.trim().to_string());
    }

    pub fn set_telegram(&mut self, token: &str, chat_id: &str) {
        self.telegram_token = Some(token.trim().to_string());
        self.telegram_chat_id = Some(chat_id.trim().to_string());
    }
}

/// Reads and writes [`AppSettings`] at a fixed path.
///
/// Neither direction surfaces errors: a missing or malformed file loads as
/// defaults, and a failed write is logged.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform config directory.
    pub fn at_default_location() -> Self {
        Self::new(Self::default_path())
    }

    /// Get config file path (cross-platform)
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("accurate-notepad");
        path.push("notepad_settings.json");
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> AppSettings {
        match fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::debug!(path = %self.path.display(), "failed to parse settings: {e}, using defaults");
                    AppSettings::default()
                }
            },
            Err(e) => {
                tracing::debug!(path = %self.path.display(), "no settings loaded: {e}");
                AppSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &AppSettings) {
        if let Err(e) = self.try_save(settings) {
            tracing::warn!(path = %self.path.display(), "error saving settings: {e}");
        }
    }

    pub fn try_save(&self, settings: &AppSettings) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.font_size(), 12);
        assert_eq!(settings.theme(), "red");
        assert!(settings.llm_api_key().is_none());
        assert!(settings.telegram_credentials().is_none());
    }

    #[test]
    fn test_null_fields_use_defaults() {
        let json = r#"{"llm_api_key": null, "telegram_token": null, "telegram_chat_id": null, "theme": null, "font_size": null}"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.font_size(), 12);
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{"font_size": 14}"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.font_size(), 14);
        assert_eq!(settings.theme(), "red");
    }

    #[test]
    fn test_stored_font_size_below_floor_is_raised() {
        for json in [r#"{"font_size": 3}"#, r#"{"font_size": 0}"#] {
            let settings: AppSettings = serde_json::from_str(json).unwrap();
            assert_eq!(settings.font_size(), MIN_FONT_SIZE);
        }
    }

    #[test]
    fn test_serialized_keys() {
        let mut settings = AppSettings::default();
        settings.set_llm_api_key("  sk-test  ");
        settings.set_telegram("123:abc", "42");
        let json = serde_json::to_string(&settings).unwrap();
        for key in ["llm_api_key", "telegram_token", "telegram_chat_id", "theme", "font_size"] {
            assert!(json.contains(&format!("\"{key}\"")), "missing key {key}");
        }
        assert_eq!(settings.llm_api_key(), Some("sk-test"));
    }

    #[test]
    fn test_empty_credentials_count_as_missing() {
        let mut settings = AppSettings::default();
        settings.set_llm_api_key("   ");
        assert!(settings.llm_api_key().is_none());

        settings.set_telegram("token", "");
        assert!(settings.telegram_credentials().is_none());

        settings.set_telegram("token", "99");
        assert_eq!(settings.telegram_credentials(), Some(("token", "99")));
    }

    #[test]
    fn test_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested").join("settings.json"));

        let mut settings = AppSettings::default();
        settings.set_llm_api_key("key");
        settings.font_size = Some(18);
        store.save(&settings);

        assert_eq!(store.load(), settings);
    }

    #[test]
    fn test_store_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load(), AppSettings::default());
    }

    #[test]
    fn test_store_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(SettingsStore::new(&path).load(), AppSettings::default());
    }

    #[test]
    fn test_store_save_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        // The parent "directory" is a regular file, so the write cannot succeed.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let store = SettingsStore::new(blocker.join("settings.json"));

        store.save(&AppSettings::default());
        assert!(store.try_save(&AppSettings::default()).is_err());
    }
}
