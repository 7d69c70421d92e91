use serde::{Deserialize, Serialize};
use workflow_core::HostDailyNotesOptions;

pub const DEFAULT_SETTINGS_PATH: &str = ".workflow/settings.json";
pub const SETTINGS_SECTION: &str = "workflow";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LspSettings {
    /// Logging level for the LSP server
    pub log_level: LogLevel,

    /// Plugin settings file, relative to the vault root
    pub settings_path: String,

    /// Daily notes configuration of the editor, wins over plugin settings
    pub daily_notes: Option<HostDailyNotesOptions>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warning => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl LspSettings {
    /// Parse settings sent by the client, either bare or nested under the
    /// `workflow` section.
    pub fn from_client_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        match value.get(SETTINGS_SECTION) {
            Some(section) => serde_json::from_value(section.clone()),
            None => serde_json::from_value(value.clone()),
        }
    }
}

impl Default for LspSettings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            settings_path: DEFAULT_SETTINGS_PATH.to_string(),
            daily_notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: LspSettings =
            serde_json::from_value(serde_json::json!({ "logLevel": "debug" })).unwrap();
        assert_eq!(settings.log_level, LogLevel::Debug);
        assert_eq!(settings.settings_path, DEFAULT_SETTINGS_PATH);
        assert!(settings.daily_notes.is_none());
    }

    #[test]
    fn test_daily_notes_section() {
        let settings: LspSettings = serde_json::from_value(serde_json::json!({
            "dailyNotes": { "enabled": true, "folder": "Daily", "format": "DD-MM-YYYY" }
        }))
        .unwrap();
        let daily = settings.daily_notes.unwrap();
        assert!(daily.enabled);
        assert_eq!(daily.folder.as_deref(), Some("Daily"));
        assert_eq!(LogLevel::Warning.to_filter(), log::LevelFilter::Warn);
    }

    #[test]
    fn test_nested_section() {
        let value = serde_json::json!({ "workflow": { "settingsPath": "plugin.yaml" } });
        let settings = LspSettings::from_client_value(&value).unwrap();
        assert_eq!(settings.settings_path, "plugin.yaml");

        let bare = LspSettings::from_client_value(&serde_json::json!({})).unwrap();
        assert_eq!(bare, LspSettings::default());
    }
}
