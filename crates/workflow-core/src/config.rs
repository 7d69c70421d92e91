use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SettingsError;

pub const DEFAULT_DAILY_NOTE_FOLDER: &str = "/Journal";
pub const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD";

/// Process-wide plugin settings.
///
/// Every field has a default, so a partial saved object is merged with the
/// defaults on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowSettings {
    /// Folder holding daily notes, relative to the vault root
    pub daily_note_folder: String,
    /// Moment-style date pattern used for daily note file names
    pub daily_note_format: String,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            daily_note_folder: DEFAULT_DAILY_NOTE_FOLDER.to_string(),
            daily_note_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl WorkflowSettings {
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Load saved settings, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!("Could not read settings {}: {}", path.display(), e);
                return Self::default();
            }
        };

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        let parsed = if is_yaml {
            Self::from_yaml(&content).map_err(SettingsError::from)
        } else {
            Self::from_json(&content).map_err(SettingsError::from)
        };

        parsed.unwrap_or_else(|e| {
            warn!("Ignoring settings {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let content = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => self.to_yaml()?,
            _ => self.to_json()?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(path, content).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Daily notes configuration owned by the host application.
///
/// When present and enabled it takes precedence over [`WorkflowSettings`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostDailyNotesOptions {
    pub enabled: bool,
    /// Open the daily note on startup
    pub autorun: Option<bool>,
    /// New file location
    pub folder: Option<String>,
    /// Date format
    pub format: Option<String>,
    /// Template file location
    pub template: Option<String>,
}
