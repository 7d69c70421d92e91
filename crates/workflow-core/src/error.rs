use std::path::PathBuf;

/// Failure while persisting or loading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to access settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid settings YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
