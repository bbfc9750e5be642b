//! Persisted user settings read by the drop resolver.
//!
//! Settings live in `config.toml` under the app root. Every field carries a
//! serde default so partial or older files keep loading.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize, de::Error as SerdeDeError};
use thiserror::Error;

use crate::app_dirs;
use crate::drop::media_support::DEFAULT_MEDIA_EXTENSIONS;

/// Default filename used to store the settings.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub controls: ControlSettings,
    #[serde(default)]
    pub media: MediaSettings,
}

/// Player interaction preferences.
///
/// Config keys: `allow_track_load_to_playing_deck`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSettings {
    /// Let drops replace the track of a deck that is currently playing.
    #[serde(default)]
    pub allow_track_load_to_playing_deck: bool,
}

/// Which dropped files count as playable media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSettings {
    /// Confirm the container by probing file contents, not just the extension.
    #[serde(default)]
    pub probe_content: bool,
    /// Accepted extensions, lowercase and without dots.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            probe_content: false,
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    DEFAULT_MEDIA_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

impl AppSettings {
    /// Clean up user-edited values so lookups can stay simple.
    pub fn normalized(mut self) -> Self {
        let mut extensions: Vec<String> = Vec::with_capacity(self.media.extensions.len());
        for ext in self.media.extensions.drain(..) {
            let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
            if !ext.is_empty() && !extensions.contains(&ext) {
                extensions.push(ext);
            }
        }
        self.media.extensions = extensions;
        self
    }
}

/// Errors that may occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    #[error("No suitable config directory found")]
    NoConfigDir,
}

/// Resolve the settings file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load settings from the app root, returning defaults if the file is missing.
pub fn load_or_default() -> Result<AppSettings, ConfigError> {
    load_from_path(&config_path()?)
}

/// Load settings from a specific file, returning defaults if it does not exist.
pub fn load_from_path(path: &Path) -> Result<AppSettings, ConfigError> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source: SerdeDeError::custom(source),
    })?;
    toml::from_str::<AppSettings>(&text)
        .map(AppSettings::normalized)
        .map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
}

/// Persist settings to the app root, overwriting previous contents.
pub fn save(settings: &AppSettings) -> Result<(), ConfigError> {
    save_to_path(settings, &config_path()?)
}

/// Save settings to a specific path, creating parent directories as needed.
pub fn save_to_path(settings: &AppSettings, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, data).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            ConfigError::CreateDir { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_dirs::ConfigBaseGuard;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_from_path(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, AppSettings::default());
        assert!(!settings.controls.allow_track_load_to_playing_deck);
        assert!(settings.media.extensions.iter().any(|ext| ext == "mp3"));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[controls]\nallow_track_load_to_playing_deck = true\n").unwrap();

        let settings = load_from_path(&path).unwrap();
        assert!(settings.controls.allow_track_load_to_playing_deck);
        assert_eq!(settings.media, MediaSettings::default());
    }

    #[test]
    fn extensions_are_normalized_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "[media]\nextensions = [\".MP3\", \"mp3\", \" Flac \", \"\"]\n",
        )
        .unwrap();

        let settings = load_from_path(&path).unwrap();
        assert_eq!(settings.media.extensions, vec!["mp3", "flac"]);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[controls\n").unwrap();

        let err = load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { path: ref p, .. } if p == &path));
    }

    #[test]
    fn save_then_load_through_app_root() {
        let base = tempdir().unwrap();
        let _guard = ConfigBaseGuard::set(base.path().to_path_buf());
        let mut settings = AppSettings::default();
        settings.controls.allow_track_load_to_playing_deck = true;
        settings.media.probe_content = true;

        save(&settings).unwrap();

        assert!(config_path().unwrap().is_file());
        assert_eq!(load_or_default().unwrap(), settings);
    }
}
