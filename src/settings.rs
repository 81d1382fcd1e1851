use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::diagram::LabelStyle;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML settings: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to write TOML settings: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Failed to read JSON settings: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Width and height of a freshly placed rectangle.
    pub rect_size: [i32; 2],
    /// Width and height of a freshly placed oval.
    pub oval_size: [i32; 2],
    pub link_hit_tolerance: f64,
    pub group_border_tolerance: i32,
    pub arrow_size: i32,
    pub port_marker_size: i32,
    pub default_label: LabelStyle,
    pub palette_commands_enabled: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            rect_size: [100, 60],
            oval_size: [100, 80],
            link_hit_tolerance: 5.0,
            group_border_tolerance: 5,
            arrow_size: 10,
            port_marker_size: 5,
            default_label: LabelStyle::default(),
            palette_commands_enabled: true,
        }
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "toml")
}

/// Loads settings, trying the format implied by the extension first and the
/// other one second.
pub fn load_settings(path: impl AsRef<Path>) -> Result<EditorSettings, SettingsError> {
    let path = path.as_ref();
    let s = std::fs::read_to_string(path)?;
    let settings = if is_toml(path) {
        match toml::from_str::<EditorSettings>(&s) {
            Ok(v) => v,
            Err(e) => serde_json::from_str::<EditorSettings>(&s).map_err(|_| e)?,
        }
    } else {
        match serde_json::from_str::<EditorSettings>(&s) {
            Ok(v) => v,
            Err(e) => toml::from_str::<EditorSettings>(&s).map_err(|_| e)?,
        }
    };
    info!(path = path.display().to_string(); "Loaded editor settings");
    Ok(settings)
}

pub fn save_settings(
    path: impl AsRef<Path>,
    settings: &EditorSettings,
) -> Result<(), SettingsError> {
    let path = path.as_ref();
    if is_toml(path) {
        let toml = toml::to_string_pretty(settings)?;
        std::fs::write(path, toml)?;
    } else {
        let json = serde_json::to_string_pretty(settings)?;
        std::fs::write(path, json)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::LabelShape;

    #[test]
    fn toml_round_trip_keeps_custom_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("umlsketch.toml");
        let mut settings = EditorSettings::default();
        settings.rect_size = [120, 70];
        settings.default_label.shape = LabelShape::Oval;
        settings.default_label.font_size = 16;

        save_settings(&path, &settings).unwrap();
        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn json_file_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("umlsketch.json");
        std::fs::write(&path, r#"{ "arrow_size": 14 }"#).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded.arrow_size, 14);
        assert_eq!(loaded.rect_size, [100, 60]);
    }

    #[test]
    fn toml_extension_falls_back_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.toml");
        std::fs::write(&path, r#"{ "group_border_tolerance": 8 }"#).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded.group_border_tolerance, 8);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_settings("/nonexistent/umlsketch.toml").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
