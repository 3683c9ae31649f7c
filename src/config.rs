use std::path::{Path, PathBuf};

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::DoodleResult;
use crate::shake::ACCELERATION_THRESHOLD;
use crate::tracker::{ReleasePolicy, TOUCH_TOLERANCE};

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "DOODLE_CONFIG";

/// Startup configuration. Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoodleConfig {
    /// Background RGBA
    pub background: [u8; 4],
    /// Initial stroke RGBA
    pub stroke_color: [u8; 4],
    pub stroke_width: f32,
    pub touch_tolerance: f32,
    pub shake_threshold: f32,
    pub release_policy: ReleasePolicy,
    pub export_dir: PathBuf,
    pub jpeg_quality: u8,
}

impl Default for DoodleConfig {
    fn default() -> Self {
        Self {
            background: [255, 255, 255, 255],
            stroke_color: [0, 0, 0, 255],
            stroke_width: 5.0,
            touch_tolerance: TOUCH_TOLERANCE,
            shake_threshold: ACCELERATION_THRESHOLD,
            release_policy: ReleasePolicy::RetainSlot,
            export_dir: PathBuf::from("."),
            jpeg_quality: 100,
        }
    }
}

impl DoodleConfig {
    pub fn load(path: &Path) -> DoodleResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> DoodleResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads the file named by `DOODLE_CONFIG`, or the defaults when the
    /// variable is unset or the file is unusable.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        let path = PathBuf::from(path);
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("Ignoring config {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    pub fn background(&self) -> Color32 {
        let [r, g, b, a] = self.background;
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }

    pub fn stroke_color(&self) -> Color32 {
        let [r, g, b, a] = self.stroke_color;
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = DoodleConfig::from_json(
            r#"{ "stroke_width": 12.5, "release_policy": "remove_slot" }"#,
        )
        .unwrap();

        assert_eq!(config.stroke_width, 12.5);
        assert_eq!(config.release_policy, ReleasePolicy::RemoveSlot);
        assert_eq!(config.touch_tolerance, 10.0);
        assert_eq!(config.shake_threshold, 15000.0);
        assert_eq!(config.background(), Color32::WHITE);
        assert_eq!(config.jpeg_quality, 100);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(DoodleConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = DoodleConfig::load(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(crate::error::DoodleError::Io(_))));
    }
}
