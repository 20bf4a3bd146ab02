use serde::{Deserialize, Serialize};
use bevy::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::carousel::CarouselConfig;
use crate::file::theme::CarouselTheme;

pub const CONFIG_FILE: &str = "carousel.cfg";
const APP_DIRECTORY: &str = "snap_carousel";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub carousel: CarouselConfig,
    pub card: CardConfig,
    pub theme: CarouselTheme,
    pub paths: PathConfig,
    pub saves: SaveConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Campgrounds".to_string(),
            width: 400.0,
            height: 640.0,
        }
    }
}

/// Card presentation. Widths come from the carousel layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub height: f32,
    /// Gap to the right of every card, inside its slot.
    pub gutter: f32,
    pub border_radius: f32,
    pub title_size: f32,
    pub subtitle_size: f32,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            height: 240.0,
            gutter: 24.0,
            border_radius: 12.0,
            title_size: 20.0,
            subtitle_size: 14.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Asset path of the `.items` list shown in the carousel.
    pub items: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            items: "items/campgrounds.items".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    pub directory: String,
    pub settings_file: String,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            directory: APP_DIRECTORY.to_string(),
            settings_file: "settings.yaml".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("could not find the user config directory")]
    NoConfigDirectory,

    #[error("failed to create save directory '{path}': {source}")]
    CreateSaveDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        let path = resolve_config_path();
        let mut config = load_config(&path).unwrap_or_else(|e| {
            warn!("{e}, falling back to built-in defaults");
            AppConfig::default()
        });

        match prepare_save_directory(&config.saves.directory) {
            Ok(save_path) => config.saves.directory = save_path.to_string_lossy().into_owned(),
            Err(e) => warn!("{e}, settings will not be persisted"),
        }
        info!("loaded config from '{}'", path.display());
        app.insert_resource(config);
    }
}

/// A `carousel.cfg` in the user config directory wins over the one
/// shipped next to the executable.
pub fn resolve_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIRECTORY).join(CONFIG_FILE))
        .filter(|path| path.exists())
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    Ok(serde_yaml::from_str(content)?)
}

fn prepare_save_directory(save_dir: &str) -> Result<PathBuf, ConfigError> {
    let path = get_save_directory(save_dir)?;
    if !path.exists() {
        fs::create_dir_all(&path).map_err(|source| ConfigError::CreateSaveDirectory {
            path: path.clone(),
            source,
        })?;
    }
    Ok(path)
}

fn get_save_directory(save_dir: &str) -> Result<PathBuf, ConfigError> {
    let mut path = dirs::config_dir().ok_or(ConfigError::NoConfigDirectory)?;
    path.push(save_dir);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::{AnimationConfig, EdgePolicy};

    #[test]
    fn sections_can_be_omitted() {
        let config = parse_config(
            "window:\n  title: Test\ncarousel:\n  preview_width: 30.0\n  settle:\n    kind: timing\n    duration: 0.4\n",
        )
        .unwrap();
        assert_eq!(config.window.title, "Test");
        assert_eq!(config.window.width, 400.0);
        assert_eq!(config.carousel.preview_width, 30.0);
        assert_eq!(config.carousel.edge_policy, EdgePolicy::Clamp);
        assert!(matches!(
            config.carousel.settle,
            AnimationConfig::Timing { duration, .. } if duration == 0.4
        ));
        assert_eq!(config.paths.items, "items/campgrounds.items");
        assert_eq!(config.saves.settings_file, "settings.yaml");
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(matches!(parse_config("window: [1, 2"), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = load_config(Path::new("does/not/exist.cfg")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.cfg"));
    }

    #[test]
    fn shipped_config_parses() {
        let content = include_str!("../../carousel.cfg");
        let config = parse_config(content).unwrap();
        assert_eq!(config.carousel.window_radius, 2);
    }
}
