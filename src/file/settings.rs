use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::file::config::AppConfig;
use crate::states::StartupLatch;
use crate::widgets::carousel::ActiveIndexChanged;

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    /// Card the carousel was resting on when the app last ran.
    pub last_active_index: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: WindowSettings {
                width: 400.0,
                height: 640.0,
            },
            last_active_index: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error on settings file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Settings {
    pub fn path(config: &AppConfig) -> PathBuf {
        PathBuf::from(&config.saves.directory).join(&config.saves.settings_file)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub fn load_or_create_settings(path: &Path) -> Result<Settings, SettingsError> {
    if !path.exists() {
        warn!("Settings file not found at '{}', creating default...", path.display());
        let default = Settings::default();
        default.save(path)?;
        return Ok(default);
    }

    let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_yaml::from_str(&content)?)
}

fn change_window(
    mut windows: Query<&mut Window>,
    settings: &Settings,
    config: &AppConfig,
) {
    if let Ok(mut window) = windows.single_mut() {
        window.title = config.window.title.clone();
        window.resolution.set(settings.window.width, settings.window.height);
    } else {
        warn!("Primary window not available to apply settings");
    }
}

pub fn setup_settings(
    mut commands: Commands,
    windows: Query<&mut Window>,
    config: Res<AppConfig>,
    mut latch: ResMut<StartupLatch>,
) {
    let path = Settings::path(&config);
    let settings = load_or_create_settings(&path).unwrap_or_else(|e| {
        warn!("{e}, using default settings");
        Settings {
            window: WindowSettings {
                width: config.window.width,
                height: config.window.height,
            },
            ..default()
        }
    });

    change_window(windows, &settings, &config);
    commands.insert_resource(settings);
    latch.settings_loaded = true;
}

/// Writes the settings file once per frame in which the resting card
/// changed.
pub fn persist_active_index(
    mut changes: MessageReader<ActiveIndexChanged>,
    settings: Option<ResMut<Settings>>,
    config: Res<AppConfig>,
) {
    let Some(latest) = changes.read().last() else {
        return;
    };
    let Some(mut settings) = settings else {
        return;
    };
    if settings.last_active_index == Some(latest.current) {
        return;
    }

    settings.last_active_index = Some(latest.current);
    if let Err(e) = settings.save(&Settings::path(&config)) {
        warn!("{e}");
    }
}
