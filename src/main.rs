use bevy::{
    prelude::*,
    window::{ExitCondition, Window, WindowPlugin},
};

use snap_carousel::states::{AppState, BrowsePlugin, StartupPlugin};
use snap_carousel::file::config::ConfigPlugin;
use snap_carousel::widgets::WidgetsPlugin;

#[cfg(not(feature = "production"))]
use snap_carousel::debug::DebugPlugin;

fn main() {
    App::new()
        .add_plugins((
            ConfigPlugin,
            #[cfg(not(feature = "production"))] DebugPlugin,
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Campgrounds".to_string(),
                    ..default()
                }),
                exit_condition: ExitCondition::OnPrimaryClosed,
                ..default()
            }),
            WidgetsPlugin,
            StartupPlugin,
            BrowsePlugin,
        ))
        .init_state::<AppState>()
        .run();
}
