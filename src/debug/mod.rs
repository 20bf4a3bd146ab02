use bevy::{diagnostic::FrameTimeDiagnosticsPlugin, prelude::*};

use crate::states::AppState;
use crate::widgets::CarouselSet;

pub mod inspector;

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(FrameTimeDiagnosticsPlugin::default())
            .add_systems(OnEnter(AppState::Browse), inspector::spawn_inspector)
            .add_systems(
                Update,
                (inspector::update_fps_text, inspector::update_carousel_text)
                    .after(CarouselSet::Render)
                    .run_if(in_state(AppState::Browse)),
            );
    }
}
