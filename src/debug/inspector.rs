use bevy::{
    diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin},
    prelude::*,
};

use crate::carousel::TrackFrame;
use crate::widgets::carousel::{CarouselCommit, CarouselMotion, CarouselWidget};

#[derive(Component)]
pub struct FpsText;

#[derive(Component)]
pub struct CarouselStateText;

pub fn spawn_inspector(mut commands: Commands) {
    let font = TextFont {
        font_size: 12.0,
        ..default()
    };
    let color = TextColor(Color::srgb(1.0, 1.0, 1.0));

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(8.0),
            bottom: Val::Px(8.0),
            flex_direction: FlexDirection::Column,
            padding: UiRect::all(Val::Px(6.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
        GlobalZIndex(i32::MAX),
    )).with_children(|parent| {
        parent.spawn((
            Text::new("FPS: "),
            font.clone(),
            color,
        )).with_child((
            TextSpan::default(),
            font.clone(),
            color,
            FpsText,
        ));
        parent.spawn((
            Text::default(),
            font.clone(),
            color,
            CarouselStateText,
        ));
    });
}

pub fn update_fps_text(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut TextSpan, With<FpsText>>,
) {
    for mut span in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                **span = format!("{value:.0}");
            }
        }
    }
}

pub fn update_carousel_text(
    carousels: Query<(&CarouselWidget, &CarouselMotion, &CarouselCommit)>,
    mut query: Query<&mut Text, With<CarouselStateText>>,
) {
    let Some((widget, motion, commit)) = carousels.iter().next() else {
        return;
    };
    let frame = TrackFrame::compute(&motion.0, &commit.0, widget.config.window_radius);
    let summary = format!(
        "active {} (resting {}) | offset {:.1} -> {:.1} | {:?}\noverlay {} shift {:+.0} opacity {:.2} | rev {}",
        frame.active_index,
        motion.0.resting_index(),
        motion.0.offset(),
        motion.0.next_offset(),
        motion.0.phase(),
        frame.overlay_active_index,
        commit.0.state().overlay_offset_delta,
        frame.overlay_opacity,
        commit.0.revision(),
    );
    for mut text in &mut query {
        if text.0 != summary {
            text.0 = summary.clone();
        }
    }
}
