use bevy::prelude::*;

use crate::widgets::carousel::{ActiveIndexChanged, ScrollRequest};

/// Row of page dots mirroring a carousel's committed index.
#[derive(Component, Debug, Clone)]
pub struct PageIndicator {
    pub carousel: Entity,
    pub active: i32,
    pub style: IndicatorStyle,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct PageDot {
    pub index: i32,
}

#[derive(Debug, Clone)]
pub struct IndicatorStyle {
    pub active_color: Color,
    pub inactive_color: Color,
    pub size: f32,
    pub spacing: f32,
}

impl Default for IndicatorStyle {
    fn default() -> Self {
        IndicatorStyle {
            active_color: Color::WHITE,
            inactive_color: Color::srgb(0.4, 0.4, 0.4),
            size: 8.0,
            spacing: 6.0,
        }
    }
}

impl IndicatorStyle {
    fn color(&self, active: bool) -> Color {
        if active { self.active_color } else { self.inactive_color }
    }
}

/// Spawns one dot per item. Clicking a dot scrolls the carousel there.
pub fn spawn_page_indicator(
    commands: &mut Commands,
    carousel: Entity,
    item_count: usize,
    active: i32,
    style: IndicatorStyle,
) -> Entity {
    let indicator = commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                column_gap: Val::Px(style.spacing),
                margin: UiRect::vertical(Val::Px(12.0)),
                ..default()
            },
            PageIndicator {
                carousel,
                active,
                style: style.clone(),
            },
        ))
        .id();

    for index in 0..item_count as i32 {
        let dot = commands
            .spawn((
                Node {
                    width: Val::Px(style.size),
                    height: Val::Px(style.size),
                    ..default()
                },
                BackgroundColor(style.color(index == active)),
                BorderRadius::MAX,
                PageDot { index },
            ))
            .observe(move |_click: On<Pointer<Click>>, mut requests: MessageWriter<ScrollRequest>| {
                requests.write(ScrollRequest { carousel, index });
            })
            .id();
        commands.entity(indicator).add_child(dot);
    }

    indicator
}

pub fn update_page_indicators(
    mut changes: MessageReader<ActiveIndexChanged>,
    mut indicators: Query<(&mut PageIndicator, &Children)>,
    mut dots: Query<(&PageDot, &mut BackgroundColor)>,
) {
    for change in changes.read() {
        for (mut indicator, children) in &mut indicators {
            if indicator.carousel != change.carousel {
                continue;
            }
            indicator.active = change.current;
            for child in children.iter() {
                if let Ok((dot, mut background)) = dots.get_mut(child) {
                    background.0 = indicator.style.color(dot.index == change.current);
                }
            }
        }
    }
}
