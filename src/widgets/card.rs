use bevy::prelude::*;

use crate::file::{CarouselItem, CarouselTheme};
use crate::file::config::CardConfig;

/// One slot of a carousel track.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CarouselCard {
    /// Position relative to the track's centered slot.
    pub slot_offset: i32,
    pub placeholder: bool,
}

#[derive(Debug, Clone)]
pub struct CardStyle {
    pub background_color: Color,
    pub photo_tint: Color,
    pub text_color: Color,
    pub secondary_text_color: Color,
    pub border_radius: f32,
    pub title_size: f32,
    pub subtitle_size: f32,
    pub height: f32,
    pub gutter: f32,
}

impl Default for CardStyle {
    fn default() -> Self {
        CardStyle::from_theme(&CarouselTheme::default(), &CardConfig::default())
    }
}

impl CardStyle {
    pub fn from_theme(theme: &CarouselTheme, card: &CardConfig) -> Self {
        CardStyle {
            background_color: theme.card_background,
            photo_tint: theme.photo_tint,
            text_color: theme.text_primary,
            secondary_text_color: theme.text_secondary,
            border_radius: card.border_radius,
            title_size: card.title_size,
            subtitle_size: card.subtitle_size,
            height: card.height,
            gutter: card.gutter,
        }
    }
}

/// Shared inputs for every card of a track.
pub struct CardContext<'a> {
    pub width: f32,
    pub style: &'a CardStyle,
    pub asset_server: Option<&'a AssetServer>,
}

/// Spawns the card for one slot. `None` spawns an empty placeholder that
/// keeps the slot's width.
pub fn spawn_card(
    commands: &mut ChildSpawnerCommands,
    ctx: &CardContext,
    item: Option<&CarouselItem>,
    slot_offset: i32,
) -> Entity {
    let style = ctx.style;
    let mut slot = commands.spawn((
        Node {
            width: Val::Px(ctx.width),
            height: Val::Percent(100.0),
            padding: UiRect::right(Val::Px(style.gutter)),
            flex_shrink: 0.0,
            ..default()
        },
        CarouselCard {
            slot_offset,
            placeholder: item.is_none(),
        },
    ));

    let Some(item) = item else {
        return slot.id();
    };

    let radius = Val::Px(style.border_radius);
    slot.with_children(|parent| {
        parent
            .spawn((
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    justify_content: JustifyContent::FlexEnd,
                    padding: UiRect::all(Val::Px(12.0)),
                    overflow: Overflow::clip(),
                    ..default()
                },
                BackgroundColor(style.background_color),
                BorderRadius::all(radius),
            ))
            .with_children(|card| {
                if let (Some(photo), Some(asset_server)) = (&item.photo, ctx.asset_server) {
                    card.spawn((
                        ImageNode::new(asset_server.load(photo.clone())).with_color(style.photo_tint),
                        Node {
                            position_type: PositionType::Absolute,
                            left: Val::Px(0.0),
                            top: Val::Px(0.0),
                            width: Val::Percent(100.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BorderRadius::all(radius),
                    ));
                }
                card.spawn((
                    Text::new(item.name.clone()),
                    TextFont {
                        font_size: style.title_size,
                        ..default()
                    },
                    TextColor(style.text_color),
                ));
                if let Some(subtitle) = &item.subtitle {
                    card.spawn((
                        Text::new(subtitle.clone()),
                        TextFont {
                            font_size: style.subtitle_size,
                            ..default()
                        },
                        TextColor(style.secondary_text_color),
                    ));
                }
            });
    });

    slot.id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::config::parse_config;

    #[test]
    fn style_takes_theme_colors_from_config() {
        let config = parse_config(
            "theme:\n  card_background: [0.5, 0.25, 0.0]\ncard:\n  height: 320.0\n",
        )
        .unwrap();
        let style = CardStyle::from_theme(&config.theme, &config.card);
        assert_eq!(style.background_color, Color::srgb(0.5, 0.25, 0.0));
        assert_eq!(style.text_color, CarouselTheme::default().text_primary);
        assert_eq!(style.height, 320.0);
    }
}
