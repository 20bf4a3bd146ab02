use bevy::prelude::*;

use crate::file::{AppConfig, ItemList, Settings};
use crate::states::ItemListHandle;
use crate::widgets::{spawn_page_indicator, CardStyle, CarouselWidget, IndicatorStyle};

/// Restores the last resting card if it is still in range.
pub fn starting_index(saved: Option<i32>, fallback: i32, item_count: usize) -> i32 {
    match saved {
        Some(index) if index >= 0 && (index as usize) < item_count => index,
        _ => fallback,
    }
}

pub fn setup_browse(
    mut commands: Commands,
    config: Res<AppConfig>,
    settings: Option<Res<Settings>>,
    handle: Option<Res<ItemListHandle>>,
    lists: Res<Assets<ItemList>>,
) {
    let items = handle
        .and_then(|handle| lists.get(&handle.0))
        .map(|list| list.items.clone())
        .unwrap_or_default();
    let saved = settings.as_ref().and_then(|settings| settings.last_active_index);
    let initial = starting_index(saved, config.carousel.initial_index, items.len());
    let viewport_width = settings
        .as_ref()
        .map_or(config.window.width, |settings| settings.window.width);
    let theme = &config.theme;
    let item_count = items.len();
    info!("browsing {item_count} items starting at {initial}");

    let carousel = CarouselWidget::builder(items)
        .config(config.carousel)
        .style(CardStyle::from_theme(theme, &config.card))
        .initial_index(initial)
        .viewport_width(viewport_width)
        .spawn(&mut commands);

    let indicator = spawn_page_indicator(
        &mut commands,
        carousel,
        item_count,
        initial,
        IndicatorStyle {
            active_color: theme.indicator_active,
            inactive_color: theme.indicator_inactive,
            ..default()
        },
    );

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                ..default()
            },
            BackgroundColor(theme.background),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(config.window.title.clone()),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(theme.text_primary),
                Node {
                    margin: UiRect::new(Val::Px(config.carousel.preview_width), Val::Px(0.0), Val::Px(0.0), Val::Px(16.0)),
                    ..default()
                },
            ));
        })
        .add_children(&[carousel, indicator]);
}
