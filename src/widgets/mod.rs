use bevy::prelude::*;

pub mod card;
pub use card::{spawn_card, CardContext, CardStyle, CarouselCard};

pub mod carousel;
pub use carousel::{
    ActiveIndexChanged, CarouselPlugin, CarouselSet, CarouselWidget, DragSignal, ScrollRequest,
};

pub mod indicator;
pub use indicator::{spawn_page_indicator, IndicatorStyle, PageIndicator};

pub struct WidgetsPlugin;

impl Plugin for WidgetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(CarouselPlugin)
            .add_systems(Update, indicator::update_page_indicators.after(CarouselSet::Commit));
    }
}
