pub mod theme;
pub mod settings;
pub mod config;
pub mod items;


pub use items::{CarouselItem, ItemList, ItemListLoader};
pub use settings::Settings;
pub use config::AppConfig;
pub use theme::CarouselTheme;
