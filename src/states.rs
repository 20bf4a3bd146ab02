use bevy::prelude::*;
use crate::file::config::AppConfig;
use crate::file::items::{ItemList, ItemListLoader};
use crate::file::settings::{persist_active_index, setup_settings};
use crate::scenes::{setup_browse, setup_camera};

#[derive(States, Debug, Clone, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    #[default]
    InitialLoad,
    Browse,
}

// Latches hold the state transition until every startup task has reported in.

#[derive(Resource, Default)]
pub struct StartupLatch {
    pub settings_loaded: bool,
    pub items_loaded: bool,
}

/// Handle to the item list shown by the browse scene.
#[derive(Resource, Debug, Clone)]
pub struct ItemListHandle(pub Handle<ItemList>);

pub fn check_startup_complete(
    latch: Res<StartupLatch>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if latch.settings_loaded && latch.items_loaded {
        next_state.set(AppState::Browse);
    }
}

pub fn start_loading_items(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<AppConfig>,
) {
    let handle = asset_server.load::<ItemList>(config.paths.items.clone());
    commands.insert_resource(ItemListHandle(handle));
}

pub fn track_item_loading(
    asset_server: Res<AssetServer>,
    handle: Option<Res<ItemListHandle>>,
    mut latch: ResMut<StartupLatch>,
) {
    let Some(handle) = handle else {
        return;
    };
    if latch.items_loaded {
        return;
    }

    // A broken list still lets the app start, with an empty carousel.
    if asset_server.is_loaded_with_dependencies(&handle.0) {
        latch.items_loaded = true;
    } else if asset_server.load_state(&handle.0).is_failed() {
        error!("item list could not be loaded, showing an empty carousel");
        latch.items_loaded = true;
    }
}

pub struct StartupPlugin;

impl Plugin for StartupPlugin {
    fn build(&self, app: &mut App) {
        app
        .insert_resource(StartupLatch::default())
        .init_asset::<ItemList>()
        .init_asset_loader::<ItemListLoader>()
        .add_systems(OnEnter(AppState::InitialLoad), setup_settings)
        .add_systems(OnEnter(AppState::InitialLoad), start_loading_items)
        .add_systems(OnEnter(AppState::InitialLoad), setup_camera)
        .add_systems(Update, (track_item_loading, check_startup_complete).chain().run_if(in_state(AppState::InitialLoad)))
        ;
    }
}

pub struct BrowsePlugin;

impl Plugin for BrowsePlugin {
    fn build(&self, app: &mut App) {
        app
        .add_systems(OnEnter(AppState::Browse), setup_browse)
        .add_systems(Update, persist_active_index.run_if(in_state(AppState::Browse)))
        ;
    }
}
