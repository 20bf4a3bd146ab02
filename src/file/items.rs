use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use bevy::{
    asset::{io::Reader, Asset, AssetLoader, LoadContext, ReadAssetBytesError},
    prelude::*,
    reflect::TypePath,
};

/// One entry of the carousel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CarouselItem {
    pub name: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Image path, relative to the `.items` file.
    #[serde(default)]
    pub photo: Option<String>,
}

impl CarouselItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subtitle: None,
            photo: None,
        }
    }
}

#[derive(Asset, TypePath, Debug, Clone, Default)]
pub struct ItemList {
    pub items: Vec<CarouselItem>,
}

#[derive(Debug, Deserialize)]
struct ItemListDocument {
    #[serde(default)]
    items: Vec<CarouselItem>,
}

#[derive(Default)]
pub struct ItemListLoader;

#[derive(Debug, Error)]
pub enum ItemListLoaderError {
    #[error("Failed to read asset bytes: {0}")]
    ReadBytes(#[from] ReadAssetBytesError),

    #[error("Failed to parse item list: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ItemList {
    pub fn from_yaml(bytes: &[u8]) -> Result<Self, serde_yaml::Error> {
        let document: ItemListDocument = serde_yaml::from_slice(bytes)?;
        Ok(ItemList { items: document.items })
    }

    /// Rewrites relative photo paths so they resolve against `folder`.
    fn resolve_photos(&mut self, folder: Option<PathBuf>) {
        let Some(folder) = folder else {
            return;
        };
        for item in &mut self.items {
            if let Some(photo) = &mut item.photo {
                *photo = folder.join(&*photo).to_string_lossy().into_owned();
            }
        }
    }
}

impl AssetLoader for ItemListLoader {
    type Asset = ItemList;
    type Settings = ();
    type Error = ItemListLoaderError;

    fn extensions(&self) -> &[&str] {
        &[".items"]
    }

    async fn load(
        &self,
        _reader: &mut dyn Reader,
        _settings: &(),
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let list_path: PathBuf = load_context.path().to_path_buf();
        let bytes = load_context.read_asset_bytes(list_path.clone()).await?;
        let mut list = ItemList::from_yaml(&bytes)?;
        list.resolve_photos(list_path.parent().map(PathBuf::from));
        debug!("loaded {} carousel items from {}", list.items.len(), list_path.display());
        Ok(list)
    }
}
