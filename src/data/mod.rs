//! Data layer: populates the catalogs at game startup.
//!
//! This plugin runs in OnEnter(GameState::Loading), fills ItemCatalog,
//! CropCatalog and ShopCatalog from the built-in tables defined in
//! submodules, merges any RON overrides, then transitions to Playing.

mod crops;
mod items;
mod shops;

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::shared::*;

pub use crops::populate_crops;
pub use items::populate_items;
pub use shops::populate_shop;

pub const DEFAULT_CATALOG_PATH: &str = "assets/data/catalog.ron";

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Optional RON file whose entries replace or extend the built-in catalogs.
#[derive(Resource, Debug, Clone)]
pub struct CatalogOverridePath(pub PathBuf);

/// On-disk shape of a catalog override file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFile {
    pub items: Vec<ItemDetails>,
    pub crops: Vec<CropDetails>,
}

impl CatalogFile {
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Merge into the live catalogs. Entries with an existing id replace it.
    pub fn apply(self, items: &mut ItemCatalog, crops: &mut CropCatalog) -> usize {
        let count = self.items.len() + self.crops.len();
        for item in self.items {
            items.insert(item);
        }
        for crop in self.crops {
            crops.insert(crop);
        }
        count
    }
}

/// Read a catalog file from disk and merge it over the current catalogs.
/// Returns how many entries were applied.
pub fn load_catalog_overrides(
    path: impl AsRef<Path>,
    items: &mut ItemCatalog,
    crops: &mut CropCatalog,
) -> Result<usize, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    let file = CatalogFile::from_ron_str(&text)?;
    Ok(file.apply(items, crops))
}

fn load_all_data(
    override_path: Option<Res<CatalogOverridePath>>,
    mut item_catalog: ResMut<ItemCatalog>,
    mut crop_catalog: ResMut<CropCatalog>,
    mut shop_catalog: ResMut<ShopCatalog>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("[Data] Populating catalogs…");

    populate_items(&mut item_catalog);
    populate_crops(&mut crop_catalog);
    populate_shop(&mut shop_catalog);

    if let Some(path) = override_path {
        match load_catalog_overrides(&path.0, &mut item_catalog, &mut crop_catalog) {
            Ok(count) => info!("[Data] Applied {} overrides from {}", count, path.0.display()),
            Err(err) => warn!("[Data] Ignoring {}: {}", path.0.display(), err),
        }
    }

    for crop in crop_catalog.crops.values() {
        for id in &crop.produced_item_ids {
            if item_catalog.get(*id).is_none() {
                warn!("[Data] Crop {} produces unknown item {}", crop.seed_item_id, id);
            }
        }
    }

    info!(
        "[Data] Items: {}, Crops: {}, Shop listings: {}. Transitioning to Playing.",
        item_catalog.items.len(),
        crop_catalog.crops.len(),
        shop_catalog.item_ids.len()
    );
    next_state.set(GameState::Playing);
}
