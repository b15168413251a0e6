//! Click dispatch: turns "item X used on cell (x, y)" into store operations.

use bevy::prelude::*;

use crate::config::GameConfig;
use crate::farming::{FarmGrid, PendingHarvests};
use crate::inventory::Inventory;
use crate::shared::*;

use super::cursor::cursor_is_valid;
use super::SelectedItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemUseOutcome {
    Dug,
    Watered,
    Planted,
    HarvestStarted(HarvestToken),
    Ignored,
}

/// Everything a click can touch.
pub struct FarmContext<'a> {
    pub grid: &'a mut FarmGrid,
    pub bag: &'a mut Inventory,
    pub crops: &'a CropCatalog,
    pub pending: &'a mut PendingHarvests,
    pub config: &'a GameConfig,
}

pub fn use_item_on_cell(item: &ItemDetails, x: i32, y: i32, ctx: &mut FarmContext) -> ItemUseOutcome {
    match item.item_type {
        ItemType::Tool => use_tool(item, x, y, ctx),
        ItemType::Seed => plant_seed(item, x, y, ctx),
        other => {
            debug!("[Player] {:?} items do nothing on farmland", other);
            ItemUseOutcome::Ignored
        }
    }
}

fn use_tool(item: &ItemDetails, x: i32, y: i32, ctx: &mut FarmContext) -> ItemUseOutcome {
    let cell = ctx.grid.get_cell(x, y);

    // A crop takes priority over the soil under it.
    if cell.has_crop() {
        let Some(details) = ctx.crops.get(cell.seed_item_code) else {
            return ItemUseOutcome::Ignored;
        };
        if !details.is_mature(cell.growth_days) {
            debug!("[Player] Crop at ({}, {}) is not ready", x, y);
            return ItemUseOutcome::Ignored;
        }
        if !details.can_be_harvested_with(item.item_id) {
            debug!("[Player] {} cannot harvest {}", item.name, details.seed_item_id);
            return ItemUseOutcome::Ignored;
        }
        return match ctx.pending.begin_harvest(ctx.grid, ctx.crops, x, y) {
            Some(token) => ItemUseOutcome::HarvestStarted(token),
            None => ItemUseOutcome::Ignored,
        };
    }

    if item.item_id == ctx.config.hoe_item_id && ctx.grid.try_dig(x, y) {
        ItemUseOutcome::Dug
    } else if item.item_id == ctx.config.watering_can_item_id && ctx.grid.try_water(x, y) {
        ItemUseOutcome::Watered
    } else {
        ItemUseOutcome::Ignored
    }
}

fn plant_seed(item: &ItemDetails, x: i32, y: i32, ctx: &mut FarmContext) -> ItemUseOutcome {
    if ctx.crops.get(item.item_id).is_none() {
        warn!("[Player] {} has no crop details", item.name);
        return ItemUseOutcome::Ignored;
    }
    if ctx.bag.total_amount(item.item_id) == 0 {
        debug!("[Player] No {} left in the bag", item.name);
        return ItemUseOutcome::Ignored;
    }
    if !ctx.grid.try_plant(x, y, item.item_id) {
        return ItemUseOutcome::Ignored;
    }
    ctx.bag.remove_by_id(item.item_id, 1);
    ItemUseOutcome::Planted
}

/// Apply the selected item to each clicked cell.
///
/// Clicks farther from the player than the item's use radius are ignored.
/// Without a player entity the radius is not enforced.
#[allow(clippy::too_many_arguments)]
pub fn handle_farm_click(
    mut clicks: EventReader<FarmClickEvent>,
    selected: Res<SelectedItem>,
    items: Res<ItemCatalog>,
    crops: Res<CropCatalog>,
    config: Res<GameConfig>,
    mut grid: ResMut<FarmGrid>,
    mut bag: ResMut<Inventory>,
    mut pending: ResMut<PendingHarvests>,
    player_query: Query<&Transform, With<Player>>,
) {
    for click in clicks.read() {
        let Some(item) = selected.0.and_then(|id| items.get(id)) else {
            debug!("[Player] Click at ({}, {}) with nothing selected", click.x, click.y);
            continue;
        };

        if let Ok(transform) = player_query.get_single() {
            let player = world_to_grid(transform.translation.truncate());
            let cell = grid.get_cell(click.x, click.y);
            if !cursor_is_valid(&cell, Some(item), IVec2::new(click.x, click.y), player) {
                debug!("[Player] {} cannot be used at ({}, {})", item.name, click.x, click.y);
                continue;
            }
        }

        let mut ctx = FarmContext {
            grid: &mut *grid,
            bag: &mut *bag,
            crops: &*crops,
            pending: &mut *pending,
            config: &*config,
        };
        let outcome = use_item_on_cell(item, click.x, click.y, &mut ctx);
        debug!("[Player] {} on ({}, {}) → {:?}", item.name, click.x, click.y, outcome);
    }
}
