//! Shared components, resources, events, and states for MFarm.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly, except through the
//! store resources (`FarmGrid`, `Inventory`) that the action layer drives.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE: top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    Paused,
}

// ═══════════════════════════════════════════════════════════════════════
// IDS & SENTINELS
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for every item type in the game.
/// Integer ids keep the catalogs compact and match the authored item tables.
pub type ItemId = i32;

/// Reserved item id meaning "this slot holds nothing".
pub const EMPTY_ITEM: ItemId = 0;

/// Reserved counter value meaning "not set" (not dug, not watered, no crop).
pub const UNSET: i32 = -1;

// ═══════════════════════════════════════════════════════════════════════
// ITEMS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Tool,
    Seed,
    Crop,
    Material,
    Creature,
    Consumable,
    Placeable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDetails {
    pub item_id: ItemId,
    pub name: String,
    pub item_type: ItemType,
    #[serde(default)]
    pub description: String,
    /// How many cells away from the player the item can be used.
    #[serde(default)]
    pub use_radius: i32,
    #[serde(default)]
    pub can_pick_up: bool,
    #[serde(default)]
    pub can_drop: bool,
    #[serde(default)]
    pub can_carry: bool,
    pub price: u32,
    /// Catalog data only; shops buy back at full `price`.
    #[serde(default)]
    pub sell_percentage: f32,
}

// ═══════════════════════════════════════════════════════════════════════
// ITEM CATALOG: loaded from data
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Default)]
pub struct ItemCatalog {
    pub items: HashMap<ItemId, ItemDetails>,
}

impl ItemCatalog {
    pub fn get(&self, id: ItemId) -> Option<&ItemDetails> {
        self.items.get(&id)
    }

    pub fn insert(&mut self, details: ItemDetails) {
        self.items.insert(details.item_id, details);
    }
}

/// Items the shop offers for sale, in display order.
#[derive(Resource, Debug, Clone, Default)]
pub struct ShopCatalog {
    pub item_ids: Vec<ItemId>,
}

impl ShopCatalog {
    pub fn sells(&self, id: ItemId) -> bool {
        self.item_ids.contains(&id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INVENTORY
// ═══════════════════════════════════════════════════════════════════════

/// Which container an inventory snapshot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InventoryLocation {
    #[default]
    Player,
    Box,
    Shop,
}

/// One fixed-position entry in an inventory. `{0, 0}` is the empty slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct InventorySlot {
    pub item_id: ItemId,
    pub quantity: u32,
}

impl InventorySlot {
    pub const EMPTY: InventorySlot = InventorySlot {
        item_id: EMPTY_ITEM,
        quantity: 0,
    };

    pub fn new(item_id: ItemId, quantity: u32) -> Self {
        if item_id == EMPTY_ITEM || quantity == 0 {
            return Self::EMPTY;
        }
        Self { item_id, quantity }
    }

    pub fn is_empty(&self) -> bool {
        self.item_id == EMPTY_ITEM
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CROPS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropDetails {
    /// The seed item this crop grows from; also the catalog key.
    pub seed_item_id: ItemId,
    /// Growth-stage thresholds: stage `i` is reached once `growth_days >= growth_days[i]`.
    pub growth_days: Vec<i32>,
    /// Tools that can harvest this crop. Empty = any tool.
    #[serde(default)]
    pub harvest_tool_ids: Vec<ItemId>,
    pub produced_item_ids: Vec<ItemId>,
    pub produced_min_quantity: Vec<i32>,
    pub produced_max_quantity: Vec<i32>,
    /// Crop that replaces this one after harvest (e.g. a bush regrowing berries).
    #[serde(default)]
    pub harvested_transform_item_id: Option<ItemId>,
    #[serde(default)]
    pub is_harvested_animation: bool,
    #[serde(default)]
    pub hide_crop_before_harvested_animation: bool,
    #[serde(default)]
    pub disable_crop_colliders_before_harvested_animation: bool,
}

impl CropDetails {
    pub fn growth_stage_count(&self) -> usize {
        self.growth_days.len()
    }

    /// Growth stage for a crop that has been growing for `days`.
    ///
    /// Scans from the last stage backwards so overlapping thresholds resolve
    /// to the most advanced stage. Falls back to stage 0.
    pub fn growth_stage_for(&self, days: i32) -> usize {
        self.growth_days
            .iter()
            .rposition(|&threshold| days >= threshold)
            .unwrap_or(0)
    }

    /// True once the crop has reached its final growth stage.
    pub fn is_mature(&self, days: i32) -> bool {
        match self.growth_days.last() {
            Some(&last) => days >= last,
            None => days >= 0,
        }
    }

    pub fn can_be_harvested_with(&self, tool_id: ItemId) -> bool {
        self.harvest_tool_ids.is_empty() || self.harvest_tool_ids.contains(&tool_id)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct CropCatalog {
    pub crops: HashMap<ItemId, CropDetails>,
}

impl CropCatalog {
    pub fn get(&self, seed_item_id: ItemId) -> Option<&CropDetails> {
        self.crops.get(&seed_item_id)
    }

    /// A transform id that is not a real item is stored as no transform.
    pub fn insert(&mut self, mut details: CropDetails) {
        details.harvested_transform_item_id = details
            .harvested_transform_item_id
            .filter(|&id| id > EMPTY_ITEM);
        self.crops.insert(details.seed_item_id, details);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FARMLAND GRID
// ═══════════════════════════════════════════════════════════════════════

/// Agricultural state of one grid coordinate.
///
/// Counters use [`UNSET`] for "never happened". A watered cell is always dug,
/// and a planted cell is always dug with `growth_days > -1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
    pub is_diggable: bool,
    pub can_drop_item: bool,
    pub can_place_furniture: bool,
    pub is_path: bool,
    pub is_npc_obstacle: bool,
    pub days_since_dug: i32,
    pub days_since_watered: i32,
    pub seed_item_code: i32,
    pub growth_days: i32,
}

impl GridCell {
    /// Default terrain: diggable, droppable, nothing dug or planted.
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            is_diggable: true,
            can_drop_item: true,
            can_place_furniture: false,
            is_path: false,
            is_npc_obstacle: false,
            days_since_dug: UNSET,
            days_since_watered: UNSET,
            seed_item_code: UNSET,
            growth_days: UNSET,
        }
    }

    pub fn is_dug(&self) -> bool {
        self.days_since_dug > UNSET
    }

    pub fn is_watered(&self) -> bool {
        self.days_since_watered > UNSET
    }

    pub fn has_crop(&self) -> bool {
        self.seed_item_code > UNSET
    }

    /// Reset every agricultural counter; terrain flags are kept.
    pub fn clear_crop_and_soil(&mut self) {
        self.seed_item_code = UNSET;
        self.growth_days = UNSET;
        self.days_since_dug = UNSET;
        self.days_since_watered = UNSET;
    }
}

/// The pre-provisioned rectangle of cells, in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub origin_x: i32,
    pub origin_y: i32,
    pub width: i32,
    pub height: i32,
}

impl GridBounds {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.origin_x
            && x < self.origin_x + self.width
            && y >= self.origin_y
            && y < self.origin_y + self.height
    }

    pub fn cell_count(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (self.origin_x..self.origin_x + self.width)
            .flat_map(move |x| (self.origin_y..self.origin_y + self.height).map(move |y| (x, y)))
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self {
            origin_x: -15,
            origin_y: -20,
            width: 40,
            height: 34,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// WORLD RULES: permanent modifiers unlocked by progression
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WorldRuleType {
    #[default]
    None,
    BonusDrop,
    DoubleHarvest,
    UnlockNewItem,
    AddAnimalSpawn,
    SpecialRule,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct WorldRules {
    active: HashSet<WorldRuleType>,
}

impl WorldRules {
    /// Activate a rule. Returns false if it was already active.
    pub fn apply(&mut self, rule: WorldRuleType) -> bool {
        self.active.insert(rule)
    }

    pub fn is_active(&self, rule: WorldRuleType) -> bool {
        self.active.contains(&rule)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// Opaque handle for a harvest waiting on its animation to finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HarvestToken(pub u64);

// ═══════════════════════════════════════════════════════════════════════
// COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component, Debug, Clone, Default)]
pub struct Player;

/// An item lying in the world, waiting to be picked up.
#[derive(Component, Debug, Clone, Copy)]
pub struct WorldItem {
    pub item_id: ItemId,
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS: cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// The in-game day rolled over.
#[derive(Event, Debug, Clone)]
pub struct DayAdvanceEvent {
    pub day: u32,
}

/// Display sync: a cell's state changed and its tiles should be redrawn.
#[derive(Event, Debug, Clone)]
pub struct CellChangedEvent {
    pub cell: GridCell,
}

/// Display sync: a planted cell should be redrawn at this growth stage.
#[derive(Event, Debug, Clone)]
pub struct GrowthStageChangedEvent {
    pub x: i32,
    pub y: i32,
    pub seed_item_id: ItemId,
    pub stage: usize,
}

/// Ask the world to instantiate a pick-up-able item entity.
#[derive(Event, Debug, Clone)]
pub struct SpawnItemRequestEvent {
    pub item_id: ItemId,
    pub position: Vec2,
}

#[derive(Event, Debug, Clone)]
pub struct CropHarvestedEvent {
    pub x: i32,
    pub y: i32,
    pub seed_item_id: ItemId,
    pub yields: Vec<(ItemId, u32)>,
    pub transformed_into: Option<ItemId>,
}

/// The crop animation for a pending harvest reached its harvested state.
#[derive(Event, Debug, Clone)]
pub struct HarvestAnimationFinishedEvent {
    pub token: HarvestToken,
}

/// A world item was collected and should go into the player bag.
#[derive(Event, Debug, Clone)]
pub struct ItemPickupEvent {
    pub item_id: ItemId,
    pub quantity: u32,
}

/// Post-mutation snapshot of an inventory, for UI refresh.
#[derive(Event, Debug, Clone)]
pub struct InventoryUpdatedEvent {
    pub location: InventoryLocation,
    pub slots: Vec<InventorySlot>,
}

/// The player selected (or deselected) an item in the bag / hotbar.
#[derive(Event, Debug, Clone)]
pub struct ItemSelectedEvent {
    pub item_id: ItemId,
    pub selected: bool,
}

/// The player clicked a grid cell with the current item.
#[derive(Event, Debug, Clone)]
pub struct FarmClickEvent {
    pub x: i32,
    pub y: i32,
}

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ShopTransactionEvent {
    pub item_id: ItemId,
    pub quantity: u32,
    pub total: u32,
    pub is_purchase: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const TILE_SIZE: f32 = 16.0;
pub const PIXEL_SCALE: f32 = 3.0; // render scale (16px × 3 = 48px on screen)
pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 540.0;

pub const DEFAULT_BAG_CAPACITY: usize = 20;

/// Harvested items scatter up to this fraction of a tile from the cell centre.
pub const SPAWN_JITTER: f32 = 0.15;

/// World-space centre of a grid cell.
pub fn grid_to_world(x: i32, y: i32) -> Vec2 {
    Vec2::new((x as f32 + 0.5) * TILE_SIZE, (y as f32 + 0.5) * TILE_SIZE)
}

/// Grid cell containing a world-space point.
pub fn world_to_grid(position: Vec2) -> IVec2 {
    IVec2::new(
        (position.x / TILE_SIZE).floor() as i32,
        (position.y / TILE_SIZE).floor() as i32,
    )
}
