//! Farmland grid store: per-coordinate soil and crop state.
//!
//! All transitions go through `&mut self`, so a day advance is one exclusive
//! sweep and no reader can see a half-updated grid. Changed cells are queued
//! and handed to `flush_cell_changes` for display sync.

use std::collections::HashMap;

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

/// Two `i32` coordinates packed into one map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridKey(u64);

impl GridKey {
    pub fn new(x: i32, y: i32) -> Self {
        Self(((x as u32 as u64) << 32) | (y as u32 as u64))
    }

    pub fn x(self) -> i32 {
        (self.0 >> 32) as u32 as i32
    }

    pub fn y(self) -> i32 {
        self.0 as u32 as i32
    }
}

/// What a successful harvest produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestResult {
    pub x: i32,
    pub y: i32,
    pub seed_item_id: ItemId,
    /// `(item, quantity)` per produced item, in catalog order.
    pub yields: Vec<(ItemId, u32)>,
    pub transformed_into: Option<ItemId>,
}

impl HarvestResult {
    pub fn total_units(&self) -> u32 {
        self.yields.iter().map(|&(_, qty)| qty).sum()
    }

    /// Scale the yields by the active world rules.
    pub fn apply_world_rules(&mut self, rules: &WorldRules) {
        if rules.is_active(WorldRuleType::DoubleHarvest) {
            for (_, qty) in &mut self.yields {
                *qty *= 2;
            }
        }
        if rules.is_active(WorldRuleType::BonusDrop) {
            if let Some((_, qty)) = self.yields.first_mut() {
                *qty += 1;
            }
        }
    }
}

/// New growth stage of a planted cell after a day advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageUpdate {
    pub x: i32,
    pub y: i32,
    pub seed_item_id: ItemId,
    pub stage: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridSummary {
    pub total: usize,
    pub dug: usize,
    pub watered: usize,
    pub planted: usize,
}

/// Roll one produced quantity. A degenerate range yields `min`.
pub fn roll_quantity(min: i32, max: i32, rng: &mut impl Rng) -> u32 {
    let qty = if min == max || max < min {
        min
    } else {
        rng.gen_range(min..=max)
    };
    qty.max(0) as u32
}

#[derive(Resource, Debug, Clone)]
pub struct FarmGrid {
    bounds: GridBounds,
    cells: HashMap<GridKey, GridCell>,
    /// Planting number of the crop in each cell; bumped on every new crop.
    plantings: HashMap<GridKey, u64>,
    next_planting: u64,
    changed: Vec<GridCell>,
}

impl Default for FarmGrid {
    fn default() -> Self {
        Self::new(GridBounds::default())
    }
}

impl FarmGrid {
    /// Provision every in-bounds cell with default terrain.
    pub fn new(bounds: GridBounds) -> Self {
        let mut grid = Self {
            bounds,
            cells: HashMap::with_capacity(bounds.cell_count()),
            plantings: HashMap::new(),
            next_planting: 0,
            changed: Vec::new(),
        };
        grid.provision();
        grid
    }

    fn provision(&mut self) {
        for (x, y) in self.bounds.iter() {
            self.cells.insert(GridKey::new(x, y), GridCell::new(x, y));
        }
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The cell at `(x, y)`, created with default terrain if it did not exist.
    pub fn get_cell(&mut self, x: i32, y: i32) -> GridCell {
        *self
            .cells
            .entry(GridKey::new(x, y))
            .or_insert_with(|| GridCell::new(x, y))
    }

    /// Read-only lookup; never creates a cell.
    pub fn peek_cell(&self, x: i32, y: i32) -> Option<&GridCell> {
        self.cells.get(&GridKey::new(x, y))
    }

    /// Identifies the crop currently in `(x, y)`. Two crops of the same seed
    /// planted one after the other get different values.
    pub fn planting(&self, x: i32, y: i32) -> u64 {
        self.plantings
            .get(&GridKey::new(x, y))
            .copied()
            .unwrap_or(0)
    }

    /// Overwrite a cell and queue a display-sync notification.
    pub fn set_cell(&mut self, x: i32, y: i32, mut cell: GridCell) {
        cell.x = x;
        cell.y = y;
        let key = GridKey::new(x, y);
        let replanted = cell.has_crop()
            && self.cells.get(&key).map_or(true, |old| {
                old.seed_item_code != cell.seed_item_code || cell.growth_days < old.growth_days
            });
        if replanted {
            self.next_planting += 1;
            self.plantings.insert(key, self.next_planting);
        } else if !cell.has_crop() {
            self.plantings.remove(&key);
        }
        self.cells.insert(key, cell);
        self.changed.push(cell);
    }

    pub fn try_dig(&mut self, x: i32, y: i32) -> bool {
        let mut cell = self.get_cell(x, y);
        if !cell.is_diggable || cell.is_dug() {
            debug!("[Farming] Cannot dig ({}, {})", x, y);
            return false;
        }
        cell.days_since_dug = 0;
        self.set_cell(x, y, cell);
        debug!("[Farming] Dug ({}, {})", x, y);
        true
    }

    pub fn try_water(&mut self, x: i32, y: i32) -> bool {
        let mut cell = self.get_cell(x, y);
        if !cell.is_dug() || cell.is_watered() {
            debug!("[Farming] Cannot water ({}, {})", x, y);
            return false;
        }
        cell.days_since_watered = 0;
        self.set_cell(x, y, cell);
        debug!("[Farming] Watered ({}, {})", x, y);
        true
    }

    pub fn try_plant(&mut self, x: i32, y: i32, seed: ItemId) -> bool {
        let mut cell = self.get_cell(x, y);
        if !cell.is_dug() || cell.has_crop() || seed <= EMPTY_ITEM {
            debug!("[Farming] Cannot plant {} at ({}, {})", seed, x, y);
            return false;
        }
        cell.seed_item_code = seed;
        cell.growth_days = 0;
        self.set_cell(x, y, cell);
        debug!("[Farming] Planted {} at ({}, {})", seed, x, y);
        true
    }

    /// Harvest whatever grows at `(x, y)`.
    ///
    /// `None` when the cell is empty or its crop is not in the catalog; the
    /// cell is left unchanged in both cases.
    pub fn harvest(
        &mut self,
        x: i32,
        y: i32,
        crops: &CropCatalog,
        rng: &mut impl Rng,
    ) -> Option<HarvestResult> {
        let mut cell = *self.peek_cell(x, y)?;
        if !cell.has_crop() {
            return None;
        }
        let Some(details) = crops.get(cell.seed_item_code) else {
            warn!(
                "[Farming] No crop details for seed {} at ({}, {})",
                cell.seed_item_code, x, y
            );
            return None;
        };

        let yields = details
            .produced_item_ids
            .iter()
            .enumerate()
            .map(|(i, &item)| {
                let min = details.produced_min_quantity.get(i).copied().unwrap_or(1);
                let max = details.produced_max_quantity.get(i).copied().unwrap_or(min);
                (item, roll_quantity(min, max, rng))
            })
            .collect();

        let seed_item_id = cell.seed_item_code;
        let transformed_into = details
            .harvested_transform_item_id
            .filter(|&id| id > EMPTY_ITEM);
        match transformed_into {
            Some(target) => {
                cell.seed_item_code = target;
                cell.growth_days = 0;
                cell.days_since_watered = UNSET;
            }
            None => cell.clear_crop_and_soil(),
        }
        self.set_cell(x, y, cell);

        Some(HarvestResult {
            x,
            y,
            seed_item_id,
            yields,
            transformed_into,
        })
    }

    /// Advance every cell by one day and report the new stage of every crop.
    ///
    /// Growing crops gain a day and all water dries up. `days_since_dug` is
    /// not aged.
    pub fn advance_day(&mut self, crops: &CropCatalog) -> Vec<StageUpdate> {
        let mut updates = Vec::new();
        let mut touched = Vec::new();

        for cell in self.cells.values_mut() {
            let mut changed = false;
            if cell.growth_days > UNSET {
                cell.growth_days += 1;
                changed = true;
            }
            if cell.days_since_watered > UNSET {
                cell.days_since_watered = UNSET;
                changed = true;
            }
            if changed {
                touched.push(*cell);
            }

            if cell.has_crop() {
                match crops.get(cell.seed_item_code) {
                    Some(details) => updates.push(StageUpdate {
                        x: cell.x,
                        y: cell.y,
                        seed_item_id: cell.seed_item_code,
                        stage: details.growth_stage_for(cell.growth_days),
                    }),
                    None => warn!(
                        "[Farming] No crop details for seed {} at ({}, {})",
                        cell.seed_item_code, cell.x, cell.y
                    ),
                }
            }
        }

        touched.sort_by_key(|c| (c.x, c.y));
        updates.sort_by_key(|u| (u.x, u.y));
        self.changed.extend(touched);
        updates
    }

    /// Notifications queued since the last drain, oldest first.
    pub fn drain_changes(&mut self) -> Vec<GridCell> {
        std::mem::take(&mut self.changed)
    }

    pub fn summary(&self) -> GridSummary {
        self.cells.values().fold(
            GridSummary {
                total: self.cells.len(),
                ..Default::default()
            },
            |mut acc, cell| {
                acc.dug += cell.is_dug() as usize;
                acc.watered += cell.is_watered() as usize;
                acc.planted += cell.has_crop() as usize;
                acc
            },
        )
    }

    /// Throw away all farm state and re-provision the bounds.
    pub fn reset(&mut self) {
        let mut dirty: Vec<GridCell> = self
            .cells
            .values()
            .filter(|c| c.is_dug() || c.is_watered() || c.has_crop())
            .map(|c| GridCell::new(c.x, c.y))
            .collect();
        dirty.sort_by_key(|c| (c.x, c.y));

        self.cells.clear();
        self.plantings.clear();
        self.provision();
        self.changed.extend(dirty);
        info!("[Farming] Grid reset to {} cells", self.cells.len());
    }
}
