//! Two-phase harvest: a harvest is requested, the crop plays its animation,
//! then the grid is actually updated and the produce spawned.

use std::collections::HashMap;

use bevy::prelude::*;
use rand::Rng;

use super::grid::{FarmGrid, HarvestResult};
use crate::config::FarmRng;
use crate::shared::*;

/// Seconds a crop with a harvest animation takes before it yields.
pub const HARVEST_ANIMATION_SECS: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingHarvest {
    x: i32,
    y: i32,
    seed_item_id: ItemId,
    planting: u64,
    remaining_secs: f32,
}

/// Harvests waiting on their animation, keyed by token.
#[derive(Resource, Debug, Default)]
pub struct PendingHarvests {
    next_token: u64,
    pending: HashMap<HarvestToken, PendingHarvest>,
}

impl PendingHarvests {
    /// Start harvesting the crop at `(x, y)`.
    ///
    /// `None` if nothing is planted there, its details are unknown, or a
    /// harvest of that cell is already in flight.
    pub fn begin_harvest(
        &mut self,
        grid: &FarmGrid,
        crops: &CropCatalog,
        x: i32,
        y: i32,
    ) -> Option<HarvestToken> {
        let cell = grid.peek_cell(x, y)?;
        if !cell.has_crop() {
            return None;
        }
        let details = crops.get(cell.seed_item_code)?;
        if self.pending.values().any(|p| p.x == x && p.y == y) {
            debug!("[Farming] Harvest already pending at ({}, {})", x, y);
            return None;
        }

        self.next_token += 1;
        let token = HarvestToken(self.next_token);
        let remaining_secs = if details.is_harvested_animation {
            HARVEST_ANIMATION_SECS
        } else {
            0.0
        };
        self.pending.insert(
            token,
            PendingHarvest {
                x,
                y,
                seed_item_id: cell.seed_item_code,
                planting: grid.planting(x, y),
                remaining_secs,
            },
        );
        debug!("[Farming] Harvest {:?} started at ({}, {})", token, x, y);
        Some(token)
    }

    /// Finish a pending harvest.
    ///
    /// The token is consumed either way. If the cell no longer holds the crop
    /// it was issued for, even a replant of the same seed, the harvest is
    /// discarded and `None` returned.
    pub fn complete_harvest(
        &mut self,
        token: HarvestToken,
        grid: &mut FarmGrid,
        crops: &CropCatalog,
        rng: &mut impl Rng,
    ) -> Option<HarvestResult> {
        let pending = self.pending.remove(&token)?;
        let still_there = grid
            .peek_cell(pending.x, pending.y)
            .is_some_and(|c| c.seed_item_code == pending.seed_item_id)
            && grid.planting(pending.x, pending.y) == pending.planting;
        if !still_there {
            debug!("[Farming] Discarding stale harvest {:?}", token);
            return None;
        }
        grid.harvest(pending.x, pending.y, crops, rng)
    }

    /// Drop a pending harvest whose crop went away.
    pub fn cancel(&mut self, token: HarvestToken) -> bool {
        self.pending.remove(&token).is_some()
    }

    pub fn is_pending(&self, token: HarvestToken) -> bool {
        self.pending.contains_key(&token)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advance animation timers and return the tokens that just finished.
    pub fn tick(&mut self, delta_secs: f32) -> Vec<HarvestToken> {
        let mut finished: Vec<HarvestToken> = self
            .pending
            .iter_mut()
            .filter_map(|(token, p)| {
                if p.remaining_secs <= 0.0 {
                    return Some(*token);
                }
                p.remaining_secs -= delta_secs;
                (p.remaining_secs <= 0.0).then_some(*token)
            })
            .collect();
        finished.sort_by_key(|t| t.0);
        // Stop them firing again while their completion is in flight.
        for token in &finished {
            if let Some(p) = self.pending.get_mut(token) {
                p.remaining_secs = f32::INFINITY;
            }
        }
        finished
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Systems
// ─────────────────────────────────────────────────────────────────────────────

/// Stand-in for the crop animation: reports harvests whose timer ran out.
pub fn tick_harvest_animations(
    time: Res<Time>,
    mut pending: ResMut<PendingHarvests>,
    mut finished: EventWriter<HarvestAnimationFinishedEvent>,
) {
    for token in pending.tick(time.delta_secs()) {
        finished.send(HarvestAnimationFinishedEvent { token });
    }
}

pub fn handle_harvest_completed(
    mut finished: EventReader<HarvestAnimationFinishedEvent>,
    mut pending: ResMut<PendingHarvests>,
    mut grid: ResMut<FarmGrid>,
    crops: Res<CropCatalog>,
    rules: Res<WorldRules>,
    mut rng: ResMut<FarmRng>,
    mut harvested: EventWriter<CropHarvestedEvent>,
) {
    for ev in finished.read() {
        let Some(mut result) = pending.complete_harvest(ev.token, &mut grid, &crops, &mut rng.0)
        else {
            continue;
        };
        result.apply_world_rules(&rules);
        info!(
            "[Farming] Harvested {} at ({}, {}) → {:?}",
            result.seed_item_id, result.x, result.y, result.yields
        );
        harvested.send(CropHarvestedEvent {
            x: result.x,
            y: result.y,
            seed_item_id: result.seed_item_id,
            yields: result.yields,
            transformed_into: result.transformed_into,
        });
    }
}

/// One spawn request per produced unit, scattered around the cell centre.
pub fn emit_harvest_spawns(
    mut harvested: EventReader<CropHarvestedEvent>,
    mut rng: ResMut<FarmRng>,
    mut spawns: EventWriter<SpawnItemRequestEvent>,
) {
    for ev in harvested.read() {
        let centre = grid_to_world(ev.x, ev.y);
        for &(item_id, qty) in &ev.yields {
            for _ in 0..qty {
                let jitter = Vec2::new(
                    rng.0.gen_range(-SPAWN_JITTER..=SPAWN_JITTER),
                    rng.0.gen_range(-SPAWN_JITTER..=SPAWN_JITTER),
                ) * TILE_SIZE;
                spawns.send(SpawnItemRequestEvent {
                    item_id,
                    position: centre + jitter,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup(animated: bool) -> (FarmGrid, CropCatalog) {
        let mut crops = CropCatalog::default();
        crops.insert(CropDetails {
            seed_item_id: 1001,
            growth_days: vec![0, 1],
            harvest_tool_ids: vec![],
            produced_item_ids: vec![2001],
            produced_min_quantity: vec![1],
            produced_max_quantity: vec![1],
            harvested_transform_item_id: None,
            is_harvested_animation: animated,
            hide_crop_before_harvested_animation: false,
            disable_crop_colliders_before_harvested_animation: false,
        });
        let mut grid = FarmGrid::default();
        grid.try_dig(0, 0);
        grid.try_plant(0, 0, 1001);
        (grid, crops)
    }

    #[test]
    fn test_begin_requires_crop() {
        let (grid, crops) = setup(false);
        let mut pending = PendingHarvests::default();
        assert!(pending.begin_harvest(&grid, &crops, 1, 1).is_none());
        assert!(pending.begin_harvest(&grid, &crops, 0, 0).is_some());
        assert!(pending.begin_harvest(&grid, &crops, 0, 0).is_none());
    }

    #[test]
    fn test_complete_applies_harvest() {
        let (mut grid, crops) = setup(false);
        let mut pending = PendingHarvests::default();
        let mut rng = StdRng::seed_from_u64(0);
        let token = pending.begin_harvest(&grid, &crops, 0, 0).unwrap();

        let result = pending.complete_harvest(token, &mut grid, &crops, &mut rng).unwrap();
        assert_eq!(result.yields, vec![(2001, 1)]);
        assert!(!pending.is_pending(token));
        assert!(!grid.peek_cell(0, 0).unwrap().has_crop());
    }

    #[test]
    fn test_stale_token_is_discarded() {
        let (mut grid, crops) = setup(false);
        let mut pending = PendingHarvests::default();
        let mut rng = StdRng::seed_from_u64(0);
        let token = pending.begin_harvest(&grid, &crops, 0, 0).unwrap();

        // Cell cleared behind the pending harvest's back.
        grid.reset();

        assert!(pending.complete_harvest(token, &mut grid, &crops, &mut rng).is_none());
        assert!(pending.is_empty());
        assert!(pending.complete_harvest(token, &mut grid, &crops, &mut rng).is_none());
    }

    #[test]
    fn test_token_is_stale_after_same_seed_replant() {
        let (mut grid, crops) = setup(false);
        let mut pending = PendingHarvests::default();
        let mut rng = StdRng::seed_from_u64(0);
        let token = pending.begin_harvest(&grid, &crops, 0, 0).unwrap();

        assert!(grid.harvest(0, 0, &crops, &mut rng).is_some());
        grid.try_dig(0, 0);
        assert!(grid.try_plant(0, 0, 1001));

        assert!(pending.complete_harvest(token, &mut grid, &crops, &mut rng).is_none());
        let cell = grid.peek_cell(0, 0).unwrap();
        assert_eq!(cell.seed_item_code, 1001);
        assert_eq!(cell.growth_days, 0);
    }

    #[test]
    fn test_watering_keeps_token_valid() {
        let (mut grid, crops) = setup(false);
        let mut pending = PendingHarvests::default();
        let mut rng = StdRng::seed_from_u64(0);
        let token = pending.begin_harvest(&grid, &crops, 0, 0).unwrap();

        assert!(grid.try_water(0, 0));
        assert!(pending.complete_harvest(token, &mut grid, &crops, &mut rng).is_some());
    }

    #[test]
    fn test_cancel() {
        let (grid, crops) = setup(false);
        let mut pending = PendingHarvests::default();
        let token = pending.begin_harvest(&grid, &crops, 0, 0).unwrap();
        assert!(pending.cancel(token));
        assert!(!pending.cancel(token));
    }

    #[test]
    fn test_tick_waits_for_animation() {
        let (grid, crops) = setup(true);
        let mut pending = PendingHarvests::default();
        let token = pending.begin_harvest(&grid, &crops, 0, 0).unwrap();

        assert!(pending.tick(0.2).is_empty());
        assert_eq!(pending.tick(0.4), vec![token]);
        assert!(pending.tick(1.0).is_empty());
        assert!(pending.is_pending(token));
    }

    #[test]
    fn test_tick_without_animation_finishes_immediately() {
        let (grid, crops) = setup(false);
        let mut pending = PendingHarvests::default();
        let token = pending.begin_harvest(&grid, &crops, 0, 0).unwrap();
        assert_eq!(pending.tick(0.0), vec![token]);
    }
}
