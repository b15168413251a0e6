//! Farming domain: the farmland grid, crop growth, harvest.
//!
//! The grid itself is a plain resource driven by the action layer (player
//! domain). This plugin only owns the systems that react to time passing and
//! that turn queued grid changes into events.

use bevy::prelude::*;

use crate::config::FarmRng;
use crate::shared::*;

mod events_handler;
mod grid;
mod harvest;

pub use events_handler::{advance_grid_on_day_tick, flush_cell_changes};
pub use grid::{roll_quantity, FarmGrid, GridKey, GridSummary, HarvestResult, StageUpdate};
pub use harvest::{
    emit_harvest_spawns, handle_harvest_completed, tick_harvest_animations, PendingHarvests,
    HARVEST_ANIMATION_SECS,
};

pub struct FarmingPlugin;

impl Plugin for FarmingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FarmGrid>()
            .init_resource::<FarmRng>()
            .init_resource::<PendingHarvests>()
            .init_resource::<WorldRules>()
            .add_systems(
                Update,
                (
                    advance_grid_on_day_tick,
                    tick_harvest_animations,
                    handle_harvest_completed,
                    emit_harvest_spawns,
                    // Visual sync: after every grid mutation this frame
                    flush_cell_changes,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}
