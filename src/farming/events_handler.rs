//! Handlers for cross-domain events: day ticks in, cell changes out.

use bevy::prelude::*;

use super::grid::FarmGrid;
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Day advance
// ─────────────────────────────────────────────────────────────────────────────

/// Grow every crop and dry every cell once per day tick, then tell the
/// display which stage each crop is at.
pub fn advance_grid_on_day_tick(
    mut day_ticks: EventReader<DayAdvanceEvent>,
    mut grid: ResMut<FarmGrid>,
    crops: Res<CropCatalog>,
    mut stage_events: EventWriter<GrowthStageChangedEvent>,
) {
    for ev in day_ticks.read() {
        let updates = grid.advance_day(&crops);
        info!(
            "[Farming] Day {} — {} crops growing",
            ev.day,
            updates.len()
        );
        for update in updates {
            stage_events.send(GrowthStageChangedEvent {
                x: update.x,
                y: update.y,
                seed_item_id: update.seed_item_id,
                stage: update.stage,
            });
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display sync
// ─────────────────────────────────────────────────────────────────────────────

pub fn flush_cell_changes(
    mut grid: ResMut<FarmGrid>,
    mut writer: EventWriter<CellChangedEvent>,
) {
    for cell in grid.drain_changes() {
        writer.send(CellChangedEvent { cell });
    }
}
