mod cursor;
mod input;
mod item_use;
mod spawn;

pub use cursor::cursor_is_valid;
pub use input::PlayerInputPlugin;
pub use item_use::{handle_farm_click, use_item_on_cell, FarmContext, ItemUseOutcome};
pub use spawn::{spawn_player, SPAWN_GRID_X, SPAWN_GRID_Y};

use bevy::prelude::*;
use crate::shared::*;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectedItem>();

        // -- Spawn player when we enter Playing --
        app.add_systems(OnEnter(GameState::Playing), spawn::spawn_player);

        // -- Selection must land before the click that uses it --
        app.add_systems(
            Update,
            (track_selected_item, item_use::handle_farm_click)
                .chain()
                .before(crate::farming::flush_cell_changes)
                .before(crate::inventory::flush_inventory_updates)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// The item currently held, if any.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectedItem(pub Option<ItemId>);

pub fn track_selected_item(
    mut events: EventReader<ItemSelectedEvent>,
    mut selected: ResMut<SelectedItem>,
) {
    for ev in events.read() {
        selected.0 = if ev.selected && ev.item_id != EMPTY_ITEM {
            Some(ev.item_id)
        } else {
            None
        };
        debug!("[Player] Selected item: {:?}", selected.0);
    }
}
