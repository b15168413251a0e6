//! Inventory domain: the player bag and its change notifications.

mod bag;

pub use bag::{Inventory, InventoryError};

use bevy::prelude::*;

use crate::config::GameConfig;
use crate::shared::*;

pub struct InventoryPlugin;

impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), announce_inventory)
            .add_systems(
                Update,
                (collect_picked_up_items, flush_inventory_updates)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// Size the player bag from config. Call before the app starts.
pub fn player_bag_from_config(config: &GameConfig) -> Inventory {
    Inventory::new(InventoryLocation::Player, config.bag_capacity)
}

fn announce_inventory(mut inventory: ResMut<Inventory>) {
    inventory.queue_snapshot();
}

/// Route world pickups into the bag one unit at a time.
pub fn collect_picked_up_items(
    mut pickups: EventReader<ItemPickupEvent>,
    mut inventory: ResMut<Inventory>,
) {
    for ev in pickups.read() {
        let added = inventory.add_one_unit_repeated(ev.item_id, ev.quantity);
        if added > 0 {
            debug!("[Inventory] Picked up {} × {}", added, ev.item_id);
        }
    }
}

/// Turn queued snapshots into `InventoryUpdatedEvent`s.
pub fn flush_inventory_updates(
    mut inventory: ResMut<Inventory>,
    mut writer: EventWriter<InventoryUpdatedEvent>,
) {
    let location = inventory.location();
    for slots in inventory.drain_snapshots() {
        writer.send(InventoryUpdatedEvent { location, slots });
    }
}
