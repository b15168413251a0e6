//! World domain: loose items lying on the ground.
//!
//! Responsible for:
//! - Instantiating world items requested by other domains (harvest produce)
//! - Collecting items the player walks over

use bevy::prelude::*;

use crate::config::GameConfig;
use crate::inventory::Inventory;
use crate::shared::*;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                spawn_world_items.after(crate::farming::emit_harvest_spawns),
                pickup_nearby_items.before(crate::inventory::collect_picked_up_items),
            )
                .run_if(in_state(GameState::Playing)),
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_world_items(
    mut commands: Commands,
    mut requests: EventReader<SpawnItemRequestEvent>,
) {
    for req in requests.read() {
        if req.item_id == EMPTY_ITEM {
            continue;
        }
        commands.spawn((
            WorldItem { item_id: req.item_id },
            // Z = 5: above the ground, below the player.
            Transform::from_translation(req.position.extend(5.0)),
        ));
        debug!("[World] Spawned item {} at {:?}", req.item_id, req.position);
    }
}

/// Items within `pickup_radius` of the player go into the bag one at a time.
/// Anything the bag cannot take stays on the ground.
pub fn pickup_nearby_items(
    mut commands: Commands,
    config: Res<GameConfig>,
    catalog: Res<ItemCatalog>,
    bag: Res<Inventory>,
    player_query: Query<&Transform, With<Player>>,
    item_query: Query<(Entity, &WorldItem, &Transform), Without<Player>>,
    mut pickups: EventWriter<ItemPickupEvent>,
) {
    let Ok(player) = player_query.get_single() else {
        return;
    };
    let player_pos = player.translation.truncate();
    // Room claimed by earlier pickups this frame, before the bag sees them.
    let mut projected = bag.clone();

    for (entity, item, transform) in &item_query {
        if transform.translation.truncate().distance(player_pos) > config.pickup_radius {
            continue;
        }
        let can_pick_up = catalog
            .get(item.item_id)
            .is_some_and(|details| details.can_pick_up);
        if !can_pick_up || !projected.can_accept(item.item_id) {
            continue;
        }
        projected.add_by_id(item.item_id, 1);
        pickups.send(ItemPickupEvent {
            item_id: item.item_id,
            quantity: 1,
        });
        commands.entity(entity).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    fn world_app(bag: Inventory) -> App {
        let mut catalog = ItemCatalog::default();
        crate::data::populate_items(&mut catalog);

        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<GameState>()
            .init_resource::<GameConfig>()
            .insert_resource(catalog)
            .insert_resource(bag)
            .add_event::<SpawnItemRequestEvent>()
            .add_event::<ItemPickupEvent>()
            .add_event::<InventoryUpdatedEvent>()
            .add_systems(
                Update,
                (pickup_nearby_items, crate::inventory::collect_picked_up_items).chain(),
            );
        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::Playing);
        app
    }

    #[test]
    fn test_two_items_and_one_free_slot_leaves_one_on_ground() {
        let mut bag = Inventory::new(InventoryLocation::Player, 2);
        bag.add_by_id(3001, 1);
        let mut app = world_app(bag);

        app.world_mut().spawn((Player, Transform::from_xyz(0.0, 0.0, 10.0)));
        for item_id in [2001, 2002] {
            app.world_mut()
                .spawn((WorldItem { item_id }, Transform::from_xyz(0.0, 0.0, 5.0)));
        }
        app.update();
        app.update();

        let held = {
            let bag = app.world().resource::<Inventory>();
            bag.total_amount(2001) + bag.total_amount(2002)
        };
        let on_ground = app
            .world_mut()
            .query::<&WorldItem>()
            .iter(app.world())
            .count();
        assert_eq!(held, 1);
        assert_eq!(on_ground, 1);
        assert_eq!(app.world().resource::<Inventory>().total_amount(3001), 1);
    }

    #[test]
    fn test_same_item_stacks_into_one_free_slot() {
        let mut bag = Inventory::new(InventoryLocation::Player, 2);
        bag.add_by_id(3001, 1);
        let mut app = world_app(bag);

        app.world_mut().spawn((Player, Transform::from_xyz(0.0, 0.0, 10.0)));
        for _ in 0..2 {
            app.world_mut()
                .spawn((WorldItem { item_id: 2001 }, Transform::from_xyz(0.0, 0.0, 5.0)));
        }
        app.update();
        app.update();

        assert_eq!(app.world().resource::<Inventory>().total_amount(2001), 2);
        let on_ground = app
            .world_mut()
            .query::<&WorldItem>()
            .iter(app.world())
            .count();
        assert_eq!(on_ground, 0);
    }
}
