use bevy::prelude::*;
use crate::shared::*;

/// Starting grid position, in the middle of the farm plot.
pub const SPAWN_GRID_X: i32 = 0;
pub const SPAWN_GRID_Y: i32 = 0;

/// Spawn the player entity. Runs once on `OnEnter(GameState::Playing)`.
pub fn spawn_player(
    mut commands: Commands,
    existing: Query<Entity, With<Player>>,
) {
    // Guard: don't double-spawn if returning to Playing state.
    if !existing.is_empty() {
        return;
    }

    let position = grid_to_world(SPAWN_GRID_X, SPAWN_GRID_Y);
    commands.spawn((
        Player,
        // Z = 10 so the player draws above world items.
        Transform::from_translation(position.extend(10.0)),
    ));
    info!("[Player] Spawned at ({}, {})", SPAWN_GRID_X, SPAWN_GRID_Y);
}
