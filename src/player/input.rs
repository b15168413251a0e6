//! Keyboard and mouse → player events. Only the windowed binary adds this;
//! headless apps drive the same events directly.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::calendar::ManualDayAdvanceEvent;
use crate::inventory::Inventory;
use crate::shared::*;

/// Walk speed in world units per second.
const PLAYER_SPEED: f32 = 64.0;

const HOTBAR_KEYS: [KeyCode; 10] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
    KeyCode::Digit0,
];

pub struct PlayerInputPlugin;

impl Plugin for PlayerInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                player_movement,
                hotbar_select,
                mouse_click_to_farm_click,
                sleep_key,
                camera_follow_player.after(player_movement),
                attach_placeholder_sprites,
            )
                .run_if(in_state(GameState::Playing)),
        );
    }
}

fn player_movement(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<&mut Transform, With<Player>>,
) {
    let Ok(mut transform) = query.get_single_mut() else {
        return;
    };

    let mut dir = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        dir.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        dir.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        dir.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        dir.x += 1.0;
    }
    if dir == Vec2::ZERO {
        return;
    }

    // Normalise so diagonal speed equals cardinal speed.
    let delta = dir.normalize() * PLAYER_SPEED * time.delta_secs();
    transform.translation += delta.extend(0.0);
}

/// Number keys pick the matching bag slot; an empty slot deselects.
fn hotbar_select(
    keyboard: Res<ButtonInput<KeyCode>>,
    bag: Res<Inventory>,
    mut writer: EventWriter<ItemSelectedEvent>,
) {
    for (index, key) in HOTBAR_KEYS.iter().enumerate() {
        if !keyboard.just_pressed(*key) {
            continue;
        }
        let slot = bag.slot(index).copied().unwrap_or(InventorySlot::EMPTY);
        writer.send(ItemSelectedEvent {
            item_id: slot.item_id,
            selected: !slot.is_empty(),
        });
    }
}

fn mouse_click_to_farm_click(
    mouse: Res<ButtonInput<MouseButton>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    mut writer: EventWriter<FarmClickEvent>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = window_query.get_single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };
    let Ok(world) = camera.viewport_to_world_2d(camera_transform, cursor) else {
        return;
    };

    let cell = world_to_grid(world);
    writer.send(FarmClickEvent { x: cell.x, y: cell.y });
}

fn sleep_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut writer: EventWriter<ManualDayAdvanceEvent>,
) {
    if keyboard.just_pressed(KeyCode::KeyN) {
        writer.send(ManualDayAdvanceEvent);
    }
}

fn camera_follow_player(
    player_query: Query<&Transform, (With<Player>, Without<Camera2d>)>,
    mut camera_query: Query<&mut Transform, With<Camera2d>>,
) {
    let Ok(player) = player_query.get_single() else {
        return;
    };
    let Ok(mut camera) = camera_query.get_single_mut() else {
        return;
    };
    camera.translation.x = player.translation.x;
    camera.translation.y = player.translation.y;
}

/// Flat coloured squares so the player and loose items are visible.
fn attach_placeholder_sprites(
    mut commands: Commands,
    players: Query<Entity, Added<Player>>,
    items: Query<Entity, Added<WorldItem>>,
) {
    for entity in &players {
        commands.entity(entity).insert(Sprite {
            color: Color::srgb(0.2, 0.5, 0.8),
            custom_size: Some(Vec2::splat(TILE_SIZE)),
            ..default()
        });
    }
    for entity in &items {
        commands.entity(entity).insert(Sprite {
            color: Color::srgb(0.9, 0.7, 0.2),
            custom_size: Some(Vec2::splat(TILE_SIZE * 0.5)),
            ..default()
        });
    }
}
