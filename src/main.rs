mod shared;
mod config;
mod data;
mod inventory;
mod farming;
mod calendar;
mod player;
mod world;
mod economy;
mod progression;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use calendar::GameClock;
use config::{FarmRng, GameConfig, DEFAULT_CONFIG_PATH};
use data::{CatalogOverridePath, DEFAULT_CATALOG_PATH};
use farming::FarmGrid;
use shared::*;

fn main() {
    let config = GameConfig::load_or_default(DEFAULT_CONFIG_PATH);

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "MFarm".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Game state
        .init_state::<GameState>()
        // Configured resources
        .insert_resource(FarmGrid::new(config.grid_bounds()))
        .insert_resource(inventory::player_bag_from_config(&config))
        .insert_resource(FarmRng::from_config(&config))
        .insert_resource(GameClock::from_config(&config))
        .insert_resource(CatalogOverridePath(DEFAULT_CATALOG_PATH.into()))
        .insert_resource(config)
        // Shared resources
        .init_resource::<ItemCatalog>()
        .init_resource::<CropCatalog>()
        .init_resource::<ShopCatalog>()
        .init_resource::<WorldRules>()
        // Events
        .add_event::<DayAdvanceEvent>()
        .add_event::<CellChangedEvent>()
        .add_event::<GrowthStageChangedEvent>()
        .add_event::<SpawnItemRequestEvent>()
        .add_event::<CropHarvestedEvent>()
        .add_event::<HarvestAnimationFinishedEvent>()
        .add_event::<ItemPickupEvent>()
        .add_event::<InventoryUpdatedEvent>()
        .add_event::<ItemSelectedEvent>()
        .add_event::<FarmClickEvent>()
        .add_event::<ShopTransactionEvent>()
        // Domain plugins
        .add_plugins(calendar::CalendarPlugin)
        .add_plugins(inventory::InventoryPlugin)
        .add_plugins(farming::FarmingPlugin)
        .add_plugins(player::PlayerPlugin)
        .add_plugins(player::PlayerInputPlugin)
        .add_plugins(world::WorldPlugin)
        .add_plugins(economy::EconomyPlugin)
        .add_plugins(progression::ProgressionPlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_scale(Vec3::splat(1.0 / PIXEL_SCALE)),
    ));
}
