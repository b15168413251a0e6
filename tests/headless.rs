//! Headless integration tests for MFarm.
//!
//! These tests exercise the game's ECS logic without a window or GPU.
//! They use Bevy's `MinimalPlugins` to tick the app, register every domain
//! plugin except keyboard/mouse input, and drive the game through the same
//! events the input layer would send.
//!
//! Run with: `cargo test --test headless`

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use mfarm::calendar::{CalendarPlugin, GameClock, ManualDayAdvanceEvent};
use mfarm::config::{FarmRng, GameConfig};
use mfarm::data::{populate_crops, populate_items, DataPlugin};
use mfarm::economy::{BuyRequestEvent, EconomyPlugin, SellRequestEvent, Wallet};
use mfarm::farming::{FarmGrid, FarmingPlugin, PendingHarvests};
use mfarm::inventory::{Inventory, InventoryError, InventoryPlugin};
use mfarm::player::PlayerPlugin;
use mfarm::progression::{ProgressionPlugin, StageAdvancedEvent, TaskBoard, TaskRequestEvent};
use mfarm::shared::*;
use mfarm::world::WorldPlugin;
use rand::rngs::StdRng;
use rand::SeedableRng;

const HOE: ItemId = 6001;
const WATERING_CAN: ItemId = 5008;
const TURNIP_SEEDS: ItemId = 1001;
const TURNIP: ItemId = 2001;

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builds a Bevy app with all shared resources, events and domain plugins
/// registered but NO rendering, windowing, or input.
fn build_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);

    // ── Game State ───────────────────────────────────────────────────────
    app.init_state::<GameState>();

    // ── Configured Resources (mirrors main.rs) ───────────────────────────
    let config = GameConfig {
        rng_seed: Some(7),
        ..Default::default()
    };
    app.insert_resource(FarmGrid::new(config.grid_bounds()))
        .insert_resource(mfarm::inventory::player_bag_from_config(&config))
        .insert_resource(FarmRng::from_config(&config))
        .insert_resource(GameClock::from_config(&config))
        .insert_resource(config);

    // ── Shared Resources ─────────────────────────────────────────────────
    app.init_resource::<ItemCatalog>()
        .init_resource::<CropCatalog>()
        .init_resource::<ShopCatalog>()
        .init_resource::<WorldRules>();

    // ── Shared Events (mirrors main.rs) ──────────────────────────────────
    app.add_event::<DayAdvanceEvent>()
        .add_event::<CellChangedEvent>()
        .add_event::<GrowthStageChangedEvent>()
        .add_event::<SpawnItemRequestEvent>()
        .add_event::<CropHarvestedEvent>()
        .add_event::<HarvestAnimationFinishedEvent>()
        .add_event::<ItemPickupEvent>()
        .add_event::<InventoryUpdatedEvent>()
        .add_event::<ItemSelectedEvent>()
        .add_event::<FarmClickEvent>()
        .add_event::<ShopTransactionEvent>();

    // ── Domain Plugins ───────────────────────────────────────────────────
    app.add_plugins((
        CalendarPlugin,
        InventoryPlugin,
        FarmingPlugin,
        PlayerPlugin,
        WorldPlugin,
        EconomyPlugin,
        ProgressionPlugin,
        DataPlugin,
    ));

    app
}

/// First update enters Loading and populates catalogs; second applies NextState.
fn boot(app: &mut App) {
    app.update();
    app.update();
    assert_eq!(
        app.world().resource::<State<GameState>>().get(),
        &GameState::Playing,
        "Expected to reach Playing after loading data"
    );
}

fn select(app: &mut App, item_id: ItemId) {
    app.world_mut().send_event(ItemSelectedEvent {
        item_id,
        selected: true,
    });
}

fn click(app: &mut App, x: i32, y: i32) {
    app.world_mut().send_event(FarmClickEvent { x, y });
    app.update();
}

fn cell(app: &mut App, x: i32, y: i32) -> GridCell {
    app.world_mut().resource_mut::<FarmGrid>().get_cell(x, y)
}

fn catalogs() -> (ItemCatalog, CropCatalog) {
    let mut items = ItemCatalog::default();
    let mut crops = CropCatalog::default();
    populate_items(&mut items);
    populate_crops(&mut crops);
    (items, crops)
}

#[test]
fn test_headless_boot_smoke_transitions_and_ticks() {
    let mut app = build_test_app();
    boot(&mut app);

    assert!(!app.world().resource::<ItemCatalog>().items.is_empty());
    assert!(!app.world().resource::<CropCatalog>().crops.is_empty());
    assert_eq!(app.world().resource::<Wallet>().balance(), 100);

    let mut players = app.world_mut().query_filtered::<Entity, With<Player>>();
    assert_eq!(players.iter(app.world()).count(), 1);

    // Smoke: run a small frame budget in Playing without panic.
    for _ in 0..60 {
        app.update();
    }
    assert_eq!(
        app.world().resource::<State<GameState>>().get(),
        &GameState::Playing
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Farmland grid
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_fresh_cell_defaults() {
    let mut grid = FarmGrid::default();
    let cell = grid.get_cell(3, 3);
    assert_eq!(cell.days_since_dug, UNSET);
    assert_eq!(cell.days_since_watered, UNSET);
    assert_eq!(cell.seed_item_code, UNSET);
    assert_eq!(cell.growth_days, UNSET);
    assert!(cell.is_diggable);
    assert!(grid.drain_changes().is_empty());
}

#[test]
fn test_dig_twice_only_first_succeeds() {
    let mut grid = FarmGrid::default();
    assert!(grid.try_dig(1, 1));
    assert!(!grid.try_dig(1, 1));
    assert_eq!(grid.drain_changes().len(), 1);
}

#[test]
fn test_water_requires_dug_soil() {
    let mut grid = FarmGrid::default();
    assert!(!grid.try_water(2, 2));
    assert!(grid.drain_changes().is_empty());
    grid.try_dig(2, 2);
    assert!(grid.try_water(2, 2));
    assert_eq!(grid.get_cell(2, 2).days_since_watered, 0);
}

#[test]
fn test_plant_requires_dug_soil() {
    let mut grid = FarmGrid::default();
    assert!(!grid.try_plant(0, 0, TURNIP_SEEDS));
    grid.try_dig(0, 0);
    assert!(grid.try_plant(0, 0, TURNIP_SEEDS));
    assert!(!grid.try_plant(0, 0, TURNIP_SEEDS));
    assert_eq!(grid.get_cell(0, 0).growth_days, 0);
}

#[test]
fn test_advance_day_grows_and_dries() {
    let (_, crops) = catalogs();
    let mut grid = FarmGrid::default();
    grid.try_dig(0, 0);
    grid.try_water(0, 0);
    grid.try_plant(0, 0, TURNIP_SEEDS);
    grid.try_dig(1, 0);

    let updates = grid.advance_day(&crops);
    assert_eq!(updates.len(), 1);

    let planted = grid.get_cell(0, 0);
    assert_eq!(planted.growth_days, 1);
    assert_eq!(planted.days_since_watered, UNSET);
    assert_eq!(grid.get_cell(1, 0).days_since_dug, 0);
}

fn crop_100(transform: Option<ItemId>) -> CropCatalog {
    let mut crops = CropCatalog::default();
    crops.insert(CropDetails {
        seed_item_id: 100,
        growth_days: vec![0, 2, 5],
        harvest_tool_ids: vec![],
        produced_item_ids: vec![TURNIP],
        produced_min_quantity: vec![2],
        produced_max_quantity: vec![2],
        harvested_transform_item_id: transform,
        is_harvested_animation: false,
        hide_crop_before_harvested_animation: false,
        disable_crop_colliders_before_harvested_animation: false,
    });
    crops
}

/// Dig, water and plant (2, 3), then grow it for five days.
fn grow_crop_100(grid: &mut FarmGrid, crops: &CropCatalog) {
    assert!(grid.try_dig(2, 3));
    assert!(grid.try_water(2, 3));
    assert!(grid.try_plant(2, 3, 100));

    let mut last = Vec::new();
    for _ in 0..5 {
        last = grid.advance_day(crops);
    }
    assert_eq!(last.len(), 1);
    assert_eq!((last[0].x, last[0].y, last[0].stage), (2, 3, 2));
    assert_eq!(grid.get_cell(2, 3).growth_days, 5);
}

#[test]
fn test_end_to_end_crop_grows_and_harvests_to_bare_soil() {
    let crops = crop_100(None);
    let mut grid = FarmGrid::default();
    grow_crop_100(&mut grid, &crops);

    let mut rng = StdRng::seed_from_u64(11);
    let result = grid.harvest(2, 3, &crops, &mut rng).unwrap();
    assert_eq!((result.x, result.y, result.seed_item_id), (2, 3, 100));
    assert_eq!(result.yields, vec![(TURNIP, 2)]);
    assert_eq!(result.transformed_into, None);

    let cleared = grid.get_cell(2, 3);
    assert_eq!(cleared.seed_item_code, UNSET);
    assert_eq!(cleared.growth_days, UNSET);
    assert_eq!(cleared.days_since_dug, UNSET);
    assert_eq!(cleared.days_since_watered, UNSET);
}

#[test]
fn test_end_to_end_crop_with_transform_regrows() {
    let crops = crop_100(Some(101));
    let mut grid = FarmGrid::default();
    grow_crop_100(&mut grid, &crops);

    let mut rng = StdRng::seed_from_u64(11);
    let result = grid.harvest(2, 3, &crops, &mut rng).unwrap();
    assert_eq!(result.yields, vec![(TURNIP, 2)]);
    assert_eq!(result.transformed_into, Some(101));

    let regrowing = grid.get_cell(2, 3);
    assert_eq!(regrowing.seed_item_code, 101);
    assert_eq!(regrowing.growth_days, 0);
    assert_eq!(regrowing.days_since_watered, UNSET);
    assert!(regrowing.is_dug());
}

#[test]
fn test_harvest_with_fixed_range_yields_exactly() {
    let mut crops = CropCatalog::default();
    crops.insert(CropDetails {
        seed_item_id: 100,
        growth_days: vec![0],
        harvest_tool_ids: vec![],
        produced_item_ids: vec![TURNIP],
        produced_min_quantity: vec![2],
        produced_max_quantity: vec![2],
        harvested_transform_item_id: None,
        is_harvested_animation: false,
        hide_crop_before_harvested_animation: false,
        disable_crop_colliders_before_harvested_animation: false,
    });
    let mut grid = FarmGrid::default();
    grid.try_dig(0, 0);
    grid.try_plant(0, 0, 100);

    let mut rng = StdRng::seed_from_u64(1);
    let result = grid.harvest(0, 0, &crops, &mut rng).unwrap();
    assert_eq!(result.yields, vec![(TURNIP, 2)]);

    let cleared = grid.get_cell(0, 0);
    assert!(!cleared.has_crop());
    assert!(!cleared.is_dug());
}

#[test]
fn test_stale_harvest_token_is_discarded() {
    let (_, crops) = catalogs();
    let mut grid = FarmGrid::default();
    let mut pending = PendingHarvests::default();
    let mut rng = StdRng::seed_from_u64(3);
    grid.try_dig(0, 0);
    grid.try_plant(0, 0, TURNIP_SEEDS);

    let token = pending.begin_harvest(&grid, &crops, 0, 0).unwrap();
    grid.reset();
    assert!(pending.complete_harvest(token, &mut grid, &crops, &mut rng).is_none());
    assert!(!pending.is_pending(token));
}

// ─────────────────────────────────────────────────────────────────────────────
// Inventory
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_inventory_add_remove_swap() {
    let mut bag = Inventory::default();
    assert!(bag.add_by_id(TURNIP, 3));
    assert!(bag.add_by_id(HOE, 1));
    assert_eq!(bag.slot_index(HOE), Some(1));

    assert!(bag.remove_by_id(TURNIP, 2));
    assert_eq!(bag.total_amount(TURNIP), 1);

    bag.swap_slots(0, 1).unwrap();
    assert_eq!(bag.slot_index(HOE), Some(0));
    assert_eq!(bag.slot_index(TURNIP), Some(1));
}

#[test]
fn test_swap_to_empty_slot_and_back_is_identity() {
    let mut bag = Inventory::default();
    bag.add_by_id(TURNIP, 3);
    bag.add_by_id(HOE, 1);
    let before = bag.slots().to_vec();

    bag.swap_slots(0, 5).unwrap();
    assert_eq!(bag.slot(0), Some(&InventorySlot::EMPTY));
    assert_eq!(bag.slot_index(TURNIP), Some(5));

    bag.swap_slots(5, 0).unwrap();
    assert_eq!(bag.slots(), before.as_slice());
}

#[test]
fn test_remove_shortage_leaves_bag_untouched() {
    let mut bag = Inventory::default();
    bag.add_by_id(TURNIP, 2);
    let before = bag.slots().to_vec();
    assert!(!bag.remove_by_id(TURNIP, 5));
    assert_eq!(bag.slots(), before.as_slice());
}

#[test]
fn test_swap_out_of_range_is_an_error() {
    let mut bag = Inventory::default();
    assert_eq!(
        bag.swap_slots(0, 99),
        Err(InventoryError::SlotOutOfRange {
            index: 99,
            capacity: DEFAULT_BAG_CAPACITY
        })
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Calendar
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Resource, Default)]
struct DayTicks(Vec<u32>);

fn record_day_ticks(mut events: EventReader<DayAdvanceEvent>, mut ticks: ResMut<DayTicks>) {
    ticks.0.extend(events.read().map(|ev| ev.day));
}

#[test]
fn test_clock_emits_one_day_tick_per_midnight() {
    let mut app = build_test_app();
    app.init_resource::<DayTicks>()
        .add_systems(Update, record_day_ticks);
    boot(&mut app);

    // 11.25 s per half day = 64 game minutes per real second.
    let mut clock = GameClock::new(11.25, 11.25);
    clock.hour = 23;
    clock.minute = 58;
    app.insert_resource(clock);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(125)));

    for _ in 0..4 {
        app.update();
    }

    assert_eq!(app.world().resource::<GameClock>().day, 2);
    assert_eq!(app.world().resource::<DayTicks>().0, vec![2]);
}

#[test]
fn test_manual_day_advance_grows_planted_crop() {
    let mut app = build_test_app();
    boot(&mut app);
    {
        let mut grid = app.world_mut().resource_mut::<FarmGrid>();
        grid.try_dig(0, 0);
        grid.try_plant(0, 0, TURNIP_SEEDS);
    }

    app.world_mut().send_event(ManualDayAdvanceEvent);
    app.update();
    app.update();

    assert_eq!(app.world().resource::<GameClock>().day, 2);
    assert_eq!(cell(&mut app, 0, 0).growth_days, 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Player actions, harvest and pickup
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_click_flow_digs_waters_and_plants() {
    let mut app = build_test_app();
    boot(&mut app);
    app.world_mut()
        .resource_mut::<Inventory>()
        .add_by_id(TURNIP_SEEDS, 2);

    select(&mut app, HOE);
    click(&mut app, 1, 0);
    assert!(cell(&mut app, 1, 0).is_dug());

    select(&mut app, WATERING_CAN);
    click(&mut app, 1, 0);
    assert!(cell(&mut app, 1, 0).is_watered());

    select(&mut app, TURNIP_SEEDS);
    click(&mut app, 1, 0);
    assert_eq!(cell(&mut app, 1, 0).seed_item_code, TURNIP_SEEDS);
    assert_eq!(app.world().resource::<Inventory>().total_amount(TURNIP_SEEDS), 1);

    // Out of reach: the player stands on (0, 0) and the hoe reaches one cell.
    select(&mut app, HOE);
    click(&mut app, 5, 5);
    assert!(!cell(&mut app, 5, 5).is_dug());
}

#[test]
fn test_harvest_spawns_produce_that_the_player_picks_up() {
    let mut app = build_test_app();
    boot(&mut app);
    app.world_mut()
        .resource_mut::<Inventory>()
        .add_by_id(TURNIP_SEEDS, 1);

    select(&mut app, HOE);
    click(&mut app, 1, 0);
    select(&mut app, TURNIP_SEEDS);
    click(&mut app, 1, 0);

    for _ in 0..5 {
        app.world_mut().send_event(ManualDayAdvanceEvent);
        app.update();
    }
    app.update();
    assert!(cell(&mut app, 1, 0).growth_days >= 5);

    select(&mut app, HOE);
    click(&mut app, 1, 0);
    for _ in 0..3 {
        app.update();
    }
    assert!(!cell(&mut app, 1, 0).has_crop());

    let mut items = app.world_mut().query::<&WorldItem>();
    let dropped = items.iter(app.world()).count();
    assert!((1..=2).contains(&dropped), "turnip yields 1–2, got {}", dropped);

    // Walk onto the harvested cell.
    let target = grid_to_world(1, 0).extend(10.0);
    let mut players = app.world_mut().query_filtered::<&mut Transform, With<Player>>();
    for mut transform in players.iter_mut(app.world_mut()) {
        transform.translation = target;
    }
    app.update();
    app.update();

    let mut items = app.world_mut().query::<&WorldItem>();
    assert_eq!(items.iter(app.world()).count(), 0);
    assert_eq!(
        app.world().resource::<Inventory>().total_amount(TURNIP) as usize,
        dropped
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Economy
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_buy_with_insufficient_funds_changes_nothing() {
    let mut app = build_test_app();
    boot(&mut app);
    app.insert_resource(Wallet::new(10));
    let before = app.world().resource::<Inventory>().slots().to_vec();

    app.world_mut().send_event(BuyRequestEvent { item_id: TURNIP_SEEDS });
    app.update();

    assert_eq!(app.world().resource::<Wallet>().balance(), 10);
    assert_eq!(app.world().resource::<Inventory>().slots(), before.as_slice());
    assert!(app.world().resource::<Events<ShopTransactionEvent>>().is_empty());
}

#[test]
fn test_buy_then_sell_round_trip() {
    let mut app = build_test_app();
    boot(&mut app);

    app.world_mut().send_event(BuyRequestEvent { item_id: TURNIP_SEEDS });
    app.update();
    assert_eq!(app.world().resource::<Wallet>().balance(), 80);
    assert_eq!(app.world().resource::<Inventory>().total_amount(TURNIP_SEEDS), 1);

    app.world_mut().send_event(SellRequestEvent {
        item_id: TURNIP_SEEDS,
        amount: 1,
    });
    app.update();
    // The shop buys back at full price.
    assert_eq!(app.world().resource::<Wallet>().balance(), 100);
    assert_eq!(app.world().resource::<Inventory>().total_amount(TURNIP_SEEDS), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Progression
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_task_submission_grants_rewards_and_advances_stage() {
    let mut app = build_test_app();
    boot(&mut app);
    app.world_mut().resource_mut::<Inventory>().add_by_id(3001, 5);

    app.world_mut().send_event(TaskRequestEvent::Interact);
    app.world_mut().send_event(TaskRequestEvent::Deposit {
        item_id: 3001,
        amount: 5,
    });
    app.world_mut().send_event(TaskRequestEvent::Submit);
    app.update();

    assert_eq!(app.world().resource::<TaskBoard>().current_stage(), 2);
    let bag = app.world().resource::<Inventory>();
    assert_eq!(bag.total_amount(3001), 0);
    assert_eq!(bag.total_amount(TURNIP_SEEDS), 5);
    assert_eq!(app.world().resource::<Events<StageAdvancedEvent>>().len(), 1);
}
