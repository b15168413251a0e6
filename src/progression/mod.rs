//! Progression domain: the growth tree's task board, ruins the player
//! rebuilds, and the seed phase tracker.

use bevy::prelude::*;

use crate::inventory::Inventory;
use crate::shared::*;

pub mod building;
pub mod deposit;
pub mod phase;
pub mod tasks;

pub use building::{BuildProject, BuildProjects, BuildState};
pub use deposit::{ItemRequirement, RequirementDeposit};
pub use phase::{SeedPhase, SeedPhaseTracker};
pub use tasks::{
    default_tasks, StageCompleted, StageTracker, TaskBoard, TaskDefinition, TreeInteraction,
    AUTO_ADVANCE_STAGE,
};

/// Grid cell the growth tree stands on.
pub const TREE_GRID_X: i32 = 4;
pub const TREE_GRID_Y: i32 = 4;
/// World units from the tree at which the auto stage triggers.
pub const AUTO_ADVANCE_DISTANCE: f32 = TILE_SIZE * 1.5;

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum TaskRequestEvent {
    Interact,
    Deposit { item_id: ItemId, amount: u32 },
    Submit,
    Cancel,
}

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum BuildRequestEvent {
    Open { project: usize },
    Deposit { project: usize, item_id: ItemId, amount: u32 },
    Submit { project: usize },
    Cancel { project: usize },
}

/// The player reached the tree while it waits on the auto stage.
#[derive(Event, Debug, Clone, Copy)]
pub struct AutoAdvanceEvent;

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct StageAdvancedEvent(pub StageCompleted);

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct BuildCompletedEvent {
    pub name: String,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct PhaseAdvanceRequestEvent;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChangedEvent {
    pub phase: SeedPhase,
}

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

pub struct ProgressionPlugin;

impl Plugin for ProgressionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TaskBoard>()
            .init_resource::<BuildProjects>()
            .init_resource::<SeedPhaseTracker>()
            .add_event::<TaskRequestEvent>()
            .add_event::<BuildRequestEvent>()
            .add_event::<AutoAdvanceEvent>()
            .add_event::<StageAdvancedEvent>()
            .add_event::<BuildCompletedEvent>()
            .add_event::<PhaseAdvanceRequestEvent>()
            .add_event::<PhaseChangedEvent>()
            .add_systems(
                Update,
                (
                    detect_tree_proximity,
                    handle_auto_advance,
                    handle_task_requests,
                    handle_build_requests,
                    handle_phase_requests,
                )
                    .chain()
                    .before(crate::inventory::flush_inventory_updates)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

pub fn tree_position() -> Vec2 {
    grid_to_world(TREE_GRID_X, TREE_GRID_Y)
}

// ─────────────────────────────────────────────────────────────────────────────
// Systems
// ─────────────────────────────────────────────────────────────────────────────

pub fn detect_tree_proximity(
    board: Res<TaskBoard>,
    player_query: Query<&Transform, With<Player>>,
    mut auto_events: EventWriter<AutoAdvanceEvent>,
) {
    if board.current_stage() != AUTO_ADVANCE_STAGE {
        return;
    }
    let Ok(transform) = player_query.get_single() else {
        return;
    };
    if transform.translation.truncate().distance(tree_position()) <= AUTO_ADVANCE_DISTANCE {
        auto_events.send(AutoAdvanceEvent);
    }
}

pub fn handle_auto_advance(
    mut auto_events: EventReader<AutoAdvanceEvent>,
    mut board: ResMut<TaskBoard>,
    mut bag: ResMut<Inventory>,
    mut rules: ResMut<WorldRules>,
    mut stage_events: EventWriter<StageAdvancedEvent>,
) {
    for _ in auto_events.read() {
        if let Some(done) = board.auto_advance(&mut bag, &mut rules) {
            stage_events.send(StageAdvancedEvent(done));
        }
    }
}

pub fn handle_task_requests(
    mut requests: EventReader<TaskRequestEvent>,
    mut board: ResMut<TaskBoard>,
    mut bag: ResMut<Inventory>,
    mut rules: ResMut<WorldRules>,
    mut stage_events: EventWriter<StageAdvancedEvent>,
) {
    for request in requests.read() {
        match request {
            TaskRequestEvent::Interact => match board.interact(&mut bag, &mut rules) {
                TreeInteraction::Completed(done) => {
                    stage_events.send(StageAdvancedEvent(done));
                }
                other => debug!("[Progression] Tree interaction: {:?}", other),
            },
            TaskRequestEvent::Deposit { item_id, amount } => {
                board.deposit(&mut bag, *item_id, *amount);
            }
            TaskRequestEvent::Submit => {
                if let Some(done) = board.submit(&mut bag, &mut rules) {
                    stage_events.send(StageAdvancedEvent(done));
                }
            }
            TaskRequestEvent::Cancel => board.cancel(&mut bag),
        }
    }
}

pub fn handle_build_requests(
    mut requests: EventReader<BuildRequestEvent>,
    mut projects: ResMut<BuildProjects>,
    mut bag: ResMut<Inventory>,
    mut built_events: EventWriter<BuildCompletedEvent>,
) {
    for request in requests.read() {
        let index = match request {
            BuildRequestEvent::Open { project }
            | BuildRequestEvent::Deposit { project, .. }
            | BuildRequestEvent::Submit { project }
            | BuildRequestEvent::Cancel { project } => *project,
        };
        let Some(project) = projects.0.get_mut(index) else {
            warn!("[Progression] No build project at index {}", index);
            continue;
        };
        match request {
            BuildRequestEvent::Open { .. } => {
                project.open();
            }
            BuildRequestEvent::Deposit { item_id, amount, .. } => {
                project.deposit(&mut bag, *item_id, *amount);
            }
            BuildRequestEvent::Submit { .. } => {
                if project.submit() {
                    built_events.send(BuildCompletedEvent {
                        name: project.name.clone(),
                    });
                }
            }
            BuildRequestEvent::Cancel { .. } => project.cancel(&mut bag),
        }
    }
}

pub fn handle_phase_requests(
    mut requests: EventReader<PhaseAdvanceRequestEvent>,
    mut tracker: ResMut<SeedPhaseTracker>,
    mut phase_events: EventWriter<PhaseChangedEvent>,
) {
    for _ in requests.read() {
        match tracker.try_advance() {
            Some(phase) => {
                info!("[Progression] Seed phase now {:?}", phase);
                phase_events.send(PhaseChangedEvent { phase });
            }
            None => debug!("[Progression] Seed phase already at {:?}", tracker.current),
        }
    }
}
