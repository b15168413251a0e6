//! The growth tree and the tasks that move it from stage to stage.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::deposit::{ItemRequirement, RequirementDeposit};
use crate::inventory::Inventory;
use crate::shared::*;

/// Stage that advances on its own once the player walks up to the tree.
pub const AUTO_ADVANCE_STAGE: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub stage: u32,
    pub description: String,
    /// Whether the stage asks for items through the submit panel.
    pub has_ui: bool,
    pub requirements: Vec<ItemRequirement>,
    pub world_rule: WorldRuleType,
    pub rewards: Vec<ItemRequirement>,
}

/// 1-based stage counter that wraps back to 1 after the last stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTracker {
    pub current_stage: u32,
    pub total_stages: u32,
}

impl StageTracker {
    pub fn new(total_stages: u32) -> Self {
        Self {
            current_stage: 1,
            total_stages: total_stages.max(1),
        }
    }

    pub fn is_final(&self) -> bool {
        self.current_stage == self.total_stages
    }

    pub fn advance(&mut self) -> u32 {
        self.current_stage += 1;
        if self.current_stage > self.total_stages {
            self.current_stage = 1;
        }
        self.current_stage
    }
}

/// What clicking the tree did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeInteraction {
    OpenedTask,
    AlreadyOpen,
    Completed(StageCompleted),
    /// The auto stage ignores clicks.
    WaitingForPlayer,
    /// Nothing left to do on the last stage.
    FinalStage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCompleted {
    pub completed_stage: u32,
    pub new_stage: u32,
    pub rewards: Vec<ItemRequirement>,
    pub world_rule: WorldRuleType,
}

#[derive(Resource, Debug, Clone)]
pub struct TaskBoard {
    tasks: Vec<TaskDefinition>,
    tracker: StageTracker,
    open: Option<RequirementDeposit>,
}

impl Default for TaskBoard {
    fn default() -> Self {
        Self::new(default_tasks(), 5)
    }
}

impl TaskBoard {
    pub fn new(tasks: Vec<TaskDefinition>, total_stages: u32) -> Self {
        Self {
            tasks,
            tracker: StageTracker::new(total_stages),
            open: None,
        }
    }

    pub fn current_stage(&self) -> u32 {
        self.tracker.current_stage
    }

    pub fn tracker(&self) -> StageTracker {
        self.tracker
    }

    pub fn current_task(&self) -> Option<&TaskDefinition> {
        self.tasks.iter().find(|t| t.stage == self.tracker.current_stage)
    }

    pub fn open_deposit(&self) -> Option<&RequirementDeposit> {
        self.open.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// React to the player clicking the tree.
    pub fn interact(&mut self, bag: &mut Inventory, rules: &mut WorldRules) -> TreeInteraction {
        if self.tracker.current_stage == AUTO_ADVANCE_STAGE {
            return TreeInteraction::WaitingForPlayer;
        }
        if self.tracker.is_final() {
            return TreeInteraction::FinalStage;
        }
        if self.open.is_some() {
            return TreeInteraction::AlreadyOpen;
        }
        if self.open_current() {
            return TreeInteraction::OpenedTask;
        }
        TreeInteraction::Completed(self.complete_stage(bag, rules))
    }

    /// Open the submit panel for the current stage's task, if it has one.
    pub fn open_current(&mut self) -> bool {
        let Some(task) = self.current_task().filter(|t| t.has_ui) else {
            return false;
        };
        if self.open.is_none() {
            self.open = Some(RequirementDeposit::new(&task.requirements));
        }
        true
    }

    pub fn deposit(&mut self, bag: &mut Inventory, item_id: ItemId, amount: u32) -> u32 {
        match self.open.as_mut() {
            Some(deposit) => deposit.deposit(bag, item_id, amount),
            None => 0,
        }
    }

    /// Complete the open task if every requirement is covered. The deposited
    /// items are consumed.
    pub fn submit(&mut self, bag: &mut Inventory, rules: &mut WorldRules) -> Option<StageCompleted> {
        if !self.open.as_ref()?.is_complete() {
            debug!("[Progression] Task for stage {} is not complete yet", self.current_stage());
            return None;
        }
        self.open = None;
        Some(self.complete_stage(bag, rules))
    }

    /// Close the submit panel and hand back everything deposited.
    pub fn cancel(&mut self, bag: &mut Inventory) {
        if let Some(mut deposit) = self.open.take() {
            deposit.refund(bag);
        }
    }

    /// Proximity trigger for the auto stage. `None` on any other stage.
    pub fn auto_advance(&mut self, bag: &mut Inventory, rules: &mut WorldRules) -> Option<StageCompleted> {
        if self.tracker.current_stage != AUTO_ADVANCE_STAGE {
            return None;
        }
        Some(self.complete_stage(bag, rules))
    }

    fn complete_stage(&mut self, bag: &mut Inventory, rules: &mut WorldRules) -> StageCompleted {
        let completed_stage = self.tracker.current_stage;
        let task = self.current_task().cloned();
        let new_stage = self.tracker.advance();

        let (rewards, world_rule) = match task {
            Some(task) => (task.rewards, task.world_rule),
            None => (Vec::new(), WorldRuleType::None),
        };
        for reward in &rewards {
            if reward.item_id > EMPTY_ITEM && reward.amount > 0 {
                bag.add_by_id(reward.item_id, reward.amount);
            }
        }
        if world_rule != WorldRuleType::None && rules.apply(world_rule) {
            info!("[Progression] World rule applied: {:?}", world_rule);
        }
        info!("[Progression] Tree stage {} → {}", completed_stage, new_stage);

        StageCompleted {
            completed_stage,
            new_stage,
            rewards,
            world_rule,
        }
    }
}

/// The growth tree's five stages.
pub fn default_tasks() -> Vec<TaskDefinition> {
    vec![
        TaskDefinition {
            stage: 1,
            description: "The sapling needs a fence. Bring some wood.".into(),
            has_ui: true,
            requirements: vec![ItemRequirement::new(3001, 5)],
            world_rule: WorldRuleType::None,
            rewards: vec![ItemRequirement::new(1001, 5)],
        },
        TaskDefinition {
            stage: 2,
            description: "Share the first berries with the tree.".into(),
            has_ui: true,
            requirements: vec![ItemRequirement::new(2002, 3)],
            world_rule: WorldRuleType::BonusDrop,
            rewards: vec![ItemRequirement::new(1002, 2)],
        },
        TaskDefinition {
            stage: 3,
            description: "The tree wants to see you up close.".into(),
            has_ui: false,
            requirements: vec![],
            world_rule: WorldRuleType::None,
            rewards: vec![ItemRequirement::new(4001, 1)],
        },
        TaskDefinition {
            stage: 4,
            description: "A harvest festival for the tree.".into(),
            has_ui: true,
            requirements: vec![ItemRequirement::new(2001, 10), ItemRequirement::new(3002, 5)],
            world_rule: WorldRuleType::DoubleHarvest,
            rewards: vec![ItemRequirement::new(4001, 3)],
        },
        TaskDefinition {
            stage: 5,
            description: "The tree is fully grown.".into(),
            has_ui: false,
            requirements: vec![],
            world_rule: WorldRuleType::None,
            rewards: vec![],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_at(stage: u32) -> TaskBoard {
        let mut board = TaskBoard::default();
        board.tracker.current_stage = stage;
        board
    }

    #[test]
    fn test_tracker_wraps_to_first_stage() {
        let mut tracker = StageTracker::new(3);
        assert_eq!(tracker.advance(), 2);
        assert_eq!(tracker.advance(), 3);
        assert!(tracker.is_final());
        assert_eq!(tracker.advance(), 1);
    }

    #[test]
    fn test_submit_grants_rewards_and_advances() {
        let mut board = TaskBoard::default();
        let mut bag = Inventory::default();
        let mut rules = WorldRules::default();
        bag.add_by_id(3001, 6);

        assert_eq!(board.interact(&mut bag, &mut rules), TreeInteraction::OpenedTask);
        assert!(board.submit(&mut bag, &mut rules).is_none());
        assert_eq!(board.deposit(&mut bag, 3001, 6), 5);

        let done = board.submit(&mut bag, &mut rules).unwrap();
        assert_eq!((done.completed_stage, done.new_stage), (1, 2));
        assert_eq!(bag.total_amount(3001), 1);
        assert_eq!(bag.total_amount(1001), 5);
        assert!(!board.is_open());
    }

    #[test]
    fn test_completion_applies_world_rule() {
        let mut board = board_at(2);
        let mut bag = Inventory::default();
        let mut rules = WorldRules::default();
        bag.add_by_id(2002, 3);
        board.open_current();
        board.deposit(&mut bag, 2002, 3);
        board.submit(&mut bag, &mut rules).unwrap();
        assert!(rules.is_active(WorldRuleType::BonusDrop));
    }

    #[test]
    fn test_cancel_refunds_deposit() {
        let mut board = TaskBoard::default();
        let mut bag = Inventory::default();
        let mut rules = WorldRules::default();
        bag.add_by_id(3001, 3);
        board.interact(&mut bag, &mut rules);
        board.deposit(&mut bag, 3001, 3);
        assert_eq!(bag.total_amount(3001), 0);

        board.cancel(&mut bag);
        assert_eq!(bag.total_amount(3001), 3);
        assert_eq!(board.current_stage(), 1);
    }

    #[test]
    fn test_auto_stage_ignores_clicks_but_advances_on_proximity() {
        let mut board = board_at(AUTO_ADVANCE_STAGE);
        let mut bag = Inventory::default();
        let mut rules = WorldRules::default();
        assert_eq!(board.interact(&mut bag, &mut rules), TreeInteraction::WaitingForPlayer);

        let done = board.auto_advance(&mut bag, &mut rules).unwrap();
        assert_eq!(done.new_stage, 4);
        assert_eq!(bag.total_amount(4001), 1);
        assert!(board.auto_advance(&mut bag, &mut rules).is_none());
    }

    #[test]
    fn test_final_stage_accepts_nothing() {
        let mut board = board_at(5);
        let mut bag = Inventory::default();
        let mut rules = WorldRules::default();
        assert_eq!(board.interact(&mut bag, &mut rules), TreeInteraction::FinalStage);
        assert!(!board.is_open());
        assert_eq!(board.current_stage(), 5);
    }

    #[test]
    fn test_stage_without_ui_advances_on_click() {
        let mut tasks = default_tasks();
        tasks[0].has_ui = false;
        let mut board = TaskBoard::new(tasks, 5);
        let mut bag = Inventory::default();
        let mut rules = WorldRules::default();
        match board.interact(&mut bag, &mut rules) {
            TreeInteraction::Completed(done) => assert_eq!(done.new_stage, 2),
            other => panic!("unexpected {:?}", other),
        }
    }
}
