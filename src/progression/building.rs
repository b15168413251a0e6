use bevy::prelude::*;

use super::deposit::{ItemRequirement, RequirementDeposit};
use crate::inventory::Inventory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildState {
    #[default]
    Ruins,
    Completed,
}

/// A ruin the player restores by handing over materials.
#[derive(Debug, Clone)]
pub struct BuildProject {
    pub name: String,
    pub requirements: Vec<ItemRequirement>,
    pub state: BuildState,
    open: Option<RequirementDeposit>,
}

impl BuildProject {
    pub fn new(name: impl Into<String>, requirements: Vec<ItemRequirement>) -> Self {
        Self {
            name: name.into(),
            requirements,
            state: BuildState::Ruins,
            open: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn open(&mut self) -> bool {
        if self.state == BuildState::Completed {
            return false;
        }
        if self.open.is_none() {
            self.open = Some(RequirementDeposit::new(&self.requirements));
        }
        true
    }

    pub fn deposit(&mut self, bag: &mut Inventory, item_id: i32, amount: u32) -> u32 {
        match self.open.as_mut() {
            Some(deposit) => deposit.deposit(bag, item_id, amount),
            None => 0,
        }
    }

    pub fn submit(&mut self) -> bool {
        let complete = self.open.as_ref().is_some_and(RequirementDeposit::is_complete);
        if !complete {
            return false;
        }
        self.open = None;
        self.state = BuildState::Completed;
        info!("[Progression] {} rebuilt", self.name);
        true
    }

    pub fn cancel(&mut self, bag: &mut Inventory) {
        if let Some(mut deposit) = self.open.take() {
            deposit.refund(bag);
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct BuildProjects(pub Vec<BuildProject>);

impl Default for BuildProjects {
    fn default() -> Self {
        Self(vec![BuildProject::new(
            "Workshop",
            vec![ItemRequirement::new(3001, 10), ItemRequirement::new(3002, 10)],
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_completes_once_materials_are_in() {
        let mut project = BuildProject::new("Barn", vec![ItemRequirement::new(3001, 2)]);
        let mut bag = Inventory::default();
        bag.add_by_id(3001, 2);

        assert!(!project.submit());
        assert!(project.open());
        project.deposit(&mut bag, 3001, 2);
        assert!(project.submit());
        assert_eq!(project.state, BuildState::Completed);
        assert!(!project.open());
    }

    #[test]
    fn test_cancel_returns_materials() {
        let mut project = BuildProject::new("Barn", vec![ItemRequirement::new(3001, 5)]);
        let mut bag = Inventory::default();
        bag.add_by_id(3001, 3);
        project.open();
        project.deposit(&mut bag, 3001, 3);
        assert!(!project.submit());
        project.cancel(&mut bag);
        assert_eq!(bag.total_amount(3001), 3);
        assert_eq!(project.state, BuildState::Ruins);
    }
}
