use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::inventory::Inventory;
use crate::shared::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRequirement {
    pub item_id: ItemId,
    pub amount: u32,
}

impl ItemRequirement {
    pub const fn new(item_id: ItemId, amount: u32) -> Self {
        Self { item_id, amount }
    }
}

/// Items handed over towards a list of requirements.
///
/// Items leave the bag as soon as they are deposited and only come back
/// through `refund`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementDeposit {
    requirements: Vec<ItemRequirement>,
    deposited: Vec<u32>,
}

impl RequirementDeposit {
    pub fn new(requirements: &[ItemRequirement]) -> Self {
        Self {
            requirements: requirements.to_vec(),
            deposited: vec![0; requirements.len()],
        }
    }

    pub fn requirements(&self) -> &[ItemRequirement] {
        &self.requirements
    }

    pub fn deposited(&self, item_id: ItemId) -> u32 {
        self.requirements
            .iter()
            .zip(&self.deposited)
            .filter(|(req, _)| req.item_id == item_id)
            .map(|(_, &n)| n)
            .sum()
    }

    /// Move up to `amount` of `item_id` out of the bag, capped at what is
    /// still needed and what the bag holds. Returns how many moved.
    pub fn deposit(&mut self, bag: &mut Inventory, item_id: ItemId, amount: u32) -> u32 {
        let mut moved = 0;
        for (req, done) in self.requirements.iter().zip(self.deposited.iter_mut()) {
            if req.item_id != item_id {
                continue;
            }
            let needed = req.amount.saturating_sub(*done);
            let held = bag.total_amount(item_id);
            let take = needed.min(amount - moved).min(held);
            if take > 0 && bag.remove_by_id(item_id, take) {
                *done += take;
                moved += take;
            }
            if moved == amount {
                break;
            }
        }
        if moved > 0 {
            debug!("[Progression] Deposited {} × {}", moved, item_id);
        }
        moved
    }

    pub fn is_complete(&self) -> bool {
        self.requirements
            .iter()
            .zip(&self.deposited)
            .all(|(req, &done)| done >= req.amount)
    }

    /// Give every deposited item back to the bag.
    pub fn refund(&mut self, bag: &mut Inventory) {
        for (req, done) in self.requirements.iter().zip(self.deposited.iter_mut()) {
            if *done > 0 {
                bag.add_by_id(req.item_id, *done);
                *done = 0;
            }
        }
    }
}
