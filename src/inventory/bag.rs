//! Fixed-capacity slot store.
//!
//! Slots never move on their own: empty slots stay in place and items are
//! only relocated by `swap_slots`. Every successful mutation queues a
//! snapshot that `flush_inventory_updates` turns into an event.

use bevy::prelude::*;

use crate::shared::*;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryError {
    #[error("slot {index} is out of range for an inventory of {capacity} slots")]
    SlotOutOfRange { index: usize, capacity: usize },
}

#[derive(Resource, Debug, Clone)]
pub struct Inventory {
    location: InventoryLocation,
    slots: Vec<InventorySlot>,
    pending: Vec<Vec<InventorySlot>>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(InventoryLocation::Player, DEFAULT_BAG_CAPACITY)
    }
}

impl Inventory {
    pub fn new(location: InventoryLocation, capacity: usize) -> Self {
        Self {
            location,
            slots: vec![InventorySlot::EMPTY; capacity],
            pending: Vec::new(),
        }
    }

    /// Build a bag with some slots pre-filled, for starting kits.
    pub fn with_slots(location: InventoryLocation, capacity: usize, filled: &[InventorySlot]) -> Self {
        let mut inv = Self::new(location, capacity);
        for (slot, item) in inv.slots.iter_mut().zip(filled) {
            *slot = InventorySlot::new(item.item_id, item.quantity);
        }
        inv
    }

    pub fn location(&self) -> InventoryLocation {
        self.location
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[InventorySlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&InventorySlot> {
        self.slots.get(index)
    }

    pub fn total_amount(&self, id: ItemId) -> u32 {
        if id == EMPTY_ITEM {
            return 0;
        }
        self.slots
            .iter()
            .filter(|s| s.item_id == id)
            .fold(0u32, |acc, s| acc.saturating_add(s.quantity))
    }

    /// First slot holding `id`.
    pub fn slot_index(&self, id: ItemId) -> Option<usize> {
        if id == EMPTY_ITEM {
            return None;
        }
        self.slots.iter().position(|s| s.item_id == id)
    }

    pub fn has_space(&self) -> bool {
        self.slots.iter().any(InventorySlot::is_empty)
    }

    /// Whether at least one unit of `id` would fit right now.
    pub fn can_accept(&self, id: ItemId) -> bool {
        if id == EMPTY_ITEM {
            return false;
        }
        match self.slot_index(id) {
            Some(i) => self.slots[i].quantity < u32::MAX,
            None => self.has_space(),
        }
    }

    /// Remove `amount` units of `id`, draining slots in order.
    ///
    /// All or nothing: when the bag holds fewer than `amount` units nothing is
    /// touched and `false` is returned.
    pub fn remove_by_id(&mut self, id: ItemId, amount: u32) -> bool {
        if amount == 0 {
            return true;
        }
        if self.total_amount(id) < amount {
            debug!(
                "[Inventory] Cannot remove {} × {}: only {} held",
                amount,
                id,
                self.total_amount(id)
            );
            return false;
        }

        let mut remaining = amount;
        for slot in self.slots.iter_mut().filter(|s| s.item_id == id) {
            if slot.quantity > remaining {
                slot.quantity -= remaining;
                remaining = 0;
            } else {
                remaining -= slot.quantity;
                *slot = InventorySlot::EMPTY;
            }
            if remaining == 0 {
                break;
            }
        }

        self.queue_snapshot();
        true
    }

    /// Stack `amount` units into the first slot holding `id`, else the first
    /// empty slot. Returns false (and drops the items) when neither exists or
    /// the stack would overflow.
    pub fn add_by_id(&mut self, id: ItemId, amount: u32) -> bool {
        if id == EMPTY_ITEM || amount == 0 {
            return false;
        }

        let index = self
            .slot_index(id)
            .or_else(|| self.slots.iter().position(InventorySlot::is_empty));

        match index {
            Some(i) => {
                let slot = &mut self.slots[i];
                let Some(quantity) = slot.quantity.checked_add(amount) else {
                    warn!("[Inventory] Stack of {} is full, dropped {}", id, amount);
                    return false;
                };
                *slot = InventorySlot::new(id, quantity);
                self.queue_snapshot();
                true
            }
            None => {
                warn!("[Inventory] Bag is full, dropped {} × {}", amount, id);
                false
            }
        }
    }

    /// Add units one at a time, re-resolving the target slot for each.
    /// Stops at the first unit that does not fit. Returns how many were added.
    pub fn add_one_unit_repeated(&mut self, id: ItemId, amount: u32) -> u32 {
        if id == EMPTY_ITEM {
            return 0;
        }

        let mut added = 0;
        while added < amount {
            let index = self
                .slot_index(id)
                .or_else(|| self.slots.iter().position(InventorySlot::is_empty));
            let Some(i) = index else {
                warn!(
                    "[Inventory] Bag is full, {} of {} × {} did not fit",
                    amount - added,
                    amount,
                    id
                );
                break;
            };
            let slot = &mut self.slots[i];
            let Some(quantity) = slot.quantity.checked_add(1) else {
                warn!("[Inventory] Stack of {} is full, {} did not fit", id, amount - added);
                break;
            };
            *slot = InventorySlot::new(id, quantity);
            added += 1;
        }

        if added > 0 {
            self.queue_snapshot();
        }
        added
    }

    /// Exchange two slots; moving onto an empty slot clears the source.
    pub fn swap_slots(&mut self, from: usize, to: usize) -> Result<(), InventoryError> {
        let capacity = self.slots.len();
        for index in [from, to] {
            if index >= capacity {
                return Err(InventoryError::SlotOutOfRange { index, capacity });
            }
        }

        if self.slots[to].is_empty() {
            self.slots[to] = self.slots[from];
            self.slots[from] = InventorySlot::EMPTY;
        } else {
            self.slots.swap(from, to);
        }

        self.queue_snapshot();
        Ok(())
    }

    /// Snapshots queued since the last drain, oldest first.
    pub fn drain_snapshots(&mut self) -> Vec<Vec<InventorySlot>> {
        std::mem::take(&mut self.pending)
    }

    /// Queue the current contents, e.g. for the initial UI refresh.
    pub fn queue_snapshot(&mut self) {
        self.pending.push(self.slots.clone());
    }
}
