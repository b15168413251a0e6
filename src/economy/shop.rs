use bevy::prelude::*;

use super::gold::Wallet;
use crate::inventory::Inventory;
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Events (drive transactions from UI input)
// ─────────────────────────────────────────────────────────────────────────────

/// Fired by the UI when the player confirms a purchase of one unit.
#[derive(Event, Debug, Clone)]
pub struct BuyRequestEvent {
    pub item_id: ItemId,
}

/// Fired by the UI when the player confirms selling from the bag.
#[derive(Event, Debug, Clone)]
pub struct SellRequestEvent {
    pub item_id: ItemId,
    pub amount: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeRejection {
    NotForSale,
    UnknownItem,
    InsufficientFunds,
    BagFull,
    NotEnoughItems,
}

// ─────────────────────────────────────────────────────────────────────────────
// Transactions
// ─────────────────────────────────────────────────────────────────────────────

/// Buy one unit. Money is only taken when the item fits in the bag.
pub fn buy_item(
    item_id: ItemId,
    items: &ItemCatalog,
    shop: &ShopCatalog,
    wallet: &mut Wallet,
    bag: &mut Inventory,
) -> Result<ShopTransactionEvent, TradeRejection> {
    if !shop.sells(item_id) {
        return Err(TradeRejection::NotForSale);
    }
    let details = items.get(item_id).ok_or(TradeRejection::UnknownItem)?;
    if !bag.can_accept(item_id) {
        return Err(TradeRejection::BagFull);
    }
    if !wallet.spend(details.price) {
        return Err(TradeRejection::InsufficientFunds);
    }
    bag.add_by_id(item_id, 1);

    Ok(ShopTransactionEvent {
        item_id,
        quantity: 1,
        total: details.price,
        is_purchase: true,
    })
}

/// Sell `amount` units from the bag at the item's full price.
pub fn sell_item(
    item_id: ItemId,
    amount: u32,
    items: &ItemCatalog,
    wallet: &mut Wallet,
    bag: &mut Inventory,
) -> Result<ShopTransactionEvent, TradeRejection> {
    let details = items.get(item_id).ok_or(TradeRejection::UnknownItem)?;
    if amount == 0 || !bag.remove_by_id(item_id, amount) {
        return Err(TradeRejection::NotEnoughItems);
    }
    let total = details.price.saturating_mul(amount);
    wallet.add(total);

    Ok(ShopTransactionEvent {
        item_id,
        quantity: amount,
        total,
        is_purchase: false,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Systems
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_buy(
    mut requests: EventReader<BuyRequestEvent>,
    items: Res<ItemCatalog>,
    shop: Res<ShopCatalog>,
    mut wallet: ResMut<Wallet>,
    mut bag: ResMut<Inventory>,
    mut transactions: EventWriter<ShopTransactionEvent>,
) {
    for req in requests.read() {
        match buy_item(req.item_id, &items, &shop, &mut wallet, &mut bag) {
            Ok(tx) => {
                info!(
                    "[Economy] Bought {} for {}g. Balance: {}g",
                    req.item_id,
                    tx.total,
                    wallet.balance()
                );
                transactions.send(tx);
            }
            Err(reason) => warn!("[Economy] Purchase of {} rejected: {:?}", req.item_id, reason),
        }
    }
}

pub fn handle_sell(
    mut requests: EventReader<SellRequestEvent>,
    items: Res<ItemCatalog>,
    mut wallet: ResMut<Wallet>,
    mut bag: ResMut<Inventory>,
    mut transactions: EventWriter<ShopTransactionEvent>,
) {
    for req in requests.read() {
        match sell_item(req.item_id, req.amount, &items, &mut wallet, &mut bag) {
            Ok(tx) => {
                info!(
                    "[Economy] Sold {} × {} for {}g. Balance: {}g",
                    tx.quantity,
                    req.item_id,
                    tx.total,
                    wallet.balance()
                );
                transactions.send(tx);
            }
            Err(reason) => warn!("[Economy] Sale of {} rejected: {:?}", req.item_id, reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{populate_items, populate_shop};

    fn setup() -> (ItemCatalog, ShopCatalog) {
        let mut items = ItemCatalog::default();
        let mut shop = ShopCatalog::default();
        populate_items(&mut items);
        populate_shop(&mut shop);
        (items, shop)
    }

    #[test]
    fn test_buy_charges_price_and_adds_item() {
        let (items, shop) = setup();
        let mut wallet = Wallet::new(100);
        let mut bag = Inventory::default();
        let tx = buy_item(1001, &items, &shop, &mut wallet, &mut bag).unwrap();
        assert_eq!(tx.total, 20);
        assert_eq!(wallet.balance(), 80);
        assert_eq!(bag.total_amount(1001), 1);
    }

    #[test]
    fn test_buy_without_money_changes_nothing() {
        let (items, shop) = setup();
        let mut wallet = Wallet::new(10);
        let mut bag = Inventory::default();
        assert_eq!(
            buy_item(1002, &items, &shop, &mut wallet, &mut bag),
            Err(TradeRejection::InsufficientFunds)
        );
        assert_eq!(wallet.balance(), 10);
        assert_eq!(bag.total_amount(1002), 0);
    }

    #[test]
    fn test_buy_into_full_bag_keeps_money() {
        let (items, shop) = setup();
        let mut wallet = Wallet::new(100);
        let mut bag = Inventory::new(InventoryLocation::Player, 1);
        bag.add_by_id(3001, 1);
        assert_eq!(
            buy_item(1001, &items, &shop, &mut wallet, &mut bag),
            Err(TradeRejection::BagFull)
        );
        assert_eq!(wallet.balance(), 100);
    }

    #[test]
    fn test_tools_are_not_for_sale() {
        let (items, shop) = setup();
        let mut wallet = Wallet::new(1000);
        let mut bag = Inventory::default();
        assert_eq!(
            buy_item(6001, &items, &shop, &mut wallet, &mut bag),
            Err(TradeRejection::NotForSale)
        );
    }

    #[test]
    fn test_sell_pays_full_price_per_unit() {
        let (items, _) = setup();
        let mut wallet = Wallet::new(0);
        let mut bag = Inventory::default();
        bag.add_by_id(2001, 3);
        let tx = sell_item(2001, 2, &items, &mut wallet, &mut bag).unwrap();
        assert_eq!(tx.total, 120);
        assert_eq!(wallet.balance(), 120);
        assert_eq!(bag.total_amount(2001), 1);
    }

    #[test]
    fn test_sell_more_than_held_is_rejected() {
        let (items, _) = setup();
        let mut wallet = Wallet::new(0);
        let mut bag = Inventory::default();
        bag.add_by_id(2001, 1);
        assert_eq!(
            sell_item(2001, 2, &items, &mut wallet, &mut bag),
            Err(TradeRejection::NotEnoughItems)
        );
        assert_eq!(wallet.balance(), 0);
        assert_eq!(bag.total_amount(2001), 1);
    }
}
