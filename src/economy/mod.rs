//! Economy domain: the player's wallet and the general store.

use bevy::prelude::*;

use crate::config::GameConfig;
use crate::shared::*;

pub mod gold;
pub mod shop;

pub use gold::{format_gold, Wallet};
pub use shop::{buy_item, sell_item, BuyRequestEvent, SellRequestEvent, TradeRejection};

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Wallet>()
            .add_event::<BuyRequestEvent>()
            .add_event::<SellRequestEvent>()
            .add_systems(OnEnter(GameState::Loading), fund_wallet)
            .add_systems(
                Update,
                (shop::handle_buy, shop::handle_sell)
                    .before(crate::inventory::flush_inventory_updates)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// Start the game with the configured amount of money.
fn fund_wallet(config: Res<GameConfig>, mut wallet: ResMut<Wallet>) {
    *wallet = Wallet::new(config.starting_money);
    info!("[Economy] Starting balance: {}", format_gold(wallet.balance()));
}
