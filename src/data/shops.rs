use crate::shared::*;

/// Populate the ShopCatalog with the general store's stock.
///
/// Seeds first, then building materials and food. Tools are never sold.
pub fn populate_shop(shop: &mut ShopCatalog) {
    shop.item_ids = vec![
        1001, // Turnip Seeds
        1002, // Strawberry Seeds
        3001, // Wood
        3002, // Stone
        4001, // Bread
        4501, // Wooden Chest
    ];
}
