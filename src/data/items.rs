use crate::shared::*;

fn item(
    item_id: ItemId,
    name: &str,
    item_type: ItemType,
    description: &str,
    use_radius: i32,
    price: u32,
    sell_percentage: f32,
) -> ItemDetails {
    ItemDetails {
        item_id,
        name: name.into(),
        item_type,
        description: description.into(),
        use_radius,
        can_pick_up: true,
        can_drop: true,
        can_carry: false,
        price,
        sell_percentage,
    }
}

/// Populate the ItemCatalog with every built-in item.
///
/// Id ranges: 1xxx seeds, 2xxx produce, 3xxx materials, 4xxx food,
/// 5xxx / 6xxx tools.
pub fn populate_items(catalog: &mut ItemCatalog) {
    let items = vec![
        // ── Seeds ───────────────────────────────────────────────────────────
        item(1001, "Turnip Seeds", ItemType::Seed, "Ready in five days.", 1, 20, 0.5),
        item(1002, "Strawberry Seeds", ItemType::Seed, "Grows into a berry bush.", 1, 100, 0.5),
        item(1003, "Strawberry Bush", ItemType::Seed, "Fruits again after picking.", 1, 0, 0.0),

        // ── Produce ─────────────────────────────────────────────────────────
        item(2001, "Turnip", ItemType::Crop, "A crunchy root.", 0, 60, 0.5),
        item(2002, "Strawberry", ItemType::Crop, "Sweet and red.", 0, 120, 0.5),

        // ── Materials ───────────────────────────────────────────────────────
        item(3001, "Wood", ItemType::Material, "", 0, 10, 0.5),
        item(3002, "Stone", ItemType::Material, "", 0, 10, 0.5),

        // ── Food ────────────────────────────────────────────────────────────
        item(4001, "Bread", ItemType::Consumable, "Restores a little energy.", 0, 40, 0.25),

        // ── Placeables ──────────────────────────────────────────────────────
        item(4501, "Wooden Chest", ItemType::Placeable, "Stores items.", 1, 150, 0.5),

        // ── Tools ───────────────────────────────────────────────────────────
        item(5008, "Watering Can", ItemType::Tool, "Waters dug soil.", 1, 0, 0.0),
        item(6001, "Hoe", ItemType::Tool, "Tills diggable ground.", 1, 0, 0.0),
    ];

    for mut details in items {
        if details.item_type == ItemType::Tool {
            details.can_drop = false;
            details.can_carry = true;
        }
        catalog.insert(details);
    }
}
