use bevy::prelude::*;

use crate::shared::*;

/// Whether the cell under the cursor accepts the selected item.
///
/// `cursor` and `player` are grid coordinates. The item's `use_radius` is a
/// Chebyshev distance, so diagonal neighbours count as one cell away.
pub fn cursor_is_valid(
    cell: &GridCell,
    item: Option<&ItemDetails>,
    cursor: IVec2,
    player: IVec2,
) -> bool {
    let Some(item) = item else {
        return false;
    };

    let distance = (cursor - player).abs().max_element();
    if distance > item.use_radius {
        return false;
    }

    match item.item_type {
        ItemType::Seed => cell.is_diggable && cell.is_dug() && !cell.has_crop(),
        ItemType::Tool => {
            let can_dig = cell.is_diggable && !cell.is_dug() && !cell.has_crop();
            let can_water = cell.is_dug() && !cell.is_watered();
            can_dig || can_water || cell.has_crop()
        }
        ItemType::Placeable => cell.can_place_furniture,
        _ => true,
    }
}
