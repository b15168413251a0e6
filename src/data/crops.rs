use crate::shared::*;

/// Populate the CropCatalog with all crop definitions.
///
/// `growth_days` holds cumulative thresholds: a crop enters stage `i` once it
/// has grown for `growth_days[i]` days. The last threshold is maturity.
///
///   Turnip         : 4 stages, mature on day 5, 1–2 turnips
///   Strawberry     : 3 stages, mature on day 6, 2–3 berries, becomes a bush
///   Strawberry Bush: 2 stages, mature on day 3, 1–2 berries, stays a bush
pub fn populate_crops(catalog: &mut CropCatalog) {
    let crops = vec![
        CropDetails {
            seed_item_id: 1001,
            growth_days: vec![0, 2, 4, 5],
            harvest_tool_ids: vec![],
            produced_item_ids: vec![2001],
            produced_min_quantity: vec![1],
            produced_max_quantity: vec![2],
            harvested_transform_item_id: None,
            is_harvested_animation: false,
            hide_crop_before_harvested_animation: false,
            disable_crop_colliders_before_harvested_animation: false,
        },
        CropDetails {
            seed_item_id: 1002,
            growth_days: vec![0, 3, 6],
            harvest_tool_ids: vec![],
            produced_item_ids: vec![2002],
            produced_min_quantity: vec![2],
            produced_max_quantity: vec![3],
            harvested_transform_item_id: Some(1003),
            // Berries fall off with a shake before the bush reappears.
            is_harvested_animation: true,
            hide_crop_before_harvested_animation: false,
            disable_crop_colliders_before_harvested_animation: true,
        },
        CropDetails {
            seed_item_id: 1003,
            growth_days: vec![0, 3],
            harvest_tool_ids: vec![],
            produced_item_ids: vec![2002],
            produced_min_quantity: vec![1],
            produced_max_quantity: vec![2],
            harvested_transform_item_id: Some(1003),
            is_harvested_animation: true,
            hide_crop_before_harvested_animation: false,
            disable_crop_colliders_before_harvested_animation: true,
        },
    ];

    for crop in crops {
        catalog.insert(crop);
    }
}
