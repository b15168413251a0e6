//! Game configuration: tunables read from `assets/config/game.ron`.
//!
//! Every field has a default, so a partial file (or no file at all) still
//! produces a playable configuration.

use std::path::Path;

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::shared::*;

pub const DEFAULT_CONFIG_PATH: &str = "assets/config/game.ron";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub origin_x: i32,
    pub origin_y: i32,
    pub width: i32,
    pub height: i32,
    pub bag_capacity: usize,
    pub starting_money: u32,
    /// Real seconds for the 06:00 → 18:00 half of the day.
    pub day_duration_secs: f32,
    /// Real seconds for the 18:00 → 06:00 half of the day.
    pub night_duration_secs: f32,
    pub hoe_item_id: ItemId,
    pub watering_can_item_id: ItemId,
    /// World units around the player within which items are collected.
    pub pickup_radius: f32,
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let bounds = GridBounds::default();
        Self {
            origin_x: bounds.origin_x,
            origin_y: bounds.origin_y,
            width: bounds.width,
            height: bounds.height,
            bag_capacity: DEFAULT_BAG_CAPACITY,
            starting_money: 100,
            day_duration_secs: 600.0,
            night_duration_secs: 600.0,
            hoe_item_id: 6001,
            watering_can_item_id: 5008,
            pickup_radius: 12.0,
            rng_seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    /// Load from disk, falling back to defaults on any failure.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                info!("[Config] Loaded {}", path.display());
                config
            }
            Err(err) => {
                warn!("[Config] Using defaults, could not load {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    pub fn grid_bounds(&self) -> GridBounds {
        GridBounds {
            origin_x: self.origin_x,
            origin_y: self.origin_y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Source of randomness for harvest yields and item scatter.
#[derive(Resource)]
pub struct FarmRng(pub StdRng);

impl FarmRng {
    pub fn from_config(config: &GameConfig) -> Self {
        match config.rng_seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

impl Default for FarmRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_farm_layout() {
        let config = GameConfig::default();
        assert_eq!(config.grid_bounds(), GridBounds::default());
        assert_eq!(config.bag_capacity, 20);
        assert_eq!(config.hoe_item_id, 6001);
        assert_eq!(config.watering_can_item_id, 5008);
    }

    #[test]
    fn test_partial_ron_keeps_other_defaults() {
        let config = GameConfig::from_ron_str("(bag_capacity: 8, rng_seed: Some(42))").unwrap();
        assert_eq!(config.bag_capacity, 8);
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.width, 40);
        assert_eq!(config.starting_money, 100);
    }

    #[test]
    fn test_malformed_ron_is_parse_error() {
        let err = GameConfig::from_ron_str("(bag_capacity: \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = GameConfig::load_or_default("does/not/exist.ron");
        assert_eq!(config.bag_capacity, DEFAULT_BAG_CAPACITY);
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        use rand::Rng;
        let config = GameConfig {
            rng_seed: Some(7),
            ..Default::default()
        };
        let mut a = FarmRng::from_config(&config);
        let mut b = FarmRng::from_config(&config);
        assert_eq!(a.0.gen::<u32>(), b.0.gen::<u32>());
    }
}
