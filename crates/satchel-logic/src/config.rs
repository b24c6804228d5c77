//! Grid layouts for every kind of inventory in a run.
//!
//! ```
//! use satchel_logic::config::{validate_config, InventoryConfig};
//!
//! let config = InventoryConfig::default();
//! assert!(validate_config(&config).is_empty());
//! assert!(config.player.zoning.is_zoned());
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{loot_crate, player, warehouse, MAX_GRID_SIDE};
use crate::grid::{GridLayout, Zoning};

/// Layouts for the player's backpack, loot containers, and the warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Zoned: equipment band on top, backpack below.
    pub player: GridLayout,
    /// Unzoned.
    pub loot_crate: GridLayout,
    pub warehouse: GridLayout,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            player: GridLayout::zoned(player::WIDTH, player::HEIGHT, player::EQUIPMENT_ROWS),
            loot_crate: GridLayout::unzoned(loot_crate::WIDTH, loot_crate::HEIGHT),
            warehouse: GridLayout::unzoned(warehouse::WIDTH, warehouse::HEIGHT),
        }
    }
}

impl InventoryConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A grid has zero width or height.
    EmptyGrid(&'static str),
    /// A grid side exceeds [`MAX_GRID_SIDE`].
    GridTooLarge(&'static str, usize),
    /// Equipment band is empty or swallows the whole grid.
    InvalidEquipmentRows(&'static str, usize),
    /// The player grid must be zoned.
    PlayerGridUnzoned,
}

/// Validate a configuration, returning all errors found.
pub fn validate_config(config: &InventoryConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    for (name, layout) in [
        ("player", &config.player),
        ("loot_crate", &config.loot_crate),
        ("warehouse", &config.warehouse),
    ] {
        if layout.width == 0 || layout.height == 0 {
            errors.push(ConfigError::EmptyGrid(name));
        }
        let longest = layout.width.max(layout.height);
        if longest > MAX_GRID_SIDE {
            errors.push(ConfigError::GridTooLarge(name, longest));
        }
        if let Zoning::Zoned { equipment_rows } = layout.zoning {
            if equipment_rows == 0 || equipment_rows >= layout.height {
                errors.push(ConfigError::InvalidEquipmentRows(name, equipment_rows));
            }
        }
    }

    if !config.player.zoning.is_zoned() {
        errors.push(ConfigError::PlayerGridUnzoned);
    }

    errors
}
