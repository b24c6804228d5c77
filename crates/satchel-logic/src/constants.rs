//! Grid dimensions and zoning defaults.
//!
//! Plain constants with no dependencies. Both the logic crate's defaults and
//! the simtest harness read these.

pub mod player {
    /// Backpack width in cells.
    pub const WIDTH: usize = 6;
    /// Backpack height in cells, equipment band included.
    pub const HEIGHT: usize = 8;
    /// Rows 0..3 form the equipment band; items there grant passive bonuses.
    pub const EQUIPMENT_ROWS: usize = 3;
}

pub mod loot_crate {
    pub const WIDTH: usize = 6;
    pub const HEIGHT: usize = 4;
}

pub mod warehouse {
    pub const WIDTH: usize = 8;
    pub const HEIGHT: usize = 10;
}

/// Upper bound on either grid dimension accepted by config validation.
pub const MAX_GRID_SIDE: usize = 64;
