//! Pure inventory logic for Satchel.
//!
//! This crate contains the spatial inventory engine: items with polyomino
//! footprints on a cell grid, quarter-turn rotation, equipment/backpack
//! zoning, and the smart rearrangement that clears space when a drop lands
//! on other items. Functions take plain data and return results. Nothing in
//! here touches a UI, a save file, or a random number generator.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`arrange`] | Auto-arrangement search for colliding drops |
//! | [`catalog`] | Item definitions from JSON, shape validation |
//! | [`config`] | Grid layouts per inventory kind, validation |
//! | [`constants`] | Default grid dimensions and equipment band height |
//! | [`grid`] | Occupancy grid, zoning, layouts |
//! | [`inventory`] | Drag-and-drop session: drop, rotate, stow, transfer |
//! | [`item`] | Item identity, category, placement, displayed shape |
//! | [`placement`] | Bounds / zone / collision validation |
//! | [`shape`] | Binary shapes and 90° rotation |

pub mod arrange;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod grid;
pub mod inventory;
pub mod item;
pub mod placement;
pub mod shape;

pub use arrange::{find_arrangement, Arrangement};
pub use grid::{GridLayout, OccupancyGrid, Zone, Zoning};
pub use inventory::{DropOutcome, Inventory, InventoryError};
pub use item::{Item, ItemCategory, ItemId};
pub use placement::{can_place, classify_placement, PlacementCheck};
pub use shape::{Rotation, Shape, ShapeError};
