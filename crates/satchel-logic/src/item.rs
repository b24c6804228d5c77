//! Placeable inventory items.
//!
//! An item's base shape is authoritative for all placement math. Whether the
//! player can see that shape is a separate `revealed` flag; the displayed
//! silhouette is derived from the two, never stored.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shape::{Rotation, Shape};

/// Identifier unique across an inventory's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Category tag. Only external stat logic cares; placement ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemCategory {
    /// Grants passive bonuses while sitting in the equipment band.
    Artifact,
    /// Used up on activation.
    Consumable,
    /// Sold or extracted; no effect while carried.
    Loot,
}

fn revealed_by_default() -> bool {
    true
}

/// An item with its current placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: ItemCategory,
    /// Base shape at 0°.
    pub shape: Shape,
    #[serde(default = "revealed_by_default")]
    pub revealed: bool,
    #[serde(default)]
    pub rotation: Rotation,
    /// Anchor column: grid cell of local (0, 0) of the rotated shape.
    #[serde(default)]
    pub x: i32,
    /// Anchor row.
    #[serde(default)]
    pub y: i32,
}

impl Item {
    /// A revealed item at the origin, unrotated.
    pub fn new(id: ItemId, name: impl Into<String>, category: ItemCategory, shape: Shape) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            shape,
            revealed: true,
            rotation: Rotation::Deg0,
            x: 0,
            y: 0,
        }
    }

    /// Builder: hide the true silhouette.
    pub fn unidentified(mut self) -> Self {
        self.revealed = false;
        self
    }

    /// Builder: set anchor.
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Builder: set rotation.
    pub fn turned(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Copy of this item moved to a new anchor and rotation.
    pub fn placed(&self, x: i32, y: i32, rotation: Rotation) -> Item {
        Item {
            x,
            y,
            rotation,
            ..self.clone()
        }
    }

    /// Base shape at the current rotation.
    pub fn current_shape(&self) -> Shape {
        self.shape.rotated(self.rotation)
    }

    /// What the player sees: the true shape once revealed, otherwise the
    /// bounding rectangle of the rotated shape.
    pub fn display_shape(&self) -> Shape {
        let current = self.current_shape();
        if self.revealed {
            current
        } else {
            current.bounding_box()
        }
    }

    pub fn cell_count(&self) -> usize {
        self.shape.cell_count()
    }

    /// Absolute cells covered at anchor (`x`, `y`) and `rotation`.
    ///
    /// Coordinates saturate at `i32::MAX`, which is never inside a grid, so
    /// extreme anchors read as out of bounds instead of overflowing.
    pub fn footprint_at(&self, x: i32, y: i32, rotation: Rotation) -> Vec<(i32, i32)> {
        self.shape
            .rotated(rotation)
            .occupied_cells()
            .map(|(dx, dy)| (offset(x, dx), offset(y, dy)))
            .collect()
    }

    /// Absolute cells covered at the current placement.
    pub fn footprint(&self) -> Vec<(i32, i32)> {
        self.footprint_at(self.x, self.y, self.rotation)
    }
}

fn offset(base: i32, delta: usize) -> i32 {
    base.saturating_add(i32::try_from(delta).unwrap_or(i32::MAX))
}
