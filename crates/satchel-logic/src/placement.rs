//! Placement validation: bounds, zone consistency, collision.

use crate::grid::OccupancyGrid;
use crate::item::{Item, ItemId};
use crate::shape::Rotation;

/// Detailed verdict for a candidate placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementCheck {
    Legal,
    /// At least one occupied cell falls outside the grid.
    OutOfBounds,
    /// The footprint straddles the equipment/backpack boundary.
    CrossesZone,
    /// In bounds and zone-consistent, but overlaps these items
    /// (first-hit order, no duplicates).
    Collides(Vec<ItemId>),
}

impl PlacementCheck {
    pub fn is_legal(&self) -> bool {
        matches!(self, PlacementCheck::Legal)
    }
}

/// Whether `item` may sit at anchor (`x`, `y`) with `rotation`.
///
/// Checks each occupied cell in row-major order and stops at the first
/// failure. Cells already owned by `item` itself do not count as collisions,
/// so an item can be validated against a grid that still contains it.
pub fn can_place(grid: &OccupancyGrid, item: &Item, x: i32, y: i32, rotation: Rotation) -> bool {
    let anchor_zone = grid.zone_of_row(y);
    item.footprint_at(x, y, rotation).into_iter().all(|(cx, cy)| {
        grid.in_bounds(cx, cy)
            && grid.zone_of_row(cy) == anchor_zone
            && grid.owner_at(cx, cy).map_or(true, |owner| owner == item.id)
    })
}

/// Like [`can_place`], but explains a rejection.
///
/// Bounds and zone problems outrank collisions: `Collides` is only reported
/// when moving other items out of the way would make the placement legal.
pub fn classify_placement(
    grid: &OccupancyGrid,
    item: &Item,
    x: i32,
    y: i32,
    rotation: Rotation,
) -> PlacementCheck {
    let footprint = item.footprint_at(x, y, rotation);

    if footprint.iter().any(|&(cx, cy)| !grid.in_bounds(cx, cy)) {
        return PlacementCheck::OutOfBounds;
    }

    let anchor_zone = grid.zone_of_row(y);
    if footprint
        .iter()
        .any(|&(_, cy)| grid.zone_of_row(cy) != anchor_zone)
    {
        return PlacementCheck::CrossesZone;
    }

    let mut hits: Vec<ItemId> = Vec::new();
    for (cx, cy) in footprint {
        if let Some(owner) = grid.owner_at(cx, cy) {
            if owner != item.id && !hits.contains(&owner) {
                hits.push(owner);
            }
        }
    }

    if hits.is_empty() {
        PlacementCheck::Legal
    } else {
        PlacementCheck::Collides(hits)
    }
}
