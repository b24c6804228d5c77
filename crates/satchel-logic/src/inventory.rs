//! Inventory session: the drag-and-drop controller over the placement core.
//!
//! An [`Inventory`] owns an item list (the source of truth) and a layout. The
//! occupancy grid is rebuilt from the list on demand. Every mutating method
//! computes its full result first and only then swaps it in, so a rejected
//! operation leaves the inventory exactly as it was.
//!
//! # Drop flow
//!
//! 1. Legal placement → commit directly.
//! 2. Blocked only by other items → ask [`find_arrangement`] and commit the
//!    dragged item plus every relocation.
//! 3. Anything else (bounds, zone, no arrangement) → reject.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::arrange::{find_arrangement, Arrangement};
use crate::grid::{side, GridLayout, OccupancyGrid, Zone};
use crate::item::{Item, ItemId};
use crate::placement::{can_place, classify_placement, PlacementCheck};
use crate::shape::Rotation;

/// Why an inventory operation was refused. The inventory is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("placement at ({x}, {y}) leaves the grid")]
    OutOfBounds { x: i32, y: i32 },
    #[error("placement at ({x}, {y}) straddles the equipment/backpack boundary")]
    CrossesZone { x: i32, y: i32 },
    #[error("no arrangement makes room at ({x}, {y})")]
    NoArrangement { x: i32, y: i32 },
    #[error("no free space for item {0}")]
    NoSpace(ItemId),
    #[error("item {0} is not in this inventory")]
    UnknownItem(ItemId),
}

/// What a successful drop did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Dropped into free space.
    Placed,
    /// Dropped onto other items, which were moved to these positions.
    Rearranged { moved: Vec<Item> },
}

/// Broken invariant found by [`Inventory::check_consistency`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error("item id {0} appears more than once")]
    DuplicateId(ItemId),
    #[error("item {0} extends outside the grid")]
    OutOfBounds(ItemId),
    #[error("item {0} straddles the equipment/backpack boundary")]
    CrossesZone(ItemId),
    #[error("items {0} and {1} overlap")]
    Overlap(ItemId, ItemId),
}

/// A grid of items: player backpack, loot crate, or warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    layout: GridLayout,
    #[serde(default)]
    items: Vec<Item>,
}

impl Inventory {
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            items: Vec::new(),
        }
    }

    /// Adopt an existing item list as-is. Run
    /// [`check_consistency`](Self::check_consistency) if it came from outside.
    pub fn with_items(layout: GridLayout, items: Vec<Item>) -> Self {
        Self { layout, items }
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Occupancy rebuilt from the item list.
    pub fn grid(&self) -> OccupancyGrid {
        OccupancyGrid::from_items(self.layout, &self.items)
    }

    /// Drop `item` at anchor (`x`, `y`) with `rotation`.
    ///
    /// The item may already live here (a move) or come from elsewhere (an
    /// insert). On success the item and any displaced items are committed.
    pub fn drop_item(
        &mut self,
        item: Item,
        x: i32,
        y: i32,
        rotation: Rotation,
    ) -> Result<DropOutcome, InventoryError> {
        let dragged = item.placed(x, y, rotation);
        match classify_placement(&self.grid(), &dragged, x, y, rotation) {
            PlacementCheck::Legal => {
                log::debug!("placed {} at ({x}, {y}) {}°", dragged.id, rotation.degrees());
                self.commit(dragged, Vec::new());
                Ok(DropOutcome::Placed)
            }
            PlacementCheck::OutOfBounds => {
                log::debug!("rejected {} at ({x}, {y}): out of bounds", dragged.id);
                Err(InventoryError::OutOfBounds { x, y })
            }
            PlacementCheck::CrossesZone => {
                log::debug!("rejected {} at ({x}, {y}): crosses zone", dragged.id);
                Err(InventoryError::CrossesZone { x, y })
            }
            PlacementCheck::Collides(hits) => {
                match find_arrangement(&self.items, &dragged, x, y, &self.layout) {
                    Arrangement::Relocated(moved) => {
                        log::info!(
                            "dropped {} at ({x}, {y}), relocated {} item(s)",
                            dragged.id,
                            moved.len()
                        );
                        self.commit(dragged, moved.clone());
                        Ok(DropOutcome::Rearranged { moved })
                    }
                    Arrangement::NotApplicable => {
                        self.commit(dragged, Vec::new());
                        Ok(DropOutcome::Placed)
                    }
                    Arrangement::NoArrangement => {
                        log::debug!(
                            "rejected {} at ({x}, {y}): {} colliding item(s) cannot move",
                            dragged.id,
                            hits.len()
                        );
                        Err(InventoryError::NoArrangement { x, y })
                    }
                }
            }
        }
    }

    /// Turn an item a quarter clockwise around its anchor, shoving neighbours
    /// aside if needed.
    pub fn rotate_item(&mut self, id: ItemId) -> Result<DropOutcome, InventoryError> {
        let item = self.get(id).cloned().ok_or(InventoryError::UnknownItem(id))?;
        let (x, y, rotation) = (item.x, item.y, item.rotation.next());
        self.drop_item(item, x, y, rotation)
    }

    /// Take an item out (consumed, discarded, or handed elsewhere).
    pub fn remove_item(&mut self, id: ItemId) -> Option<Item> {
        let index = self.items.iter().position(|i| i.id == id)?;
        log::debug!("removed {id}");
        Some(self.items.remove(index))
    }

    /// Put an item in the first free spot: anchors in row-major order, each
    /// with rotations 0°, 90°, 180°, 270°. Never displaces anything.
    pub fn stow(&mut self, item: Item) -> Result<(i32, i32, Rotation), InventoryError> {
        let grid = self.grid();
        let (width, height) = (side(self.layout.width), side(self.layout.height));
        let spot = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .flat_map(|(x, y)| Rotation::ALL.into_iter().map(move |r| (x, y, r)))
            .find(|&(x, y, rotation)| can_place(&grid, &item, x, y, rotation));

        let Some((x, y, rotation)) = spot else {
            return Err(InventoryError::NoSpace(item.id));
        };
        log::debug!("stowed {} at ({x}, {y}) {}°", item.id, rotation.degrees());
        self.commit(item.placed(x, y, rotation), Vec::new());
        Ok((x, y, rotation))
    }

    /// Move an item from `from` into `to` at (`x`, `y`). Both sides are left
    /// untouched if the drop is refused.
    pub fn transfer(
        from: &mut Inventory,
        to: &mut Inventory,
        id: ItemId,
        x: i32,
        y: i32,
        rotation: Rotation,
    ) -> Result<DropOutcome, InventoryError> {
        let item = from.get(id).cloned().ok_or(InventoryError::UnknownItem(id))?;
        let outcome = to.drop_item(item, x, y, rotation)?;
        from.remove_item(id);
        Ok(outcome)
    }

    /// Reveal an unidentified item's true shape.
    pub fn identify(&mut self, id: ItemId) -> Result<(), InventoryError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(InventoryError::UnknownItem(id))?;
        item.revealed = true;
        Ok(())
    }

    /// Items anchored in the equipment band. Empty on an unzoned grid.
    pub fn equipped_items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items
            .iter()
            .filter(|i| self.layout.zoning.zone_of_row(i.y) == Some(Zone::Equipment))
    }

    /// Verify the item list: unique ids, in bounds, zone-consistent, no
    /// overlaps. Returns every problem found.
    pub fn check_consistency(&self) -> Vec<ConsistencyError> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();
        let mut grid = OccupancyGrid::with_layout(self.layout);

        for item in &self.items {
            if !seen.insert(item.id) {
                errors.push(ConsistencyError::DuplicateId(item.id));
                continue;
            }
            match classify_placement(&grid, item, item.x, item.y, item.rotation) {
                PlacementCheck::Legal => {}
                PlacementCheck::OutOfBounds => errors.push(ConsistencyError::OutOfBounds(item.id)),
                PlacementCheck::CrossesZone => errors.push(ConsistencyError::CrossesZone(item.id)),
                PlacementCheck::Collides(others) => errors.extend(
                    others
                        .into_iter()
                        .map(|other| ConsistencyError::Overlap(other, item.id)),
                ),
            }
            grid = grid.write_item(item, item.x, item.y);
        }
        errors
    }

    /// Replace or append `dragged`, then apply relocations.
    fn commit(&mut self, dragged: Item, moved: Vec<Item>) {
        for item in std::iter::once(dragged).chain(moved) {
            match self.items.iter_mut().find(|i| i.id == item.id) {
                Some(slot) => *slot = item,
                None => self.items.push(item),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemCategory;
    use crate::shape::Shape;

    fn item(id: u32, rows: Vec<Vec<u8>>) -> Item {
        Item::new(
            ItemId(id),
            format!("item-{id}"),
            ItemCategory::Artifact,
            Shape::from_rows(rows).unwrap(),
        )
    }

    fn player() -> Inventory {
        Inventory::new(GridLayout::zoned(4, 6, 2))
    }

    #[test]
    fn test_direct_drop_inserts() {
        let mut inv = player();
        let outcome = inv.drop_item(item(1, vec![vec![1, 1]]), 1, 4, Rotation::Deg0);
        assert_eq!(outcome, Ok(DropOutcome::Placed));
        assert_eq!(inv.get(ItemId(1)).map(|i| (i.x, i.y)), Some((1, 4)));
        assert!(inv.check_consistency().is_empty());
    }

    #[test]
    fn test_drop_moves_existing_item() {
        let mut inv = player();
        inv.drop_item(item(1, vec![vec![1, 1]]), 0, 3, Rotation::Deg0).unwrap();
        let existing = inv.get(ItemId(1)).cloned().unwrap();
        // Overlapping its own old cells is allowed.
        inv.drop_item(existing, 1, 3, Rotation::Deg0).unwrap();
        assert_eq!(inv.len(), 1);
        assert_eq!(inv.grid().footprint_of(ItemId(1)), vec![(1, 3), (2, 3)]);
    }

    #[test]
    fn test_collision_triggers_rearrangement() {
        let mut inv = player();
        inv.drop_item(item(1, vec![vec![1]]), 0, 3, Rotation::Deg0).unwrap();
        let outcome = inv
            .drop_item(item(2, vec![vec![1, 1]]), 0, 3, Rotation::Deg0)
            .unwrap();
        match outcome {
            DropOutcome::Rearranged { moved } => {
                assert_eq!(moved.len(), 1);
                assert_eq!((moved[0].x, moved[0].y), (0, 2));
            }
            other => panic!("expected rearrangement, got {other:?}"),
        }
        assert_eq!(inv.get(ItemId(1)).map(|i| (i.x, i.y)), Some((0, 2)));
        assert!(inv.check_consistency().is_empty());
    }

    #[test]
    fn test_rejection_leaves_state_untouched() {
        let mut inv = player();
        inv.drop_item(item(1, vec![vec![1]]), 0, 0, Rotation::Deg0).unwrap();
        let before = inv.clone();

        let column = item(2, vec![vec![1], vec![1]]);
        assert_eq!(
            inv.drop_item(column.clone(), 0, 1, Rotation::Deg0),
            Err(InventoryError::CrossesZone { x: 0, y: 1 })
        );
        assert_eq!(
            inv.drop_item(column, 3, 5, Rotation::Deg0),
            Err(InventoryError::OutOfBounds { x: 3, y: 5 })
        );
        assert_eq!(inv, before);
    }

    #[test]
    fn test_extreme_anchor_is_out_of_bounds() {
        let mut inv = player();
        inv.drop_item(item(1, vec![vec![1]]), 0, 3, Rotation::Deg0).unwrap();
        let before = inv.clone();
        assert_eq!(
            inv.drop_item(item(2, vec![vec![1, 1]]), i32::MAX, 0, Rotation::Deg0),
            Err(InventoryError::OutOfBounds { x: i32::MAX, y: 0 })
        );
        assert_eq!(
            inv.drop_item(item(1, vec![vec![1]]), i32::MIN, i32::MAX, Rotation::Deg90),
            Err(InventoryError::OutOfBounds { x: i32::MIN, y: i32::MAX })
        );
        assert_eq!(inv, before);
    }

    #[test]
    fn test_no_arrangement_error() {
        let mut inv = Inventory::new(GridLayout::unzoned(2, 1));
        inv.drop_item(item(1, vec![vec![1]]), 0, 0, Rotation::Deg0).unwrap();
        let before = inv.clone();
        assert_eq!(
            inv.drop_item(item(2, vec![vec![1, 1]]), 0, 0, Rotation::Deg0),
            Err(InventoryError::NoArrangement { x: 0, y: 0 })
        );
        assert_eq!(inv, before);
    }

    #[test]
    fn test_rotate_in_place() {
        let mut inv = player();
        inv.drop_item(item(1, vec![vec![1, 1, 1]]), 0, 3, Rotation::Deg0).unwrap();
        inv.rotate_item(ItemId(1)).unwrap();
        let rotated = inv.get(ItemId(1)).unwrap();
        assert_eq!(rotated.rotation, Rotation::Deg90);
        assert_eq!(inv.grid().footprint_of(ItemId(1)), vec![(0, 3), (0, 4), (0, 5)]);
        assert_eq!(
            inv.rotate_item(ItemId(42)),
            Err(InventoryError::UnknownItem(ItemId(42)))
        );
    }

    #[test]
    fn test_stow_first_fit() {
        let mut inv = Inventory::new(GridLayout::unzoned(3, 3));
        inv.drop_item(item(1, vec![vec![1, 1, 1]]), 0, 0, Rotation::Deg0).unwrap();
        let spot = inv.stow(item(2, vec![vec![1], vec![1], vec![1]])).unwrap();
        // Vertical bar does not fit under row 0 upright; lying down at (0, 1) does.
        assert_eq!(spot, (0, 1, Rotation::Deg90));
        assert!(inv.check_consistency().is_empty());
    }

    #[test]
    fn stow_reports_full() {
        let mut inv = Inventory::new(GridLayout::unzoned(1, 1));
        inv.stow(item(1, vec![vec![1]])).unwrap();
        assert_eq!(
            inv.stow(item(2, vec![vec![1]])),
            Err(InventoryError::NoSpace(ItemId(2)))
        );
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn test_transfer_between_inventories() {
        let mut crate_inv = Inventory::new(GridLayout::unzoned(4, 4));
        crate_inv.stow(item(7, vec![vec![1, 1]])).unwrap();
        let mut bag = player();

        let outcome = Inventory::transfer(&mut crate_inv, &mut bag, ItemId(7), 0, 0, Rotation::Deg0);
        assert_eq!(outcome, Ok(DropOutcome::Placed));
        assert!(crate_inv.is_empty());
        assert!(bag.contains(ItemId(7)));
    }

    #[test]
    fn test_failed_transfer_keeps_both_sides() {
        let mut crate_inv = Inventory::new(GridLayout::unzoned(4, 4));
        crate_inv.stow(item(7, vec![vec![1], vec![1]])).unwrap();
        let mut bag = player();
        let (crate_before, bag_before) = (crate_inv.clone(), bag.clone());

        let result = Inventory::transfer(&mut crate_inv, &mut bag, ItemId(7), 0, 1, Rotation::Deg0);
        assert_eq!(result, Err(InventoryError::CrossesZone { x: 0, y: 1 }));
        assert_eq!(crate_inv, crate_before);
        assert_eq!(bag, bag_before);
    }

    #[test]
    fn test_identify_and_equipped() {
        let mut inv = player();
        let idol = item(3, vec![vec![1, 0], vec![1, 1]]).unidentified();
        inv.drop_item(idol, 0, 0, Rotation::Deg0).unwrap();
        inv.drop_item(item(4, vec![vec![1]]), 3, 5, Rotation::Deg0).unwrap();

        let equipped: Vec<_> = inv.equipped_items().map(|i| i.id).collect();
        assert_eq!(equipped, vec![ItemId(3)]);

        assert_eq!(inv.get(ItemId(3)).unwrap().display_shape().cell_count(), 4);
        inv.identify(ItemId(3)).unwrap();
        assert_eq!(inv.get(ItemId(3)).unwrap().display_shape().cell_count(), 3);
        assert_eq!(inv.identify(ItemId(9)), Err(InventoryError::UnknownItem(ItemId(9))));
    }

    #[test]
    fn test_consistency_reports_problems() {
        let layout = GridLayout::zoned(4, 6, 2);
        let inv = Inventory::with_items(
            layout,
            vec![
                item(1, vec![vec![1, 1]]).at(0, 3),
                item(2, vec![vec![1]]).at(1, 3),
                item(1, vec![vec![1]]).at(3, 5),
                item(3, vec![vec![1], vec![1]]).at(2, 1),
                item(4, vec![vec![1, 1]]).at(3, 4),
            ],
        );
        assert_eq!(
            inv.check_consistency(),
            vec![
                ConsistencyError::Overlap(ItemId(1), ItemId(2)),
                ConsistencyError::DuplicateId(ItemId(1)),
                ConsistencyError::CrossesZone(ItemId(3)),
                ConsistencyError::OutOfBounds(ItemId(4)),
            ]
        );
    }

    #[test]
    fn test_inventory_serde() {
        let mut inv = player();
        inv.drop_item(item(1, vec![vec![1, 1]]), 0, 3, Rotation::Deg90).unwrap();
        let json = serde_json::to_string(&inv).unwrap();
        let back: Inventory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, inv);
    }
}
