//! Smart auto-arrangement for colliding drops.
//!
//! When a dragged item lands on cells owned by other items, the arranger keeps
//! the dragged item where it was dropped and searches for new homes for
//! exactly the items it displaced. Every other item stays put.
//!
//! The search is greedy and deterministic:
//!
//! 1. Displaced items are handled largest first (occupied cells, stable).
//! 2. Each one tries anchors nearest its old anchor first (Manhattan distance,
//!    ties by row then column), and at each anchor the rotations 0°, 90°,
//!    180°, 270° of its base shape.
//! 3. The first legal pair wins and is written into a scratch grid before the
//!    next item is considered.
//!
//! If any displaced item finds no home the whole attempt is abandoned. Inputs
//! are only ever borrowed, so a failed attempt leaves nothing behind.

use std::cmp::Reverse;
use std::collections::HashSet;

use crate::grid::{side, GridLayout, OccupancyGrid};
use crate::item::{Item, ItemId};
use crate::placement::{can_place, classify_placement, PlacementCheck};
use crate::shape::Rotation;

/// Result of [`find_arrangement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arrangement {
    /// The drop collides with nothing; place it directly.
    NotApplicable,
    /// Displaced items with their new anchors and rotations. The dragged
    /// item itself is not included.
    Relocated(Vec<Item>),
    /// The drop is out of bounds, crosses a zone, or the displaced items
    /// cannot all be rehomed.
    NoArrangement,
}

/// Find a layout where `dragged` sits at (`x`, `y`) with `dragged.rotation`
/// and every item it collides with is moved somewhere legal.
///
/// `items` is the current inventory; it may or may not contain `dragged`
/// (at its pre-drag position). Neither `items` nor `dragged` is modified.
pub fn find_arrangement(
    items: &[Item],
    dragged: &Item,
    x: i32,
    y: i32,
    layout: &GridLayout,
) -> Arrangement {
    let current = OccupancyGrid::from_items(*layout, items.iter().filter(|i| i.id != dragged.id));

    let colliding: HashSet<ItemId> =
        match classify_placement(&current, dragged, x, y, dragged.rotation) {
            PlacementCheck::Legal => return Arrangement::NotApplicable,
            PlacementCheck::OutOfBounds | PlacementCheck::CrossesZone => {
                return Arrangement::NoArrangement
            }
            PlacementCheck::Collides(ids) => ids.into_iter().collect(),
        };

    let mut scratch = OccupancyGrid::from_items(
        *layout,
        items
            .iter()
            .filter(|i| i.id != dragged.id && !colliding.contains(&i.id)),
    )
    .write_item(dragged, x, y);

    let mut displaced: Vec<&Item> = items
        .iter()
        .filter(|i| colliding.contains(&i.id))
        .collect();
    displaced.sort_by_key(|i| Reverse(i.cell_count()));

    let mut relocated = Vec::with_capacity(displaced.len());
    for item in displaced {
        let Some(moved) = relocate(&scratch, item) else {
            return Arrangement::NoArrangement;
        };
        scratch = scratch.write_item(&moved, moved.x, moved.y);
        relocated.push(moved);
    }

    Arrangement::Relocated(relocated)
}

/// Nearest legal (anchor, rotation) for `item` on `scratch`.
fn relocate(scratch: &OccupancyGrid, item: &Item) -> Option<Item> {
    NearestCells::new(scratch.layout(), item.x, item.y)
        .flat_map(|(cx, cy)| Rotation::ALL.into_iter().map(move |r| (cx, cy, r)))
        .find(|&(cx, cy, rotation)| can_place(scratch, item, cx, cy, rotation))
        .map(|(cx, cy, rotation)| item.placed(cx, cy, rotation))
}

/// Grid cells ordered by Manhattan distance from an origin, ties broken by
/// row then column.
///
/// Produced lazily ring by ring, so nothing is materialized or sorted. The
/// origin may lie anywhere, including far outside the grid; distances are
/// tracked in `i64` and rings that cannot touch the grid are skipped.
#[derive(Debug, Clone)]
pub struct NearestCells {
    width: i64,
    height: i64,
    origin: (i64, i64),
    max_distance: i64,
    distance: i64,
    row: i64,
    /// Right-hand cell of the current row, emitted after the left one.
    pending: Option<(i32, i32)>,
}

impl NearestCells {
    pub fn new(layout: &GridLayout, origin_x: i32, origin_y: i32) -> Self {
        let width = i64::from(side(layout.width));
        let height = i64::from(side(layout.height));
        let (ox, oy) = (i64::from(origin_x), i64::from(origin_y));

        // Distance from the origin to the nearest and farthest grid cell.
        let gap = |o: i64, len: i64| (-o).max(o - (len - 1)).max(0);
        let reach = |o: i64, len: i64| o.abs().max((len - 1 - o).abs());
        let (distance, max_distance) = if width == 0 || height == 0 {
            (0, -1)
        } else {
            (
                gap(ox, width) + gap(oy, height),
                reach(ox, width) + reach(oy, height),
            )
        };

        Self {
            width,
            height,
            origin: (ox, oy),
            max_distance,
            distance,
            row: (oy - distance).max(0),
            pending: None,
        }
    }

    fn first_row(&self, distance: i64) -> i64 {
        (self.origin.1 - distance).max(0)
    }

    fn last_row(&self, distance: i64) -> i64 {
        (self.origin.1 + distance).min(self.height - 1)
    }

    /// In-grid cell as `i32`. Grid sides never exceed `i32::MAX`.
    fn cell(x: i64, y: i64) -> (i32, i32) {
        (
            i32::try_from(x).unwrap_or(i32::MAX),
            i32::try_from(y).unwrap_or(i32::MAX),
        )
    }
}

impl Iterator for NearestCells {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        if let Some(cell) = self.pending.take() {
            return Some(cell);
        }

        let (ox, oy) = self.origin;
        while self.distance <= self.max_distance {
            if self.row < self.first_row(self.distance) {
                self.row = self.first_row(self.distance);
            }
            while self.row <= self.last_row(self.distance) {
                let y = self.row;
                self.row += 1;

                let dx = self.distance - (y - oy).abs();
                if dx < 0 {
                    continue;
                }
                let left = ox - dx;
                let right = ox + dx;
                let left_ok = left >= 0 && left < self.width;
                let right_ok = dx > 0 && right >= 0 && right < self.width;

                match (left_ok, right_ok) {
                    (true, true) => {
                        self.pending = Some(Self::cell(right, y));
                        return Some(Self::cell(left, y));
                    }
                    (true, false) => return Some(Self::cell(left, y)),
                    (false, true) => return Some(Self::cell(right, y)),
                    (false, false) => {}
                }
            }
            self.distance += 1;
            self.row = self.first_row(self.distance);
        }
        None
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
            ItemCategory::Loot,
            Shape::from_rows(rows).unwrap(),
        )
    }

    fn player_layout() -> GridLayout {
        GridLayout::zoned(4, 6, 2)
    }

    /// Reference ordering: materialize every cell and sort.
    fn sorted_cells(layout: &GridLayout, ox: i32, oy: i32) -> Vec<(i32, i32)> {
        let mut cells = Vec::new();
        for y in 0..layout.height as i32 {
            for x in 0..layout.width as i32 {
                cells.push((x, y));
            }
        }
        cells.sort_by_key(|&(x, y)| ((x - ox).abs() + (y - oy).abs(), y, x));
        cells
    }

    #[test]
    fn test_nearest_cells_matches_sorted_order() {
        let layout = GridLayout::unzoned(5, 4);
        for (ox, oy) in [(0, 0), (2, 1), (4, 3), (-2, 1), (7, 9), (1, -3)] {
            let lazy: Vec<_> = NearestCells::new(&layout, ox, oy).collect();
            assert_eq!(lazy, sorted_cells(&layout, ox, oy), "origin ({ox}, {oy})");
        }
    }

    #[test]
    fn test_nearest_cells_far_origins() {
        let layout = GridLayout::unzoned(3, 2);
        for (ox, oy) in [(i32::MAX, 0), (i32::MIN, i32::MIN), (0, i32::MAX), (i32::MAX, i32::MIN)] {
            let lazy: Vec<_> = NearestCells::new(&layout, ox, oy).collect();
            assert_eq!(lazy.len(), 6, "origin ({ox}, {oy})");
        }
        let from_far_right: Vec<_> = NearestCells::new(&layout, i32::MAX, 0).take(3).collect();
        assert_eq!(from_far_right, vec![(2, 0), (1, 0), (2, 1)]);
    }

    #[test]
    fn extreme_drop_is_rejected_without_search() {
        let bar = item(1, vec![vec![1, 1]]);
        let layout = GridLayout::unzoned(4, 4);
        assert_eq!(
            find_arrangement(&[], &bar, i32::MAX, 0, &layout),
            Arrangement::NoArrangement
        );
        assert_eq!(
            find_arrangement(&[], &bar, i32::MIN, i32::MIN, &player_layout()),
            Arrangement::NoArrangement
        );
    }

    #[test]
    fn test_nearest_cells_empty_grid() {
        let layout = GridLayout::unzoned(0, 3);
        assert_eq!(NearestCells::new(&layout, 0, 0).count(), 0);
    }

    #[test]
    fn test_nearest_cells_tie_break() {
        let layout = GridLayout::unzoned(4, 6);
        let first: Vec<_> = NearestCells::new(&layout, 0, 3).take(4).collect();
        assert_eq!(first, vec![(0, 3), (0, 2), (1, 3), (0, 4)]);
    }

    #[test]
    fn test_not_applicable_without_collision() {
        let a = item(1, vec![vec![1]]).at(3, 5);
        let b = item(2, vec![vec![1, 1]]);
        assert_eq!(
            find_arrangement(&[a], &b, 0, 3, &player_layout()),
            Arrangement::NotApplicable
        );
    }

    #[test]
    fn test_relocates_single_cell_item_nearest_first() {
        let a = item(1, vec![vec![1]]).at(0, 3);
        let b = item(2, vec![vec![1, 1]]);
        let result = find_arrangement(&[a.clone()], &b, 0, 3, &player_layout());
        assert_eq!(result, Arrangement::Relocated(vec![a.placed(0, 2, Rotation::Deg0)]));
    }

    #[test]
    fn test_fails_when_backpack_full() {
        let layout = player_layout();
        let a = item(1, vec![vec![1]]).at(0, 3);
        let mut items = vec![a];
        let mut next_id = 10;
        for y in 0..6 {
            for x in 0..4 {
                if (x, y) == (0, 3) || (x, y) == (1, 3) {
                    continue;
                }
                items.push(item(next_id, vec![vec![1]]).at(x, y));
                next_id += 1;
            }
        }
        let before = items.clone();
        let b = item(2, vec![vec![1, 1]]);

        assert_eq!(
            find_arrangement(&items, &b, 0, 3, &layout),
            Arrangement::NoArrangement
        );
        assert_eq!(items, before);
    }

    #[test]
    fn test_zone_straddle_rejected_before_search() {
        let column = item(2, vec![vec![1], vec![1]]);
        // Target cells are empty; the footprint alone is illegal.
        assert_eq!(
            find_arrangement(&[], &column, 0, 1, &player_layout()),
            Arrangement::NoArrangement
        );
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let a = item(1, vec![vec![1]]).at(3, 3);
        let bar = item(2, vec![vec![1, 1]]);
        assert_eq!(
            find_arrangement(&[a], &bar, 3, 3, &player_layout()),
            Arrangement::NoArrangement
        );
    }

    #[test]
    fn test_rotates_displaced_item_when_needed() {
        // A 2x2 block dropped on the left of a 3x3 box knocks a horizontal bar
        // off the top row. The nearest anchor that fits is the right column,
        // upright.
        let layout = GridLayout::unzoned(3, 3);
        let bar = item(1, vec![vec![1, 1, 1]]).at(0, 0);
        let block = item(2, vec![vec![1, 1], vec![1, 1]]);

        match find_arrangement(&[bar.clone()], &block, 0, 0, &layout) {
            Arrangement::Relocated(moved) => {
                assert_eq!(moved, vec![bar.placed(2, 0, Rotation::Deg90)]);
            }
            other => panic!("expected relocation, got {other:?}"),
        }

        // Plug the right column and there is nowhere left.
        let plug = item(3, vec![vec![1]]).at(2, 2);
        assert_eq!(
            find_arrangement(&[bar, plug], &block, 0, 0, &layout),
            Arrangement::NoArrangement
        );
    }

    #[test]
    fn test_larger_items_placed_first() {
        // Both displaced items need a new home; the bigger one is handled
        // first even though it comes later in the list.
        let layout = GridLayout::unzoned(4, 2);
        let small = item(1, vec![vec![1]]).at(0, 0);
        let big = item(2, vec![vec![1, 1]]).at(1, 0);
        let wall = item(9, vec![vec![1, 1]]).at(0, 1);
        let dropped = item(3, vec![vec![1, 1, 1]]);
        let items = vec![small.clone(), big.clone(), wall];

        match find_arrangement(&items, &dropped, 0, 0, &layout) {
            Arrangement::Relocated(moved) => {
                let ids: Vec<_> = moved.iter().map(|i| i.id).collect();
                assert_eq!(ids, vec![ItemId(2), ItemId(1)]);
                assert_eq!(moved[0], big.placed(3, 0, Rotation::Deg90));
                assert_eq!(moved[1], small.placed(2, 1, Rotation::Deg0));
            }
            other => panic!("expected relocation, got {other:?}"),
        }
    }

    #[test]
    fn test_equal_sizes_keep_list_order() {
        let layout = GridLayout::unzoned(4, 1);
        let first = item(1, vec![vec![1]]).at(0, 0);
        let second = item(2, vec![vec![1]]).at(1, 0);
        let wide = item(3, vec![vec![1, 1]]);

        // The earlier entry picks first and takes the nearer free cell.
        assert_eq!(
            find_arrangement(&[first.clone(), second.clone()], &wide, 0, 0, &layout),
            Arrangement::Relocated(vec![
                first.placed(2, 0, Rotation::Deg0),
                second.placed(3, 0, Rotation::Deg0),
            ])
        );
        assert_eq!(
            find_arrangement(&[second.clone(), first.clone()], &wide, 0, 0, &layout),
            Arrangement::Relocated(vec![
                second.placed(2, 0, Rotation::Deg0),
                first.placed(3, 0, Rotation::Deg0),
            ])
        );
    }

    #[test]
    fn test_dragged_item_in_list_is_ignored() {
        let a = item(1, vec![vec![1]]).at(0, 3);
        let b = item(2, vec![vec![1, 1]]).at(2, 5);
        let items = vec![a.clone(), b.clone()];
        // Moving b onto a: b's old cells must not block a's relocation.
        let result = find_arrangement(&items, &b, 0, 3, &player_layout());
        assert_eq!(result, Arrangement::Relocated(vec![a.placed(0, 2, Rotation::Deg0)]));
    }

    #[test]
    fn test_inputs_unchanged_and_deterministic() {
        let layout = player_layout();
        let items = vec![
            item(1, vec![vec![1, 1]]).at(0, 3),
            item(2, vec![vec![1], vec![1]]).at(2, 3),
            item(3, vec![vec![1, 1, 1]]).at(0, 5),
        ];
        let dragged = item(4, vec![vec![1, 1, 1], vec![0, 1, 0]]);
        let snapshot = (items.clone(), dragged.clone());

        let first = find_arrangement(&items, &dragged, 0, 3, &layout);
        let second = find_arrangement(&items, &dragged, 0, 3, &layout);
        assert_eq!(first, second);
        assert_eq!((items, dragged), snapshot);
    }
}
