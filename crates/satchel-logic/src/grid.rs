//! Occupancy grid: which item owns which cell.
//!
//! The grid is a derived cache. The item list is the source of truth and the
//! grid is rebuilt from it whenever a definitive view is needed. Every
//! operation here returns a new grid and leaves `self` untouched, so a scratch
//! grid can never alias the caller's.

use serde::{Deserialize, Serialize};

use crate::item::{Item, ItemId};

/// Row band a cell belongs to on a zoned grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Equipment,
    Backpack,
}

/// How the rows of a grid are partitioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Zoning {
    /// All cells equivalent (loot containers, warehouse).
    Unzoned,
    /// Rows `0..equipment_rows` are equipment, the rest backpack.
    Zoned { equipment_rows: usize },
}

impl Zoning {
    /// Zone of row `y`, or `None` on an unzoned grid. Rows outside the grid
    /// still get a zone so an off-grid anchor can be compared.
    pub fn zone_of_row(&self, y: i32) -> Option<Zone> {
        match *self {
            Zoning::Unzoned => None,
            Zoning::Zoned { equipment_rows } => {
                if usize::try_from(y).map_or(true, |row| row < equipment_rows) {
                    Some(Zone::Equipment)
                } else {
                    Some(Zone::Backpack)
                }
            }
        }
    }

    pub fn is_zoned(&self) -> bool {
        matches!(self, Zoning::Zoned { .. })
    }
}

/// Dimensions and zoning of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    pub width: usize,
    pub height: usize,
    pub zoning: Zoning,
}

impl GridLayout {
    pub fn unzoned(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            zoning: Zoning::Unzoned,
        }
    }

    pub fn zoned(width: usize, height: usize, equipment_rows: usize) -> Self {
        Self {
            width,
            height,
            zoning: Zoning::Zoned { equipment_rows },
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// A grid dimension as a signed coordinate bound, saturating at `i32::MAX`.
pub(crate) fn side(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

/// W×H table of optional owners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    layout: GridLayout,
    /// Row-major.
    cells: Vec<Option<ItemId>>,
}

impl OccupancyGrid {
    /// Unzoned grid with every cell unclaimed.
    pub fn empty(width: usize, height: usize) -> Self {
        Self::with_layout(GridLayout::unzoned(width, height))
    }

    /// Empty grid carrying the layout's zoning.
    pub fn with_layout(layout: GridLayout) -> Self {
        Self {
            layout,
            cells: vec![None; layout.area()],
        }
    }

    /// Rebuild from an item list, each item at its own anchor and rotation.
    pub fn from_items<'a>(layout: GridLayout, items: impl IntoIterator<Item = &'a Item>) -> Self {
        items
            .into_iter()
            .fold(Self::with_layout(layout), |grid, item| {
                grid.write_item(item, item.x, item.y)
            })
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn width(&self) -> usize {
        self.layout.width
    }

    pub fn height(&self) -> usize {
        self.layout.height
    }

    pub fn zoning(&self) -> Zoning {
        self.layout.zoning
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.layout.in_bounds(x, y)
    }

    pub fn zone_of_row(&self, y: i32) -> Option<Zone> {
        self.layout.zoning.zone_of_row(y)
    }

    /// Owner of cell (`x`, `y`); `None` when empty or out of bounds.
    pub fn owner_at(&self, x: i32, y: i32) -> Option<ItemId> {
        self.index(x, y).and_then(|i| self.cells[i])
    }

    /// Claim the item's footprint at its current rotation, anchored at
    /// (`x`, `y`).
    ///
    /// Performs no validation and overwrites whatever is there. Cells that
    /// fall outside the grid are skipped.
    pub fn write_item(&self, item: &Item, x: i32, y: i32) -> OccupancyGrid {
        let mut next = self.clone();
        for (cx, cy) in item.footprint_at(x, y, item.rotation) {
            if let Some(i) = next.index(cx, cy) {
                next.cells[i] = Some(item.id);
            }
        }
        next
    }

    /// Unclaim every cell owned by `id`; other owners are untouched.
    pub fn clear_item(&self, id: ItemId) -> OccupancyGrid {
        OccupancyGrid {
            layout: self.layout,
            cells: self
                .cells
                .iter()
                .map(|&cell| cell.filter(|&owner| owner != id))
                .collect(),
        }
    }

    /// Cells currently owned by `id`, row-major.
    pub fn footprint_of(&self, id: ItemId) -> Vec<(i32, i32)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &cell)| cell == Some(id))
            .map(|(i, _)| self.coords(i))
            .collect()
    }

    pub fn free_cell_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    /// ASCII dump for diagnostics: `.` empty, otherwise the owner id modulo
    /// 36 as a base-36 digit. A dashed line separates the equipment band.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for y in 0..self.height() {
            if let Zoning::Zoned { equipment_rows } = self.layout.zoning {
                if y == equipment_rows && y > 0 {
                    out.push_str(&"-".repeat(self.width()));
                    out.push('\n');
                }
            }
            for x in 0..self.width() {
                let ch = match self.cells[y * self.width() + x] {
                    None => '.',
                    Some(ItemId(id)) => std::char::from_digit(id % 36, 36).unwrap_or('?'),
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| y as usize * self.layout.width + x as usize)
    }

    fn coords(&self, index: usize) -> (i32, i32) {
        (
            side(index % self.layout.width),
            side(index / self.layout.width),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemCategory;
    use crate::shape::{Rotation, Shape};

    fn item(id: u32, rows: Vec<Vec<u8>>) -> Item {
        Item::new(
            ItemId(id),
            format!("item-{id}"),
            ItemCategory::Loot,
            Shape::from_rows(rows).unwrap(),
        )
    }

    #[test]
    fn test_empty_grid() {
        let grid = OccupancyGrid::empty(4, 3);
        assert_eq!(grid.free_cell_count(), 12);
        assert_eq!(grid.owner_at(0, 0), None);
        assert_eq!(grid.zoning(), Zoning::Unzoned);
    }

    #[test]
    fn test_write_claims_footprint() {
        let l = item(1, vec![vec![1, 0], vec![1, 1]]);
        let grid = OccupancyGrid::empty(4, 4).write_item(&l, 1, 1);
        assert_eq!(grid.owner_at(1, 1), Some(ItemId(1)));
        assert_eq!(grid.owner_at(2, 1), None);
        assert_eq!(grid.owner_at(1, 2), Some(ItemId(1)));
        assert_eq!(grid.owner_at(2, 2), Some(ItemId(1)));
        assert_eq!(grid.free_cell_count(), 13);
    }

    #[test]
    fn test_write_uses_current_rotation() {
        let bar = item(3, vec![vec![1, 1, 1]]).turned(Rotation::Deg90);
        let grid = OccupancyGrid::empty(3, 3).write_item(&bar, 0, 0);
        assert_eq!(grid.footprint_of(ItemId(3)), vec![(0, 0), (0, 1), (0, 2)]);
    }

    #[test]
    fn test_write_does_not_mutate_source() {
        let base = OccupancyGrid::empty(2, 2);
        let _ = base.write_item(&item(1, vec![vec![1]]), 0, 0);
        assert_eq!(base.free_cell_count(), 4);
    }

    #[test]
    fn test_write_then_clear_restores() {
        let a = item(1, vec![vec![1, 1]]);
        let b = item(2, vec![vec![1], vec![1]]);
        let before = OccupancyGrid::empty(4, 4).write_item(&a, 0, 0);
        let after = before.write_item(&b, 3, 2).clear_item(ItemId(2));
        assert_eq!(after, before);
    }

    #[test]
    fn clear_leaves_other_owners() {
        let a = item(1, vec![vec![1, 1]]);
        let b = item(2, vec![vec![1, 1]]);
        let grid = OccupancyGrid::empty(2, 2)
            .write_item(&a, 0, 0)
            .write_item(&b, 0, 1)
            .clear_item(ItemId(1));
        assert!(grid.footprint_of(ItemId(1)).is_empty());
        assert_eq!(grid.footprint_of(ItemId(2)), vec![(0, 1), (1, 1)]);
    }

    #[test]
    fn test_write_skips_out_of_bounds_cells() {
        let bar = item(1, vec![vec![1, 1, 1]]);
        let grid = OccupancyGrid::empty(2, 1).write_item(&bar, 1, 0);
        assert_eq!(grid.footprint_of(ItemId(1)), vec![(1, 0)]);
    }

    #[test]
    fn test_from_items_matches_sequential_writes() {
        let a = item(1, vec![vec![1, 1]]).at(0, 0);
        let b = item(2, vec![vec![1]]).at(2, 1);
        let layout = GridLayout::unzoned(3, 2);
        let rebuilt = OccupancyGrid::from_items(layout, [&a, &b]);
        let manual = OccupancyGrid::with_layout(layout)
            .write_item(&a, 0, 0)
            .write_item(&b, 2, 1);
        assert_eq!(rebuilt, manual);
    }

    #[test]
    fn test_zone_of_row() {
        let zoning = Zoning::Zoned { equipment_rows: 2 };
        assert_eq!(zoning.zone_of_row(0), Some(Zone::Equipment));
        assert_eq!(zoning.zone_of_row(1), Some(Zone::Equipment));
        assert_eq!(zoning.zone_of_row(2), Some(Zone::Backpack));
        assert_eq!(zoning.zone_of_row(-1), Some(Zone::Equipment));
        assert_eq!(Zoning::Unzoned.zone_of_row(5), None);
    }

    #[test]
    fn huge_equipment_band_does_not_wrap() {
        let zoning = Zoning::Zoned {
            equipment_rows: usize::MAX,
        };
        assert_eq!(zoning.zone_of_row(0), Some(Zone::Equipment));
        assert_eq!(zoning.zone_of_row(i32::MAX), Some(Zone::Equipment));
        assert_eq!(side(usize::MAX), i32::MAX);
        assert_eq!(side(6), 6);
    }

    #[test]
    fn test_render_marks_equipment_band() {
        let grid = OccupancyGrid::with_layout(GridLayout::zoned(2, 3, 1))
            .write_item(&item(11, vec![vec![1]]), 1, 2);
        assert_eq!(grid.render(), "..\n--\n..\n.b\n");
    }

    #[test]
    fn test_zoning_serde() {
        let json = serde_json::to_string(&Zoning::Zoned { equipment_rows: 3 }).unwrap();
        assert_eq!(json, r#"{"kind":"zoned","equipment_rows":3}"#);
        let back: Zoning = serde_json::from_str(r#"{"kind":"unzoned"}"#).unwrap();
        assert_eq!(back, Zoning::Unzoned);
    }
}
