//! Item shapes and quarter-turn rotation.
//!
//! A [`Shape`] is a rectangular binary mask stored row-major. Rotation never
//! mutates a shape; it produces a new one.
//!
//! ```
//! use satchel_logic::shape::{Rotation, Shape};
//!
//! let bar = Shape::from_rows(vec![vec![1, 1, 1]]).unwrap();
//! let upright = bar.rotated(Rotation::Deg90);
//! assert_eq!((upright.width(), upright.height()), (1, 3));
//! assert_eq!(upright.rotated(Rotation::Deg270), bar);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a matrix could not be turned into a [`Shape`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("shape has no rows or no columns")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cell ({row}, {col}) holds {value}, expected 0 or 1")]
    NonBinary { row: usize, col: usize, value: u8 },
    #[error("shape has no occupied cells")]
    NoOccupiedCells,
}

/// Rectangular binary occupancy matrix in the item's local frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Shape {
    width: usize,
    /// Row-major; cell (row r, col c) lives at `r * width + c`.
    mask: Vec<bool>,
}

impl Shape {
    /// Build a shape from rows of 0/1 values.
    ///
    /// Rejects empty, ragged, non-binary, and all-zero matrices. Those are the
    /// only malformed inputs; everything downstream assumes a valid shape.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, ShapeError> {
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(ShapeError::Empty);
        }

        let mut mask = Vec::with_capacity(width * rows.len());
        for (r, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(ShapeError::Ragged {
                    row: r,
                    expected: width,
                    found: row.len(),
                });
            }
            for (c, &value) in row.iter().enumerate() {
                match value {
                    0 => mask.push(false),
                    1 => mask.push(true),
                    _ => return Err(ShapeError::NonBinary { row: r, col: c, value }),
                }
            }
        }

        if !mask.iter().any(|&cell| cell) {
            return Err(ShapeError::NoOccupiedCells);
        }
        Ok(Self { width, mask })
    }

    /// A fully occupied `width`×`height` rectangle.
    pub fn rectangle(width: usize, height: usize) -> Result<Self, ShapeError> {
        if width == 0 || height == 0 {
            return Err(ShapeError::Empty);
        }
        Ok(Self {
            width,
            mask: vec![true; width * height],
        })
    }

    /// Single occupied cell.
    pub fn single() -> Self {
        Self {
            width: 1,
            mask: vec![true],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.mask.len() / self.width
    }

    /// Whether local cell (`col`, `row`) is occupied. Out-of-range is empty.
    pub fn is_occupied(&self, col: usize, row: usize) -> bool {
        col < self.width && row < self.height() && self.mask[row * self.width + col]
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.mask.iter().filter(|&&cell| cell).count()
    }

    /// Occupied cells as `(col, row)` offsets, in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.mask
            .iter()
            .enumerate()
            .filter(|(_, &cell)| cell)
            .map(move |(i, _)| (i % width, i / width))
    }

    /// Rotate 90° clockwise: R×C becomes C×R and (r, c) moves to (c, R-1-r).
    pub fn rotate_clockwise(&self) -> Shape {
        let rows = self.height();
        let cols = self.width;
        let mut mask = vec![false; rows * cols];
        for r in 0..rows {
            for c in 0..cols {
                mask[c * rows + (rows - 1 - r)] = self.mask[r * cols + c];
            }
        }
        Shape { width: rows, mask }
    }

    /// This shape turned clockwise by `rotation`.
    pub fn rotated(&self, rotation: Rotation) -> Shape {
        (0..rotation.quarter_turns()).fold(self.clone(), |shape, _| shape.rotate_clockwise())
    }

    /// Fully occupied shape with the same dimensions. Used to hide the true
    /// silhouette of unidentified items.
    pub fn bounding_box(&self) -> Shape {
        Shape {
            width: self.width,
            mask: vec![true; self.mask.len()],
        }
    }

    /// Back to nested 0/1 rows.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.mask
            .chunks(self.width)
            .map(|row| row.iter().map(|&cell| u8::from(cell)).collect())
            .collect()
    }
}

impl TryFrom<Vec<Vec<u8>>> for Shape {
    type Error = ShapeError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Shape::from_rows(rows)
    }
}

impl From<Shape> for Vec<Vec<u8>> {
    fn from(shape: Shape) -> Self {
        shape.to_rows()
    }
}

/// Quarter-turn orientation, clockwise from the base shape.
///
/// Serialized as degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// All rotations in the order the arranger tries them.
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    pub fn quarter_turns(self) -> usize {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }

    pub fn degrees(self) -> u16 {
        self.quarter_turns() as u16 * 90
    }

    pub fn from_degrees(degrees: u16) -> Option<Rotation> {
        match degrees {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// One more quarter turn clockwise.
    pub fn next(self) -> Rotation {
        Rotation::ALL[(self.quarter_turns() + 1) % 4]
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        Rotation::from_degrees(degrees)
            .ok_or_else(|| format!("rotation must be 0, 90, 180 or 270 degrees, got {degrees}"))
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}
