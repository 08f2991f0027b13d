//! Procedural rainfall density field.
//!
//! Each column is tied to one month of the selected year; wetter months get
//! a larger intensity and a faster local clock, so their part of the grid
//! both reads denser and moves more energetically.

mod generator;

pub use generator::{column_intensity, FieldGenerator};

/// One grid position: glyph bucket plus the continuous density behind it
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldCell {
    /// Glyph class in [0, K-1], 0 = densest symbol
    pub glyph: u8,
    /// Normalized field value in [0, 1]
    pub density: f32,
}

/// Row-major grid of field cells (rows outer, cols inner)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grid {
    cols: usize,
    rows: usize,
    cells: Vec<FieldCell>,
}

impl Grid {
    pub(crate) fn from_cells(cols: usize, rows: usize, cells: Vec<FieldCell>) -> Self {
        debug_assert_eq!(cells.len(), cols * rows);
        Self { cols, rows, cells }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn get(&self, col: usize, row: usize) -> Option<&FieldCell> {
        if col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    pub fn cells(&self) -> &[FieldCell] {
        &self.cells
    }

    /// Iterate rows top to bottom
    pub fn rows_iter(&self) -> impl Iterator<Item = &[FieldCell]> {
        // chunks(0) panics; an empty grid has no rows either way
        self.cells.chunks(self.cols.max(1))
    }
}
