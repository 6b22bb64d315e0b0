//! Binary shape matrices and the clockwise rotation transform

/// A rectangular bounding box of filled/empty cells, stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl ShapeMatrix {
    /// Build a matrix from rows of 0/1 values
    ///
    /// Panics if the rows are empty or ragged.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        assert!(!rows.is_empty(), "shape must have at least one row");
        let cols = rows[0].len();
        assert!(cols > 0, "shape must have at least one column");

        let mut cells = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            assert_eq!(row.len(), cols, "shape rows must all have the same width");
            cells.extend(row.iter().map(|&v| v != 0));
        }

        Self {
            rows: rows.len(),
            cols,
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the cell at (row, col) is filled; out of range is empty
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }

    /// Offsets (col, row) of every filled cell, top-left origin
    pub fn filled_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, filled)| **filled)
            .map(|(idx, _)| ((idx % self.cols) as i32, (idx / self.cols) as i32))
    }

    /// Rotate 90 degrees clockwise, producing a new cols x rows matrix
    pub fn rotate_clockwise(&self) -> ShapeMatrix {
        let (n, m) = (self.rows, self.cols);
        let mut cells = vec![false; n * m];
        // rotated[j][n - 1 - i] = self[i][j]; rotated rows have width n
        for i in 0..n {
            for j in 0..m {
                cells[j * n + (n - 1 - i)] = self.cells[i * m + j];
            }
        }
        ShapeMatrix {
            rows: m,
            cols: n,
            cells,
        }
    }
}
