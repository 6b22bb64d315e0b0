//! Game board representation and collision detection

use crate::piece::Piece;
use crate::tetromino::TetrominoType;
use ratatui::style::Color;
use std::fmt;

/// Standard board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// A cell on the board - either empty or holding the type that locked there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(TetrominoType),
}

impl Cell {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    /// Stored identifier: 0 for empty, `type_id + 1` for filled
    pub fn id(&self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Filled(piece_type) => piece_type.cell_id(),
        }
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Filled(piece_type) => Some(piece_type.color()),
        }
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    /// Grid stored as [row][col], row 0 is the top, row increases downward
    rows: Vec<Vec<Cell>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT)
    }
}

impl Board {
    /// Create a new empty board
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "board dimensions must be non-zero, got {width}x{height}");
        Self {
            width,
            height,
            rows: vec![vec![Cell::Empty; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the cell at (x, y), None if out of bounds
    #[cfg(test)]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        self.rows.get(y as usize)?.get(x as usize).copied()
    }

    /// Set a cell at (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        match self.rows.get_mut(y as usize).and_then(|row| row.get_mut(x as usize)) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Whether (x, y) blocks a piece cell
    ///
    /// Walls and the floor block. Rows above the top edge never do, so a
    /// piece may hang partly above the visible area.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return true;
        }
        if y < 0 {
            return false;
        }
        self.rows[y as usize][x as usize].is_filled()
    }

    /// Whether any filled cell of the piece is blocked
    pub fn collides(&self, piece: &Piece) -> bool {
        piece.cells().any(|(x, y)| self.is_occupied(x, y))
    }

    /// Write the piece's cells into the grid
    ///
    /// Cells above the top edge are dropped.
    pub fn lock(&mut self, piece: &Piece) {
        let cell = Cell::Filled(piece.piece_type);
        for (x, y) in piece.cells() {
            if y >= 0 {
                self.set(x, y, cell);
            }
        }
    }

    /// Remove every full row and return how many were removed
    ///
    /// Scans bottom-up. After removing a row an empty one is inserted at the
    /// top and the same index is examined again, since the row above has
    /// shifted into it.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = self.height;
        while y > 0 {
            let row = y - 1;
            if self.is_row_full(row) {
                self.rows.remove(row);
                self.rows.insert(0, vec![Cell::Empty; self.width]);
                cleared += 1;
            } else {
                y -= 1;
            }
        }
        cleared
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .is_some_and(|cells| cells.iter().all(|cell| cell.is_filled()))
    }

    /// Check if the board is completely empty
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }

    /// Rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(|row| row.as_slice())
    }
}

/// One line per row of cell ids, `.` for empty
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in row {
                match cell.id() {
                    0 => write!(f, ".")?,
                    id => write!(f, "{}", id)?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fill_row(board: &mut Board, y: i32, piece_type: TetrominoType) {
        for x in 0..board.width() as i32 {
            board.set(x, y, Cell::Filled(piece_type));
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(10, 20);
        assert!(board.is_empty());
        assert_eq!(board.rows().count(), 20);
        assert!(board.rows().all(|row| row.len() == 10));
    }

    #[test]
    fn test_display_shows_cell_ids() {
        let mut board = Board::new(4, 2);
        board.set(0, 1, Cell::Filled(TetrominoType::I));
        board.set(3, 1, Cell::Filled(TetrominoType::L));
        assert_eq!(board.to_string(), "....\n1..7");
    }

    #[test]
    #[should_panic]
    fn test_zero_width_rejected() {
        let _ = Board::new(0, 20);
    }

    #[test]
    fn test_set_and_get() {
        let mut board = Board::default();
        assert!(board.set(5, 5, Cell::Filled(TetrominoType::Z)));
        assert_eq!(board.get(5, 5), Some(Cell::Filled(TetrominoType::Z)));
        assert_eq!(board.get(5, 5).map(|c| c.id()), Some(5));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut board = Board::default();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, -1), None);
        assert_eq!(board.get(BOARD_WIDTH as i32, 0), None);
        assert_eq!(board.get(0, BOARD_HEIGHT as i32), None);
        assert!(!board.set(0, BOARD_HEIGHT as i32, Cell::Filled(TetrominoType::I)));
    }

    #[test]
    fn test_is_occupied_bounds() {
        let mut board = Board::default();
        assert!(board.is_occupied(-1, 5));
        assert!(board.is_occupied(10, 5));
        assert!(board.is_occupied(3, 20));
        assert!(!board.is_occupied(3, -2));
        assert!(!board.is_occupied(3, 19));
        board.set(3, 19, Cell::Filled(TetrominoType::T));
        assert!(board.is_occupied(3, 19));
    }

    #[test]
    fn test_lock_skips_cells_above_top() {
        let mut board = Board::default();
        let piece = Piece::at(TetrominoType::T, 4, -1);
        board.lock(&piece);
        // Only the lower row of the T lands on the board
        assert_eq!(board.get(4, 0), Some(Cell::Filled(TetrominoType::T)));
        assert_eq!(board.get(5, 0), Some(Cell::Filled(TetrominoType::T)));
        assert_eq!(board.get(6, 0), Some(Cell::Filled(TetrominoType::T)));
        assert_eq!(board.rows().flatten().filter(|c| c.is_filled()).count(), 3);
    }

    #[test]
    fn test_collides_with_walls_and_stack() {
        let mut board = Board::default();
        assert!(!board.collides(&Piece::at(TetrominoType::O, 0, 0)));
        assert!(board.collides(&Piece::at(TetrominoType::O, -1, 0)));
        assert!(board.collides(&Piece::at(TetrominoType::O, 9, 0)));
        assert!(board.collides(&Piece::at(TetrominoType::O, 0, 19)));
        assert!(!board.collides(&Piece::at(TetrominoType::O, 0, -1)));

        board.set(1, 10, Cell::Filled(TetrominoType::S));
        assert!(board.collides(&Piece::at(TetrominoType::O, 0, 9)));
        assert!(!board.collides(&Piece::at(TetrominoType::O, 2, 9)));
    }

    #[test]
    fn test_clear_single_line() {
        let mut board = Board::default();
        fill_row(&mut board, 19, TetrominoType::I);
        board.set(0, 18, Cell::Filled(TetrominoType::J));

        let cleared = board.clear_full_rows();
        assert_eq!(cleared, 1);
        // The block from row 18 should now be on row 19
        assert_eq!(board.get(0, 19), Some(Cell::Filled(TetrominoType::J)));
        assert!(board.get(0, 18).unwrap().is_empty());
        assert!(board.rows().next().unwrap().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_clear_adjacent_rows() {
        let mut board = Board::default();
        fill_row(&mut board, 19, TetrominoType::I);
        fill_row(&mut board, 18, TetrominoType::O);
        board.set(2, 17, Cell::Filled(TetrominoType::L));
        fill_row(&mut board, 16, TetrominoType::S);
        board.set(7, 15, Cell::Filled(TetrominoType::Z));

        assert_eq!(board.clear_full_rows(), 3);
        assert_eq!(board.get(2, 19), Some(Cell::Filled(TetrominoType::L)));
        assert_eq!(board.get(7, 18), Some(Cell::Filled(TetrominoType::Z)));
        assert_eq!(board.rows().flatten().filter(|c| c.is_filled()).count(), 2);
    }

    #[test]
    fn test_clear_with_nothing_full() {
        let mut board = Board::default();
        board.set(0, 19, Cell::Filled(TetrominoType::I));
        let before = board.clone();
        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board, before);
    }

    fn arb_board() -> impl Strategy<Value = Board> {
        // Rows are either full or have a deliberate hole
        proptest::collection::vec((any::<bool>(), 0usize..6, 1u8..8), 8).prop_map(|layout| {
            let mut board = Board::new(6, 8);
            for (y, (full, hole, id)) in layout.into_iter().enumerate() {
                let piece_type = TetrominoType::from_cell_id(id).unwrap();
                for x in 0..6 {
                    if full || x != hole {
                        board.set(x as i32, y as i32, Cell::Filled(piece_type));
                    }
                }
            }
            board
        })
    }

    proptest! {
        #[test]
        fn cleared_board_has_no_full_rows_and_keeps_order(board in arb_board()) {
            let survivors: Vec<Vec<Cell>> = board
                .rows()
                .filter(|row| !row.iter().all(|c| c.is_filled()))
                .map(|row| row.to_vec())
                .collect();

            let mut cleared = board.clone();
            let count = cleared.clear_full_rows();

            prop_assert_eq!(count, board.height() - survivors.len());
            prop_assert_eq!(cleared.rows().count(), board.height());
            prop_assert!((0..cleared.height()).all(|y| !cleared.is_row_full(y)));

            let bottom: Vec<Vec<Cell>> = cleared.rows().skip(count).map(|row| row.to_vec()).collect();
            prop_assert_eq!(bottom, survivors);
            prop_assert!(cleared.rows().take(count).all(|row| row.iter().all(|c| c.is_empty())));
        }
    }
}
