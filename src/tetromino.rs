//! Tetromino catalog
//!
//! The 7 standard tetrominoes with their spawn shapes and display colors.
//! Catalog order (I, O, T, S, Z, J, L) doubles as the type id.

use crate::shape::ShapeMatrix;
use ratatui::style::Color;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I, // Red - long bar
    O, // Green - square
    T, // Blue - T-shape
    S, // Yellow - S-shape
    Z, // Magenta - Z-shape
    J, // Cyan - J-shape
    L, // Orange - L-shape
}

impl TetrominoType {
    /// Get the color for this tetromino
    pub fn color(&self) -> Color {
        match self {
            TetrominoType::I => Color::Red,
            TetrominoType::O => Color::Green,
            TetrominoType::T => Color::Blue,
            TetrominoType::S => Color::Yellow,
            TetrominoType::Z => Color::Magenta,
            TetrominoType::J => Color::Cyan,
            TetrominoType::L => Color::Rgb(255, 165, 0), // Orange
        }
    }

    /// All tetromino types in catalog order
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::O,
            TetrominoType::T,
            TetrominoType::S,
            TetrominoType::Z,
            TetrominoType::J,
            TetrominoType::L,
        ]
    }

    /// Zero-based position in the catalog
    pub fn type_id(&self) -> u8 {
        match self {
            TetrominoType::I => 0,
            TetrominoType::O => 1,
            TetrominoType::T => 2,
            TetrominoType::S => 3,
            TetrominoType::Z => 4,
            TetrominoType::J => 5,
            TetrominoType::L => 6,
        }
    }

    /// Value written into a board cell when this piece locks (1..=7)
    pub fn cell_id(&self) -> u8 {
        self.type_id() + 1
    }

    /// Recover a type from a board cell value
    #[cfg(test)]
    pub fn from_cell_id(id: u8) -> Option<TetrominoType> {
        match id {
            1..=7 => Some(Self::all()[(id - 1) as usize]),
            _ => None,
        }
    }

    /// Single-letter name, used in logs
    pub fn letter(&self) -> char {
        match self {
            TetrominoType::I => 'I',
            TetrominoType::O => 'O',
            TetrominoType::T => 'T',
            TetrominoType::S => 'S',
            TetrominoType::Z => 'Z',
            TetrominoType::J => 'J',
            TetrominoType::L => 'L',
        }
    }

    /// The spawn orientation of this tetromino
    pub fn shape(&self) -> ShapeMatrix {
        match self {
            TetrominoType::I => ShapeMatrix::from_rows(&[&[1, 1, 1, 1]]),
            TetrominoType::O => ShapeMatrix::from_rows(&[&[1, 1], &[1, 1]]),
            TetrominoType::T => ShapeMatrix::from_rows(&[&[0, 1, 0], &[1, 1, 1]]),
            TetrominoType::S => ShapeMatrix::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
            TetrominoType::Z => ShapeMatrix::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
            TetrominoType::J => ShapeMatrix::from_rows(&[&[1, 0, 0], &[1, 1, 1]]),
            TetrominoType::L => ShapeMatrix::from_rows(&[&[0, 0, 1], &[1, 1, 1]]),
        }
    }
}

/// Every catalog shape with its color, in catalog order
pub fn all_shapes() -> Vec<(ShapeMatrix, Color)> {
    TetrominoType::all()
        .iter()
        .map(|t| (t.shape(), t.color()))
        .collect()
}
