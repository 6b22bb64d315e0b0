//! Active falling piece

use crate::shape::ShapeMatrix;
use crate::tetromino::TetrominoType;
use ratatui::style::Color;

/// A live, positioned, oriented piece
///
/// Movement never mutates a piece in place: `shifted` and `rotated` build a
/// candidate that the caller commits only once it is known not to collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// The type of tetromino
    pub piece_type: TetrominoType,
    /// Current orientation
    pub shape: ShapeMatrix,
    /// Top-left corner of the bounding box, in board cells.
    /// Column increases rightward, row increases downward.
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// Create a piece at the spawn position: horizontally centered, row 0
    pub fn spawn(piece_type: TetrominoType, board_width: usize) -> Self {
        let shape = piece_type.shape();
        let x = (board_width / 2) as i32 - (shape.cols() / 2) as i32;
        Self {
            piece_type,
            shape,
            x,
            y: 0,
        }
    }

    /// Place a piece at an explicit origin in spawn orientation
    #[cfg(test)]
    pub fn at(piece_type: TetrominoType, x: i32, y: i32) -> Self {
        Self {
            piece_type,
            shape: piece_type.shape(),
            x,
            y,
        }
    }

    pub fn color(&self) -> Color {
        self.piece_type.color()
    }

    /// A copy of this piece with the origin moved by (dx, dy)
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }

    /// A copy of this piece turned clockwise about the same origin
    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotate_clockwise(),
            ..self.clone()
        }
    }

    /// Absolute (x, y) board coordinates of every filled cell
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled_cells()
            .map(|(dx, dy)| (self.x + dx, self.y + dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_position_is_centered() {
        assert_eq!(Piece::spawn(TetrominoType::O, 10).x, 4);
        assert_eq!(Piece::spawn(TetrominoType::I, 10).x, 3);
        assert_eq!(Piece::spawn(TetrominoType::T, 10).x, 4);
        assert_eq!(Piece::spawn(TetrominoType::T, 10).y, 0);
    }

    #[test]
    fn test_shifted_leaves_original() {
        let piece = Piece::spawn(TetrominoType::T, 10);
        let moved = piece.shifted(-1, 2);
        assert_eq!((piece.x, piece.y), (4, 0));
        assert_eq!((moved.x, moved.y), (3, 2));
        assert_eq!(moved.shape, piece.shape);
    }

    #[test]
    fn test_rotated_keeps_origin() {
        let piece = Piece::at(TetrominoType::I, 3, 5);
        let turned = piece.rotated();
        assert_eq!((turned.x, turned.y), (3, 5));
        let cells: Vec<_> = turned.cells().collect();
        assert_eq!(cells, vec![(3, 5), (3, 6), (3, 7), (3, 8)]);
    }

    #[test]
    fn test_cells_are_absolute() {
        let piece = Piece::at(TetrominoType::O, 4, 18);
        let cells: Vec<_> = piece.cells().collect();
        assert_eq!(cells, vec![(4, 18), (5, 18), (4, 19), (5, 19)]);
    }
}
