//! Single-piece movement geometry
//!
//! These rules know nothing about the rest of the board. Callers are
//! responsible for bounds and occupancy; a piece only answers whether a
//! destination is reachable by its own movement pattern.

use serde::{Deserialize, Serialize};

use crate::BOARD_SIZE;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceColor {
    Black,
    White,
}

impl PieceColor {
    pub fn opponent(self) -> Self {
        match self {
            PieceColor::Black => PieceColor::White,
            PieceColor::White => PieceColor::Black,
        }
    }

    /// Row on which a Normal piece of this color is promoted.
    pub fn promotion_row(self) -> i32 {
        match self {
            PieceColor::White => 0,
            PieceColor::Black => BOARD_SIZE as i32 - 1,
        }
    }

    /// Row delta sign of a forward step: White moves up, Black moves down.
    fn forward(self) -> i32 {
        match self {
            PieceColor::White => -1,
            PieceColor::Black => 1,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    Normal,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub color: PieceColor,
    pub kind: PieceKind,
    pub row: i32,
    pub col: i32,
}

impl Piece {
    pub fn new(color: PieceColor, row: i32, col: i32) -> Self {
        Self {
            color,
            kind: PieceKind::Normal,
            row,
            col,
        }
    }

    pub fn king(color: PieceColor, row: i32, col: i32) -> Self {
        Self {
            kind: PieceKind::King,
            ..Self::new(color, row, col)
        }
    }

    pub fn is_king(&self) -> bool {
        self.kind == PieceKind::King
    }

    /// Promotes a Normal piece. Kings stay Kings.
    pub fn promote(&mut self) {
        self.kind = PieceKind::King;
    }

    /// Checks the movement geometry of a step or jump to `(to_row, to_col)`
    ///
    /// A simple move covers exactly one diagonal square, a capture exactly
    /// two. Normal pieces only move toward the opponent's back rank; Kings
    /// may use any of the four diagonals.
    pub fn is_legal_move(&self, to_row: i32, to_col: i32, is_capture: bool) -> bool {
        let d_row = to_row - self.row;
        let d_col = to_col - self.col;

        if d_row.abs() != d_col.abs() {
            return false;
        }

        let distance = if is_capture { 2 } else { 1 };
        if d_row.abs() != distance {
            return false;
        }

        match self.kind {
            PieceKind::King => true,
            PieceKind::Normal => d_row.signum() == self.color.forward(),
        }
    }
}
