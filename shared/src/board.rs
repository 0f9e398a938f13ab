//! The 8x8 checkers grid and every rule that needs more than one square
//!
//! Each cell exclusively owns its piece value. A piece's stored row and
//! column are rewritten on every relocation so they always match its cell.

use crate::error::RulesError;
use crate::piece::{Piece, PieceColor};
use crate::protocol::{BoardState, PieceState};
use crate::BOARD_SIZE;

/// Number of rows each side fills at the start of a game
const STARTING_ROWS: i32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates a board in the standard starting layout
    ///
    /// Black fills the three rows nearest row 0 and White the three rows
    /// nearest row 7, on dark squares only (`(row + col)` odd).
    pub fn new() -> Self {
        let mut board = Self::empty();
        let size = BOARD_SIZE as i32;

        for row in 0..size {
            let color = if row < STARTING_ROWS {
                PieceColor::Black
            } else if row >= size - STARTING_ROWS {
                PieceColor::White
            } else {
                continue;
            };

            for col in 0..size {
                if (row + col) % 2 == 1 {
                    board.place(Piece::new(color, row, col));
                }
            }
        }

        board
    }

    pub fn empty() -> Self {
        Self {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Rebuilds a board from a wire snapshot. Pieces take the coordinates
    /// of the cell they sit in, not the ones they report.
    pub fn from_state(state: &BoardState) -> Self {
        let mut board = Self::empty();
        for (row, cells) in state.pieces.iter().enumerate().take(BOARD_SIZE) {
            for (col, cell) in cells.iter().enumerate().take(BOARD_SIZE) {
                if let Some(piece) = cell {
                    let mut restored = Piece::new(piece.color, row as i32, col as i32);
                    restored.kind = piece.kind;
                    board.place(restored);
                }
            }
        }
        board
    }

    pub fn in_bounds(row: i32, col: i32) -> bool {
        let size = BOARD_SIZE as i32;
        (0..size).contains(&row) && (0..size).contains(&col)
    }

    /// Puts a piece on the cell named by its own coordinates, replacing
    /// whatever was there. Out-of-range pieces are ignored.
    pub fn place(&mut self, piece: Piece) {
        if Self::in_bounds(piece.row, piece.col) {
            self.cells[piece.row as usize][piece.col as usize] = Some(piece);
        }
    }

    pub fn piece_at(&self, row: i32, col: i32) -> Option<&Piece> {
        if Self::in_bounds(row, col) {
            self.cells[row as usize][col as usize].as_ref()
        } else {
            None
        }
    }

    fn take(&mut self, row: i32, col: i32) -> Option<Piece> {
        if Self::in_bounds(row, col) {
            self.cells[row as usize][col as usize].take()
        } else {
            None
        }
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.cells.iter().flatten().flatten()
    }

    pub fn piece_count(&self) -> usize {
        self.pieces().count()
    }

    pub fn count_of(&self, color: PieceColor) -> usize {
        self.pieces().filter(|p| p.color == color).count()
    }

    /// Source piece of a move whose destination is on-board and empty
    fn movable_piece(&self, from_row: i32, from_col: i32, to_row: i32, to_col: i32) -> Option<&Piece> {
        if !Self::in_bounds(to_row, to_col) || self.piece_at(to_row, to_col).is_some() {
            return None;
        }
        self.piece_at(from_row, from_col)
    }

    pub fn is_legal_simple_move(&self, from_row: i32, from_col: i32, to_row: i32, to_col: i32) -> bool {
        self.movable_piece(from_row, from_col, to_row, to_col)
            .is_some_and(|piece| piece.is_legal_move(to_row, to_col, false))
    }

    pub fn is_legal_capture(&self, from_row: i32, from_col: i32, to_row: i32, to_col: i32) -> bool {
        let Some(piece) = self.movable_piece(from_row, from_col, to_row, to_col) else {
            return false;
        };

        let jumped = self.piece_at((from_row + to_row) / 2, (from_col + to_col) / 2);
        match jumped {
            Some(victim) if victim.color != piece.color => piece.is_legal_move(to_row, to_col, true),
            _ => false,
        }
    }

    /// Relocates the moving piece and promotes it on its back rank
    fn relocate(&mut self, from_row: i32, from_col: i32, to_row: i32, to_col: i32) {
        if let Some(mut piece) = self.take(from_row, from_col) {
            piece.row = to_row;
            piece.col = to_col;
            if to_row == piece.color.promotion_row() {
                piece.promote();
            }
            self.place(piece);
        }
    }

    pub fn apply_move(
        &mut self,
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
    ) -> Result<(), RulesError> {
        if !self.is_legal_simple_move(from_row, from_col, to_row, to_col) {
            return Err(RulesError::InvalidMove {
                from_row,
                from_col,
                to_row,
                to_col,
            });
        }

        self.relocate(from_row, from_col, to_row, to_col);
        Ok(())
    }

    /// Jumps over an opposing piece and removes it
    ///
    /// Returns the captured piece.
    pub fn apply_capture(
        &mut self,
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
    ) -> Result<Piece, RulesError> {
        let captured = if self.is_legal_capture(from_row, from_col, to_row, to_col) {
            self.take((from_row + to_row) / 2, (from_col + to_col) / 2)
        } else {
            None
        };

        let Some(captured) = captured else {
            return Err(RulesError::InvalidCapture {
                from_row,
                from_col,
                to_row,
                to_col,
            });
        };

        self.relocate(from_row, from_col, to_row, to_col);
        Ok(captured)
    }

    /// Every cell reachable from `(row, col)` by a simple move or a capture
    ///
    /// Scans the whole grid rather than walking diagonals; at 64 cells the
    /// brute force is cheap and mirrors the legality checks exactly.
    pub fn legal_destinations(&self, row: i32, col: i32) -> Vec<(i32, i32)> {
        let mut destinations = Vec::new();
        if self.piece_at(row, col).is_none() {
            return destinations;
        }

        let size = BOARD_SIZE as i32;
        for to_row in 0..size {
            for to_col in 0..size {
                if self.is_legal_simple_move(row, col, to_row, to_col)
                    || self.is_legal_capture(row, col, to_row, to_col)
                {
                    destinations.push((to_row, to_col));
                }
            }
        }

        destinations
    }

    pub fn has_any_legal_move(&self, color: PieceColor) -> bool {
        self.pieces()
            .filter(|piece| piece.color == color)
            .any(|piece| !self.legal_destinations(piece.row, piece.col).is_empty())
    }

    /// Serializable view of the grid, row-major, `None` for empty cells
    pub fn snapshot(&self) -> BoardState {
        let pieces = self
            .cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.as_ref().map(PieceState::from)).collect())
            .collect();

        BoardState { pieces }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceKind;

    fn board_with(pieces: &[Piece]) -> Board {
        let mut board = Board::empty();
        for piece in pieces {
            board.place(*piece);
        }
        board
    }

    #[test]
    fn test_starting_layout() {
        let board = Board::new();

        assert_eq!(board.piece_count(), 24);
        assert_eq!(board.count_of(PieceColor::Black), 12);
        assert_eq!(board.count_of(PieceColor::White), 12);

        for piece in board.pieces() {
            assert_eq!((piece.row + piece.col) % 2, 1);
            match piece.color {
                PieceColor::Black => assert!(piece.row < 3),
                PieceColor::White => assert!(piece.row > 4),
            }
        }
    }

    #[test]
    fn test_piece_coordinates_match_cells() {
        let board = Board::new();
        for row in 0..8 {
            for col in 0..8 {
                if let Some(piece) = board.piece_at(row, col) {
                    assert_eq!((piece.row, piece.col), (row, col));
                }
            }
        }
    }

    #[test]
    fn test_piece_at_out_of_range() {
        let board = Board::new();
        assert!(board.piece_at(-1, 0).is_none());
        assert!(board.piece_at(0, 8).is_none());
        assert!(board.piece_at(8, 8).is_none());
    }

    #[test]
    fn test_simple_move_from_start() {
        let board = Board::new();

        assert!(board.is_legal_simple_move(5, 0, 4, 1));
        assert!(!board.is_legal_simple_move(6, 1, 5, 0)); // occupied
        assert!(!board.is_legal_simple_move(4, 1, 3, 2)); // no piece
        assert!(!board.is_legal_simple_move(5, 0, 4, -1)); // off board
        assert!(board.is_legal_simple_move(2, 1, 3, 0));
        assert!(!board.is_legal_simple_move(2, 1, 1, 0));
    }

    #[test]
    fn test_normal_white_never_moves_backwards() {
        let board = board_with(&[Piece::new(PieceColor::White, 4, 3)]);

        assert!(board.is_legal_simple_move(4, 3, 3, 2));
        assert!(board.is_legal_simple_move(4, 3, 3, 4));
        assert!(!board.is_legal_simple_move(4, 3, 5, 2));
        assert!(!board.is_legal_simple_move(4, 3, 5, 4));
    }

    #[test]
    fn test_king_steps_in_four_directions() {
        let board = board_with(&[Piece::king(PieceColor::Black, 3, 3)]);
        let mut destinations = board.legal_destinations(3, 3);
        destinations.sort();
        assert_eq!(destinations, vec![(2, 2), (2, 4), (4, 2), (4, 4)]);
    }

    #[test]
    fn test_capture_requires_opposing_midpoint() {
        let board = board_with(&[
            Piece::new(PieceColor::White, 5, 2),
            Piece::new(PieceColor::Black, 4, 3),
            Piece::new(PieceColor::White, 4, 1),
        ]);

        assert!(board.is_legal_capture(5, 2, 3, 4));
        assert!(!board.is_legal_capture(5, 2, 3, 0)); // own piece in between
        assert!(!board.is_legal_capture(5, 2, 4, 3)); // distance 1
    }

    #[test]
    fn test_capture_requires_empty_midpoint_piece() {
        let board = board_with(&[Piece::new(PieceColor::White, 5, 2)]);
        assert!(!board.is_legal_capture(5, 2, 3, 4));
    }

    #[test]
    fn test_capture_blocked_destination() {
        let board = board_with(&[
            Piece::new(PieceColor::White, 5, 2),
            Piece::new(PieceColor::Black, 4, 3),
            Piece::new(PieceColor::Black, 3, 4),
        ]);
        assert!(!board.is_legal_capture(5, 2, 3, 4));
    }

    #[test]
    fn test_normal_piece_cannot_capture_backwards() {
        let board = board_with(&[
            Piece::new(PieceColor::White, 3, 2),
            Piece::new(PieceColor::Black, 4, 3),
        ]);
        assert!(!board.is_legal_capture(3, 2, 5, 4));

        let board = board_with(&[
            Piece::king(PieceColor::White, 3, 2),
            Piece::new(PieceColor::Black, 4, 3),
        ]);
        assert!(board.is_legal_capture(3, 2, 5, 4));
    }

    #[test]
    fn test_apply_move_updates_coordinates() {
        let mut board = Board::new();
        board.apply_move(5, 0, 4, 1).unwrap();

        assert!(board.piece_at(5, 0).is_none());
        let piece = board.piece_at(4, 1).unwrap();
        assert_eq!((piece.row, piece.col), (4, 1));
        assert_eq!(piece.color, PieceColor::White);
    }

    #[test]
    fn test_apply_move_rejects_illegal() {
        let mut board = Board::new();
        let before = board.clone();

        let err = board.apply_move(5, 0, 3, 2).unwrap_err();
        assert!(matches!(err, RulesError::InvalidMove { .. }));
        assert_eq!(board, before);
    }

    #[test]
    fn test_apply_capture_removes_exactly_midpoint() {
        let mut board = board_with(&[
            Piece::new(PieceColor::White, 5, 2),
            Piece::new(PieceColor::Black, 4, 3),
            Piece::new(PieceColor::Black, 0, 1),
        ]);

        let captured = board.apply_capture(5, 2, 3, 4).unwrap();

        assert_eq!(captured.color, PieceColor::Black);
        assert_eq!((captured.row, captured.col), (4, 3));
        assert_eq!(board.piece_count(), 2);
        assert!(board.piece_at(4, 3).is_none());
        assert!(board.piece_at(5, 2).is_none());
        assert_eq!(board.piece_at(3, 4).unwrap().row, 3);
        assert!(board.piece_at(0, 1).is_some());
    }

    #[test]
    fn test_apply_capture_rejects_illegal() {
        let mut board = Board::new();
        let err = board.apply_capture(5, 0, 3, 2).unwrap_err();
        assert!(matches!(err, RulesError::InvalidCapture { .. }));
        assert_eq!(board.piece_count(), 24);
    }

    #[test]
    fn test_promotion_on_move() {
        let mut board = board_with(&[
            Piece::new(PieceColor::White, 1, 2),
            Piece::new(PieceColor::Black, 6, 3),
        ]);

        board.apply_move(1, 2, 0, 1).unwrap();
        board.apply_move(6, 3, 7, 4).unwrap();

        assert_eq!(board.piece_at(0, 1).unwrap().kind, PieceKind::King);
        assert_eq!(board.piece_at(7, 4).unwrap().kind, PieceKind::King);
    }

    #[test]
    fn test_promotion_on_capture() {
        let mut board = board_with(&[
            Piece::new(PieceColor::White, 2, 3),
            Piece::new(PieceColor::Black, 1, 2),
        ]);

        board.apply_capture(2, 3, 0, 1).unwrap();
        assert!(board.piece_at(0, 1).unwrap().is_king());
    }

    #[test]
    fn test_king_reentering_back_rank_stays_king() {
        let mut board = board_with(&[Piece::king(PieceColor::White, 1, 2)]);

        board.apply_move(1, 2, 0, 3).unwrap();
        board.apply_move(0, 3, 1, 4).unwrap();
        board.apply_move(1, 4, 0, 5).unwrap();

        assert_eq!(board.piece_at(0, 5).unwrap().kind, PieceKind::King);
    }

    #[test]
    fn test_legal_destinations_include_captures() {
        let board = board_with(&[
            Piece::new(PieceColor::White, 5, 2),
            Piece::new(PieceColor::Black, 4, 3),
        ]);

        let mut destinations = board.legal_destinations(5, 2);
        destinations.sort();
        assert_eq!(destinations, vec![(3, 4), (4, 1)]);
        assert!(board.legal_destinations(3, 3).is_empty());
    }

    // Forced capture is not enforced: a simple move stays
    // legal while a capture is available.
    #[test]
    fn test_simple_move_allowed_when_capture_exists() {
        let mut board = board_with(&[
            Piece::new(PieceColor::White, 5, 2),
            Piece::new(PieceColor::Black, 4, 3),
        ]);

        assert!(board.is_legal_capture(5, 2, 3, 4));
        assert!(board.apply_move(5, 2, 4, 1).is_ok());
    }

    #[test]
    fn test_has_any_legal_move() {
        assert!(Board::new().has_any_legal_move(PieceColor::White));
        assert!(Board::new().has_any_legal_move(PieceColor::Black));

        // Black piece pinned against the bottom edge with nowhere to go
        let board = board_with(&[
            Piece::new(PieceColor::Black, 7, 0),
            Piece::new(PieceColor::White, 6, 1),
        ]);
        assert!(!board.has_any_legal_move(PieceColor::Black));
        assert!(board.has_any_legal_move(PieceColor::White));

        assert!(!Board::empty().has_any_legal_move(PieceColor::White));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut board = Board::new();
        board.apply_move(5, 0, 4, 1).unwrap();
        board.place(Piece::king(PieceColor::Black, 3, 4));

        let state = board.snapshot();
        assert_eq!(state.pieces.len(), 8);
        assert!(state.pieces.iter().all(|row| row.len() == 8));

        let cell = state.pieces[4][1].as_ref().unwrap();
        assert_eq!((cell.row, cell.column), (4, 1));
        assert!(state.pieces[5][0].is_none());

        assert_eq!(Board::from_state(&state), board);
    }
}
