use shared::{GameId, PlayerId};
use thiserror::Error;

/// Why a move request was refused by a game
///
/// The display text is what the requesting player sees.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("Game is not in progress")]
    NotInProgress,
    #[error("Not your turn")]
    NotYourTurn,
    #[error("No piece at ({row},{col})")]
    NoPieceAtSource { row: i32, col: i32 },
    #[error("Piece at ({row},{col}) is not yours")]
    WrongPieceColor { row: i32, col: i32 },
    #[error("Invalid move to ({row},{col})")]
    IllegalDestination { row: i32, col: i32 },
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("Game not found")]
    GameNotFound(GameId),
    #[error("Player {0} is not connected")]
    UnknownPlayer(PlayerId),
    #[error(transparent)]
    Move(#[from] MoveError),
}
