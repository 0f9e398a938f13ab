//! Wire protocol shared by server and client
//!
//! Every message is one JSON object carrying a `messageType` discriminator.
//! Decoding reads the discriminator first and then parses the remaining
//! fields into the matching variant; unknown discriminators are rejected.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::piece::{Piece, PieceColor, PieceKind};

pub type PlayerId = u32;
pub type GameId = u32;

/// Lifecycle of a game session
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    WaitingForPlayers,
    InProgress,
    Finished,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PieceState {
    #[serde(rename = "type")]
    pub kind: PieceKind,
    pub color: PieceColor,
    pub row: i32,
    pub column: i32,
}

impl From<&Piece> for PieceState {
    fn from(piece: &Piece) -> Self {
        Self {
            kind: piece.kind,
            color: piece.color,
            row: piece.row,
            column: piece.col,
        }
    }
}

/// Row-major 8x8 grid, `null` for empty cells
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub pieces: Vec<Vec<Option<PieceState>>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "messageType")]
pub enum Message {
    /// Client asks to be paired into a game
    #[serde(rename_all = "camelCase")]
    JoinGame {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        game_id: Option<GameId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        player_id: Option<PlayerId>,
    },

    /// Seat assignment sent to each participant
    #[serde(rename_all = "camelCase")]
    GameStarted {
        game_id: GameId,
        player_id: PlayerId,
        player1_id: Option<PlayerId>,
        player2_id: Option<PlayerId>,
        your_color: PieceColor,
    },

    /// Move request; the server trusts the connection, not `player_id`
    #[serde(rename_all = "camelCase")]
    MakeMove {
        game_id: GameId,
        #[serde(default)]
        player_id: Option<PlayerId>,
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
    },

    /// Full snapshot pushed after every state change
    #[serde(rename_all = "camelCase")]
    GameState {
        game_id: GameId,
        player_id: PlayerId,
        board_state: BoardState,
        current_player: PieceColor,
        game_state: GameState,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        winner: Option<PieceColor>,
    },

    #[serde(rename_all = "camelCase")]
    MoveResult {
        success: bool,
        #[serde(default)]
        error_message: Option<String>,
        #[serde(default)]
        board_state: Option<BoardState>,
        #[serde(default)]
        current_player: Option<PieceColor>,
        #[serde(default)]
        game_state: Option<GameState>,
    },
}

impl Message {
    pub fn join() -> Self {
        Message::JoinGame {
            game_id: None,
            player_id: None,
        }
    }

    pub fn rejection(error: impl ToString, current_player: Option<PieceColor>, game_state: Option<GameState>) -> Self {
        Message::MoveResult {
            success: false,
            error_message: Some(error.to_string()),
            board_state: None,
            current_player,
            game_state,
        }
    }

    pub fn message_type(&self) -> &'static str {
        match self {
            Message::JoinGame { .. } => "JoinGame",
            Message::GameStarted { .. } => "GameStarted",
            Message::MakeMove { .. } => "MakeMove",
            Message::GameState { .. } => "GameState",
            Message::MoveResult { .. } => "MoveResult",
        }
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }
}
