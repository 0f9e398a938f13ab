//! Checkers rules and wire protocol shared by the server and the client
//!
//! The server is the only authority on game state. The client links these
//! rules too, but only to highlight destinations before it asks the server.

pub mod board;
pub mod error;
pub mod piece;
pub mod protocol;

pub const BOARD_SIZE: usize = 8;

pub use board::Board;
pub use error::{ProtocolError, RulesError};
pub use piece::{Piece, PieceColor, PieceKind};
pub use protocol::{BoardState, GameId, GameState, Message, PieceState, PlayerId};
