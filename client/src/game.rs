//! Local view of the game as last reported by the server

use log::{debug, warn};
use shared::{Board, GameId, GameState, Message, PieceColor, PlayerId};

use crate::network::NetworkEvent;

#[derive(Debug, Clone)]
pub struct ClientGameState {
    pub connected: bool,
    pub player_id: Option<PlayerId>,
    pub game_id: Option<GameId>,
    pub color: Option<PieceColor>,
    pub board: Option<Board>,
    pub current_player: PieceColor,
    pub state: Option<GameState>,
    pub winner: Option<PieceColor>,
    pub selected: Option<(i32, i32)>,
    /// Last notice worth showing, such as a rejected move
    pub notice: Option<String>,
}

impl Default for ClientGameState {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientGameState {
    pub fn new() -> Self {
        Self {
            connected: false,
            player_id: None,
            game_id: None,
            color: None,
            board: None,
            current_player: PieceColor::White,
            state: None,
            winner: None,
            selected: None,
            notice: None,
        }
    }

    pub fn handle_event(&mut self, event: NetworkEvent) {
        match event {
            NetworkEvent::Connected => {
                self.connected = true;
                self.notice = None;
            }
            NetworkEvent::Received(message) => self.apply(message),
            NetworkEvent::Disconnected(reason) => {
                self.connected = false;
                self.selected = None;
                self.notice = Some(reason);
            }
        }
    }

    /// Applies one server message
    pub fn apply(&mut self, message: Message) {
        match message {
            Message::GameStarted {
                game_id,
                player_id,
                your_color,
                ..
            } => {
                self.game_id = Some(game_id);
                self.player_id = Some(player_id);
                self.color = Some(your_color);
            }
            Message::GameState {
                game_id,
                board_state,
                current_player,
                game_state,
                winner,
                ..
            } => {
                if self.game_id.is_some_and(|id| id != game_id) {
                    debug!("Ignoring snapshot of game {}", game_id);
                    return;
                }
                self.board = Some(Board::from_state(&board_state));
                self.current_player = current_player;
                self.state = Some(game_state);
                self.winner = winner;
                self.notice = None;
                if game_state == GameState::Finished {
                    self.selected = None;
                }
            }
            Message::MoveResult {
                success: false,
                error_message,
                ..
            } => {
                self.notice = Some(error_message.unwrap_or_else(|| "Move rejected".to_string()));
            }
            Message::MoveResult { .. } => {}
            other => warn!("Unexpected {} from server", other.message_type()),
        }
    }

    pub fn is_my_turn(&self) -> bool {
        self.state == Some(GameState::InProgress) && self.color == Some(self.current_player)
    }

    fn owns_piece_at(&self, row: i32, col: i32) -> bool {
        match (&self.board, self.color) {
            (Some(board), Some(color)) => board.piece_at(row, col).is_some_and(|p| p.color == color),
            _ => false,
        }
    }

    /// Handles a click on a square
    ///
    /// The first click selects one of the player's pieces, a click on
    /// another own piece moves the selection, and any other click sends
    /// the move. Returns the message to send, if any.
    pub fn click(&mut self, row: i32, col: i32) -> Option<Message> {
        let game_id = self.game_id?;

        if !self.is_my_turn() {
            self.notice = Some("Not your turn".to_string());
            return None;
        }

        if self.owns_piece_at(row, col) {
            self.selected = Some((row, col));
            return None;
        }

        let (from_row, from_col) = self.selected.take()?;
        Some(Message::MakeMove {
            game_id,
            player_id: self.player_id,
            from_row,
            from_col,
            to_row: row,
            to_col: col,
        })
    }

    /// Destinations of the selected piece, computed with the shared rules
    pub fn hints(&self) -> Vec<(i32, i32)> {
        match (&self.board, self.selected) {
            (Some(board), Some((row, col))) => board.legal_destinations(row, col),
            _ => Vec::new(),
        }
    }

    pub fn status_line(&self) -> String {
        if let Some(notice) = &self.notice {
            return notice.clone();
        }
        if !self.connected {
            return "Connecting...".to_string();
        }

        match (self.state, self.color) {
            (None, _) | (_, None) => "Joining...".to_string(),
            (Some(GameState::WaitingForPlayers), Some(color)) => {
                format!("Playing {:?}, waiting for an opponent", color)
            }
            (Some(GameState::Finished), Some(color)) => match self.winner {
                Some(winner) if winner == color => "Game over: you win".to_string(),
                Some(_) => "Game over: you lose".to_string(),
                None => "Game over".to_string(),
            },
            (Some(GameState::InProgress), Some(_)) if self.is_my_turn() => "Your turn".to_string(),
            (Some(GameState::InProgress), Some(_)) => "Waiting for the opponent".to_string(),
        }
    }
}
