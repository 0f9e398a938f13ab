//! One checkers match and its turn state machine
//!
//! States only move forward: WaitingForPlayers -> InProgress -> Finished,
//! or straight to Finished when a participant leaves before the start.
//! Every legality check runs before the board is touched, so a refused
//! move leaves the game exactly as it was.

use log::{debug, info};
use shared::{Board, GameId, GameState, Message, PieceColor, PlayerId};
use std::time::{Duration, Instant};

use crate::error::MoveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Simple,
    Capture,
}

#[derive(Debug, Clone)]
pub struct Game {
    pub id: GameId,
    board: Board,
    current_player: PieceColor,
    state: GameState,
    /// Always plays White
    player1: Option<PlayerId>,
    /// Always plays Black
    player2: Option<PlayerId>,
    winner: Option<PieceColor>,
    finished_at: Option<Instant>,
}

impl Game {
    pub fn new(id: GameId) -> Self {
        Self::with_board(id, Board::new())
    }

    /// Creates a game around an arbitrary position
    pub fn with_board(id: GameId, board: Board) -> Self {
        Self {
            id,
            board,
            current_player: PieceColor::White,
            state: GameState::WaitingForPlayers,
            player1: None,
            player2: None,
            winner: None,
            finished_at: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> PieceColor {
        self.current_player
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn player1(&self) -> Option<PlayerId> {
        self.player1
    }

    pub fn player2(&self) -> Option<PlayerId> {
        self.player2
    }

    pub fn winner(&self) -> Option<PieceColor> {
        self.winner
    }

    pub fn is_finished(&self) -> bool {
        self.state == GameState::Finished
    }

    /// A game that waits for its second player
    pub fn is_open(&self) -> bool {
        self.state == GameState::WaitingForPlayers && self.player1.is_some() && self.player2.is_none()
    }

    pub fn participants(&self) -> impl Iterator<Item = PlayerId> {
        self.player1.into_iter().chain(self.player2)
    }

    pub fn has_player(&self, player_id: PlayerId) -> bool {
        self.participants().any(|id| id == player_id)
    }

    pub fn color_of(&self, player_id: PlayerId) -> Option<PieceColor> {
        if self.player1 == Some(player_id) {
            Some(PieceColor::White)
        } else if self.player2 == Some(player_id) {
            Some(PieceColor::Black)
        } else {
            None
        }
    }

    /// Seats the creator of the game as White
    pub fn seat_first(&mut self, player_id: PlayerId) {
        if self.state == GameState::WaitingForPlayers && self.player1.is_none() {
            self.player1 = Some(player_id);
        }
    }

    /// Seats the second player as Black and starts the game
    ///
    /// Returns false when the game is not open.
    pub fn seat_second(&mut self, player_id: PlayerId) -> bool {
        if !self.is_open() || self.player1 == Some(player_id) {
            return false;
        }

        self.player2 = Some(player_id);
        self.state = GameState::InProgress;
        info!("Game {} started", self.id);
        true
    }

    pub fn is_players_turn(&self, player_id: PlayerId) -> bool {
        self.state == GameState::InProgress && self.color_of(player_id) == Some(self.current_player)
    }

    /// Validates and applies a move, capture first
    pub fn try_move(
        &mut self,
        player_id: PlayerId,
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
    ) -> Result<MoveKind, MoveError> {
        if self.state != GameState::InProgress {
            return Err(MoveError::NotInProgress);
        }

        if !self.is_players_turn(player_id) {
            return Err(MoveError::NotYourTurn);
        }

        match self.board.piece_at(from_row, from_col) {
            None => {
                return Err(MoveError::NoPieceAtSource {
                    row: from_row,
                    col: from_col,
                })
            }
            Some(piece) if piece.color != self.current_player => {
                return Err(MoveError::WrongPieceColor {
                    row: from_row,
                    col: from_col,
                })
            }
            Some(_) => {}
        }

        let kind = if self.board.apply_capture(from_row, from_col, to_row, to_col).is_ok() {
            MoveKind::Capture
        } else if self.board.apply_move(from_row, from_col, to_row, to_col).is_ok() {
            MoveKind::Simple
        } else {
            return Err(MoveError::IllegalDestination {
                row: to_row,
                col: to_col,
            });
        };

        debug!(
            "Game {}: {:?} {:?} ({},{}) -> ({},{})",
            self.id, self.current_player, kind, from_row, from_col, to_row, to_col
        );

        self.current_player = self.current_player.opponent();
        self.evaluate_game_over();

        Ok(kind)
    }

    pub fn attempt_move(
        &mut self,
        player_id: PlayerId,
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
    ) -> bool {
        self.try_move(player_id, from_row, from_col, to_row, to_col).is_ok()
    }

    /// Ends the game when the side to move is stuck; the other side wins
    pub fn evaluate_game_over(&mut self) {
        if self.state == GameState::InProgress && !self.board.has_any_legal_move(self.current_player) {
            self.finish(Some(self.current_player.opponent()));
        }
    }

    /// Ends the game because `player_id` left
    ///
    /// A game already under way is awarded to the remaining player.
    pub fn abandon(&mut self, player_id: PlayerId) {
        if self.is_finished() {
            return;
        }

        let winner = match self.state {
            GameState::InProgress => self.color_of(player_id).map(PieceColor::opponent),
            _ => None,
        };
        self.finish(winner);
    }

    fn finish(&mut self, winner: Option<PieceColor>) {
        self.state = GameState::Finished;
        self.winner = winner;
        self.finished_at = Some(Instant::now());
        info!("Game {} finished, winner: {:?}", self.id, winner);
    }

    /// True once the game has been Finished for longer than `ttl`
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.finished_at.is_some_and(|at| at.elapsed() > ttl)
    }

    pub fn snapshot_for(&self, player_id: PlayerId) -> Message {
        Message::GameState {
            game_id: self.id,
            player_id,
            board_state: self.board.snapshot(),
            current_player: self.current_player,
            game_state: self.state,
            winner: self.winner,
        }
    }

    pub fn started_message_for(&self, player_id: PlayerId) -> Option<Message> {
        let your_color = self.color_of(player_id)?;
        Some(Message::GameStarted {
            game_id: self.id,
            player_id,
            player1_id: self.player1,
            player2_id: self.player2,
            your_color,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Piece;

    const WHITE: PlayerId = 1;
    const BLACK: PlayerId = 2;

    fn started(board: Board) -> Game {
        let mut game = Game::with_board(10, board);
        game.seat_first(WHITE);
        assert!(game.seat_second(BLACK));
        game
    }

    #[test]
    fn test_new_game_waits_for_players() {
        let game = Game::new(1);
        assert_eq!(game.state(), GameState::WaitingForPlayers);
        assert_eq!(game.current_player(), PieceColor::White);
        assert!(game.player1().is_none());
        assert!(!game.is_open());
    }

    #[test]
    fn test_seating_assigns_colors() {
        let mut game = Game::new(1);
        game.seat_first(WHITE);
        assert!(game.is_open());
        assert!(!game.seat_second(WHITE));

        assert!(game.seat_second(BLACK));
        assert_eq!(game.state(), GameState::InProgress);
        assert_eq!(game.color_of(WHITE), Some(PieceColor::White));
        assert_eq!(game.color_of(BLACK), Some(PieceColor::Black));
        assert_eq!(game.color_of(99), None);
        assert!(!game.seat_second(3));
    }

    #[test]
    fn test_moves_rejected_before_start() {
        let mut game = Game::new(1);
        game.seat_first(WHITE);
        assert_eq!(game.try_move(WHITE, 5, 0, 4, 1), Err(MoveError::NotInProgress));
    }

    #[test]
    fn test_simple_move_switches_turn() {
        let mut game = started(Board::new());

        assert_eq!(game.try_move(WHITE, 6, 1, 5, 0), Err(MoveError::IllegalDestination { row: 5, col: 0 }));
        assert_eq!(game.try_move(WHITE, 5, 0, 4, 1), Ok(MoveKind::Simple));
        assert_eq!(game.current_player(), PieceColor::Black);
        assert_eq!(game.state(), GameState::InProgress);
    }

    #[test]
    fn test_rejections_leave_game_untouched() {
        let mut game = started(Board::new());
        let board = game.board().clone();

        assert_eq!(game.try_move(BLACK, 2, 1, 3, 0), Err(MoveError::NotYourTurn));
        assert_eq!(game.try_move(WHITE, 4, 1, 3, 0), Err(MoveError::NoPieceAtSource { row: 4, col: 1 }));
        assert_eq!(game.try_move(WHITE, 2, 1, 3, 0), Err(MoveError::WrongPieceColor { row: 2, col: 1 }));
        assert_eq!(game.try_move(WHITE, 5, 0, 3, 0), Err(MoveError::IllegalDestination { row: 3, col: 0 }));
        assert_eq!(game.try_move(99, 5, 0, 4, 1), Err(MoveError::NotYourTurn));

        assert_eq!(game.board(), &board);
        assert_eq!(game.current_player(), PieceColor::White);
    }

    #[test]
    fn test_same_player_cannot_move_twice() {
        let mut game = started(Board::new());
        assert!(game.attempt_move(WHITE, 5, 0, 4, 1));
        assert!(!game.attempt_move(WHITE, 4, 1, 3, 2));
        assert!(game.attempt_move(BLACK, 2, 1, 3, 0));
    }

    #[test]
    fn test_capture_is_tried_first() {
        let mut board = Board::empty();
        board.place(Piece::new(PieceColor::White, 5, 2));
        board.place(Piece::new(PieceColor::Black, 4, 3));
        board.place(Piece::new(PieceColor::Black, 0, 1));
        let mut game = started(board);

        assert_eq!(game.try_move(WHITE, 5, 2, 3, 4), Ok(MoveKind::Capture));
        assert_eq!(game.board().piece_count(), 2);
        assert_eq!(game.current_player(), PieceColor::Black);
    }

    #[test]
    fn test_game_over_when_side_to_move_is_stuck() {
        let mut board = Board::empty();
        board.place(Piece::new(PieceColor::White, 5, 2));
        board.place(Piece::new(PieceColor::Black, 4, 3));
        let mut game = started(board);

        assert!(game.attempt_move(WHITE, 5, 2, 3, 4));
        assert_eq!(game.state(), GameState::Finished);
        assert_eq!(game.winner(), Some(PieceColor::White));
        assert!(game.finished_at.is_some());

        assert_eq!(game.try_move(BLACK, 3, 4, 2, 3), Err(MoveError::NotInProgress));
    }

    #[test]
    fn test_abandon_in_progress_awards_opponent() {
        let mut game = started(Board::new());
        game.abandon(BLACK);
        assert_eq!(game.state(), GameState::Finished);
        assert_eq!(game.winner(), Some(PieceColor::White));

        game.abandon(WHITE);
        assert_eq!(game.winner(), Some(PieceColor::White));
    }

    #[test]
    fn test_abandon_waiting_game_has_no_winner() {
        let mut game = Game::new(1);
        game.seat_first(WHITE);
        game.abandon(WHITE);
        assert!(game.is_finished());
        assert_eq!(game.winner(), None);
        assert!(!game.seat_second(BLACK));
    }

    #[test]
    fn test_expiry() {
        let mut game = started(Board::new());
        assert!(!game.is_expired(Duration::ZERO));

        game.abandon(WHITE);
        game.finished_at = Some(Instant::now() - Duration::from_secs(10));
        assert!(game.is_expired(Duration::from_secs(5)));
        assert!(!game.is_expired(Duration::from_secs(60)));
    }

    #[test]
    fn test_messages_for_participants() {
        let game = started(Board::new());

        match game.started_message_for(BLACK) {
            Some(Message::GameStarted {
                your_color,
                player1_id,
                player2_id,
                ..
            }) => {
                assert_eq!(your_color, PieceColor::Black);
                assert_eq!(player1_id, Some(WHITE));
                assert_eq!(player2_id, Some(BLACK));
            }
            other => panic!("Unexpected message: {:?}", other),
        }
        assert!(game.started_message_for(99).is_none());

        match game.snapshot_for(WHITE) {
            Message::GameState {
                player_id,
                game_state,
                current_player,
                ..
            } => {
                assert_eq!(player_id, WHITE);
                assert_eq!(game_state, GameState::InProgress);
                assert_eq!(current_player, PieceColor::White);
            }
            other => panic!("Unexpected message: {:?}", other),
        }
    }
}
