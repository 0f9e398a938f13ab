//! Session registry and matchmaker
//!
//! Owns every game and every live connection. All mutations go through
//! `&mut self`, so the caller decides the locking; the network layer keeps
//! one registry behind a single mutex.
//!
//! Operations never perform I/O. They return the notifications they
//! produced as [`Delivery`] values, and the caller queues those before
//! releasing the lock so every player sees a game's updates in the order
//! they happened. Queueing never waits: a full or closed queue drops the
//! message, and nothing in here depends on a send succeeding.

use log::{debug, info, warn};
use shared::{GameId, Message, PieceColor, PlayerId};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::error::SessionError;
use crate::game::Game;

/// Outbound queue of one connected player
#[derive(Debug)]
pub struct Connection {
    pub sender: mpsc::Sender<Message>,
    pub connected_at: Instant,
}

/// A message addressed to one player, ready to be pushed
#[derive(Debug)]
pub struct Delivery {
    pub player_id: PlayerId,
    pub sender: mpsc::Sender<Message>,
    pub message: Message,
}

impl Delivery {
    /// Queues the message without waiting. Returns false if it was dropped.
    pub fn send(self) -> bool {
        let message_type = self.message.message_type();
        match self.sender.try_send(self.message) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("Outbound queue of player {} is full, dropping {}", self.player_id, message_type);
                false
            }
            Err(TrySendError::Closed(_)) => {
                warn!("Player {} is gone, dropping {}", self.player_id, message_type);
                false
            }
        }
    }
}

/// Pushes every delivery, returning how many were queued
pub fn deliver_all(deliveries: Vec<Delivery>) -> usize {
    deliveries.into_iter().map(Delivery::send).filter(|sent| *sent).count()
}

/// Result of a successful join
#[derive(Debug)]
pub struct Joined {
    pub game_id: GameId,
    pub color: PieceColor,
    pub deliveries: Vec<Delivery>,
}

pub struct SessionRegistry {
    games: HashMap<GameId, Game>,
    connections: HashMap<PlayerId, Connection>,
    next_player_id: PlayerId,
    next_game_id: GameId,
    max_connections: usize,
}

impl SessionRegistry {
    pub fn new(max_connections: usize) -> Self {
        Self {
            games: HashMap::new(),
            connections: HashMap::new(),
            next_player_id: 1,
            next_game_id: 1,
            max_connections,
        }
    }

    /// Registers a new connection and assigns it a fresh player id
    ///
    /// Returns None when the server is at capacity.
    pub fn connect(&mut self, sender: mpsc::Sender<Message>) -> Option<PlayerId> {
        if self.connections.len() >= self.max_connections {
            return None;
        }

        let id = self.next_player_id;
        self.next_player_id += 1;

        self.connections.insert(
            id,
            Connection {
                sender,
                connected_at: Instant::now(),
            },
        );
        info!("Player {} connected", id);

        Some(id)
    }

    fn delivery(&self, player_id: PlayerId, message: Message) -> Option<Delivery> {
        self.connections.get(&player_id).map(|connection| Delivery {
            player_id,
            sender: connection.sender.clone(),
            message,
        })
    }

    /// GameState snapshots for every connected participant
    fn snapshots(&self, game: &Game) -> Vec<Delivery> {
        game.participants()
            .filter_map(|id| self.delivery(id, game.snapshot_for(id)))
            .collect()
    }

    /// GameStarted followed by GameState for one participant
    fn seat_notice(&self, game: &Game, player_id: PlayerId) -> Vec<Delivery> {
        game.started_message_for(player_id)
            .into_iter()
            .chain(std::iter::once(game.snapshot_for(player_id)))
            .filter_map(|message| self.delivery(player_id, message))
            .collect()
    }

    /// Pairs the player into a waiting game or opens a new one
    pub fn join(&mut self, player_id: PlayerId) -> Result<Joined, SessionError> {
        if !self.connections.contains_key(&player_id) {
            return Err(SessionError::UnknownPlayer(player_id));
        }

        // Repeated JoinGame while still waiting: resend the seat
        if let Some(game) = self
            .games
            .values()
            .find(|game| game.is_open() && game.player1() == Some(player_id))
        {
            debug!("Player {} is already waiting in game {}", player_id, game.id);
            return Ok(Joined {
                game_id: game.id,
                color: PieceColor::White,
                deliveries: self.seat_notice(game, player_id),
            });
        }

        let open_game = self
            .games
            .values()
            .find(|game| game.is_open())
            .map(|game| game.id);

        if let Some(game_id) = open_game {
            let seated = self
                .games
                .get_mut(&game_id)
                .is_some_and(|game| game.seat_second(player_id));

            if let (true, Some(game)) = (seated, self.games.get(&game_id)) {
                info!("Player {} joined game {}", player_id, game_id);
                let deliveries = game
                    .participants()
                    .flat_map(|id| self.seat_notice(game, id))
                    .collect();

                return Ok(Joined {
                    game_id,
                    color: PieceColor::Black,
                    deliveries,
                });
            }
            warn!("Player {} could not be seated in game {}", player_id, game_id);
        }

        let game_id = self.next_game_id;
        self.next_game_id += 1;

        let mut game = Game::new(game_id);
        game.seat_first(player_id);
        info!("Game {} created by player {}", game_id, player_id);

        let deliveries = self.seat_notice(&game, player_id);
        self.games.insert(game_id, game);

        Ok(Joined {
            game_id,
            color: PieceColor::White,
            deliveries,
        })
    }

    /// Applies a move and returns the snapshots to push to both players
    pub fn try_make_move(
        &mut self,
        player_id: PlayerId,
        game_id: GameId,
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
    ) -> Result<Vec<Delivery>, SessionError> {
        let game = self
            .games
            .get_mut(&game_id)
            .ok_or(SessionError::GameNotFound(game_id))?;

        game.try_move(player_id, from_row, from_col, to_row, to_col)?;

        let game = &self.games[&game_id];
        Ok(self.snapshots(game))
    }

    /// Applies a move; a refusal becomes a failed MoveResult for the requester
    pub fn make_move(
        &mut self,
        player_id: PlayerId,
        game_id: GameId,
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
    ) -> Vec<Delivery> {
        match self.try_make_move(player_id, game_id, from_row, from_col, to_row, to_col) {
            Ok(deliveries) => deliveries,
            Err(error) => {
                info!("Move by player {} in game {} rejected: {}", player_id, game_id, error);

                let (current_player, game_state) = self
                    .games
                    .get(&game_id)
                    .map(|game| (Some(game.current_player()), Some(game.state())))
                    .unwrap_or((None, None));

                self.delivery(player_id, Message::rejection(error, current_player, game_state))
                    .into_iter()
                    .collect()
            }
        }
    }

    /// Drops the connection and finishes every game the player was in
    ///
    /// Returns Finished snapshots for the remaining participants.
    pub fn disconnect(&mut self, player_id: PlayerId) -> Vec<Delivery> {
        if let Some(connection) = self.connections.remove(&player_id) {
            info!(
                "Player {} disconnected after {:?}",
                player_id,
                connection.connected_at.elapsed()
            );
        }

        let mut affected = Vec::new();
        for game in self.games.values_mut() {
            if game.has_player(player_id) && !game.is_finished() {
                game.abandon(player_id);
                affected.push(game.id);
            }
        }

        affected
            .iter()
            .filter_map(|id| self.games.get(id))
            .flat_map(|game| self.snapshots(game))
            .collect()
    }

    /// Removes games that have been Finished for longer than `ttl`
    pub fn evict_finished(&mut self, ttl: Duration) -> usize {
        let before = self.games.len();
        self.games.retain(|_, game| !game.is_expired(ttl));

        let evicted = before - self.games.len();
        if evicted > 0 {
            info!("Evicted {} finished games", evicted);
        }
        evicted
    }

    pub fn game(&self, game_id: GameId) -> Option<&Game> {
        self.games.get(&game_id)
    }

    pub fn is_connected(&self, player_id: PlayerId) -> bool {
        self.connections.contains_key(&player_id)
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}
