//! # Checkers Server Library
//!
//! Authoritative server for two-player checkers. Clients only ever see
//! snapshots of state that lives here; every move is checked against the
//! rules before it touches a board.
//!
//! ## Core Responsibilities
//!
//! ### Matchmaking
//! Arriving players are paired first-come, first-served. The first player
//! opens a game and plays White; the next one to join takes Black and the
//! game starts.
//!
//! ### Turn Enforcement
//! A game accepts a move only from the player whose color is to move, and
//! only when a piece of that color makes a legal capture or simple move.
//! After each accepted move the turn passes, and the game ends if the new
//! side to move has nothing legal to play.
//!
//! ### State Broadcasting
//! Every state change produces a full board snapshot for both participants.
//! Rejected moves are reported to the requester alone.
//!
//! ## Architecture Design
//!
//! ### One Lock, No I/O Under It
//! The [`registry::SessionRegistry`] holds all games and connections behind
//! a single mutex. Its operations return the notifications they produced,
//! and those are queued with a non-blocking send while the lock is still
//! held, which keeps per-game ordering. Socket writes happen in each
//! connection's writer task, so a slow client never stalls other sessions.
//!
//! ### Best-Effort Delivery
//! Each connection owns a bounded outbound queue drained by a writer task.
//! A full or closed queue drops the message; the registry never depends on
//! delivery.
//!
//! ### Disconnect Is Cancellation
//! When a connection closes, its task finishes every game the player was in
//! before exiting. The opponent receives a final Finished snapshot.
//!
//! ## Module Organization
//!
//! - `game`: one match, its turn state machine and snapshots
//! - `registry`: games, connections, pairing and disconnect handling
//! - `network`: WebSocket accept loop, per-connection tasks, eviction sweep
//! - `error`: move and session error types
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let server = Server::bind("127.0.0.1:5001", ServerConfig::default()).await?;
//!     server.run().await
//! }
//! ```

pub mod error;
pub mod game;
pub mod network;
pub mod registry;
