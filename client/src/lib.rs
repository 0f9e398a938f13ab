//! # Checkers Client Library
//!
//! Thin graphical client for the checkers server. It holds no authority:
//! every board it draws is the last snapshot the server sent, and every
//! move it makes is a request the server may refuse.
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! Runs the WebSocket connection on a background thread:
//! - Connects and sends JoinGame right away
//! - Forwards decoded server messages to the render loop
//! - Reports the disconnect reason when the socket closes
//!
//! ### Game Module (`game`)
//! The local view of the session:
//! - Seat, color and ids from GameStarted
//! - Board, turn and lifecycle from GameState snapshots
//! - Piece selection and move requests from clicks
//!
//! ### Input Module (`input`)
//! Maps window coordinates to board squares and back.
//!
//! ### Rendering Module (`rendering`)
//! Draws the board, pieces, King markers, selection, destination hints and
//! the status line.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::game::ClientGameState;
//! use client::network::Connection;
//!
//! let connection = Connection::spawn("ws://127.0.0.1:5001".to_string());
//! let mut state = ClientGameState::new();
//!
//! for event in connection.poll() {
//!     state.handle_event(event);
//! }
//! if let Some(request) = state.click(5, 0) {
//!     connection.send(request);
//! }
//! ```

pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
