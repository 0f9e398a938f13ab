//! WebSocket transport: one task per connection around a shared registry

use crate::registry::{deliver_all, SessionRegistry};
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use shared::{Message, PlayerId};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::Message as WsMessage;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Connections beyond this are closed right after the handshake
    pub max_players: usize,
    /// How long a Finished game stays queryable before eviction
    pub finished_ttl: Duration,
    pub sweep_interval: Duration,
    /// Per-connection outbound queue length
    pub outbound_queue: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_players: 256,
            finished_ttl: Duration::from_secs(300),
            sweep_interval: Duration::from_secs(30),
            outbound_queue: 64,
        }
    }
}

/// Checkers server accepting WebSocket clients
pub struct Server {
    listener: TcpListener,
    registry: Arc<Mutex<SessionRegistry>>,
    config: ServerConfig,
}

impl Server {
    pub async fn bind(addr: &str, config: ServerConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Server {
            listener,
            registry: Arc::new(Mutex::new(SessionRegistry::new(config.max_players))),
            config,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn registry(&self) -> Arc<Mutex<SessionRegistry>> {
        Arc::clone(&self.registry)
    }

    /// Spawns task that evicts long-finished games
    fn spawn_eviction_sweeper(&self) {
        let registry = Arc::clone(&self.registry);
        let ttl = self.config.finished_ttl;
        let mut interval = tokio::time::interval(self.config.sweep_interval);

        tokio::spawn(async move {
            loop {
                interval.tick().await;
                registry.lock().await.evict_finished(ttl);
            }
        });
    }

    /// Accept loop. Only returns if the task is cancelled.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.spawn_eviction_sweeper();
        info!("Server started successfully");

        loop {
            let (stream, addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    continue;
                }
            };

            let registry = Arc::clone(&self.registry);
            let queue = self.config.outbound_queue;
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, addr, registry, queue).await {
                    warn!("Connection from {} ended with error: {}", addr, e);
                }
            });
        }
    }
}

/// Serves one client from handshake to close
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    registry: Arc<Mutex<SessionRegistry>>,
    queue: usize,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let (mut sink, mut stream) = ws.split();

    let (tx, mut rx) = mpsc::channel::<Message>(queue);
    let assigned = registry.lock().await.connect(tx);
    let Some(player_id) = assigned else {
        warn!("Rejecting {}: server full", addr);
        sink.send(WsMessage::Close(None)).await?;
        return Ok(());
    };
    info!("Player {} connected from {}", player_id, addr);

    // Drains the outbound queue; ends when every sender is gone or a write fails
    let writer = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let text = match message.encode() {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to encode {} for player {}: {}", message.message_type(), player_id, e);
                    continue;
                }
            };

            if let Err(e) = sink.send(WsMessage::Text(text)).await {
                debug!("Write to player {} failed: {}", player_id, e);
                break;
            }
        }
        let _ = sink.close().await;
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => handle_text(&registry, player_id, &text).await,
            Ok(WsMessage::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("Error reading from player {}: {}", player_id, e);
                break;
            }
        }
    }

    // Finish the player's games before this task lets go of the connection
    handle_disconnect(&registry, player_id).await;
    info!("Player {} connection closed", player_id);

    writer.abort();
    Ok(())
}

/// Decodes one client message and routes it to the registry
async fn handle_text(registry: &Mutex<SessionRegistry>, player_id: PlayerId, text: &str) {
    let message = match Message::decode(text) {
        Ok(message) => message,
        Err(e) => {
            warn!("Discarding message from player {}: {}", player_id, e);
            return;
        }
    };

    // Deliveries are queued under the guard so a game's updates keep their order
    let mut registry = registry.lock().await;
    let deliveries = match message {
        Message::JoinGame { .. } => match registry.join(player_id) {
            Ok(joined) => joined.deliveries,
            Err(e) => {
                warn!("Join by player {} failed: {}", player_id, e);
                return;
            }
        },
        Message::MakeMove {
            game_id,
            from_row,
            from_col,
            to_row,
            to_col,
            ..
        } => registry.make_move(player_id, game_id, from_row, from_col, to_row, to_col),
        other => {
            warn!(
                "Discarding unexpected {} from player {}",
                other.message_type(),
                player_id
            );
            return;
        }
    };

    deliver_all(deliveries);
}

/// Finishes the player's games and tells the remaining participants
async fn handle_disconnect(registry: &Mutex<SessionRegistry>, player_id: PlayerId) {
    let mut registry = registry.lock().await;
    let deliveries = registry.disconnect(player_id);
    deliver_all(deliveries);
}
