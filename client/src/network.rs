//! Background connection to the server
//!
//! The render loop is synchronous from the network's point of view, so the
//! socket lives on its own thread with a small tokio runtime. Messages
//! cross over through channels in both directions.

use futures_util::{SinkExt, StreamExt};
use log::{error, info, warn};
use shared::Message;
use std::sync::mpsc as std_mpsc;
use std::thread;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;

#[derive(Debug)]
pub enum NetworkEvent {
    Connected,
    Received(Message),
    Disconnected(String),
}

pub struct Connection {
    outgoing: mpsc::UnboundedSender<Message>,
    incoming: std_mpsc::Receiver<NetworkEvent>,
}

impl Connection {
    /// Connects to `url` on a background thread and sends JoinGame
    pub fn spawn(url: String) -> Self {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = std_mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!("Failed to start network runtime: {}", e);
                    let _ = in_tx.send(NetworkEvent::Disconnected(e.to_string()));
                    return;
                }
            };

            let reason = match runtime.block_on(run(&url, out_rx, &in_tx)) {
                Ok(()) => "Connection closed".to_string(),
                Err(e) => e.to_string(),
            };
            info!("Disconnected from {}: {}", url, reason);
            let _ = in_tx.send(NetworkEvent::Disconnected(reason));
        });

        Connection {
            outgoing: out_tx,
            incoming: in_rx,
        }
    }

    /// Queues a message for the server. False once the connection is gone.
    pub fn send(&self, message: Message) -> bool {
        self.outgoing.send(message).is_ok()
    }

    /// Events received since the last call
    pub fn poll(&self) -> Vec<NetworkEvent> {
        self.incoming.try_iter().collect()
    }
}

async fn run(
    url: &str,
    mut outgoing: mpsc::UnboundedReceiver<Message>,
    events: &std_mpsc::Sender<NetworkEvent>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (ws, _) = tokio_tungstenite::connect_async(url).await?;
    info!("Connected to {}", url);
    let _ = events.send(NetworkEvent::Connected);

    let (mut sink, mut stream) = ws.split();
    sink.send(WsMessage::Text(Message::join().encode()?)).await?;

    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => match Message::decode(&text) {
                    Ok(message) => {
                        if events.send(NetworkEvent::Received(message)).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("Ignoring server message: {}", e),
                },
                Some(Ok(WsMessage::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
            },

            message = outgoing.recv() => match message {
                Some(message) => sink.send(WsMessage::Text(message.encode()?)).await?,
                None => {
                    let _ = sink.close().await;
                    break;
                }
            },
        }
    }

    Ok(())
}
