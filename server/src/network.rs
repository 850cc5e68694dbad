//! WebSocket accept loop and per-session handling.

use crate::game::World;
use crate::registry::ConnectionRegistry;
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use shared::ClientMessage;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, RwLock};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

/// Accepts connections forever, spawning one session task per client.
pub async fn run(
    listener: TcpListener,
    world: Arc<RwLock<World>>,
    registry: Arc<RwLock<ConnectionRegistry>>,
) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let world = Arc::clone(&world);
                let registry = Arc::clone(&registry);

                tokio::spawn(async move {
                    handle_connection(stream, addr, world, registry).await;
                });
            }
            Err(e) => {
                error!("Error accepting connection: {}", e);
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }
    }
}

/// Runs one session from handshake to cleanup.
///
/// The session registers itself, receives the one-time init message, then
/// decodes inbound commands until the peer closes or errors. Cleanup
/// unregisters exactly once; the writer task winds down on its own when the
/// last sender is dropped.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    world: Arc<RwLock<World>>,
    registry: Arc<RwLock<ConnectionRegistry>>,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake failed from {}: {}", addr, e);
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Writer task drains this session's outbound queue into the socket, so
    // broadcasts never wait on this peer's socket.
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if ws_sender.send(message).await.is_err() {
                break;
            }
        }
        let _ = ws_sender.close().await;
    });

    // Bootstrap message so the client can render before the first tick.
    // Queued ahead of registration so it always precedes the first update.
    let init = {
        let world = world.read().await;
        world.init_message()
    };
    match serde_json::to_string(&init) {
        Ok(payload) => {
            let _ = tx.send(Message::Text(payload));
        }
        Err(e) => error!("Failed to serialize init message: {}", e),
    }

    let session_id = {
        let mut registry = registry.write().await;
        registry.register(addr, tx.clone())
    };

    while let Some(message) = ws_receiver.next().await {
        match message {
            Ok(Message::Text(text)) => handle_command(&world, addr, &text).await,
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                // The peer going away mid-read is a normal way for a
                // session to end, not a server error.
                debug!("Connection error from {}: {}", addr, e);
                break;
            }
        }
    }

    let remaining = {
        let mut registry = registry.write().await;
        registry.unregister(session_id);
        registry.len()
    };
    info!("Connection from {} closed ({} remaining)", addr, remaining);
}

/// Decodes one inbound payload and applies it to the world.
///
/// Malformed payloads are logged and dropped without ending the session;
/// commands of an unrecognized kind are silently ignored.
pub async fn handle_command(world: &Arc<RwLock<World>>, addr: SocketAddr, text: &str) {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Move { direction }) => {
            let mut world = world.write().await;
            world.apply_move(direction);
        }
        Ok(ClientMessage::Unknown) => {}
        Err(e) => warn!("Malformed message from {}: {}", addr, e),
    }
}
