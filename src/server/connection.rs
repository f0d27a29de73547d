//! Per-observer WebSocket connection
//!
//! A connection runs two halves until either ends: the writer drains the
//! subscriber queue into the socket and sends keep-alive pings, the reader
//! feeds control messages to the coordinator and enforces the idle timeout.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tokio_tungstenite::tungstenite::{Message, Utf8Bytes};
use tokio_tungstenite::WebSocketStream;

use crate::coordinator::BroadcastCoordinator;
use crate::error::Result;
use crate::registry::Payload;
use crate::server::config::ServerConfig;

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;
type WsSource = SplitStream<WebSocketStream<TcpStream>>;

/// One accepted observer
pub struct Connection {
    session_id: u64,
    peer_addr: SocketAddr,
    config: ServerConfig,
    coordinator: Arc<BroadcastCoordinator>,
}

impl Connection {
    pub fn new(
        session_id: u64,
        peer_addr: SocketAddr,
        config: ServerConfig,
        coordinator: Arc<BroadcastCoordinator>,
    ) -> Self {
        Self {
            session_id,
            peer_addr,
            config,
            coordinator,
        }
    }

    /// Perform the WebSocket handshake and serve until the peer goes away
    pub async fn run(&self, socket: TcpStream) -> Result<()> {
        let ws = tokio_tungstenite::accept_async(socket).await?;
        let (mut sink, mut source) = ws.split();

        let (subscriber, mut queue) = self.coordinator.join().await;
        tracing::debug!(
            session_id = self.session_id,
            peer = %self.peer_addr,
            subscriber = %subscriber,
            "Observer subscribed"
        );

        let result = tokio::select! {
            result = self.write_loop(&mut sink, &mut queue) => result,
            result = self.read_loop(&mut source) => result,
        };

        self.coordinator.leave(subscriber).await;
        // Best effort; the peer may already be gone.
        let _ = sink.close().await;

        result
    }

    async fn write_loop(&self, sink: &mut WsSink, queue: &mut mpsc::Receiver<Payload>) -> Result<()> {
        let period = self.config.ping_interval;
        let mut ping = time::interval_at(Instant::now() + period, period);

        loop {
            tokio::select! {
                payload = queue.recv() => match payload {
                    Some(payload) => sink.send(into_message(payload)?).await?,
                    None => {
                        // Registry dropped our queue: evicted.
                        tracing::debug!(session_id = self.session_id, "Subscriber queue closed");
                        return Ok(());
                    }
                },
                _ = ping.tick() => sink.send(Message::Ping(Bytes::new())).await?,
            }
        }
    }

    async fn read_loop(&self, source: &mut WsSource) -> Result<()> {
        let idle_timeout = self.config.idle_timeout();

        loop {
            let message = match time::timeout(idle_timeout, source.next()).await {
                Ok(Some(message)) => message?,
                Ok(None) => return Ok(()),
                Err(_) => {
                    tracing::debug!(
                        session_id = self.session_id,
                        timeout_secs = idle_timeout.as_secs(),
                        "Peer idle, closing"
                    );
                    return Ok(());
                }
            };

            match message {
                Message::Text(text) => {
                    self.coordinator.handle_client_text(text.as_str()).await;
                }
                Message::Binary(data) => {
                    tracing::debug!(
                        session_id = self.session_id,
                        len = data.len(),
                        "Ignoring binary message"
                    );
                }
                Message::Close(_) => return Ok(()),
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }
    }
}

/// Wrap a payload as a text message without copying it
fn into_message(payload: Payload) -> Result<Message> {
    Ok(Message::Text(Utf8Bytes::try_from(payload.into_bytes())?))
}
