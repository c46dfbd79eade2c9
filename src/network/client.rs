//! WebSocket Client
//!
//! Connects to the game server, sends the join request, and runs the
//! message loop: decode a text frame, hand it to the session, send back
//! whatever the session returns.
//!
//! Malformed frames are logged and skipped; only transport failures end
//! the loop.

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::network::protocol::ServerMessage;
use crate::network::session::{BotSession, SessionConfig};

/// Transport-level failures that end the session.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The WebSocket connection failed or dropped.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// An outbound message could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Connect, join, and run the session until the server closes the
/// connection or the transport fails.
pub async fn run(config: SessionConfig) -> Result<(), ClientError> {
    let url = config.server_url.clone();
    info!(%url, "connecting");

    let (ws_stream, _) = connect_async(url.as_str()).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let mut session = BotSession::new(config);
    ws_sender
        .send(Message::Text(session.join_message().to_json()?))
        .await?;

    while let Some(frame) = ws_receiver.next().await {
        match frame? {
            Message::Text(text) => {
                let message = match ServerMessage::from_json(&text) {
                    Ok(m) => m,
                    Err(e) => {
                        debug!(error = %e, "skipping undecodable frame");
                        continue;
                    }
                };

                if let Some(reply) = session.handle_message(&message) {
                    ws_sender.send(Message::Text(reply.to_json()?)).await?;
                }
            }
            Message::Ping(payload) => {
                ws_sender.send(Message::Pong(payload)).await?;
            }
            Message::Close(_) => {
                info!("server closed the connection");
                break;
            }
            other => {
                warn!(?other, "ignoring non-text frame");
            }
        }
    }

    Ok(())
}
