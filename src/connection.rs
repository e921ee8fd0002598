//! Per-connection handler: read call frames, dispatch, write response frames.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use crate::dispatch::Dispatcher;

/// Serve one client connection. Each text or binary frame carries one call
/// envelope; a dropped request (malformed, unknown method, handler fault)
/// simply gets no reply frame. Errors here never affect other connections.
pub async fn handle_connection(
    ws: tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>,
    addr: SocketAddr,
    dispatcher: Arc<Dispatcher>,
) {
    let (mut sink, mut stream) = ws.split();
    debug!(peer = %addr, "client connected");

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                if let Some(response) = dispatcher.dispatch(text.as_bytes()) {
                    if send_bytes(&mut sink, response).await.is_err() {
                        break;
                    }
                }
            }
            Ok(Message::Binary(data)) => {
                if let Some(response) = dispatcher.dispatch(&data) {
                    if send_bytes(&mut sink, response).await.is_err() {
                        break;
                    }
                }
            }
            Ok(Message::Ping(data)) => {
                let _ = sink.send(Message::Pong(data)).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(peer = %addr, error = %e, "connection error");
                break;
            }
        }
    }

    debug!(peer = %addr, "client disconnected");
}

async fn send_bytes(
    sink: &mut futures_util::stream::SplitSink<
        tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>,
        Message,
    >,
    response: Vec<u8>,
) -> Result<(), tokio_tungstenite::tungstenite::Error> {
    match String::from_utf8(response) {
        Ok(text) => sink.send(Message::Text(text.into())).await,
        Err(e) => sink.send(Message::Binary(e.into_bytes().into())).await,
    }
}
