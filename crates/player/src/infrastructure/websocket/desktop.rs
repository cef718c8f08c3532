//! Desktop WebSocket adapter using tokio-tungstenite
//!
//! The socket IO runs in a spawned task. It only moves frames: inbound frames
//! and lifecycle changes go out over an unbounded channel as
//! [`TransportEvent`]s, outbound frames come in over another one. Nothing in
//! the task touches game state.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::infrastructure::websocket::{validate_endpoint, GameSocket, JoinContext};
use crate::ports::outbound::{TransportError, TransportEvent, TransportEvents, TransportPort};

enum Outbound {
    Text(String),
    Close,
}

/// Sending half of a tokio-tungstenite connection
pub struct DesktopTransport {
    tx: mpsc::UnboundedSender<Outbound>,
}

impl TransportPort for DesktopTransport {
    fn send_text(&self, text: String) -> Result<(), TransportError> {
        self.tx
            .send(Outbound::Text(text))
            .map_err(|_| TransportError::Closed)
    }

    fn close(&self) {
        // Already gone if the IO task has exited
        let _ = self.tx.send(Outbound::Close);
    }
}

/// Open a connection to `endpoint` and bind a [`GameSocket`] to it.
///
/// Must be called inside a tokio runtime. The returned event stream has to be
/// pumped into [`GameSocket::handle_transport_event`] on the thread that owns
/// the socket; the first event is `Opened` or, if the connection could not be
/// established, `Closed`.
pub fn connect(
    endpoint: &str,
    join: Option<JoinContext>,
    on_open: impl FnMut() + 'static,
    on_close: impl FnMut() + 'static,
) -> Result<(GameSocket, TransportEvents), TransportError> {
    let url = validate_endpoint(endpoint)?;
    let (event_tx, event_rx) = futures_channel::mpsc::unbounded();
    let (out_tx, out_rx) = mpsc::unbounded_channel();

    tokio::spawn(io_task(url.to_string(), out_rx, event_tx));

    let socket = GameSocket::new(DesktopTransport { tx: out_tx }, join);
    socket.set_on_open(on_open);
    socket.set_on_close(on_close);
    Ok((socket, event_rx))
}

async fn io_task(
    url: String,
    mut out_rx: mpsc::UnboundedReceiver<Outbound>,
    events: futures_channel::mpsc::UnboundedSender<TransportEvent>,
) {
    let ws_stream = match connect_async(url.as_str()).await {
        Ok((ws_stream, _)) => ws_stream,
        Err(e) => {
            tracing::error!("Failed to connect to game server at {}: {}", url, e);
            let _ = events.unbounded_send(TransportEvent::Closed {
                reason: Some(e.to_string()),
            });
            return;
        }
    };
    tracing::debug!("WebSocket open at {}", url);
    if events.unbounded_send(TransportEvent::Opened).is_err() {
        return;
    }

    let (mut write, mut read) = ws_stream.split();
    let reason = loop {
        tokio::select! {
            inbound = read.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    if events.unbounded_send(TransportEvent::Frame(text)).is_err() {
                        break Some("event receiver dropped".to_string());
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    break frame.map(|f| f.reason.to_string());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::error!("WebSocket error: {}", e);
                    break Some(e.to_string());
                }
                None => break None,
            },
            outbound = out_rx.recv() => match outbound {
                Some(Outbound::Text(text)) => {
                    if let Err(e) = write.send(Message::Text(text)).await {
                        tracing::error!("Failed to send message: {}", e);
                        break Some(e.to_string());
                    }
                }
                Some(Outbound::Close) | None => {
                    let _ = write.close().await;
                    break None;
                }
            },
        }
    };

    let _ = events.unbounded_send(TransportEvent::Closed { reason });
}
